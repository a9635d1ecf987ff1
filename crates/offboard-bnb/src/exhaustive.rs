// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Exhaustive depth-first subset search.
//!
//! Every node decides whether the normal device at its depth is excluded or
//! included. A node carries the accumulated capacity, the worst rating so
//! far and the partial selection. The partial selection is a linked list of
//! stack frames, each pointing at its parent, so the include branch shares
//! the prefix with its siblings and nothing has to be undone on the way back.
//!
//! The best result is threaded through the recursion: every call receives
//! the best known result and returns the best it knows after exploring its
//! subtree. The search starts from the best single big device, which makes
//! the returned result already dominate it.
//!
//! Pruning uses `CostModel::lower_bound`. Adding devices never decreases the
//! capacity or the worst rating, so the bound of a node never exceeds the
//! cost of any of its feasible descendants.

use crate::{
    monitor::tree_search_monitor::TreeSearchMonitor, result::ExhaustiveOutcome,
    stats::ExhaustiveStatistics,
};
use log::{debug, trace};
use offboard_model::{device::Device, index::DeviceIndex, instance::Instance};
use offboard_search::{
    command::SearchCommand, cost::CostModel, num::CapacityNumeric, partition::DevicePartition,
    result::CandidateResult,
};

/// The exhaustive search engine.
///
/// Holds a scratch copy of the normal devices that is reused across runs.
#[derive(Debug, Clone)]
pub struct ExhaustiveSearch<T> {
    devices: Vec<(DeviceIndex, Device<T>)>,
}

impl<T> Default for ExhaustiveSearch<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ExhaustiveSearch<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
        }
    }

    /// Creates a search engine with room for `num_devices` normal devices.
    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            devices: Vec::with_capacity(num_devices),
        }
    }

    /// Searches every subset of the normal partition of `instance`.
    ///
    /// Returns the cheapest selection, compared against the best big device
    /// of `partition`. If `monitor` terminates the search early, the best
    /// selection found until then is returned with an `Aborted` reason.
    pub fn solve<S>(
        &mut self,
        instance: &Instance<T>,
        cost_model: &CostModel,
        partition: &DevicePartition,
        mut monitor: S,
    ) -> ExhaustiveOutcome
    where
        S: TreeSearchMonitor<T>,
    {
        self.devices.clear();
        self.devices.extend(
            partition
                .normal()
                .iter()
                .map(|&index| (index, *instance.device(index))),
        );

        debug!(
            "exhaustive search over {} normal devices, seeded with cost {}",
            self.devices.len(),
            partition.best_big().cost()
        );

        let session = ExhaustiveSearchSession {
            devices: &self.devices,
            instance,
            cost_model,
            monitor: &mut monitor,
            stats: ExhaustiveStatistics::default(),
            abort_reason: None,
            start_time: std::time::Instant::now(),
        };
        session.run(partition.best_big().clone())
    }
}

/// One frame of the persistent partial selection.
struct Chosen<'p> {
    index: DeviceIndex,
    parent: Option<&'p Chosen<'p>>,
}

fn collect_selection(mut chosen: Option<&Chosen<'_>>) -> Vec<DeviceIndex> {
    let mut selected = Vec::new();
    while let Some(frame) = chosen {
        selected.push(frame.index);
        chosen = frame.parent;
    }
    selected
}

struct ExhaustiveSearchSession<'a, T, S> {
    devices: &'a [(DeviceIndex, Device<T>)],
    instance: &'a Instance<T>,
    cost_model: &'a CostModel,
    monitor: &'a mut S,
    stats: ExhaustiveStatistics,
    abort_reason: Option<String>,
    start_time: std::time::Instant,
}

impl<'a, T, S> ExhaustiveSearchSession<'a, T, S>
where
    T: CapacityNumeric,
    S: TreeSearchMonitor<T>,
{
    fn run(mut self, seed: CandidateResult) -> ExhaustiveOutcome {
        self.monitor
            .on_enter_search(self.instance, &seed, &self.stats);

        let best = self.explore(0, T::zero(), f64::NEG_INFINITY, None, seed);

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);

        debug!(
            "exhaustive search finished: {} after {} nodes",
            best, self.stats.nodes_explored
        );

        match self.abort_reason {
            Some(reason) => ExhaustiveOutcome::aborted(best, reason, self.stats),
            None => ExhaustiveOutcome::completed(best, self.stats),
        }
    }

    fn explore(
        &mut self,
        depth: usize,
        capacity: T,
        worst_rating: f64,
        chosen: Option<&Chosen<'_>>,
        best: CandidateResult,
    ) -> CandidateResult {
        if self.abort_reason.is_some() {
            return best;
        }
        if let SearchCommand::Terminate(reason) = self.monitor.search_command(&self.stats) {
            self.abort_reason = Some(reason);
            return best;
        }

        self.stats.on_node_explored();
        self.stats.on_depth_update(depth as u64);
        self.monitor.on_node(depth, &self.stats);

        let needed = self.instance.needed_volume();
        let bound = self.cost_model.lower_bound(capacity, needed, worst_rating);
        if bound >= best.cost() {
            self.stats.on_pruning_bound();
            self.monitor.on_prune(depth, bound, &self.stats);
            return best;
        }

        if capacity >= needed {
            // Feasible nodes cost exactly their bound, which beat `best` above.
            let cost = self.cost_model.cost(capacity, needed, worst_rating);
            let candidate = CandidateResult::new(cost, collect_selection(chosen));
            self.stats.on_solution_found();
            trace!("exhaustive search improved to {}", candidate);
            self.monitor.on_solution_found(&candidate, &self.stats);
            return best.unite(candidate);
        }

        let Some(&(index, device)) = self.devices.get(depth) else {
            self.stats.on_dead_end();
            return best;
        };

        let best = self.explore(depth + 1, capacity, worst_rating, chosen, best);

        let frame = Chosen {
            index,
            parent: chosen,
        };
        self.explore(
            depth + 1,
            capacity.saturating_add_val(device.capacity()),
            worst_rating.max(device.rating()),
            Some(&frame),
            best,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{
        log::LogMonitor, no_op::NoOperationMonitor, node_limit::NodeLimitMonitor,
    };
    use offboard_model::instance::InstanceBuilder;
    use offboard_search::result::TerminationReason;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn di(i: usize) -> DeviceIndex {
        DeviceIndex::new(i)
    }

    fn build(needed: u64, devices: &[(f64, u64)]) -> Instance<u64> {
        let mut builder = InstanceBuilder::new(needed);
        for &(rating, capacity) in devices {
            builder.add_device(rating, capacity);
        }
        builder.build().unwrap()
    }

    fn solve(instance: &Instance<u64>) -> ExhaustiveOutcome {
        let cost_model = CostModel::default();
        let partition = DevicePartition::new(instance, &cost_model);
        ExhaustiveSearch::new().solve(
            instance,
            &cost_model,
            &partition,
            NoOperationMonitor::<u64>::new(),
        )
    }

    fn brute_force(instance: &Instance<u64>, cost_model: &CostModel) -> f64 {
        let n = instance.num_devices();
        let mut best = f64::INFINITY;
        for mask in 1u32..(1u32 << n) {
            let selection: Vec<DeviceIndex> =
                (0..n).filter(|&i| mask & (1 << i) != 0).map(di).collect();
            let cost = cost_model.cost(
                instance.capacity_of(&selection),
                instance.needed_volume(),
                instance.worst_rating_of(&selection),
            );
            best = best.min(cost);
        }
        best
    }

    #[test]
    fn test_three_equal_devices() {
        let instance = build(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        let outcome = solve(&instance);
        assert_eq!(outcome.result().selected(), &[di(0), di(1)]);
        assert_eq!(outcome.result().cost(), 1.5);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::OptimalityProven
        ));
    }

    #[test]
    fn test_insufficient_pool_is_infeasible() {
        let instance = build(10, &[(0.1, 2)]);
        let outcome = solve(&instance);
        assert!(!outcome.result().is_feasible());
        assert!(outcome.result().selected().is_empty());
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::InfeasibilityProven
        ));
        assert_eq!(outcome.statistics().dead_ends, 2);
    }

    #[test]
    fn test_big_device_beats_worse_combinations() {
        // Big device alone: 10/10 + 0.2 = 1.2. Any pair of normals costs >= 1.9.
        let instance = build(10, &[(0.9, 6), (0.2, 10), (0.95, 6)]);
        let outcome = solve(&instance);
        assert_eq!(outcome.result().selected(), &[di(1)]);
        assert!((outcome.result().cost() - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_combination_beats_big_device() {
        // Pair of normals: 10/10 + 0.1 = 1.1. Big device: 20/10 + 0.0 = 2.0.
        let instance = build(10, &[(0.0, 20), (0.1, 4), (0.1, 6)]);
        let outcome = solve(&instance);
        assert_eq!(outcome.result().selected(), &[di(1), di(2)]);
        assert!((outcome.result().cost() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_only_big_devices() {
        let instance = build(10, &[(0.3, 11), (0.1, 15)]);
        let outcome = solve(&instance);
        // 1.1 + 0.3 = 1.4 versus 1.5 + 0.1 = 1.6
        assert_eq!(outcome.result().selected(), &[di(0)]);
        assert_eq!(outcome.statistics().nodes_explored, 1);
    }

    #[test]
    fn test_pruning_happens() {
        let devices: Vec<(f64, u64)> = (0..12).map(|i| (i as f64 / 12.0, 3)).collect();
        let instance = build(10, &devices);
        let outcome = solve(&instance);
        assert!(outcome.statistics().prunings_bound > 0);
        assert!(outcome.statistics().nodes_explored < (1 << 13));
        assert_eq!(outcome.result().selected(), &[di(0), di(1), di(2), di(3)]);
    }

    #[test]
    fn test_node_limit_aborts_with_best_so_far() {
        let devices: Vec<(f64, u64)> = (0..16).map(|i| (0.5 - i as f64 * 0.01, 2)).collect();
        let instance = build(9, &devices);
        let cost_model = CostModel::default();
        let partition = DevicePartition::new(&instance, &cost_model);
        let outcome = ExhaustiveSearch::new().solve(
            &instance,
            &cost_model,
            &partition,
            NodeLimitMonitor::<u64>::new(50),
        );

        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::Aborted("node limit of 50 reached".to_string())
        );
        assert_eq!(outcome.statistics().nodes_explored, 50);
        if outcome.result().is_feasible() {
            assert!(instance.capacity_of(outcome.result().selected()) >= 9);
        }
    }

    #[test]
    fn test_borrowed_monitor_is_usable_afterwards() {
        let instance = build(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        let cost_model = CostModel::default();
        let partition = DevicePartition::new(&instance, &cost_model);
        let mut monitor = NodeLimitMonitor::<u64>::new(1_000);
        let outcome =
            ExhaustiveSearch::new().solve(&instance, &cost_model, &partition, &mut monitor);
        assert!(outcome.termination_reason() == &TerminationReason::OptimalityProven);
        assert_eq!(monitor.node_limit(), 1_000);
    }

    #[test]
    fn test_log_monitor_sees_big_device_seed() {
        let instance = build(10, &[(0.1, 10), (0.5, 5), (0.9, 5)]);
        let cost_model = CostModel::default();
        let partition = DevicePartition::new(&instance, &cost_model);
        let mut monitor = LogMonitor::<u64>::default();
        let outcome =
            ExhaustiveSearch::new().solve(&instance, &cost_model, &partition, &mut monitor);
        assert_eq!(outcome.result().selected(), &[DeviceIndex::new(0)]);
        assert_eq!(monitor.best_cost(), Some(outcome.result().cost()));
    }

    #[test]
    fn test_repeated_runs_are_deterministic() {
        let instance = build(
            25,
            &[(0.4, 7), (0.2, 9), (0.9, 13), (0.1, 4), (0.4, 7), (0.3, 11)],
        );
        let cost_model = CostModel::default();
        let partition = DevicePartition::new(&instance, &cost_model);
        let mut search = ExhaustiveSearch::preallocated(instance.num_devices());

        let first = search.solve(
            &instance,
            &cost_model,
            &partition,
            NoOperationMonitor::<u64>::new(),
        );
        let second = search.solve(
            &instance,
            &cost_model,
            &partition,
            NoOperationMonitor::<u64>::new(),
        );
        assert_eq!(first.result(), second.result());
        assert_eq!(
            first.statistics().nodes_explored,
            second.statistics().nodes_explored
        );
    }

    #[test]
    fn test_matches_brute_force_on_random_pools() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for alpha in [0.0, 1.0, 2.5] {
            let cost_model = CostModel::new(alpha);
            for _ in 0..40 {
                let n = rng.random_range(1..=12);
                let needed = rng.random_range(1..=60u64);
                let devices: Vec<(f64, u64)> = (0..n)
                    .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0..=40u64)))
                    .collect();
                let instance = build(needed, &devices);
                let partition = DevicePartition::new(&instance, &cost_model);
                let outcome = ExhaustiveSearch::new().solve(
                    &instance,
                    &cost_model,
                    &partition,
                    NoOperationMonitor::<u64>::new(),
                );

                let expected = brute_force(&instance, &cost_model);
                let actual = outcome.result().cost();
                if expected.is_finite() {
                    assert!((actual - expected).abs() < 1e-9, "{} != {}", actual, expected);
                    let rescored = CandidateResult::score(
                        &instance,
                        &cost_model,
                        outcome.result().selected().to_vec(),
                    );
                    assert!((rescored.cost() - actual).abs() < 1e-9);
                } else {
                    assert!(!outcome.result().is_feasible());
                }
            }
        }
    }
}
