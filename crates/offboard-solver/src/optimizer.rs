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

//! Strategy selection and result unification.
//!
//! One optimization call partitions the pool into big and normal devices
//! once and hands the partition to every strategy it runs. Each strategy
//! already compares its own selection against the best big device, so the
//! combined strategy only has to keep the cheapest of their answers.
//!
//! `BestOfAll` always runs the dynamic program and the greedy selector. The
//! exhaustive search joins them only while the normal partition stays within
//! `OptimizerConfig::exhaustive_device_limit`, since its running time doubles
//! with every device. The answers are folded as
//! `unite(unite(dynamic, greedy), exhaustive)`, so an earlier strategy keeps
//! a tie.

use log::{debug, info};
use offboard_bnb::{monitor::no_op::NoOperationMonitor, portfolio::ExhaustiveStrategy};
use offboard_dp::portfolio::DynamicProgramStrategy;
use offboard_greedy::portfolio::GreedyStrategy;
use offboard_model::{
    device::Device,
    instance::{Instance, InstanceBuilder, InstanceError},
};
use offboard_search::{
    config::OptimizerConfig,
    num::CapacityNumeric,
    partition::DevicePartition,
    result::{CandidateResult, StrategyOutcome, TerminationReason},
    stats::{SolverStatistics, SolverStatisticsBuilder},
    strategy::{Strategy, StrategyContext},
};

/// Which strategy an optimization call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Exact subset search over the normal devices.
    Exhaustive,
    /// Rating-ordered prefix with a capacity trim pass.
    Greedy,
    /// Scaled knapsack over bucketed devices.
    ScaledDynamicProgram,
    /// The cheapest answer of all strategies that apply.
    BestOfAll,
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Exhaustive => write!(f, "Exhaustive"),
            StrategyKind::Greedy => write!(f, "Greedy"),
            StrategyKind::ScaledDynamicProgram => write!(f, "Scaled Dynamic Program"),
            StrategyKind::BestOfAll => write!(f, "Best Of All"),
        }
    }
}

/// Result of one optimization call.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    result: CandidateResult,
    termination_reason: TerminationReason,
    statistics: SolverStatistics,
    runs: Vec<(StrategyKind, StrategyOutcome)>,
}

impl OptimizationOutcome {
    /// Returns the cheapest selection found.
    #[inline]
    pub fn result(&self) -> &CandidateResult {
        &self.result
    }

    #[inline]
    pub fn into_result(self) -> CandidateResult {
        self.result
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    /// Returns the statistics of the whole call.
    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    /// Returns the outcome of every strategy that ran, in the order they ran.
    #[inline]
    pub fn runs(&self) -> &[(StrategyKind, StrategyOutcome)] {
        &self.runs
    }

    /// Returns the outcome of `kind` if it ran.
    #[inline]
    pub fn run(&self, kind: StrategyKind) -> Option<&StrategyOutcome> {
        self.runs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, outcome)| outcome)
    }
}

impl std::fmt::Display for OptimizationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Optimization Outcome:")?;
        writeln!(f, "  Result: {}", self.result)?;
        writeln!(f, "  Termination: {}", self.termination_reason)?;
        for (kind, outcome) in self.runs.iter() {
            writeln!(
                f,
                "  {}: cost {} ({})",
                kind,
                outcome.result().cost(),
                outcome.termination_reason()
            )?;
        }
        write!(f, "{}", self.statistics)
    }
}

/// Runs the selection strategies on device pools.
///
/// The strategies keep their scratch buffers between calls, so reusing one
/// optimizer for many pools avoids repeated allocation.
#[derive(Debug, Clone)]
pub struct Optimizer<T> {
    config: OptimizerConfig,
    exhaustive: ExhaustiveStrategy<T, NoOperationMonitor<T>>,
    greedy: GreedyStrategy<T>,
    dynamic: DynamicProgramStrategy<T>,
}

impl<T> Default for Optimizer<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl<T> Optimizer<T>
where
    T: CapacityNumeric,
{
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            exhaustive: ExhaustiveStrategy::default(),
            greedy: GreedyStrategy::new(),
            dynamic: DynamicProgramStrategy::new(),
        }
    }

    #[inline]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Validates `devices` and `needed_volume` into an instance and optimizes it.
    ///
    /// # Errors
    ///
    /// Returns an [`InstanceError`] if the needed volume is zero or a rating
    /// is not finite.
    pub fn optimize_pool<I>(
        &mut self,
        devices: I,
        needed_volume: T,
        kind: StrategyKind,
    ) -> Result<OptimizationOutcome, InstanceError>
    where
        I: IntoIterator<Item = Device<T>>,
    {
        let mut builder = InstanceBuilder::new(needed_volume);
        builder.extend_devices(devices);
        let instance = builder.build()?;
        Ok(self.optimize(&instance, kind))
    }

    /// Runs `kind` on `instance`.
    pub fn optimize(&mut self, instance: &Instance<T>, kind: StrategyKind) -> OptimizationOutcome {
        let start_time = std::time::Instant::now();
        let partition = DevicePartition::new(instance, &self.config.cost_model());

        info!(
            "optimizing {} with strategy {} and {}",
            instance, kind, self.config
        );

        let runs: Vec<(StrategyKind, StrategyOutcome)> = match kind {
            StrategyKind::BestOfAll => {
                let mut runs = Vec::with_capacity(3);
                runs.push(self.run(StrategyKind::ScaledDynamicProgram, instance, &partition));
                runs.push(self.run(StrategyKind::Greedy, instance, &partition));
                if partition.normal().len() <= self.config.exhaustive_device_limit() {
                    runs.push(self.run(StrategyKind::Exhaustive, instance, &partition));
                } else {
                    debug!(
                        "skipping exhaustive search: {} normal devices exceed the limit of {}",
                        partition.normal().len(),
                        self.config.exhaustive_device_limit()
                    );
                }
                runs
            }
            single => vec![self.run(single, instance, &partition)],
        };

        let result = runs
            .iter()
            .map(|(_, outcome)| outcome.result().clone())
            .reduce(CandidateResult::unite)
            .unwrap_or_else(|| partition.best_big().clone());

        let termination_reason = combined_termination_reason(&runs);
        let solutions_found = runs
            .iter()
            .fold(0u64, |acc, (_, o)| acc.saturating_add(o.statistics().solutions_found));

        let statistics = SolverStatisticsBuilder::new()
            .devices_considered(partition.normal().len())
            .big_devices(partition.big().len())
            .solutions_found(solutions_found)
            .solve_duration(start_time.elapsed())
            .build();

        info!(
            "strategy {} finished with {} ({})",
            kind, result, termination_reason
        );

        OptimizationOutcome {
            result,
            termination_reason,
            statistics,
            runs,
        }
    }

    fn run(
        &mut self,
        kind: StrategyKind,
        instance: &Instance<T>,
        partition: &DevicePartition,
    ) -> (StrategyKind, StrategyOutcome) {
        let context = StrategyContext::new(instance, &self.config, partition);
        let strategy: &mut dyn Strategy<T> = match kind {
            StrategyKind::Exhaustive => &mut self.exhaustive,
            StrategyKind::Greedy => &mut self.greedy,
            StrategyKind::ScaledDynamicProgram | StrategyKind::BestOfAll => &mut self.dynamic,
        };

        let outcome = strategy.solve(context);
        info!(
            "{} returned cost {} ({}) in {:.3}s",
            strategy.name(),
            outcome.result().cost(),
            outcome.termination_reason(),
            outcome.statistics().solve_duration.as_secs_f64()
        );
        (kind, outcome)
    }
}

/// A proof from any strategy carries over to the combined result, which is
/// never worse than the proven one.
fn combined_termination_reason(runs: &[(StrategyKind, StrategyOutcome)]) -> TerminationReason {
    let mut reason = TerminationReason::HeuristicCompleted;
    for (_, outcome) in runs.iter() {
        match outcome.termination_reason() {
            TerminationReason::OptimalityProven | TerminationReason::InfeasibilityProven => {
                return outcome.termination_reason().clone();
            }
            TerminationReason::Aborted(message) if runs.len() == 1 => {
                reason = TerminationReason::Aborted(message.clone());
            }
            _ => {}
        }
    }
    reason
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_model::{generate::PoolGenerator, index::DeviceIndex};
    use offboard_search::{config::OptimizerConfigBuilder, cost::CostModel};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const ALL_KINDS: [StrategyKind; 4] = [
        StrategyKind::Exhaustive,
        StrategyKind::Greedy,
        StrategyKind::ScaledDynamicProgram,
        StrategyKind::BestOfAll,
    ];

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

    fn random_instance(rng: &mut ChaCha8Rng, max_devices: usize) -> Instance<u64> {
        let n = rng.random_range(1..=max_devices);
        let needed = rng.random_range(1..=200u64);
        let devices: Vec<(f64, u64)> = (0..n)
            .map(|_| (rng.random_range(0.0..1.0), rng.random_range(0..=120u64)))
            .collect();
        build(needed, &devices)
    }

    #[test]
    fn test_three_equal_devices_for_every_strategy() {
        let instance = build(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        let mut optimizer = Optimizer::default();
        for kind in ALL_KINDS {
            let outcome = optimizer.optimize(&instance, kind);
            assert_eq!(outcome.result().selected(), &[di(0), di(1)], "{}", kind);
            assert_eq!(outcome.result().cost(), 1.5, "{}", kind);
        }
    }

    #[test]
    fn test_insufficient_pool_for_every_strategy() {
        let instance = build(10, &[(0.1, 2)]);
        let mut optimizer = Optimizer::default();
        for kind in ALL_KINDS {
            let outcome = optimizer.optimize(&instance, kind);
            assert!(!outcome.result().is_feasible(), "{}", kind);
            assert!(outcome.result().selected().is_empty(), "{}", kind);
        }
    }

    #[test]
    fn test_huge_need_without_normal_devices() {
        let mut optimizer = Optimizer::default();

        let empty = InstanceBuilder::<u64>::new(1 << 40).build().unwrap();
        for kind in ALL_KINDS {
            let outcome = optimizer.optimize(&empty, kind);
            assert!(!outcome.result().is_feasible(), "{}", kind);
        }

        let single_big = build(1 << 40, &[(0.1, 1 << 40)]);
        for kind in ALL_KINDS {
            let outcome = optimizer.optimize(&single_big, kind);
            assert_eq!(outcome.result().selected(), &[di(0)], "{}", kind);
        }
    }

    #[test]
    fn test_best_of_all_runs_exhaustive_within_limit() {
        let instance = build(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        let mut optimizer = Optimizer::default();
        let outcome = optimizer.optimize(&instance, StrategyKind::BestOfAll);

        let kinds: Vec<StrategyKind> = outcome.runs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::ScaledDynamicProgram,
                StrategyKind::Greedy,
                StrategyKind::Exhaustive
            ]
        );
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::OptimalityProven
        );
    }

    #[test]
    fn test_best_of_all_skips_exhaustive_beyond_limit() {
        let config = OptimizerConfigBuilder::new()
            .with_exhaustive_device_limit(2)
            .build()
            .unwrap();
        let instance = build(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        let mut optimizer = Optimizer::new(config);
        let outcome = optimizer.optimize(&instance, StrategyKind::BestOfAll);

        assert!(outcome.run(StrategyKind::Exhaustive).is_none());
        assert_eq!(outcome.runs().len(), 2);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::HeuristicCompleted
        );
        assert_eq!(outcome.result().cost(), 1.5);
    }

    #[test]
    fn test_optimize_pool_rejects_invalid_input() {
        let mut optimizer = Optimizer::<u64>::default();
        let err = optimizer
            .optimize_pool(vec![Device::new(0.1, 5)], 0, StrategyKind::Greedy)
            .unwrap_err();
        assert_eq!(err, InstanceError::NonPositiveVolume);

        let err = optimizer
            .optimize_pool(
                vec![Device::new(0.1, 5), Device::new(f64::NAN, 5)],
                4,
                StrategyKind::Greedy,
            )
            .unwrap_err();
        assert_eq!(err, InstanceError::NonFiniteRating { index: di(1) });
    }

    #[test]
    fn test_alpha_changes_the_optimum() {
        // With alpha = 0 only the worst rating counts, so the big but
        // healthier device wins over the tight pair.
        let instance = build(10, &[(0.3, 5), (0.3, 5), (0.2, 30)]);

        let mut default = Optimizer::default();
        let outcome = default.optimize(&instance, StrategyKind::Exhaustive);
        assert_eq!(outcome.result().selected(), &[di(0), di(1)]);

        let config = OptimizerConfigBuilder::new().with_alpha(0.0).build().unwrap();
        let mut rating_only = Optimizer::new(config);
        let outcome = rating_only.optimize(&instance, StrategyKind::Exhaustive);
        assert_eq!(outcome.result().selected(), &[di(2)]);
    }

    #[test]
    fn test_selections_are_feasible_and_valid() {
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let mut optimizer = Optimizer::default();
        for _ in 0..60 {
            let instance = random_instance(&mut rng, 14);
            for kind in ALL_KINDS {
                let outcome = optimizer.optimize(&instance, kind);
                let result = outcome.result();
                assert!(instance.check_selection(result.selected()).is_ok());
                if result.is_feasible() {
                    assert!(instance.capacity_of(result.selected()) >= instance.needed_volume());
                    let rescored = CandidateResult::score(
                        &instance,
                        &CostModel::default(),
                        result.selected().to_vec(),
                    );
                    assert!((rescored.cost() - result.cost()).abs() < 1e-9);
                } else {
                    assert!(result.selected().is_empty());
                }
            }
        }
    }

    #[test]
    fn test_exhaustive_is_never_beaten() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut optimizer = Optimizer::default();
        for _ in 0..60 {
            let instance = random_instance(&mut rng, 14);
            let exact = optimizer
                .optimize(&instance, StrategyKind::Exhaustive)
                .result()
                .cost();
            for kind in [StrategyKind::Greedy, StrategyKind::ScaledDynamicProgram] {
                let cost = optimizer.optimize(&instance, kind).result().cost();
                assert!(exact <= cost + 1e-9, "{} beat exhaustive: {} < {}", kind, cost, exact);
            }
            let best = optimizer.optimize(&instance, StrategyKind::BestOfAll);
            if exact.is_finite() {
                assert!((best.result().cost() - exact).abs() < 1e-9);
            } else {
                assert!(!best.result().is_feasible());
            }
        }
    }

    #[test]
    fn test_no_strategy_is_worse_than_the_best_big_device() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut optimizer = Optimizer::default();
        let cost_model = CostModel::default();
        for _ in 0..40 {
            let instance = random_instance(&mut rng, 10);
            let partition = DevicePartition::new(&instance, &cost_model);
            for kind in ALL_KINDS {
                let outcome = optimizer.optimize(&instance, kind);
                assert!(outcome.result().cost() <= partition.best_big().cost());
            }
        }
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let instance = PoolGenerator::new()
            .with_capacity_range(1, 500)
            .instance::<u64>(200, 5_000)
            .unwrap();
        let mut first = Optimizer::default();
        let mut second = Optimizer::default();
        for kind in [StrategyKind::Greedy, StrategyKind::ScaledDynamicProgram] {
            let a = first.optimize(&instance, kind);
            let b = second.optimize(&instance, kind);
            let c = first.optimize(&instance, kind);
            assert_eq!(a.result(), b.result());
            assert_eq!(a.result(), c.result());
        }
    }

    #[test]
    fn test_generated_pool_best_of_all_skips_exhaustive() {
        let instance = PoolGenerator::new()
            .with_seed(17)
            .with_capacity_range(1, 1_000)
            .instance::<u64>(500, 20_000)
            .unwrap();
        let mut optimizer = Optimizer::default();
        let outcome = optimizer.optimize(&instance, StrategyKind::BestOfAll);
        assert!(outcome.run(StrategyKind::Exhaustive).is_none());
        assert!(outcome.result().is_feasible());
        assert!(instance.capacity_of(outcome.result().selected()) >= 20_000);
    }
}
