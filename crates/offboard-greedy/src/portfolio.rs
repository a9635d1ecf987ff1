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

use crate::greedy::GreedySelector;
use offboard_search::{
    num::CapacityNumeric,
    result::{StrategyOutcome, TerminationReason},
    stats::SolverStatisticsBuilder,
    strategy::{Strategy, StrategyContext},
};

/// Runs the greedy selector as an optimizer strategy.
#[derive(Debug, Clone)]
pub struct GreedyStrategy<T> {
    inner: GreedySelector<T>,
}

impl<T> Default for GreedyStrategy<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GreedyStrategy<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: GreedySelector::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            inner: GreedySelector::preallocated(num_devices),
        }
    }
}

impl<T> Strategy<T> for GreedyStrategy<T>
where
    T: CapacityNumeric,
{
    fn name(&self) -> &str {
        "GreedyStrategy"
    }

    fn solve(&mut self, context: StrategyContext<'_, T>) -> StrategyOutcome {
        let cost_model = context.config.cost_model();
        let (result, greedy_stats) = self
            .inner
            .select(context.instance, &cost_model, context.partition)
            .into_parts();

        // An infeasible greedy run consumed every normal device and found no
        // big device, so the whole pool is short of the needed volume.
        let reason = if result.is_feasible() {
            TerminationReason::HeuristicCompleted
        } else {
            TerminationReason::InfeasibilityProven
        };

        let statistics = SolverStatisticsBuilder::new()
            .devices_considered(greedy_stats.devices_considered)
            .big_devices(context.partition.big().len())
            .solutions_found(u64::from(result.is_feasible()))
            .solve_duration(greedy_stats.time_total)
            .build();

        StrategyOutcome::new(result, reason, statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_model::instance::InstanceBuilder;
    use offboard_search::{config::OptimizerConfig, partition::DevicePartition};

    fn run(needed: u64, devices: &[(f64, u64)]) -> StrategyOutcome {
        let mut builder = InstanceBuilder::<u64>::new(needed);
        for &(rating, capacity) in devices {
            builder.add_device(rating, capacity);
        }
        let instance = builder.build().unwrap();
        let config = OptimizerConfig::default();
        let partition = DevicePartition::new(&instance, &config.cost_model());
        GreedyStrategy::new().solve(StrategyContext::new(&instance, &config, &partition))
    }

    #[test]
    fn test_feasible_run_is_heuristic() {
        let outcome = run(10, &[(0.1, 5), (0.5, 5), (0.9, 5)]);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::HeuristicCompleted
        );
        assert!(!outcome.is_optimal());
        assert_eq!(outcome.statistics().devices_considered, 3);
    }

    #[test]
    fn test_short_pool_is_proven_infeasible() {
        let outcome = run(10, &[(0.1, 2), (0.3, 7)]);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::InfeasibilityProven
        );
        assert!(!outcome.result().is_feasible());
    }
}
