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

use crate::knapsack::ScaledKnapsack;
use offboard_search::{
    num::CapacityNumeric,
    result::{StrategyOutcome, TerminationReason},
    stats::SolverStatisticsBuilder,
    strategy::{Strategy, StrategyContext},
};

/// Runs the scaled knapsack as an optimizer strategy.
#[derive(Debug, Clone)]
pub struct DynamicProgramStrategy<T> {
    inner: ScaledKnapsack<T>,
}

impl<T> Default for DynamicProgramStrategy<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicProgramStrategy<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: ScaledKnapsack::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            inner: ScaledKnapsack::preallocated(num_devices),
        }
    }
}

impl<T> Strategy<T> for DynamicProgramStrategy<T>
where
    T: CapacityNumeric,
{
    fn name(&self) -> &str {
        "DynamicProgramStrategy"
    }

    fn solve(&mut self, context: StrategyContext<'_, T>) -> StrategyOutcome {
        let cost_model = context.config.cost_model();
        let (result, dp_stats) = self
            .inner
            .solve(
                context.instance,
                &cost_model,
                context.partition,
                context.config.operation_budget(),
            )
            .into_parts();

        // Scaling rounds capacities down, so an empty table does not prove
        // that the pool is short of the needed volume.
        let statistics = SolverStatisticsBuilder::new()
            .devices_considered(context.partition.normal().len())
            .big_devices(context.partition.big().len())
            .solutions_found(u64::from(result.is_feasible()))
            .solve_duration(dp_stats.time_total)
            .build();

        StrategyOutcome::new(result, TerminationReason::HeuristicCompleted, statistics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};
    use offboard_search::{config::OptimizerConfigBuilder, partition::DevicePartition};

    #[test]
    fn test_strategy_uses_configured_budget() {
        let mut builder = InstanceBuilder::<u64>::new(100);
        builder.add_device(0.1, 30);
        builder.add_device(0.2, 40);
        builder.add_device(0.3, 45);
        let instance = builder.build().unwrap();

        let coarse = OptimizerConfigBuilder::new()
            .with_operation_budget(1)
            .build()
            .unwrap();
        let partition = DevicePartition::new(&instance, &coarse.cost_model());
        let outcome = DynamicProgramStrategy::new()
            .solve(StrategyContext::new(&instance, &coarse, &partition));
        assert!(!outcome.result().is_feasible());
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::HeuristicCompleted
        );

        let fine = OptimizerConfigBuilder::new().build().unwrap();
        let outcome = DynamicProgramStrategy::new()
            .solve(StrategyContext::new(&instance, &fine, &partition));
        assert_eq!(
            outcome.result().selected(),
            &[DeviceIndex::new(0), DeviceIndex::new(1), DeviceIndex::new(2)]
        );
        assert_eq!(outcome.statistics().devices_considered, 3);
    }
}
