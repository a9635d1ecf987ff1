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

use crate::{
    exhaustive::ExhaustiveSearch,
    monitor::{no_op::NoOperationMonitor, tree_search_monitor::TreeSearchMonitor},
};
use offboard_search::{
    num::CapacityNumeric,
    result::StrategyOutcome,
    stats::SolverStatisticsBuilder,
    strategy::{Strategy, StrategyContext},
};

/// Runs the exhaustive search as an optimizer strategy.
#[derive(Debug, Clone)]
pub struct ExhaustiveStrategy<T, M> {
    inner: ExhaustiveSearch<T>,
    monitor: M,
}

impl<T> Default for ExhaustiveStrategy<T, NoOperationMonitor<T>>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new(NoOperationMonitor::new())
    }
}

impl<T, M> ExhaustiveStrategy<T, M>
where
    T: CapacityNumeric,
    M: TreeSearchMonitor<T>,
{
    #[inline]
    pub fn new(monitor: M) -> Self {
        Self {
            inner: ExhaustiveSearch::new(),
            monitor,
        }
    }

    #[inline]
    pub fn preallocated(num_devices: usize, monitor: M) -> Self {
        Self {
            inner: ExhaustiveSearch::preallocated(num_devices),
            monitor,
        }
    }

    #[inline]
    pub fn monitor(&self) -> &M {
        &self.monitor
    }
}

impl<T, M> Strategy<T> for ExhaustiveStrategy<T, M>
where
    T: CapacityNumeric,
    M: TreeSearchMonitor<T>,
{
    fn name(&self) -> &str {
        "ExhaustiveStrategy"
    }

    fn solve(&mut self, context: StrategyContext<'_, T>) -> StrategyOutcome {
        let cost_model = context.config.cost_model();
        let outcome = self.inner.solve(
            context.instance,
            &cost_model,
            context.partition,
            &mut self.monitor,
        );

        let (result, reason, exhaustive_stats) = outcome.into_parts();
        let statistics = SolverStatisticsBuilder::new()
            .devices_considered(context.partition.normal().len())
            .big_devices(context.partition.big().len())
            .solutions_found(exhaustive_stats.solutions_found)
            .solve_duration(exhaustive_stats.time_total)
            .build();

        StrategyOutcome::new(result, reason, statistics)
    }
}
