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

use crate::stats::ExhaustiveStatistics;
use offboard_model::instance::Instance;
use offboard_search::{command::SearchCommand, num::CapacityNumeric, result::CandidateResult};

/// Observes and steers an exhaustive search.
pub trait TreeSearchMonitor<T>
where
    T: CapacityNumeric,
{
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called when the search starts, with the selection it is seeded with.
    fn on_enter_search(
        &mut self,
        instance: &Instance<T>,
        incumbent: &CandidateResult,
        statistics: &ExhaustiveStatistics,
    );
    /// Called when the search ends.
    fn on_exit_search(&mut self, statistics: &ExhaustiveStatistics);
    /// Called before every node to determine whether the search continues.
    fn search_command(&mut self, _statistics: &ExhaustiveStatistics) -> SearchCommand {
        SearchCommand::Continue
    }
    /// Called when a node at `depth` is entered.
    fn on_node(&mut self, depth: usize, statistics: &ExhaustiveStatistics);
    /// Called when a node is cut because `lower_bound` cannot beat the best known cost.
    fn on_prune(&mut self, depth: usize, lower_bound: f64, statistics: &ExhaustiveStatistics);
    /// Called when a strictly better selection is found.
    fn on_solution_found(&mut self, result: &CandidateResult, statistics: &ExhaustiveStatistics);
}

impl<T> std::fmt::Debug for dyn TreeSearchMonitor<T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn TreeSearchMonitor<T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TreeSearchMonitor({})", self.name())
    }
}

/// Lets a caller keep ownership of a monitor and inspect it after the search.
impl<T, M> TreeSearchMonitor<T> for &mut M
where
    T: CapacityNumeric,
    M: TreeSearchMonitor<T> + ?Sized,
{
    #[inline(always)]
    fn name(&self) -> &str {
        (**self).name()
    }

    #[inline(always)]
    fn on_enter_search(
        &mut self,
        instance: &Instance<T>,
        incumbent: &CandidateResult,
        statistics: &ExhaustiveStatistics,
    ) {
        (**self).on_enter_search(instance, incumbent, statistics)
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &ExhaustiveStatistics) {
        (**self).on_exit_search(statistics)
    }

    #[inline(always)]
    fn search_command(&mut self, statistics: &ExhaustiveStatistics) -> SearchCommand {
        (**self).search_command(statistics)
    }

    #[inline(always)]
    fn on_node(&mut self, depth: usize, statistics: &ExhaustiveStatistics) {
        (**self).on_node(depth, statistics)
    }

    #[inline(always)]
    fn on_prune(&mut self, depth: usize, lower_bound: f64, statistics: &ExhaustiveStatistics) {
        (**self).on_prune(depth, lower_bound, statistics)
    }

    #[inline(always)]
    fn on_solution_found(&mut self, result: &CandidateResult, statistics: &ExhaustiveStatistics) {
        (**self).on_solution_found(result, statistics)
    }
}
