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

//! Fan-out monitor for the exhaustive search.
//!
//! Events reach child monitors in insertion order. `search_command` returns the
//! first non-`Continue` answer, so stricter stop conditions belong first.

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::ExhaustiveStatistics};
use offboard_model::instance::Instance;
use offboard_search::{command::SearchCommand, num::CapacityNumeric, result::CandidateResult};

/// Forwards every event to all contained monitors.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    fn on_enter_search(
        &mut self,
        instance: &Instance<T>,
        incumbent: &CandidateResult,
        statistics: &ExhaustiveStatistics,
    ) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_enter_search(instance, incumbent, statistics);
        }
    }

    fn on_exit_search(&mut self, statistics: &ExhaustiveStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_exit_search(statistics);
        }
    }

    fn search_command(&mut self, statistics: &ExhaustiveStatistics) -> SearchCommand {
        for monitor in self.monitors.iter_mut() {
            match monitor.search_command(statistics) {
                SearchCommand::Continue => continue,
                command => return command,
            }
        }
        SearchCommand::Continue
    }

    fn on_node(&mut self, depth: usize, statistics: &ExhaustiveStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_node(depth, statistics);
        }
    }

    fn on_prune(&mut self, depth: usize, lower_bound: f64, statistics: &ExhaustiveStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_prune(depth, lower_bound, statistics);
        }
    }

    fn on_solution_found(&mut self, result: &CandidateResult, statistics: &ExhaustiveStatistics) {
        for monitor in self.monitors.iter_mut() {
            monitor.on_solution_found(result, statistics);
        }
    }
}

impl<'a, T> std::fmt::Debug for CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.monitors.iter().map(|m| m.name()).collect();
        f.debug_struct("CompositeTreeSearchMonitor")
            .field("monitors", &names)
            .finish()
    }
}

impl<'a, T> std::fmt::Display for CompositeTreeSearchMonitor<'a, T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CompositeTreeSearchMonitor(")?;
        for (i, monitor) in self.monitors.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", monitor.name())?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::{no_op::NoOperationMonitor, node_limit::NodeLimitMonitor};

    struct CountingMonitor<'c> {
        nodes: &'c mut u64,
    }

    impl<'c> TreeSearchMonitor<u64> for CountingMonitor<'c> {
        fn name(&self) -> &str {
            "CountingMonitor"
        }
        fn on_enter_search(
            &mut self,
            _instance: &Instance<u64>,
            _incumbent: &CandidateResult,
            _statistics: &ExhaustiveStatistics,
        ) {
        }
        fn on_exit_search(&mut self, _statistics: &ExhaustiveStatistics) {}
        fn on_node(&mut self, _depth: usize, _statistics: &ExhaustiveStatistics) {
            *self.nodes += 1;
        }
        fn on_prune(&mut self, _depth: usize, _lower_bound: f64, _statistics: &ExhaustiveStatistics) {}
        fn on_solution_found(&mut self, _result: &CandidateResult, _statistics: &ExhaustiveStatistics) {
        }
    }

    #[test]
    fn test_fans_out_events() {
        let mut first = 0;
        let mut second = 0;
        {
            let mut composite = CompositeTreeSearchMonitor::<u64>::new();
            composite.add_monitor(CountingMonitor { nodes: &mut first });
            composite.add_monitor(CountingMonitor { nodes: &mut second });
            assert_eq!(composite.len(), 2);

            let stats = ExhaustiveStatistics::default();
            composite.on_node(0, &stats);
            composite.on_node(1, &stats);
        }
        assert_eq!(first, 2);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_first_terminate_wins() {
        let mut composite = CompositeTreeSearchMonitor::<u64>::with_capacity(3);
        composite.add_monitor(NoOperationMonitor::new());
        composite.add_monitor(NodeLimitMonitor::new(5));
        composite.add_monitor(NodeLimitMonitor::new(1));

        let stats = ExhaustiveStatistics {
            nodes_explored: 7,
            ..Default::default()
        };
        assert_eq!(
            composite.search_command(&stats),
            SearchCommand::Terminate("node limit of 5 reached".to_string())
        );
    }

    #[test]
    fn test_empty_continues() {
        let mut composite = CompositeTreeSearchMonitor::<u64>::default();
        assert!(composite.is_empty());
        assert_eq!(
            composite.search_command(&ExhaustiveStatistics::default()),
            SearchCommand::Continue
        );
        assert_eq!(composite.to_string(), "CompositeTreeSearchMonitor()");
    }
}
