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

use crate::{monitor::tree_search_monitor::TreeSearchMonitor, stats::ExhaustiveStatistics};
use offboard_model::instance::Instance;
use offboard_search::{num::CapacityNumeric, result::CandidateResult};
use std::time::{Duration, Instant};

/// Emits a progress table through the `log` facade at `info` level.
///
/// The clock is only read on nodes whose count matches `clock_check_mask`,
/// which keeps the monitor cheap on large trees.
#[derive(Debug, Clone)]
pub struct LogMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    best_cost: Option<f64>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> LogMonitor<T> {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        Self {
            start_time: Instant::now(),
            last_log_time: Instant::now(),
            log_interval,
            clock_check_mask,
            best_cost: None,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Returns the cost of the best selection seen during the last search.
    #[inline]
    pub fn best_cost(&self) -> Option<f64> {
        self.best_cost
    }

    #[inline(always)]
    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10}",
            "Elapsed",
            "Nodes",
            "Depth",
            "Best Cost",
            "Pruned (Bound)",
            "Dead Ends"
        );
    }

    #[inline(always)]
    fn log_line(&mut self, depth: usize, stats: &ExhaustiveStatistics) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.start_time).as_secs_f32();

        let best_cost = match self.best_cost {
            Some(cost) => format!("{:.6}", cost),
            None => "Inf".to_string(),
        };

        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<14} | {:<14} | {:<10}",
            format!("{:.1}s", elapsed),
            stats.nodes_explored,
            depth,
            best_cost,
            stats.prunings_bound,
            stats.dead_ends
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogMonitor<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogMonitor<T>
where
    T: CapacityNumeric,
{
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter_search(
        &mut self,
        instance: &Instance<T>,
        incumbent: &CandidateResult,
        _statistics: &ExhaustiveStatistics,
    ) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.best_cost = incumbent.is_feasible().then_some(incumbent.cost());
        log::info!("Exhaustive search started on {}", instance);
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &ExhaustiveStatistics) {
        log::info!(
            "Exhaustive search finished after {} nodes in {:.2?}",
            statistics.nodes_explored,
            statistics.time_total
        );
    }

    fn on_node(&mut self, depth: usize, statistics: &ExhaustiveStatistics) {
        if (statistics.nodes_explored & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(depth, statistics);
        }
    }

    fn on_prune(&mut self, _depth: usize, _lower_bound: f64, _statistics: &ExhaustiveStatistics) {}

    fn on_solution_found(&mut self, result: &CandidateResult, _statistics: &ExhaustiveStatistics) {
        self.best_cost = Some(result.cost());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};

    #[test]
    fn test_tracks_best_cost_and_resets() {
        let mut builder = InstanceBuilder::<u64>::new(10);
        builder.add_device(0.1, 10);
        let instance = builder.build().unwrap();
        let stats = ExhaustiveStatistics::default();
        let infeasible = CandidateResult::infeasible();

        let mut monitor = LogMonitor::<u64>::default();
        monitor.on_enter_search(&instance, &infeasible, &stats);
        assert_eq!(monitor.best_cost(), None);

        let result = CandidateResult::new(1.1, vec![DeviceIndex::new(0)]);
        monitor.on_solution_found(&result, &stats);
        assert_eq!(monitor.best_cost(), Some(1.1));

        monitor.on_enter_search(&instance, &infeasible, &stats);
        assert_eq!(monitor.best_cost(), None);
    }

    #[test]
    fn test_starts_from_seeded_incumbent() {
        let mut builder = InstanceBuilder::<u64>::new(10);
        builder.add_device(0.1, 10);
        builder.add_device(0.4, 3);
        let instance = builder.build().unwrap();
        let stats = ExhaustiveStatistics::default();

        let mut monitor = LogMonitor::<u64>::default();
        let seed = CandidateResult::new(1.1, vec![DeviceIndex::new(0)]);
        monitor.on_enter_search(&instance, &seed, &stats);
        assert_eq!(monitor.best_cost(), Some(1.1));
    }

    #[test]
    fn test_display() {
        let monitor = LogMonitor::<u64>::new(Duration::from_secs(5), 1023);
        assert_eq!(
            monitor.to_string(),
            "LogMonitor(log_interval: 5s, clock_check_mask: 1023)"
        );
    }
}
