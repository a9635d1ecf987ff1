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

//! Rating-ordered greedy selection with a capacity trim pass.
//!
//! 1. The normal devices are stable-sorted by ascending rating.
//! 2. The shortest prefix of that order reaching the needed volume is taken.
//!    If the whole order stays short of it, the greedy selection is infeasible.
//! 3. The prefix is stable-sorted by descending capacity, and devices are
//!    dropped from its tail while the remaining capacity still reaches the
//!    needed volume. The pass stops at the first device whose removal would
//!    break feasibility, even if a smaller one further up could still go.
//! 4. The trimmed selection is scored exactly and compared against the best
//!    big device, which wins ties.
//!
//! Trimming never raises the worst rating and never increases the overshoot,
//! so it never makes the selection more expensive.

use crate::stats::GreedyStatistics;
use log::debug;
use offboard_model::{device::Device, index::DeviceIndex, instance::Instance};
use offboard_search::{
    cost::CostModel, num::CapacityNumeric, partition::DevicePartition, result::CandidateResult,
};

/// Result of one greedy run.
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyOutcome {
    result: CandidateResult,
    statistics: GreedyStatistics,
}

impl GreedyOutcome {
    #[inline]
    pub fn new(result: CandidateResult, statistics: GreedyStatistics) -> Self {
        Self { result, statistics }
    }

    /// Returns the selection, already compared against the best big device.
    #[inline]
    pub fn result(&self) -> &CandidateResult {
        &self.result
    }

    #[inline]
    pub fn statistics(&self) -> &GreedyStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(self) -> (CandidateResult, GreedyStatistics) {
        (self.result, self.statistics)
    }
}

impl std::fmt::Display for GreedyOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GreedyOutcome(result: {})", self.result)
    }
}

/// The greedy selector. Reuses its ordering buffer across runs.
#[derive(Debug, Clone)]
pub struct GreedySelector<T> {
    order: Vec<(DeviceIndex, Device<T>)>,
}

impl<T> Default for GreedySelector<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GreedySelector<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self { order: Vec::new() }
    }

    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            order: Vec::with_capacity(num_devices),
        }
    }

    /// Runs the greedy selection on the normal partition of `instance`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_greedy::greedy::GreedySelector;
    /// # use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};
    /// # use offboard_search::{cost::CostModel, partition::DevicePartition};
    ///
    /// let mut builder = InstanceBuilder::<u64>::new(10);
    /// builder.add_device(0.1, 5);
    /// builder.add_device(0.5, 5);
    /// builder.add_device(0.9, 5);
    /// let instance = builder.build().unwrap();
    ///
    /// let cost_model = CostModel::default();
    /// let partition = DevicePartition::new(&instance, &cost_model);
    /// let outcome = GreedySelector::new().select(&instance, &cost_model, &partition);
    ///
    /// assert_eq!(outcome.result().cost(), 1.5);
    /// assert_eq!(outcome.result().selected(), &[DeviceIndex::new(0), DeviceIndex::new(1)]);
    /// ```
    pub fn select(
        &mut self,
        instance: &Instance<T>,
        cost_model: &CostModel,
        partition: &DevicePartition,
    ) -> GreedyOutcome {
        let start_time = std::time::Instant::now();
        let needed = instance.needed_volume();
        let mut stats = GreedyStatistics {
            devices_considered: partition.normal().len(),
            ..Default::default()
        };

        self.order.clear();
        self.order.extend(
            partition
                .normal()
                .iter()
                .map(|&index| (index, *instance.device(index))),
        );
        self.order
            .sort_by(|(_, a), (_, b)| a.rating().total_cmp(&b.rating()));

        let mut total = T::zero();
        for (_, device) in self.order.iter() {
            if total >= needed {
                break;
            }
            total = total.saturating_add_val(device.capacity());
            stats.on_prefix_device();
        }

        let greedy = if total < needed {
            debug!(
                "greedy prefix exhausted {} normal devices below the needed volume {}",
                self.order.len(),
                needed
            );
            CandidateResult::infeasible()
        } else {
            let prefix = &mut self.order[..stats.prefix_length];
            prefix.sort_by(|(_, a), (_, b)| b.capacity().cmp(&a.capacity()));

            let mut kept = prefix.len();
            while kept > 0 {
                let remaining = total.saturating_sub_val(prefix[kept - 1].1.capacity());
                if remaining < needed {
                    break;
                }
                total = remaining;
                kept -= 1;
                stats.on_device_trimmed();
            }

            debug!(
                "greedy prefix of {} devices trimmed by {}",
                stats.prefix_length, stats.trimmed_devices
            );

            let selected = prefix[..kept].iter().map(|&(index, _)| index).collect();
            CandidateResult::score(instance, cost_model, selected)
        };

        let result = partition.best_big().clone().unite(greedy);
        stats.set_total_time(start_time.elapsed());
        GreedyOutcome::new(result, stats)
    }
}
