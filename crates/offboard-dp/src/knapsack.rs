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

//! The scaled 0/1 knapsack.
//!
//! `states[j]` holds the smallest worst rating of any bucket subset whose
//! scaled capacities sum to exactly `j`, together with the bucket applied
//! last. The table spans `[0, 2 · scaled_volume)`; sources are only taken
//! below the scaled volume, so every subset the table records is minimal in
//! the sense that dropping its last bucket falls short. Buckets are applied
//! one at a time with sources visited from high to low, so each bucket is
//! used at most once per subset.
//!
//! A state may be improved again after a later state was derived from it,
//! so the predecessors alone do not identify the subset behind a target.
//! Every improvement is therefore also recorded per bucket, and the walk
//! back from the target visits the buckets in reverse application order.

use crate::{
    bucket::{BucketIndex, Bucketizer, scale_for},
    stats::DynamicProgramStatistics,
};
use fixedbitset::FixedBitSet;
use log::debug;
use offboard_model::{index::DeviceIndex, instance::Instance};
use offboard_search::{
    cost::CostModel, num::CapacityNumeric, partition::DevicePartition, result::CandidateResult,
};

/// One entry of the state table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpState {
    /// `+inf` if unreachable, `-inf` for the empty subset.
    pub best_worst_rating: f64,
    /// The bucket whose addition produced this state.
    pub predecessor: Option<BucketIndex>,
}

impl DpState {
    pub const UNREACHABLE: DpState = DpState {
        best_worst_rating: f64::INFINITY,
        predecessor: None,
    };

    pub const ORIGIN: DpState = DpState {
        best_worst_rating: f64::NEG_INFINITY,
        predecessor: None,
    };

    #[inline]
    pub fn is_reachable(&self) -> bool {
        self.best_worst_rating < f64::INFINITY
    }
}

/// Result of one dynamic program run.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicProgramOutcome {
    result: CandidateResult,
    statistics: DynamicProgramStatistics,
}

impl DynamicProgramOutcome {
    #[inline]
    pub fn new(result: CandidateResult, statistics: DynamicProgramStatistics) -> Self {
        Self { result, statistics }
    }

    /// Returns the selection, already compared against the best big device.
    #[inline]
    pub fn result(&self) -> &CandidateResult {
        &self.result
    }

    #[inline]
    pub fn statistics(&self) -> &DynamicProgramStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_parts(self) -> (CandidateResult, DynamicProgramStatistics) {
        (self.result, self.statistics)
    }
}

impl std::fmt::Display for DynamicProgramOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DynamicProgramOutcome(result: {})", self.result)
    }
}

/// The scaled knapsack engine. Reuses its table and buffers across runs.
#[derive(Debug, Clone)]
pub struct ScaledKnapsack<T> {
    bucketizer: Bucketizer<T>,
    states: Vec<DpState>,
    improvements: FixedBitSet,
}

impl<T> Default for ScaledKnapsack<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ScaledKnapsack<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            bucketizer: Bucketizer::new(),
            states: Vec::new(),
            improvements: FixedBitSet::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            bucketizer: Bucketizer::preallocated(num_devices),
            states: Vec::new(),
            improvements: FixedBitSet::new(),
        }
    }

    /// Returns the state table of the last run.
    #[inline]
    pub fn states(&self) -> &[DpState] {
        &self.states
    }

    /// Solves the scaled knapsack on the normal partition of `instance`.
    ///
    /// The scale is chosen from the needed volume, the size of the whole
    /// pool and `operation_budget`. The reconstructed selection is scored
    /// on exact capacities and compared against the best big device, which
    /// wins ties.
    ///
    /// If the buckets together cannot reach the scaled volume, the table is
    /// never built and the best big device is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_dp::knapsack::ScaledKnapsack;
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
    /// let outcome = ScaledKnapsack::new().solve(&instance, &cost_model, &partition, 100_000_000);
    ///
    /// assert_eq!(outcome.result().cost(), 1.5);
    /// assert_eq!(outcome.result().selected(), &[DeviceIndex::new(0), DeviceIndex::new(1)]);
    /// ```
    pub fn solve(
        &mut self,
        instance: &Instance<T>,
        cost_model: &CostModel,
        partition: &DevicePartition,
        operation_budget: u64,
    ) -> DynamicProgramOutcome {
        let start_time = std::time::Instant::now();
        let needed = instance.needed_volume();
        let scale = scale_for(needed, instance.num_devices(), operation_budget);

        let needed_units = needed.to_u128().unwrap_or(u128::MAX);
        let scaled_volume =
            usize::try_from(needed_units.div_ceil(scale)).unwrap_or(usize::MAX / 2);

        self.bucketizer.bucketize(instance, partition, scale);
        let buckets = self.bucketizer.buckets();

        let mut stats = DynamicProgramStatistics {
            scale,
            scaled_volume,
            buckets: buckets.len(),
            merged_small_devices: self.bucketizer.merged_small_devices(),
            ..Default::default()
        };

        self.states.clear();
        self.improvements.clear();

        let total_scaled = buckets
            .iter()
            .fold(0usize, |acc, bucket| acc.saturating_add(bucket.scaled_capacity()));
        if total_scaled < scaled_volume {
            debug!(
                "dynamic program skipped: buckets hold {} of {} scaled units",
                total_scaled, scaled_volume
            );
            stats.set_total_time(start_time.elapsed());
            return DynamicProgramOutcome::new(partition.best_big().clone(), stats);
        }

        self.states
            .resize(scaled_volume.saturating_mul(2), DpState::UNREACHABLE);
        if let Some(origin) = self.states.first_mut() {
            *origin = DpState::ORIGIN;
        }

        let width = self.states.len();
        self.improvements.grow(buckets.len().saturating_mul(width));

        for (b, bucket) in buckets.iter().enumerate() {
            let step = bucket.scaled_capacity();
            if step == 0 {
                continue;
            }
            for j in (0..scaled_volume).rev() {
                let source = self.states[j];
                if !source.is_reachable() {
                    continue;
                }
                let Some(target) = self.states.get_mut(j + step) else {
                    continue;
                };
                let candidate = source.best_worst_rating.max(bucket.rating());
                if candidate < target.best_worst_rating {
                    *target = DpState {
                        best_worst_rating: candidate,
                        predecessor: Some(BucketIndex::new(b)),
                    };
                    self.improvements.insert(b * width + j + step);
                    stats.on_transition();
                }
            }
        }

        let mut best_target: Option<(usize, f64)> = None;
        for (j, state) in self.states.iter().enumerate().skip(scaled_volume) {
            if !state.is_reachable() {
                continue;
            }
            stats.on_reachable_target();
            let cost = cost_model.cost(j, scaled_volume, state.best_worst_rating);
            if best_target.is_none_or(|(_, best_cost)| cost < best_cost) {
                best_target = Some((j, cost));
            }
        }

        let dynamic = match best_target {
            Some((target, scaled_cost)) => {
                debug!(
                    "dynamic program reached scaled capacity {} of {} with scaled cost {}",
                    target, scaled_volume, scaled_cost
                );
                let selected = self.reconstruct(target);
                CandidateResult::score(instance, cost_model, selected)
            }
            None => {
                debug!(
                    "dynamic program reached no scaled capacity at or above {}",
                    scaled_volume
                );
                CandidateResult::infeasible()
            }
        };

        let result = partition.best_big().clone().unite(dynamic);
        stats.set_total_time(start_time.elapsed());
        DynamicProgramOutcome::new(result, stats)
    }

    /// Walks back from `target` and expands the buckets on the way into
    /// device indices.
    ///
    /// Starting at the last bucket that improved `target`, every bucket that
    /// improved the current state is taken and its scaled capacity removed,
    /// until the origin is reached.
    fn reconstruct(&self, target: usize) -> Vec<DeviceIndex> {
        let buckets = self.bucketizer.buckets();
        let width = self.states.len();
        let mut selected = Vec::new();

        let Some(last) = self.states.get(target).and_then(|state| state.predecessor) else {
            return selected;
        };

        let mut current = target;
        for b in (0..=last.get()).rev() {
            if current == 0 {
                break;
            }
            if !self.improvements.contains(b * width + current) {
                continue;
            }
            let bucket = &buckets[b];
            selected.extend_from_slice(bucket.devices());
            match current.checked_sub(bucket.scaled_capacity()) {
                Some(previous) => current = previous,
                None => break,
            }
        }
        selected
    }
}
