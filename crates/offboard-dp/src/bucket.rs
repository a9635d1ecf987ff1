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

//! Scaling and bucketing of the normal devices.
//!
//! Every capacity is divided by a common `scale`. A device whose scaled
//! capacity is at least one becomes a bucket of its own. Devices that scale
//! to zero are sorted by ascending rating and merged one after another into a
//! running bucket, which is emitted as soon as its scaled capacity becomes
//! positive. A running bucket that never gets there is merged into the last
//! bucket, or kept as the only bucket if there is none.
//!
//! Devices without capacity are left out, since they can only raise the
//! worst rating of a selection.
//!
//! Merging at most one small device past the threshold keeps every merged
//! bucket below twice the scale, so its scaled capacity is at most one
//! (two after absorbing the leftover).

use log::debug;
use offboard_core::utils::index::{TypedIndex, TypedIndexTag};
use offboard_model::{device::Device, index::DeviceIndex, instance::Instance};
use offboard_search::{num::CapacityNumeric, partition::DevicePartition};
use smallvec::SmallVec;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BucketIndexTag;

impl TypedIndexTag for BucketIndexTag {
    const NAME: &'static str = "BucketIndex";
}

/// The position of a bucket in the list produced by the [`Bucketizer`].
pub type BucketIndex = TypedIndex<BucketIndexTag>;

/// Returns the scale that keeps the dynamic program within `operation_budget`.
///
/// `max(1, needed · num_devices / operation_budget)`, computed in `u128` so
/// the product cannot overflow.
///
/// # Examples
///
/// ```rust
/// # use offboard_dp::bucket::scale_for;
///
/// assert_eq!(scale_for(10u64, 3, 100_000_000), 1);
/// assert_eq!(scale_for(1_000u64, 10, 100), 100);
/// ```
pub fn scale_for<T>(needed: T, num_devices: usize, operation_budget: u64) -> u128
where
    T: CapacityNumeric,
{
    let needed = needed.to_u128().unwrap_or(u128::MAX);
    let num_devices = num_devices as u128;
    let budget = u128::from(operation_budget.max(1));
    (needed.saturating_mul(num_devices) / budget).max(1)
}

/// Divides `capacity` by `scale`, rounding down.
#[inline]
pub fn scaled_capacity<T>(capacity: T, scale: u128) -> usize
where
    T: CapacityNumeric,
{
    let capacity = capacity.to_u128().unwrap_or(u128::MAX);
    usize::try_from(capacity / scale.max(1)).unwrap_or(usize::MAX)
}

/// One or more devices treated as a single item by the dynamic program.
///
/// Capacity is the sum and rating the maximum of its devices. The devices
/// keep the order in which they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<T> {
    capacity: T,
    rating: f64,
    scaled_capacity: usize,
    devices: SmallVec<[DeviceIndex; 4]>,
}

impl<T> Bucket<T>
where
    T: CapacityNumeric,
{
    fn empty() -> Self {
        Self {
            capacity: T::zero(),
            rating: f64::NEG_INFINITY,
            scaled_capacity: 0,
            devices: SmallVec::new(),
        }
    }

    fn single(index: DeviceIndex, device: &Device<T>, scale: u128) -> Self {
        let mut bucket = Self::empty();
        bucket.push_device(index, device, scale);
        bucket
    }

    fn push_device(&mut self, index: DeviceIndex, device: &Device<T>, scale: u128) {
        self.capacity = self.capacity.saturating_add_val(device.capacity());
        self.rating = self.rating.max(device.rating());
        self.scaled_capacity = scaled_capacity(self.capacity, scale);
        self.devices.push(index);
    }

    fn absorb(&mut self, other: Bucket<T>, scale: u128) {
        self.capacity = self.capacity.saturating_add_val(other.capacity);
        self.rating = self.rating.max(other.rating);
        self.scaled_capacity = scaled_capacity(self.capacity, scale);
        self.devices.extend(other.devices);
    }

    /// Returns the exact summed capacity.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Returns the worst rating among the devices.
    #[inline]
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the summed capacity divided by the scale, rounded down.
    #[inline]
    pub fn scaled_capacity(&self) -> usize {
        self.scaled_capacity
    }

    #[inline]
    pub fn devices(&self) -> &[DeviceIndex] {
        &self.devices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl<T> std::fmt::Display for Bucket<T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bucket(capacity: {}, scaled: {}, rating: {:.3}, devices: {})",
            self.capacity,
            self.scaled_capacity,
            self.rating,
            self.devices.len()
        )
    }
}

/// Builds the bucket list for one scale. Reuses its buffers across runs.
#[derive(Debug, Clone)]
pub struct Bucketizer<T> {
    buckets: Vec<Bucket<T>>,
    small: Vec<(DeviceIndex, Device<T>)>,
}

impl<T> Default for Bucketizer<T>
where
    T: CapacityNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bucketizer<T>
where
    T: CapacityNumeric,
{
    #[inline]
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            small: Vec::new(),
        }
    }

    #[inline]
    pub fn preallocated(num_devices: usize) -> Self {
        Self {
            buckets: Vec::with_capacity(num_devices),
            small: Vec::with_capacity(num_devices),
        }
    }

    /// Buckets the normal devices of `partition` under `scale`.
    ///
    /// Single-device buckets come first in pool order, followed by the
    /// merged buckets in rating order.
    pub fn bucketize(
        &mut self,
        instance: &Instance<T>,
        partition: &DevicePartition,
        scale: u128,
    ) -> &[Bucket<T>] {
        self.buckets.clear();
        self.small.clear();

        for &index in partition.normal() {
            let device = instance.device(index);
            // Never adds capacity, only risk.
            if device.capacity() == T::zero() {
                continue;
            }
            if scaled_capacity(device.capacity(), scale) == 0 {
                self.small.push((index, *device));
            } else {
                self.buckets.push(Bucket::single(index, device, scale));
            }
        }

        self.small
            .sort_by(|(_, a), (_, b)| a.rating().total_cmp(&b.rating()));

        let mut running = Bucket::empty();
        for (index, device) in self.small.iter() {
            running.push_device(*index, device, scale);
            if running.scaled_capacity() > 0 {
                self.buckets
                    .push(std::mem::replace(&mut running, Bucket::empty()));
            }
        }

        if !running.is_empty() {
            match self.buckets.last_mut() {
                Some(last) => last.absorb(running, scale),
                None => self.buckets.push(running),
            }
        }

        debug!(
            "bucketized {} normal devices into {} buckets at scale {} ({} small devices merged)",
            partition.normal().len(),
            self.buckets.len(),
            scale,
            self.small.len()
        );

        &self.buckets
    }

    /// Returns the buckets of the last run.
    #[inline]
    pub fn buckets(&self) -> &[Bucket<T>] {
        &self.buckets
    }

    /// Returns how many devices were merged in the last run.
    #[inline]
    pub fn merged_small_devices(&self) -> usize {
        self.small.len()
    }
}
