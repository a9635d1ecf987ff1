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

//! Splitting a pool into big and normal devices.
//!
//! A device is *big* if its capacity alone reaches the needed volume. Any
//! selection containing a big device and something else is dominated by the
//! big device on its own (less overshoot, no worse rating), so the
//! strategies only combine normal devices and compare their answer against
//! the best single big device at the end.

use crate::{cost::CostModel, num::CapacityNumeric, result::CandidateResult};
use log::debug;
use offboard_model::{index::DeviceIndex, instance::Instance};

#[derive(Debug, Clone, PartialEq)]
pub struct DevicePartition {
    big: Vec<DeviceIndex>,
    normal: Vec<DeviceIndex>,
    best_big: CandidateResult,
}

impl DevicePartition {
    /// Partitions `instance` and scores its best big device.
    ///
    /// Both partitions keep pool order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};
    /// # use offboard_search::{cost::CostModel, partition::DevicePartition};
    ///
    /// let mut builder = InstanceBuilder::<u64>::new(10);
    /// builder.add_device(0.1, 5);
    /// builder.add_device(0.7, 12);
    /// let instance = builder.build().unwrap();
    ///
    /// let partition = DevicePartition::new(&instance, &CostModel::default());
    /// assert_eq!(partition.big(), &[DeviceIndex::new(1)]);
    /// assert_eq!(partition.normal(), &[DeviceIndex::new(0)]);
    /// ```
    pub fn new<T>(instance: &Instance<T>, cost_model: &CostModel) -> Self
    where
        T: CapacityNumeric,
    {
        let needed = instance.needed_volume();
        let (big, normal): (Vec<DeviceIndex>, Vec<DeviceIndex>) = instance
            .iter()
            .map(|(index, _)| index)
            .partition(|&index| instance.device(index).capacity() >= needed);

        let best_big = best_big_device(instance, cost_model, &big);

        debug!(
            "partitioned {} devices: {} big, {} normal, best big device cost {}",
            instance.num_devices(),
            big.len(),
            normal.len(),
            best_big.cost()
        );

        Self {
            big,
            normal,
            best_big,
        }
    }

    /// Returns the devices whose capacity alone reaches the needed volume.
    #[inline]
    pub fn big(&self) -> &[DeviceIndex] {
        &self.big
    }

    /// Returns the devices that have to be combined with others.
    #[inline]
    pub fn normal(&self) -> &[DeviceIndex] {
        &self.normal
    }

    /// Returns the cheapest single big device, or the infeasible sentinel.
    #[inline]
    pub fn best_big(&self) -> &CandidateResult {
        &self.best_big
    }
}

/// Returns the cheapest of the given big devices as a one-device selection.
/// The first device wins on ties.
fn best_big_device<T>(
    instance: &Instance<T>,
    cost_model: &CostModel,
    big: &[DeviceIndex],
) -> CandidateResult
where
    T: CapacityNumeric,
{
    big.iter()
        .map(|&index| {
            let device = instance.device(index);
            let cost = cost_model.cost(device.capacity(), instance.needed_volume(), device.rating());
            CandidateResult::new(cost, vec![index])
        })
        .fold(CandidateResult::infeasible(), CandidateResult::unite)
}
