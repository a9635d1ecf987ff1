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

use crate::{device::Device, index::DeviceIndex};
use fixedbitset::FixedBitSet;
use num_traits::{PrimInt, Unsigned};
use offboard_core::num::saturating::SaturatingAddVal;

/// Errors raised while validating an [`Instance`].
///
/// These are precondition violations: the strategies assume a validated
/// instance and never see one of these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceError {
    /// The needed volume must be strictly positive.
    NonPositiveVolume,
    /// A device rating is NaN or infinite.
    NonFiniteRating { index: DeviceIndex },
    /// A device capacity was given as a negative number.
    NegativeCapacity { index: DeviceIndex },
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveVolume => write!(f, "The needed volume must be positive"),
            Self::NonFiniteRating { index } => {
                write!(f, "Device {} has a non-finite rating", index.get())
            }
            Self::NegativeCapacity { index } => {
                write!(f, "Device {} has a negative capacity", index.get())
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// Errors reported when a selection does not describe a subset of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// The selection refers to a device outside the pool.
    OutOfBounds { index: DeviceIndex, len: usize },
    /// The selection names the same device twice.
    Duplicate { index: DeviceIndex },
}

impl std::fmt::Display for SelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => write!(
                f,
                "Selected device {} is out of bounds for a pool of {} devices",
                index.get(),
                len
            ),
            Self::Duplicate { index } => {
                write!(f, "Device {} is selected more than once", index.get())
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// A validated device pool together with the volume that has to be kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance<T> {
    devices: Vec<Device<T>>,
    needed_volume: T,
}

impl<T> Instance<T>
where
    T: PrimInt + Unsigned + SaturatingAddVal,
{
    /// Returns the number of devices in the pool.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::instance::InstanceBuilder;
    ///
    /// let mut builder = InstanceBuilder::<u64>::new(10);
    /// builder.add_device(0.1, 5);
    /// builder.add_device(0.5, 5);
    /// let instance = builder.build().unwrap();
    /// assert_eq!(instance.num_devices(), 2);
    /// ```
    #[inline]
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Returns `true` if the pool holds no devices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns the volume the kept devices have to provide.
    #[inline]
    pub fn needed_volume(&self) -> T {
        self.needed_volume
    }

    /// Returns all devices in pool order.
    #[inline]
    pub fn devices(&self) -> &[Device<T>] {
        &self.devices
    }

    /// Returns the device at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_devices()`.
    #[inline]
    pub fn device(&self, index: DeviceIndex) -> &Device<T> {
        let i = index.get();
        debug_assert!(
            i < self.num_devices(),
            "called `Instance::device` with device index out of bounds: the len is {} but the index is {}",
            self.num_devices(),
            i
        );

        &self.devices[i]
    }

    /// Iterates over `(index, device)` pairs in pool order.
    #[inline]
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (DeviceIndex, &Device<T>)> {
        self.devices
            .iter()
            .enumerate()
            .map(|(i, device)| (DeviceIndex::new(i), device))
    }

    /// Returns the saturating sum of all capacities in the pool.
    #[inline]
    pub fn total_capacity(&self) -> T {
        self.devices
            .iter()
            .fold(T::zero(), |acc, d| acc.saturating_add_val(d.capacity()))
    }

    /// Returns the saturating sum of the capacities of the given devices.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::instance::InstanceBuilder;
    /// # use offboard_model::index::DeviceIndex;
    ///
    /// let mut builder = InstanceBuilder::<u64>::new(10);
    /// let a = builder.add_device(0.1, 5);
    /// builder.add_device(0.5, 7);
    /// let c = builder.add_device(0.9, 9);
    /// let instance = builder.build().unwrap();
    /// assert_eq!(instance.capacity_of(&[a, c]), 14);
    /// ```
    #[inline]
    pub fn capacity_of(&self, selection: &[DeviceIndex]) -> T {
        selection.iter().fold(T::zero(), |acc, &index| {
            acc.saturating_add_val(self.device(index).capacity())
        })
    }

    /// Returns the worst (largest) rating among the given devices,
    /// or negative infinity for an empty selection.
    #[inline]
    pub fn worst_rating_of(&self, selection: &[DeviceIndex]) -> f64 {
        selection
            .iter()
            .map(|&index| self.device(index).rating())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Checks that `selection` names distinct devices of this pool.
    pub fn check_selection(&self, selection: &[DeviceIndex]) -> Result<(), SelectionError> {
        let len = self.num_devices();
        let mut seen = FixedBitSet::with_capacity(len);
        for &index in selection {
            if index.get() >= len {
                return Err(SelectionError::OutOfBounds { index, len });
            }
            if seen.put(index.get()) {
                return Err(SelectionError::Duplicate { index });
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Display for Instance<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance(devices: {}, needed_volume: {})",
            self.devices.len(),
            self.needed_volume
        )
    }
}

/// Collects devices and validates them into an [`Instance`].
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceBuilder<T> {
    devices: Vec<Device<T>>,
    needed_volume: T,
}

impl<T> InstanceBuilder<T>
where
    T: PrimInt + Unsigned + SaturatingAddVal,
{
    /// Creates an empty builder for the given needed volume.
    #[inline]
    pub fn new(needed_volume: T) -> Self {
        Self {
            devices: Vec::new(),
            needed_volume,
        }
    }

    /// Creates an empty builder with room for `capacity` devices.
    #[inline]
    pub fn with_capacity(needed_volume: T, capacity: usize) -> Self {
        Self {
            devices: Vec::with_capacity(capacity),
            needed_volume,
        }
    }

    /// Appends a device and returns its index in the pool.
    #[inline]
    pub fn add_device(&mut self, rating: f64, capacity: T) -> DeviceIndex {
        let index = DeviceIndex::new(self.devices.len());
        self.devices.push(Device::new(rating, capacity));
        index
    }

    /// Appends every device yielded by `devices`.
    #[inline]
    pub fn extend_devices<I>(&mut self, devices: I)
    where
        I: IntoIterator<Item = Device<T>>,
    {
        self.devices.extend(devices);
    }

    /// Returns the number of devices added so far.
    #[inline]
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Validates the collected pool.
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError::NonPositiveVolume`] if the needed volume is zero
    /// and [`InstanceError::NonFiniteRating`] for the first device whose rating
    /// is NaN or infinite.
    pub fn build(self) -> Result<Instance<T>, InstanceError> {
        if self.needed_volume.is_zero() {
            return Err(InstanceError::NonPositiveVolume);
        }

        if let Some(position) = self.devices.iter().position(|d| !d.rating().is_finite()) {
            return Err(InstanceError::NonFiniteRating {
                index: DeviceIndex::new(position),
            });
        }

        Ok(Instance {
            devices: self.devices,
            needed_volume: self.needed_volume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn di(i: usize) -> DeviceIndex {
        DeviceIndex::new(i)
    }

    fn three_fives() -> Instance<u64> {
        let mut builder = InstanceBuilder::new(10);
        builder.add_device(0.1, 5);
        builder.add_device(0.5, 5);
        builder.add_device(0.9, 5);
        builder.build().expect("valid instance")
    }

    #[test]
    fn test_build_rejects_zero_volume() {
        let mut builder = InstanceBuilder::<u32>::new(0);
        builder.add_device(0.1, 5);
        assert_eq!(builder.build(), Err(InstanceError::NonPositiveVolume));
    }

    #[test]
    fn test_build_rejects_non_finite_ratings() {
        let mut builder = InstanceBuilder::<u32>::new(10);
        builder.add_device(0.1, 5);
        builder.add_device(f64::NAN, 5);
        builder.add_device(f64::INFINITY, 5);
        assert_eq!(
            builder.build(),
            Err(InstanceError::NonFiniteRating { index: di(1) })
        );
    }

    #[test]
    fn test_empty_pool_is_valid() {
        let instance = InstanceBuilder::<u64>::new(3).build().unwrap();
        assert!(instance.is_empty());
        assert_eq!(instance.total_capacity(), 0);
    }

    #[test]
    fn test_aggregates() {
        let instance = three_fives();
        assert_eq!(instance.num_devices(), 3);
        assert_eq!(instance.needed_volume(), 10);
        assert_eq!(instance.total_capacity(), 15);
        assert_eq!(instance.capacity_of(&[di(0), di(2)]), 10);
        assert_eq!(instance.worst_rating_of(&[di(0), di(1)]), 0.5);
        assert_eq!(instance.worst_rating_of(&[]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_total_capacity_saturates() {
        let mut builder = InstanceBuilder::<u8>::new(10);
        builder.add_device(0.1, 200);
        builder.add_device(0.1, 200);
        let instance = builder.build().unwrap();
        assert_eq!(instance.total_capacity(), u8::MAX);
    }

    #[test]
    fn test_iter_yields_pool_order() {
        let instance = three_fives();
        let ratings: Vec<(usize, f64)> = instance
            .iter()
            .map(|(i, d)| (i.get(), d.rating()))
            .collect();
        assert_eq!(ratings, vec![(0, 0.1), (1, 0.5), (2, 0.9)]);
    }

    #[test]
    fn test_check_selection() {
        let instance = three_fives();
        assert_eq!(instance.check_selection(&[]), Ok(()));
        assert_eq!(instance.check_selection(&[di(2), di(0)]), Ok(()));
        assert_eq!(
            instance.check_selection(&[di(0), di(3)]),
            Err(SelectionError::OutOfBounds { index: di(3), len: 3 })
        );
        assert_eq!(
            instance.check_selection(&[di(1), di(2), di(1)]),
            Err(SelectionError::Duplicate { index: di(1) })
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            InstanceError::NegativeCapacity { index: di(4) }.to_string(),
            "Device 4 has a negative capacity"
        );
        assert_eq!(
            SelectionError::Duplicate { index: di(2) }.to_string(),
            "Device 2 is selected more than once"
        );
    }
}
