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

//! Seeded synthetic device pools.
//!
//! Ratings follow a cubic curve over eleven discrete health grades,
//! so most generated devices are either healthy or clearly worn.
//! The generator is deterministic for a given seed and is only one of many
//! possible pool providers: nothing in the strategies depends on it.

use crate::{
    device::Device,
    instance::{Instance, InstanceBuilder, InstanceError},
};
use num_traits::{PrimInt, Unsigned};
use offboard_core::num::saturating::SaturatingAddVal;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of discrete health grades; grade `HEALTH_GRADES` maps to rating 0.
const HEALTH_GRADES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolGenerator {
    seed: u64,
    min_capacity: u64,
    max_capacity: u64,
}

impl Default for PoolGenerator {
    fn default() -> Self {
        Self {
            seed: 66282,
            min_capacity: 0,
            max_capacity: 100_000,
        }
    }
}

impl PoolGenerator {
    /// Creates a generator with the default seed and capacities in `[0, 100_000)`.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seed of the pseudo-random source.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the half-open capacity range `[min, max)`.
    ///
    /// # Panics
    ///
    /// Panics if `min >= max`.
    #[inline]
    pub fn with_capacity_range(mut self, min: u64, max: u64) -> Self {
        assert!(
            min < max,
            "called `PoolGenerator::with_capacity_range` with an empty range: {}..{}",
            min,
            max
        );
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    /// Generates `count` devices.
    ///
    /// Capacities that do not fit into `T` are clamped to `T::max_value()`.
    pub fn devices<T>(&self, count: usize) -> Vec<Device<T>>
    where
        T: PrimInt + Unsigned,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..count)
            .map(|_| {
                let grade = rng.random_range(0..=HEALTH_GRADES);
                let capacity = rng.random_range(self.min_capacity..self.max_capacity);
                Device::new(
                    grade_rating(grade),
                    num_traits::cast::<u64, T>(capacity).unwrap_or_else(T::max_value),
                )
            })
            .collect()
    }

    /// Generates `count` devices and wraps them into a validated instance.
    pub fn instance<T>(&self, count: usize, needed_volume: T) -> Result<Instance<T>, InstanceError>
    where
        T: PrimInt + Unsigned + SaturatingAddVal,
    {
        let mut builder = InstanceBuilder::with_capacity(needed_volume, count);
        builder.extend_devices(self.devices(count));
        builder.build()
    }
}

#[inline]
fn grade_rating(grade: u32) -> f64 {
    let r = HEALTH_GRADES as f64;
    let f = (r - grade as f64) / (r - 1.0);
    f * f * f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_pool() {
        let a = PoolGenerator::new().with_seed(7).devices::<u64>(64);
        let b = PoolGenerator::new().with_seed(7).devices::<u64>(64);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_pool() {
        let a = PoolGenerator::new().with_seed(1).devices::<u64>(64);
        let b = PoolGenerator::new().with_seed(2).devices::<u64>(64);
        assert_ne!(a, b);
    }

    #[test]
    fn test_capacities_respect_range() {
        let devices = PoolGenerator::new()
            .with_capacity_range(10, 20)
            .devices::<u32>(500);
        assert!(devices.iter().all(|d| (10..20).contains(&d.capacity())));
    }

    #[test]
    fn test_ratings_lie_on_grade_curve() {
        let devices = PoolGenerator::new().devices::<u64>(500);
        let max = grade_rating(0);
        assert!(devices.iter().all(|d| (0.0..=max).contains(&d.rating())));
        assert_eq!(grade_rating(HEALTH_GRADES), 0.0);
        assert!((grade_rating(1) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_capacity_is_clamped_to_type() {
        let devices = PoolGenerator::new()
            .with_capacity_range(1_000, 2_000)
            .devices::<u8>(16);
        assert!(devices.iter().all(|d| d.capacity() == u8::MAX));
    }

    #[test]
    fn test_instance_is_validated() {
        let instance = PoolGenerator::new().instance::<u64>(10, 500).unwrap();
        assert_eq!(instance.num_devices(), 10);
        assert!(PoolGenerator::new().instance::<u64>(10, 0).is_err());
    }
}
