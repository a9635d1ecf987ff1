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

/// A single storage device of a pool.
///
/// The `rating` measures risk: higher is worse. The cost of a selection
/// only looks at the worst rating among its devices.
/// The device's identity is its position in the pool, see
/// [`DeviceIndex`](crate::index::DeviceIndex).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Device<T> {
    rating: f64,
    capacity: T,
}

impl<T> Device<T>
where
    T: Copy,
{
    /// Creates a new device.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use offboard_model::device::Device;
    ///
    /// let device = Device::new(0.25, 500u64);
    /// assert_eq!(device.capacity(), 500);
    /// assert_eq!(device.rating(), 0.25);
    /// ```
    #[inline]
    pub const fn new(rating: f64, capacity: T) -> Self {
        Self { rating, capacity }
    }

    /// Returns the risk rating of the device.
    #[inline]
    pub const fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the storage capacity of the device.
    #[inline]
    pub const fn capacity(&self) -> T {
        self.capacity
    }
}

impl<T> std::fmt::Display for Device<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Device(rating: {:.3}, capacity: {})",
            self.rating, self.capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Device;

    #[test]
    fn test_accessors() {
        let device = Device::new(0.9, 7u32);
        assert_eq!(device.rating(), 0.9);
        assert_eq!(device.capacity(), 7);
    }

    #[test]
    fn test_display() {
        let device = Device::new(0.5, 5u64);
        assert_eq!(format!("{}", device), "Device(rating: 0.500, capacity: 5)");
    }
}
