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

use offboard_core::num::saturating::SaturatingAddVal;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GreedyStatistics {
    /// Number of normal devices the selector ordered by rating.
    pub devices_considered: usize,
    /// Length of the rating-ordered prefix that first reached the needed volume.
    pub prefix_length: usize,
    /// Number of devices removed from the prefix by the trim pass.
    pub trimmed_devices: usize,
    /// Total time spent selecting.
    pub time_total: Duration,
}

impl GreedyStatistics {
    #[inline]
    pub fn on_prefix_device(&mut self) {
        self.prefix_length = self.prefix_length.saturating_add_val(1);
    }

    #[inline]
    pub fn on_device_trimmed(&mut self) {
        self.trimmed_devices = self.trimmed_devices.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for GreedyStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Greedy Statistics:")?;
        writeln!(f, "  Devices considered:   {}", self.devices_considered)?;
        writeln!(f, "  Prefix length:        {}", self.prefix_length)?;
        writeln!(f, "  Trimmed devices:      {}", self.trimmed_devices)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}
