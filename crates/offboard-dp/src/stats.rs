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
pub struct DynamicProgramStatistics {
    /// The divisor applied to every capacity.
    pub scale: u128,
    /// The needed volume in scaled units, rounded up.
    pub scaled_volume: usize,
    /// Number of buckets handed to the dynamic program.
    pub buckets: usize,
    /// Number of devices that were too small to survive scaling on their own.
    pub merged_small_devices: usize,
    /// Number of state improvements.
    pub transitions: u64,
    /// Number of reachable states at or above the scaled volume.
    pub reachable_targets: usize,
    /// Total time spent in bucketizing, the table and reconstruction.
    pub time_total: Duration,
}

impl DynamicProgramStatistics {
    #[inline]
    pub fn on_transition(&mut self) {
        self.transitions = self.transitions.saturating_add_val(1);
    }

    #[inline]
    pub fn on_reachable_target(&mut self) {
        self.reachable_targets = self.reachable_targets.saturating_add_val(1);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for DynamicProgramStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dynamic Program Statistics:")?;
        writeln!(f, "  Scale:                {}", self.scale)?;
        writeln!(f, "  Scaled volume:        {}", self.scaled_volume)?;
        writeln!(f, "  Buckets:              {}", self.buckets)?;
        writeln!(f, "  Merged small devices: {}", self.merged_small_devices)?;
        writeln!(f, "  Transitions:          {}", self.transitions)?;
        writeln!(f, "  Reachable targets:    {}", self.reachable_targets)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = DynamicProgramStatistics::default();
        stats.on_transition();
        stats.on_transition();
        stats.on_reachable_target();
        assert_eq!(stats.transitions, 2);
        assert_eq!(stats.reachable_targets, 1);
    }

    #[test]
    fn test_transitions_saturate() {
        let mut stats = DynamicProgramStatistics {
            transitions: u64::MAX,
            ..Default::default()
        };
        stats.on_transition();
        assert_eq!(stats.transitions, u64::MAX);
    }

    #[test]
    fn test_display() {
        let stats = DynamicProgramStatistics {
            scale: 3,
            scaled_volume: 4,
            ..Default::default()
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("Scale:                3"));
        assert!(rendered.contains("Scaled volume:        4"));
    }
}
