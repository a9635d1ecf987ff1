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

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Number of devices the strategy worked on (the normal partition).
    pub devices_considered: usize,
    /// Number of devices that alone reach the needed volume.
    pub big_devices: usize,
    /// Number of improving selections found during the run.
    pub solutions_found: u64,
    /// Total duration of the run.
    pub solve_duration: std::time::Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Devices Considered: {}", self.devices_considered)?;
        writeln!(f, "  Big Devices: {}", self.big_devices)?;
        writeln!(f, "  Solutions Found: {}", self.solutions_found)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    devices_considered: usize,
    big_devices: usize,
    solutions_found: u64,
    solve_duration: std::time::Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    /// Creates a new `SolverStatisticsBuilder` with zeroed values.
    #[inline]
    pub fn new() -> Self {
        Self {
            devices_considered: 0,
            big_devices: 0,
            solutions_found: 0,
            solve_duration: std::time::Duration::ZERO,
        }
    }

    #[inline]
    pub fn devices_considered(mut self, devices_considered: usize) -> Self {
        self.devices_considered = devices_considered;
        self
    }

    #[inline]
    pub fn big_devices(mut self, big_devices: usize) -> Self {
        self.big_devices = big_devices;
        self
    }

    #[inline]
    pub fn solutions_found(mut self, solutions_found: u64) -> Self {
        self.solutions_found = solutions_found;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: std::time::Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            devices_considered: self.devices_considered,
            big_devices: self.big_devices,
            solutions_found: self.solutions_found,
            solve_duration: self.solve_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SolverStatistics;
    use super::SolverStatisticsBuilder;
    use std::time::Duration;

    #[test]
    fn test_builder_sets_every_field() {
        let stats = SolverStatisticsBuilder::new()
            .devices_considered(12)
            .big_devices(2)
            .solutions_found(3)
            .solve_duration(Duration::from_millis(1234))
            .build();

        assert_eq!(stats.devices_considered, 12);
        assert_eq!(stats.big_devices, 2);
        assert_eq!(stats.solutions_found, 3);
        assert_eq!(stats.solve_duration, Duration::from_millis(1234));
    }

    #[test]
    fn test_display_formats_all_fields() {
        let stats = SolverStatistics {
            devices_considered: 40,
            big_devices: 1,
            solutions_found: 2,
            solve_duration: Duration::from_millis(1234),
        };

        let rendered = format!("{}", stats);

        assert!(rendered.contains("Solver Statistics:"), "missing header");
        assert!(rendered.contains("Devices Considered: 40"));
        assert!(rendered.contains("Big Devices: 1"));
        assert!(rendered.contains("Solutions Found: 2"));
        assert!(
            rendered.contains("Solve Duration (secs): 1.234"),
            "duration not formatted to 3 decimals"
        );
    }

    #[test]
    fn test_default_builder_is_zeroed() {
        let stats = SolverStatisticsBuilder::default().build();
        assert_eq!(stats.devices_considered, 0);
        assert_eq!(stats.solve_duration, Duration::ZERO);
    }
}
