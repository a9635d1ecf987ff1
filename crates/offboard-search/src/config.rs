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

use crate::cost::CostModel;

/// Default weight of the overshoot term of the cost.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// Default number of elementary state updates the dynamic program may spend.
pub const DEFAULT_OPERATION_BUDGET: u64 = 100_000_000;

/// Default largest normal partition that the combined strategy still
/// hands to the exhaustive search.
pub const DEFAULT_EXHAUSTIVE_DEVICE_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `alpha` is NaN or infinite.
    NonFiniteAlpha(f64),
    /// `alpha` is negative.
    NegativeAlpha(f64),
    /// The operation budget must allow at least one update.
    ZeroOperationBudget,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteAlpha(alpha) => write!(f, "alpha must be finite, got {}", alpha),
            Self::NegativeAlpha(alpha) => write!(f, "alpha must not be negative, got {}", alpha),
            Self::ZeroOperationBudget => write!(f, "operation budget must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Tuning knobs of the optimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    alpha: f64,
    operation_budget: u64,
    exhaustive_device_limit: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            operation_budget: DEFAULT_OPERATION_BUDGET,
            exhaustive_device_limit: DEFAULT_EXHAUSTIVE_DEVICE_LIMIT,
        }
    }
}

impl OptimizerConfig {
    /// Returns the weight of the overshoot term.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the state-update budget of the dynamic program.
    #[inline]
    pub fn operation_budget(&self) -> u64 {
        self.operation_budget
    }

    /// Returns the largest normal partition searched exhaustively
    /// by the combined strategy.
    #[inline]
    pub fn exhaustive_device_limit(&self) -> usize {
        self.exhaustive_device_limit
    }

    /// Returns the cost model parameterized by this configuration.
    #[inline]
    pub fn cost_model(&self) -> CostModel {
        CostModel::new(self.alpha)
    }
}

impl std::fmt::Display for OptimizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "OptimizerConfig(alpha: {}, operation_budget: {}, exhaustive_device_limit: {})",
            self.alpha, self.operation_budget, self.exhaustive_device_limit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfigBuilder {
    alpha: f64,
    operation_budget: u64,
    exhaustive_device_limit: usize,
}

impl Default for OptimizerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizerConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            operation_budget: DEFAULT_OPERATION_BUDGET,
            exhaustive_device_limit: DEFAULT_EXHAUSTIVE_DEVICE_LIMIT,
        }
    }

    #[inline]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    #[inline]
    pub fn with_operation_budget(mut self, operation_budget: u64) -> Self {
        self.operation_budget = operation_budget;
        self
    }

    #[inline]
    pub fn with_exhaustive_device_limit(mut self, limit: usize) -> Self {
        self.exhaustive_device_limit = limit;
        self
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `alpha` is not a finite, non-negative
    /// number or if the operation budget is zero.
    pub fn build(self) -> Result<OptimizerConfig, ConfigError> {
        if !self.alpha.is_finite() {
            return Err(ConfigError::NonFiniteAlpha(self.alpha));
        }
        if self.alpha < 0.0 {
            return Err(ConfigError::NegativeAlpha(self.alpha));
        }
        if self.operation_budget == 0 {
            return Err(ConfigError::ZeroOperationBudget);
        }

        Ok(OptimizerConfig {
            alpha: self.alpha,
            operation_budget: self.operation_budget,
            exhaustive_device_limit: self.exhaustive_device_limit,
        })
    }
}
