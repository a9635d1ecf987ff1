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

use crate::{
    config::OptimizerConfig, num::CapacityNumeric, partition::DevicePartition,
    result::StrategyOutcome,
};
use offboard_model::instance::Instance;

/// Everything a strategy needs for one run.
///
/// The partition is computed once per optimization call and shared by
/// all strategies that take part in it.
pub struct StrategyContext<'a, T> {
    pub instance: &'a Instance<T>,
    pub config: &'a OptimizerConfig,
    pub partition: &'a DevicePartition,
}

impl<'a, T> StrategyContext<'a, T>
where
    T: CapacityNumeric,
{
    #[inline(always)]
    pub fn new(
        instance: &'a Instance<T>,
        config: &'a OptimizerConfig,
        partition: &'a DevicePartition,
    ) -> Self {
        Self {
            instance,
            config,
            partition,
        }
    }
}

impl<'a, T> std::fmt::Debug for StrategyContext<'a, T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("instance", &self.instance)
            .field("config", &self.config)
            .field("partition", &self.partition)
            .finish()
    }
}

impl<'a, T> std::fmt::Display for StrategyContext<'a, T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StrategyContext(instance: {}, config: {})",
            self.instance, self.config
        )
    }
}

/// A selection strategy that can take part in an optimization call.
pub trait Strategy<T>
where
    T: CapacityNumeric,
{
    fn name(&self) -> &str;
    fn solve(&mut self, context: StrategyContext<'_, T>) -> StrategyOutcome;
}

impl<T> std::fmt::Debug for dyn Strategy<T>
where
    T: CapacityNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Strategy({})", self.name())
    }
}
