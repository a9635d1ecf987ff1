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

//! # Offboard Solver
//!
//! The entry point of the optimizer. An [`optimizer::Optimizer`] partitions the
//! pool once, runs the requested strategy, or all of them, and returns the
//! cheapest selection.
//!
//! ```rust
//! use offboard_model::{index::DeviceIndex, instance::InstanceBuilder};
//! use offboard_search::config::OptimizerConfig;
//! use offboard_solver::optimizer::{Optimizer, StrategyKind};
//!
//! let mut builder = InstanceBuilder::<u64>::new(10);
//! builder.add_device(0.1, 5);
//! builder.add_device(0.5, 5);
//! builder.add_device(0.9, 5);
//! let instance = builder.build().unwrap();
//!
//! let mut optimizer = Optimizer::new(OptimizerConfig::default());
//! let outcome = optimizer.optimize(&instance, StrategyKind::BestOfAll);
//!
//! assert_eq!(outcome.result().cost(), 1.5);
//! assert_eq!(outcome.result().selected(), &[DeviceIndex::new(0), DeviceIndex::new(1)]);
//! ```

pub mod optimizer;
