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

//! # Offboard Model
//!
//! The problem description consumed by every optimization strategy: a pool
//! of storage devices, each with a capacity and a risk rating, and the volume
//! that the kept devices must still provide.
//!
//! ## Modules
//!
//! - `index`: `DeviceIndex`, the strongly typed position of a device in its pool.
//! - `device`: the immutable `Device` record.
//! - `instance`: `Instance`, a validated pool plus needed volume, built through
//!   `InstanceBuilder`, and the boundary errors (`InstanceError`, `SelectionError`).
//! - `loading`: a whitespace-token text format reader (`InstanceLoader`).
//! - `generate`: a seeded synthetic pool provider (`PoolGenerator`).

pub mod device;
pub mod generate;
pub mod index;
pub mod instance;
pub mod loading;
