// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Core firmware runtime for the platform power sequencer.
//!
//! The kernel crate holds the code shared by every chip crate: the standard
//! error type, the debug output path, compile-time configuration, and the
//! Hardware Interface Layer (HIL) traits that chip crates implement and
//! consume.
//!
//! Most `unsafe` code is in this kernel crate.

#![warn(unreachable_pub)]
#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
pub mod debug;
pub mod config;
pub mod errorcode;
pub mod hil;
pub mod platform;
pub mod utilities;

pub use crate::errorcode::ErrorCode;
