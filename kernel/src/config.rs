// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Data structure for storing compile-time configuration options in the kernel.
//!
//! Configuration is kept in a typed `const` object rather than scattered
//! `#[cfg]` blocks. All code paths are type-checked by the compiler, even those
//! that end up disabled, and after type-checking the compiler folds the
//! constants so a disabled `if CONFIG.x` block costs nothing in the binary.

/// Data structure holding compile-time configuration options.
///
/// To change the configuration, enable the matching cargo feature on the
/// kernel dependency of the top-level firmware crate.
pub struct Config {
    /// Whether sequencers should log every successful power transition to the
    /// debug output.
    ///
    /// If enabled, each domain transition prints the domain and the new state.
    /// Failures are always logged regardless of this option.
    pub trace_power_transitions: bool,
}

/// A unique instance of `Config` where compile-time configuration options are
/// defined. This is the only location in the kernel where `#[cfg(x)]` is used
/// to configure code based on Cargo features.
pub const CONFIG: Config = Config {
    trace_power_transitions: cfg!(feature = "trace_power_transitions"),
};
