// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Power sequencing engine for the Versal NET platform-management
//! microcontroller (PSM).
//!
//! The PSM walks every power island it owns (APU and RPU cores, OCM islands,
//! TCM banks, GEM memories and the full-power domain) through ordered
//! power-up and power-down sequences. Requests arrive as interrupt status
//! bits; [`chip::VersalNetPsm`] samples them and hands them to the
//! dispatchers on [`power::PowerManager`].

#![no_std]
#![crate_name = "versal_net_psm"]
#![crate_type = "rlib"]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod chip;
pub mod chip_config;
pub mod dispatch;
pub mod domain;
pub mod event;
pub mod interrupts;
pub mod mmio;
pub mod power;
pub mod registers;

mod apu;
mod fpd;
mod memory;
mod rpu;

#[cfg(test)]
mod test_support;
