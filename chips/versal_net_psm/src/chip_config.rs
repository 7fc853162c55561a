// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Chip specific configuration.
//!
//! This file includes a common configuration trait and pre-defined constant
//! values for different uses of the same PSM. Production silicon and the
//! emulation platform acknowledge power handshakes at very different speeds,
//! and emulation never reports retention entry, so the budgets differ.

/// PSM configuration based on the target device.
pub trait PsmConfig {
    /// Identifier for the platform. This is useful for debugging to confirm the
    /// correct configuration of the chip is being used.
    const NAME: &'static str;

    /// The clock speed of the PSM in Hz.
    const CPU_FREQ: u32;

    /// Budget for an APU core or cluster PACCEPT handshake, in microseconds.
    const ACPU_PACCEPT_TIMEOUT_US: u32;

    /// Budget for an RPU core PACCEPT handshake, in microseconds.
    const RPU_PACCEPT_TIMEOUT_US: u32;

    /// Budget for a memory bank power status acknowledgement, in microseconds.
    const MEM_ACK_TIMEOUT_US: u32;

    /// Time for a TCM bank supply to settle after its status acknowledges.
    const TCM_PWR_UP_WAIT_US: u32;

    /// Clock propagation delay after enabling a cluster clock.
    const CLK_PROP_TIME_US: u32;

    /// Treat a retention request whose confirmation bit never asserts as a
    /// failure instead of logging and continuing.
    ///
    /// Current silicon does not set `LOC_AUX_PWR_STATE` on retention entry, so
    /// this must stay false there.
    const STRICT_RETENTION_CHECK: bool;
}

pub enum Silicon {}

impl PsmConfig for Silicon {
    const NAME: &'static str = "silicon";
    const CPU_FREQ: u32 = 400_000_000;
    const ACPU_PACCEPT_TIMEOUT_US: u32 = 1_000;
    const RPU_PACCEPT_TIMEOUT_US: u32 = 1_000;
    const MEM_ACK_TIMEOUT_US: u32 = 100;
    const TCM_PWR_UP_WAIT_US: u32 = 10;
    const CLK_PROP_TIME_US: u32 = 1;
    const STRICT_RETENTION_CHECK: bool = false;
}

pub enum Emulation {}

impl PsmConfig for Emulation {
    const NAME: &'static str = "emulation";
    const CPU_FREQ: u32 = 10_000_000;
    const ACPU_PACCEPT_TIMEOUT_US: u32 = 100_000;
    const RPU_PACCEPT_TIMEOUT_US: u32 = 100_000;
    const MEM_ACK_TIMEOUT_US: u32 = 10_000;
    const TCM_PWR_UP_WAIT_US: u32 = 100;
    const CLK_PROP_TIME_US: u32 = 10;
    const STRICT_RETENTION_CHECK: bool = false;
}
