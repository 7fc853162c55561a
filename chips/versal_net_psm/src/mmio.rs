// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Volatile MMIO backend for the sequencers.

use kernel::hil::register_io::RegisterIo;
use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::ReadWrite;

use crate::chip_config::PsmConfig;

pub struct Mmio {
    /// Spin iterations per microsecond, derived from the PSM clock.
    loops_per_us: u32,
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to the returned backend must be a mapped,
    /// 32-bit aligned PSM-accessible register. There must be exactly one
    /// instance per firmware image.
    pub const unsafe fn new<C: PsmConfig>() -> Mmio {
        let loops = C::CPU_FREQ / 1_000_000;
        Mmio {
            loops_per_us: if loops == 0 { 1 } else { loops },
        }
    }

    fn register(addr: usize) -> &'static ReadWrite<u32> {
        unsafe { &*(addr as *const ReadWrite<u32>) }
    }
}

impl RegisterIo for Mmio {
    fn read32(&self, addr: usize) -> u32 {
        Self::register(addr).get()
    }

    fn write32(&self, addr: usize, val: u32) {
        Self::register(addr).set(val);
    }

    fn wait(&self, us: u32) {
        for _ in 0..us.saturating_mul(self.loops_per_us) {
            core::hint::spin_loop();
        }
    }
}
