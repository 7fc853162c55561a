// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for raw 32-bit register access.
//!
//! Sequencers never dereference register addresses themselves. They go
//! through a `RegisterIo` implementation so the same sequencing code runs
//! against real MMIO on the chip and against a simulated register file in
//! tests.
//!
//! Polling is always bounded. `poll_for_mask` and `poll_for_zero` spin for at
//! most `timeout_us` microseconds and return `Err(ErrorCode::NOACK)` when the
//! condition never holds.

use crate::ErrorCode;

pub trait RegisterIo {
    /// Read the 32-bit word at `addr`.
    fn read32(&self, addr: usize) -> u32;

    /// Write `val` to the 32-bit word at `addr`.
    fn write32(&self, addr: usize, val: u32);

    /// Busy-wait for `us` microseconds.
    fn wait(&self, us: u32);

    /// Replace the bits selected by `mask` at `addr` with the matching bits
    /// of `val`. Bits outside `mask` are preserved.
    fn rmw32(&self, addr: usize, mask: u32, val: u32) {
        let old = self.read32(addr);
        self.write32(addr, (old & !mask) | (val & mask));
    }

    /// Spin until every bit in `mask` reads as one.
    fn poll_for_mask(&self, addr: usize, mask: u32, timeout_us: u32) -> Result<(), ErrorCode> {
        for _ in 0..=timeout_us {
            if self.read32(addr) & mask == mask {
                return Ok(());
            }
            self.wait(1);
        }
        Err(ErrorCode::NOACK)
    }

    /// Spin until every bit in `mask` reads as zero.
    fn poll_for_zero(&self, addr: usize, mask: u32, timeout_us: u32) -> Result<(), ErrorCode> {
        for _ in 0..=timeout_us {
            if self.read32(addr) & mask == 0 {
                return Ok(());
            }
            self.wait(1);
        }
        Err(ErrorCode::NOACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    /// A single register that changes to `later` after `delay` waits.
    struct SlowRegister {
        value: Cell<u32>,
        later: u32,
        delay: u32,
        waited: Cell<u32>,
    }

    impl RegisterIo for SlowRegister {
        fn read32(&self, _addr: usize) -> u32 {
            if self.waited.get() >= self.delay {
                self.later
            } else {
                self.value.get()
            }
        }

        fn write32(&self, _addr: usize, val: u32) {
            self.value.set(val);
        }

        fn wait(&self, us: u32) {
            self.waited.set(self.waited.get() + us);
        }
    }

    fn slow(value: u32, later: u32, delay: u32) -> SlowRegister {
        SlowRegister {
            value: Cell::new(value),
            later,
            delay,
            waited: Cell::new(0),
        }
    }

    #[test]
    fn rmw_preserves_unmasked_bits() {
        let reg = slow(0xF0F0, 0, u32::MAX);
        reg.rmw32(0, 0x00FF, 0xFFFF);
        assert_eq!(reg.read32(0), 0xF0FF);
        reg.rmw32(0, 0xF000, 0);
        assert_eq!(reg.read32(0), 0x00FF);
    }

    #[test]
    fn poll_succeeds_within_budget() {
        let reg = slow(0, 0x3, 5);
        assert_eq!(reg.poll_for_mask(0, 0x3, 10), Ok(()));
        assert_eq!(reg.waited.get(), 5);

        let reg = slow(0x8, 0, 3);
        assert_eq!(reg.poll_for_zero(0, 0x8, 10), Ok(()));
    }

    #[test]
    fn poll_times_out() {
        let reg = slow(0x1, 0x3, 100);
        assert_eq!(reg.poll_for_mask(0, 0x2, 10), Err(ErrorCode::NOACK));
        assert_eq!(reg.waited.get(), 11);
        assert_eq!(reg.poll_for_zero(0, 0x1, 10), Err(ErrorCode::NOACK));
    }
}
