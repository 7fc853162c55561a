// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Interface for chips.

/// Interface for individual MCUs.
pub trait Chip {
    /// Service every interrupt source that is currently pending.
    fn service_pending_interrupts(&self);

    /// Return true if any interrupt source is pending.
    fn has_pending_interrupts(&self) -> bool;
}

/// Interface for handling interrupts on a hardware chip.
///
/// Each chip crate maps its interrupt numbers to the peripheral or engine
/// routine that owns them.
pub trait InterruptService {
    /// Service an interrupt, if supported by this chip. If this interrupt
    /// number is not supported, return false.
    ///
    /// # Safety
    ///
    /// Must only be called from the interrupt bottom half, with no other
    /// invocation for the same interrupt in flight.
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool;
}
