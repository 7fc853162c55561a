// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Cross-firmware event record shared with the platform management firmware.
//!
//! The record lives in PSM RAM for the whole boot session. The platform
//! firmware locates it through [`EventRecord::address`] and reads it directly,
//! so the layout is fixed (`#[repr(C)]`) and every field is accessed with
//! volatile reads and writes.
//!
//! ```text
//! offset  field
//! 0x00    version            u32
//! 0x04    event[12]          u32 each
//! 0x34    cpu_idle_flag[12]  u32 each
//! 0x68    resume_address[12] u64 each
//! ```
//!
//! Version 1 of the record carried only the event array. Consumers must check
//! the version before touching the idle flags or resume addresses.
//!
//! A core's event slot must be zero before a new event is posted to it. The
//! platform firmware clears the slot once it has consumed the event. Finding a
//! non-zero slot means the two firmwares disagree about the protocol state,
//! which is not recoverable, so [`EventRecord::post`] panics.

use kernel::utilities::registers::interfaces::{Readable, Writeable};
use kernel::utilities::registers::InMemoryRegister;

use crate::domain::NUM_CORES;

pub const EVENT_RECORD_VERSION: u32 = 0x2;
pub const EVENT_RECORD_VERSION_LEGACY: u32 = 0x1;

/// Event codes posted to a core's slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum CoreEvent {
    PowerUp = 0x1,
    PowerDown = 0x100,
}

pub const PWR_UP_EVT: u32 = CoreEvent::PowerUp as u32;
pub const PWR_DWN_EVT: u32 = CoreEvent::PowerDown as u32;

/// Idle flag value meaning the core went idle and must be powered by the PSM.
pub const CPU_IDLE: u32 = 1;

// Only used as array-repeat initializers.
#[allow(clippy::declare_interior_mutable_const)]
const ZERO32: InMemoryRegister<u32> = InMemoryRegister::new(0);
#[allow(clippy::declare_interior_mutable_const)]
const ZERO64: InMemoryRegister<u64> = InMemoryRegister::new(0);

#[repr(C)]
pub struct EventRecord {
    version: InMemoryRegister<u32>,
    event: [InMemoryRegister<u32>; NUM_CORES],
    cpu_idle_flag: [InMemoryRegister<u32>; NUM_CORES],
    resume_address: [InMemoryRegister<u64>; NUM_CORES],
}

impl EventRecord {
    pub const fn new() -> EventRecord {
        EventRecord {
            version: InMemoryRegister::new(EVENT_RECORD_VERSION),
            event: [ZERO32; NUM_CORES],
            cpu_idle_flag: [ZERO32; NUM_CORES],
            resume_address: [ZERO64; NUM_CORES],
        }
    }

    /// Address handed to the platform firmware.
    pub fn address(&self) -> usize {
        self as *const EventRecord as usize
    }

    pub fn version(&self) -> u32 {
        self.version.get()
    }

    pub fn event(&self, slot: usize) -> u32 {
        self.event[slot].get()
    }

    /// Post `event` to `slot`.
    ///
    /// Panics if the slot still holds an unconsumed event.
    pub fn post(&self, slot: usize, event: CoreEvent) {
        let pending = self.event[slot].get();
        assert!(
            pending == 0,
            "event slot {} still pending ({:#x})",
            slot,
            pending
        );
        self.event[slot].set(event as u32);
    }

    /// Consumer side: acknowledge the event in `slot`.
    pub fn clear_event(&self, slot: usize) {
        self.event[slot].set(0);
    }

    pub fn idle_flag(&self, slot: usize) -> u32 {
        self.cpu_idle_flag[slot].get()
    }

    pub fn set_idle_flag(&self, slot: usize, flag: u32) {
        self.cpu_idle_flag[slot].set(flag);
    }

    pub fn resume_address(&self, slot: usize) -> u64 {
        self.resume_address[slot].get()
    }

    pub fn set_resume_address(&self, slot: usize, addr: u64) {
        self.resume_address[slot].set(addr);
    }

    /// Read the resume address of `slot` and clear it.
    pub fn take_resume_address(&self, slot: usize) -> u64 {
        let addr = self.resume_address[slot].get();
        self.resume_address[slot].set(0);
        addr
    }
}
