// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Dispatch tables and interrupt dispatchers.
//!
//! Each dispatcher receives raw status and mask register values, scans its
//! table and runs the sequencer of every entry whose status bit is set and
//! whose interrupt is unmasked. The triggering interrupt is acknowledged and
//! masked whatever the sequencer returned, and the first failure of the scan
//! is returned.
//!
//! A power-down whose paired power-up is still pending and unmasked is not
//! run. Its interrupt is masked with the status left set, and the power-up
//! dispatcher unmasks it again once the power-up has completed, so the
//! power-down is redelivered after the power-up.

use kernel::hil::register_io::RegisterIo;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::DomainId;
use crate::power::{PowerManager, PowerOp};
use crate::registers::{
    nth, IrqGroup, PWR_CTRL1, PWR_CTRL1_IRQ, REQ_PWR0, REQ_PWR1, REQ_PWRDWN0, REQ_PWRDWN1,
    REQ_PWRUP0, REQ_PWRUP1, WAKEUP0, WAKEUP0_IRQ, WAKEUP1, WAKEUP1_IRQ,
};

/// Request bits of one domain in a power-up/power-down register pair.
#[derive(Clone, Copy, Debug)]
pub struct DispatchEntry {
    pub up_mask: u32,
    pub down_mask: u32,
    pub domain: DomainId,
}

const fn entry(mask: u32, domain: DomainId) -> DispatchEntry {
    DispatchEntry {
        up_mask: mask,
        down_mask: mask,
        domain,
    }
}

/// `REQ_PWRUP0` / `REQ_PWRDWN0`.
pub const PWR_UP_DWN_0: [DispatchEntry; 9] = [
    entry(nth(REQ_PWR0::FP, 0), DomainId::Fpd),
    entry(nth(REQ_PWR0::ACPU, 0), DomainId::Acpu0Core0),
    entry(nth(REQ_PWR0::ACPU, 1), DomainId::Acpu0Core1),
    entry(nth(REQ_PWR0::ACPU, 2), DomainId::Acpu0Core2),
    entry(nth(REQ_PWR0::ACPU, 3), DomainId::Acpu0Core3),
    entry(nth(REQ_PWR0::ACPU, 4), DomainId::Acpu1Core0),
    entry(nth(REQ_PWR0::ACPU, 5), DomainId::Acpu1Core1),
    entry(nth(REQ_PWR0::ACPU, 6), DomainId::Acpu1Core2),
    entry(nth(REQ_PWR0::ACPU, 7), DomainId::Acpu1Core3),
];

/// `REQ_PWRUP1` / `REQ_PWRDWN1`.
pub const PWR_UP_DWN_1: [DispatchEntry; 18] = [
    entry(nth(REQ_PWR1::GEM, 0), DomainId::Gem0),
    entry(nth(REQ_PWR1::GEM, 1), DomainId::Gem1),
    entry(nth(REQ_PWR1::OCM, 0), DomainId::OcmB0I0),
    entry(nth(REQ_PWR1::OCM, 1), DomainId::OcmB0I1),
    entry(nth(REQ_PWR1::OCM, 2), DomainId::OcmB0I2),
    entry(nth(REQ_PWR1::OCM, 3), DomainId::OcmB0I3),
    entry(nth(REQ_PWR1::OCM, 4), DomainId::OcmB1I0),
    entry(nth(REQ_PWR1::OCM, 5), DomainId::OcmB1I1),
    entry(nth(REQ_PWR1::OCM, 6), DomainId::OcmB1I2),
    entry(nth(REQ_PWR1::OCM, 7), DomainId::OcmB1I3),
    entry(nth(REQ_PWR1::TCM, 0), DomainId::TcmA0),
    entry(nth(REQ_PWR1::TCM, 1), DomainId::TcmA1),
    entry(nth(REQ_PWR1::TCM, 2), DomainId::TcmB0),
    entry(nth(REQ_PWR1::TCM, 3), DomainId::TcmB1),
    entry(nth(REQ_PWR1::RPU, 0), DomainId::RpuA0),
    entry(nth(REQ_PWR1::RPU, 1), DomainId::RpuA1),
    entry(nth(REQ_PWR1::RPU, 2), DomainId::RpuB0),
    entry(nth(REQ_PWR1::RPU, 3), DomainId::RpuB1),
];

/// Direct wake or sleep bit of one processor core.
#[derive(Clone, Copy, Debug)]
pub struct WakeEntry {
    pub mask: u32,
    pub core: DomainId,
}

const fn wake(mask: u32, core: DomainId) -> WakeEntry {
    WakeEntry { mask, core }
}

/// `WAKEUP0_IRQ`.
pub const APU_WAKEUP: [WakeEntry; 8] = [
    wake(nth(WAKEUP0::ACPU, 0), DomainId::Acpu0Core0),
    wake(nth(WAKEUP0::ACPU, 1), DomainId::Acpu0Core1),
    wake(nth(WAKEUP0::ACPU, 2), DomainId::Acpu0Core2),
    wake(nth(WAKEUP0::ACPU, 3), DomainId::Acpu0Core3),
    wake(nth(WAKEUP0::ACPU, 4), DomainId::Acpu1Core0),
    wake(nth(WAKEUP0::ACPU, 5), DomainId::Acpu1Core1),
    wake(nth(WAKEUP0::ACPU, 6), DomainId::Acpu1Core2),
    wake(nth(WAKEUP0::ACPU, 7), DomainId::Acpu1Core3),
];

/// `WAKEUP1_IRQ`.
pub const RPU_WAKEUP: [WakeEntry; 4] = [
    wake(nth(WAKEUP1::RPU, 0), DomainId::RpuA0),
    wake(nth(WAKEUP1::RPU, 1), DomainId::RpuA1),
    wake(nth(WAKEUP1::RPU, 2), DomainId::RpuB0),
    wake(nth(WAKEUP1::RPU, 3), DomainId::RpuB1),
];

/// `PWR_CTRL1_IRQ`.
pub const DIRECT_SLEEP: [WakeEntry; 12] = [
    wake(nth(PWR_CTRL1::ACPU, 0), DomainId::Acpu0Core0),
    wake(nth(PWR_CTRL1::ACPU, 1), DomainId::Acpu0Core1),
    wake(nth(PWR_CTRL1::ACPU, 2), DomainId::Acpu0Core2),
    wake(nth(PWR_CTRL1::ACPU, 3), DomainId::Acpu0Core3),
    wake(nth(PWR_CTRL1::ACPU, 4), DomainId::Acpu1Core0),
    wake(nth(PWR_CTRL1::ACPU, 5), DomainId::Acpu1Core1),
    wake(nth(PWR_CTRL1::ACPU, 6), DomainId::Acpu1Core2),
    wake(nth(PWR_CTRL1::ACPU, 7), DomainId::Acpu1Core3),
    wake(nth(PWR_CTRL1::RPU, 0), DomainId::RpuA0),
    wake(nth(PWR_CTRL1::RPU, 1), DomainId::RpuA1),
    wake(nth(PWR_CTRL1::RPU, 2), DomainId::RpuB0),
    wake(nth(PWR_CTRL1::RPU, 3), DomainId::RpuB1),
];

/// Union of the request bits of a power-up/power-down table.
pub const fn request_bits(table: &[DispatchEntry]) -> u32 {
    let mut bits = 0;
    let mut i = 0;
    while i < table.len() {
        bits |= table[i].up_mask | table[i].down_mask;
        i += 1;
    }
    bits
}

/// Union of the bits of a wake or sleep table.
pub const fn wake_bits(table: &[WakeEntry]) -> u32 {
    let mut bits = 0;
    let mut i = 0;
    while i < table.len() {
        bits |= table[i].mask;
        i += 1;
    }
    bits
}

/// Register groups serviced by one power-up/power-down table.
struct RequestGroups {
    up: IrqGroup,
    down: IrqGroup,
}

const GROUP_0: RequestGroups = RequestGroups {
    up: REQ_PWRUP0,
    down: REQ_PWRDWN0,
};

const GROUP_1: RequestGroups = RequestGroups {
    up: REQ_PWRUP1,
    down: REQ_PWRDWN1,
};

impl<IO: RegisterIo, C: PsmConfig> PowerManager<'_, IO, C> {
    pub fn power_up_0(&self, status: u32, int_mask: u32) -> Result<(), ErrorCode> {
        self.dispatch_power_up(&PWR_UP_DWN_0, &GROUP_0, status, int_mask)
    }

    pub fn power_up_1(&self, status: u32, int_mask: u32) -> Result<(), ErrorCode> {
        self.dispatch_power_up(&PWR_UP_DWN_1, &GROUP_1, status, int_mask)
    }

    pub fn power_down_0(
        &self,
        down_status: u32,
        down_mask: u32,
        up_status: u32,
        up_mask: u32,
    ) -> Result<(), ErrorCode> {
        let (result, _) = self.dispatch_power_down(
            &PWR_UP_DWN_0,
            &GROUP_0,
            down_status,
            down_mask,
            up_status,
            up_mask,
        );
        result
    }

    pub fn power_down_1(
        &self,
        down_status: u32,
        down_mask: u32,
        up_status: u32,
        up_mask: u32,
    ) -> Result<(), ErrorCode> {
        let (result, deferred) = self.dispatch_power_down(
            &PWR_UP_DWN_1,
            &GROUP_1,
            down_status,
            down_mask,
            up_status,
            up_mask,
        );

        // Bits no entry serviced, such as a retention request raised on its
        // own, would otherwise keep the interrupt asserted.
        let keep = PWR_UP_DWN_1
            .iter()
            .filter(|e| deferred & e.down_mask != 0)
            .fold(0, |acc, e| acc | e.down_mask | self.retention_request_mask(e.domain));
        let stray = down_status & !keep;
        if stray != 0 {
            self.io.write32(REQ_PWRDWN1.status(), stray);
            self.io.write32(REQ_PWRDWN1.int_dis(), stray);
        }
        result
    }

    pub fn apu_wakeup(&self, status: u32, int_mask: u32) -> Result<(), ErrorCode> {
        self.dispatch_direct(&APU_WAKEUP, WAKEUP0_IRQ, PowerOp::Up, status, int_mask)
    }

    pub fn rpu_wakeup(&self, status: u32, int_mask: u32) -> Result<(), ErrorCode> {
        self.dispatch_direct(&RPU_WAKEUP, WAKEUP1_IRQ, PowerOp::Up, status, int_mask)
    }

    pub fn direct_sleep(&self, status: u32, int_mask: u32) -> Result<(), ErrorCode> {
        self.dispatch_direct(&DIRECT_SLEEP, PWR_CTRL1_IRQ, PowerOp::Down, status, int_mask)
    }

    fn dispatch_power_up(
        &self,
        table: &[DispatchEntry],
        groups: &RequestGroups,
        status: u32,
        int_mask: u32,
    ) -> Result<(), ErrorCode> {
        let mut result = Ok(());
        for e in table.iter().filter(|e| status & e.up_mask != 0) {
            if int_mask & e.up_mask == 0 {
                let r = self.request(e.domain, PowerOp::Up);
                if r.is_ok() {
                    // Redeliver a power-down deferred behind this power-up.
                    self.io.write32(groups.down.int_en(), e.down_mask);
                }
                result = result.and(r);
            }
            self.io.write32(groups.up.status(), e.up_mask);
            self.io.write32(groups.up.int_dis(), e.up_mask);
        }
        result
    }

    /// Returns the scan result and the power-down bits left pending.
    fn dispatch_power_down(
        &self,
        table: &[DispatchEntry],
        groups: &RequestGroups,
        down_status: u32,
        down_mask: u32,
        up_status: u32,
        up_mask: u32,
    ) -> (Result<(), ErrorCode>, u32) {
        let mut result = Ok(());
        let mut deferred = 0;
        for e in table.iter().filter(|e| down_status & e.down_mask != 0) {
            if up_status & e.up_mask != 0 && up_mask & e.up_mask == 0 {
                self.io.write32(groups.down.int_dis(), e.down_mask);
                deferred |= e.down_mask;
                continue;
            }
            if down_mask & e.down_mask == 0 {
                result = result.and(self.request(e.domain, PowerOp::Down));
            }
            self.io.write32(groups.down.status(), e.down_mask);
            self.io.write32(groups.down.int_dis(), e.down_mask);
        }
        (result, deferred)
    }

    fn dispatch_direct(
        &self,
        table: &[WakeEntry],
        group: IrqGroup,
        op: PowerOp,
        status: u32,
        int_mask: u32,
    ) -> Result<(), ErrorCode> {
        let mut result = Ok(());
        for e in table
            .iter()
            .filter(|e| status & e.mask != 0 && int_mask & e.mask == 0)
        {
            let r = match op {
                PowerOp::Up => self.core_wakeup(e.core),
                PowerOp::Down => self.core_sleep(e.core),
            };
            result = result.and(r);
            self.io.write32(group.int_dis(), e.mask);
        }
        result
    }

    fn retention_request_mask(&self, id: DomainId) -> u32 {
        self.registry
            .descriptor(id)
            .memory()
            .and_then(|m| m.retention)
            .map_or(0, |r| r.request_mask)
    }
}
