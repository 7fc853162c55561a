// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Chip trait setup.

use kernel::debug;
use kernel::hil::register_io::RegisterIo;
use kernel::platform::{Chip, InterruptService};

use crate::chip_config::PsmConfig;
use crate::dispatch::{
    request_bits, wake_bits, APU_WAKEUP, DIRECT_SLEEP, PWR_UP_DWN_0, PWR_UP_DWN_1, RPU_WAKEUP,
};
use crate::interrupts;
use crate::power::PowerManager;
use crate::registers::{
    IrqGroup, PWR_CTRL1_IRQ, REQ_PWRDWN0, REQ_PWRDWN1, REQ_PWRUP0, REQ_PWRUP1, WAKEUP0_IRQ,
    WAKEUP1_IRQ,
};

/// Interrupt lines in service order, with the status bits their dispatcher
/// acknowledges or masks. Other bits are never serviced and are not pending.
///
/// `power_down_1` clears every unmasked bit it does not defer, and a deferred
/// bit is only left unmasked behind a power-up that `REQ_PWRUP1` services
/// first.
const LINES: [(u32, IrqGroup, u32); 7] = [
    (interrupts::REQ_PWRUP0, REQ_PWRUP0, request_bits(&PWR_UP_DWN_0)),
    (interrupts::REQ_PWRUP1, REQ_PWRUP1, request_bits(&PWR_UP_DWN_1)),
    (interrupts::REQ_PWRDWN0, REQ_PWRDWN0, request_bits(&PWR_UP_DWN_0)),
    (interrupts::REQ_PWRDWN1, REQ_PWRDWN1, u32::MAX),
    (interrupts::WAKEUP0, WAKEUP0_IRQ, wake_bits(&APU_WAKEUP)),
    (interrupts::WAKEUP1, WAKEUP1_IRQ, wake_bits(&RPU_WAKEUP)),
    (interrupts::PWR_CTRL1, PWR_CTRL1_IRQ, wake_bits(&DIRECT_SLEEP)),
];

pub struct VersalNetPsm<'a, IO: RegisterIo, C: PsmConfig> {
    psm: &'a PowerManager<'a, IO, C>,
}

impl<'a, IO: RegisterIo, C: PsmConfig> VersalNetPsm<'a, IO, C> {
    pub fn new(psm: &'a PowerManager<'a, IO, C>) -> Self {
        Self { psm }
    }

    /// Raw `STATUS` and `INT_MASK` of `group`.
    fn sample(&self, group: IrqGroup) -> (u32, u32) {
        (
            self.psm.io.read32(group.status()),
            self.psm.io.read32(group.int_mask()),
        )
    }

    fn next_pending(&self) -> Option<u32> {
        LINES
            .iter()
            .find(|(_, group, serviced)| {
                let (status, mask) = self.sample(*group);
                status & !mask & serviced != 0
            })
            .map(|(line, _, _)| *line)
    }
}

impl<IO: RegisterIo, C: PsmConfig> InterruptService for VersalNetPsm<'_, IO, C> {
    unsafe fn service_interrupt(&self, interrupt: u32) -> bool {
        let result = match interrupt {
            interrupts::REQ_PWRUP0 => {
                let (status, mask) = self.sample(REQ_PWRUP0);
                self.psm.power_up_0(status, mask)
            }
            interrupts::REQ_PWRUP1 => {
                let (status, mask) = self.sample(REQ_PWRUP1);
                self.psm.power_up_1(status, mask)
            }
            interrupts::REQ_PWRDWN0 => {
                let (down_status, down_mask) = self.sample(REQ_PWRDWN0);
                let (up_status, up_mask) = self.sample(REQ_PWRUP0);
                self.psm
                    .power_down_0(down_status, down_mask, up_status, up_mask)
            }
            interrupts::REQ_PWRDWN1 => {
                let (down_status, down_mask) = self.sample(REQ_PWRDWN1);
                let (up_status, up_mask) = self.sample(REQ_PWRUP1);
                self.psm
                    .power_down_1(down_status, down_mask, up_status, up_mask)
            }
            interrupts::WAKEUP0 => {
                let (status, mask) = self.sample(WAKEUP0_IRQ);
                self.psm.apu_wakeup(status, mask)
            }
            interrupts::WAKEUP1 => {
                let (status, mask) = self.sample(WAKEUP1_IRQ);
                self.psm.rpu_wakeup(status, mask)
            }
            interrupts::PWR_CTRL1 => {
                let (status, mask) = self.sample(PWR_CTRL1_IRQ);
                self.psm.direct_sleep(status, mask)
            }
            _ => return false,
        };
        if let Err(e) = result {
            debug!("PSM interrupt {} failed: {:?}", interrupt, e);
        }
        true
    }
}

impl<IO: RegisterIo, C: PsmConfig> Chip for VersalNetPsm<'_, IO, C> {
    fn service_pending_interrupts(&self) {
        while let Some(interrupt) = self.next_pending() {
            // Every serviced bit is acknowledged or masked before its
            // dispatcher returns, so this terminates.
            unsafe {
                self.service_interrupt(interrupt);
            }
        }
    }

    fn has_pending_interrupts(&self) -> bool {
        self.next_pending().is_some()
    }
}
