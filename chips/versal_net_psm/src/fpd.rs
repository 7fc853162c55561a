// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Full-power domain group.
//!
//! The PSM does not power the FPD up itself: the platform firmware brings up
//! the supply and the PSM only observes it. On power-down the PSM isolates the
//! FPD from the low-power domain and stops listening to the FPD supply alarm.

use kernel::hil::register_io::RegisterIo;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::{FpdCtrl, PowerState};
use crate::power::PowerManager;
use crate::registers::{DOMAIN_ISO_CNTRL, LOC_PWR_STATE1, PWR_CTRL0_IRQ};

impl<IO: RegisterIo, C: PsmConfig> PowerManager<'_, IO, C> {
    pub(crate) fn fpd_power_up(&self, entry: PowerState) -> Result<PowerState, ErrorCode> {
        Ok(entry)
    }

    pub(crate) fn fpd_power_down(&self, d: &FpdCtrl) -> Result<PowerState, ErrorCode> {
        if self.is_set(LOC_PWR_STATE1, d.state_mask) {
            self.set_bits(DOMAIN_ISO_CNTRL, d.iso_mask);
            self.io.write32(PWR_CTRL0_IRQ.int_dis(), d.alarm_mask);
            self.clear_bits(LOC_PWR_STATE1, d.state_mask);
        }
        Ok(PowerState::PoweredDown)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{DomainId, PowerState};
    use crate::event::EventRecord;
    use crate::power::PowerManager;
    use crate::registers::*;
    use crate::test_support::{FakeRegisters, TestConfig};

    #[test]
    fn power_down_isolates_and_masks_alarm() {
        let regs = FakeRegisters::psm();
        regs.set(LOC_PWR_STATE1, span(LOC_PWR_STATE1::FP));
        regs.set(PWR_CTRL0_IRQ.int_mask(), 0);
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);
        psm.init();
        assert_eq!(psm.power_state(DomainId::Fpd), PowerState::PoweredUp);

        assert_eq!(psm.request_power_down(DomainId::Fpd), Ok(()));
        assert_eq!(regs.get(DOMAIN_ISO_CNTRL) & 0x3, 0x3);
        assert_eq!(regs.get(PWR_CTRL0_IRQ.int_mask()) & 0x1, 0x1);
        assert_eq!(regs.get(LOC_PWR_STATE1) & span(LOC_PWR_STATE1::FP), 0);
        assert_eq!(psm.power_state(DomainId::Fpd), PowerState::PoweredDown);

        regs.clear_log();
        assert_eq!(psm.request_power_down(DomainId::Fpd), Ok(()));
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn power_up_is_observed_only() {
        let regs = FakeRegisters::psm();
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);
        psm.init();

        assert_eq!(psm.request_power_up(DomainId::Fpd), Ok(()));
        assert_eq!(regs.write_count(), 0);
        assert_eq!(psm.power_state(DomainId::Fpd), PowerState::PoweredDown);
    }
}
