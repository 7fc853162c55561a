// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! RPU (Cortex-R52) core sequencing.

use kernel::debug;
use kernel::hil::register_io::RegisterIo;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::RpuCoreCtrl;
use crate::power::PowerManager;
use crate::registers::{
    span, CRL_RST_RPU, LOC_PWR_STATE0, PACTIVE, PCIL_IDS, PREQ, PWR_CNTRL, PWR_CTRL1_IRQ,
    REQ_PWRDWN1, REQ_PWRUP1, RPU_CACHE_CE_CNTRL, RPU_CACHE_PWR_CNTRL, RPU_CFG0, RPU_PSTATE,
    WAKEUP1_IRQ,
};

/// Vector table base alignment of the R52.
const VECTOR_ALIGN_MASK: u32 = 0x1F;

impl<IO: RegisterIo, C: PsmConfig> PowerManager<'_, IO, C> {
    fn rpu_wait_accept(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.io
            .poll_for_mask(d.pactive, span(PACTIVE::PACCEPT), d.ack_timeout_us)
            .map_err(|e| {
                debug!("{:?}: R52 core PACCEPT timeout", d.id);
                e
            })
    }

    fn rpu_core_on(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.io.write32(d.pcil_ids, span(PCIL_IDS::PACTIVE1));
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::PWR_GATES::SET);
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::ISOLATION::CLEAR);

        self.set_bits(RPU_CACHE_PWR_CNTRL, d.cache_mask);
        self.set_bits(RPU_CACHE_CE_CNTRL, d.cache_mask);

        self.rmw_field(d.pstate, RPU_PSTATE::PSTATE::On);
        self.rmw_field(d.preq, PREQ::PREQ::SET);
        self.clear_bits(CRL_RST_RPU, d.rst_mask);

        self.rpu_wait_accept(d)?;
        self.set_bits(LOC_PWR_STATE0, d.state_mask);
        Ok(())
    }

    fn rpu_core_off(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.rmw_field(d.pstate, RPU_PSTATE::PSTATE::Off);
        self.rmw_field(d.preq, PREQ::PREQ::SET);
        self.rpu_wait_accept(d)?;

        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::ISOLATION::SET);
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::PWR_GATES::CLEAR);

        self.clear_bits(RPU_CACHE_CE_CNTRL, d.cache_mask);
        self.clear_bits(RPU_CACHE_PWR_CNTRL, d.cache_mask);

        self.io.write32(d.pcil_ids, span(PCIL_IDS::PACTIVE1));
        self.clear_bits(LOC_PWR_STATE0, d.state_mask);
        Ok(())
    }

    /// Load the boot vector left by the platform firmware, if any.
    ///
    /// Bit 0 of the resume address marks it valid. A zero vector boots from
    /// TCM; anything else is an exception vector table in memory.
    fn rpu_load_vector(&self, d: &RpuCoreCtrl) {
        let slot = d.id.index();
        let resume = self.events.resume_address(slot);
        if resume & 0x1 == 0 {
            return;
        }

        let vector = (resume as u32) & !VECTOR_ALIGN_MASK;
        self.io.write32(d.vectable, vector);
        if vector == 0 {
            self.set_bits(d.cfg0, span(RPU_CFG0::TCMBOOT));
        } else {
            self.clear_bits(d.cfg0, span(RPU_CFG0::TCMBOOT));
        }
        self.events.set_resume_address(slot, 0);
    }

    pub(crate) fn rpu_direct_power_up(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.set_bits(CRL_RST_RPU, d.rst_mask);
        self.rpu_load_vector(d);

        self.io.write32(WAKEUP1_IRQ.int_dis(), d.wake_mask);
        self.rpu_core_on(d)?;

        self.io.write32(WAKEUP1_IRQ.status(), d.wake_mask);
        self.unmask_pending_requests();
        Ok(())
    }

    pub(crate) fn rpu_direct_power_down(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.rpu_core_off(d)?;
        self.io.write32(WAKEUP1_IRQ.int_en(), d.wake_mask);

        self.io.write32(PWR_CTRL1_IRQ.int_en(), d.sleep_mask);
        self.io.write32(PWR_CTRL1_IRQ.status(), d.sleep_mask);
        Ok(())
    }

    pub(crate) fn rpu_request_power_up(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        self.io.write32(REQ_PWRUP1.int_dis(), d.request_mask);
        if self.is_set(LOC_PWR_STATE0, d.state_mask) {
            return Ok(());
        }
        self.rpu_core_on(d)
    }

    pub(crate) fn rpu_request_power_down(&self, d: &RpuCoreCtrl) -> Result<(), ErrorCode> {
        if !self.is_set(LOC_PWR_STATE0, d.state_mask) {
            return Ok(());
        }
        self.io.write32(REQ_PWRDWN1.int_dis(), d.request_mask);
        self.rpu_core_off(d)
    }
}
