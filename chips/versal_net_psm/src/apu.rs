// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! APU (Cortex-A78) core and cluster sequencing.
//!
//! A core can be powered on two paths. The direct path serves an explicit
//! wake of one core by the platform firmware: it configures the cluster the
//! first time any of its cores comes up, loads the resume address from the
//! event record into the core's reset vector and clears the direct wake
//! interrupt. The request path serves the generic power-up/power-down request
//! interrupts and assumes the cluster is already configured.

use kernel::debug;
use kernel::hil::register_io::RegisterIo;
use kernel::utilities::registers::LocalRegisterCopy;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::ApuCoreCtrl;
use crate::power::PowerManager;
use crate::registers::{
    span, APU_PSTATE, EDPRCR, LOC_PWR_STATE0, MEM_CLEAR_TRIGGER, PACTIVE, PREQ, PWR_CNTRL,
    PWR_CTRL1_IRQ, REQ_PWRDWN0, REQ_PWRUP0, RST_APU, SCAN_CLEAR_TRIGGER, WAKEUP0_IRQ,
};

impl<IO: RegisterIo, C: PsmConfig> PowerManager<'_, IO, C> {
    /// Bring the core's cluster out of reset once per boot.
    fn apu_configure_cluster(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        if self.apu_clusters[d.cluster].get() {
            return Ok(());
        }

        self.rmw_field(d.cluster_pstate, APU_PSTATE::PSTATE::ClusterFullOn);
        self.rmw_field(d.cluster_preq, PREQ::PREQ::SET);

        self.set_bits(d.clk_ctrl, d.clk_mask);
        self.io.wait(d.clk_prop_us);

        self.clear_bits(
            d.rst_ctrl,
            span(RST_APU::CLUSTER_COLD_RESET) | span(RST_APU::CLUSTER_WARM_RESET),
        );

        self.io
            .poll_for_mask(d.cluster_pactive, span(PACTIVE::PACCEPT), d.ack_timeout_us)
            .map_err(|e| {
                debug!("A78 cluster {} PACCEPT timeout", d.cluster);
                e
            })?;

        self.apu_clusters[d.cluster].set(true);
        Ok(())
    }

    /// Power the core island and request the ON power state.
    fn apu_core_on(&self, d: &ApuCoreCtrl) {
        // A full write: enabling the gates also resets every other field.
        self.io
            .write32(d.pwr_ctrl, PWR_CNTRL::PWR_GATES::SET.value);
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::ISOLATION::CLEAR);

        self.rmw_field(d.core_pstate, APU_PSTATE::PSTATE::On);
        self.rmw_field(d.core_preq, PREQ::PREQ::SET);
    }

    /// Hold the core in warm reset, isolate it and cut its power.
    fn apu_core_off(&self, d: &ApuCoreCtrl) {
        self.set_bits(d.rst_ctrl, d.warm_rst_mask);
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::ISOLATION::SET);
        self.rmw_field(d.pwr_ctrl, PWR_CNTRL::PWR_GATES::CLEAR);
    }

    fn apu_wait_core_accept(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        self.io
            .poll_for_mask(d.core_pactive, span(PACTIVE::PACCEPT), d.ack_timeout_us)
            .map_err(|e| {
                debug!("{:?}: A78 core PACCEPT timeout", d.id);
                e
            })
    }

    fn apu_clear_triggers(&self, d: &ApuCoreCtrl) {
        self.clear_bits(SCAN_CLEAR_TRIGGER, d.state_mask);
        self.clear_bits(MEM_CLEAR_TRIGGER, d.state_mask);
    }

    pub(crate) fn apu_direct_power_up(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        self.apu_configure_cluster(d)?;
        self.apu_core_on(d);

        let resume = self.events.take_resume_address(d.id.index());
        self.io.write32(d.rvbar_l, (resume as u32) & !0x1);
        self.io.write32(d.rvbar_l + 0x4, (resume >> 32) as u32);

        self.clear_bits(d.rst_ctrl, d.warm_rst_mask);
        self.apu_wait_core_accept(d)?;

        self.set_bits(LOC_PWR_STATE0, d.state_mask);
        self.io.write32(WAKEUP0_IRQ.status(), d.state_mask);
        self.io.write32(WAKEUP0_IRQ.int_dis(), d.state_mask);
        self.unmask_pending_requests();
        Ok(())
    }

    pub(crate) fn apu_request_power_up(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        self.io.write32(REQ_PWRUP0.status(), d.state_mask);
        self.io.write32(REQ_PWRUP0.int_dis(), d.state_mask);

        if self.is_set(LOC_PWR_STATE0, d.state_mask) {
            return Ok(());
        }

        self.apu_core_on(d);
        self.clear_bits(d.rst_ctrl, d.warm_rst_mask);
        self.apu_wait_core_accept(d)?;

        self.set_bits(LOC_PWR_STATE0, d.state_mask);
        Ok(())
    }

    pub(crate) fn apu_direct_power_down(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        self.apu_clear_triggers(d);

        // The core raised its own power-down request before going idle.
        self.apu_wait_core_accept(d)?;

        self.apu_core_off(d);
        self.io.write32(WAKEUP0_IRQ.int_en(), d.state_mask);

        self.io.write32(PWR_CTRL1_IRQ.int_en(), d.state_mask);
        self.io.write32(PWR_CTRL1_IRQ.status(), d.state_mask);
        self.clear_bits(LOC_PWR_STATE0, d.state_mask);
        Ok(())
    }

    pub(crate) fn apu_request_power_down(&self, d: &ApuCoreCtrl) -> Result<(), ErrorCode> {
        if !self.is_set(LOC_PWR_STATE0, d.state_mask) {
            return Ok(());
        }

        self.apu_clear_triggers(d);

        let edprcr: LocalRegisterCopy<u32, EDPRCR::Register> =
            LocalRegisterCopy::new(self.io.read32(d.dbg_edprcr));
        let pstate = if edprcr.is_set(EDPRCR::CORENPDRQ) {
            // Debugger asked to emulate power-down; keep the core's debug
            // logic reachable.
            APU_PSTATE::PSTATE::OffEmulated
        } else {
            APU_PSTATE::PSTATE::Off
        };
        self.rmw_field(d.core_pstate, pstate);
        self.rmw_field(d.core_preq, PREQ::PREQ::SET);
        self.apu_wait_core_accept(d)?;

        self.apu_core_off(d);

        self.io.write32(REQ_PWRUP0.int_en(), d.state_mask);
        self.clear_bits(LOC_PWR_STATE0, d.state_mask);
        self.io.write32(REQ_PWRDWN0.status(), d.state_mask);
        Ok(())
    }
}
