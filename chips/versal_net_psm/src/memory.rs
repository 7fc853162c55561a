// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! OCM, TCM and GEM memory bank sequencing.
//!
//! All three kinds share one sequence: chip enable, power, then wait for the
//! bank's power status to acknowledge. OCM islands and TCM banks may instead
//! enter retention on power-down when the requester also raised the bank's
//! retention request bit. GEM memories have no retention control.

use kernel::debug;
use kernel::hil::register_io::RegisterIo;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::{MemBankCtrl, PowerState, RetentionCtrl};
use crate::power::PowerManager;
use crate::registers::{LOC_AUX_PWR_STATE, REQ_PWRDWN1, REQ_PWRUP1};

impl<IO: RegisterIo, C: PsmConfig> PowerManager<'_, IO, C> {
    pub(crate) fn mem_power_up(&self, d: &MemBankCtrl) -> Result<PowerState, ErrorCode> {
        if self.is_set(d.state_reg, d.state_mask) {
            self.io.write32(REQ_PWRUP1.status(), d.request_mask);
            return Ok(PowerState::PoweredUp);
        }

        self.set_bits(d.ce_ctrl, d.ce_mask);
        self.set_bits(d.pwr_ctrl, d.pwr_mask);
        self.set_bits(d.state_reg, d.state_mask);

        if let Err(e) = self
            .io
            .poll_for_mask(d.pwr_status, d.pwr_status_mask, d.ack_timeout_us)
        {
            self.clear_bits(d.state_reg, d.state_mask);
            debug!("{:?}: power status did not acknowledge", d.id);
            return Err(e);
        }

        if d.settle_us != 0 {
            self.io.wait(d.settle_us);
        }

        let down_mask = d.request_mask | d.retention.map_or(0, |r| r.request_mask);
        self.io.write32(REQ_PWRDWN1.int_en(), down_mask);
        self.io.write32(REQ_PWRUP1.status(), d.request_mask);
        Ok(PowerState::PoweredUp)
    }

    pub(crate) fn mem_power_down(
        &self,
        d: &MemBankCtrl,
        entry: PowerState,
    ) -> Result<PowerState, ErrorCode> {
        if !self.is_set(d.state_reg, d.state_mask) {
            return Ok(entry);
        }

        self.io.write32(REQ_PWRDWN1.status(), d.request_mask);

        let settled = match d.retention {
            Some(ret) if self.is_set(REQ_PWRDWN1.status(), ret.request_mask) => {
                self.mem_enter_retention(d, &ret)?;
                PowerState::Retained
            }
            Some(ret) => {
                self.clear_bits(ret.ctrl, ret.ctrl_mask);
                self.io
                    .poll_for_zero(LOC_AUX_PWR_STATE, d.state_mask, d.ack_timeout_us)
                    .map_err(|e| {
                        debug!("{:?}: retention is not disabled", d.id);
                        e
                    })?;
                PowerState::PoweredDown
            }
            None => PowerState::PoweredDown,
        };

        self.clear_bits(d.pwr_ctrl, d.pwr_mask);
        self.clear_bits(d.ce_ctrl, d.ce_mask);
        self.clear_bits(d.state_reg, d.state_mask);

        if let Err(e) = self
            .io
            .poll_for_zero(d.pwr_status, d.pwr_status_mask, d.ack_timeout_us)
        {
            self.set_bits(d.state_reg, d.state_mask);
            debug!("{:?}: power status did not release", d.id);
            return Err(e);
        }

        self.io.write32(REQ_PWRUP1.int_en(), d.request_mask);
        self.io.write32(REQ_PWRDWN1.status(), d.request_mask);
        Ok(settled)
    }

    fn mem_enter_retention(&self, d: &MemBankCtrl, ret: &RetentionCtrl) -> Result<(), ErrorCode> {
        self.io.write32(REQ_PWRDWN1.status(), ret.request_mask);
        self.set_bits(ret.ctrl, ret.ctrl_mask);

        if !self.is_set(LOC_AUX_PWR_STATE, d.state_mask) {
            // Known erratum: silicon does not report retention entry.
            debug!("{:?}: retention mode is not set", d.id);
            if C::STRICT_RETENTION_CHECK {
                self.clear_bits(ret.ctrl, ret.ctrl_mask);
                return Err(ErrorCode::FAIL);
            }
        }
        Ok(())
    }

    pub(crate) fn mem_release_retention(&self, d: &MemBankCtrl) -> Result<(), ErrorCode> {
        let ret = d.retention.ok_or(ErrorCode::INVAL)?;
        self.clear_bits(ret.ctrl, ret.ctrl_mask);
        self.io
            .poll_for_zero(LOC_AUX_PWR_STATE, d.state_mask, d.ack_timeout_us)
    }
}
