// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Simulated PSM register file for unit tests.
//!
//! Registers read as zero until written. Interrupt groups behave like the
//! hardware: `STATUS` is write-one-to-clear and `INT_EN`/`INT_DIS` update
//! `INT_MASK`. A few hardware links mirror control writes into the status
//! bits a sequencer polls for, so handshakes complete unless the polled
//! address has been made stuck.

use core::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::vec::Vec;

use kernel::hil::register_io::RegisterIo;

use crate::chip_config::PsmConfig;
use crate::registers::*;

pub(crate) enum TestConfig {}

impl PsmConfig for TestConfig {
    const NAME: &'static str = "test";
    const CPU_FREQ: u32 = 1_000_000;
    const ACPU_PACCEPT_TIMEOUT_US: u32 = 10;
    const RPU_PACCEPT_TIMEOUT_US: u32 = 10;
    const MEM_ACK_TIMEOUT_US: u32 = 10;
    const TCM_PWR_UP_WAIT_US: u32 = 5;
    const CLK_PROP_TIME_US: u32 = 1;
    const STRICT_RETENTION_CHECK: bool = false;
}

const IRQ_GROUPS: [IrqGroup; 9] = [
    REQ_PWRUP0,
    REQ_PWRUP1,
    REQ_PWRDWN0,
    REQ_PWRDWN1,
    REQ_SWRST,
    WAKEUP0_IRQ,
    WAKEUP1_IRQ,
    PWR_CTRL0_IRQ,
    PWR_CTRL1_IRQ,
];

/// Bank power control register and the status register it drives.
const BANK_LINKS: [(usize, usize); 3] = [
    (OCM_PWR_CNTRL, OCM_PWR_STATUS),
    (TCM_PWR_CNTRL, TCM_PWR_STATUS),
    (GEM_PWR_CNTRL, GEM_PWR_STATUS),
];

pub(crate) struct FakeRegisters {
    regs: RefCell<BTreeMap<usize, u32>>,
    log: RefCell<Vec<(usize, u32)>>,
    stuck: RefCell<BTreeSet<usize>>,
    waited: Cell<u32>,
    retention_link: bool,
}

impl FakeRegisters {
    /// Register file at its reset values: every interrupt masked and every
    /// core island isolated.
    pub(crate) fn psm() -> FakeRegisters {
        let regs = FakeRegisters {
            regs: RefCell::new(BTreeMap::new()),
            log: RefCell::new(Vec::new()),
            stuck: RefCell::new(BTreeSet::new()),
            waited: Cell::new(0),
            retention_link: false,
        };
        for group in IRQ_GROUPS {
            regs.set(group.int_mask(), u32::MAX);
        }
        let isolated = span(PWR_CNTRL::ISOLATION);
        for n in 0..8 {
            regs.set(apu_pwr_cntrl(n), isolated);
        }
        for n in 0..4 {
            regs.set(rpu_pwr_cntrl(n), isolated);
        }
        regs
    }

    /// Report retention entry in `LOC_AUX_PWR_STATE` when a retention control
    /// bit is set. Current silicon does not.
    pub(crate) fn with_retention_link(mut self) -> FakeRegisters {
        self.retention_link = true;
        self
    }

    pub(crate) fn get(&self, addr: usize) -> u32 {
        self.regs.borrow().get(&addr).copied().unwrap_or(0)
    }

    /// Store a value without logging it or triggering any link.
    pub(crate) fn set(&self, addr: usize, val: u32) {
        self.regs.borrow_mut().insert(addr, val);
    }

    /// Links never update `addr` again.
    pub(crate) fn stick(&self, addr: usize) {
        self.stuck.borrow_mut().insert(addr);
    }

    pub(crate) fn clear_log(&self) {
        self.log.borrow_mut().clear();
    }

    pub(crate) fn write_count(&self) -> usize {
        self.log.borrow().len()
    }

    pub(crate) fn writes_to(&self, addr: usize) -> Vec<u32> {
        self.log
            .borrow()
            .iter()
            .filter(|(a, _)| *a == addr)
            .map(|(_, v)| *v)
            .collect()
    }

    pub(crate) fn written_addresses(&self) -> Vec<usize> {
        let mut addrs: Vec<usize> = self.log.borrow().iter().map(|(a, _)| *a).collect();
        addrs.dedup();
        addrs
    }

    /// Total simulated microseconds spent in `wait`.
    pub(crate) fn waited(&self) -> u32 {
        self.waited.get()
    }

    fn link(&self, addr: usize, val: u32) {
        if !self.stuck.borrow().contains(&addr) {
            self.set(addr, val);
        }
    }

    fn accept_on_request(&self, addr: usize, val: u32) {
        let preq = span(PREQ::PREQ);
        let accept = span(PACTIVE::PACCEPT);
        let pactive = (0..8)
            .find(|&n| addr == apu_core_preq(n))
            .map(apu_core_pactive)
            .or_else(|| {
                (0..4)
                    .find(|&c| addr == apu_cluster_preq(c))
                    .map(apu_cluster_pactive)
            })
            .or_else(|| (0..4).find(|&n| addr == rpu_pcil_preq(n)).map(rpu_pcil_pactive));
        if let Some(pactive) = pactive {
            if val & preq != 0 {
                self.link(pactive, self.get(pactive) | accept);
            }
        }
    }

    fn retain_on_request(&self, addr: usize, val: u32) {
        let field = match addr {
            OCM_RET_CNTRL => LOC_PWR_STATE0::OCM,
            TCM_RET_CNTRL => LOC_PWR_STATE0::TCM,
            _ => return,
        };
        let aux = self.get(LOC_AUX_PWR_STATE) & !span(field);
        let bits = (val & field.mask) << field.shift;
        self.link(LOC_AUX_PWR_STATE, aux | bits);
    }
}

impl RegisterIo for FakeRegisters {
    fn read32(&self, addr: usize) -> u32 {
        self.get(addr)
    }

    fn write32(&self, addr: usize, val: u32) {
        self.log.borrow_mut().push((addr, val));

        for group in IRQ_GROUPS {
            if addr == group.status() {
                self.set(addr, self.get(addr) & !val);
                return;
            }
            if addr == group.int_en() {
                self.set(group.int_mask(), self.get(group.int_mask()) & !val);
                return;
            }
            if addr == group.int_dis() {
                self.set(group.int_mask(), self.get(group.int_mask()) | val);
                return;
            }
        }

        self.set(addr, val);

        if let Some((_, status)) = BANK_LINKS.iter().find(|(ctrl, _)| *ctrl == addr) {
            self.link(*status, val);
        }
        self.accept_on_request(addr, val);
        if self.retention_link {
            self.retain_on_request(addr, val);
        }
    }

    fn wait(&self, us: u32) {
        self.waited.set(self.waited.get() + us);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_group_semantics() {
        let regs = FakeRegisters::psm();
        regs.set(REQ_PWRUP0.status(), 0b111);
        regs.write32(REQ_PWRUP0.status(), 0b010);
        assert_eq!(regs.get(REQ_PWRUP0.status()), 0b101);

        regs.write32(REQ_PWRUP0.int_en(), 0b011);
        assert_eq!(regs.get(REQ_PWRUP0.int_mask()), !0b011);
        regs.write32(REQ_PWRUP0.int_dis(), 0b001);
        assert_eq!(regs.get(REQ_PWRUP0.int_mask()), !0b010);
    }

    #[test]
    fn handshake_links() {
        let regs = FakeRegisters::psm();
        regs.write32(TCM_PWR_CNTRL, 0x4);
        assert_eq!(regs.get(TCM_PWR_STATUS), 0x4);

        regs.write32(rpu_pcil_preq(3), 1);
        assert_eq!(regs.get(rpu_pcil_pactive(3)), 1);

        regs.stick(apu_cluster_pactive(1));
        regs.write32(apu_cluster_preq(1), 1);
        assert_eq!(regs.get(apu_cluster_pactive(1)), 0);
        assert_eq!(regs.writes_to(apu_cluster_preq(1)), vec![1]);
    }

    #[test]
    fn retention_link_is_opt_in() {
        let plain = FakeRegisters::psm();
        plain.write32(OCM_RET_CNTRL, 0x2);
        assert_eq!(plain.get(LOC_AUX_PWR_STATE), 0);

        let linked = FakeRegisters::psm().with_retention_link();
        linked.write32(OCM_RET_CNTRL, 0x2);
        linked.write32(TCM_RET_CNTRL, 0x8);
        assert_eq!(linked.get(LOC_AUX_PWR_STATE), (1 << 9) | (1 << 27));
    }
}
