// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Power domain identifiers and control descriptors.
//!
//! Every physical power island owned by the PSM has exactly one descriptor.
//! A descriptor is plain data: the addresses and masks a sequencer needs to
//! walk that island through power-up or power-down. Descriptors are built
//! once from the register map and the chip configuration and never change.

use crate::chip_config::PsmConfig;
use crate::registers::*;

/// Every power domain sequenced by the PSM.
///
/// Processor cores come first so that their discriminant doubles as their
/// slot index in the cross-firmware event record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum DomainId {
    Acpu0Core0 = 0,
    Acpu0Core1,
    Acpu0Core2,
    Acpu0Core3,
    Acpu1Core0,
    Acpu1Core1,
    Acpu1Core2,
    Acpu1Core3,
    RpuA0,
    RpuA1,
    RpuB0,
    RpuB1,
    OcmB0I0,
    OcmB0I1,
    OcmB0I2,
    OcmB0I3,
    OcmB1I0,
    OcmB1I1,
    OcmB1I2,
    OcmB1I3,
    TcmA0,
    TcmA1,
    TcmB0,
    TcmB1,
    Gem0,
    Gem1,
    Fpd,
}

pub const NUM_DOMAINS: usize = 27;
pub const NUM_CORES: usize = 12;
pub const NUM_APU_CLUSTERS: usize = 4;
pub const APU_CORES_PER_CLUSTER: usize = 4;

impl DomainId {
    pub const ALL: [DomainId; NUM_DOMAINS] = [
        DomainId::Acpu0Core0,
        DomainId::Acpu0Core1,
        DomainId::Acpu0Core2,
        DomainId::Acpu0Core3,
        DomainId::Acpu1Core0,
        DomainId::Acpu1Core1,
        DomainId::Acpu1Core2,
        DomainId::Acpu1Core3,
        DomainId::RpuA0,
        DomainId::RpuA1,
        DomainId::RpuB0,
        DomainId::RpuB1,
        DomainId::OcmB0I0,
        DomainId::OcmB0I1,
        DomainId::OcmB0I2,
        DomainId::OcmB0I3,
        DomainId::OcmB1I0,
        DomainId::OcmB1I1,
        DomainId::OcmB1I2,
        DomainId::OcmB1I3,
        DomainId::TcmA0,
        DomainId::TcmA1,
        DomainId::TcmB0,
        DomainId::TcmB1,
        DomainId::Gem0,
        DomainId::Gem1,
        DomainId::Fpd,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot in the cross-firmware event record, for processor cores only.
    pub const fn core_slot(self) -> Option<usize> {
        let i = self as usize;
        if i < NUM_CORES {
            Some(i)
        } else {
            None
        }
    }
}

/// Tracked power state of one domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerState {
    PoweredDown,
    PoweringUp,
    PoweredUp,
    PoweringDown,
    /// Memory contents kept, array otherwise power-gated.
    Retained,
}

/// APU (A78) core.
///
/// `state_mask` is the core's bit in `LOC_PWR_STATE0`. The request, software
/// reset, direct wake, direct sleep and scan/mem-clear registers all use the
/// same bit position for APU cores.
#[derive(Clone, Copy, Debug)]
pub struct ApuCoreCtrl {
    pub id: DomainId,
    pub cluster: usize,
    pub state_mask: u32,
    pub pwr_ctrl: usize,
    pub rvbar_l: usize,
    pub clk_ctrl: usize,
    pub clk_mask: u32,
    pub clk_prop_us: u32,
    pub rst_ctrl: usize,
    pub warm_rst_mask: u32,
    pub cluster_pstate: usize,
    pub cluster_preq: usize,
    pub cluster_pactive: usize,
    pub core_pstate: usize,
    pub core_preq: usize,
    pub core_pactive: usize,
    pub dbg_edprcr: usize,
    pub ack_timeout_us: u32,
}

/// RPU (R52) core.
#[derive(Clone, Copy, Debug)]
pub struct RpuCoreCtrl {
    pub id: DomainId,
    pub state_mask: u32,
    /// Bit in `REQ_PWRUP1` / `REQ_PWRDWN1`.
    pub request_mask: u32,
    /// Bit in `WAKEUP1_IRQ`.
    pub wake_mask: u32,
    /// Bit in `PWR_CTRL1_IRQ`.
    pub sleep_mask: u32,
    /// Bit in the RPU cache CE and power control registers.
    pub cache_mask: u32,
    pub pwr_ctrl: usize,
    pub rst_mask: u32,
    pub cfg0: usize,
    pub vectable: usize,
    pub pcil_ids: usize,
    pub pstate: usize,
    pub preq: usize,
    pub pactive: usize,
    pub ack_timeout_us: u32,
}

/// Retention controls of a memory bank.
#[derive(Clone, Copy, Debug)]
pub struct RetentionCtrl {
    /// Retention request bit in `REQ_PWRDWN1`.
    pub request_mask: u32,
    pub ctrl: usize,
    pub ctrl_mask: u32,
}

/// OCM island, TCM bank or GEM peripheral memory.
#[derive(Clone, Copy, Debug)]
pub struct MemBankCtrl {
    pub id: DomainId,
    /// `LOC_PWR_STATE0` or `LOC_PWR_STATE1`.
    pub state_reg: usize,
    /// Bit in `state_reg`, and in `LOC_AUX_PWR_STATE` for retention.
    pub state_mask: u32,
    pub ce_ctrl: usize,
    pub ce_mask: u32,
    pub pwr_ctrl: usize,
    pub pwr_mask: u32,
    pub pwr_status: usize,
    pub pwr_status_mask: u32,
    /// Bit in `REQ_PWRUP1` / `REQ_PWRDWN1`.
    pub request_mask: u32,
    pub retention: Option<RetentionCtrl>,
    pub ack_timeout_us: u32,
    pub settle_us: u32,
}

/// Full-power domain group.
#[derive(Clone, Copy, Debug)]
pub struct FpdCtrl {
    pub state_mask: u32,
    pub iso_mask: u32,
    pub alarm_mask: u32,
}

#[derive(Clone, Copy, Debug)]
pub enum Descriptor {
    ApuCore(ApuCoreCtrl),
    RpuCore(RpuCoreCtrl),
    Memory(MemBankCtrl),
    Fpd(FpdCtrl),
}

impl Descriptor {
    /// Build the descriptor of `id` for configuration `C`.
    pub fn new<C: PsmConfig>(id: DomainId) -> Descriptor {
        let i = id.index();
        match id {
            DomainId::Acpu0Core0
            | DomainId::Acpu0Core1
            | DomainId::Acpu0Core2
            | DomainId::Acpu0Core3
            | DomainId::Acpu1Core0
            | DomainId::Acpu1Core1
            | DomainId::Acpu1Core2
            | DomainId::Acpu1Core3 => Descriptor::ApuCore(apu_core::<C>(id, i)),
            DomainId::RpuA0 | DomainId::RpuA1 | DomainId::RpuB0 | DomainId::RpuB1 => {
                Descriptor::RpuCore(rpu_core::<C>(id, i - DomainId::RpuA0.index()))
            }
            DomainId::OcmB0I0
            | DomainId::OcmB0I1
            | DomainId::OcmB0I2
            | DomainId::OcmB0I3
            | DomainId::OcmB1I0
            | DomainId::OcmB1I1
            | DomainId::OcmB1I2
            | DomainId::OcmB1I3 => Descriptor::Memory(ocm_island::<C>(
                id,
                i - DomainId::OcmB0I0.index(),
            )),
            DomainId::TcmA0 | DomainId::TcmA1 | DomainId::TcmB0 | DomainId::TcmB1 => {
                Descriptor::Memory(tcm_bank::<C>(id, i - DomainId::TcmA0.index()))
            }
            DomainId::Gem0 | DomainId::Gem1 => {
                Descriptor::Memory(gem::<C>(id, i - DomainId::Gem0.index()))
            }
            DomainId::Fpd => Descriptor::Fpd(FpdCtrl {
                state_mask: span(LOC_PWR_STATE1::FP),
                iso_mask: span(DOMAIN_ISO::LPD_FPD_DFX) | span(DOMAIN_ISO::LPD_FPD),
                alarm_mask: span(PWR_CTRL0::FPD_SUPPLY),
            }),
        }
    }
}

fn apu_core<C: PsmConfig>(id: DomainId, n: usize) -> ApuCoreCtrl {
    let cluster = n / APU_CORES_PER_CLUSTER;
    let core = n % APU_CORES_PER_CLUSTER;
    ApuCoreCtrl {
        id,
        cluster,
        state_mask: nth(LOC_PWR_STATE0::ACPU, n),
        pwr_ctrl: apu_pwr_cntrl(n),
        rvbar_l: apu_rvbaraddr_l(cluster, core),
        clk_ctrl: crf_acpu_clk_ctrl(cluster),
        clk_mask: span(ACPU_CLK_CTRL::CLKACT),
        clk_prop_us: C::CLK_PROP_TIME_US,
        rst_ctrl: crf_rst_apu(cluster),
        warm_rst_mask: nth(RST_APU::CORE_WARM_RESET, core),
        cluster_pstate: apu_cluster_pstate(cluster),
        cluster_preq: apu_cluster_preq(cluster),
        cluster_pactive: apu_cluster_pactive(cluster),
        core_pstate: apu_core_pstate(n),
        core_preq: apu_core_preq(n),
        core_pactive: apu_core_pactive(n),
        dbg_edprcr: apu_dbg_edprcr(cluster, core),
        ack_timeout_us: C::ACPU_PACCEPT_TIMEOUT_US,
    }
}

fn rpu_core<C: PsmConfig>(id: DomainId, n: usize) -> RpuCoreCtrl {
    let cluster = n / 2;
    let core = n % 2;
    RpuCoreCtrl {
        id,
        state_mask: nth(LOC_PWR_STATE0::RPU, n),
        request_mask: nth(REQ_PWR1::RPU, n),
        wake_mask: nth(WAKEUP1::RPU, n),
        sleep_mask: nth(PWR_CTRL1::RPU, n),
        cache_mask: nth(RPU_CACHE_CNTRL::CORE, n),
        pwr_ctrl: rpu_pwr_cntrl(n),
        rst_mask: nth(RST_RPU::CORE, n),
        cfg0: rpu_cfg0(cluster, core),
        vectable: rpu_vectable(cluster, core),
        pcil_ids: rpu_pcil_ids(n),
        pstate: rpu_pcil_pstate(n),
        preq: rpu_pcil_preq(n),
        pactive: rpu_pcil_pactive(n),
        ack_timeout_us: C::RPU_PACCEPT_TIMEOUT_US,
    }
}

fn ocm_island<C: PsmConfig>(id: DomainId, n: usize) -> MemBankCtrl {
    let bank = nth(BANK_CNTRL::BANK, n);
    MemBankCtrl {
        id,
        state_reg: LOC_PWR_STATE0,
        state_mask: nth(LOC_PWR_STATE0::OCM, n),
        ce_ctrl: OCM_CE_CNTRL,
        ce_mask: bank,
        pwr_ctrl: OCM_PWR_CNTRL,
        pwr_mask: bank,
        pwr_status: OCM_PWR_STATUS,
        pwr_status_mask: bank,
        request_mask: nth(REQ_PWR1::OCM, n),
        retention: Some(RetentionCtrl {
            request_mask: nth(REQ_PWR1::OCM_RET, n),
            ctrl: OCM_RET_CNTRL,
            ctrl_mask: bank,
        }),
        ack_timeout_us: C::MEM_ACK_TIMEOUT_US,
        settle_us: 0,
    }
}

fn tcm_bank<C: PsmConfig>(id: DomainId, n: usize) -> MemBankCtrl {
    let bank = nth(BANK_CNTRL::BANK, n);
    MemBankCtrl {
        id,
        state_reg: LOC_PWR_STATE0,
        state_mask: nth(LOC_PWR_STATE0::TCM, n),
        ce_ctrl: TCM_CE_CNTRL,
        ce_mask: bank,
        pwr_ctrl: TCM_PWR_CNTRL,
        pwr_mask: bank,
        pwr_status: TCM_PWR_STATUS,
        pwr_status_mask: bank,
        request_mask: nth(REQ_PWR1::TCM, n),
        retention: Some(RetentionCtrl {
            request_mask: nth(REQ_PWR1::TCM_RET, n),
            ctrl: TCM_RET_CNTRL,
            ctrl_mask: bank,
        }),
        ack_timeout_us: C::MEM_ACK_TIMEOUT_US,
        settle_us: C::TCM_PWR_UP_WAIT_US,
    }
}

fn gem<C: PsmConfig>(id: DomainId, n: usize) -> MemBankCtrl {
    let bank = nth(BANK_CNTRL::BANK, n);
    MemBankCtrl {
        id,
        state_reg: LOC_PWR_STATE1,
        state_mask: nth(LOC_PWR_STATE1::GEM, n),
        ce_ctrl: GEM_CE_CNTRL,
        ce_mask: bank,
        pwr_ctrl: GEM_PWR_CNTRL,
        pwr_mask: bank,
        pwr_status: GEM_PWR_STATUS,
        pwr_status_mask: bank,
        request_mask: nth(REQ_PWR1::GEM, n),
        retention: None,
        ack_timeout_us: C::MEM_ACK_TIMEOUT_US,
        settle_us: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip_config::Silicon;

    #[test]
    fn discriminants_match_table_order() {
        for (i, id) in DomainId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
        assert_eq!(DomainId::RpuB1.core_slot(), Some(11));
        assert_eq!(DomainId::OcmB0I0.core_slot(), None);
    }

    #[test]
    fn cluster_membership() {
        let Descriptor::ApuCore(c3) = Descriptor::new::<Silicon>(DomainId::Acpu0Core3) else {
            panic!("expected an APU core");
        };
        let Descriptor::ApuCore(c4) = Descriptor::new::<Silicon>(DomainId::Acpu1Core0) else {
            panic!("expected an APU core");
        };
        assert_eq!(c3.cluster, 0);
        assert_eq!(c4.cluster, 1);
        assert_eq!(c3.warm_rst_mask, 1 << 3);
        assert_eq!(c4.warm_rst_mask, 1 << 0);
        assert_ne!(c3.rst_ctrl, c4.rst_ctrl);
    }

    #[test]
    fn state_bits_are_unique() {
        let mut seen0 = 0u32;
        let mut seen1 = 0u32;
        for id in DomainId::ALL {
            let (reg, mask) = match Descriptor::new::<Silicon>(id) {
                Descriptor::ApuCore(d) => (LOC_PWR_STATE0, d.state_mask),
                Descriptor::RpuCore(d) => (LOC_PWR_STATE0, d.state_mask),
                Descriptor::Memory(d) => (d.state_reg, d.state_mask),
                Descriptor::Fpd(d) => (LOC_PWR_STATE1, d.state_mask),
            };
            assert_eq!(mask.count_ones(), 1);
            let seen = if reg == LOC_PWR_STATE0 {
                &mut seen0
            } else {
                &mut seen1
            };
            assert_eq!(*seen & mask, 0, "{:?} shares a state bit", id);
            *seen |= mask;
        }
    }

    #[test]
    fn only_gem_lacks_retention() {
        for id in DomainId::ALL {
            if let Descriptor::Memory(d) = Descriptor::new::<Silicon>(id) {
                let gem = d.state_reg == LOC_PWR_STATE1;
                assert_eq!(d.retention.is_none(), gem, "{:?}", id);
            }
        }
    }
}
