// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Register map of the PSM and the power-island controls it owns.
//!
//! Addresses are absolute. Field layouts are described with
//! `register_bitfields!` and per-instance masks are derived from those fields,
//! so the bit position of, say, OCM island 5 in the local power state register
//! is written down exactly once.

use kernel::utilities::registers::{register_bitfields, Field, RegisterLongName};

/// Mask of bit `n` within a multi-bit field.
pub const fn nth<R: RegisterLongName>(field: Field<u32, R>, n: usize) -> u32 {
    1 << (field.shift + n)
}

/// Mask covering a whole field in place.
pub const fn span<R: RegisterLongName>(field: Field<u32, R>) -> u32 {
    field.mask << field.shift
}

pub const PSMX_LOCAL_BASE: usize = 0xEBC9_0000;
pub const PSMX_GLOBAL_BASE: usize = 0xEBC9_1000;

pub const LOC_PWR_STATE0: usize = PSMX_LOCAL_BASE + 0x000;
pub const LOC_PWR_STATE1: usize = PSMX_LOCAL_BASE + 0x004;
pub const LOC_AUX_PWR_STATE: usize = PSMX_LOCAL_BASE + 0x008;

pub const OCM_CE_CNTRL: usize = PSMX_LOCAL_BASE + 0x010;
pub const OCM_PWR_CNTRL: usize = PSMX_LOCAL_BASE + 0x014;
pub const OCM_PWR_STATUS: usize = PSMX_LOCAL_BASE + 0x018;
pub const OCM_RET_CNTRL: usize = PSMX_LOCAL_BASE + 0x01C;

pub const TCM_CE_CNTRL: usize = PSMX_LOCAL_BASE + 0x020;
pub const TCM_PWR_CNTRL: usize = PSMX_LOCAL_BASE + 0x024;
pub const TCM_PWR_STATUS: usize = PSMX_LOCAL_BASE + 0x028;
pub const TCM_RET_CNTRL: usize = PSMX_LOCAL_BASE + 0x02C;

pub const GEM_CE_CNTRL: usize = PSMX_LOCAL_BASE + 0x030;
pub const GEM_PWR_CNTRL: usize = PSMX_LOCAL_BASE + 0x034;
pub const GEM_PWR_STATUS: usize = PSMX_LOCAL_BASE + 0x038;

pub const RPU_CACHE_CE_CNTRL: usize = PSMX_LOCAL_BASE + 0x040;
pub const RPU_CACHE_PWR_CNTRL: usize = PSMX_LOCAL_BASE + 0x044;

pub const DOMAIN_ISO_CNTRL: usize = PSMX_LOCAL_BASE + 0x050;

pub const SCAN_CLEAR_TRIGGER: usize = PSMX_LOCAL_BASE + 0x060;
pub const MEM_CLEAR_TRIGGER: usize = PSMX_LOCAL_BASE + 0x064;

/// Power control of APU core `n` (0..8, cluster-major).
pub const fn apu_pwr_cntrl(n: usize) -> usize {
    PSMX_LOCAL_BASE + 0x100 + n * 0x10
}

/// Power control of RPU core `n` (A0, A1, B0, B1).
pub const fn rpu_pwr_cntrl(n: usize) -> usize {
    PSMX_LOCAL_BASE + 0x200 + n * 0x10
}

/// One global interrupt group: four consecutive words.
///
/// `STATUS` is write-one-to-clear, `INT_MASK` reads one for masked sources,
/// `INT_EN` and `INT_DIS` unmask and mask the sources written as one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IrqGroup {
    base: usize,
}

impl IrqGroup {
    const fn at(base: usize) -> IrqGroup {
        IrqGroup { base }
    }

    pub const fn status(self) -> usize {
        self.base
    }

    pub const fn int_mask(self) -> usize {
        self.base + 0x4
    }

    pub const fn int_en(self) -> usize {
        self.base + 0x8
    }

    pub const fn int_dis(self) -> usize {
        self.base + 0xC
    }
}

pub const REQ_PWRUP0: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x110);
pub const REQ_PWRUP1: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x120);
pub const REQ_PWRDWN0: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x130);
pub const REQ_PWRDWN1: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x140);
pub const REQ_SWRST: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x150);
pub const WAKEUP0_IRQ: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x160);
pub const WAKEUP1_IRQ: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x170);
pub const PWR_CTRL0_IRQ: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x180);
pub const PWR_CTRL1_IRQ: IrqGroup = IrqGroup::at(PSMX_GLOBAL_BASE + 0x190);

/// APU power/clock/reset handshake (PCLI) block.
pub const APU_PCLI_BASE: usize = 0xECB1_0000;

pub const fn apu_core_preq(n: usize) -> usize {
    APU_PCLI_BASE + n * 0x30
}

pub const fn apu_core_pstate(n: usize) -> usize {
    APU_PCLI_BASE + n * 0x30 + 0x4
}

pub const fn apu_core_pactive(n: usize) -> usize {
    APU_PCLI_BASE + n * 0x30 + 0x8
}

pub const fn apu_cluster_preq(cluster: usize) -> usize {
    APU_PCLI_BASE + 0x800 + cluster * 0x30
}

pub const fn apu_cluster_pstate(cluster: usize) -> usize {
    APU_PCLI_BASE + 0x800 + cluster * 0x30 + 0x4
}

pub const fn apu_cluster_pactive(cluster: usize) -> usize {
    APU_PCLI_BASE + 0x800 + cluster * 0x30 + 0x8
}

/// Reset vector, low word, of `core` in `cluster`. The high word follows at
/// `+0x4`.
pub const fn apu_rvbaraddr_l(cluster: usize, core: usize) -> usize {
    0xECC1_0040 + cluster * 0x10_0000 + core * 0x8
}

pub const fn crf_acpu_clk_ctrl(cluster: usize) -> usize {
    0xEC20_010C + cluster * 0x4
}

pub const fn crf_rst_apu(cluster: usize) -> usize {
    0xEC20_0300 + cluster * 0x4
}

/// CoreSight external debug power/reset control of an APU core.
pub const fn apu_dbg_edprcr(cluster: usize, core: usize) -> usize {
    0xE041_0310 + core * 0x2_0000 + cluster * 0x10_0000
}

/// RPU power/clock/reset handshake (PCIL) block of core `n`.
pub const fn rpu_pcil_ids(n: usize) -> usize {
    0xEB42_0000 + n * 0x100 + 0x0C
}

pub const fn rpu_pcil_pstate(n: usize) -> usize {
    0xEB42_0000 + n * 0x100 + 0x40
}

pub const fn rpu_pcil_preq(n: usize) -> usize {
    0xEB42_0000 + n * 0x100 + 0x44
}

pub const fn rpu_pcil_pactive(n: usize) -> usize {
    0xEB42_0000 + n * 0x100 + 0x48
}

pub const fn rpu_cfg0(cluster: usize, core: usize) -> usize {
    0xEB58_8100 + cluster * 0x1_0000 + core * 0x100
}

pub const fn rpu_vectable(cluster: usize, core: usize) -> usize {
    0xEB58_8110 + cluster * 0x1_0000 + core * 0x100
}

pub const CRL_RST_RPU: usize = 0xEB5E_0310;

/// PSM inter-processor interrupt trigger.
pub const IPI_PSM_TRIG: usize = 0xEB33_0000;

register_bitfields![u32,
    pub LOC_PWR_STATE0 [
        ACPU OFFSET(0) NUMBITS(8) [],
        OCM OFFSET(8) NUMBITS(8) [],
        RPU OFFSET(20) NUMBITS(4) [],
        TCM OFFSET(24) NUMBITS(4) []
    ],
    pub LOC_PWR_STATE1 [
        GEM OFFSET(0) NUMBITS(2) [],
        FP OFFSET(8) NUMBITS(1) []
    ],
    // Bank-local CE/PWR/STATUS/RET registers, one bit per instance.
    pub BANK_CNTRL [
        BANK OFFSET(0) NUMBITS(8) []
    ],
    pub RPU_CACHE_CNTRL [
        CORE OFFSET(4) NUMBITS(4) []
    ],
    pub REQ_PWR0 [
        ACPU OFFSET(0) NUMBITS(8) [],
        FP OFFSET(16) NUMBITS(1) []
    ],
    pub REQ_PWR1 [
        GEM OFFSET(0) NUMBITS(2) [],
        RPU OFFSET(2) NUMBITS(4) [],
        OCM OFFSET(6) NUMBITS(8) [],
        TCM OFFSET(14) NUMBITS(4) [],
        OCM_RET OFFSET(18) NUMBITS(8) [],
        TCM_RET OFFSET(26) NUMBITS(4) []
    ],
    pub WAKEUP0 [
        ACPU OFFSET(0) NUMBITS(8) []
    ],
    pub WAKEUP1 [
        RPU OFFSET(6) NUMBITS(4) []
    ],
    pub PWR_CTRL0 [
        FPD_SUPPLY OFFSET(0) NUMBITS(1) []
    ],
    pub PWR_CTRL1 [
        ACPU OFFSET(0) NUMBITS(8) [],
        RPU OFFSET(8) NUMBITS(4) []
    ],
    pub PWR_CNTRL [
        PWR_GATES OFFSET(0) NUMBITS(4) [],
        ISOLATION OFFSET(4) NUMBITS(1) []
    ],
    pub DOMAIN_ISO [
        LPD_FPD_DFX OFFSET(0) NUMBITS(1) [],
        LPD_FPD OFFSET(1) NUMBITS(1) []
    ],
    pub PREQ [
        PREQ OFFSET(0) NUMBITS(1) []
    ],
    pub APU_PSTATE [
        PSTATE OFFSET(0) NUMBITS(7) [
            Off = 0x00,
            OffEmulated = 0x01,
            On = 0x08,
            ClusterFullOn = 0x48
        ]
    ],
    pub RPU_PSTATE [
        PSTATE OFFSET(0) NUMBITS(1) [
            On = 0,
            Off = 1
        ]
    ],
    pub PACTIVE [
        PACCEPT OFFSET(0) NUMBITS(1) []
    ],
    pub PCIL_IDS [
        PACTIVE1 OFFSET(0) NUMBITS(1) []
    ],
    pub ACPU_CLK_CTRL [
        CLKACT OFFSET(25) NUMBITS(1) []
    ],
    pub RST_APU [
        CORE_WARM_RESET OFFSET(0) NUMBITS(4) [],
        CLUSTER_COLD_RESET OFFSET(8) NUMBITS(1) [],
        CLUSTER_WARM_RESET OFFSET(9) NUMBITS(1) []
    ],
    pub RST_RPU [
        CORE OFFSET(0) NUMBITS(4) []
    ],
    pub RPU_CFG0 [
        TCMBOOT OFFSET(4) NUMBITS(1) []
    ],
    pub EDPRCR [
        CORENPDRQ OFFSET(0) NUMBITS(1) []
    ],
    pub IPI_TRIG [
        PMC OFFSET(1) NUMBITS(1) []
    ]
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_masks() {
        assert_eq!(nth(LOC_PWR_STATE0::ACPU, 0), 0x1);
        assert_eq!(nth(LOC_PWR_STATE0::OCM, 5), 1 << 13);
        assert_eq!(nth(LOC_PWR_STATE0::RPU, 0), 1 << 20);
        assert_eq!(span(LOC_PWR_STATE0::TCM), 0x0F00_0000);
        assert_eq!(span(RST_APU::CORE_WARM_RESET), 0xF);
    }

    #[test]
    fn irq_group_layout() {
        assert_eq!(REQ_PWRDWN1.int_mask(), REQ_PWRDWN1.status() + 4);
        assert_eq!(REQ_PWRDWN1.int_dis(), PSMX_GLOBAL_BASE + 0x14C);
        assert_ne!(WAKEUP0_IRQ.status(), WAKEUP1_IRQ.status());
    }
}
