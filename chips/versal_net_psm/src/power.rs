// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Power sequencing engine.
//!
//! `PowerManager` owns the domain registry, the per-cluster configuration
//! flags and a reference to the cross-firmware event record. The per-class
//! sequencers (`apu`, `rpu`, `memory`, `fpd`) and the interrupt dispatchers
//! (`dispatch`) are further `impl` blocks on this type.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let mmio = unsafe { Mmio::new::<Silicon>() };
//! let events = EventRecord::new();
//! let psm = PowerManager::<_, Silicon>::new(&mmio, &events);
//! psm.init();
//! platform_firmware.publish(psm.event_channel_address());
//!
//! let chip = VersalNetPsm::new(&psm);
//! loop {
//!     chip.service_pending_interrupts();
//! }
//! ```
//!
//! Single-invocation discipline: all entry points run to completion on the
//! PSM's only thread, from the interrupt bottom half or the main loop, and
//! none of them is re-entered. The cluster flags and the event record are
//! shared between invocations without locking on that basis. A port that adds
//! preemption must wrap `PowerManager` in a critical section at its call
//! boundary.

use core::cell::Cell;
use core::marker::PhantomData;

use kernel::config::CONFIG;
use kernel::debug;
use kernel::hil::register_io::RegisterIo;
use kernel::utilities::registers::FieldValue;
use kernel::utilities::registers::RegisterLongName;
use kernel::ErrorCode;

use crate::chip_config::PsmConfig;
use crate::domain::{Descriptor, DomainId, MemBankCtrl, PowerState, NUM_APU_CLUSTERS, NUM_DOMAINS};
use crate::event::{CoreEvent, EventRecord, CPU_IDLE};
use crate::registers::{
    span, IPI_PSM_TRIG, IPI_TRIG, LOC_AUX_PWR_STATE, LOC_PWR_STATE0, LOC_PWR_STATE1, REQ_PWRUP0,
    REQ_SWRST,
};

/// Platform device identifiers accepted by the direct power API.
pub const DEV_ACPU_0_0: u32 = 0x1810_C0AF;
pub const DEV_ACPU_0_1: u32 = 0x1810_C0B0;
pub const DEV_ACPU_0_2: u32 = 0x1810_C0B1;
pub const DEV_ACPU_0_3: u32 = 0x1810_C0B2;
pub const DEV_ACPU_1_0: u32 = 0x1810_C0B3;
pub const DEV_ACPU_1_1: u32 = 0x1810_C0B4;
pub const DEV_ACPU_1_2: u32 = 0x1810_C0B5;
pub const DEV_ACPU_1_3: u32 = 0x1810_C0B6;
pub const DEV_RPU_A_0: u32 = 0x1811_00BF;
pub const DEV_RPU_A_1: u32 = 0x1811_00C0;
pub const DEV_RPU_B_0: u32 = 0x1811_00C1;
pub const DEV_RPU_B_1: u32 = 0x1811_00C2;

const DEVICES: [(u32, DomainId); 12] = [
    (DEV_ACPU_0_0, DomainId::Acpu0Core0),
    (DEV_ACPU_0_1, DomainId::Acpu0Core1),
    (DEV_ACPU_0_2, DomainId::Acpu0Core2),
    (DEV_ACPU_0_3, DomainId::Acpu0Core3),
    (DEV_ACPU_1_0, DomainId::Acpu1Core0),
    (DEV_ACPU_1_1, DomainId::Acpu1Core1),
    (DEV_ACPU_1_2, DomainId::Acpu1Core2),
    (DEV_ACPU_1_3, DomainId::Acpu1Core3),
    (DEV_RPU_A_0, DomainId::RpuA0),
    (DEV_RPU_A_1, DomainId::RpuA1),
    (DEV_RPU_B_0, DomainId::RpuB0),
    (DEV_RPU_B_1, DomainId::RpuB1),
];

/// Map a platform device identifier to the core it names.
pub fn domain_for_device(device_id: u32) -> Option<DomainId> {
    DEVICES
        .iter()
        .find(|(dev, _)| *dev == device_id)
        .map(|(_, id)| *id)
}

/// Direction of a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerOp {
    Up,
    Down,
}

/// Descriptors of every domain plus their tracked power state.
pub struct DomainRegistry {
    descriptors: [Descriptor; NUM_DOMAINS],
    states: [Cell<PowerState>; NUM_DOMAINS],
}

impl DomainRegistry {
    pub fn new<C: PsmConfig>() -> DomainRegistry {
        DomainRegistry {
            descriptors: core::array::from_fn(|i| Descriptor::new::<C>(DomainId::ALL[i])),
            states: core::array::from_fn(|_| Cell::new(PowerState::PoweredDown)),
        }
    }

    pub fn descriptor(&self, id: DomainId) -> &Descriptor {
        &self.descriptors[id.index()]
    }

    pub fn state(&self, id: DomainId) -> PowerState {
        self.states[id.index()].get()
    }

    fn set_state(&self, id: DomainId, state: PowerState) {
        self.states[id.index()].set(state);
    }
}

pub struct PowerManager<'a, IO: RegisterIo, C: PsmConfig> {
    pub(crate) io: &'a IO,
    pub(crate) events: &'a EventRecord,
    pub(crate) registry: DomainRegistry,
    /// Set once a cluster's reset, clock and PSTATE setup has completed.
    pub(crate) apu_clusters: [Cell<bool>; NUM_APU_CLUSTERS],
    _config: PhantomData<C>,
}

impl<'a, IO: RegisterIo, C: PsmConfig> PowerManager<'a, IO, C> {
    pub fn new(io: &'a IO, events: &'a EventRecord) -> PowerManager<'a, IO, C> {
        PowerManager {
            io,
            events,
            registry: DomainRegistry::new::<C>(),
            apu_clusters: core::array::from_fn(|_| Cell::new(false)),
            _config: PhantomData,
        }
    }

    /// Seed the tracked state of every domain from the local power state
    /// registers.
    pub fn init(&self) {
        let state0 = self.io.read32(LOC_PWR_STATE0);
        let state1 = self.io.read32(LOC_PWR_STATE1);
        let aux = self.io.read32(LOC_AUX_PWR_STATE);

        for id in DomainId::ALL {
            let (reg, mask, retainable) = match self.registry.descriptor(id) {
                Descriptor::ApuCore(d) => (state0, d.state_mask, false),
                Descriptor::RpuCore(d) => (state0, d.state_mask, false),
                Descriptor::Memory(d) => {
                    let reg = if d.state_reg == LOC_PWR_STATE0 {
                        state0
                    } else {
                        state1
                    };
                    (reg, d.state_mask, d.retention.is_some())
                }
                Descriptor::Fpd(d) => (state1, d.state_mask, false),
            };
            let state = if reg & mask != 0 {
                PowerState::PoweredUp
            } else if retainable && aux & mask != 0 {
                PowerState::Retained
            } else {
                PowerState::PoweredDown
            };
            self.registry.set_state(id, state);
        }
        debug!("PSM power manager ({}) ready", C::NAME);
    }

    pub fn power_state(&self, id: DomainId) -> PowerState {
        self.registry.state(id)
    }

    pub fn is_cluster_configured(&self, cluster: usize) -> bool {
        self.apu_clusters[cluster].get()
    }

    pub fn events(&self) -> &EventRecord {
        self.events
    }

    /// Address of the cross-firmware event record, for the platform firmware.
    pub fn event_channel_address(&self) -> usize {
        self.events.address()
    }

    /// Power up the core named by `device_id` on the direct path.
    pub fn direct_power_up(&self, device_id: u32) -> Result<(), ErrorCode> {
        let id = domain_for_device(device_id).ok_or(ErrorCode::INVAL)?;
        self.direct_power_up_domain(id)
    }

    /// Power down the core named by `device_id` on the direct path.
    pub fn direct_power_down(&self, device_id: u32) -> Result<(), ErrorCode> {
        let id = domain_for_device(device_id).ok_or(ErrorCode::INVAL)?;
        self.direct_power_down_domain(id)
    }

    pub(crate) fn direct_power_up_domain(&self, id: DomainId) -> Result<(), ErrorCode> {
        match self.registry.descriptor(id) {
            Descriptor::ApuCore(d) => self.track(id, PowerOp::Up, |_| {
                self.apu_direct_power_up(d)
                    .map(|()| PowerState::PoweredUp)
            }),
            Descriptor::RpuCore(d) => self.track(id, PowerOp::Up, |_| {
                self.rpu_direct_power_up(d)
                    .map(|()| PowerState::PoweredUp)
            }),
            _ => Err(ErrorCode::INVAL),
        }
    }

    pub(crate) fn direct_power_down_domain(&self, id: DomainId) -> Result<(), ErrorCode> {
        match self.registry.descriptor(id) {
            Descriptor::ApuCore(d) => self.track(id, PowerOp::Down, |_| {
                self.apu_direct_power_down(d)
                    .map(|()| PowerState::PoweredDown)
            }),
            Descriptor::RpuCore(d) => self.track(id, PowerOp::Down, |_| {
                self.rpu_direct_power_down(d)
                    .map(|()| PowerState::PoweredDown)
            }),
            _ => Err(ErrorCode::INVAL),
        }
    }

    /// Run the request-path sequencer of `id` in direction `op`.
    pub fn request(&self, id: DomainId, op: PowerOp) -> Result<(), ErrorCode> {
        match (self.registry.descriptor(id), op) {
            (Descriptor::ApuCore(d), PowerOp::Up) => self.track(id, op, |_| {
                self.apu_request_power_up(d)
                    .map(|()| PowerState::PoweredUp)
            }),
            (Descriptor::ApuCore(d), PowerOp::Down) => self.track(id, op, |_| {
                self.apu_request_power_down(d)
                    .map(|()| PowerState::PoweredDown)
            }),
            (Descriptor::RpuCore(d), PowerOp::Up) => self.track(id, op, |_| {
                self.rpu_request_power_up(d)
                    .map(|()| PowerState::PoweredUp)
            }),
            (Descriptor::RpuCore(d), PowerOp::Down) => self.track(id, op, |_| {
                self.rpu_request_power_down(d)
                    .map(|()| PowerState::PoweredDown)
            }),
            (Descriptor::Memory(d), PowerOp::Up) => self.track(id, op, |_| self.mem_power_up(d)),
            (Descriptor::Memory(d), PowerOp::Down) => {
                self.track(id, op, |entry| self.mem_power_down(d, entry))
            }
            (Descriptor::Fpd(_), PowerOp::Up) => self.track(id, op, |entry| self.fpd_power_up(entry)),
            (Descriptor::Fpd(d), PowerOp::Down) => self.track(id, op, |_| self.fpd_power_down(d)),
        }
    }

    pub fn request_power_up(&self, id: DomainId) -> Result<(), ErrorCode> {
        self.request(id, PowerOp::Up)
    }

    pub fn request_power_down(&self, id: DomainId) -> Result<(), ErrorCode> {
        self.request(id, PowerOp::Down)
    }

    /// Leave retention on a retained memory bank, ending in `PoweredDown`.
    pub fn release_retention(&self, id: DomainId) -> Result<(), ErrorCode> {
        let d = match self.registry.descriptor(id) {
            Descriptor::Memory(d) if d.retention.is_some() => d,
            _ => return Err(ErrorCode::INVAL),
        };
        match self.registry.state(id) {
            PowerState::Retained => {}
            PowerState::PoweredDown => return Err(ErrorCode::ALREADY),
            _ => return Err(ErrorCode::INVAL),
        }
        self.mem_release_retention(d)?;
        self.registry.set_state(id, PowerState::PoweredDown);
        Ok(())
    }

    /// Direct wake request for core `id` raised by the wake-up interrupt.
    pub(crate) fn core_wakeup(&self, id: DomainId) -> Result<(), ErrorCode> {
        self.core_event(id, CoreEvent::PowerUp)
    }

    /// Direct sleep request for core `id` raised by the power control
    /// interrupt.
    pub(crate) fn core_sleep(&self, id: DomainId) -> Result<(), ErrorCode> {
        self.core_event(id, CoreEvent::PowerDown)
    }

    fn core_event(&self, id: DomainId, event: CoreEvent) -> Result<(), ErrorCode> {
        let slot = id.core_slot().ok_or(ErrorCode::INVAL)?;
        let pending = self.events.event(slot);
        assert!(
            pending == 0,
            "{:?}: event slot still pending ({:#x})",
            id,
            pending
        );

        if self.events.idle_flag(slot) == CPU_IDLE {
            match event {
                CoreEvent::PowerUp => self.direct_power_up_domain(id)?,
                CoreEvent::PowerDown => self.direct_power_down_domain(id)?,
            }
        }

        self.events.post(slot, event);
        self.notify_platform();
        Ok(())
    }

    /// Raise the inter-processor interrupt towards the platform firmware.
    pub fn notify_platform(&self) {
        self.io.write32(IPI_PSM_TRIG, span(IPI_TRIG::PMC));
    }

    /// Unmask power-up and reset requests that arrived while their interrupt
    /// was masked, so they are delivered now.
    pub(crate) fn unmask_pending_requests(&self) {
        self.io
            .write32(REQ_PWRUP0.int_en(), self.io.read32(REQ_PWRUP0.status()));
        self.io
            .write32(REQ_SWRST.int_en(), self.io.read32(REQ_SWRST.status()));
    }

    pub(crate) fn rmw_field<R: RegisterLongName>(&self, addr: usize, field: FieldValue<u32, R>) {
        self.io.rmw32(addr, field.mask(), field.value);
    }

    pub(crate) fn set_bits(&self, addr: usize, mask: u32) {
        self.io.rmw32(addr, mask, mask);
    }

    pub(crate) fn clear_bits(&self, addr: usize, mask: u32) {
        self.io.rmw32(addr, mask, 0);
    }

    pub(crate) fn is_set(&self, addr: usize, mask: u32) -> bool {
        self.io.read32(addr) & mask == mask
    }

    /// Run one transition of `id`, keeping its tracked state in step.
    ///
    /// The sequencer receives the state at entry and returns the state it
    /// settled in. On failure the tracked state is restored to the entry
    /// value.
    fn track<F>(&self, id: DomainId, op: PowerOp, sequence: F) -> Result<(), ErrorCode>
    where
        F: FnOnce(PowerState) -> Result<PowerState, ErrorCode>,
    {
        let entry = self.registry.state(id);
        self.registry.set_state(
            id,
            match op {
                PowerOp::Up => PowerState::PoweringUp,
                PowerOp::Down => PowerState::PoweringDown,
            },
        );

        match sequence(entry) {
            Ok(settled) => {
                self.registry.set_state(id, settled);
                if CONFIG.trace_power_transitions {
                    debug!("{:?}: {:?} -> {:?}", id, entry, settled);
                }
                Ok(())
            }
            Err(e) => {
                self.registry.set_state(id, entry);
                debug!("{:?}: power {:?} failed: {:?}", id, op, e);
                Err(e)
            }
        }
    }
}

impl Descriptor {
    pub(crate) fn memory(&self) -> Option<&MemBankCtrl> {
        match self {
            Descriptor::Memory(d) => Some(d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::{apu_pwr_cntrl, LOC_AUX_PWR_STATE};
    use crate::test_support::{FakeRegisters, TestConfig};

    #[test]
    fn device_ids_name_cores() {
        assert_eq!(domain_for_device(DEV_ACPU_0_0), Some(DomainId::Acpu0Core0));
        assert_eq!(domain_for_device(DEV_ACPU_1_3), Some(DomainId::Acpu1Core3));
        assert_eq!(domain_for_device(DEV_RPU_B_1), Some(DomainId::RpuB1));
        assert_eq!(domain_for_device(0x1810_C0AE), None);
    }

    #[test]
    fn unknown_device_touches_nothing() {
        let regs = FakeRegisters::psm();
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);

        assert_eq!(psm.direct_power_up(0xDEAD_BEEF), Err(ErrorCode::INVAL));
        assert_eq!(psm.direct_power_down(0), Err(ErrorCode::INVAL));
        assert_eq!(regs.write_count(), 0);
        assert_eq!(
            kernel::errorcode::into_status(psm.direct_power_up(0xDEAD_BEEF)),
            kernel::errorcode::STATUS_INVALID_PARAM
        );
    }

    #[test]
    fn direct_path_is_for_cores_only() {
        let regs = FakeRegisters::psm();
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);

        assert_eq!(
            psm.direct_power_up_domain(DomainId::OcmB0I0),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(
            psm.direct_power_down_domain(DomainId::Fpd),
            Err(ErrorCode::INVAL)
        );
        assert_eq!(regs.write_count(), 0);
    }

    #[test]
    fn init_seeds_tracked_state() {
        let regs = FakeRegisters::psm();
        regs.set(LOC_PWR_STATE0, (1 << 1) | (1 << 21));
        regs.set(LOC_PWR_STATE1, 1 << 1);
        regs.set(LOC_AUX_PWR_STATE, (1 << 9) | (1 << 0));
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);
        psm.init();

        assert_eq!(psm.power_state(DomainId::Acpu0Core1), PowerState::PoweredUp);
        assert_eq!(psm.power_state(DomainId::RpuA1), PowerState::PoweredUp);
        assert_eq!(psm.power_state(DomainId::Gem1), PowerState::PoweredUp);
        assert_eq!(psm.power_state(DomainId::OcmB0I1), PowerState::Retained);
        // Cores never report retention.
        assert_eq!(psm.power_state(DomainId::Acpu0Core0), PowerState::PoweredDown);
        assert_eq!(psm.power_state(DomainId::Fpd), PowerState::PoweredDown);
    }

    #[test]
    fn event_channel_is_shared_record() {
        let regs = FakeRegisters::psm();
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);
        assert_eq!(psm.event_channel_address(), events.address());
        assert_eq!(psm.events().version(), crate::event::EVENT_RECORD_VERSION);
    }

    #[test]
    fn failed_transition_restores_entry_state() {
        let regs = FakeRegisters::psm();
        let events = EventRecord::new();
        let psm = PowerManager::<_, TestConfig>::new(&regs, &events);
        psm.init();

        assert_eq!(psm.direct_power_up(DEV_ACPU_1_2), Ok(()));
        regs.stick(crate::registers::apu_core_pactive(6));
        regs.set(crate::registers::apu_core_pactive(6), 0);

        assert_eq!(
            psm.request_power_down(DomainId::Acpu1Core2),
            Err(ErrorCode::NOACK)
        );
        assert_eq!(psm.power_state(DomainId::Acpu1Core2), PowerState::PoweredUp);
        assert_eq!(regs.get(LOC_PWR_STATE0) & (1 << 6), 1 << 6);
        // The island itself was never gated.
        assert_eq!(regs.get(apu_pwr_cntrl(6)), 0xF);
    }
}
