//! SPU context: bus, wait strategy and global settings
//!
//! [`Spu`] owns everything the driver mutates. Voice control lives in
//! [`voice`](crate::voice) and sample upload in [`dma`](crate::dma); both
//! are `impl` blocks on this type.
//!
//! # Example
//!
//! ```no_run
//! use psx_spu::{regs::Mmio, wait::Spin, Spu};
//!
//! let mut spu = Spu::new(unsafe { Mmio::new() }, Spin);
//! spu.init(0x3800);
//! spu.unmute();
//! ```

use crate::error::SpuResult;
use crate::regs::{self, Registers, SpuControl};
use crate::voice::VoiceState;
use crate::wait::{Wait, IDLE_SETTLE_SPINS};

/// Master volume applied when none is configured (0.25 in 16.16)
pub const DEFAULT_MASTER_VOLUME: u32 = 16384;

/// Main output volume written by [`Spu::init`] when none is configured
pub const DEFAULT_MAIN_VOLUME: u16 = 0x3800;

/// Owned driver state for one sound processor
#[derive(Debug)]
pub struct Spu<B, W> {
    pub(crate) bus: B,
    pub(crate) wait: W,
    pub(crate) master_volume: u32,
    pub(crate) states: [VoiceState; regs::VOICE_COUNT as usize],
}

impl<B: Registers, W: Wait> Spu<B, W> {
    pub fn new(bus: B, wait: W) -> Self {
        Spu {
            bus,
            wait,
            master_volume: DEFAULT_MASTER_VOLUME,
            states: [VoiceState::Idle; regs::VOICE_COUNT as usize],
        }
    }

    /// Replace the master volume (16.16 fixed point, 65536 = unity)
    pub fn with_master_volume(mut self, master_volume: u32) -> Self {
        self.master_volume = master_volume;
        self
    }

    #[inline]
    pub fn master_volume(&self) -> u32 {
        self.master_volume
    }

    #[inline]
    pub fn bus(&self) -> &B {
        &self.bus
    }

    #[inline]
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Bring the SPU to a known state
    ///
    /// Enables the SPU DMA channel, sets the main volume, keys every voice
    /// off, silences the CD and external inputs, clears pitch modulation,
    /// noise and reverb, and finally enables the SPU (still muted).
    pub fn init(&mut self, main_volume: u16) {
        let bus = &mut self.bus;

        bus.modify32(regs::DMA_DPCR, |dpcr| dpcr | regs::DPCR_SPU_ENABLE);
        bus.write16(regs::MAIN_VOL_LEFT, main_volume);
        bus.write16(regs::MAIN_VOL_RIGHT, main_volume);
        bus.write16(regs::CTRL, 0);
        bus.write16(regs::KEY_ON_LOW, 0);
        bus.write16(regs::KEY_ON_HIGH, 0);
        bus.write16(regs::KEY_OFF_LOW, 0xFFFF);
        bus.write16(regs::KEY_OFF_HIGH, 0xFFFF);
        bus.write16(regs::RAM_TRANSFER_CTRL, 4);
        bus.write16(regs::CD_VOL_LEFT, 0);
        bus.write16(regs::CD_VOL_RIGHT, 0);
        bus.write16(regs::PITCH_MOD_LOW, 0);
        bus.write16(regs::PITCH_MOD_HIGH, 0);
        bus.write16(regs::NOISE_EN_LOW, 0);
        bus.write16(regs::NOISE_EN_HIGH, 0);
        bus.write16(regs::REVERB_EN_LOW, 0);
        bus.write16(regs::REVERB_EN_HIGH, 0);
        bus.write16(regs::EXT_VOL_LEFT, 0);
        bus.write16(regs::EXT_VOL_RIGHT, 0);
        bus.write16(regs::CTRL, SpuControl::ENABLE.bits());

        self.states = [VoiceState::Idle; regs::VOICE_COUNT as usize];
        log::debug!("SPU initialized, main volume {main_volume:#06X}");
    }

    /// Enable output
    pub fn unmute(&mut self) {
        self.bus
            .write16(regs::CTRL, (SpuControl::ENABLE | SpuControl::UNMUTE).bits());
    }

    /// Block until no voice is transitioning
    ///
    /// Spins a fixed delay before each status poll.
    pub fn wait_idle(&mut self) -> SpuResult<()> {
        let bus = &mut self.bus;
        self.wait.wait_until("SPU idle", IDLE_SETTLE_SPINS, || {
            bus.read16(regs::STATUS) & regs::STATUS_BUSY_MASK == 0
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpuError;
    use crate::sim::SimBus;
    use crate::wait::{Assume, Bounded, Spin};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_init_sequence() {
        let mut spu = Spu::new(SimBus::new(), Assume);
        spu.bus_mut().poke32(regs::DMA_DPCR, 0x0000_0800);
        spu.init(0x3800);

        let bus = spu.bus();
        assert_eq!(bus.peek32(regs::DMA_DPCR), 0x000B_0800);
        assert_eq!(bus.peek16(regs::MAIN_VOL_LEFT), 0x3800);
        assert_eq!(bus.peek16(regs::MAIN_VOL_RIGHT), 0x3800);
        assert_eq!(bus.peek16(regs::KEY_OFF_LOW), 0xFFFF);
        assert_eq!(bus.peek16(regs::KEY_OFF_HIGH), 0xFFFF);
        assert_eq!(bus.peek16(regs::RAM_TRANSFER_CTRL), 4);
        // Disabled first, enabled last
        assert_eq!(bus.writes_to(regs::CTRL), vec![0x0000, 0x8000]);
    }

    #[test]
    fn test_unmute() {
        let mut spu = Spu::new(SimBus::new(), Assume);
        spu.unmute();
        assert_eq!(spu.bus().peek16(regs::CTRL), 0xC000);
    }

    #[test]
    fn test_wait_idle_polls_status() {
        let mut spu = Spu::new(SimBus::new(), Spin);
        spu.bus_mut().busy_for(3);
        spu.wait_idle().unwrap();
        // Busy reads were all consumed
        assert_eq!(spu.bus_mut().read16(regs::STATUS), 0);
    }

    #[test]
    fn test_wait_idle_bounded_timeout() {
        let mut spu = Spu::new(SimBus::new(), Bounded::new(2));
        spu.bus_mut().busy_for(5);
        assert_eq!(spu.wait_idle(), Err(SpuError::timeout("SPU idle", 2)));
    }
}
