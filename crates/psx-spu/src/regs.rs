//! SPU, DMA and bus register map
//!
//! Typed handles for every hardware location the driver touches, plus the
//! [`Registers`] trait that performs the actual accesses.
//!
//! # Memory Map
//!
//! | Range                     | Contents                              |
//! |---------------------------|---------------------------------------|
//! | `0x1F801014`              | Bus device 4 (SPU) delay/size control |
//! | `0x1F8010C0-0x1F8010CB`   | DMA channel 4 (SPU)                   |
//! | `0x1F8010F0`              | DMA primary control (DPCR)            |
//! | `0x1F801C00-0x1F801D7F`   | 24 voice blocks, 16 bytes each        |
//! | `0x1F801D80-0x1F801DBF`   | Global SPU control registers          |
//!
//! No validation happens at this layer: writing reserved bits or
//! addressing a voice above 23 is undefined on hardware.
//!
//! # Example
//!
//! ```no_run
//! use psx_spu::regs::{self, Mmio, Registers, VoiceReg};
//!
//! let mut bus = unsafe { Mmio::new() };
//! bus.write16(regs::MAIN_VOL_LEFT, 0x3800);
//! bus.write16(VoiceReg::SampleRate.at(0), 0x1000);
//! ```

// ============================================================================
// Register Handles
// ============================================================================

/// 16-bit register at an absolute address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Reg16(pub u32);

/// 32-bit register at an absolute address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Reg32(pub u32);

impl Reg16 {
    /// Absolute address
    #[inline]
    pub const fn addr(self) -> u32 {
        self.0
    }
}

impl Reg32 {
    /// Absolute address
    #[inline]
    pub const fn addr(self) -> u32 {
        self.0
    }
}

// ============================================================================
// Global SPU Registers
// ============================================================================

/// Base of the SPU register window
pub const SPU_BASE: u32 = 0x1F80_1C00;

/// Number of hardware voices
pub const VOICE_COUNT: u8 = 24;

/// Size of one voice register block in bytes
pub const VOICE_STRIDE: u32 = 0x10;

/// Main volume, left
pub const MAIN_VOL_LEFT: Reg16 = Reg16(0x1F80_1D80);
/// Main volume, right
pub const MAIN_VOL_RIGHT: Reg16 = Reg16(0x1F80_1D82);
/// Key-on mask, voices 0-15
pub const KEY_ON_LOW: Reg16 = Reg16(0x1F80_1D88);
/// Key-on mask, voices 16-23
pub const KEY_ON_HIGH: Reg16 = Reg16(0x1F80_1D8A);
/// Key-off mask, voices 0-15
pub const KEY_OFF_LOW: Reg16 = Reg16(0x1F80_1D8C);
/// Key-off mask, voices 16-23
pub const KEY_OFF_HIGH: Reg16 = Reg16(0x1F80_1D8E);
/// Pitch modulation enable, voices 1-15
pub const PITCH_MOD_LOW: Reg16 = Reg16(0x1F80_1D90);
/// Pitch modulation enable, voices 16-23
pub const PITCH_MOD_HIGH: Reg16 = Reg16(0x1F80_1D92);
/// Noise mode enable, voices 0-15
pub const NOISE_EN_LOW: Reg16 = Reg16(0x1F80_1D94);
/// Noise mode enable, voices 16-23
pub const NOISE_EN_HIGH: Reg16 = Reg16(0x1F80_1D96);
/// Reverb enable, voices 0-15
pub const REVERB_EN_LOW: Reg16 = Reg16(0x1F80_1D98);
/// Reverb enable, voices 16-23
pub const REVERB_EN_HIGH: Reg16 = Reg16(0x1F80_1D9A);
/// Sound RAM transfer address, in 8-byte units
pub const RAM_TRANSFER_ADDR: Reg16 = Reg16(0x1F80_1DA6);
/// SPU control (SPUCNT)
pub const CTRL: Reg16 = Reg16(0x1F80_1DAA);
/// Sound RAM transfer control
pub const RAM_TRANSFER_CTRL: Reg16 = Reg16(0x1F80_1DAC);
/// SPU status (SPUSTAT)
pub const STATUS: Reg16 = Reg16(0x1F80_1DAE);
/// CD audio input volume, left
pub const CD_VOL_LEFT: Reg16 = Reg16(0x1F80_1DB0);
/// CD audio input volume, right
pub const CD_VOL_RIGHT: Reg16 = Reg16(0x1F80_1DB2);
/// External audio input volume, left
pub const EXT_VOL_LEFT: Reg16 = Reg16(0x1F80_1DB4);
/// External audio input volume, right
pub const EXT_VOL_RIGHT: Reg16 = Reg16(0x1F80_1DB6);

/// Status bits that stay set while any voice is still transitioning
pub const STATUS_BUSY_MASK: u16 = 0x07FF;

/// Sound RAM size in bytes (512 KiB)
pub const SOUND_RAM_SIZE: u32 = 0x8_0000;

// ============================================================================
// DMA and Bus Registers
// ============================================================================

/// DMA channel number wired to the SPU
pub const DMA_SPU_CHANNEL: u32 = 4;

/// DMA channel 4 base address
const DMA_SPU_BASE: u32 = 0x1F80_1080 + DMA_SPU_CHANNEL * 0x10;

/// DMA channel 4 source address (MADR)
pub const DMA_SPU_MADR: Reg32 = Reg32(DMA_SPU_BASE);
/// DMA channel 4 block size / block count (BCR)
pub const DMA_SPU_BCR: Reg32 = Reg32(DMA_SPU_BASE + 0x4);
/// DMA channel 4 channel control (CHCR)
pub const DMA_SPU_CHCR: Reg32 = Reg32(DMA_SPU_BASE + 0x8);
/// DMA primary control register (DPCR)
pub const DMA_DPCR: Reg32 = Reg32(0x1F80_10F0);
/// Bus device 4 (SPU) delay/size control
pub const SBUS_DEV4_CTRL: Reg32 = Reg32(0x1F80_1014);

/// DPCR bits enabling channel 4 at priority 3
pub const DPCR_SPU_ENABLE: u32 = 0x000B_0000;

/// Bus device 4 bits that must be clear before an SPU transfer
pub const SBUS_DEV4_CLEAR_MASK: u32 = 0x0F00_0000;

// ============================================================================
// Voice Registers
// ============================================================================

/// Per-voice register, addressed relative to the voice block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum VoiceReg {
    VolumeLeft = 0x0,
    VolumeRight = 0x2,
    /// Pitch; 0x1000 plays at 44.1 kHz
    SampleRate = 0x4,
    /// Start address in 8-byte units
    StartAddress = 0x6,
    /// Envelope low half (attack, decay, sustain level)
    Ad = 0x8,
    /// Envelope high half (sustain, release)
    Sr = 0xA,
    /// Current envelope level
    CurrentVolume = 0xC,
    /// Loop address in 8-byte units
    RepeatAddress = 0xE,
}

impl VoiceReg {
    /// Every voice register in block order
    pub const ALL: [VoiceReg; 8] = [
        VoiceReg::VolumeLeft,
        VoiceReg::VolumeRight,
        VoiceReg::SampleRate,
        VoiceReg::StartAddress,
        VoiceReg::Ad,
        VoiceReg::Sr,
        VoiceReg::CurrentVolume,
        VoiceReg::RepeatAddress,
    ];

    /// Register handle for `voice`
    #[inline]
    pub const fn at(self, voice: u8) -> Reg16 {
        Reg16(SPU_BASE + voice as u32 * VOICE_STRIDE + self as u32)
    }
}

// ============================================================================
// Flag Registers
// ============================================================================

bitflags::bitflags! {
    /// SPU control register (`SPUCNT`) bits used by the driver.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpuControl: u16 {
        /// SPU enable
        const ENABLE          = 0x8000;
        /// Clear to mute, set to unmute (does not affect CD audio)
        const UNMUTE          = 0x4000;
        /// Sound RAM transfer mode field, bits 4-5
        const TRANSFER_MODE   = 0x0030;
        /// Transfer mode 2: DMA write
        const DMA_WRITE       = 0x0020;
    }

    /// DMA channel control register (`CHCR`) bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChannelControl: u32 {
        /// Direction: main RAM to device
        const FROM_RAM        = 0x0000_0001;
        /// Sync mode 1: transfer in blocks on device request
        const SYNC_BLOCKS     = 0x0000_0200;
        /// Start / busy
        const START_BUSY      = 0x0100_0000;
    }
}

impl ChannelControl {
    /// Command word for a RAM-to-SPU block transfer
    pub const SPU_WRITE: ChannelControl = ChannelControl::START_BUSY
        .union(ChannelControl::SYNC_BLOCKS)
        .union(ChannelControl::FROM_RAM);
}

// ============================================================================
// Register Access
// ============================================================================

/// Read/write access to hardware registers
///
/// Reads take `&mut self` so simulated backends can model side effects of
/// polling.
pub trait Registers {
    fn read16(&mut self, reg: Reg16) -> u16;
    fn write16(&mut self, reg: Reg16, value: u16);
    fn read32(&mut self, reg: Reg32) -> u32;
    fn write32(&mut self, reg: Reg32, value: u32);

    /// Read-modify-write a 16-bit register
    #[inline]
    fn modify16<F: FnOnce(u16) -> u16>(&mut self, reg: Reg16, f: F)
    where
        Self: Sized,
    {
        let value = self.read16(reg);
        self.write16(reg, f(value));
    }

    /// Read-modify-write a 32-bit register
    #[inline]
    fn modify32<F: FnOnce(u32) -> u32>(&mut self, reg: Reg32, f: F)
    where
        Self: Sized,
    {
        let value = self.read32(reg);
        self.write32(reg, f(value));
    }
}

/// Memory-mapped hardware registers
///
/// Only meaningful when running on the console itself.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Create the hardware backend
    ///
    /// # Safety
    /// The SPU, DMA and bus control registers must be mapped at their
    /// physical addresses, and no other `Mmio` may be used concurrently.
    pub unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl Registers for Mmio {
    #[inline]
    fn read16(&mut self, reg: Reg16) -> u16 {
        unsafe { (reg.addr() as usize as *const u16).read_volatile() }
    }

    #[inline]
    fn write16(&mut self, reg: Reg16, value: u16) {
        unsafe { (reg.addr() as usize as *mut u16).write_volatile(value) }
    }

    #[inline]
    fn read32(&mut self, reg: Reg32) -> u32 {
        unsafe { (reg.addr() as usize as *const u32).read_volatile() }
    }

    #[inline]
    fn write32(&mut self, reg: Reg32, value: u32) {
        unsafe { (reg.addr() as usize as *mut u32).write_volatile(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_block_addresses() {
        assert_eq!(VoiceReg::VolumeLeft.at(0), Reg16(0x1F80_1C00));
        assert_eq!(VoiceReg::Ad.at(0), Reg16(0x1F80_1C08));
        assert_eq!(VoiceReg::Sr.at(1), Reg16(0x1F80_1C1A));
        assert_eq!(VoiceReg::RepeatAddress.at(23), Reg16(0x1F80_1D7E));
    }

    #[test]
    fn test_dma_channel_addresses() {
        assert_eq!(DMA_SPU_MADR, Reg32(0x1F80_10C0));
        assert_eq!(DMA_SPU_BCR, Reg32(0x1F80_10C4));
        assert_eq!(DMA_SPU_CHCR, Reg32(0x1F80_10C8));
    }

    #[test]
    fn test_spu_write_command_word() {
        assert_eq!(ChannelControl::SPU_WRITE.bits(), 0x0100_0201);
    }
}
