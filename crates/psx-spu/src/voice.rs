//! Voice control
//!
//! Configures a single playback voice: volume, pitch, sample addresses,
//! envelope, and key-on/key-off. Addresses are byte addresses in sound RAM;
//! the hardware takes them in 8-byte units.
//!
//! # Voice lifecycle
//!
//! ```text
//! Idle --configure--> Armed --key_on--> Sounding --key_off--> Releasing
//!                                          ^                      |
//!                                          +-------key_on---------+
//! ```
//!
//! The hardware does not report these states; [`Spu`] tracks them so the
//! flow can be checked without a console.

use crate::envelope::Envelope;
use crate::error::SpuResult;
use crate::regs::{self, Registers, VoiceReg};
use crate::spu::Spu;
use crate::wait::Wait;

/// Logical state of a voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceState {
    /// Reset, nothing configured
    #[default]
    Idle,
    /// Configured and ready to key on
    Armed,
    /// Keyed on, envelope in attack/decay/sustain
    Sounding,
    /// Keyed off, envelope in release
    Releasing,
}

/// Sample rate word that plays a sample at 44.1 kHz
pub const SAMPLE_RATE_44K: u16 = 0x1000;

/// Sample rate word for 22.05 kHz material
pub const SAMPLE_RATE_22K: u16 = 0x0800;

/// Convert a sound RAM byte address to 8-byte units
#[inline]
pub const fn to_hw_address(address: u32) -> u16 {
    (address >> 3) as u16
}

/// Scale a voice volume by the master volume (16.16 multiply)
#[inline]
pub const fn scale_volume(volume: u32, master_volume: u32) -> u16 {
    ((volume as u64 * master_volume as u64) >> 16) as u16
}

impl<B: Registers, W: Wait> Spu<B, W> {
    /// Tracked state of `voice`
    #[inline]
    pub fn voice_state(&self, voice: u8) -> VoiceState {
        self.states[usize::from(voice)]
    }

    /// Silence a voice and clear its configuration
    ///
    /// Volume, pitch and both addresses go to zero; the envelope is set to
    /// [`Envelope::RESET`].
    pub fn reset_voice(&mut self, voice: u8) {
        debug_assert!(voice < regs::VOICE_COUNT);
        let bus = &mut self.bus;
        bus.write16(VoiceReg::VolumeLeft.at(voice), 0);
        bus.write16(VoiceReg::VolumeRight.at(voice), 0);
        bus.write16(VoiceReg::SampleRate.at(voice), 0);
        bus.write16(VoiceReg::StartAddress.at(voice), 0);
        bus.write16(VoiceReg::Ad.at(voice), Envelope::RESET.ad());
        bus.write16(VoiceReg::CurrentVolume.at(voice), 0);
        bus.write16(VoiceReg::RepeatAddress.at(voice), 0);
        bus.write16(VoiceReg::Sr.at(voice), Envelope::RESET.sr());
        self.states[usize::from(voice)] = VoiceState::Idle;
    }

    /// Set left/right volume, scaled by the master volume
    pub fn set_voice_volume(&mut self, voice: u8, left: u32, right: u32) {
        let master = self.master_volume;
        self.bus
            .write16(VoiceReg::VolumeLeft.at(voice), scale_volume(left, master));
        self.bus
            .write16(VoiceReg::VolumeRight.at(voice), scale_volume(right, master));
    }

    /// Point the voice at a sample in sound RAM
    pub fn set_start_address(&mut self, voice: u8, address: u32) {
        self.bus
            .write16(VoiceReg::StartAddress.at(voice), to_hw_address(address));
    }

    /// Set the loop point used when a sample block ends without its own
    pub fn set_repeat_address(&mut self, voice: u8, address: u32) {
        self.bus
            .write16(VoiceReg::RepeatAddress.at(voice), to_hw_address(address));
    }

    /// Set the raw pitch word (see [`SAMPLE_RATE_44K`])
    pub fn set_sample_rate(&mut self, voice: u8, rate: u16) {
        self.bus.write16(VoiceReg::SampleRate.at(voice), rate);
    }

    /// Overwrite the current envelope level
    pub fn set_current_volume(&mut self, voice: u8, level: u16) {
        self.bus.write16(VoiceReg::CurrentVolume.at(voice), level);
    }

    /// Write both envelope words
    pub fn apply_envelope(&mut self, voice: u8, envelope: Envelope) {
        self.bus.write16(VoiceReg::Ad.at(voice), envelope.ad());
        self.bus.write16(VoiceReg::Sr.at(voice), envelope.sr());
        log::trace!(
            "voice {voice}: AD={:#06X} SR={:#06X}",
            envelope.ad(),
            envelope.sr()
        );
    }

    /// Mark a configured voice as ready to play
    pub fn arm(&mut self, voice: u8) {
        self.states[usize::from(voice)] = VoiceState::Armed;
    }

    /// Start the voice's envelope and playback
    ///
    /// Waits for the SPU to be idle first.
    pub fn key_on(&mut self, voice: u8) -> SpuResult<()> {
        self.wait_idle()?;
        let (reg, mask) = key_mask(voice, regs::KEY_ON_LOW, regs::KEY_ON_HIGH);
        self.bus.write16(reg, mask);
        self.states[usize::from(voice)] = VoiceState::Sounding;
        log::debug!("voice {voice}: key on");
        Ok(())
    }

    /// Move the voice's envelope into release
    ///
    /// Waits for the SPU to be idle first.
    pub fn key_off(&mut self, voice: u8) -> SpuResult<()> {
        self.wait_idle()?;
        let (reg, mask) = key_mask(voice, regs::KEY_OFF_LOW, regs::KEY_OFF_HIGH);
        self.bus.write16(reg, mask);
        self.states[usize::from(voice)] = VoiceState::Releasing;
        log::debug!("voice {voice}: key off");
        Ok(())
    }
}

/// Register and single-bit mask addressing `voice` in a low/high pair
fn key_mask(voice: u8, low: regs::Reg16, high: regs::Reg16) -> (regs::Reg16, u16) {
    debug_assert!(voice < regs::VOICE_COUNT);
    if voice < 16 {
        (low, 1 << voice)
    } else {
        (high, 1 << (voice - 16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Access, SimBus};
    use crate::wait::{Assume, Spin};
    use pretty_assertions::assert_eq;

    fn spu() -> Spu<SimBus, Assume> {
        Spu::new(SimBus::new(), Assume)
    }

    #[test]
    fn test_reset_voice() {
        let mut spu = spu();
        spu.bus_mut().poke16(VoiceReg::VolumeLeft.at(0), 0x1234);
        spu.reset_voice(0);

        let bus = spu.bus();
        assert_eq!(bus.peek16(VoiceReg::VolumeLeft.at(0)), 0);
        assert_eq!(bus.peek16(VoiceReg::SampleRate.at(0)), 0);
        assert_eq!(bus.peek16(VoiceReg::Ad.at(0)), 0x000F);
        assert_eq!(bus.peek16(VoiceReg::Sr.at(0)), 0x0000);
        assert_eq!(bus.writes().len(), 8);
        assert_eq!(spu.voice_state(0), VoiceState::Idle);
    }

    #[test]
    fn test_volume_scaled_by_master() {
        let mut spu = spu().with_master_volume(16384);
        spu.set_voice_volume(0, 0x3F00, 0x3F00);
        assert_eq!(spu.bus().peek16(VoiceReg::VolumeLeft.at(0)), 0x0FC0);
        assert_eq!(spu.bus().peek16(VoiceReg::VolumeRight.at(0)), 0x0FC0);
    }

    #[test]
    fn test_volume_unity_master() {
        let mut spu = spu().with_master_volume(0x1_0000);
        spu.set_voice_volume(2, 0x3FFF, 0x2000);
        assert_eq!(spu.bus().peek16(VoiceReg::VolumeLeft.at(2)), 0x3FFF);
        assert_eq!(spu.bus().peek16(VoiceReg::VolumeRight.at(2)), 0x2000);
    }

    #[test]
    fn test_addresses_in_eight_byte_units() {
        let mut spu = spu();
        spu.set_start_address(0, 0x1010);
        spu.set_repeat_address(0, 0x1020);
        assert_eq!(spu.bus().peek16(VoiceReg::StartAddress.at(0)), 0x0202);
        assert_eq!(spu.bus().peek16(VoiceReg::RepeatAddress.at(0)), 0x0204);
    }

    #[test]
    fn test_apply_envelope_writes_both_words() {
        let mut spu = spu();
        spu.apply_envelope(0, Envelope::from_words(0xFFFF, 0xDFFF));
        assert_eq!(
            spu.bus().writes(),
            &[
                Access::Write16 { addr: 0x1F80_1C08, value: 0xFFFF },
                Access::Write16 { addr: 0x1F80_1C0A, value: 0xDFFF },
            ]
        );
    }

    #[test]
    fn test_key_on_sets_only_voice_bit() {
        let mut spu = spu();
        spu.key_on(0).unwrap();
        assert_eq!(
            spu.bus().writes(),
            &[Access::Write16 { addr: regs::KEY_ON_LOW.addr(), value: 0x0001 }]
        );
        assert_eq!(spu.voice_state(0), VoiceState::Sounding);
    }

    #[test]
    fn test_key_off_sets_only_voice_bit() {
        let mut spu = spu();
        spu.key_on(0).unwrap();
        spu.bus_mut().clear_writes();
        spu.key_off(0).unwrap();
        assert_eq!(
            spu.bus().writes(),
            &[Access::Write16 { addr: regs::KEY_OFF_LOW.addr(), value: 0x0001 }]
        );
        assert_eq!(spu.voice_state(0), VoiceState::Releasing);
    }

    #[test]
    fn test_high_voices_use_high_mask() {
        let mut spu = spu();
        spu.key_on(18).unwrap();
        assert_eq!(spu.bus().writes_to(regs::KEY_ON_HIGH), vec![0x0004]);
        assert!(spu.bus().writes_to(regs::KEY_ON_LOW).is_empty());
    }

    #[test]
    fn test_key_on_waits_for_idle() {
        let mut spu = Spu::new(SimBus::new(), Spin);
        spu.bus_mut().busy_for(4);
        spu.key_on(0).unwrap();
        assert_eq!(spu.bus_mut().read16(regs::STATUS), 0);
        assert_eq!(spu.bus().writes_to(regs::KEY_ON_LOW), vec![0x0001]);
    }
}
