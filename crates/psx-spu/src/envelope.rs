//! ADSR envelope packing
//!
//! The SPU takes a voice's envelope as two 16-bit words:
//!
//! ```text
//! AD (low half)                        SR (high half)
//! 15     attack mode                   31     sustain mode
//! 14-10  attack shift                  30     sustain direction
//! 9-8    attack step                   29     unused (zero)
//! 7-4    decay shift                   28-24  sustain shift
//! 3-0    sustain level                 23-22  sustain step
//!                                      21     release mode
//!                                      20-16  release shift
//! ```
//!
//! Modes are 0 = linear, 1 = exponential. Shifts run fast (0) to slow.

use bit_field::BitField;

use crate::params::{ParamKind, ParameterSet};

/// Bit position and width of a parameter inside the 32-bit envelope
///
/// Returns `None` for parameters that are not part of the envelope.
pub const fn field(kind: ParamKind) -> Option<(u32, u32)> {
    match kind {
        ParamKind::AttackMode => Some((15, 1)),
        ParamKind::AttackShift => Some((10, 5)),
        ParamKind::AttackStep => Some((8, 2)),
        ParamKind::DecayShift => Some((4, 4)),
        ParamKind::SustainLevel => Some((0, 4)),
        ParamKind::SustainMode => Some((31, 1)),
        ParamKind::SustainDir => Some((30, 1)),
        ParamKind::SustainShift => Some((24, 5)),
        ParamKind::SustainStep => Some((22, 2)),
        ParamKind::ReleaseMode => Some((21, 1)),
        ParamKind::ReleaseShift => Some((16, 5)),
        ParamKind::Waveform => None,
    }
}

/// Packed envelope, AD in the low half and SR in the high half
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Envelope(pub u32);

impl Envelope {
    /// Envelope a voice is reset to: instant attack and decay, full
    /// sustain level, no release shift
    pub const RESET: Envelope = Envelope(0x0000_000F);

    /// Combine the two register halves
    #[inline]
    pub const fn from_words(ad: u16, sr: u16) -> Self {
        Envelope(((sr as u32) << 16) | ad as u32)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Attack/decay word
    #[inline]
    pub const fn ad(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Sustain/release word
    #[inline]
    pub const fn sr(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Unpack the field for `kind`
    pub fn field(self, kind: ParamKind) -> Option<u8> {
        let (shift, width) = field(kind)?;
        Some(self.0.get_bits(shift as usize..(shift + width) as usize) as u8)
    }
}

/// Pack every envelope parameter into its bit position
///
/// Values are shifted and OR-ed without masking; the parameter ranges keep
/// them inside their fields.
pub fn encode(params: &ParameterSet) -> Envelope {
    let raw = params.iter().fold(0u32, |acc, param| match field(param.kind()) {
        Some((shift, _)) => acc | (u32::from(param.value()) << shift),
        None => acc,
    });
    Envelope(raw)
}
