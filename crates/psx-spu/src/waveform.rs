//! Built-in ADPCM waveforms
//!
//! Each waveform is a single 16-byte SPU ADPCM block holding 28 samples:
//!
//! ```text
//! byte 0   shift (bits 0-3) | filter (bits 4-6)
//! byte 1   flags: bit 0 loop end, bit 1 repeat, bit 2 loop start
//! 2..16    28 signed 4-bit samples, low nibble first
//! ```
//!
//! The flags mark the block as both loop start and loop end, so a voice
//! plays it as an endless single-cycle loop.

/// Size of one ADPCM block
pub const ADPCM_BLOCK_SIZE: usize = 16;

/// Samples per ADPCM block
pub const SAMPLES_PER_BLOCK: usize = 28;

/// Loop flags: loop end | repeat | loop start
pub const LOOP_FLAGS: u8 = 0x07;

/// One-cycle sine, amplitude 7 at shift 2
pub static SINE: [u8; ADPCM_BLOCK_SIZE] = [
    0x02, LOOP_FLAGS, 0x20, 0x43, 0x65, 0x77, 0x67, 0x45, 0x23, 0xE0, 0xCD, 0xAB, 0x99, 0xA9,
    0xCB, 0xED,
];

/// One-cycle square, amplitude 6 at shift 2
pub static SQUARE: [u8; ADPCM_BLOCK_SIZE] = [
    0x02, LOOP_FLAGS, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
    0xAA, 0xAA,
];

/// Waveforms selectable through the `Waveform` parameter, by value
pub static BUILTIN: [&[u8]; 2] = [&SINE, &SQUARE];

#[cfg(test)]
mod tests {
    use super::*;

    /// Decode an unfiltered block to 16-bit samples
    fn decode(block: &[u8; ADPCM_BLOCK_SIZE]) -> [i16; SAMPLES_PER_BLOCK] {
        let shift = block[0] & 0x0F;
        let mut out = [0i16; SAMPLES_PER_BLOCK];
        for (i, sample) in out.iter_mut().enumerate() {
            let byte = block[2 + i / 2];
            let nibble = if i % 2 == 0 { byte & 0x0F } else { byte >> 4 };
            let signed = ((nibble << 4) as i8 >> 4) as i16;
            *sample = (signed << 12) >> shift;
        }
        out
    }

    #[test]
    fn test_blocks_loop_on_themselves() {
        for block in [&SINE, &SQUARE] {
            assert_eq!(block[1], LOOP_FLAGS);
            // Filter 0: samples stand alone
            assert_eq!(block[0] >> 4, 0);
        }
    }

    #[test]
    fn test_sine_shape() {
        let samples = decode(&SINE);
        assert_eq!(samples[0], 0);
        assert_eq!(samples[7], 7 << 10);
        assert_eq!(samples[14], 0);
        assert_eq!(samples[21], -7 << 10);
    }

    #[test]
    fn test_square_shape() {
        let samples = decode(&SQUARE);
        assert!(samples[..14].iter().all(|&s| s == 6 << 10));
        assert!(samples[14..].iter().all(|&s| s == -6 << 10));
    }
}
