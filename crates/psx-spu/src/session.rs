//! Startup sequence and per-frame facade
//!
//! [`Session::boot`] runs the whole bring-up once:
//!
//! 1. Initialize the SPU (muted).
//! 2. Upload each waveform, the first at [`SessionConfig::sample_address`]
//!    and the rest packed after it on ADPCM block boundaries.
//! 3. Unmute.
//! 4. Reset the voice, set its volume, point it at the first waveform,
//!    apply the default envelope, set pitch, clear its level and set the
//!    loop address.
//!
//! After that the host forwards pad events to [`Session::handle`] and
//! draws [`Session::frame`] every frame.

use crate::dma::SampleBank;
use crate::editor::{Action, DisplayRow, Editor, Event, WAVEFORM_SLOTS};
use crate::error::{SpuError, SpuResult};
use crate::params::PARAM_COUNT;
use crate::regs::Registers;
use crate::spu::{Spu, DEFAULT_MAIN_VOLUME, DEFAULT_MASTER_VOLUME};
use crate::voice::{VoiceState, SAMPLE_RATE_22K};
use crate::wait::Wait;

/// Startup settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Master volume, 16.16 fixed point
    pub master_volume: u32,
    /// Main output volume, both sides
    pub main_volume: u16,
    /// Voice being edited
    pub voice: u8,
    /// Voice volume before master scaling, both sides
    pub voice_volume: u32,
    /// Pitch word for the voice
    pub sample_rate: u16,
    /// Sound RAM address of the first waveform
    pub sample_address: u32,
    /// Loop address; `None` loops back to the first waveform
    pub repeat_address: Option<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            master_volume: DEFAULT_MASTER_VOLUME,
            main_volume: DEFAULT_MAIN_VOLUME,
            voice: 0,
            voice_volume: 63 << 8,
            sample_rate: SAMPLE_RATE_22K,
            // The first 4 KiB of sound RAM hold the capture buffers
            sample_address: 0x1010,
            repeat_address: None,
        }
    }
}

/// A booted SPU plus the editor that drives it
#[derive(Debug)]
pub struct Session<B, W> {
    spu: Spu<B, W>,
    editor: Editor,
    banks: [Option<SampleBank>; WAVEFORM_SLOTS],
}

impl<B: Registers, W: Wait> Session<B, W> {
    /// Bring up the SPU, upload `waveforms` and arm the voice
    pub fn boot(bus: B, wait: W, config: SessionConfig, waveforms: &[&[u8]]) -> SpuResult<Self> {
        if waveforms.len() > WAVEFORM_SLOTS {
            return Err(SpuError::TooManyWaveforms {
                count: waveforms.len(),
                max: WAVEFORM_SLOTS,
            });
        }

        let mut spu = Spu::new(bus, wait).with_master_volume(config.master_volume);
        let mut editor = Editor::new(config.voice);
        let mut banks = [None; WAVEFORM_SLOTS];

        spu.init(config.main_volume);

        let mut address = config.sample_address;
        for (slot, data) in waveforms.iter().enumerate() {
            let bank = spu.upload(address, data)?;
            editor.set_waveform(slot, bank);
            banks[slot] = Some(bank);
            address = bank.next_free();
        }

        spu.unmute();

        let voice = config.voice;
        spu.reset_voice(voice);
        spu.set_voice_volume(voice, config.voice_volume, config.voice_volume);
        if let Some(bank) = editor.current_waveform() {
            spu.set_start_address(voice, bank.address);
        }
        editor.apply(&mut spu);
        spu.set_sample_rate(voice, config.sample_rate);
        spu.set_current_volume(voice, 0);
        spu.set_repeat_address(voice, config.repeat_address.unwrap_or(config.sample_address));
        spu.arm(voice);

        log::info!(
            "session ready: voice {voice}, {} waveform(s), master volume {}",
            waveforms.len(),
            config.master_volume
        );

        Ok(Session { spu, editor, banks })
    }

    /// Forward one pad event to the editor
    pub fn handle(&mut self, event: Event) -> SpuResult<Action> {
        self.editor.handle(&mut self.spu, event)
    }

    /// Parameter table for this frame
    pub fn frame(&self) -> [DisplayRow; PARAM_COUNT] {
        self.editor.rows()
    }

    #[inline]
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    #[inline]
    pub fn spu(&self) -> &Spu<B, W> {
        &self.spu
    }

    #[inline]
    pub fn spu_mut(&mut self) -> &mut Spu<B, W> {
        &mut self.spu
    }

    /// Uploaded waveforms by slot
    pub fn banks(&self) -> impl Iterator<Item = (usize, SampleBank)> + '_ {
        self.banks
            .iter()
            .enumerate()
            .filter_map(|(slot, bank)| bank.map(|bank| (slot, bank)))
    }

    /// Tracked state of the edited voice
    pub fn voice_state(&self) -> VoiceState {
        self.spu.voice_state(self.editor.voice())
    }
}
