//! Live envelope editor driven by pad events
//!
//! | Button    | Effect                                             |
//! |-----------|----------------------------------------------------|
//! | Up        | Select previous parameter (wraps)                  |
//! | Down      | Select next parameter (wraps)                      |
//! | Left      | Decrement selected value, clamped at its minimum   |
//! | Right     | Increment selected value, clamped at its maximum   |
//! | Primary   | Key on the edited voice                            |
//! | Secondary | Key off the edited voice                           |
//!
//! Only press events act. Every value change re-encodes the envelope and
//! writes it to the voice immediately.

use core::fmt;

use crate::dma::SampleBank;
use crate::envelope::{self, Envelope};
use crate::error::SpuResult;
use crate::params::{ParamKind, ParameterSet, PARAM_COUNT};
use crate::regs::Registers;
use crate::spu::Spu;
use crate::wait::Wait;

/// Maximum number of selectable waveforms
pub const WAVEFORM_SLOTS: usize = 2;

/// Horizontal offset of the parameter table
pub const INDENTATION: u16 = 16;

/// Vertical distance between table rows
pub const LINE_SPACING: u16 = 16;

/// Pad button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// Cross on a standard pad
    Primary,
    /// Circle on a standard pad
    Secondary,
}

/// What happened to the button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Pressed,
    Released,
}

/// One input event from the pad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub button: Button,
}

impl Event {
    pub const fn pressed(button: Button) -> Self {
        Event {
            kind: EventKind::Pressed,
            button,
        }
    }

    pub const fn released(button: Button) -> Self {
        Event {
            kind: EventKind::Released,
            button,
        }
    }
}

/// Outcome of handling an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Cursor moved to this parameter
    Selected(ParamKind),
    /// Value changed and the envelope was rewritten
    Changed { kind: ParamKind, value: u8 },
    /// Edit hit a range boundary; nothing written
    Clamped(ParamKind),
    KeyOn,
    KeyOff,
    /// Event was not a press
    Ignored,
}

/// One line of the parameter table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayRow {
    pub index: usize,
    pub selected: bool,
    pub name: &'static str,
    pub value: u8,
}

impl DisplayRow {
    /// Top-left text position in screen pixels
    pub const fn position(&self) -> (u16, u16) {
        (INDENTATION, LINE_SPACING * (self.index as u16 + 1))
    }
}

impl fmt::Display for DisplayRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.selected { '>' } else { ' ' };
        write!(f, "{marker} {:<25} 0x{:02X}", self.name, self.value)
    }
}

/// Parameter table, cursor and the voice being edited
#[derive(Debug, Clone)]
pub struct Editor {
    params: ParameterSet,
    voice: u8,
    waveforms: [Option<SampleBank>; WAVEFORM_SLOTS],
}

impl Editor {
    /// Editor with default parameters for `voice`
    pub fn new(voice: u8) -> Self {
        Editor {
            params: ParameterSet::new(),
            voice,
            waveforms: [None; WAVEFORM_SLOTS],
        }
    }

    /// Register the uploaded sample selected by Waveform value `slot`
    ///
    /// # Panics
    /// If `slot >= WAVEFORM_SLOTS`.
    pub fn set_waveform(&mut self, slot: usize, bank: SampleBank) {
        self.waveforms[slot] = Some(bank);
    }

    /// Sample for the current Waveform value, if one was uploaded
    pub fn current_waveform(&self) -> Option<SampleBank> {
        let slot = usize::from(self.params.value(ParamKind::Waveform));
        self.waveforms.get(slot).copied().flatten()
    }

    #[inline]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    #[inline]
    pub fn voice(&self) -> u8 {
        self.voice
    }

    /// Envelope for the current parameter values
    #[inline]
    pub fn envelope(&self) -> Envelope {
        envelope::encode(&self.params)
    }

    /// Write the current envelope to the edited voice
    pub fn apply<B: Registers, W: Wait>(&self, spu: &mut Spu<B, W>) {
        spu.apply_envelope(self.voice, self.envelope());
    }

    /// React to one input event
    pub fn handle<B: Registers, W: Wait>(
        &mut self,
        spu: &mut Spu<B, W>,
        event: Event,
    ) -> SpuResult<Action> {
        if event.kind != EventKind::Pressed {
            return Ok(Action::Ignored);
        }

        let action = match event.button {
            Button::Up => Action::Selected(self.params.select_prev()),
            Button::Down => Action::Selected(self.params.select_next()),
            Button::Left => {
                let changed = self.params.decrement_selected();
                self.after_edit(spu, changed)
            }
            Button::Right => {
                let changed = self.params.increment_selected();
                self.after_edit(spu, changed)
            }
            Button::Primary => {
                spu.key_on(self.voice)?;
                Action::KeyOn
            }
            Button::Secondary => {
                spu.key_off(self.voice)?;
                Action::KeyOff
            }
        };
        log::trace!("{event:?} -> {action:?}");
        Ok(action)
    }

    fn after_edit<B: Registers, W: Wait>(&mut self, spu: &mut Spu<B, W>, changed: bool) -> Action {
        let kind = self.params.selected();
        if !changed {
            return Action::Clamped(kind);
        }

        self.apply(spu);
        if kind == ParamKind::Waveform {
            if let Some(bank) = self.current_waveform() {
                spu.set_start_address(self.voice, bank.address);
            }
        }

        Action::Changed {
            kind,
            value: self.params.value(kind),
        }
    }

    /// Table rows for the current frame
    pub fn rows(&self) -> [DisplayRow; PARAM_COUNT] {
        let selected = self.params.selected();
        ParamKind::ALL.map(|kind| DisplayRow {
            index: kind.index(),
            selected: kind == selected,
            name: kind.name(),
            value: self.params.value(kind),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{self, VoiceReg};
    use crate::sim::SimBus;
    use crate::wait::Assume;
    use pretty_assertions::assert_eq;

    fn setup() -> (Editor, Spu<SimBus, Assume>) {
        (Editor::new(0), Spu::new(SimBus::new(), Assume))
    }

    fn press(editor: &mut Editor, spu: &mut Spu<SimBus, Assume>, button: Button) -> Action {
        editor.handle(spu, Event::pressed(button)).unwrap()
    }

    #[test]
    fn test_up_wraps_to_last() {
        let (mut editor, mut spu) = setup();
        assert_eq!(
            press(&mut editor, &mut spu, Button::Up),
            Action::Selected(ParamKind::Waveform)
        );
        assert_eq!(
            press(&mut editor, &mut spu, Button::Down),
            Action::Selected(ParamKind::AttackMode)
        );
    }

    #[test]
    fn test_twelve_downs_return_to_start() {
        let (mut editor, mut spu) = setup();
        press(&mut editor, &mut spu, Button::Down);
        let start = editor.params().selected();
        for _ in 0..PARAM_COUNT {
            press(&mut editor, &mut spu, Button::Down);
        }
        assert_eq!(editor.params().selected(), start);
        assert!(spu.bus().writes().is_empty());
    }

    #[test]
    fn test_right_rewrites_envelope() {
        let (mut editor, mut spu) = setup();
        // AttackShift
        press(&mut editor, &mut spu, Button::Down);
        assert_eq!(
            press(&mut editor, &mut spu, Button::Right),
            Action::Changed { kind: ParamKind::AttackShift, value: 1 }
        );
        assert_eq!(spu.bus().peek16(VoiceReg::Ad.at(0)), (1 << 10) | 0x000F);
        assert_eq!(spu.bus().peek16(VoiceReg::Sr.at(0)), 0);
    }

    #[test]
    fn test_increment_at_max_writes_nothing() {
        let (mut editor, mut spu) = setup();
        // AttackStep, range 0..=3
        press(&mut editor, &mut spu, Button::Down);
        press(&mut editor, &mut spu, Button::Down);
        for _ in 0..3 {
            press(&mut editor, &mut spu, Button::Right);
        }
        spu.bus_mut().clear_writes();

        assert_eq!(
            press(&mut editor, &mut spu, Button::Right),
            Action::Clamped(ParamKind::AttackStep)
        );
        assert_eq!(editor.params().value(ParamKind::AttackStep), 3);
        assert!(spu.bus().writes().is_empty());
    }

    #[test]
    fn test_decrement_at_min_is_silent() {
        let (mut editor, mut spu) = setup();
        assert_eq!(
            press(&mut editor, &mut spu, Button::Left),
            Action::Clamped(ParamKind::AttackMode)
        );
        assert_eq!(editor.params().value(ParamKind::AttackMode), 0);
    }

    #[test]
    fn test_triggers_key_voice_zero() {
        let (mut editor, mut spu) = setup();
        assert_eq!(press(&mut editor, &mut spu, Button::Primary), Action::KeyOn);
        assert_eq!(press(&mut editor, &mut spu, Button::Secondary), Action::KeyOff);
        assert_eq!(spu.bus().writes_to(regs::KEY_ON_LOW), vec![0x0001]);
        assert_eq!(spu.bus().writes_to(regs::KEY_OFF_LOW), vec![0x0001]);
    }

    #[test]
    fn test_release_events_ignored() {
        let (mut editor, mut spu) = setup();
        let action = editor
            .handle(&mut spu, Event::released(Button::Down))
            .unwrap();
        assert_eq!(action, Action::Ignored);
        assert_eq!(editor.params().selected(), ParamKind::AttackMode);
    }

    #[test]
    fn test_waveform_change_repoints_voice() {
        let (mut editor, mut spu) = setup();
        editor.set_waveform(0, SampleBank { address: 0x1010, size: 16 });
        editor.set_waveform(1, SampleBank { address: 0x1020, size: 16 });

        press(&mut editor, &mut spu, Button::Up);
        press(&mut editor, &mut spu, Button::Right);
        assert_eq!(spu.bus().peek16(VoiceReg::StartAddress.at(0)), 0x1020 >> 3);

        press(&mut editor, &mut spu, Button::Left);
        assert_eq!(spu.bus().peek16(VoiceReg::StartAddress.at(0)), 0x1010 >> 3);
    }

    #[test]
    fn test_rows_render() {
        let (mut editor, mut spu) = setup();
        press(&mut editor, &mut spu, Button::Down);
        press(&mut editor, &mut spu, Button::Down);
        press(&mut editor, &mut spu, Button::Down);
        press(&mut editor, &mut spu, Button::Down);

        let rows = editor.rows();
        assert_eq!(
            rows[0].to_string(),
            "  Attack Mode               0x00"
        );
        assert_eq!(
            rows[4].to_string(),
            "> Sustain Level             0x0F"
        );
        assert_eq!(rows[4].position(), (16, 80));
        assert_eq!(rows.iter().filter(|row| row.selected).count(), 1);
    }
}
