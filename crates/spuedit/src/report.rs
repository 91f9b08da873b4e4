//! Text output: frames, register dumps and the session summary

use std::fmt::Write;

use psx_spu::editor::DisplayRow;
use psx_spu::regs::{self, Reg16, VoiceReg};
use psx_spu::session::Session;
use psx_spu::sim::SimBus;
use psx_spu::wait::Wait;

/// The parameter table as the console would draw it, one row per line
pub fn render_frame(rows: &[DisplayRow]) -> String {
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{row}");
    }
    out
}

/// Global registers shown in dumps
const GLOBALS: [(&str, Reg16); 8] = [
    ("MAIN_VOL_L", regs::MAIN_VOL_LEFT),
    ("MAIN_VOL_R", regs::MAIN_VOL_RIGHT),
    ("KEY_ON_LO", regs::KEY_ON_LOW),
    ("KEY_ON_HI", regs::KEY_ON_HIGH),
    ("KEY_OFF_LO", regs::KEY_OFF_LOW),
    ("KEY_OFF_HI", regs::KEY_OFF_HIGH),
    ("CTRL", regs::CTRL),
    ("STATUS", regs::STATUS),
];

/// Current global and per-voice register contents
pub fn register_dump(bus: &SimBus, voice: u8) -> String {
    let mut out = String::new();
    for (name, reg) in GLOBALS {
        let _ = writeln!(out, "{name:<12} {:#010X} = {:#06X}", reg.addr(), bus.peek16(reg));
    }
    for reg in VoiceReg::ALL {
        let handle = reg.at(voice);
        let name = format!("V{voice}.{reg:?}");
        let _ = writeln!(out, "{name:<18} {:#010X} = {:#06X}", handle.addr(), bus.peek16(handle));
    }
    out
}

/// Bits of the high key register that map to voices 16-23
const HIGH_VOICE_BITS: u16 = 0x00FF;

/// 24-bit voice mask from a low/high register pair
fn key_mask(bus: &SimBus, low: Reg16, high: Reg16) -> u32 {
    (u32::from(bus.peek16(high) & HIGH_VOICE_BITS) << 16) | u32::from(bus.peek16(low))
}

/// Envelope, key masks, voice state and uploads after a run
pub fn summary<W: Wait>(session: &Session<SimBus, W>) -> String {
    let bus = session.spu().bus();
    let envelope = session.editor().envelope();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "envelope: AD={:#06X} SR={:#06X}",
        envelope.ad(),
        envelope.sr()
    );
    let _ = writeln!(
        out,
        "key-on: {:#08X} key-off: {:#08X}",
        key_mask(bus, regs::KEY_ON_LOW, regs::KEY_ON_HIGH),
        key_mask(bus, regs::KEY_OFF_LOW, regs::KEY_OFF_HIGH)
    );
    let _ = writeln!(out, "voice {}: {:?}", session.editor().voice(), session.voice_state());
    for (slot, bank) in session.banks() {
        let _ = writeln!(
            out,
            "waveform {slot}: {} bytes at {:#07X}",
            bank.size, bank.address
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use psx_spu::editor::{Button, Event};
    use psx_spu::session::SessionConfig;
    use psx_spu::wait::Spin;
    use psx_spu::waveform;
    use pretty_assertions::assert_eq;

    fn session() -> Session<SimBus, Spin> {
        Session::boot(SimBus::new(), Spin, SessionConfig::default(), &waveform::BUILTIN).unwrap()
    }

    #[test]
    fn test_render_frame_has_twelve_lines() {
        let session = session();
        let text = render_frame(&session.frame());
        assert_eq!(text.lines().count(), 12);
        assert!(text.starts_with("> Attack Mode"));
    }

    #[test]
    fn test_register_dump_shows_voice_block() {
        let session = session();
        let dump = register_dump(session.spu().bus(), 0);
        assert!(dump.contains("V0.Ad              0x1F801C08 = 0x000F"));
        assert!(dump.contains("CTRL         0x1F801DAA = 0xC000"));
    }

    #[test]
    fn test_key_masks_cover_only_24_voices() {
        let session = session();
        let bus = session.spu().bus();
        // Boot writes 0xFFFF to both key-off halves
        assert_eq!(bus.peek16(regs::KEY_OFF_HIGH), 0xFFFF);
        assert_eq!(key_mask(bus, regs::KEY_OFF_LOW, regs::KEY_OFF_HIGH), 0x00FF_FFFF);
        assert_eq!(key_mask(bus, regs::KEY_ON_LOW, regs::KEY_ON_HIGH), 0);
        assert!(summary(&session).contains("key-on: 0x000000 key-off: 0xFFFFFF\n"));
    }

    #[test]
    fn test_summary_after_play() {
        let mut session = session();
        session.handle(Event::pressed(Button::Primary)).unwrap();
        let text = summary(&session);
        assert_eq!(
            text,
            "envelope: AD=0x000F SR=0x0000\n\
             key-on: 0x000001 key-off: 0xFFFFFF\n\
             voice 0: Sounding\n\
             waveform 0: 16 bytes at 0x01010\n\
             waveform 1: 16 bytes at 0x01020\n"
        );
    }
}
