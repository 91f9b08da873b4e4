//! # PSX-SPU - PlayStation sound processor driver
//!
//! Drives the PlayStation SPU from Rust: uploads ADPCM samples to sound RAM,
//! packs ADSR envelopes into the voice registers, and runs a small
//! pad-driven editor for tweaking one voice's envelope live.
//!
//! ## Features
//!
//! - **Registers**: Typed handles for the SPU, DMA and bus control registers
//! - **Upload**: DMA transfers into sound RAM
//! - **Envelopes**: ADSR parameter packing and unpacking
//! - **Voices**: Volume, pitch, addresses, key-on/key-off
//! - **Editor**: Twelve bounded parameters, a wrapping cursor, pad handling
//! - **Simulation**: An in-memory bus for running everything on a host
//!
//! ## Quick Start
//!
//! ```no_run
//! use psx_spu::prelude::*;
//!
//! let bus = unsafe { Mmio::new() };
//! let mut session = Session::boot(bus, Spin, SessionConfig::default(), &waveform::BUILTIN)
//!     .expect("SPU bring-up");
//!
//! // From the pad callback
//! session.handle(Event::pressed(Button::Right)).expect("edit");
//!
//! // Every frame
//! for row in session.frame() {
//!     let (x, y) = row.position();
//!     // draw `row` at (x, y)
//! }
//! ```
//!
//! ## Modules
//!
//! - [`regs`] - Register map and access backends
//! - [`wait`] - Polling strategies
//! - [`dma`] - Sample upload
//! - [`envelope`] - ADSR packing
//! - [`voice`] - Voice control
//! - [`params`] - Editable parameters
//! - [`editor`] - Event handling and display rows
//! - [`session`] - Startup sequence
//! - [`sim`] - Simulated bus
//! - [`waveform`] - Built-in samples

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod dma;
pub mod editor;
pub mod envelope;
pub mod error;
pub mod params;
pub mod regs;
pub mod session;
pub mod sim;
pub mod spu;
pub mod voice;
pub mod wait;
pub mod waveform;

pub use error::{SpuError, SpuResult};
pub use spu::Spu;

/// Convenient re-exports for common usage
///
/// Import everything you need with:
/// ```
/// use psx_spu::prelude::*;
/// ```
pub mod prelude {
    pub use crate::dma::SampleBank;
    pub use crate::editor::{Action, Button, DisplayRow, Editor, Event, EventKind};
    pub use crate::envelope::Envelope;
    pub use crate::error::{SpuError, SpuResult};
    pub use crate::params::{ParamKind, ParameterSet};
    pub use crate::regs::{Mmio, Registers};
    pub use crate::session::{Session, SessionConfig};
    pub use crate::sim::SimBus;
    pub use crate::spu::Spu;
    pub use crate::voice::VoiceState;
    pub use crate::wait::{Assume, Bounded, Spin, Wait};
    pub use crate::waveform;
}

/// Library version information
pub mod version {
    /// Major version number
    pub const MAJOR: u8 = 0;
    /// Minor version number
    pub const MINOR: u8 = 1;
    /// Patch version number
    pub const PATCH: u8 = 0;
    /// Version as string
    pub const STRING: &str = "0.1.0";
}
