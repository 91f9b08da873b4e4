//! spuedit - run the SPU envelope editor on a simulated bus
//!
//! Scripts stand in for the pad and [`report`] stands in for the screen,
//! so an editing session can be replayed and inspected on a host.

pub mod report;
pub mod script;

pub use script::{parse_source, parse_steps, ScriptError};
