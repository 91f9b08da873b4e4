//! Polling strategies for hardware handshakes
//!
//! Every handshake in the driver is "poll a status flag until it reads the
//! expected value". The strategy decides how long to keep polling:
//!
//! - [`Spin`] polls forever, which is what the hardware protocol expects.
//! - [`Bounded`] gives up after a fixed number of polls.
//! - [`Assume`] never polls and reports the condition as met.

use crate::error::{SpuError, SpuResult};

/// Spin iterations between status polls while waiting for the SPU to go idle
pub const IDLE_SETTLE_SPINS: u32 = 2045;

/// Strategy for waiting on a hardware condition
pub trait Wait {
    /// Block until `ready` returns true
    ///
    /// `settle` spin iterations run before every poll, so a non-zero value
    /// gives do-while semantics with a fixed delay between polls.
    fn wait_until<F>(&mut self, what: &'static str, settle: u32, ready: F) -> SpuResult<()>
    where
        F: FnMut() -> bool;
}

/// Burn `count` iterations without being optimized away
#[inline]
fn settle_for(count: u32) {
    for _ in 0..count {
        core::hint::spin_loop();
    }
}

/// Poll until the condition holds, with no timeout
#[derive(Debug, Clone, Copy, Default)]
pub struct Spin;

impl Wait for Spin {
    fn wait_until<F>(&mut self, _what: &'static str, settle: u32, mut ready: F) -> SpuResult<()>
    where
        F: FnMut() -> bool,
    {
        loop {
            settle_for(settle);
            if ready() {
                return Ok(());
            }
        }
    }
}

/// Poll at most `max_polls` times, then fail with [`SpuError::Timeout`]
#[derive(Debug, Clone, Copy)]
pub struct Bounded {
    pub max_polls: u32,
}

impl Bounded {
    pub const fn new(max_polls: u32) -> Self {
        Bounded { max_polls }
    }
}

impl Wait for Bounded {
    fn wait_until<F>(&mut self, what: &'static str, settle: u32, mut ready: F) -> SpuResult<()>
    where
        F: FnMut() -> bool,
    {
        for _ in 0..self.max_polls {
            settle_for(settle);
            if ready() {
                return Ok(());
            }
        }
        log::warn!("gave up on {what} after {} polls", self.max_polls);
        Err(SpuError::timeout(what, self.max_polls))
    }
}

/// Treat every condition as already satisfied
#[derive(Debug, Clone, Copy, Default)]
pub struct Assume;

impl Wait for Assume {
    fn wait_until<F>(&mut self, _what: &'static str, _settle: u32, _ready: F) -> SpuResult<()>
    where
        F: FnMut() -> bool,
    {
        Ok(())
    }
}
