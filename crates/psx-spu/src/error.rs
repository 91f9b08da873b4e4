//! Error types for SPU operations

use thiserror::Error;

/// Failure of an SPU operation
///
/// With the default [`Spin`](crate::wait::Spin) strategy the polling loops
/// never fail, so `Timeout` only shows up when a bounded strategy is chosen.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpuError {
    #[error("timed out after {polls} polls waiting for {what}")]
    Timeout { what: &'static str, polls: u32 },

    #[error("{size} bytes at {address:#07X} do not fit in sound RAM")]
    OutOfSoundMemory { address: u32, size: usize },

    #[error("{count} waveforms given, the bank holds at most {max}")]
    TooManyWaveforms { count: usize, max: usize },
}

impl SpuError {
    pub fn timeout(what: &'static str, polls: u32) -> Self {
        Self::Timeout { what, polls }
    }
}

pub type SpuResult<T> = Result<T, SpuError>;
