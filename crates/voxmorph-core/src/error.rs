//! Error types for voxmorph-core.

use thiserror::Error;

/// Error type for operations outside the audio path.
///
/// The audio path itself never returns errors; misuse degrades to
/// pass-through and numeric degeneracy is clamped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Reference buffer is empty")]
    EmptyBuffer,

    #[error("Invalid channel count: expected at most {expected}, got {got}")]
    InvalidChannelCount { expected: usize, got: usize },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
