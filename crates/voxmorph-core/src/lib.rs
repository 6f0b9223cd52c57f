//! Shared types for the voxmorph formant morphing engine.
//!
//! # Primary API
//!
//! - [`ProcessSpec`]: prepared-for configuration (sample rate, block size, channels)
//! - [`Error`] / [`Result`]: error types for the non-real-time surface
//! - [`AtomicFloat`]: lock-free parameter cell shared between UI and audio threads
//! - [`ParameterRange`]: value range with clamping and normalized conversion

pub mod config;
pub mod error;

mod lockfree;
mod parameter;

pub use config::ProcessSpec;
pub use error::{Error, Result};
pub use lockfree::AtomicFloat;
pub use parameter::ParameterRange;
