//! Prepared-for processing configuration.

use crate::error::{Error, Result};

/// Immutable per-run configuration handed to `prepare`.
///
/// Created by the host once it has negotiated a sample rate and block size,
/// and valid until the next `prepare` call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Largest block length `process` will be called with.
    pub max_block_size: usize,
    /// Number of input/output channels.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Create a validated spec.
    pub fn new(sample_rate: f64, max_block_size: usize, num_channels: usize) -> Result<Self> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if max_block_size == 0 {
            return Err(Error::InvalidConfig("block size must be non-zero".into()));
        }
        if num_channels == 0 {
            return Err(Error::InvalidConfig("channel count must be non-zero".into()));
        }
        Ok(Self {
            sample_rate,
            max_block_size,
            num_channels,
        })
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            max_block_size: 512,
            num_channels: 2,
        }
    }
}
