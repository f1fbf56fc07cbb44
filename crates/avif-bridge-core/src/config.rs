//! Decoder limits.
//!
//! The defaults mirror the decode library's own: at most 16384 x 16384
//! pixels in total and at most 32768 pixels along either edge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default maximum number of pixels in a decoded image.
pub const DEFAULT_IMAGE_SIZE_LIMIT: u64 = 16384 * 16384;

/// Default maximum width or height of a decoded image.
pub const DEFAULT_IMAGE_DIMENSION_LIMIT: u32 = 32768;

/// Errors produced when validating a [`DecoderConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A limit was configured as zero.
    #[error("{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Limits applied by the decoder and the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum width * height accepted while parsing headers.
    pub image_size_limit: u64,
    /// Maximum width or height accepted while parsing headers.
    pub image_dimension_limit: u32,
    /// Upper bound on the RGBA output buffer. Larger buffers are reported
    /// as an allocation failure.
    pub max_pixel_bytes: Option<u64>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            image_size_limit: DEFAULT_IMAGE_SIZE_LIMIT,
            image_dimension_limit: DEFAULT_IMAGE_DIMENSION_LIMIT,
            max_pixel_bytes: None,
        }
    }
}

impl DecoderConfig {
    /// Create a config with the library defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check that every configured limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_size_limit == 0 {
            return Err(ConfigError::ZeroLimit("image_size_limit"));
        }
        if self.image_dimension_limit == 0 {
            return Err(ConfigError::ZeroLimit("image_dimension_limit"));
        }
        if self.max_pixel_bytes == Some(0) {
            return Err(ConfigError::ZeroLimit("max_pixel_bytes"));
        }
        Ok(())
    }

    /// Whether an image of the given dimensions passes the size and
    /// dimension limits.
    pub fn accepts(&self, width: u32, height: u32) -> bool {
        width <= self.image_dimension_limit
            && height <= self.image_dimension_limit
            && u64::from(width) * u64::from(height) <= self.image_size_limit
    }
}
