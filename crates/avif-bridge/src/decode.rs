//! The host-facing decode entry point.
//!
//! # Example
//!
//! ```ignore
//! use avif_bridge::{decode, Value};
//!
//! let result = decode(&Value::from("photo.avif")).await?;
//! let tuple = result.as_tuple().unwrap();
//! let width = tuple.get(0).and_then(Value::as_integer).unwrap();
//! ```

use std::sync::Arc;

use avif_bridge_core::decode::worker;
use avif_bridge_core::{Codec, DecodeError, DecoderConfig, ImageCodec, Outcome, Payload};
use tracing::{debug, warn};

use crate::blocking::run_blocking;
use crate::error::HostError;
use crate::value::{FrozenBytes, Tuple, Value};

/// Decoder bound to one codec.
///
/// Cloning is cheap and clones share the codec. Every call to
/// [`Avif::decode`] builds its own payload, so concurrent calls are
/// independent.
#[derive(Debug)]
pub struct Avif<C: Codec = ImageCodec> {
    codec: Arc<C>,
}

impl<C: Codec> Clone for Avif<C> {
    fn clone(&self) -> Self {
        Self {
            codec: Arc::clone(&self.codec),
        }
    }
}

impl Default for Avif<ImageCodec> {
    fn default() -> Self {
        Self::with_codec(ImageCodec::default())
    }
}

impl Avif<ImageCodec> {
    /// Create a decoder with the default codec and the given limits.
    ///
    /// # Errors
    ///
    /// Returns `HostError::ArgumentError` if the config is invalid.
    pub fn new(config: DecoderConfig) -> Result<Self, HostError> {
        config
            .validate()
            .map_err(|e| HostError::ArgumentError(e.to_string()))?;
        Ok(Self::with_codec(ImageCodec::new(config)))
    }
}

impl<C: Codec> Avif<C> {
    /// Create a decoder backed by `codec`.
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Decode the first frame of the image file named by `path`.
    ///
    /// The decode runs on a blocking worker thread; only the calling task
    /// waits for it. Once started it cannot be cancelled.
    ///
    /// # Returns
    ///
    /// A frozen `(width, height, pixels)` tuple where `pixels` is
    /// `width * height * 4` bytes of row-major RGBA.
    ///
    /// # Errors
    ///
    /// - `HostError::TypeError` if `path` is not a string. Nothing is read.
    /// - `HostError::ArgumentError` if `path` contains a NUL byte.
    /// - `HostError::RuntimeError` if the file cannot be decoded, carrying
    ///   either the bridge's out-of-memory message or the decode library's
    ///   description of its status.
    pub async fn decode(&self, path: &Value) -> Result<Value, HostError> {
        let Value::Str(path) = path else {
            return Err(HostError::TypeError(format!(
                "wrong argument type {} (expected String)",
                path.type_name()
            )));
        };

        let mut payload = Payload::from_path_bytes(path.as_bytes())
            .map_err(|e| HostError::ArgumentError(e.to_string()))?;

        let codec = Arc::clone(&self.codec);
        let payload = run_blocking(move || {
            worker::run(codec.as_ref(), &mut payload);
            payload
        })
        .await?;

        into_host_value(payload.into_outcome())
    }
}

/// Decode with the default codec and limits.
///
/// See [`Avif::decode`].
pub async fn decode(path: &Value) -> Result<Value, HostError> {
    Avif::default().decode(path).await
}

fn into_host_value(outcome: Outcome) -> Result<Value, HostError> {
    let image = match outcome.into_result() {
        Ok(image) => image,
        Err(err) => {
            if let DecodeError::Library(code) = err {
                warn!(code = code.code(), "decode failed: {code}");
            } else {
                warn!("decode failed: {err}");
            }
            return Err(HostError::RuntimeError(err.to_string()));
        }
    };

    debug!(width = image.width, height = image.height, "decode succeeded");
    Ok(Value::Tuple(Tuple::from([
        Value::from(image.width),
        Value::from(image.height),
        Value::Bytes(FrozenBytes::adopt(image.pixels)),
    ])))
}
