//! Off-thread image decoding.
//!
//! This module provides:
//! - The decode library seam ([`Codec`], [`FrameDecoder`]) and its default
//!   `image`-backed implementation ([`ImageCodec`])
//! - The [`Payload`] that carries one decode's inputs and outputs across a
//!   thread boundary
//! - The decode [`worker`] that fills a payload
//! - A synchronous typed entry point, [`decode_file`]
//!
//! # Architecture
//!
//! The worker is written to run on a thread the caller does not own. The
//! caller moves a payload in, the worker fills it, the caller moves it back
//! out and converts it with [`Payload::into_outcome`]. Ownership of the path
//! and pixel buffers moves with the payload, so no buffer is ever shared.
//!
//! # Examples
//!
//! ```ignore
//! use avif_bridge_core::decode::decode_file;
//!
//! let image = decode_file("photo.avif").unwrap();
//! println!("Decoded {}x{} image", image.width, image.height);
//! ```

mod codec;
mod image_codec;
mod payload;
mod types;
pub mod worker;

use std::path::Path;

pub use codec::{Codec, FrameDecoder};
pub use image_codec::{ImageCodec, ImageFrameDecoder};
pub use payload::{Outcome, Payload};
pub use types::{describe, DecodeError, DecodedImage, StatusCode, BYTES_PER_PIXEL};

/// Decode the first frame of an image file with the default codec.
///
/// Runs on the calling thread. Async callers should go through the
/// `avif-bridge` entry point instead.
///
/// # Errors
///
/// Returns `DecodeError::Library` with the library's status when the file
/// cannot be opened, parsed or decoded, and `DecodeError::Allocation` when
/// the output buffer cannot be allocated.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedImage, DecodeError> {
    decode_file_with(&ImageCodec::default(), path)
}

/// Decode the first frame of an image file with the given codec.
pub fn decode_file_with<C: Codec>(
    codec: &C,
    path: impl AsRef<Path>,
) -> Result<DecodedImage, DecodeError> {
    let mut payload = Payload::for_path(path.as_ref())?;
    worker::run(codec, &mut payload);
    payload.into_outcome().into_result()
}


// ============================================================================
// Property-Based Tests
// ============================================================================
