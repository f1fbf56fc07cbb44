//! AVIF Bridge Core - off-thread image decoding
//!
//! This crate owns everything that happens on the worker side of the
//! host/native boundary: the decode library seam, the transfer payload that
//! crosses the thread boundary, and the decode worker that fills it.
//!
//! # Module Structure
//!
//! - `decode` - Codec seam, transfer payload, decode worker and result types
//! - `config` - Decoder limits
//!
//! The host-facing entry point lives in the `avif-bridge` crate, which moves a
//! [`decode::Payload`] onto a worker thread and turns it back into host values.

pub mod config;
pub mod decode;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::{ConfigError, DecoderConfig};
pub use decode::{
    decode_file, decode_file_with, describe, Codec, DecodeError, DecodedImage, FrameDecoder,
    ImageCodec, Outcome, Payload, StatusCode, BYTES_PER_PIXEL,
};
