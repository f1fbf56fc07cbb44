//! AVIF Bridge - host-facing decode entry point
//!
//! This crate exposes a single operation to a managed host runtime running
//! on a cooperative scheduler:
//!
//! ```text
//! decode(path: String) -> (width: Integer, height: Integer, pixels: Bytes)
//! ```
//!
//! The decode itself runs on a blocking worker thread so the scheduler stays
//! free for other tasks. Results come back as frozen host values; failures
//! are raised as host errors with a descriptive message.
//!
//! # Module Structure
//!
//! - `decode` - The entry point and the [`Avif`] decoder handle
//! - `blocking` - Running work off the scheduler
//! - `value` - Host value model
//! - `error` - Host error classes
//!
//! # Usage
//!
//! ```ignore
//! use avif_bridge::{decode, Value};
//!
//! let pixels = decode(&Value::from("photo.avif")).await?;
//! ```

mod blocking;
mod decode;
mod error;
mod value;

pub use avif_bridge_core::{DecoderConfig, StatusCode};
pub use blocking::run_blocking;
pub use decode::{decode, Avif};
pub use error::HostError;
pub use value::{FrozenBytes, Tuple, Value};

/// Get the version of the bridge
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
