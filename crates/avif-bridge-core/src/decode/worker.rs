//! The decode worker.
//!
//! [`run`] drives one decoder context through open, parse, first-frame
//! decode and RGBA conversion, recording the outcome on the [`Payload`]. It
//! never panics on a decode failure: every failure becomes a status code or
//! an error message on the payload.

use std::ffi::{CStr, OsStr};
use std::path::PathBuf;

use tracing::{debug, debug_span, warn};

use super::{Codec, FrameDecoder, Payload, StatusCode, BYTES_PER_PIXEL};

/// Message recorded when the decoder context cannot be created.
pub const CONTEXT_ALLOC_FAILED: &str = "decoder context creation failed (out of memory)";

/// Message recorded when the RGBA buffer cannot be allocated.
pub const PIXEL_ALLOC_FAILED: &str = "Failed to allocate pixel buffer (out of memory)";

/// Decode the first frame of the file named by `payload`'s path.
///
/// The path is taken out of the payload and released exactly once. The
/// decoder context is destroyed before returning on every path. On return
/// exactly one of these holds:
///
/// - `result` is `Ok` and `pixels` holds `width * height * 4` bytes
/// - `result` is an error status and `pixels` is `None`
/// - `error_message` is set and `pixels` is `None`
pub fn run<C: Codec>(codec: &C, payload: &mut Payload) {
    payload.pixels = None;
    payload.error_message = None;
    payload.result = Some(Err(StatusCode::UnknownError));

    let Some(path) = payload.path.take() else {
        payload.result = Some(Err(StatusCode::IoNotSet));
        return;
    };

    let _span = debug_span!("decode", path = %path.to_string_lossy()).entered();

    let Some(mut decoder) = codec.create_decoder() else {
        warn!("{}", CONTEXT_ALLOC_FAILED);
        payload.error_message = Some(CONTEXT_ALLOC_FAILED.to_string());
        return;
    };

    let opened = decoder.set_io_file(&to_path(&path));
    drop(path);
    if let Err(code) = opened {
        return record_failure(payload, "open", code);
    }

    if let Err(code) = decoder.parse() {
        return record_failure(payload, "parse", code);
    }

    if let Err(code) = decoder.next_image() {
        return record_failure(payload, "next_image", code);
    }
    payload.result = Some(Ok(()));

    let (width, height) = decoder.dimensions();
    payload.width = width;
    payload.height = height;
    debug!(width, height, "decoded first frame");

    let Some(mut pixels) = allocate_pixels(width, height, codec.max_pixel_bytes()) else {
        warn!(width, height, "{}", PIXEL_ALLOC_FAILED);
        payload.error_message = Some(PIXEL_ALLOC_FAILED.to_string());
        return;
    };

    match decoder.convert_rgba(&mut pixels) {
        Ok(()) => {
            debug!(bytes = pixels.len(), "converted to RGBA");
            payload.pixels = Some(pixels);
            payload.result = Some(Ok(()));
        }
        Err(code) => record_failure(payload, "convert_rgba", code),
    }
}

fn record_failure(payload: &mut Payload, step: &'static str, code: StatusCode) {
    warn!(step, code = code.code(), "{code}");
    payload.result = Some(Err(code));
}

/// Allocate a zeroed RGBA buffer, or `None` if the size overflows, exceeds
/// `cap`, or cannot be reserved.
fn allocate_pixels(width: u32, height: u32, cap: Option<u64>) -> Option<Vec<u8>> {
    let size = u64::from(width)
        .checked_mul(u64::from(height))?
        .checked_mul(BYTES_PER_PIXEL)?;
    if cap.is_some_and(|cap| size > cap) {
        return None;
    }

    let len = usize::try_from(size).ok()?;
    let mut pixels = Vec::new();
    pixels.try_reserve_exact(len).ok()?;
    pixels.resize(len, 0);
    Some(pixels)
}

#[cfg(unix)]
fn to_path(path: &CStr) -> PathBuf {
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(path.to_bytes()))
}

#[cfg(not(unix))]
fn to_path(path: &CStr) -> PathBuf {
    PathBuf::from(OsStr::new(path.to_string_lossy().as_ref()))
}
