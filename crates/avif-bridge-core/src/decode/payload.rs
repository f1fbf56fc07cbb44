//! The transfer payload handed to the decode worker.
//!
//! A [`Payload`] is built by the caller, moved onto a worker thread, filled
//! by [`super::worker::run`], and moved back. Each field has one writer:
//!
//! | field           | written by | released by                           |
//! |-----------------|------------|---------------------------------------|
//! | `path`          | caller     | worker, exactly once, after binding   |
//! | `pixels`        | worker     | caller (moved into the result)        |
//! | `width/height`  | worker     | -                                     |
//! | `result`        | worker     | -                                     |
//! | `error_message` | worker     | caller                                |

use std::ffi::CString;
use std::path::Path;

use super::{DecodeError, DecodedImage, StatusCode};

/// Inputs and outputs of one decode call.
#[derive(Debug)]
pub struct Payload {
    pub(crate) path: Option<CString>,
    pub(crate) pixels: Option<Vec<u8>>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) result: Option<Result<(), StatusCode>>,
    pub(crate) error_message: Option<String>,
}

/// What a finished payload amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The first frame was decoded and converted.
    Decoded(DecodedImage),
    /// The decode library reported a failure.
    Library(StatusCode),
    /// The bridge failed to allocate one of its own buffers.
    Allocation(String),
}

impl Payload {
    /// Create a payload that owns `path`, with every output at its
    /// not-yet-run default.
    pub fn new(path: CString) -> Self {
        Self {
            path: Some(path),
            pixels: None,
            width: 0,
            height: 0,
            result: None,
            error_message: None,
        }
    }

    /// Copy `bytes` into an owned, nul-terminated path buffer.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::InvalidPath` if `bytes` contains a NUL byte.
    pub fn from_path_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        CString::new(bytes)
            .map(Self::new)
            .map_err(|_| DecodeError::InvalidPath)
    }

    /// Build a payload from a filesystem path.
    pub fn for_path(path: &Path) -> Result<Self, DecodeError> {
        #[cfg(unix)]
        {
            use std::os::unix::ffi::OsStrExt;
            Self::from_path_bytes(path.as_os_str().as_bytes())
        }
        #[cfg(not(unix))]
        {
            let path = path.to_str().ok_or(DecodeError::InvalidPath)?;
            Self::from_path_bytes(path.as_bytes())
        }
    }

    /// The path still owned by the payload. `None` once the worker ran.
    pub fn path(&self) -> Option<&CString> {
        self.path.as_ref()
    }

    /// The decoded pixels, present only after a successful decode.
    pub fn pixels(&self) -> Option<&[u8]> {
        self.pixels.as_deref()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The library status, `None` if the worker has not run.
    pub fn result(&self) -> Option<Result<(), StatusCode>> {
        self.result
    }

    /// The bridge's own failure message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Consume the payload.
    ///
    /// The explicit error message is checked before the library status.
    /// Whatever buffers are not moved into the outcome are released here.
    pub fn into_outcome(self) -> Outcome {
        let Payload {
            pixels,
            width,
            height,
            result,
            error_message,
            ..
        } = self;

        if let Some(message) = error_message {
            return Outcome::Allocation(message);
        }

        match (result, pixels) {
            (Some(Ok(())), Some(pixels)) => Outcome::Decoded(DecodedImage {
                width,
                height,
                pixels,
            }),
            (Some(Err(code)), _) => Outcome::Library(code),
            _ => Outcome::Library(StatusCode::UnknownError),
        }
    }
}

impl Outcome {
    /// Convert into the typed Rust result.
    pub fn into_result(self) -> Result<DecodedImage, DecodeError> {
        match self {
            Outcome::Decoded(image) => Ok(image),
            Outcome::Library(code) => Err(DecodeError::Library(code)),
            Outcome::Allocation(message) => Err(DecodeError::Allocation(message)),
        }
    }
}
