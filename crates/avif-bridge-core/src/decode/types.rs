//! Core types for image decoding.

use thiserror::Error;

/// Bytes per pixel of the output format (8-bit interleaved RGBA).
pub const BYTES_PER_PIXEL: u64 = 4;

/// Non-success results of the decode library.
///
/// Discriminants follow the library's numeric result domain, where `0` is
/// success. The `Display` text is the library's own description of the code,
/// which is what callers see when a decode fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u32)]
pub enum StatusCode {
    #[error("Unknown Error")]
    UnknownError = 1,
    #[error("Invalid ftyp")]
    InvalidFtyp = 2,
    #[error("No content")]
    NoContent = 3,
    #[error("Reformat failed")]
    ReformatFailed = 5,
    #[error("Unsupported depth")]
    UnsupportedDepth = 6,
    #[error("BMFF parsing failed")]
    BmffParseFailed = 9,
    #[error("Missing or empty image item")]
    MissingImageItem = 10,
    #[error("Decoding of color planes failed")]
    DecodeColorFailed = 11,
    #[error("Decoding of alpha plane failed")]
    DecodeAlphaFailed = 12,
    #[error("No codec available")]
    NoCodecAvailable = 15,
    #[error("No images remaining")]
    NoImagesRemaining = 16,
    #[error("Invalid image grid")]
    InvalidImageGrid = 18,
    #[error("Truncated data")]
    TruncatedData = 20,
    #[error("IO not set")]
    IoNotSet = 21,
    #[error("IO Error")]
    IoError = 22,
    #[error("Invalid argument")]
    InvalidArgument = 24,
    #[error("Not implemented")]
    NotImplemented = 25,
    #[error("Out of memory")]
    OutOfMemory = 26,
}

impl StatusCode {
    /// The library's numeric code for this result.
    #[inline]
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Human-readable description of a library result, `"OK"` for success.
pub fn describe(result: Result<(), StatusCode>) -> String {
    match result {
        Ok(()) => "OK".to_string(),
        Err(code) => code.to_string(),
    }
}

/// Error types for a failed decode.
///
/// The two tiers are kept apart: `Allocation` originates in this bridge's own
/// allocations, `Library` carries a status from the decode library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A buffer owned by the bridge could not be allocated.
    #[error("AVIF decoding failed: {0}")]
    Allocation(String),

    /// The decode library reported a non-success status.
    #[error("AVIF decoding failed: {0}")]
    Library(StatusCode),

    /// The path cannot be handed to the decoder (interior NUL byte).
    #[error("string contains null byte")]
    InvalidPath,
}

/// A decoded image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel, no row padding).
    /// Length is width * height * 4.
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new DecodedImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len() as u64,
            u64::from(width) * u64::from(height) * BYTES_PER_PIXEL,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a DecodedImage from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this image has no pixels.
    ///
    /// A zero-dimension image is still a successful decode.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
