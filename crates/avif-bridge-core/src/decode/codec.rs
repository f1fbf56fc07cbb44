//! The decode library seam.
//!
//! The library is a black box driven in a fixed order: bind to a file,
//! parse headers, decode the next (first) frame, convert it to RGBA. Every
//! step reports a library status. Dropping a [`FrameDecoder`] destroys the
//! decoder context.

use std::path::Path;

use super::StatusCode;

/// A decode library able to create decoder contexts.
///
/// Implementations are shared between concurrent decodes, each of which
/// creates its own context on its own worker thread.
pub trait Codec: Send + Sync + 'static {
    /// The decoder context type.
    type Decoder: FrameDecoder;

    /// Create a decoder context, or `None` if it cannot be allocated.
    fn create_decoder(&self) -> Option<Self::Decoder>;

    /// Largest RGBA buffer the worker may allocate for this codec.
    fn max_pixel_bytes(&self) -> Option<u64> {
        None
    }
}

/// A decoder context.
pub trait FrameDecoder {
    /// Bind the decoder to a file on disk.
    fn set_io_file(&mut self, path: &Path) -> Result<(), StatusCode>;

    /// Parse container and bitstream headers.
    fn parse(&mut self) -> Result<(), StatusCode>;

    /// Decode the next frame. Only the first frame is ever requested.
    fn next_image(&mut self) -> Result<(), StatusCode>;

    /// Dimensions of the decoded frame.
    fn dimensions(&self) -> (u32, u32);

    /// Write the decoded frame into `out` as 8-bit interleaved RGBA,
    /// row-major with no padding between rows.
    ///
    /// `out` is exactly `width * height * 4` bytes long.
    fn convert_rgba(&mut self, out: &mut [u8]) -> Result<(), StatusCode>;
}
