//! Default decode library backend built on the `image` crate.
//!
//! AVIF support comes from the default `avif-native` feature, which links the
//! system dav1d library. PNG and JPEG containers are always accepted.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use image::error::{ImageFormatHint, LimitErrorKind, UnsupportedErrorKind};
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader, Limits, RgbaImage};

use super::{Codec, FrameDecoder, StatusCode, BYTES_PER_PIXEL};
use crate::config::DecoderConfig;

/// Decode library backed by `image`.
#[derive(Debug, Clone, Default)]
pub struct ImageCodec {
    config: DecoderConfig,
}

impl ImageCodec {
    /// Create a codec that enforces the given limits.
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }
}

impl Codec for ImageCodec {
    type Decoder = ImageFrameDecoder;

    fn create_decoder(&self) -> Option<Self::Decoder> {
        Some(ImageFrameDecoder {
            config: self.config,
            stage: Stage::Empty,
        })
    }

    fn max_pixel_bytes(&self) -> Option<u64> {
        self.config.max_pixel_bytes
    }
}

/// Where a decoder context is in the open -> parse -> decode sequence.
enum Stage {
    Empty,
    Opened(ImageReader<BufReader<File>>),
    Parsed(Box<dyn ImageDecoder>),
    Decoded(RgbaImage),
    Failed,
}

/// Decoder context for [`ImageCodec`].
pub struct ImageFrameDecoder {
    config: DecoderConfig,
    stage: Stage,
}

impl FrameDecoder for ImageFrameDecoder {
    fn set_io_file(&mut self, path: &Path) -> Result<(), StatusCode> {
        let mut reader = ImageReader::open(path).map_err(|_| StatusCode::IoError)?;

        let mut limits = Limits::no_limits();
        limits.max_image_width = Some(self.config.image_dimension_limit);
        limits.max_image_height = Some(self.config.image_dimension_limit);
        reader.limits(limits);

        self.stage = Stage::Opened(reader);
        Ok(())
    }

    fn parse(&mut self) -> Result<(), StatusCode> {
        let reader = match std::mem::replace(&mut self.stage, Stage::Failed) {
            Stage::Opened(reader) => reader,
            _ => return Err(StatusCode::IoNotSet),
        };

        let reader = reader.with_guessed_format().map_err(io_status)?;
        let decoder = reader.into_decoder().map_err(parse_status)?;

        let (width, height) = decoder.dimensions();
        if !self.config.accepts(width, height) {
            return Err(StatusCode::BmffParseFailed);
        }

        self.stage = Stage::Parsed(Box::new(decoder));
        Ok(())
    }

    fn next_image(&mut self) -> Result<(), StatusCode> {
        let decoder = match std::mem::replace(&mut self.stage, Stage::Failed) {
            Stage::Parsed(decoder) => decoder,
            Stage::Decoded(_) => return Err(StatusCode::NoImagesRemaining),
            _ => return Err(StatusCode::NoContent),
        };

        // Rgba8 frames are moved, anything else is converted once here.
        let frame = DynamicImage::from_decoder(decoder)
            .map_err(frame_status)?
            .into_rgba8();
        self.stage = Stage::Decoded(frame);
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        match &self.stage {
            Stage::Decoded(frame) => (frame.width(), frame.height()),
            Stage::Parsed(decoder) => decoder.dimensions(),
            _ => (0, 0),
        }
    }

    fn convert_rgba(&mut self, out: &mut [u8]) -> Result<(), StatusCode> {
        let Stage::Decoded(frame) = &self.stage else {
            return Err(StatusCode::NoContent);
        };

        let expected =
            u64::from(frame.width()) * u64::from(frame.height()) * BYTES_PER_PIXEL;
        if out.len() as u64 != expected {
            return Err(StatusCode::InvalidArgument);
        }

        out.copy_from_slice(frame.as_raw());
        Ok(())
    }
}

fn io_status(err: io::Error) -> StatusCode {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => StatusCode::TruncatedData,
        _ => StatusCode::IoError,
    }
}

fn parse_status(err: ImageError) -> StatusCode {
    match err {
        ImageError::Unsupported(e) => match e.kind() {
            // Neither the content nor the extension names a known container.
            UnsupportedErrorKind::Format(
                ImageFormatHint::Unknown | ImageFormatHint::PathExtension(_),
            ) => StatusCode::InvalidFtyp,
            UnsupportedErrorKind::Format(_) => StatusCode::NoCodecAvailable,
            UnsupportedErrorKind::Color(_) => StatusCode::UnsupportedDepth,
            _ => StatusCode::NotImplemented,
        },
        ImageError::Decoding(_) => StatusCode::BmffParseFailed,
        ImageError::Limits(e) => limit_status(e.kind()),
        ImageError::IoError(e) => io_status(e),
        _ => StatusCode::UnknownError,
    }
}

fn frame_status(err: ImageError) -> StatusCode {
    match err {
        ImageError::Unsupported(e) => match e.kind() {
            UnsupportedErrorKind::Color(_) => StatusCode::UnsupportedDepth,
            _ => StatusCode::NotImplemented,
        },
        ImageError::Decoding(_) => StatusCode::DecodeColorFailed,
        ImageError::Limits(e) => limit_status(e.kind()),
        ImageError::IoError(e) => io_status(e),
        _ => StatusCode::UnknownError,
    }
}

fn limit_status(kind: LimitErrorKind) -> StatusCode {
    match kind {
        LimitErrorKind::InsufficientMemory => StatusCode::OutOfMemory,
        _ => StatusCode::BmffParseFailed,
    }
}
