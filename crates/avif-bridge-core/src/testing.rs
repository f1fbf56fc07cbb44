//! A scripted codec for exercising the worker without real image files.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::decode::{Codec, FrameDecoder, StatusCode};

/// A step of the decode pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Parse,
    NextImage,
    Convert,
}

#[derive(Debug, Default)]
struct Counters {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    opened: Mutex<Vec<PathBuf>>,
}

/// Codec that produces a solid-color frame of fixed size, optionally
/// failing at a chosen step.
#[derive(Debug, Clone)]
pub struct ScriptedCodec {
    width: u32,
    height: u32,
    fill: [u8; 4],
    fail_create: bool,
    failure: Option<(Step, StatusCode)>,
    max_pixel_bytes: Option<u64>,
    delay: Option<Duration>,
    counters: Arc<Counters>,
}

impl ScriptedCodec {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fill: [0x11, 0x22, 0x33, 0xff],
            fail_create: false,
            failure: None,
            max_pixel_bytes: None,
            delay: None,
            counters: Arc::default(),
        }
    }

    /// Make decoder context creation fail.
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Make `step` report `code`.
    pub fn failing_at(mut self, step: Step, code: StatusCode) -> Self {
        self.failure = Some((step, code));
        self
    }

    pub fn with_max_pixel_bytes(mut self, cap: u64) -> Self {
        self.max_pixel_bytes = Some(cap);
        self
    }

    pub fn with_fill(mut self, fill: [u8; 4]) -> Self {
        self.fill = fill;
        self
    }

    /// Sleep this long inside `next_image`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of decoder contexts created so far.
    pub fn created(&self) -> usize {
        self.counters.created.load(Ordering::SeqCst)
    }

    /// Number of decoder contexts created and not yet destroyed.
    pub fn live_decoders(&self) -> usize {
        self.created() - self.counters.destroyed.load(Ordering::SeqCst)
    }

    /// Paths passed to `set_io_file`, in call order.
    pub fn opened_paths(&self) -> Vec<PathBuf> {
        self.counters
            .opened
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }
}

impl Codec for ScriptedCodec {
    type Decoder = ScriptedDecoder;

    fn create_decoder(&self) -> Option<Self::Decoder> {
        if self.fail_create {
            return None;
        }
        self.counters.created.fetch_add(1, Ordering::SeqCst);
        Some(ScriptedDecoder {
            codec: self.clone(),
        })
    }

    fn max_pixel_bytes(&self) -> Option<u64> {
        self.max_pixel_bytes
    }
}

/// Decoder context handed out by [`ScriptedCodec`].
pub struct ScriptedDecoder {
    codec: ScriptedCodec,
}

impl ScriptedDecoder {
    fn check(&self, step: Step) -> Result<(), StatusCode> {
        match self.codec.failure {
            Some((failing, code)) if failing == step => Err(code),
            _ => Ok(()),
        }
    }
}

impl FrameDecoder for ScriptedDecoder {
    fn set_io_file(&mut self, path: &Path) -> Result<(), StatusCode> {
        if let Ok(mut opened) = self.codec.counters.opened.lock() {
            opened.push(path.to_path_buf());
        }
        self.check(Step::Open)
    }

    fn parse(&mut self) -> Result<(), StatusCode> {
        self.check(Step::Parse)
    }

    fn next_image(&mut self) -> Result<(), StatusCode> {
        if let Some(delay) = self.codec.delay {
            std::thread::sleep(delay);
        }
        self.check(Step::NextImage)
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.codec.width, self.codec.height)
    }

    fn convert_rgba(&mut self, out: &mut [u8]) -> Result<(), StatusCode> {
        self.check(Step::Convert)?;
        for pixel in out.chunks_exact_mut(4) {
            pixel.copy_from_slice(&self.codec.fill);
        }
        Ok(())
    }
}

impl Drop for ScriptedDecoder {
    fn drop(&mut self) {
        self.codec.counters.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}
