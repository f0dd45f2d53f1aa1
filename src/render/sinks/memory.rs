//! A sink that keeps what it is given, for tests and headless hosts.

use crate::render::sink::{FrameSink, SinkError};
use crate::render::Bitmap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct Recording {
    pub frames: u64,
    pub last_frame: Option<Bitmap>,
    /// Every brightness level applied, in order
    pub brightness: Vec<u8>,
}

/// Records frames and brightness changes. Clones share one recording, so a
/// test can keep a handle while the board owns the sink.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    recording: Arc<Mutex<Recording>>,
    fail_next: Arc<Mutex<Option<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recording(&self) -> MutexGuard<'_, Recording> {
        self.recording.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes the next `submit_frame` fail with a device error.
    pub fn fail_next_submit(&self, reason: &str) {
        *self.fail_next.lock().unwrap_or_else(|e| e.into_inner()) = Some(reason.to_string());
    }
}

impl FrameSink for MemorySink {
    fn name(&self) -> &str {
        "MemorySink"
    }

    fn submit_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError> {
        let failure = self.fail_next.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(reason) = failure {
            return Err(SinkError::Device(reason));
        }
        let mut rec = self.recording();
        rec.frames += 1;
        rec.last_frame = Some(frame.clone());
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), SinkError> {
        self.recording().brightness.push(level);
        Ok(())
    }
}
