use crate::render::sink::{FrameSink, SinkError};
use crate::render::Bitmap;

/// Sink that discards every frame.
#[derive(Debug, Default)]
pub struct NullSink {
    /// Number of frames submitted so far.
    frame_id: u64,
    brightness: Option<u8>,
}

impl NullSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }

    pub fn brightness(&self) -> Option<u8> {
        self.brightness
    }
}

impl FrameSink for NullSink {
    fn name(&self) -> &str {
        "NullSink"
    }

    fn submit_frame(&mut self, _frame: &Bitmap) -> Result<(), SinkError> {
        self.frame_id = self.frame_id.wrapping_add(1);
        Ok(())
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), SinkError> {
        self.brightness = Some(level);
        Ok(())
    }
}
