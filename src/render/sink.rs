use crate::render::Bitmap;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),

    #[error("Device error: {0}")]
    Device(String),
}

/// Where composed frames go. Calls occur on the render thread.
///
/// Implementations must accept and display the buffer without blocking
/// indefinitely. Retrying failed writes is up to the implementation; the
/// board reports the error to its caller and moves on.
pub trait FrameSink: Send {
    fn name(&self) -> &str;

    /// Display a full frame.
    fn submit_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError>;

    /// Set the device brightness (0 = off, 255 = full).
    fn set_brightness(&mut self, level: u8) -> Result<(), SinkError>;
}
