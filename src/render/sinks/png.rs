use crate::render::sink::{FrameSink, SinkError};
use crate::render::Bitmap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Writes every `every`-th frame to a greyscale PNG so the board can be
/// previewed without hardware. The file is replaced atomically.
#[derive(Debug)]
pub struct PngSink {
    path: PathBuf,
    every: u64,
    frame_id: u64,
    brightness: u8,
}

impl PngSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            every: 1,
            frame_id: 0,
            brightness: u8::MAX,
        }
    }

    /// Only write one frame out of `n`.
    pub fn every(mut self, n: u64) -> Self {
        self.every = n.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_png(&self, frame: &Bitmap) -> Result<(), SinkError> {
        let tmp = self.path.with_extension("png.tmp");

        let file = File::create(&tmp)?;
        let mut encoder = png::Encoder::new(BufWriter::new(file), frame.width(), frame.height());
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);

        let scale = self.brightness as u16;
        let data: Vec<u8> = frame
            .pixels()
            .iter()
            .map(|p| ((*p as u16 * scale) / 255) as u8)
            .collect();

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl FrameSink for PngSink {
    fn name(&self) -> &str {
        "PngSink"
    }

    fn submit_frame(&mut self, frame: &Bitmap) -> Result<(), SinkError> {
        let id = self.frame_id;
        self.frame_id = self.frame_id.wrapping_add(1);
        if id % self.every != 0 {
            return Ok(());
        }
        self.write_png(frame)
    }

    fn set_brightness(&mut self, level: u8) -> Result<(), SinkError> {
        self.brightness = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(path: &Path) -> (png::OutputInfo, Vec<u8>) {
        let decoder = png::Decoder::new(File::open(path).unwrap());
        let mut reader = decoder.read_info().unwrap();
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf)
    }

    #[test]
    fn writes_scaled_greyscale_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        let mut sink = PngSink::new(&path);

        let mut frame = Bitmap::new(4, 2);
        frame.set(1, 1, Bitmap::LIT);
        sink.set_brightness(51).unwrap();
        sink.submit_frame(&frame).unwrap();

        let (info, data) = decode(&path);
        assert_eq!((info.width, info.height), (4, 2));
        assert_eq!(info.color_type, png::ColorType::Grayscale);
        assert_eq!(data[5], 51);
        assert_eq!(data.iter().filter(|p| **p != 0).count(), 1);
        assert!(!path.with_extension("png.tmp").exists());
    }

    #[test]
    fn skips_frames_between_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.png");
        let mut sink = PngSink::new(&path).every(3);

        let blank = Bitmap::new(2, 2);
        let mut lit = Bitmap::new(2, 2);
        lit.fill(Bitmap::LIT);

        sink.submit_frame(&blank).unwrap(); // written
        sink.submit_frame(&lit).unwrap();
        sink.submit_frame(&lit).unwrap();
        let (_, data) = decode(&path);
        assert!(data.iter().all(|p| *p == 0));

        sink.submit_frame(&lit).unwrap(); // written
        let (_, data) = decode(&path);
        assert!(data.iter().all(|p| *p == 255));
    }
}
