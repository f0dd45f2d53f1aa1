//! Single-channel pixel buffers.
//!
//! Every widget renders into its own [`Bitmap`] and the compositor pastes
//! those into the device-sized [`Frame`]. Pixels are 8-bit intensity values:
//! [`Bitmap::BLANK`] is background, [`Bitmap::LIT`] a fully lit amber pixel.

use embedded_graphics::{pixelcolor::Gray8, prelude::*};
use std::convert::Infallible;

/// Size of a surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// The full-resolution buffer flushed to the device.
pub type Frame = Bitmap;

impl Bitmap {
    pub const BLANK: u8 = 0;
    pub const LIT: u8 = 255;

    /// Creates a blank bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Self::BLANK; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Raw row-major pixel data.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel value at `(x, y)`, `None` outside the bitmap.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    /// Sets a pixel. Writes outside the bitmap are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = value;
        }
    }

    pub fn fill(&mut self, value: u8) {
        self.pixels.fill(value);
    }

    pub fn clear(&mut self) {
        self.fill(Self::BLANK);
    }

    /// Fills a rectangle, clipped to the bitmap.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, value: u8) {
        let Some((x0, x1)) = clip(x, width, self.width) else { return };
        let Some((y0, y1)) = clip(y, height, self.height) else { return };

        for row in y0..y1 {
            let start = self.index(x0, row);
            let end = start + (x1 - x0) as usize;
            self.pixels[start..end].fill(value);
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == Self::BLANK)
    }

    /// Number of lit (non-blank) pixels.
    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|p| **p != Self::BLANK).count()
    }

    /// Copies all of `src` with its top-left corner at `(x, y)`. Parts that
    /// fall outside this bitmap are clipped; `x`/`y` may be negative.
    pub fn paste(&mut self, src: &Bitmap, x: i32, y: i32) {
        self.paste_cropped(src, 0, 0, src.width, src.height, x, y);
    }

    /// Copies the `w`×`h` window of `src` starting at `(src_x, src_y)` to
    /// `(dst_x, dst_y)`, clipped against both bitmaps.
    #[allow(clippy::too_many_arguments)]
    pub fn paste_cropped(
        &mut self,
        src: &Bitmap,
        src_x: u32,
        src_y: u32,
        w: u32,
        h: u32,
        dst_x: i32,
        dst_y: i32,
    ) {
        // Clip the source window against the source bitmap.
        let w = w.min(src.width.saturating_sub(src_x)) as i64;
        let h = h.min(src.height.saturating_sub(src_y)) as i64;

        // Then clip the destination rectangle against ourselves.
        let (dx, dy) = (dst_x as i64, dst_y as i64);
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (dx + w).min(self.width as i64);
        let y1 = (dy + h).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        let sx = (src_x as i64 + (x0 - dx)) as u32;
        let len = (x1 - x0) as usize;
        for row in y0..y1 {
            let sy = (src_y as i64 + (row - dy)) as u32;
            let from = src.index(sx, sy);
            let to = self.index(x0 as u32, row as u32);
            self.pixels[to..to + len].copy_from_slice(&src.pixels[from..from + len]);
        }
    }

    /// Copy of the `w`×`h` window at `(x, y)`. Parts outside are blank.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> Bitmap {
        let mut out = Bitmap::new(w, h);
        out.paste_cropped(self, x, y, w, h, 0, 0);
        out
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Clips the span `[start, start + len)` to `[0, limit)`.
fn clip(start: i32, len: u32, limit: u32) -> Option<(u32, u32)> {
    let lo = (start as i64).max(0);
    let hi = (start as i64 + len as i64).min(limit as i64);
    if lo >= hi {
        None
    } else {
        Some((lo as u32, hi as u32))
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("lit", &self.lit_count())
            .finish()
    }
}

impl DrawTarget for Bitmap {
    type Color = Gray8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }
            self.set(x as u32, y as u32, color.luma());
        }
        Ok(())
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32) -> Bitmap {
        let mut b = Bitmap::new(w, h);
        b.fill(Bitmap::LIT);
        b
    }

    #[test]
    fn new_bitmap_is_blank() {
        let b = Bitmap::new(4, 3);
        assert!(b.is_blank());
        assert_eq!(b.pixels().len(), 12);
        assert_eq!(b.get(4, 0), None);
    }

    #[test]
    fn paste_clips_negative_offsets() {
        let mut dst = Bitmap::new(4, 4);
        dst.paste(&solid(3, 3), -1, -2);

        assert_eq!(dst.lit_count(), 2);
        assert_eq!(dst.get(0, 0), Some(Bitmap::LIT));
        assert_eq!(dst.get(1, 0), Some(Bitmap::LIT));
        assert_eq!(dst.get(0, 1), Some(Bitmap::BLANK));
    }

    #[test]
    fn paste_clips_right_and_bottom() {
        let mut dst = Bitmap::new(4, 4);
        dst.paste(&solid(3, 3), 2, 3);
        assert_eq!(dst.lit_count(), 2);

        dst.clear();
        dst.paste(&solid(3, 3), 10, 0);
        assert!(dst.is_blank());
    }

    #[test]
    fn paste_cropped_copies_window() {
        let mut src = Bitmap::new(5, 1);
        for x in 0..5 {
            src.set(x, 0, x as u8 * 10);
        }
        let mut dst = Bitmap::new(3, 1);
        dst.paste_cropped(&src, 2, 0, 3, 1, 0, 0);

        assert_eq!(dst.pixels(), &[20, 30, 40]);

        // window running off the source end is truncated
        dst.clear();
        dst.paste_cropped(&src, 4, 0, 3, 1, 0, 0);
        assert_eq!(dst.pixels(), &[40, 0, 0]);
    }

    #[test]
    fn fill_rect_is_clipped() {
        let mut b = Bitmap::new(4, 4);
        b.fill_rect(-2, 2, 4, 10, 7);
        assert_eq!(b.lit_count(), 4);
        assert_eq!(b.get(1, 3), Some(7));
        assert_eq!(b.get(2, 3), Some(0));
    }

    #[test]
    fn draw_target_writes_luma() {
        use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};

        let mut b = Bitmap::new(8, 8);
        Rectangle::new(Point::new(2, 2), Size::new(2, 2))
            .into_styled(PrimitiveStyle::with_fill(Gray8::WHITE))
            .draw(&mut b)
            .unwrap();

        assert_eq!(b.lit_count(), 4);
        assert_eq!(b.get(3, 3), Some(255));
    }
}
