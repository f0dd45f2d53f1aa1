use crate::region::{HAlign, Region, RegionTiming};
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use std::sync::Arc;
use std::time::Duration;

/// One column of a list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCell {
    pub text: String,
    pub x: u32,
    pub width: u32,
    pub align: HAlign,
}

impl ListCell {
    pub fn new(text: impl Into<String>, x: u32, width: u32) -> Self {
        Self { text: text.into(), x, width, align: HAlign::Left }
    }

    pub fn aligned(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    pub cells: Vec<ListCell>,
}

impl ListItem {
    pub fn new(cells: Vec<ListCell>) -> Self {
        Self { cells }
    }
}

/// Vertically scrolling list of rows.
///
/// All rows are rendered once into a tall strip, followed by copies of the
/// first `visible_rows` rows so the view can wrap without a seam. The view
/// moves up `step` pixels per paint and stops for `pause_ticks` paints on
/// every row boundary. Lists that fit are painted once and left alone.
#[derive(Debug)]
pub struct PagingList {
    size: SurfaceSize,
    font: Arc<dyn Font>,
    row_height: u32,
    items: Vec<ListItem>,
    strip: Bitmap,
    offset: u32,
    painted_offset: u32,
    step: u32,
    pause_ticks: u32,
    paused: u32,
    timing: RegionTiming,
    renders: u64,
    dirty: bool,
    surface: Bitmap,
}

impl PagingList {
    pub fn new(width: u32, height: u32, row_height: u32, font: Arc<dyn Font>) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            font,
            row_height: row_height.max(1),
            items: Vec::new(),
            strip: Bitmap::new(width, 0),
            offset: 0,
            painted_offset: 0,
            step: 1,
            pause_ticks: 80,
            paused: 0,
            timing: RegionTiming::new(Duration::from_millis(20)),
            renders: 0,
            dirty: true,
            surface: Bitmap::new(width, height),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.timing = RegionTiming::new(interval);
        self
    }

    pub fn with_scroll(mut self, step: u32, pause_ticks: u32) -> Self {
        self.step = step.max(1);
        self.pause_ticks = pause_ticks;
        self
    }

    pub fn with_items(mut self, items: Vec<ListItem>) -> Self {
        self.update_items(items);
        self
    }

    /// Replaces the rows. An equal list is ignored; anything else is
    /// re-rendered and scrolled back to the first row.
    pub fn update_items(&mut self, items: Vec<ListItem>) -> bool {
        if self.items == items {
            return false;
        }
        self.items = items;
        self.render_strip();
        self.offset = 0;
        self.paused = 0;
        self.dirty = true;
        true
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn visible_rows(&self) -> u32 {
        (self.size.height / self.row_height).max(1)
    }

    /// Whether there are more rows than fit, so the list scrolls.
    pub fn is_animated(&self) -> bool {
        self.items.len() as u32 > self.visible_rows()
    }

    /// Scroll offset used by the last paint.
    pub fn painted_offset(&self) -> u32 {
        self.painted_offset
    }

    /// Length of one full cycle in pixels.
    pub fn period(&self) -> u32 {
        self.items.len() as u32 * self.row_height
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn render_strip(&mut self) {
        let n = self.items.len();
        let rows = if self.is_animated() {
            n + self.visible_rows() as usize
        } else {
            n
        };

        let mut strip = Bitmap::new(self.size.width, rows as u32 * self.row_height);
        for row in 0..rows {
            let y = (row as u32 * self.row_height) as i32;
            for cell in &self.items[row % n.max(1)].cells {
                let image = self.font.rasterize(&cell.text);
                let x = cell.x + cell.align.offset(image.width(), cell.width);
                let w = image.width().min(cell.width);
                strip.paste_cropped(&image, 0, 0, w, self.row_height, x as i32, y);
            }
        }
        self.strip = strip;
        self.renders += 1;
    }

    fn advance(&mut self) {
        if self.offset % self.row_height == 0 && self.paused < self.pause_ticks {
            self.paused += 1;
            return;
        }
        self.paused = 0;

        let next_boundary = (self.offset / self.row_height + 1) * self.row_height;
        self.offset = (self.offset + self.step).min(next_boundary);
        if self.offset >= self.period() {
            self.offset -= self.period();
        }
    }
}

impl Region for PagingList {
    fn bounds(&self) -> SurfaceSize {
        self.size
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        self.timing.ready(now.instant) && (self.dirty || self.is_animated())
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        self.surface.clear();
        self.surface.paste_cropped(&self.strip, 0, self.offset, self.size.width, self.size.height, 0, 0);
        self.painted_offset = self.offset;

        if self.is_animated() {
            self.advance();
        }
        self.dirty = false;
        self.timing.mark_painted(now.instant);
        &self.surface
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::*;

    const TICK: Duration = Duration::from_millis(20);

    fn rows(names: &[&str]) -> Vec<ListItem> {
        names
            .iter()
            .map(|n| ListItem::new(vec![ListCell::new(*n, 0, 60)]))
            .collect()
    }

    fn list(names: &[&str], pause: u32) -> PagingList {
        PagingList::new(60, 20, 10, font())
            .with_interval(TICK)
            .with_scroll(1, pause)
            .with_items(rows(names))
    }

    fn offsets(l: &mut PagingList, ticker: &mut Ticker, n: usize) -> Vec<u32> {
        (0..n)
            .map(|_| {
                let now = ticker.next();
                assert!(l.is_due(&now));
                l.paint(&now);
                l.painted_offset()
            })
            .collect()
    }

    #[test]
    fn offsets_are_periodic() {
        let mut ticker = Ticker::new(TICK);
        let mut l = list(&["2nd", "3rd", "4th"], 0);
        assert_eq!(l.period(), 30);

        let seq = offsets(&mut l, &mut ticker, 90);
        for (i, off) in seq.iter().enumerate() {
            assert_eq!(*off as usize, i % 30);
        }
    }

    #[test]
    fn pauses_on_row_boundaries() {
        let mut ticker = Ticker::new(TICK);
        let mut l = list(&["2nd", "3rd", "4th"], 2);

        let seq = offsets(&mut l, &mut ticker, 16);
        assert_eq!(&seq[..3], &[0, 0, 0]);
        assert_eq!(&seq[3..12], &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(&seq[12..16], &[10, 10, 10, 11]);
    }

    #[test]
    fn wrap_is_seamless() {
        let mut ticker = Ticker::new(TICK);
        let mut l = list(&["2nd", "3rd", "4th"], 0);

        let now = ticker.next();
        let first = l.paint(&now).clone();
        offsets(&mut l, &mut ticker, 29);
        let now = ticker.next();
        assert_eq!(l.paint(&now), &first);
        assert_eq!(l.painted_offset(), 0);
    }

    #[test]
    fn update_resets_to_first_row() {
        let mut ticker = Ticker::new(TICK);
        let mut l = list(&["2nd", "3rd", "4th"], 0);
        offsets(&mut l, &mut ticker, 15);

        assert!(!l.update_items(rows(&["2nd", "3rd", "4th"])));
        assert_eq!(l.renders(), 1);

        assert!(l.update_items(rows(&["5th", "6th", "7th"])));
        assert_eq!(l.renders(), 2);
        assert_eq!(offsets(&mut l, &mut ticker, 1), [0]);
    }

    #[test]
    fn short_list_is_static() {
        let mut ticker = Ticker::new(TICK);
        let mut l = list(&["2nd"], 0);
        assert!(!l.is_animated());

        let now = ticker.next();
        assert!(l.is_due(&now));
        assert!(!l.paint(&now).is_blank());
        assert!(!l.is_due(&ticker.next()));

        let mut empty = list(&[], 0);
        let now = ticker.next();
        assert!(empty.is_due(&now));
        assert!(empty.paint(&now).is_blank());
    }
}
