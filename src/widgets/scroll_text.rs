use crate::region::{blit_aligned, HAlign, Region, RegionTiming, VAlign};
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use crate::widgets::{Marquee, TextCache};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    /// Text narrower than the region, painted statically
    Fits,
    /// Text wider than the region, scrolled left in passes
    Scrolling,
}

/// Single-line marquee. Text that fits is painted like a [`StaticText`];
/// wider text scrolls right-to-left, pausing at the start of every pass.
/// Text that fits is also repainted once `forced_refresh` has passed since
/// the last paint.
///
/// [`StaticText`]: crate::widgets::StaticText
#[derive(Debug)]
pub struct ScrollText {
    size: SurfaceSize,
    cache: TextCache,
    align: HAlign,
    timing: RegionTiming,
    marquee: Option<Marquee>,
    step: u32,
    pause_ticks: u32,
    forced_refresh: Option<Duration>,
    dirty: bool,
    painted_offset: u32,
    surface: Bitmap,
}

impl ScrollText {
    pub fn new(width: u32, height: u32, font: Arc<dyn Font>) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            cache: TextCache::new(font),
            align: HAlign::Left,
            timing: RegionTiming::new(Duration::from_millis(20)),
            marquee: None,
            step: 1,
            pause_ticks: 80,
            forced_refresh: None,
            dirty: true,
            painted_offset: 0,
            surface: Bitmap::new(width, height),
        }
    }

    pub fn with_align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.timing = RegionTiming::new(interval);
        self
    }

    /// Pixels per step and steps to hold at the start of a pass.
    pub fn with_scroll(mut self, step: u32, pause_ticks: u32) -> Self {
        self.step = step;
        self.pause_ticks = pause_ticks;
        self.restart();
        self
    }

    pub fn with_forced_refresh(mut self, every: Duration) -> Self {
        self.forced_refresh = Some(every).filter(|d| !d.is_zero());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.update_text(text);
        self
    }

    /// Sets the text. A different string restarts scrolling from the left
    /// edge; an equal one is ignored.
    pub fn update_text(&mut self, text: &str) {
        if self.cache.update(text) {
            self.restart();
        }
    }

    fn restart(&mut self) {
        let overflow = self.cache.bitmap().width().saturating_sub(self.size.width);
        self.marquee = (overflow > 0).then(|| Marquee::new(overflow, self.step, self.pause_ticks));
        self.dirty = true;
    }

    pub fn state(&self) -> ScrollState {
        if self.marquee.is_some() {
            ScrollState::Scrolling
        } else {
            ScrollState::Fits
        }
    }

    pub fn text(&self) -> &str {
        self.cache.text()
    }

    pub fn renders(&self) -> u64 {
        self.cache.renders()
    }

    /// Scroll position used by the last paint.
    pub fn painted_offset(&self) -> u32 {
        self.painted_offset
    }

    fn refresh_expired(&self, now: Instant) -> bool {
        match (self.forced_refresh, self.timing.since_painted(now)) {
            (Some(every), Some(elapsed)) => elapsed >= every,
            _ => false,
        }
    }
}

impl Region for ScrollText {
    fn bounds(&self) -> SurfaceSize {
        self.size
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        self.timing.ready(now.instant) && (self.marquee.is_some() || self.dirty || self.refresh_expired(now.instant))
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        match self.marquee.as_mut() {
            Some(marquee) => {
                let cursor = marquee.cursor();
                self.surface.clear();
                self.surface.paste_cropped(
                    self.cache.bitmap(),
                    cursor,
                    0,
                    self.size.width,
                    self.size.height,
                    0,
                    0,
                );
                self.painted_offset = cursor;
                marquee.advance();
            }
            None => {
                blit_aligned(&mut self.surface, self.cache.bitmap(), self.align, VAlign::Top);
                self.painted_offset = 0;
            }
        }
        self.dirty = false;
        self.timing.mark_painted(now.instant);
        &self.surface
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}
