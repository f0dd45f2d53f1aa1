use crate::region::{blit_aligned, HAlign, Region, RegionTiming, VAlign};
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use crate::widgets::TextCache;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A label that only repaints when its text changes.
///
/// Some panels ghost when left static, so the label is also repainted once
/// `forced_refresh` has passed since the last paint.
#[derive(Debug)]
pub struct StaticText {
    size: SurfaceSize,
    cache: TextCache,
    h_align: HAlign,
    v_align: VAlign,
    timing: RegionTiming,
    forced_refresh: Option<Duration>,
    dirty: bool,
    surface: Bitmap,
}

impl StaticText {
    pub fn new(width: u32, height: u32, font: Arc<dyn Font>) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            cache: TextCache::new(font),
            h_align: HAlign::Left,
            v_align: VAlign::Top,
            timing: RegionTiming::new(Duration::from_millis(20)),
            forced_refresh: None,
            dirty: true,
            surface: Bitmap::new(width, height),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.update_text(text);
        self
    }

    pub fn with_align(mut self, h: HAlign, v: VAlign) -> Self {
        self.h_align = h;
        self.v_align = v;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.timing = RegionTiming::new(interval);
        self
    }

    pub fn with_forced_refresh(mut self, every: Duration) -> Self {
        self.forced_refresh = Some(every).filter(|d| !d.is_zero());
        self
    }

    /// Sets the text. Equal strings are ignored entirely.
    pub fn update_text(&mut self, text: &str) {
        if self.cache.update(text) {
            self.dirty = true;
        }
    }

    pub fn text(&self) -> &str {
        self.cache.text()
    }

    pub fn renders(&self) -> u64 {
        self.cache.renders()
    }

    pub fn rendered_at(&self) -> Option<Instant> {
        self.cache.rendered_at()
    }

    fn refresh_expired(&self, now: Instant) -> bool {
        match (self.forced_refresh, self.timing.since_painted(now)) {
            (Some(every), Some(elapsed)) => elapsed >= every,
            _ => false,
        }
    }
}

impl Region for StaticText {
    fn bounds(&self) -> SurfaceSize {
        self.size
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        self.timing.ready(now.instant) && (self.dirty || self.refresh_expired(now.instant))
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        blit_aligned(&mut self.surface, self.cache.bitmap(), self.h_align, self.v_align);
        self.dirty = false;
        self.timing.mark_painted(now.instant);
        &self.surface
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}
