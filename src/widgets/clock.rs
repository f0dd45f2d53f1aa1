use crate::region::{Region, RegionTiming};
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use crate::widgets::TextCache;
use std::sync::Arc;
use std::time::Duration;

/// Centered wall clock: "HH:MM" in a large face followed by ":SS" in a
/// smaller one, bottom-aligned.
#[derive(Debug)]
pub struct Clock {
    size: SurfaceSize,
    hours_minutes: TextCache,
    seconds: TextCache,
    shown: Option<(u8, u8, u8)>,
    timing: RegionTiming,
    surface: Bitmap,
}

impl Clock {
    pub fn new(width: u32, height: u32, large: Arc<dyn Font>, small: Arc<dyn Font>) -> Self {
        Self {
            size: SurfaceSize::new(width, height),
            hours_minutes: TextCache::new(large),
            seconds: TextCache::new(small),
            shown: None,
            timing: RegionTiming::new(Duration::from_millis(100)),
            surface: Bitmap::new(width, height),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.timing = RegionTiming::new(interval);
        self
    }

    /// Text currently on the clock, e.g. "09:41:07".
    pub fn text(&self) -> String {
        format!("{}{}", self.hours_minutes.text(), self.seconds.text())
    }

    pub fn renders(&self) -> u64 {
        self.hours_minutes.renders() + self.seconds.renders()
    }
}

impl Region for Clock {
    fn bounds(&self) -> SurfaceSize {
        self.size
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        self.timing.ready(now.instant) && self.shown != Some(now.time_of_day.as_hms())
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        let (h, m, s) = now.time_of_day.as_hms();
        self.hours_minutes.update(&format!("{h:02}:{m:02}"));
        self.seconds.update(&format!(":{s:02}"));

        let large = self.hours_minutes.bitmap();
        let small = self.seconds.bitmap();
        let margin = self.size.width.saturating_sub(large.width() + small.width()) / 2;
        let small_y = large.height().saturating_sub(small.height());

        self.surface.clear();
        self.surface.paste(large, margin as i32, 0);
        self.surface.paste(small, (margin + large.width()) as i32, small_y as i32);

        self.shown = Some((h, m, s));
        self.timing.mark_painted(now.instant);
        &self.surface
    }

    fn invalidate(&mut self) {
        self.shown = None;
    }
}
