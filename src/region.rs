//! The capability every on-screen area implements.
//!
//! A region decides on its own whether it needs repainting ([`Region::is_due`])
//! and renders into a sub-buffer of its own size ([`Region::paint`]). The
//! compositor never looks inside a region beyond that.

use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use std::time::{Duration, Instant};

pub trait Region {
    fn bounds(&self) -> SurfaceSize;

    /// Whether the region wants to repaint at `now`.
    fn is_due(&self, now: &FrameTime) -> bool;

    /// Renders the region and advances its animation. Only called when
    /// [`Region::is_due`] returned true for the same `now`.
    fn paint(&mut self, now: &FrameTime) -> &Bitmap;

    /// Forces a repaint on the next due check (e.g. after the region was
    /// re-added to the frame).
    fn invalidate(&mut self);
}

/// Paint pacing shared by all widgets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionTiming {
    /// Minimum time between two paints
    interval: Duration,
    last_painted_at: Option<Instant>,
    next_allowed_paint_at: Option<Instant>,
}

impl RegionTiming {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_painted_at: None,
            next_allowed_paint_at: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True once the minimum interval and any enforced hold have passed.
    pub fn ready(&self, now: Instant) -> bool {
        self.next_allowed_paint_at.map_or(true, |t| now >= t)
    }

    pub fn mark_painted(&mut self, now: Instant) {
        self.last_painted_at = Some(now);
        let next = now + self.interval;
        self.next_allowed_paint_at = Some(match self.next_allowed_paint_at {
            Some(hold) if hold > next => hold,
            _ => next,
        });
    }

    /// Blocks painting until `t`.
    pub fn hold_until(&mut self, t: Instant) {
        self.next_allowed_paint_at = Some(t);
    }

    pub fn last_painted_at(&self) -> Option<Instant> {
        self.last_painted_at
    }

    /// Time since the last paint, `None` if never painted.
    pub fn since_painted(&self, now: Instant) -> Option<Duration> {
        self.last_painted_at.map(|t| now.saturating_duration_since(t))
    }

    pub fn reset(&mut self) {
        self.last_painted_at = None;
        self.next_allowed_paint_at = None;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl HAlign {
    /// Left edge of `content` pixels placed inside `bounds` pixels. Never
    /// negative: content wider than the bounds starts at 0.
    pub fn offset(self, content: u32, bounds: u32) -> u32 {
        let spare = bounds.saturating_sub(content);
        match self {
            HAlign::Left => 0,
            HAlign::Center => spare / 2,
            HAlign::Right => spare,
        }
    }
}

impl VAlign {
    pub fn offset(self, content: u32, bounds: u32) -> u32 {
        let spare = bounds.saturating_sub(content);
        match self {
            VAlign::Top => 0,
            VAlign::Middle => spare / 2,
            VAlign::Bottom => spare,
        }
    }
}

/// Pastes `content` into `target` at the aligned position. `target` is
/// cleared first.
pub fn blit_aligned(target: &mut Bitmap, content: &Bitmap, h: HAlign, v: VAlign) {
    target.clear();
    let x = h.offset(content.width(), target.width());
    let y = v.offset(content.height(), target.height());
    target.paste(content, x as i32, y as i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_floors_and_clamps() {
        assert_eq!(HAlign::Left.offset(10, 25), 0);
        assert_eq!(HAlign::Center.offset(10, 25), 7);
        assert_eq!(HAlign::Right.offset(10, 25), 15);
        assert_eq!(HAlign::Center.offset(40, 25), 0);
        assert_eq!(HAlign::Right.offset(40, 25), 0);

        assert_eq!(VAlign::Middle.offset(5, 12), 3);
        assert_eq!(VAlign::Bottom.offset(5, 12), 7);
        assert_eq!(VAlign::Bottom.offset(15, 12), 0);
    }

    #[test]
    fn timing_respects_interval_and_holds() {
        let t0 = Instant::now();
        let mut timing = RegionTiming::new(Duration::from_millis(20));
        assert!(timing.ready(t0));

        timing.mark_painted(t0);
        assert!(!timing.ready(t0 + Duration::from_millis(10)));
        assert!(timing.ready(t0 + Duration::from_millis(20)));

        timing.hold_until(t0 + Duration::from_secs(1));
        timing.mark_painted(t0 + Duration::from_millis(20));
        assert!(!timing.ready(t0 + Duration::from_millis(500)));
        assert!(timing.ready(t0 + Duration::from_secs(1)));
        assert_eq!(timing.since_painted(t0 + Duration::from_millis(30)), Some(Duration::from_millis(10)));
    }

    #[test]
    fn blit_aligned_places_content() {
        let mut content = Bitmap::new(2, 2);
        content.fill(Bitmap::LIT);
        let mut target = Bitmap::new(6, 4);
        target.fill(3);

        blit_aligned(&mut target, &content, HAlign::Right, VAlign::Middle);
        assert_eq!(target.lit_count(), 4);
        assert_eq!(target.get(4, 1), Some(Bitmap::LIT));
        assert_eq!(target.get(0, 0), Some(Bitmap::BLANK));
    }
}
