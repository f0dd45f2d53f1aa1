//! The frame compositor.
//!
//! Owns the device frame, every widget created by the scenes and the ordered
//! list of widgets currently on screen. A refresh repaints whatever is due,
//! pastes it into the frame and flushes the whole frame to the sink.

use crate::errors::BoardError;
use crate::region::Region;
use crate::render::sink::FrameSink;
use crate::render::{Frame, SurfaceSize};
use crate::tick::{FrameTime, RefreshStats};
use crate::widgets::Widget;

/// Handle to a widget owned by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u32);

impl RegionId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Position of a region's top-left corner within the frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug)]
pub struct FrameCompositor {
    frame: Frame,
    widgets: Vec<Widget>,
    active: Vec<(RegionId, Offset)>,
    frames_flushed: u64,
}

impl FrameCompositor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: Frame::new(width, height),
            widgets: Vec::new(),
            active: Vec::new(),
            frames_flushed: 0,
        }
    }

    /// Takes ownership of a widget. It is not on screen until [`add`](Self::add).
    pub fn register(&mut self, widget: impl Into<Widget>) -> RegionId {
        let id = RegionId(self.widgets.len() as u32);
        self.widgets.push(widget.into());
        id
    }

    pub fn widget(&self, id: RegionId) -> Option<&Widget> {
        self.widgets.get(id.0 as usize)
    }

    pub fn widget_mut(&mut self, id: RegionId) -> Option<&mut Widget> {
        self.widgets.get_mut(id.0 as usize)
    }

    /// Puts a region on screen at `offset`. Adding it again at the same
    /// offset is a no-op.
    pub fn add(&mut self, id: RegionId, offset: Offset) {
        if self.is_active(id, offset) {
            return;
        }
        let Some(widget) = self.widgets.get_mut(id.0 as usize) else {
            log::warn!("Compositor: add of unknown region {:?}", id);
            return;
        };
        widget.invalidate();
        self.active.push((id, offset));
    }

    /// Takes a region off screen and blanks the area it covered. Removing
    /// a region that is not on screen is a no-op.
    pub fn remove(&mut self, id: RegionId, offset: Offset) {
        let Some(pos) = self.active.iter().position(|e| *e == (id, offset)) else {
            return;
        };
        self.active.remove(pos);

        if let Some(widget) = self.widgets.get(id.0 as usize) {
            let SurfaceSize { width, height } = widget.bounds();
            self.frame.fill_rect(offset.x, offset.y, width, height, Frame::BLANK);
        }
    }

    pub fn is_active(&self, id: RegionId, offset: Offset) -> bool {
        self.active.contains(&(id, offset))
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Repaints every due region and flushes the frame to `sink`. The frame
    /// is flushed exactly once per call, even when nothing was repainted.
    pub fn refresh(&mut self, now: &FrameTime, sink: &mut dyn FrameSink) -> Result<RefreshStats, BoardError> {
        let mut repainted = 0;

        for (id, offset) in &self.active {
            let Some(widget) = self.widgets.get_mut(id.0 as usize) else {
                continue;
            };
            if !widget.is_due(now) {
                continue;
            }
            let surface = widget.paint(now);
            self.frame.paste(surface, offset.x, offset.y);
            repainted += 1;
        }

        sink.submit_frame(&self.frame)?;
        self.frames_flushed += 1;

        Ok(RefreshStats {
            repainted,
            active: self.active.len(),
        })
    }

    /// Recreates the frame after a device re-init and repaints everything
    /// on screen on the next refresh.
    pub fn reinit(&mut self, width: u32, height: u32) {
        log::debug!("Compositor: reinit frame to {}x{}", width, height);
        self.frame = Frame::new(width, height);
        for (id, _) in &self.active {
            if let Some(widget) = self.widgets.get_mut(id.0 as usize) {
                widget.invalidate();
            }
        }
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frames_flushed(&self) -> u64 {
        self.frames_flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sinks::memory::MemorySink;
    use crate::render::sinks::null::NullSink;
    use crate::widgets::testing::*;
    use crate::widgets::StaticText;
    use std::time::Duration;

    fn label(text: &str) -> StaticText {
        StaticText::new(30, 10, font()).with_text(text)
    }

    #[test]
    fn flushes_once_per_refresh() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let mut sink = NullSink::new();

        let id = comp.register(label("abc"));
        comp.add(id, Offset::new(0, 0));

        let stats = comp.refresh(&ticker.next(), &mut sink).unwrap();
        assert_eq!(stats, RefreshStats { repainted: 1, active: 1 });

        let stats = comp.refresh(&ticker.next(), &mut sink).unwrap();
        assert_eq!(stats.repainted, 0);
        assert_eq!(sink.frame_id(), 2);
        assert_eq!(comp.frames_flushed(), 2);
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let mut sink = NullSink::new();
        let id = comp.register(label("abc"));

        comp.add(id, Offset::new(2, 2));
        comp.add(id, Offset::new(2, 2));
        assert_eq!(comp.active_count(), 1);

        comp.refresh(&ticker.next(), &mut sink).unwrap();
        assert!(!comp.frame().is_blank());

        comp.remove(id, Offset::new(2, 2));
        comp.remove(id, Offset::new(2, 2));
        assert_eq!(comp.active_count(), 0);
        assert!(comp.frame().is_blank());
    }

    #[test]
    fn re_added_region_repaints() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let mut sink = NullSink::new();
        let id = comp.register(label("abc"));

        comp.add(id, Offset::new(0, 0));
        comp.refresh(&ticker.next(), &mut sink).unwrap();
        comp.remove(id, Offset::new(0, 0));
        comp.add(id, Offset::new(0, 0));

        let stats = comp.refresh(&ticker.next(), &mut sink).unwrap();
        assert_eq!(stats.repainted, 1);
        assert!(!comp.frame().is_blank());
    }

    #[test]
    fn paints_at_offset() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let sink = MemorySink::new();
        let id = comp.register(label("|"));
        comp.add(id, Offset::new(40, 20));

        comp.refresh(&ticker.next(), &mut sink.clone()).unwrap();
        let frame = sink.recording().last_frame.clone().unwrap();
        assert!((0..40).all(|x| (0..32).all(|y| frame.get(x, y) == Some(Frame::BLANK))));
        assert!(!frame.is_blank());
    }

    #[test]
    fn sink_errors_are_returned() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let mut sink = MemorySink::new();
        sink.fail_next_submit("bus error");

        let err = comp.refresh(&ticker.next(), &mut sink).unwrap_err();
        assert!(matches!(err, BoardError::Sink(_)));
        assert!(comp.refresh(&ticker.next(), &mut sink).is_ok());
    }

    #[test]
    fn reinit_invalidates_active_regions() {
        let mut ticker = Ticker::new(Duration::from_millis(20));
        let mut comp = FrameCompositor::new(64, 32);
        let mut sink = NullSink::new();
        let id = comp.register(label("abc"));
        comp.add(id, Offset::new(0, 0));
        comp.refresh(&ticker.next(), &mut sink).unwrap();

        comp.reinit(128, 32);
        assert_eq!(comp.frame().width(), 128);
        assert!(comp.frame().is_blank());
        assert_eq!(comp.refresh(&ticker.next(), &mut sink).unwrap().repainted, 1);
    }
}
