//! The concrete regions a scene is built from.
//!
//! [`Widget`] is a closed set: the compositor stores widgets by value and
//! dispatches through the [`Region`] impl below, while scenes reach the
//! concrete type through the `as_*_mut` accessors to push new content.

mod carousel;
mod clock;
mod paging_list;
mod scroll_text;
mod static_text;

pub use carousel::{Carousel, CarouselPhase};
pub use clock::Clock;
pub use paging_list::{ListCell, ListItem, PagingList};
pub use scroll_text::{ScrollState, ScrollText};
pub use static_text::StaticText;

use crate::region::Region;
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use std::sync::Arc;
use std::time::Instant;

/// A string and its rasterized image. The image is only rebuilt when the
/// string changes; animation works on the cached image.
#[derive(Debug, Clone)]
pub struct TextCache {
    font: Arc<dyn Font>,
    text: String,
    bitmap: Bitmap,
    rendered_at: Option<Instant>,
    renders: u64,
}

impl TextCache {
    pub fn new(font: Arc<dyn Font>) -> Self {
        Self {
            font,
            text: String::new(),
            bitmap: Bitmap::new(0, 0),
            rendered_at: None,
            renders: 0,
        }
    }

    /// Re-rasterizes when `text` differs from the cached string. Returns
    /// whether anything changed.
    pub fn update(&mut self, text: &str) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text.to_string();
        self.bitmap = self.font.rasterize(text);
        self.rendered_at = Some(Instant::now());
        self.renders += 1;
        true
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn rendered_at(&self) -> Option<Instant> {
        self.rendered_at
    }

    /// Number of rasterizations so far.
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

/// Horizontal scroll cursor with a pause at the start of every pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marquee {
    cursor: u32,
    max: u32,
    step: u32,
    pause_ticks: u32,
    paused: u32,
}

impl Marquee {
    /// `max` is the last cursor position (content width minus view width).
    pub fn new(max: u32, step: u32, pause_ticks: u32) -> Self {
        Self {
            cursor: 0,
            max,
            step: step.max(1),
            pause_ticks,
            paused: 0,
        }
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn is_paused(&self) -> bool {
        self.cursor == 0 && self.paused < self.pause_ticks
    }

    /// Moves one step after a paint. Returns true when the pass that just
    /// showed the right edge is complete and the cursor went back to 0.
    pub fn advance(&mut self) -> bool {
        if self.is_paused() {
            self.paused += 1;
            return false;
        }
        if self.cursor >= self.max {
            self.cursor = 0;
            self.paused = 0;
            return true;
        }
        self.cursor = (self.cursor + self.step).min(self.max);
        false
    }
}

#[derive(Debug)]
pub enum Widget {
    StaticText(StaticText),
    ScrollText(ScrollText),
    Carousel(Carousel),
    PagingList(PagingList),
    Clock(Clock),
}

macro_rules! dispatch {
    ($self:ident, $w:ident => $e:expr) => {
        match $self {
            Widget::StaticText($w) => $e,
            Widget::ScrollText($w) => $e,
            Widget::Carousel($w) => $e,
            Widget::PagingList($w) => $e,
            Widget::Clock($w) => $e,
        }
    };
}

impl Region for Widget {
    fn bounds(&self) -> SurfaceSize {
        dispatch!(self, w => w.bounds())
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        dispatch!(self, w => w.is_due(now))
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        dispatch!(self, w => w.paint(now))
    }

    fn invalidate(&mut self) {
        dispatch!(self, w => w.invalidate())
    }
}

macro_rules! variant_access {
    ($variant:ident, $ty:ty, $as_ref:ident, $as_mut:ident) => {
        impl Widget {
            pub fn $as_ref(&self) -> Option<&$ty> {
                match self {
                    Widget::$variant(w) => Some(w),
                    _ => None,
                }
            }

            pub fn $as_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Widget::$variant(w) => Some(w),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Widget {
            fn from(w: $ty) -> Self {
                Widget::$variant(w)
            }
        }
    };
}

variant_access!(StaticText, StaticText, as_static_text, as_static_text_mut);
variant_access!(ScrollText, ScrollText, as_scroll_text, as_scroll_text_mut);
variant_access!(Carousel, Carousel, as_carousel, as_carousel_mut);
variant_access!(PagingList, PagingList, as_paging_list, as_paging_list_mut);
variant_access!(Clock, Clock, as_clock, as_clock_mut);

impl Widget {
    /// Replaces the text of a text-bearing widget. Returns false for widgets
    /// that carry no single string.
    pub fn set_text(&mut self, text: &str) -> bool {
        match self {
            Widget::StaticText(w) => {
                w.update_text(text);
                true
            }
            Widget::ScrollText(w) => {
                w.update_text(text);
                true
            }
            _ => false,
        }
    }
}
