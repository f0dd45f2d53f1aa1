use crate::region::{HAlign, Region, RegionTiming};
use crate::render::font::Font;
use crate::render::{Bitmap, SurfaceSize};
use crate::tick::FrameTime;
use crate::widgets::Marquee;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarouselPhase {
    /// No messages; nothing to animate
    Idle,
    /// Outgoing message moves up and out while the next one moves in
    Transition { step: u32 },
    /// Current message is held still
    Holding { since: Instant },
    /// Current message is too wide and scrolls horizontally once
    Scrolling(Marquee),
}

/// Rotates through a list of messages, one at a time.
///
/// Each message slides in from below, is held for `hold`, scrolls once if it
/// is wider than the region, then the next message slides in. A single
/// message is never transitioned into itself; it goes back to holding.
#[derive(Debug)]
pub struct Carousel {
    size: SurfaceSize,
    font: Arc<dyn Font>,
    align: HAlign,
    messages: Vec<String>,
    /// One rendered image per message
    images: Vec<Bitmap>,
    renders: u64,
    pointer: usize,
    phase: CarouselPhase,
    current: Bitmap,
    next: Bitmap,
    timing: RegionTiming,
    hold: Duration,
    step: u32,
    rotations: u64,
    dirty: bool,
    surface: Bitmap,
}

impl Carousel {
    pub fn new(width: u32, height: u32, font: Arc<dyn Font>) -> Self {
        let mut carousel = Self {
            size: SurfaceSize::new(width, height),
            font,
            align: HAlign::Left,
            messages: Vec::new(),
            images: Vec::new(),
            renders: 0,
            pointer: 0,
            phase: CarouselPhase::Idle,
            current: Bitmap::new(0, 0),
            next: Bitmap::new(0, 0),
            timing: RegionTiming::new(Duration::from_millis(20)),
            hold: Duration::from_secs(4),
            step: 1,
            rotations: 0,
            dirty: true,
            surface: Bitmap::new(width, height),
        };
        carousel.restart();
        carousel
    }

    pub fn with_align(mut self, align: HAlign) -> Self {
        self.align = align;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.timing = RegionTiming::new(interval);
        self
    }

    pub fn with_hold(mut self, hold: Duration) -> Self {
        self.hold = hold;
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step.max(1);
        self
    }

    pub fn with_messages(mut self, messages: &[String]) -> Self {
        self.update_messages(messages);
        self
    }

    /// Replaces the message list. An equal list leaves the rotation alone;
    /// any other list starts over with the first message.
    pub fn update_messages(&mut self, messages: &[String]) -> bool {
        if self.messages == messages {
            return false;
        }
        self.messages = messages.to_vec();
        self.images = self.messages.iter().map(|m| self.font.rasterize(m)).collect();
        self.renders += self.images.len() as u64;
        self.restart();
        true
    }

    /// Starts the rotation over from the first message, sliding in from a
    /// blank region.
    pub fn restart(&mut self) {
        self.pointer = 0;
        self.current = Bitmap::new(0, 0);
        self.dirty = true;
        match self.images.first() {
            Some(first) => {
                self.next = first.clone();
                self.phase = CarouselPhase::Transition { step: 0 };
            }
            None => {
                self.next = Bitmap::new(0, 0);
                self.phase = CarouselPhase::Idle;
            }
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn phase(&self) -> &CarouselPhase {
        &self.phase
    }

    /// Messages rasterized since creation.
    pub fn renders(&self) -> u64 {
        self.renders
    }

    /// Completed passes over the whole message list.
    pub fn rotations(&self) -> u64 {
        self.rotations
    }

    fn hold_expired(&self, now: Instant) -> bool {
        matches!(self.phase, CarouselPhase::Holding { since } if now.saturating_duration_since(since) >= self.hold)
    }

    /// The current message has been shown in full.
    fn message_done(&mut self, now: Instant) {
        if self.pointer + 1 >= self.messages.len() {
            self.rotations += 1;
        }

        if self.messages.len() > 1 {
            self.pointer = (self.pointer + 1) % self.messages.len();
            self.next = self.images[self.pointer].clone();
            self.phase = CarouselPhase::Transition { step: 0 };
        } else {
            self.phase = CarouselPhase::Holding { since: now };
        }
    }

    fn end_hold(&mut self, now: Instant) {
        let overflow = self.current.width().saturating_sub(self.size.width);
        if overflow > 0 {
            self.phase = CarouselPhase::Scrolling(Marquee::new(overflow, self.step, 0));
        } else {
            self.message_done(now);
        }
    }

    fn x_for(&self, image: &Bitmap) -> i32 {
        self.align.offset(image.width(), self.size.width) as i32
    }

    fn draw_transition(&mut self, step: u32) {
        self.surface.clear();
        let height = self.size.height as i32;
        let step = step as i32;
        let (cx, nx) = (self.x_for(&self.current), self.x_for(&self.next));
        self.surface.paste(&self.current, cx, -step);
        self.surface.paste(&self.next, nx, height - step);
    }

    fn draw_current(&mut self, cursor: u32) {
        self.surface.clear();
        if cursor > 0 {
            self.surface.paste_cropped(&self.current, cursor, 0, self.size.width, self.size.height, 0, 0);
        } else {
            let x = self.x_for(&self.current);
            self.surface.paste(&self.current, x, 0);
        }
    }
}

impl Region for Carousel {
    fn bounds(&self) -> SurfaceSize {
        self.size
    }

    fn is_due(&self, now: &FrameTime) -> bool {
        if !self.timing.ready(now.instant) {
            return false;
        }
        match self.phase {
            CarouselPhase::Idle => self.dirty,
            CarouselPhase::Transition { .. } | CarouselPhase::Scrolling(_) => true,
            CarouselPhase::Holding { .. } => self.dirty || self.hold_expired(now.instant),
        }
    }

    fn paint(&mut self, now: &FrameTime) -> &Bitmap {
        let at = now.instant;
        if self.hold_expired(at) {
            self.end_hold(at);
        }

        match self.phase.clone() {
            CarouselPhase::Idle => self.surface.clear(),
            CarouselPhase::Transition { step } => {
                let step = (step + self.step).min(self.size.height);
                self.draw_transition(step);
                if step >= self.size.height {
                    self.current = std::mem::replace(&mut self.next, Bitmap::new(0, 0));
                    self.phase = CarouselPhase::Holding { since: at };
                } else {
                    self.phase = CarouselPhase::Transition { step };
                }
            }
            CarouselPhase::Holding { .. } => self.draw_current(0),
            CarouselPhase::Scrolling(mut marquee) => {
                self.draw_current(marquee.cursor());
                if marquee.advance() {
                    self.message_done(at);
                } else {
                    self.phase = CarouselPhase::Scrolling(marquee);
                }
            }
        }

        self.dirty = false;
        self.timing.mark_painted(at);
        &self.surface
    }

    fn invalidate(&mut self) {
        self.dirty = true;
    }
}
