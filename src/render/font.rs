//! Text rasterization.
//!
//! Widgets only talk to the [`Font`] trait. [`MonoFontFace`] implements it on
//! top of the embedded-graphics bitmap fonts, which is what the stock
//! [`FontSet`] uses.

use crate::render::Bitmap;
use embedded_graphics::{
    mono_font::{ascii, MonoFont, MonoTextStyle},
    pixelcolor::Gray8,
    prelude::*,
    text::{renderer::TextRenderer, Baseline, Text},
};
use std::fmt;
use std::sync::Arc;

pub trait Font: Send + Sync + fmt::Debug {
    /// Width and height of `text` when rasterized. Lines are split on `\n`;
    /// the width is the widest line.
    fn measure(&self, text: &str) -> (u32, u32);

    /// Renders `text` into a bitmap exactly [`Font::measure`] in size.
    fn rasterize(&self, text: &str) -> Bitmap;

    /// Height of a single line of text.
    fn line_height(&self) -> u32;
}

/// A fixed-width bitmap font.
#[derive(Clone)]
pub struct MonoFontFace {
    name: &'static str,
    font: &'static MonoFont<'static>,
    line_spacing: u32,
}

impl MonoFontFace {
    pub fn new(name: &'static str, font: &'static MonoFont<'static>) -> Self {
        Self { name, font, line_spacing: 0 }
    }

    /// Extra pixels between lines of multi-line text.
    pub fn with_line_spacing(mut self, spacing: u32) -> Self {
        self.line_spacing = spacing;
        self
    }

    fn style(&self) -> MonoTextStyle<'static, Gray8> {
        MonoTextStyle::new(self.font, Gray8::WHITE)
    }

    fn line_width(&self, line: &str) -> u32 {
        self.style()
            .measure_string(line, Point::zero(), Baseline::Top)
            .bounding_box
            .size
            .width
    }
}

impl fmt::Debug for MonoFontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonoFontFace")
            .field("name", &self.name)
            .field("cell", &self.font.character_size)
            .field("line_spacing", &self.line_spacing)
            .finish()
    }
}

impl Font for MonoFontFace {
    fn measure(&self, text: &str) -> (u32, u32) {
        if text.is_empty() {
            return (0, 0);
        }
        let lines: Vec<&str> = text.split('\n').collect();
        let width = lines.iter().map(|l| self.line_width(l)).max().unwrap_or(0);
        let n = lines.len() as u32;
        let height = n * self.line_height() + (n - 1) * self.line_spacing;
        (width, height)
    }

    fn rasterize(&self, text: &str) -> Bitmap {
        let (width, height) = self.measure(text);
        let mut bitmap = Bitmap::new(width, height);
        let style = self.style();
        let advance = (self.line_height() + self.line_spacing) as i32;

        for (i, line) in text.split('\n').enumerate() {
            let origin = Point::new(0, i as i32 * advance);
            // Drawing into a Bitmap is infallible.
            let _ = Text::with_baseline(line, origin, style, Baseline::Top).draw(&mut bitmap);
        }
        bitmap
    }

    fn line_height(&self) -> u32 {
        self.font.character_size.height
    }
}

/// The faces a board draws with.
#[derive(Clone, Debug)]
pub struct FontSet {
    pub regular: Arc<dyn Font>,
    pub bold: Arc<dyn Font>,
    /// Seconds of the clock
    pub bold_tall: Arc<dyn Font>,
    /// Hours and minutes of the clock
    pub bold_large: Arc<dyn Font>,
}

impl Default for FontSet {
    fn default() -> Self {
        log::debug!("Loading built-in mono fonts");
        Self {
            regular: Arc::new(MonoFontFace::new("regular", &ascii::FONT_6X10).with_line_spacing(2)),
            bold: Arc::new(MonoFontFace::new("bold", &ascii::FONT_6X13_BOLD)),
            bold_tall: Arc::new(MonoFontFace::new("bold_tall", &ascii::FONT_7X13_BOLD)),
            bold_large: Arc::new(MonoFontFace::new("bold_large", &ascii::FONT_9X15_BOLD)),
        }
    }
}

/// Greedy word wrap of `text` to `width` pixels. A single word wider than
/// `width` overflows on a line of its own.
pub fn wordwrap(font: &dyn Font, width: u32, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{line} {word}")
        };

        if font.measure(&candidate).0 <= width {
            line = candidate;
        } else if line.is_empty() {
            lines.push(candidate);
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regular() -> MonoFontFace {
        MonoFontFace::new("regular", &ascii::FONT_6X10).with_line_spacing(2)
    }

    #[test]
    fn measure_single_and_multi_line() {
        let f = regular();
        assert_eq!(f.measure(""), (0, 0));
        assert_eq!(f.measure("abcd"), (24, 10));
        assert_eq!(f.measure("ab\nabcdef\nx"), (36, 34));
    }

    #[test]
    fn rasterize_matches_measure() {
        let f = regular();
        let b = f.rasterize("Hello\nworld!");
        assert_eq!((b.width(), b.height()), f.measure("Hello\nworld!"));
        assert!(!b.is_blank());
        assert!(f.rasterize(" ").is_blank());
    }

    #[test]
    fn wordwrap_greedy() {
        let f = regular();
        // 10 characters per line
        let lines = wordwrap(&f, 60, "the quick brown fox jumps over");
        assert_eq!(lines, ["the quick", "brown fox", "jumps over"]);
    }

    #[test]
    fn wordwrap_overflows_long_words() {
        let f = regular();
        let lines = wordwrap(&f, 30, "a abcdefghij b");
        assert_eq!(lines, ["a", "abcdefghij", "b"]);

        let lines = wordwrap(&f, 30, "abcdefghij");
        assert_eq!(lines, ["abcdefghij"]);
        assert!(wordwrap(&f, 30, "   ").is_empty());
    }
}
