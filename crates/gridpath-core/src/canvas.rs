//! The [`Canvas`] a model draws into, and the [`Frame`] diff a driver
//! flushes.
//!
//! Unlike a board cell, a [`Glyph`] carries no search meaning: it is a
//! character plus a style at one screen position.

use crate::geom::{Point, Range};
use crate::style::Style;

/// A styled character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Glyph {
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// A fixed-size screen buffer of [`Glyph`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    glyphs: Vec<Glyph>,
    width: i32,
    height: i32,
}

impl Canvas {
    /// Create a canvas of the given size, filled with blank glyphs.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            glyphs: vec![Glyph::default(); (width as usize) * (height as usize)],
            width,
            height,
        }
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if self.bounds().contains(p) {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// Glyph at `p`, or a blank glyph outside the canvas.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p).map(|i| self.glyphs[i]).unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op outside the canvas.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    /// Fill every position in `r` (clipped to the canvas) with `glyph`.
    pub fn fill_range(&mut self, r: Range, glyph: Glyph) {
        for p in self.bounds().intersect(r) {
            self.set(p, glyph);
        }
    }

    /// Fill the whole canvas.
    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Write `text` left to right starting at `at`, clipped at the right
    /// edge. Returns the number of glyphs written.
    pub fn text(&mut self, at: Point, text: &str, style: Style) -> usize {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let p = at.shift(i as i32, 0);
            if p.x >= self.width {
                break;
            }
            if self.index(p).is_some() {
                self.set(p, Glyph::new(ch, style));
                written += 1;
            }
        }
        written
    }

    /// The positions whose glyph differs from `prev`. Both canvases must
    /// have the same size; positions outside `prev` count as changed.
    pub fn diff(&self, prev: &Canvas) -> Frame {
        let mut glyphs = Vec::new();
        for p in self.bounds() {
            let cur = self.at(p);
            if !prev.bounds().contains(p) || prev.at(p) != cur {
                glyphs.push(FrameGlyph { glyph: cur, pos: p });
            }
        }
        Frame {
            glyphs,
            width: self.width,
            height: self.height,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// A single changed position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameGlyph {
    pub glyph: Glyph,
    pub pos: Point,
}

/// The set of changes between two consecutive canvases.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub glyphs: Vec<FrameGlyph>,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
