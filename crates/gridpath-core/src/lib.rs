//! **gridpath-core**: presentation plumbing for the gridpath visualizer.
//!
//! Screen geometry, styled glyphs, a diffing canvas, input messages, and the
//! Elm-architecture application loop that drives a [`Model`] through a
//! [`Driver`].

pub mod app;
pub mod canvas;
pub mod geom;
pub mod messages;
pub mod style;

pub use app::{App, AppConfig, Context, Driver, Effect, Model};
pub use canvas::{Canvas, Frame, FrameGlyph, Glyph};
pub use geom::{Point, Range};
pub use messages::{Key, MouseAction, Msg};
pub use style::{AttrMask, Color, Style};
