//! Terminal game renderer module.
//!
//! A small, game-oriented rendering layer: [`GameView`] lays a game out
//! into a [`FrameBuffer`] (pure, testable), and [`TerminalRenderer`]
//! flushes frames to the terminal with crossterm, sending only what changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{FrameBuffer, Glyph, Style};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
