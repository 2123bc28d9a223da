//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. There is
//! no auto-repeat handling here; the terminal's own key repeat drives
//! held keys.

pub mod map;

pub use blockfall_types as types;

pub use map::{handle_key_event, should_quit};
