//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on terminals, files, or clocks, making it:
//!
//! - **Deterministic**: Same seed and same inputs produce identical games
//! - **Testable**: Unit tests for every rule
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`board`]: Resizable game board with collision detection and line clearing
//! - [`game_state`]: Complete game state including active piece, scoring, timing
//! - [`pieces`]: Tetromino shape definitions and clockwise rotation
//! - [`rng`]: Uniform random piece generation
//! - [`scoring`]: Line-clear points and level progression
//! - [`snapshot`]: Plain-data capture/restore of a game
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every draw is independent, all 7 kinds equally likely
//! - **Plain rotation**: clockwise only, rejected if blocked (no wall kicks)
//! - **Immediate lock**: a piece locks on the first gravity step or soft drop
//!   that cannot move it down
//! - **Scoring**: 40/100/300/1200 points for 1-4 lines, times the level
//! - **Leveling**: every 10 lines on a level, gravity gets 50ms faster
//!   (never faster than 50ms)
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_types::{GameAction, Phase};
//!
//! // Create and start a game
//! let mut game = GameState::new(12345);
//! game.start();
//! assert_eq!(game.phase(), Phase::Running);
//!
//! // Apply game actions
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // A hard drop locks exactly one piece
//! assert!(game.board().cells().iter().filter(|c| c.is_some()).count() >= 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with the
//! elapsed time. Gravity moves the piece at most one row per call; leftover
//! time carries into the next call.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, BoardError};
pub use game_state::GameState;
pub use pieces::{base_shape, Piece, Shape, ShapeError};
pub use rng::{PieceRandomizer, SimpleRng};
pub use scoring::{calculate_line_score, Progress, ScoreResult};
pub use snapshot::{GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
