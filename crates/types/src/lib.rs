//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the simulation core, the
//! session/persistence layer and the terminal front end alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 20 rows (indexed 0-19, row 0 at the top)
//! - **Spawn position**: `x = width/2 - shape_cols/2`, `y = 0`
//!
//! # Game Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Driver frame interval (~60 FPS) |
//! | `BASE_FALL_MS` | 1000 | Gravity period at level 1 |
//! | `FALL_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_FALL_MS` | 50 | Fastest gravity period |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{EngineConfig, GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let parsed = PieceKind::from_str("t").unwrap();
//! assert_eq!(parsed, PieceKind::T);
//! assert_eq!(PieceKind::T.color().to_hex(), "#193A3E");
//!
//! let action = GameAction::from_str("hardDrop").unwrap();
//! assert_eq!(action, GameAction::HardDrop);
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.width, BOARD_WIDTH);
//! assert_eq!(config.height, BOARD_HEIGHT);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest playable board edge (the I piece is 4 cells long).
pub const MIN_BOARD_EDGE: u8 = 4;

/// Largest supported board edge.
pub const MAX_BOARD_EDGE: u8 = 40;

/// Driver frame interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity period at level 1 (1000ms = 1 row per second)
pub const BASE_FALL_MS: u32 = 1000;

/// Gravity period reduction applied on every level-up
pub const FALL_STEP_MS: u32 = 50;

/// Floor for the gravity period
pub const MIN_FALL_MS: u32 = 50;

/// Lines needed to advance one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Default autosave cadence (total lines multiple)
pub const AUTOSAVE_INTERVAL: u32 = 3;

/// Level a new game starts at
pub const START_LEVEL: u32 = 1;

/// Fixed storage identifier for the persisted game
pub const SAVE_KEY: &str = "blockfall-game-state";

/// Line clear scoring table, indexed by rows cleared in one lock.
///
/// - 1 line: 40 points
/// - 2 lines: 100 points
/// - 3 lines: 300 points
/// - 4 lines: 1200 points
///
/// Points are multiplied by the current level (which starts at 1).
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// The seven tetromino piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds, in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    /// Fixed display color of this kind.
    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0xA2, 0xB5, 0xC3),
            PieceKind::O => Rgb::new(0x5D, 0x53, 0x37),
            PieceKind::T => Rgb::new(0x19, 0x3A, 0x3E),
            PieceKind::S => Rgb::new(0x4D, 0x75, 0x7B),
            PieceKind::Z => Rgb::new(0xAD, 0xA7, 0x99),
            PieceKind::J => Rgb::new(0x7A, 0x8B, 0x99),
            PieceKind::L => Rgb::new(0x8C, 0x9A, 0x7E),
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#RRGGBB` form, uppercase.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Locked cell, colored by the piece kind
pub type Cell = Option<PieceKind>;

/// Commands the driver can send to the engine
///
/// Gravity is not a command: it is driven by `GameState::tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Move piece one row down, locking it if it cannot fall
    SoftDrop,
    /// Drop piece to its lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Toggle pause state
    Pause,
    /// Discard the current game and start a fresh one
    NewGame,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("ROTATE"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotate" => Some(GameAction::Rotate),
            "pause" => Some(GameAction::Pause),
            "newgame" => Some(GameAction::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::Pause => "pause",
            GameAction::NewGame => "newGame",
        }
    }
}

/// Lifecycle phase of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No piece spawned yet
    Ready,
    Running,
    Paused,
    /// Spawn was blocked; only a new game leaves this phase
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::GameOver => "gameOver",
        }
    }
}

/// Engine-side notifications for renderers and audio layers.
///
/// The engine queues these as it mutates state; observers drain them
/// after each command or tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameEvent {
    /// A command moved the active piece
    PieceMoved { dx: i8, dy: i8 },
    PieceRotated,
    /// The active piece was committed into the board
    PieceLocked { kind: PieceKind, lines_cleared: u32 },
    LinesCleared { count: u32, points: u32 },
    LevelUp { level: u32, fall_interval_ms: u32 },
    GameOver { score: u32 },
}

/// Tunable game rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub base_fall_ms: u32,
    pub fall_step_ms: u32,
    pub min_fall_ms: u32,
    pub lines_per_level: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            base_fall_ms: BASE_FALL_MS,
            fall_step_ms: FALL_STEP_MS,
            min_fall_ms: MIN_FALL_MS,
            lines_per_level: LINES_PER_LEVEL,
        }
    }
}

impl EngineConfig {
    /// Clamp every field into a playable range.
    pub fn sanitized(self) -> Self {
        let min_fall_ms = self.min_fall_ms.max(1);
        Self {
            width: self.width.clamp(MIN_BOARD_EDGE, MAX_BOARD_EDGE),
            height: self.height.clamp(MIN_BOARD_EDGE, MAX_BOARD_EDGE),
            base_fall_ms: self.base_fall_ms.max(min_fall_ms),
            fall_step_ms: self.fall_step_ms,
            min_fall_ms,
            lines_per_level: self.lines_per_level.max(1),
        }
    }
}
