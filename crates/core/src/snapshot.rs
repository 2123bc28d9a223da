//! Snapshot module - the plain-data form of a game
//!
//! A [`GameSnapshot`] holds everything needed to resume play exactly where it
//! was captured, including the partially elapsed gravity period and the
//! randomizer position. It serializes to flat camelCase JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::pieces::{Piece, MAX_SHAPE_DIM};
use crate::types::EngineConfig;

/// Current snapshot layout version
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub config: EngineConfig,
    pub board: Board,
    pub current_piece: Option<Piece>,
    pub next_piece: Option<Piece>,
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub lines_this_level: u32,
    pub game_over: bool,
    pub paused: bool,
    pub fall_accumulator_ms: u32,
    pub fall_interval_ms: u32,
    /// Randomizer position; absent in hand-written saves
    #[serde(default)]
    pub rng_state: Option<u32>,
}

/// Reasons a snapshot cannot be restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedVersion(u32),
    InvalidConfig,
    BoardSizeMismatch,
    InvalidLevel,
    InvalidFallInterval,
    PieceOutOfBounds,
    PieceOverlap,
}

impl SnapshotError {
    pub fn code(self) -> &'static str {
        match self {
            SnapshotError::UnsupportedVersion(_) => "unsupported_version",
            SnapshotError::InvalidConfig
            | SnapshotError::BoardSizeMismatch
            | SnapshotError::InvalidLevel
            | SnapshotError::InvalidFallInterval
            | SnapshotError::PieceOutOfBounds
            | SnapshotError::PieceOverlap => "invalid_snapshot",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            SnapshotError::UnsupportedVersion(_) => "snapshot version is not supported",
            SnapshotError::InvalidConfig => "rules are outside the playable range",
            SnapshotError::BoardSizeMismatch => "board size does not match the rules",
            SnapshotError::InvalidLevel => "level must be at least 1",
            SnapshotError::InvalidFallInterval => "fall interval must be positive",
            SnapshotError::PieceOutOfBounds => "piece lies outside the board",
            SnapshotError::PieceOverlap => "active piece overlaps locked cells",
        }
    }
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::UnsupportedVersion(v) => write!(f, "{} ({})", self.message(), v),
            _ => f.write_str(self.message()),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl GameSnapshot {
    /// Check the invariants the engine relies on
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        if self.config.sanitized() != self.config {
            return Err(SnapshotError::InvalidConfig);
        }
        if self.board.width() != self.config.width || self.board.height() != self.config.height {
            return Err(SnapshotError::BoardSizeMismatch);
        }
        if self.level == 0 {
            return Err(SnapshotError::InvalidLevel);
        }
        if self.fall_interval_ms == 0 {
            return Err(SnapshotError::InvalidFallInterval);
        }

        for piece in self.current_piece.iter().chain(self.next_piece.iter()) {
            if !piece_in_range(piece, &self.board) {
                return Err(SnapshotError::PieceOutOfBounds);
            }
        }
        // A game that ended keeps the piece that failed to spawn.
        if let Some(piece) = &self.current_piece {
            if !self.game_over && !self.board.fits(piece) {
                return Err(SnapshotError::PieceOverlap);
            }
        }
        Ok(())
    }
}

/// Every cell inside the side walls and above the floor, and the piece no
/// more than one shape height above the top row
fn piece_in_range(piece: &Piece, board: &Board) -> bool {
    let x = piece.x as i16;
    let y = piece.y as i16;
    if y < -(MAX_SHAPE_DIM as i16) {
        return false;
    }
    let width = board.width() as i16;
    let height = board.height() as i16;
    piece.shape.cells().iter().all(|&(dx, dy)| {
        let px = x + dx as i16;
        let py = y + dy as i16;
        (0..width).contains(&px) && py < height
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceKind;

    fn sample() -> GameSnapshot {
        let mut board = Board::default();
        board.set(0, 19, Some(PieceKind::Z));
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            config: EngineConfig::default(),
            board,
            current_piece: Some(Piece::instantiate(PieceKind::T, 10)),
            next_piece: Some(Piece::instantiate(PieceKind::I, 10)),
            score: 140,
            lines: 2,
            level: 1,
            lines_this_level: 2,
            game_over: false,
            paused: false,
            fall_accumulator_ms: 420,
            fall_interval_ms: 1000,
            rng_state: Some(77),
        }
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("currentPiece").is_some());
        assert!(json.get("linesThisLevel").is_some());
        assert!(json.get("fallAccumulatorMs").is_some());
        assert_eq!(json["board"][19][0], "Z");
        assert_eq!(json["currentPiece"]["shape"], serde_json::json!([[0, 1, 0], [1, 1, 1]]));
    }

    #[test]
    fn json_without_optional_fields_uses_defaults() {
        let mut json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object_mut().unwrap();
        obj.remove("version");
        obj.remove("config");
        obj.remove("rngState");

        let back: GameSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.version, SNAPSHOT_VERSION);
        assert_eq!(back.config, EngineConfig::default());
        assert_eq!(back.rng_state, None);
        assert!(back.validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_board() {
        let mut snap = sample();
        snap.board = Board::new(8, 20);
        assert_eq!(snap.validate(), Err(SnapshotError::BoardSizeMismatch));
    }

    #[test]
    fn validate_rejects_zero_level_and_interval() {
        let mut snap = sample();
        snap.level = 0;
        assert_eq!(snap.validate(), Err(SnapshotError::InvalidLevel));

        let mut snap = sample();
        snap.fall_interval_ms = 0;
        assert_eq!(snap.validate(), Err(SnapshotError::InvalidFallInterval));
    }

    #[test]
    fn validate_rejects_piece_outside_board() {
        let mut snap = sample();
        snap.current_piece = snap.current_piece.map(|p| Piece { x: 125, ..p });
        assert_eq!(snap.validate(), Err(SnapshotError::PieceOutOfBounds));

        let mut snap = sample();
        snap.next_piece = snap.next_piece.map(|p| Piece { y: -100, ..p });
        assert_eq!(snap.validate(), Err(SnapshotError::PieceOutOfBounds));

        let mut snap = sample();
        snap.current_piece = snap.current_piece.map(|p| Piece { y: 19, ..p });
        assert_eq!(snap.validate(), Err(SnapshotError::PieceOutOfBounds));
    }

    #[test]
    fn validate_rejects_overlap_unless_game_over() {
        let mut snap = sample();
        // T spawns at (4, 0); its top cell is (5, 0).
        snap.board.set(5, 0, Some(PieceKind::O));
        assert_eq!(snap.validate(), Err(SnapshotError::PieceOverlap));

        snap.game_over = true;
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn validate_accepts_piece_partly_above_top() {
        let mut snap = sample();
        snap.current_piece = snap.current_piece.map(|p| Piece { y: -1, ..p });
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn validate_rejects_future_version() {
        let mut snap = sample();
        snap.version = 9;
        let err = snap.validate().unwrap_err();
        assert_eq!(err, SnapshotError::UnsupportedVersion(9));
        assert_eq!(err.code(), "unsupported_version");
    }
}
