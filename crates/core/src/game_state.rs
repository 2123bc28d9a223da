//! Game state module - the simulation engine
//!
//! This module ties together all core components: board, pieces, randomizer,
//! and scoring. It owns the active and next pieces, applies commands and
//! gravity, runs the lock sequence and reports what happened as
//! [`GameEvent`]s.
//!
//! Phases: `Ready -> Running <-> Paused -> GameOver`. Every command and
//! `tick` is a no-op unless the game is `Running` with an active piece.

use crate::board::Board;
use crate::pieces::Piece;
use crate::rng::PieceRandomizer;
use crate::scoring::Progress;
use crate::snapshot::{GameSnapshot, SnapshotError, SNAPSHOT_VERSION};
use crate::types::*;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    current: Option<Piece>,
    next: Option<Piece>,
    randomizer: PieceRandomizer,
    progress: Progress,
    /// Milliseconds of gravity time not yet spent on a step
    fall_accumulator_ms: u32,
    started: bool,
    paused: bool,
    game_over: bool,
    /// Pending notifications (drained by observers).
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default rules and the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::with_config(EngineConfig::default(), seed)
    }

    /// Create a new game with custom rules
    pub fn with_config(config: EngineConfig, seed: u32) -> Self {
        Self::fresh(config.sanitized(), PieceRandomizer::new(seed))
    }

    fn fresh(config: EngineConfig, randomizer: PieceRandomizer) -> Self {
        Self {
            config,
            board: Board::new(config.width, config.height),
            current: None,
            next: None,
            randomizer,
            progress: Progress::new(&config),
            fall_accumulator_ms: 0,
            started: false,
            paused: false,
            game_over: false,
            events: Vec::new(),
        }
    }

    /// Start the game: draw the current and next pieces
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let current = self.draw_piece();
        let next = self.draw_piece();
        self.current = Some(current);
        self.next = Some(next);
        self.check_spawn();
    }

    /// Throw the current game away and start over with the same rules
    ///
    /// The randomizer keeps running, so the new game gets fresh pieces.
    pub fn new_game(&mut self) {
        self.board.clear();
        self.current = None;
        self.next = None;
        self.progress = Progress::new(&self.config);
        self.fall_accumulator_ms = 0;
        self.started = false;
        self.paused = false;
        self.game_over = false;
        self.events.clear();
        self.start();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.progress.score
    }

    pub fn lines(&self) -> u32 {
        self.progress.lines
    }

    pub fn level(&self) -> u32 {
        self.progress.level
    }

    pub fn lines_this_level(&self) -> u32 {
        self.progress.lines_this_level
    }

    pub fn fall_interval_ms(&self) -> u32 {
        self.progress.fall_interval_ms
    }

    pub fn fall_accumulator_ms(&self) -> u32 {
        self.fall_accumulator_ms
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else if !self.started {
            Phase::Ready
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    /// Whether commands and gravity currently have any effect
    pub fn is_playable(&self) -> bool {
        self.phase() == Phase::Running && self.current.is_some()
    }

    /// Events queued since the last [`GameState::take_events`]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drain queued events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn draw_piece(&mut self) -> Piece {
        Piece::instantiate(self.randomizer.draw(), self.config.width)
    }

    /// End the game if the current piece does not fit where it spawned
    fn check_spawn(&mut self) {
        let Some(piece) = self.current else {
            return;
        };
        if !self.board.fits(&piece) {
            self.game_over = true;
            self.events.push(GameEvent::GameOver {
                score: self.progress.score,
            });
        }
    }

    /// Try to move the active piece
    fn try_shift(&mut self, dx: i8, dy: i8) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        let moved = piece.shifted(dx, dy);
        if !self.board.fits(&moved) {
            return false;
        }
        self.current = Some(moved);
        true
    }

    /// Shift the active piece one column (`dx` must be -1 or 1)
    pub fn move_horizontal(&mut self, dx: i8) -> bool {
        if dx != -1 && dx != 1 {
            return false;
        }
        let moved = self.try_shift(dx, 0);
        if moved {
            self.events.push(GameEvent::PieceMoved { dx, dy: 0 });
        }
        moved
    }

    pub fn move_left(&mut self) -> bool {
        self.move_horizontal(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.move_horizontal(1)
    }

    /// Move the active piece down one row, locking it if it cannot fall
    ///
    /// Returns true only when the piece actually moved.
    pub fn soft_drop(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        if self.try_shift(0, 1) {
            self.events.push(GameEvent::PieceMoved { dx: 0, dy: 1 });
            return true;
        }
        self.lock_piece();
        false
    }

    /// Drop the active piece to its lowest valid row and lock it
    pub fn hard_drop(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        while self.try_shift(0, 1) {}
        self.lock_piece();
        true
    }

    /// Rotate the active piece clockwise in place (no wall kicks)
    pub fn rotate(&mut self) -> bool {
        if !self.is_playable() {
            return false;
        }
        let Some(piece) = self.current else {
            return false;
        };

        let rotated = piece.rotated();
        if !self.board.fits(&rotated) {
            return false;
        }
        self.current = Some(rotated);
        self.events.push(GameEvent::PieceRotated);
        true
    }

    /// Flip between running and paused
    pub fn toggle_pause(&mut self) -> bool {
        if !self.started || self.game_over {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.phase() != Phase::Running {
            return false;
        }
        self.paused = true;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase() != Phase::Paused {
            return false;
        }
        self.paused = false;
        true
    }

    /// One gravity step: fall a row or lock
    fn gravity_step(&mut self) {
        if !self.try_shift(0, 1) {
            self.lock_piece();
        }
    }

    /// Lock the active piece, clear rows, score, and bring in the next piece
    fn lock_piece(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        self.board.lock_piece(&piece);
        let cleared = self.board.clear_full_rows();
        self.events.push(GameEvent::PieceLocked {
            kind: piece.kind,
            lines_cleared: cleared as u32,
        });

        if cleared > 0 {
            let result = self.progress.record_clear(cleared, &self.config);
            self.events.push(GameEvent::LinesCleared {
                count: cleared as u32,
                points: result.points,
            });
            if let Some(level) = result.level_up {
                self.events.push(GameEvent::LevelUp {
                    level,
                    fall_interval_ms: result.fall_interval_ms,
                });
            }
        }

        let current = match self.next.take() {
            Some(next) => next,
            None => self.draw_piece(),
        };
        let next = self.draw_piece();
        self.current = Some(current);
        self.next = Some(next);
        self.check_spawn();
    }

    /// Advance gravity by `elapsed_ms`
    ///
    /// At most one gravity step per call; leftover time carries over.
    /// Returns true if a step happened.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.is_playable() {
            return false;
        }

        self.fall_accumulator_ms = self.fall_accumulator_ms.saturating_add(elapsed_ms);
        let interval = self.progress.fall_interval_ms;
        if self.fall_accumulator_ms < interval {
            return false;
        }

        self.fall_accumulator_ms -= interval;
        self.gravity_step();
        true
    }

    /// Apply a game action
    ///
    /// Returns whether the action changed anything.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.move_left(),
            GameAction::MoveRight => self.move_right(),
            GameAction::SoftDrop => {
                if !self.is_playable() {
                    return false;
                }
                self.soft_drop();
                true
            }
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Rotate => self.rotate(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::NewGame => {
                self.new_game();
                true
            }
        }
    }

    /// Capture the complete state as plain data
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            version: SNAPSHOT_VERSION,
            config: self.config,
            board: self.board.clone(),
            current_piece: self.current,
            next_piece: self.next,
            score: self.progress.score,
            lines: self.progress.lines,
            level: self.progress.level,
            lines_this_level: self.progress.lines_this_level,
            game_over: self.game_over,
            paused: self.paused,
            fall_accumulator_ms: self.fall_accumulator_ms,
            fall_interval_ms: self.progress.fall_interval_ms,
            rng_state: Some(self.randomizer.state()),
        }
    }

    /// Replace the whole state with a snapshot
    ///
    /// On error nothing changes. Pending events are discarded.
    pub fn restore(&mut self, snapshot: &GameSnapshot) -> Result<(), SnapshotError> {
        snapshot.validate()?;

        self.config = snapshot.config;
        self.board = snapshot.board.clone();
        self.current = snapshot.current_piece;
        self.next = snapshot.next_piece;
        if let Some(state) = snapshot.rng_state {
            self.randomizer = PieceRandomizer::from_state(state);
        }
        self.progress = Progress {
            score: snapshot.score,
            lines: snapshot.lines,
            level: snapshot.level,
            lines_this_level: snapshot.lines_this_level,
            fall_interval_ms: snapshot.fall_interval_ms,
        };
        self.fall_accumulator_ms = snapshot.fall_accumulator_ms;
        self.started = snapshot.current_piece.is_some() || snapshot.game_over;
        // Only a started game can be paused.
        self.paused = snapshot.paused && self.started;
        self.game_over = snapshot.game_over;
        self.events.clear();
        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
