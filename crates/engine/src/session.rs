//! Session layer - a game plus its save slot
//!
//! [`Session`] drives a [`GameState`] and keeps a [`SaveStore`] in step
//! with it: autosave after qualifying locks, save on pause, clear on game
//! over, and resume from whatever the store holds.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::codec::{decode_snapshot, encode_snapshot};
use crate::core::GameState;
use crate::store::{SaveStore, StoreError};
use crate::types::{EngineConfig, GameAction, GameEvent, AUTOSAVE_INTERVAL};

/// When the session writes the game to its store after a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosavePolicy {
    Never,
    /// After every lock
    EveryLock,
    /// After a lock that cleared lines, if total lines is a multiple of `n`
    LinesMultipleOf(u32),
}

impl AutosavePolicy {
    /// `0` disables autosave, `1` saves after every lock.
    pub fn from_interval(n: u32) -> Self {
        match n {
            0 => AutosavePolicy::Never,
            1 => AutosavePolicy::EveryLock,
            n => AutosavePolicy::LinesMultipleOf(n),
        }
    }

    /// Whether a lock that cleared `lines_cleared` rows, bringing the total
    /// to `total_lines`, should be saved
    pub fn should_save(&self, lines_cleared: u32, total_lines: u32) -> bool {
        match *self {
            AutosavePolicy::Never => false,
            AutosavePolicy::EveryLock => true,
            AutosavePolicy::LinesMultipleOf(n) => {
                lines_cleared > 0 && n > 0 && total_lines % n == 0
            }
        }
    }
}

impl Default for AutosavePolicy {
    fn default() -> Self {
        AutosavePolicy::from_interval(AUTOSAVE_INTERVAL)
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Directory holding the save file
    pub save_dir: PathBuf,
    pub autosave: AutosavePolicy,
    pub seed: u32,
    pub engine: EngineConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("."),
            autosave: AutosavePolicy::default(),
            seed: 1,
            engine: EngineConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();

        let save_dir = lookup("BLOCKFALL_SAVE_DIR")
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let autosave = lookup("BLOCKFALL_AUTOSAVE")
            .and_then(|s| s.trim().parse().ok())
            .map(AutosavePolicy::from_interval)
            .unwrap_or_default();

        let seed = lookup("BLOCKFALL_SEED")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let width = lookup("BLOCKFALL_WIDTH")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);

        let height = lookup("BLOCKFALL_HEIGHT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);

        Self {
            save_dir,
            autosave,
            seed,
            engine: EngineConfig {
                width,
                height,
                ..defaults
            }
            .sanitized(),
        }
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
}

/// A game bound to a save slot
pub struct Session<S: SaveStore> {
    game: GameState,
    store: S,
    autosave: AutosavePolicy,
    events: Vec<GameEvent>,
}

impl<S: SaveStore> Session<S> {
    /// Session with a fresh, not yet started game
    pub fn new(store: S, config: &SessionConfig) -> Self {
        Self {
            game: GameState::with_config(config.engine, config.seed),
            store,
            autosave: config.autosave,
            events: Vec::new(),
        }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Whether the store holds a game that [`Session::continue_game`] can resume
    pub fn has_saved_game(&self) -> bool {
        match self.store.load() {
            Ok(Some(data)) => decode_snapshot(&data).is_some(),
            Ok(None) => false,
            Err(e) => {
                eprintln!("[Session] Failed to read save: {}", e);
                false
            }
        }
    }

    /// Start a fresh game, keeping the rules
    pub fn new_game(&mut self) {
        if self.game.started() {
            self.game.new_game();
        } else {
            self.game.start();
        }
        self.after_step();
    }

    /// Resume the saved game
    ///
    /// Returns false if there was nothing usable to resume; an unreadable
    /// save is removed and the current game is left alone.
    pub fn continue_game(&mut self) -> bool {
        let data = match self.store.load() {
            Ok(Some(data)) => data,
            Ok(None) => return false,
            Err(e) => {
                eprintln!("[Session] Failed to read save: {}", e);
                return false;
            }
        };

        let restored = decode_snapshot(&data).and_then(|snapshot| self.game.restore(&snapshot).ok());
        if restored.is_none() {
            eprintln!("[Session] Discarding unreadable save");
            self.clear_save();
            return false;
        }

        self.events.clear();
        true
    }

    /// Resume the saved game, or start a new one if there is none
    ///
    /// Returns true if a save was resumed.
    pub fn continue_or_new_game(&mut self) -> bool {
        if self.continue_game() {
            return true;
        }
        self.new_game();
        false
    }

    /// Apply a player command
    pub fn apply(&mut self, action: GameAction) -> bool {
        let changed = self.game.apply_action(action);
        self.after_step();
        if changed && action == GameAction::Pause && self.game.paused() {
            self.persist();
        }
        changed
    }

    /// Pause a running game (e.g. the window lost focus) and save it
    pub fn pause(&mut self) -> bool {
        let paused = self.game.pause();
        if paused {
            self.persist();
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        self.game.resume()
    }

    /// Advance gravity
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        let stepped = self.game.tick(elapsed_ms);
        if stepped {
            self.after_step();
        }
        stepped
    }

    /// Write the current game to the store
    ///
    /// A finished game is never saved; its slot is cleared instead. A game
    /// that has not started yet leaves the store untouched.
    pub fn save_now(&mut self) -> Result<(), StoreError> {
        if self.game.game_over() {
            return self.store.clear();
        }
        if !self.game.started() {
            return Ok(());
        }
        let data = encode_snapshot(&self.game.snapshot())?;
        self.store.save(&data)
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Route fresh engine events and apply the save rules
    fn after_step(&mut self) {
        let mut wants_save = false;
        let mut ended = false;

        for event in self.game.take_events() {
            match event {
                GameEvent::PieceLocked { lines_cleared, .. } => {
                    if self.autosave.should_save(lines_cleared, self.game.lines()) {
                        wants_save = true;
                    }
                }
                GameEvent::GameOver { score } => {
                    eprintln!("[Session] Game over with score {}", score);
                    ended = true;
                }
                _ => {}
            }
            self.events.push(event);
        }

        if ended {
            self.clear_save();
        } else if wants_save {
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.save_now() {
            eprintln!("[Session] Failed to save game: {}", e);
        }
    }

    fn clear_save(&mut self) {
        if let Err(e) = self.store.clear() {
            eprintln!("[Session] Failed to clear save: {}", e);
        }
    }
}
