//! Scoring module - line-clear points and level progression
//!
//! Points depend only on how many rows a single lock cleared, multiplied by
//! the level at the time of the clear. Leveling is counted per level: once
//! the lines cleared on the current level reach the threshold, the level
//! goes up, the counter starts over and gravity speeds up by a fixed step.

use crate::types::{EngineConfig, LINE_SCORES};

/// Outcome of one line-clear lock event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points awarded for the clear (already multiplied by level)
    pub points: u32,
    /// New level if this clear triggered a level-up
    pub level_up: Option<u32>,
    /// Gravity period after the clear
    pub fall_interval_ms: u32,
}

/// Mutable progression counters of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub score: u32,
    pub lines: u32,
    pub level: u32,
    pub lines_this_level: u32,
    pub fall_interval_ms: u32,
}

impl Progress {
    /// Counters for a fresh game
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            score: 0,
            lines: 0,
            level: crate::types::START_LEVEL,
            lines_this_level: 0,
            fall_interval_ms: config.base_fall_ms,
        }
    }

    /// Apply a lock event that cleared `lines` rows
    ///
    /// Score is added at the pre-clear level; the level-up (if any) follows.
    pub fn record_clear(&mut self, lines: usize, config: &EngineConfig) -> ScoreResult {
        if lines == 0 {
            return ScoreResult {
                points: 0,
                level_up: None,
                fall_interval_ms: self.fall_interval_ms,
            };
        }

        let points = calculate_line_score(lines, self.level);
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(lines as u32);
        self.lines_this_level = self.lines_this_level.saturating_add(lines as u32);

        let mut level_up = None;
        if self.lines_this_level >= config.lines_per_level {
            self.level += 1;
            self.lines_this_level = 0;
            self.fall_interval_ms = next_fall_interval_ms(
                self.fall_interval_ms,
                config.fall_step_ms,
                config.min_fall_ms,
            );
            level_up = Some(self.level);
        }

        ScoreResult {
            points,
            level_up,
            fall_interval_ms: self.fall_interval_ms,
        }
    }
}

/// Calculate line clear score
/// lines: rows cleared by one lock (1-4)
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Gravity period after one level-up, floored at `min_ms`
pub fn next_fall_interval_ms(current_ms: u32, step_ms: u32, min_ms: u32) -> u32 {
    current_ms.saturating_sub(step_ms).max(min_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_scores_at_level_one() {
        assert_eq!(calculate_line_score(1, 1), 40);
        assert_eq!(calculate_line_score(2, 1), 100);
        assert_eq!(calculate_line_score(3, 1), 300);
        assert_eq!(calculate_line_score(4, 1), 1200);
    }

    #[test]
    fn test_line_scores_scale_with_level() {
        assert_eq!(calculate_line_score(1, 5), 200);
        assert_eq!(calculate_line_score(4, 3), 3600);
    }

    #[test]
    fn test_line_score_out_of_range() {
        assert_eq!(calculate_line_score(0, 3), 0);
        assert_eq!(calculate_line_score(5, 3), 0);
    }

    #[test]
    fn test_fall_interval_floor() {
        assert_eq!(next_fall_interval_ms(1000, 50, 50), 950);
        assert_eq!(next_fall_interval_ms(90, 50, 50), 50);
        assert_eq!(next_fall_interval_ms(50, 50, 50), 50);
        assert_eq!(next_fall_interval_ms(20, 50, 50), 50);
    }

    #[test]
    fn test_level_up_after_ten_lines() {
        let config = EngineConfig::default();
        let mut progress = Progress::new(&config);

        for _ in 0..2 {
            let r = progress.record_clear(4, &config);
            assert_eq!(r.level_up, None);
        }
        assert_eq!(progress.lines_this_level, 8);

        let r = progress.record_clear(2, &config);
        assert_eq!(r.points, 100);
        assert_eq!(r.level_up, Some(2));
        assert_eq!(r.fall_interval_ms, 950);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.lines, 10);
        assert_eq!(progress.lines_this_level, 0);
    }

    #[test]
    fn test_clear_scored_before_level_up() {
        let config = EngineConfig::default();
        let mut progress = Progress::new(&config);
        progress.lines_this_level = 9;

        // The tetris that crosses the threshold still pays level 1 rates.
        let r = progress.record_clear(4, &config);
        assert_eq!(r.points, 1200);
        assert_eq!(progress.level, 2);
        // Overflow lines are not carried into the new level.
        assert_eq!(progress.lines_this_level, 0);
    }

    #[test]
    fn test_zero_line_lock_changes_nothing() {
        let config = EngineConfig::default();
        let mut progress = Progress::new(&config);
        let before = progress;
        let r = progress.record_clear(0, &config);
        assert_eq!(r.points, 0);
        assert_eq!(progress, before);
    }
}
