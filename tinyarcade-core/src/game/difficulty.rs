//! Score and difficulty curve
//!
//! The score rises by one for every obstacle spawned. Each time it reaches
//! a multiple of `points_per_level` the spawn delay drops by one tick and
//! the fall speed rises by one, until the delay hits its floor. After that
//! neither changes again for the rest of the game.

use crate::config::GameConfig;

/// Score, speed and spawn delay of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Difficulty {
    /// Obstacles spawned so far
    pub score: u32,
    /// Fall speed in pixels per tick
    pub speed: i32,
    /// Ticks between spawns
    pub spawn_delay: u32,
    min_spawn_delay: u32,
    points_per_level: u32,
}

impl Difficulty {
    /// Starting difficulty for a fresh game
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            speed: config.initial_speed,
            spawn_delay: config.initial_spawn_delay.max(1),
            min_spawn_delay: config.min_spawn_delay.max(1),
            points_per_level: config.points_per_level.max(1),
        }
    }

    /// Whether the spawn timer fires on `frame`
    pub fn spawn_due(&self, frame: u32) -> bool {
        frame % self.spawn_delay == 0
    }

    /// Account for one spawned obstacle
    ///
    /// Returns `true` if this spawn raised the difficulty.
    pub fn record_spawn(&mut self) -> bool {
        self.score = self.score.saturating_add(1);

        let level_up = self.score % self.points_per_level == 0;
        if level_up && self.spawn_delay > self.min_spawn_delay {
            self.spawn_delay -= 1;
            self.speed += 1;
            true
        } else {
            false
        }
    }
}
