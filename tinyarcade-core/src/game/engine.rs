//! Obstacle-avoidance game engine
//!
//! The player is a square at the bottom of the playfield; squares fall
//! from the top at the current speed. One call to [`GameEngine::tick`]
//! advances the simulation by one frame:
//!
//! 1. Move the player one step per held direction, clamped to the field
//! 2. Advance the frame counter and spawn an obstacle when the timer fires
//! 3. Move every obstacle down, dropping those that left the field
//! 4. Test the player against every obstacle
//!
//! Collisions are tested after movement, so a player who ends the tick
//! overlapping an obstacle is already out.

use core::fmt::Write;

use heapless::{String, Vec};

use super::difficulty::Difficulty;
use super::phase::{GameCommand, GamePhase};
use super::rng::Rng;
use crate::color::Color;
use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::input::{EdgeKind, InputSampler, Line, LineLevels};
use crate::traits::Canvas;

/// Maximum obstacles alive at once
pub const MAX_OBSTACLES: usize = 32;

/// A falling square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// An obstacle was spawned
    pub spawned: bool,
    /// The spawn raised speed and lowered the spawn delay
    pub level_up: bool,
    /// The obstacle list was full; the spawn was scored but not placed
    pub spawn_dropped: bool,
    /// The player was hit; the game is over
    pub collided: bool,
}

/// Game state and simulation
#[derive(Debug, Clone)]
pub struct GameEngine {
    config: GameConfig,
    phase: GamePhase,
    player_x: i32,
    player_y: i32,
    obstacles: Vec<Obstacle, MAX_OBSTACLES>,
    difficulty: Difficulty,
    frame: u32,
    high_score: u32,
    rng: Rng,
}

impl GameEngine {
    /// Start a new game in the running phase
    pub fn new(config: GameConfig, seed: u32) -> Self {
        Self {
            config,
            phase: GamePhase::Running,
            player_x: config.start_x,
            player_y: config.start_y,
            obstacles: Vec::new(),
            difficulty: Difficulty::new(&config),
            frame: 0,
            high_score: 0,
            rng: Rng::new(seed),
        }
    }

    /// Carry a high score over from an earlier game
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Current phase
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Player top-left corner
    pub fn player(&self) -> (i32, i32) {
        (self.player_x, self.player_y)
    }

    pub fn score(&self) -> u32 {
        self.difficulty.score
    }

    pub fn speed(&self) -> i32 {
        self.difficulty.speed
    }

    pub fn spawn_delay(&self) -> u32 {
        self.difficulty.spawn_delay
    }

    /// Best score of this session, excluding the game in progress
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Best score including the game in progress
    pub fn best(&self) -> u32 {
        self.difficulty.score.max(self.high_score)
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    fn player_rect(&self) -> Rect {
        Rect::square(self.player_x, self.player_y, self.config.block_size)
    }

    fn obstacle_rect(&self, obstacle: &Obstacle) -> Rect {
        Rect::square(obstacle.x, obstacle.y, self.config.block_size)
    }

    /// Reset the game, keeping the high score and the random stream
    fn restart(&mut self) {
        self.player_x = self.config.start_x;
        self.player_y = self.config.start_y;
        self.obstacles.clear();
        self.difficulty = Difficulty::new(&self.config);
        self.frame = 0;
    }

    /// Apply a command and return the resulting phase
    pub fn command(&mut self, command: GameCommand) -> GamePhase {
        if command == GameCommand::Restart && self.phase.accepts_restart() {
            self.restart();
        }
        if command == GameCommand::Collision && self.phase.is_live() {
            self.high_score = self.best();
        }
        self.phase = self.phase.transition(command);
        self.phase
    }

    /// Handle this poll's button presses, then tick if still running
    pub fn update(&mut self, input: &InputSampler) -> TickReport {
        for edge in input.edges() {
            if edge.kind != EdgeKind::Pressed {
                continue;
            }
            if let Some(command) = GameCommand::from_line(edge.line) {
                if self.command(command) == GamePhase::Exited {
                    return TickReport::default();
                }
            }
        }

        self.tick(input.levels())
    }

    /// Advance the simulation by one frame
    ///
    /// Does nothing outside the running phase.
    pub fn tick(&mut self, levels: LineLevels) -> TickReport {
        let mut report = TickReport::default();
        if !self.phase.is_live() {
            return report;
        }

        self.move_player(levels);

        self.frame = self.frame.wrapping_add(1);
        if self.difficulty.spawn_due(self.frame) {
            let span = (self.config.playfield_width - self.config.block_size + 1).max(1);
            let x = self.rng.below(span as u32) as i32;
            report.spawned = true;
            report.spawn_dropped = self.obstacles.push(Obstacle { x, y: 0 }).is_err();
            report.level_up = self.difficulty.record_spawn();
        }

        let speed = self.difficulty.speed;
        let height = self.config.playfield_height;
        for obstacle in self.obstacles.iter_mut() {
            obstacle.y += speed;
        }
        self.obstacles.retain(|o| o.y < height);

        let player = self.player_rect();
        if self
            .obstacles
            .iter()
            .any(|o| self.obstacle_rect(o).overlaps(&player))
        {
            self.command(GameCommand::Collision);
            report.collided = true;
        }

        report
    }

    fn move_player(&mut self, levels: LineLevels) {
        let step = self.config.step;
        let max_x = self.config.playfield_width - self.config.block_size;
        let max_y = self.config.playfield_height - self.config.block_size;

        if levels.is_pressed(Line::Left) {
            self.player_x -= step;
        }
        if levels.is_pressed(Line::Right) {
            self.player_x += step;
        }
        if levels.is_pressed(Line::Up) {
            self.player_y -= step;
        }
        if levels.is_pressed(Line::Down) {
            self.player_y += step;
        }

        self.player_x = self.player_x.clamp(0, max_x);
        self.player_y = self.player_y.clamp(0, max_y);
    }

    /// Draw the screen for the current phase
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self.phase {
            GamePhase::Running => self.render_field(canvas),
            GamePhase::Paused => {
                canvas.clear(Color::BLACK);
                canvas.draw_text("PAUSED", 90, 100, Color::BLUE);
                canvas.draw_text("Press A to resume", 40, 140, Color::WHITE);
            }
            GamePhase::HighScore => {
                canvas.clear(Color::BLACK);
                canvas.draw_text("High Score", 70, 100, Color::GREEN);
                canvas.draw_text(&number(self.best()), 110, 120, Color::WHITE);
                canvas.draw_text("Press B to return", 30, 160, Color::BLUE);
            }
            GamePhase::GameOver => {
                canvas.clear(Color::RED);
                canvas.draw_text("GAME OVER", 70, 100, Color::WHITE);
                canvas.draw_text(&labeled("Score", self.score()), 70, 120, Color::WHITE);
                canvas.draw_text("Press X to restart", 40, 160, Color::WHITE);
                canvas.draw_text("  Y to exit", 60, 180, Color::WHITE);
            }
            GamePhase::Exited => canvas.clear(Color::BLACK),
        }
    }

    fn render_field<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let size = self.config.block_size;
        canvas.clear(Color::BLACK);
        canvas.fill_rect(self.player_x, self.player_y, size, size, Color::GREEN);
        for obstacle in &self.obstacles {
            canvas.fill_rect(obstacle.x, obstacle.y, size, size, Color::RED);
        }

        canvas.draw_text(&labeled("Score", self.score()), 5, 5, Color::WHITE);
        canvas.draw_text(&labeled("Hi", self.best()), 5, 20, Color::BLUE);
        canvas.draw_text(&labeled("Speed", self.speed()), 5, 35, Color::WHITE);
    }
}

/// "label: value" for the HUD
fn labeled(label: &str, value: impl core::fmt::Display) -> String<24> {
    let mut text = String::new();
    // Truncated text is acceptable on overflow
    let _ = write!(text, "{}: {}", label, value);
    text
}

fn number(value: u32) -> String<12> {
    let mut text = String::new();
    let _ = write!(text, "{}", value);
    text
}
