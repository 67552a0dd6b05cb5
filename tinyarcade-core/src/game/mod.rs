//! Obstacle-avoidance game
//!
//! The engine owns all game state and is only mutated by its own tick
//! and command handling.

pub mod difficulty;
pub mod engine;
pub mod phase;
pub mod rng;

pub use difficulty::Difficulty;
pub use engine::{GameEngine, Obstacle, TickReport, MAX_OBSTACLES};
pub use phase::{GameCommand, GamePhase};
pub use rng::Rng;
