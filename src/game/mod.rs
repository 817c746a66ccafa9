//! Core rules for the escape game
//!
//! A prisoner and a guard move simultaneously on a square grid. The prisoner
//! wins by reaching the escape cell, the guard by landing on the prisoner.
//! No I/O or rendering lives here.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{ActionMask, Move};
pub use config::EscapeConfig;
pub use engine::{EscapeEngine, StepResult};
pub use state::{GameState, Outcome, Position};
