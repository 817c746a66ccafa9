//! Escape Grid - a two-agent prisoner/guard pursuit game with a parallel
//! multi-agent environment API
//!
//! This library provides:
//! - Core game rules (game module)
//! - The parallel environment contract and `EscapeEnv` (env module)
//! - A random-rollout conformance check (check module)
//! - Text and TUI rendering (render module)
//! - Console and terminal execution modes (demo, check, watch, play)

pub mod check;
pub mod env;
pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
