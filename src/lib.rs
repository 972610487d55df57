//! Neon Arcade - a tiny runtime for single-screen arcade games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collision rules, timers)
//! - `controller`: Ready/Countdown/Running/Paused/Over state machine
//! - `games`: The games themselves (zones, runner, hoops, moto)
//! - `input`: Logical actions, key bindings and the keyboard input source
//! - `renderer`: Read-only frame view and a text renderer
//! - `highscores` / `settings`: JSON persistence

pub mod controller;
pub mod error;
pub mod games;
pub mod highscores;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::{Epoch, GameController};
pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation rate; every timer in the crate counts frames at this rate
    pub const FRAME_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Default pre-run countdown (3 seconds)
    pub const DEFAULT_COUNTDOWN_TICKS: u32 = 3 * FRAME_RATE;
}

/// Convert a duration in seconds to whole simulation frames (rounded up)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs * consts::FRAME_RATE as f32).ceil().max(0.0) as u32
}

/// Convert simulation frames back to whole seconds (rounded up, for HUD timers)
#[inline]
pub fn ticks_to_secs(ticks: u32) -> u32 {
    ticks.div_ceil(consts::FRAME_RATE)
}
