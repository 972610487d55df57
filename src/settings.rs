//! Runtime settings
//!
//! Read from a JSON file, then overridden from `NEON_*` environment
//! variables. A missing or unreadable file falls back to defaults.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_COUNTDOWN_TICKS;
use crate::error::{Error, Result};
use crate::input::KeyBindings;

/// Default settings file, relative to the working directory
pub const DEFAULT_PATH: &str = "neon-arcade.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run seed; `None` picks one from the clock at startup
    pub seed: Option<u64>,
    /// Frames counted down between start and play
    pub countdown_ticks: u32,
    /// Terminal colours in the text renderer
    pub color: bool,
    /// Where best scores are kept
    pub highscore_path: PathBuf,
    /// Headless runs draw one frame out of this many
    pub render_every: u32,
    /// Text renderer grid size
    pub cols: usize,
    pub rows: usize,
    /// Key overrides merged over each game's default bindings
    pub bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            countdown_ticks: DEFAULT_COUNTDOWN_TICKS,
            color: true,
            highscore_path: PathBuf::from("neon-highscores.json"),
            render_every: 60,
            cols: 80,
            rows: 24,
            bindings: KeyBindings::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring malformed settings in {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Invalid values are logged and
    /// leave the current value alone.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(seed) = lookup("NEON_SEED") {
            match seed.parse::<u64>() {
                Ok(parsed) => self.seed = Some(parsed),
                Err(_) => log::warn!("Invalid NEON_SEED '{}', ignoring", seed),
            }
        }

        if let Some(countdown) = lookup("NEON_COUNTDOWN") {
            match countdown.parse::<u32>() {
                Ok(parsed) => self.countdown_ticks = parsed,
                Err(_) => log::warn!("Invalid NEON_COUNTDOWN '{}', ignoring", countdown),
            }
        }

        if let Some(color) = lookup("NEON_COLOR") {
            match color.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.color = true,
                "0" | "false" | "no" | "off" => self.color = false,
                _ => log::warn!("Invalid NEON_COLOR '{}', ignoring", color),
            }
        }

        if let Some(path) = lookup("NEON_HIGHSCORES") {
            if path.is_empty() {
                log::warn!("NEON_HIGHSCORES is empty, ignoring");
            } else {
                self.highscore_path = PathBuf::from(path);
            }
        }

        if let Some(every) = lookup("NEON_RENDER_EVERY") {
            match every.parse::<u32>() {
                Ok(parsed) if parsed > 0 => self.render_every = parsed,
                Ok(_) => log::warn!("NEON_RENDER_EVERY must be > 0, ignoring"),
                Err(_) => log::warn!("Invalid NEON_RENDER_EVERY '{}', ignoring", every),
            }
        }
    }

    /// A game's default bindings with the user's overrides on top
    pub fn bindings_over(&self, defaults: KeyBindings) -> KeyBindings {
        let mut bindings = defaults;
        bindings.merge(&self.bindings);
        bindings
    }
}
