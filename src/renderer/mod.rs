//! Rendering
//!
//! Renderers never touch the simulation. Each frame they get a read-only
//! `Frame` view of the world plus the HUD and overlay text, and draw it
//! however they like.

pub mod palette;
#[cfg(not(target_arch = "wasm32"))]
pub mod text;

pub use palette::{Neon, Palette, Style};
#[cfg(not(target_arch = "wasm32"))]
pub use text::TextRenderer;

use crate::controller::{GameController, GamePhase, Outcome};
use crate::error::Result;
use crate::sim::{Arena, Entity, Game, Winner};
use crate::ticks_to_secs;

/// A drawing backend
pub trait Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> Result<()>;
}

/// Centered text drawn over the playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub detail: Option<String>,
    pub prompt: Option<&'static str>,
}

impl Overlay {
    /// Game-over screen: title, final score or per-player scores, restart prompt
    pub fn game_over(outcome: &Outcome, scores: &[u64]) -> Self {
        let detail = match outcome.winner {
            Some(Winner::Player(_)) | Some(Winner::Draw) => scores
                .iter()
                .enumerate()
                .map(|(slot, score)| format!("P{} {}", slot + 1, score))
                .collect::<Vec<_>>()
                .join("  "),
            None => format!("Final score: {}", outcome.final_score),
        };
        Self {
            title: outcome.title(),
            detail: Some(detail),
            prompt: Some("Press R to restart"),
        }
    }

    fn for_phase<G: Game>(controller: &GameController<G>) -> Option<Self> {
        match controller.phase() {
            GamePhase::Ready => Some(Self {
                title: controller.game().name().to_uppercase(),
                detail: None,
                prompt: Some("Press Enter to start"),
            }),
            GamePhase::Countdown => Some(Self {
                title: ticks_to_secs(controller.countdown()).to_string(),
                detail: None,
                prompt: None,
            }),
            GamePhase::Paused => Some(Self {
                title: "Paused".to_string(),
                detail: None,
                prompt: Some("Press P to resume"),
            }),
            GamePhase::Over => controller
                .outcome()
                .map(|outcome| Self::game_over(outcome, controller.world().scores.as_slice())),
            GamePhase::Running => None,
        }
    }
}

/// Everything a renderer may read for one frame
#[derive(Debug, Clone)]
pub struct Frame<'a> {
    pub game: &'static str,
    pub arena: Arena,
    pub entities: &'a [Entity],
    pub scores: &'a [u64],
    pub phase: GamePhase,
    pub frame: u64,
    pub hud: Vec<(&'static str, String)>,
    pub overlay: Option<Overlay>,
}

impl<'a> Frame<'a> {
    pub fn capture<G: Game>(controller: &'a GameController<G>) -> Self {
        let world = controller.world();
        Self {
            game: controller.game().name(),
            arena: world.arena,
            entities: world.entities(),
            scores: world.scores.as_slice(),
            phase: controller.phase(),
            frame: world.frame(),
            hud: controller.hud(),
            overlay: Overlay::for_phase(controller),
        }
    }

    /// Score line: one number for single-player, one per slot otherwise
    pub fn score_line(&self) -> String {
        match self.scores {
            [single] => format!("score {single}"),
            scores => scores
                .iter()
                .enumerate()
                .map(|(slot, score)| format!("p{} {}", slot + 1, score))
                .collect::<Vec<_>>()
                .join("  "),
        }
    }
}
