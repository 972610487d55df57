//! The rules a game plugs into the runtime

use super::collision::{CollisionEvent, CollisionRule};
use super::entity::Entity;
use super::rect::Arena;
use super::world::World;
use crate::input::{InputFrame, KeyBindings};

/// Who won a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Player(u8),
    Draw,
}

impl Winner {
    /// Leader of a multi-slot scoreboard, `None` for single-player boards
    pub fn from_scores(scores: &[u64]) -> Option<Winner> {
        if scores.len() < 2 {
            return None;
        }
        let best = scores.iter().copied().max().unwrap_or(0);
        let mut leaders = scores.iter().enumerate().filter(|(_, s)| **s == best);
        match (leaders.next(), leaders.next()) {
            (Some((slot, _)), None) => Some(Winner::Player(slot as u8)),
            _ => Some(Winner::Draw),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Winner::Player(slot) => format!("Player {} Wins!", slot + 1),
            Winner::Draw => "Draw!".to_string(),
        }
    }
}

/// A game's rules. The runtime owns the world and the per-run `State`;
/// both are rebuilt from scratch on restart.
pub trait Game {
    /// Per-run game state that is not an entity (zone index, counters)
    type State;

    /// Stable name, used as the high-score key
    fn name(&self) -> &'static str;

    fn arena(&self) -> Arena;

    fn gravity(&self) -> f32 {
        0.0
    }

    fn players(&self) -> usize {
        1
    }

    /// Populate a fresh world with the initial spawn configuration
    fn setup(&self, world: &mut World) -> Self::State;

    /// Collision table, checked in order every frame
    fn rules(&self) -> &[CollisionRule];

    /// Default key bindings for this game's control scheme
    fn bindings(&self) -> KeyBindings {
        KeyBindings::single_player()
    }

    /// Apply this frame's input to the player entities
    fn control(&self, world: &mut World, state: &mut Self::State, input: &InputFrame);

    /// Per-frame game logic after physics: spawners, hazards, difficulty
    fn update(&self, _world: &mut World, _state: &mut Self::State) {}

    /// React to collision results before removed entities are swept
    fn on_collisions(&self, _world: &mut World, _state: &mut Self::State, _events: &[CollisionEvent]) {}

    /// React to entities swept at the end of the frame
    fn on_removed(&self, _world: &mut World, _state: &mut Self::State, _removed: &[Entity]) {}

    /// Loss condition; checked first
    fn defeated(&self, world: &World, _state: &Self::State) -> bool {
        world.players().any(|p| !p.is_alive())
    }

    /// Frames left on a run timer; `Some(0)` ends the run. Checked second.
    fn time_left(&self, _world: &World, _state: &Self::State) -> Option<u32> {
        None
    }

    /// Explicit win (goal, lap or zone count reached). Checked last.
    fn goal_winner(&self, _world: &World, _state: &Self::State) -> Option<Winner> {
        None
    }

    /// Score recorded as the run's result
    fn final_score(&self, world: &World, _state: &Self::State) -> u64 {
        world.scores.best()
    }

    /// Extra HUD lines (label, value)
    fn hud(&self, _world: &World, _state: &Self::State) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Demo-mode input: a simple bot that plays the game
    fn autopilot(&self, _world: &World, _state: &Self::State) -> InputFrame {
        InputFrame::default()
    }
}
