//! One simulation step
//!
//! Order within a frame is fixed: timers, input, physics, game logic,
//! collision resolution, reactions, then the removal sweep.

use super::collision::CollisionEvent;
use super::entity::Entity;
use super::game::Game;
use super::world::World;
use crate::input::InputFrame;

/// What happened during a step
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub events: Vec<CollisionEvent>,
    pub removed: Vec<Entity>,
}

/// Advance the world by one frame
pub fn step<G: Game>(game: &G, world: &mut World, state: &mut G::State, input: &InputFrame) -> StepReport {
    world.begin_frame();

    game.control(world, state, input);
    world.integrate();
    game.update(world, state);

    let events = world.resolve(game.rules());
    if !events.is_empty() {
        game.on_collisions(world, state, &events);
    }

    let removed = world.sweep();
    if !removed.is_empty() {
        game.on_removed(world, state, &removed);
    }

    StepReport { events, removed }
}
