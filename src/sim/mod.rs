//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call = one frame)
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod entity;
pub mod game;
pub mod rect;
pub mod tick;
pub mod timer;
pub mod world;

pub use collision::{CollisionEvent, CollisionRule, Effect, Scoreboard, aabb};
pub use difficulty::Ramp;
pub use effects::{EffectKind, Grant, PowerUp, StatusEffect, StatusEffects};
pub use entity::{Behavior, Boundary, Category, Entity, Flags, Shape};
pub use game::{Game, Winner};
pub use rect::{Arena, Rect};
pub use tick::{StepReport, step};
pub use timer::{FrameTimer, Timers};
pub use world::World;
