//! Entities and the per-category behaviour table
//!
//! Every simulated object is an `Entity` tagged with a `Category`. The
//! category decides its default update rule, its look, and which collision
//! rules can match it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects::{EffectKind, Grant, HIGH_JUMP_FACTOR, PowerUp, StatusEffects};
use super::rect::{Arena, Rect};

/// Entity categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Player,
    Obstacle,
    Projectile,
    Pickup,
    Goal,
    Hazard,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Player,
        Category::Obstacle,
        Category::Projectile,
        Category::Pickup,
        Category::Goal,
        Category::Hazard,
    ];

    /// Default update rule for newly spawned entities of this category
    pub fn behavior(&self) -> Behavior {
        match self {
            Category::Player => Behavior {
                gravity_scale: 0.0,
                boundary: Boundary::Clamp,
                shape: Shape::Rect,
            },
            Category::Obstacle | Category::Pickup => Behavior {
                gravity_scale: 0.0,
                boundary: Boundary::Cull,
                shape: Shape::Rect,
            },
            Category::Projectile => Behavior {
                gravity_scale: 1.0,
                boundary: Boundary::Cull,
                shape: Shape::Circle,
            },
            Category::Goal | Category::Hazard => Behavior {
                gravity_scale: 0.0,
                boundary: Boundary::Free,
                shape: Shape::Rect,
            },
        }
    }
}

/// What happens when an entity meets the arena edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    /// Clamped inside the arena; landing on the floor grounds it
    Clamp,
    /// Clamped, and velocity reverses on the touched axis
    Bounce,
    /// Removed once it has left the arena
    Cull,
    /// No boundary handling
    Free,
}

/// Cosmetic shape hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Rect,
    Circle,
}

/// Per-category defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Behavior {
    pub gravity_scale: f32,
    pub boundary: Boundary,
    pub shape: Shape,
}

/// Status flags mutated by physics and collision effects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    pub grounded: bool,
    pub off_screen: bool,
    pub scored: bool,
    pub consumed: bool,
}

/// A simulated object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Assigned by the world on spawn, increasing in spawn order
    pub id: u32,
    pub category: Category,
    /// Player slot for players, owning player for projectiles
    pub slot: Option<u8>,
    pub pos: Vec2,
    /// Position at the start of the current step (push-back target)
    pub prev_pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub shape: Shape,
    pub gravity_scale: f32,
    pub boundary: Boundary,
    pub health: i32,
    /// Jumps available before the next grounding
    pub jumps_remaining: u8,
    /// Jumps restored on grounding, before effects
    pub base_jumps: u8,
    pub power_up: Option<PowerUp>,
    pub effects: StatusEffects,
    pub flags: Flags,
}

impl Entity {
    pub fn new(category: Category, x: f32, y: f32, w: f32, h: f32) -> Self {
        let behavior = category.behavior();
        let pos = Vec2::new(x, y);
        Self {
            id: 0,
            category,
            slot: None,
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            size: Vec2::new(w, h),
            shape: behavior.shape,
            gravity_scale: behavior.gravity_scale,
            boundary: behavior.boundary,
            health: 1,
            jumps_remaining: 0,
            base_jumps: 0,
            power_up: None,
            effects: StatusEffects::new(),
            flags: Flags::default(),
        }
    }

    /// A player in the given slot, starting grounded with one jump
    pub fn player(slot: u8, x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut e = Self::new(Category::Player, x, y, w, h);
        e.slot = Some(slot);
        e.base_jumps = 1;
        e.jumps_remaining = 1;
        e.flags.grounded = true;
        e
    }

    pub fn pickup(power_up: PowerUp, x: f32, y: f32, size: f32) -> Self {
        let mut e = Self::new(Category::Pickup, x, y, size, size);
        e.power_up = Some(power_up);
        e
    }

    pub fn with_velocity(mut self, vx: f32, vy: f32) -> Self {
        self.vel = Vec2::new(vx, vy);
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.health = health;
        self
    }

    pub fn with_slot(mut self, slot: u8) -> Self {
        self.slot = Some(slot);
        self
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Flagged for removal; skipped by every later collision check
    pub fn is_removed(&self) -> bool {
        self.flags.off_screen || self.flags.consumed
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn shielded(&self) -> bool {
        self.effects.is_active(EffectKind::Shield)
    }

    /// Jumps restored by a grounding event
    pub fn max_jumps(&self) -> u8 {
        if self.effects.is_active(EffectKind::DoubleJump) {
            self.base_jumps.max(1) + 1
        } else {
            self.base_jumps
        }
    }

    /// Spend a jump. Does nothing when no jumps remain.
    pub fn try_jump(&mut self, force: f32) -> bool {
        if self.jumps_remaining == 0 {
            return false;
        }
        let force = if self.effects.is_active(EffectKind::HighJump) {
            force * HIGH_JUMP_FACTOR
        } else {
            force
        };
        self.vel.y = force;
        self.jumps_remaining -= 1;
        self.flags.grounded = false;
        true
    }

    /// Set horizontal velocity from a -1..1 axis
    pub fn steer_x(&mut self, axis: f32, speed: f32) {
        self.vel.x = axis * speed;
    }

    /// Set vertical velocity from a -1..1 axis
    pub fn steer_y(&mut self, axis: f32, speed: f32) {
        self.vel.y = axis * speed;
    }

    /// Set both velocity components from an axis vector
    pub fn steer(&mut self, axis: Vec2, speed: f32) {
        self.vel = axis * speed;
    }

    /// Apply a power-up's grants. Double jump is usable immediately.
    pub fn apply_power_up(&mut self, power_up: PowerUp) {
        for grant in power_up.grants() {
            self.apply_grant(grant);
        }
    }

    pub fn apply_grant(&mut self, grant: Grant) {
        self.effects.apply(grant);
        if grant.kind == EffectKind::DoubleJump {
            self.jumps_remaining = self.max_jumps();
        }
    }

    /// One physics step: `v += a`, `p += v`, then boundary handling.
    pub fn integrate(&mut self, gravity: f32, arena: &Arena) {
        self.prev_pos = self.pos;
        self.vel.y += gravity * self.gravity_scale;
        self.pos += self.vel;
        self.apply_boundary(arena);
    }

    fn apply_boundary(&mut self, arena: &Arena) {
        match self.boundary {
            Boundary::Clamp => {
                let hits = arena.clamp(&mut self.pos, self.size);
                if hits.horizontal() {
                    self.vel.x = 0.0;
                }
                if hits.top && self.vel.y < 0.0 {
                    self.vel.y = 0.0;
                }
                if self.gravity_scale > 0.0 {
                    if hits.bottom {
                        self.land();
                    } else {
                        self.flags.grounded = false;
                    }
                } else if hits.bottom && self.vel.y > 0.0 {
                    self.vel.y = 0.0;
                }
            }
            Boundary::Bounce => {
                let hits = arena.clamp(&mut self.pos, self.size);
                if hits.horizontal() {
                    self.vel.x = -self.vel.x;
                }
                if hits.vertical() {
                    self.vel.y = -self.vel.y;
                }
            }
            Boundary::Cull => {
                if arena.departed(&self.rect(), self.vel) {
                    self.flags.off_screen = true;
                }
            }
            Boundary::Free => {}
        }
    }

    /// Grounding: stop falling and restore jumps
    fn land(&mut self) {
        if self.vel.y > 0.0 {
            self.vel.y = 0.0;
        }
        self.flags.grounded = true;
        self.jumps_remaining = self.max_jumps();
    }
}
