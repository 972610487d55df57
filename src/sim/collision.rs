//! AABB collision detection and table-driven resolution
//!
//! Games declare which category pairs interact and what happens when they
//! touch. The resolver walks the table once per frame. Entities resolved
//! away (consumed pickups, scored projectiles, destroyed obstacles) are only
//! flagged here; every later check skips them and `World::sweep` drops them
//! after the pass.

use super::entity::{Category, Entity};
use super::effects::{EffectKind, PowerUp};

/// Strict axis-aligned overlap between two entities
#[inline]
pub fn aabb(a: &Entity, b: &Entity) -> bool {
    a.rect().overlaps(&b.rect())
}

/// Resolution effect for a matching pair. `first` is the entity of the
/// rule's first category (the player for every player rule).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Undo the first entity's movement for this frame
    PushBack,
    /// First collects the second's power-up; second is removed
    Collect,
    /// Shield is consumed and first is lifted above second; otherwise first
    /// dies. A lift that would leave the arena top is a kill too.
    Hazard,
    /// A shield charge absorbs and removes second; otherwise first dies
    Lethal,
    /// A shield charge absorbs; otherwise first loses `amount` health.
    /// Second is removed either way.
    Damage { amount: i32 },
    /// First (a projectile) scores `points` for its owner once, then is removed
    Score { points: u64 },
    /// First touched an exit
    ReachGoal,
    /// First is pushed out of second along the shallower overlap axis and
    /// its velocity on that axis turns away from second
    Bounce,
}

/// One row of a game's collision table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRule {
    pub first: Category,
    pub second: Category,
    pub effect: Effect,
}

impl CollisionRule {
    pub const fn new(first: Category, second: Category, effect: Effect) -> Self {
        Self {
            first,
            second,
            effect,
        }
    }
}

/// Something the resolver did, for the game to react to
#[derive(Debug, Clone, PartialEq)]
pub enum CollisionEvent {
    PushedBack { entity: u32, obstacle: u32 },
    Collected { player: u32, pickup: u32, power_up: PowerUp },
    ShieldAbsorbed { player: u32, by: u32 },
    Killed { player: u32, by: u32 },
    Damaged { player: u32, by: u32, amount: i32 },
    Scored { projectile: u32, slot: Option<u8>, points: u64 },
    GoalReached { player: u32, goal: u32 },
    Bounced { entity: u32, off: u32 },
}

/// Per-slot scores; only ever increases until the world is replaced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    scores: Vec<u64>,
}

impl Scoreboard {
    pub fn new(slots: usize) -> Self {
        Self {
            scores: vec![0; slots.max(1)],
        }
    }

    pub fn award(&mut self, slot: u8, points: u64) {
        let slot = slot as usize;
        if slot >= self.scores.len() {
            self.scores.resize(slot + 1, 0);
        }
        self.scores[slot] = self.scores[slot].saturating_add(points);
    }

    /// Raise a slot to at least `value` (for scores derived from a counter)
    pub fn raise_to(&mut self, slot: u8, value: u64) {
        let current = self.get(slot);
        if value > current {
            self.award(slot, value - current);
        }
    }

    pub fn get(&self, slot: u8) -> u64 {
        self.scores.get(slot as usize).copied().unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.scores
    }

    pub fn best(&self) -> u64 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.scores.iter().sum()
    }
}

/// A projectile never hits the player that owns it
fn owned_by(projectile: &Entity, player: &Entity) -> bool {
    projectile.category == Category::Projectile
        && player.category == Category::Player
        && projectile.slot.is_some()
        && projectile.slot == player.slot
}

/// Mutable references to two distinct elements
fn pair_mut(entities: &mut [Entity], i: usize, j: usize) -> (&mut Entity, &mut Entity) {
    debug_assert_ne!(i, j);
    if i < j {
        let (left, right) = entities.split_at_mut(j);
        (&mut left[i], &mut right[0])
    } else {
        let (left, right) = entities.split_at_mut(i);
        (&mut right[0], &mut left[j])
    }
}

/// Run every rule over the entity list once
pub fn resolve(
    entities: &mut [Entity],
    rules: &[CollisionRule],
    scores: &mut Scoreboard,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();

    for rule in rules {
        for i in 0..entities.len() {
            if entities[i].category != rule.first {
                continue;
            }
            for j in 0..entities.len() {
                if i == j || entities[j].category != rule.second {
                    continue;
                }
                // First may have been resolved away by an earlier match
                if entities[i].is_removed() {
                    break;
                }
                if entities[j].is_removed() || !aabb(&entities[i], &entities[j]) {
                    continue;
                }
                if owned_by(&entities[i], &entities[j]) || owned_by(&entities[j], &entities[i]) {
                    continue;
                }
                let (a, b) = pair_mut(entities, i, j);
                if let Some(event) = apply(rule.effect, a, b, scores) {
                    events.push(event);
                }
            }
        }
    }

    events
}

fn apply(effect: Effect, a: &mut Entity, b: &mut Entity, scores: &mut Scoreboard) -> Option<CollisionEvent> {
    match effect {
        Effect::PushBack => {
            a.pos = a.prev_pos;
            Some(CollisionEvent::PushedBack {
                entity: a.id,
                obstacle: b.id,
            })
        }
        Effect::Collect => {
            let power_up = b.power_up?;
            a.apply_power_up(power_up);
            b.flags.consumed = true;
            Some(CollisionEvent::Collected {
                player: a.id,
                pickup: b.id,
                power_up,
            })
        }
        Effect::Hazard => {
            let lifted = b.pos.y - a.size.y;
            if lifted >= 0.0 && a.effects.consume(EffectKind::Shield) {
                a.pos.y = lifted;
                a.vel.y = a.vel.y.min(0.0);
                Some(CollisionEvent::ShieldAbsorbed {
                    player: a.id,
                    by: b.id,
                })
            } else {
                a.health = 0;
                Some(CollisionEvent::Killed {
                    player: a.id,
                    by: b.id,
                })
            }
        }
        Effect::Lethal => {
            if a.effects.absorb(EffectKind::Shield) {
                b.flags.consumed = true;
                Some(CollisionEvent::ShieldAbsorbed {
                    player: a.id,
                    by: b.id,
                })
            } else {
                a.health = 0;
                Some(CollisionEvent::Killed {
                    player: a.id,
                    by: b.id,
                })
            }
        }
        Effect::Damage { amount } => {
            b.flags.consumed = true;
            if a.effects.absorb(EffectKind::Shield) {
                Some(CollisionEvent::ShieldAbsorbed {
                    player: a.id,
                    by: b.id,
                })
            } else {
                a.health -= amount;
                Some(CollisionEvent::Damaged {
                    player: a.id,
                    by: b.id,
                    amount,
                })
            }
        }
        Effect::Score { points } => {
            if a.flags.scored {
                return None;
            }
            a.flags.scored = true;
            a.flags.consumed = true;
            if let Some(slot) = a.slot {
                scores.award(slot, points);
            }
            Some(CollisionEvent::Scored {
                projectile: a.id,
                slot: a.slot,
                points,
            })
        }
        Effect::ReachGoal => Some(CollisionEvent::GoalReached {
            player: a.id,
            goal: b.id,
        }),
        Effect::Bounce => {
            bounce(a, b);
            Some(CollisionEvent::Bounced {
                entity: a.id,
                off: b.id,
            })
        }
    }
}

fn bounce(a: &mut Entity, b: &Entity) {
    let (ra, rb) = (a.rect(), b.rect());
    let overlap_x = ra.right().min(rb.right()) - ra.left().max(rb.left());
    let overlap_y = ra.bottom().min(rb.bottom()) - ra.top().max(rb.top());
    if overlap_x <= overlap_y {
        if ra.center().x < rb.center().x {
            a.pos.x = rb.left() - a.size.x;
            a.vel.x = -a.vel.x.abs();
        } else {
            a.pos.x = rb.right();
            a.vel.x = a.vel.x.abs();
        }
    } else if ra.center().y < rb.center().y {
        a.pos.y = rb.top() - a.size.y;
        a.vel.y = -a.vel.y.abs();
    } else {
        a.pos.y = rb.bottom();
        a.vel.y = a.vel.y.abs();
    }
}
