//! The world: every live entity plus the global simulation parameters
//!
//! The world owns its entities outright. Nothing outside holds on to an
//! entity between frames; callers look entities up by id or slot.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::{CollisionEvent, CollisionRule, Scoreboard, resolve};
use super::entity::{Category, Entity};
use super::rect::Arena;
use super::timer::Timers;

pub struct World {
    pub arena: Arena,
    /// Downward acceleration per frame, scaled per entity
    pub gravity: f32,
    pub scores: Scoreboard,
    pub timers: Timers,
    frame: u64,
    seed: u64,
    rng: Pcg32,
    /// Spawn order is preserved; ids increase monotonically
    entities: Vec<Entity>,
    next_id: u32,
}

impl World {
    pub fn new(arena: Arena, seed: u64) -> Self {
        Self {
            arena,
            gravity: 0.0,
            scores: Scoreboard::new(1),
            timers: Timers::new(),
            frame: 0,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            entities: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_players(mut self, slots: usize) -> Self {
        self.scores = Scoreboard::new(slots);
        self
    }

    /// Frames stepped since the world was created
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The world's random source. Seeded from the run seed, so a replayed run
    /// draws the same numbers.
    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Add an entity, assigning its id
    pub fn spawn(&mut self, mut entity: Entity) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        entity.prev_pos = entity.pos;
        log::debug!(
            "frame {}: spawn {:?} #{} at ({:.0}, {:.0})",
            self.frame,
            entity.category,
            id,
            entity.pos.x,
            entity.pos.y
        );
        self.entities.push(entity);
        id
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn player(&self, slot: u8) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.category == Category::Player && e.slot == Some(slot))
    }

    pub fn player_mut(&mut self, slot: u8) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.category == Category::Player && e.slot == Some(slot))
    }

    pub fn players(&self) -> impl Iterator<Item = &Entity> {
        self.of(Category::Player)
    }

    /// Live entities of one category, in spawn order
    pub fn of(&self, category: Category) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.category == category && !e.is_removed())
    }

    pub fn of_mut(&mut self, category: Category) -> impl Iterator<Item = &mut Entity> {
        self.entities
            .iter_mut()
            .filter(move |e| e.category == category && !e.is_removed())
    }

    pub fn count(&self, category: Category) -> usize {
        self.of(category).count()
    }

    /// Drop every entity of a category immediately (level regeneration)
    pub fn clear(&mut self, category: Category) {
        self.entities.retain(|e| e.category != category);
    }

    /// Start a new frame: bump the counter and advance timers
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.timers.advance();
    }

    /// Physics for every live entity, then status effect timers
    pub fn integrate(&mut self) {
        let gravity = self.gravity;
        let arena = self.arena;
        for entity in self.entities.iter_mut().filter(|e| !e.is_removed()) {
            entity.integrate(gravity, &arena);
            for kind in entity.effects.tick() {
                log::debug!("frame {}: #{} {:?} expired", self.frame, entity.id, kind);
            }
        }
    }

    /// One collision pass over the rule table
    pub fn resolve(&mut self, rules: &[CollisionRule]) -> Vec<CollisionEvent> {
        resolve(&mut self.entities, rules, &mut self.scores)
    }

    /// Remove everything flagged during the frame. Returns the removed
    /// entities in spawn order.
    pub fn sweep(&mut self) -> Vec<Entity> {
        if !self.entities.iter().any(|e| e.is_removed()) {
            return Vec::new();
        }
        let (removed, kept): (Vec<Entity>, Vec<Entity>) =
            std::mem::take(&mut self.entities).into_iter().partition(|e| e.is_removed());
        self.entities = kept;
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Effect;
    use crate::sim::effects::PowerUp;
    use crate::sim::entity::Boundary;
    use proptest::prelude::*;

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut world = World::new(Arena::new(100.0, 100.0), 1);
        let a = world.spawn(Entity::new(Category::Obstacle, 0.0, 0.0, 1.0, 1.0));
        let b = world.spawn(Entity::new(Category::Pickup, 0.0, 0.0, 1.0, 1.0));
        assert!(b > a);
        assert_eq!(world.entities()[0].id, a);
        assert_eq!(world.get(b).map(|e| e.category), Some(Category::Pickup));
    }

    #[test]
    fn test_sweep_after_resolution() {
        let mut world = World::new(Arena::new(100.0, 100.0), 1);
        world.spawn(Entity::player(0, 10.0, 10.0, 20.0, 20.0));
        let pickup = world.spawn(Entity::pickup(PowerUp::Shield, 15.0, 15.0, 10.0));

        let rules = [CollisionRule::new(Category::Player, Category::Pickup, Effect::Collect)];
        let events = world.resolve(&rules);
        assert_eq!(events.len(), 1);

        // Still in the list until the sweep, but no longer live
        assert!(world.get(pickup).is_some());
        assert_eq!(world.count(Category::Pickup), 0);

        let removed = world.sweep();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id, pickup);
        assert!(world.get(pickup).is_none());
    }

    #[test]
    fn test_projectile_scores_once_in_the_same_pass() {
        // Ball launched at (215, 570) with dy = -10 under 0.2 gravity
        let mut world = World::new(Arena::new(800.0, 600.0), 1)
            .with_gravity(0.2)
            .with_players(2);
        let ball = world.spawn(
            Entity::new(Category::Projectile, 215.0, 570.0, 20.0, 20.0)
                .with_velocity(0.0, -10.0)
                .with_slot(0),
        );
        let hoop = Entity::new(Category::Goal, 200.0, 400.0, 80.0, 10.0);
        let hoop_rect = hoop.rect();
        world.spawn(hoop);

        let rules = [CollisionRule::new(
            Category::Projectile,
            Category::Goal,
            Effect::Score { points: 1 },
        )];

        let mut scored_on = None;
        for frame in 1..=200 {
            world.begin_frame();
            world.integrate();
            let touching = world
                .get(ball)
                .map(|b| b.rect().overlaps(&hoop_rect))
                .unwrap_or(false);
            let events = world.resolve(&rules);

            if touching && scored_on.is_none() {
                scored_on = Some(frame);
                assert_eq!(events.len(), 1);
                assert_eq!(world.scores.get(0), 1);
                assert!(world.get(ball).is_some_and(|b| b.flags.scored && b.is_removed()));
            }
            world.sweep();
            if scored_on.is_some() {
                assert!(world.get(ball).is_none(), "removed in the scoring frame");
            }
        }

        assert!(scored_on.is_some());
        assert_eq!(world.scores.get(0), 1);
        assert_eq!(world.scores.get(1), 0);
    }

    #[test]
    fn test_two_entity_push_back() {
        let mut world = World::new(Arena::new(800.0, 600.0), 1);
        let player = world.spawn(Entity::player(0, 100.0, 100.0, 20.0, 20.0).with_velocity(5.0, 0.0));
        world.spawn(Entity::new(Category::Obstacle, 115.0, 100.0, 50.0, 10.0));

        world.begin_frame();
        world.integrate();
        assert_eq!(world.get(player).map(|p| p.pos.x), Some(105.0));

        let rules = [CollisionRule::new(Category::Player, Category::Obstacle, Effect::PushBack)];
        world.resolve(&rules);
        assert_eq!(world.get(player).map(|p| p.pos.x), Some(100.0));
    }

    #[test]
    fn test_same_seed_same_draws() {
        use rand::Rng;
        let mut a = World::new(Arena::new(1.0, 1.0), 42);
        let mut b = World::new(Arena::new(1.0, 1.0), 42);
        let xs: Vec<u32> = (0..8).map(|_| a.rng().random()).collect();
        let ys: Vec<u32> = (0..8).map(|_| b.rng().random()).collect();
        assert_eq!(xs, ys);
    }

    proptest! {
        /// Clamped entities never leave the arena, whatever they start with
        #[test]
        fn prop_clamp_keeps_entities_inside(
            x in -500.0f32..1500.0,
            y in -500.0f32..1500.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            w in 1.0f32..100.0,
            h in 1.0f32..100.0,
            gravity in 0.0f32..2.0,
            bounce in any::<bool>(),
            steps in 1usize..50,
        ) {
            let arena = Arena::new(800.0, 600.0);
            let mut world = World::new(arena, 7).with_gravity(gravity);
            let boundary = if bounce { Boundary::Bounce } else { Boundary::Clamp };
            let id = world.spawn(
                Entity::player(0, x, y, w, h)
                    .with_velocity(vx, vy)
                    .with_gravity_scale(1.0)
                    .with_boundary(boundary),
            );
            for _ in 0..steps {
                world.begin_frame();
                world.integrate();
                let e = world.get(id).unwrap();
                prop_assert!(e.pos.x >= 0.0 && e.pos.x <= arena.width - w);
                prop_assert!(e.pos.y >= 0.0 && e.pos.y <= arena.height - h);
            }
        }
    }
}
