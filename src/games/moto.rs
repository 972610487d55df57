//! Moto dodge: steer the bike around falling blocks
//!
//! Blocks drop from the top of the screen at random columns. Each hit costs
//! health; the run ends when health reaches zero. Every block that falls
//! past the bottom counts as a dodge. Blocks spawn more often and fall
//! faster the longer the run lasts.

use rand::Rng;

use crate::input::{Action, InputFrame};
use crate::sim::{Arena, Category, CollisionEvent, CollisionRule, Effect, Entity, FrameTimer, Game, Ramp, World};

pub const NAME: &str = "moto";

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

const BIKE_WIDTH: f32 = 50.0;
const BIKE_HEIGHT: f32 = 80.0;
/// Gap between the bike and the bottom edge
const BIKE_FLOOR_GAP: f32 = 20.0;
const BIKE_SPEED: f32 = 8.0;
pub const MAX_HEALTH: i32 = 100;
pub const HIT_DAMAGE: i32 = 20;

const BLOCK_SIZE: f32 = 50.0;
const BLOCK_MIN_SPEED: f32 = 4.0;
const BLOCK_SPEED_SPREAD: f32 = 2.0;

/// Frames between blocks by elapsed frames
pub const SPAWN_INTERVAL: Ramp = Ramp::new(90.0, -5.0, 600, 45.0);
/// Extra fall speed by elapsed frames
pub const SPEED_BONUS: Ramp = Ramp::new(0.0, 0.25, 600, 3.0);

const SPAWN_TIMER: &str = "block";

static RULES: [CollisionRule; 1] = [CollisionRule::new(
    Category::Player,
    Category::Obstacle,
    Effect::Damage { amount: HIT_DAMAGE },
)];

#[derive(Debug, Clone, Default)]
pub struct MotoState {
    pub hits: u32,
    pub dodged: u64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Moto;

impl Moto {
    fn spawn_block(world: &mut World) {
        let x = world.rng().random_range(0.0..WIDTH - BLOCK_SIZE);
        let speed = BLOCK_MIN_SPEED
            + world.rng().random_range(0.0..BLOCK_SPEED_SPREAD)
            + SPEED_BONUS.at(world.frame());
        world.spawn(Entity::new(Category::Obstacle, x, -BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE).with_velocity(0.0, speed));
    }
}

impl Game for Moto {
    type State = MotoState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn setup(&self, world: &mut World) -> MotoState {
        world.spawn(
            Entity::player(
                0,
                WIDTH / 2.0 - BIKE_WIDTH / 2.0,
                HEIGHT - BIKE_HEIGHT - BIKE_FLOOR_GAP,
                BIKE_WIDTH,
                BIKE_HEIGHT,
            )
            .with_health(MAX_HEALTH),
        );
        Self::spawn_block(world);
        world
            .timers
            .set(SPAWN_TIMER, FrameTimer::every(SPAWN_INTERVAL.ticks_at(0)));
        MotoState::default()
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, _state: &mut MotoState, input: &InputFrame) {
        if let Some(bike) = world.player_mut(0) {
            bike.steer_x(input.axis_x(0), BIKE_SPEED);
        }
    }

    fn update(&self, world: &mut World, _state: &mut MotoState) {
        if world.timers.fired(SPAWN_TIMER) {
            Self::spawn_block(world);
            let interval = SPAWN_INTERVAL.ticks_at(world.frame());
            world.timers.set_period(SPAWN_TIMER, interval);
        }
    }

    fn on_collisions(&self, _world: &mut World, state: &mut MotoState, events: &[CollisionEvent]) {
        state.hits += events
            .iter()
            .filter(|e| matches!(e, CollisionEvent::Damaged { .. }))
            .count() as u32;
    }

    /// Blocks that fell off the bottom count as dodged; blocks that hit the
    /// bike were consumed and do not
    fn on_removed(&self, world: &mut World, state: &mut MotoState, removed: &[Entity]) {
        let dodged = removed
            .iter()
            .filter(|e| e.category == Category::Obstacle && e.flags.off_screen && !e.flags.consumed)
            .count() as u64;
        if dodged > 0 {
            state.dodged += dodged;
            world.scores.award(0, dodged);
        }
    }

    fn hud(&self, world: &World, state: &MotoState) -> Vec<(&'static str, String)> {
        let health = world.player(0).map(|b| b.health.max(0)).unwrap_or(0);
        vec![
            ("health", format!("{health}%")),
            ("hits", state.hits.to_string()),
        ]
    }

    /// Slide away from the lowest block that is about to land on the bike
    fn autopilot(&self, world: &World, _state: &MotoState) -> InputFrame {
        let Some(bike) = world.player(0) else {
            return InputFrame::new();
        };
        let margin = BIKE_SPEED * 2.0;
        let (left, right) = (bike.pos.x - margin, bike.rect().right() + margin);
        let threat = world
            .of(Category::Obstacle)
            .filter(|b| b.rect().bottom() <= bike.rect().bottom() && b.pos.x < right && b.rect().right() > left)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

        let Some(block) = threat else {
            return InputFrame::new();
        };
        // Dodge toward whichever side has room, preferring the shorter move
        let go_left = bike.pos.x + BIKE_WIDTH / 2.0 < block.center().x;
        let room_left = block.pos.x >= BIKE_WIDTH + margin;
        let room_right = WIDTH - block.rect().right() >= BIKE_WIDTH + margin;
        let action = match (go_left, room_left, room_right) {
            (true, true, _) | (false, true, false) => Action::Left,
            _ => Action::Right,
        };
        InputFrame::new().hold(0, action)
    }
}
