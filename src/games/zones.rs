//! Zone climb: reach the exit before the lava does
//!
//! Each zone is a fresh random layout of walls, moving platforms and shield
//! pickups with an exit in the top-right corner. Lava starts rising from the
//! floor a few seconds into the zone, faster in every later zone. A shield
//! survives one lava contact. Clearing the last zone wins.

use glam::Vec2;
use rand::Rng;

use crate::input::{Action, InputFrame};
use crate::sim::{
    Arena, Boundary, Category, CollisionEvent, CollisionRule, Effect, EffectKind, Entity, FrameTimer, Game, PowerUp,
    Ramp, Rect, Winner, World,
};
use crate::{secs_to_ticks, ticks_to_secs};

pub const NAME: &str = "zones";

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 600.0;

const PLAYER_SIZE: f32 = 20.0;
const PLAYER_SPEED: f32 = 5.0;
/// Gap between the player's start position and the floor
const FLOOR_GAP: f32 = 10.0;

const WALLS: usize = 10;
const WALL_SIZE: Vec2 = Vec2::new(50.0, 10.0);
const SHIELDS: usize = 3;
const SHIELD_SIZE: f32 = 20.0;
const PLATFORMS: usize = 5;
const PLATFORM_SIZE: Vec2 = Vec2::new(80.0, 10.0);
const PLATFORM_SPEED: f32 = 2.0;
const EXIT_SIZE: Vec2 = Vec2::new(30.0, 50.0);

pub const TOTAL_ZONES: u32 = 3;
/// Lava speed in px/frame by zone index
pub const LAVA_SPEED: Ramp = Ramp::new(0.5, 0.2, 1, 0.9);
const LAVA_TIMER: &str = "lava";
/// Frames of survival per point
const FRAMES_PER_POINT: u64 = 60;

static RULES: [CollisionRule; 4] = [
    CollisionRule::new(Category::Player, Category::Pickup, Effect::Collect),
    CollisionRule::new(Category::Player, Category::Obstacle, Effect::PushBack),
    CollisionRule::new(Category::Player, Category::Goal, Effect::ReachGoal),
    CollisionRule::new(Category::Player, Category::Hazard, Effect::Hazard),
];

fn lava_delay() -> u32 {
    secs_to_ticks(3.0)
}

fn start_pos() -> Vec2 {
    Vec2::new(WIDTH / 2.0 - PLAYER_SIZE / 2.0, HEIGHT - PLAYER_SIZE - FLOOR_GAP)
}

/// Per-run state
#[derive(Debug, Clone, Default)]
pub struct ZonesState {
    /// Zero-based index of the current zone
    pub zone: u32,
    pub lava_height: f32,
    pub lava_started: bool,
    /// Entity id of the lava hazard
    pub lava: u32,
    pub won: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Zones;

impl Zones {
    /// Random spot for a `size` box that keeps clear of the start position
    fn place(world: &mut World, size: Vec2) -> Vec2 {
        let start = start_pos();
        let safe = Rect::new(
            start.x - FLOOR_GAP,
            start.y - FLOOR_GAP,
            PLAYER_SIZE + 2.0 * FLOOR_GAP,
            PLAYER_SIZE + 2.0 * FLOOR_GAP,
        );
        let mut spot = Vec2::ZERO;
        for _ in 0..16 {
            spot.x = world.rng().random_range(0.0..WIDTH - size.x);
            spot.y = world.rng().random_range(0.0..HEIGHT - size.y);
            let candidate = Rect { pos: spot, size };
            if !candidate.overlaps(&safe) {
                break;
            }
        }
        spot
    }

    /// Replace the current layout with a fresh random one
    fn generate_level(world: &mut World) {
        world.clear(Category::Obstacle);
        world.clear(Category::Pickup);
        world.clear(Category::Goal);

        for _ in 0..WALLS {
            let p = Self::place(world, WALL_SIZE);
            world.spawn(Entity::new(Category::Obstacle, p.x, p.y, WALL_SIZE.x, WALL_SIZE.y).with_boundary(Boundary::Free));
        }
        for _ in 0..SHIELDS {
            let p = Self::place(world, Vec2::splat(SHIELD_SIZE));
            world.spawn(Entity::pickup(PowerUp::Shield, p.x, p.y, SHIELD_SIZE));
        }
        for _ in 0..PLATFORMS {
            let p = Self::place(world, PLATFORM_SIZE);
            world.spawn(
                Entity::new(Category::Obstacle, p.x, p.y, PLATFORM_SIZE.x, PLATFORM_SIZE.y)
                    .with_velocity(PLATFORM_SPEED, 0.0)
                    .with_boundary(Boundary::Bounce),
            );
        }
        world.spawn(Entity::new(
            Category::Goal,
            WIDTH - EXIT_SIZE.x,
            0.0,
            EXIT_SIZE.x,
            EXIT_SIZE.y,
        ));
    }

    fn advance_zone(world: &mut World, state: &mut ZonesState) {
        state.zone += 1;
        if state.zone >= TOTAL_ZONES {
            state.won = true;
            log::info!("{}: all {} zones cleared", NAME, TOTAL_ZONES);
            return;
        }
        log::info!(
            "{}: zone {} of {}, lava at {:.1} px/frame",
            NAME,
            state.zone + 1,
            TOTAL_ZONES,
            LAVA_SPEED.at(state.zone as u64)
        );

        if let Some(player) = world.player_mut(0) {
            player.pos = start_pos();
            player.prev_pos = player.pos;
            player.vel = Vec2::ZERO;
        }
        state.lava_height = 0.0;
        state.lava_started = false;
        Self::sync_lava(world, state);
        world.timers.set(LAVA_TIMER, FrameTimer::once(lava_delay()));
        Self::generate_level(world);
    }

    fn sync_lava(world: &mut World, state: &ZonesState) {
        if let Some(lava) = world.get_mut(state.lava) {
            lava.pos.y = HEIGHT - state.lava_height;
            lava.size.y = state.lava_height;
        }
    }
}

fn direction_action(dx: f32) -> Action {
    if dx < 0.0 { Action::Left } else { Action::Right }
}

impl Game for Zones {
    type State = ZonesState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn setup(&self, world: &mut World) -> ZonesState {
        let start = start_pos();
        world.spawn(Entity::player(0, start.x, start.y, PLAYER_SIZE, PLAYER_SIZE));
        let lava = world.spawn(Entity::new(Category::Hazard, 0.0, HEIGHT, WIDTH, 0.0));
        Self::generate_level(world);
        world.timers.set(LAVA_TIMER, FrameTimer::once(lava_delay()));
        ZonesState {
            lava,
            ..ZonesState::default()
        }
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, _state: &mut ZonesState, input: &InputFrame) {
        if let Some(player) = world.player_mut(0) {
            player.steer(input.axis(0), PLAYER_SPEED);
        }
    }

    fn update(&self, world: &mut World, state: &mut ZonesState) {
        if world.timers.fired(LAVA_TIMER) {
            state.lava_started = true;
            log::info!("{}: lava rising in zone {}", NAME, state.zone + 1);
        }
        if state.lava_started {
            state.lava_height = (state.lava_height + LAVA_SPEED.at(state.zone as u64)).min(HEIGHT);
            Self::sync_lava(world, state);
        }
        let points = world.frame() / FRAMES_PER_POINT;
        world.scores.raise_to(0, points);
    }

    fn on_collisions(&self, world: &mut World, state: &mut ZonesState, events: &[CollisionEvent]) {
        let reached = events
            .iter()
            .any(|e| matches!(e, CollisionEvent::GoalReached { .. }));
        if reached && !state.won {
            Self::advance_zone(world, state);
        }
    }

    fn goal_winner(&self, _world: &World, state: &ZonesState) -> Option<Winner> {
        state.won.then_some(Winner::Player(0))
    }

    fn hud(&self, world: &World, state: &ZonesState) -> Vec<(&'static str, String)> {
        let mut hud = vec![(
            "zone",
            format!("{}/{}", (state.zone + 1).min(TOTAL_ZONES), TOTAL_ZONES),
        )];
        match world.timers.remaining(LAVA_TIMER) {
            Some(ticks) if !state.lava_started => hud.push(("lava in", format!("{}s", ticks_to_secs(ticks)))),
            _ => hud.push(("lava", format!("{:.0}px", state.lava_height))),
        }
        if let Some(player) = world.player(0) {
            let shield = player.effects.remaining(EffectKind::Shield);
            if shield > 0 {
                hud.push(("shield", format!("{}s", ticks_to_secs(shield))));
            }
        }
        hud
    }

    /// Climb toward the exit, sidestepping whatever blocks the way
    fn autopilot(&self, world: &World, _state: &ZonesState) -> InputFrame {
        let mut input = InputFrame::new();
        let Some(player) = world.player(0) else {
            return input;
        };
        let target = world
            .of(Category::Goal)
            .next()
            .map(|g| g.center())
            .unwrap_or(Vec2::new(WIDTH, 0.0));

        let blocked = |dx: f32, dy: f32| {
            let probe = Rect {
                pos: player.pos + Vec2::new(dx, dy) * PLAYER_SPEED,
                size: player.size,
            };
            world.of(Category::Obstacle).any(|o| o.rect().overlaps(&probe))
        };

        let up_open = player.pos.y > 0.0 && !blocked(0.0, -1.0);
        if up_open {
            input = input.hold(0, Action::Up);
        }

        let dx = target.x - player.center().x;
        let toward = dx.signum();
        if dx.abs() > PLAYER_SPEED && !blocked(toward, 0.0) {
            input = input.hold(0, direction_action(toward));
        } else if !up_open && !blocked(-toward, 0.0) {
            input = input.hold(0, direction_action(-toward));
        }
        input
    }
}
