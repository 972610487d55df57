//! Two-player hoops: most baskets before the clock runs out
//!
//! Each player runs and jumps along the floor and lobs balls toward the
//! hoop hanging in the middle of the court. A ball scores once for its
//! thrower when it touches the hoop and then disappears.

use crate::input::{Action, InputFrame, KeyBindings};
use crate::sim::{Arena, Category, CollisionRule, Effect, Entity, Game, World};
use crate::{secs_to_ticks, ticks_to_secs};

pub const NAME: &str = "hoops";

const WIDTH: f32 = 800.0;
/// Court height above the floor line
const HEIGHT: f32 = 390.0;

const PLAYER_SIZE: f32 = 30.0;
const PLAYER_SPEED: f32 = 5.0;
const PLAYER_GRAVITY: f32 = 0.8;
const JUMP_FORCE: f32 = -15.0;
/// Home x for each slot
const HOME_X: [f32; 2] = [50.0, WIDTH - 80.0];

const BALL_RADIUS: f32 = 10.0;
const SHOT_VX: f32 = 4.0;
const SHOT_VY: f32 = -10.0;
/// Ball acceleration relative to the player's
const BALL_GRAVITY_SCALE: f32 = 0.25;

const HOOP_WIDTH: f32 = 80.0;
const HOOP_HEIGHT: f32 = 10.0;
const HOOP_Y: f32 = 150.0;

const MATCH_SECONDS: f32 = 60.0;

static RULES: [CollisionRule; 1] = [CollisionRule::new(
    Category::Projectile,
    Category::Goal,
    Effect::Score { points: 1 },
)];

#[derive(Debug, Clone, Copy, Default)]
pub struct HoopsState;

#[derive(Debug, Clone, Copy, Default)]
pub struct Hoops;

impl Hoops {
    fn match_ticks() -> u32 {
        secs_to_ticks(MATCH_SECONDS)
    }

    /// Launch a ball from the top of a player, toward the hoop
    fn shoot(world: &mut World, slot: u8) {
        let Some(player) = world.player(slot) else {
            return;
        };
        let center_x = player.center().x;
        let top = player.pos.y;
        let vx = if center_x > WIDTH / 2.0 { -SHOT_VX } else { SHOT_VX };
        let diameter = BALL_RADIUS * 2.0;
        world.spawn(
            Entity::new(
                Category::Projectile,
                center_x - BALL_RADIUS,
                top - BALL_RADIUS,
                diameter,
                diameter,
            )
            .with_slot(slot)
            .with_velocity(vx, SHOT_VY)
            .with_gravity_scale(BALL_GRAVITY_SCALE),
        );
    }
}

impl Game for Hoops {
    type State = HoopsState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn gravity(&self) -> f32 {
        PLAYER_GRAVITY
    }

    fn players(&self) -> usize {
        2
    }

    fn bindings(&self) -> KeyBindings {
        KeyBindings::two_player()
    }

    fn setup(&self, world: &mut World) -> HoopsState {
        for (slot, x) in HOME_X.iter().enumerate() {
            world.spawn(
                Entity::player(slot as u8, *x, HEIGHT - PLAYER_SIZE, PLAYER_SIZE, PLAYER_SIZE).with_gravity_scale(1.0),
            );
        }
        world.spawn(Entity::new(
            Category::Goal,
            WIDTH / 2.0 - HOOP_WIDTH / 2.0,
            HOOP_Y,
            HOOP_WIDTH,
            HOOP_HEIGHT,
        ));
        HoopsState
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, _state: &mut HoopsState, input: &InputFrame) {
        for slot in 0..self.players() as u8 {
            if let Some(player) = world.player_mut(slot) {
                player.steer_x(input.axis_x(slot), PLAYER_SPEED);
                if input.was_pressed(slot, Action::Jump) || input.was_pressed(slot, Action::Up) {
                    player.try_jump(JUMP_FORCE);
                }
            }
            // Shooting works mid-jump
            if input.was_pressed(slot, Action::Shoot) {
                Self::shoot(world, slot);
            }
        }
    }

    fn defeated(&self, _world: &World, _state: &HoopsState) -> bool {
        false
    }

    fn time_left(&self, world: &World, _state: &HoopsState) -> Option<u32> {
        Some(Self::match_ticks().saturating_sub(world.frame() as u32))
    }

    fn hud(&self, world: &World, state: &HoopsState) -> Vec<(&'static str, String)> {
        let left = self.time_left(world, state).unwrap_or(0);
        vec![
            ("time", format!("{}s", ticks_to_secs(left))),
            ("p1", world.scores.get(0).to_string()),
            ("p2", world.scores.get(1).to_string()),
        ]
    }

    /// Each player walks home and shoots whenever its last ball is gone
    fn autopilot(&self, world: &World, _state: &HoopsState) -> InputFrame {
        let mut input = InputFrame::new();
        for (slot, home) in HOME_X.iter().enumerate() {
            let slot = slot as u8;
            let Some(player) = world.player(slot) else {
                continue;
            };
            let dx = home - player.pos.x;
            if dx.abs() >= PLAYER_SPEED {
                let action = if dx < 0.0 { Action::Left } else { Action::Right };
                input = input.hold(slot, action);
                continue;
            }
            let in_flight = world
                .of(Category::Projectile)
                .any(|ball| ball.slot == Some(slot));
            if !in_flight && player.flags.grounded {
                input = input.press(slot, Action::Shoot);
            }
        }
        input
    }
}
