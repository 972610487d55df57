//! Two-player duel: knock the other fighter's health to zero
//!
//! Fighters run, jump and swing. An attack puts a short-lived strike box
//! in front of the attacker; the special move is a leaping dash that
//! carries a longer strike. A strike lands at most once and never on its
//! owner. The last fighter standing wins; a double knockout is a draw.

use crate::input::{Action, InputFrame, KeyBindings};
use crate::sim::{
    Arena, Boundary, Category, CollisionEvent, CollisionRule, Effect, Entity, Game, Rect, Shape, Winner, World,
};

pub const NAME: &str = "duel";

const WIDTH: f32 = 800.0;
/// Floor line
const HEIGHT: f32 = 390.0;

const GRAVITY: f32 = 0.8;
const FIGHTER_WIDTH: f32 = 50.0;
const FIGHTER_HEIGHT: f32 = 80.0;
const START_X: [f32; 2] = [100.0, 650.0];
const START_Y: f32 = 200.0;
const MOVE_SPEED: f32 = 5.0;
const JUMP_FORCE: f32 = -15.0;
pub const MAX_HEALTH: i32 = 100;

const STRIKE_WIDTH: f32 = 60.0;
const STRIKE_HEIGHT: f32 = 30.0;
pub const STRIKE_DAMAGE: i32 = 10;
const ATTACK_FRAMES: u32 = 6;
const ATTACK_COOLDOWN: u32 = 30;

const DASH_SPEED: f32 = 15.0;
const SPECIAL_FRAMES: u32 = 12;
const SPECIAL_COOLDOWN: u32 = 120;

static RULES: [CollisionRule; 1] = [CollisionRule::new(
    Category::Player,
    Category::Projectile,
    Effect::Damage { amount: STRIKE_DAMAGE },
)];

/// A live strike box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub id: u32,
    pub frames_left: u32,
    /// Part of a special dash; steering is locked until it ends
    pub dash: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Fighter {
    /// 1.0 facing right, -1.0 facing left
    pub facing: f32,
    pub attack_cooldown: u32,
    pub special_cooldown: u32,
    pub strike: Option<Strike>,
    pub hits: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DuelState {
    pub fighters: [Fighter; 2],
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Duel;

impl Duel {
    fn strike_rect(fighter: &Entity, facing: f32) -> Rect {
        let x = if facing > 0.0 {
            fighter.rect().right()
        } else {
            fighter.pos.x - STRIKE_WIDTH
        };
        Rect::new(
            x,
            fighter.pos.y + fighter.size.y / 2.0,
            STRIKE_WIDTH,
            STRIKE_HEIGHT,
        )
    }

    fn spawn_strike(world: &mut World, slot: u8, facing: f32, frames: u32, dash: bool) -> Option<Strike> {
        let rect = Self::strike_rect(world.player(slot)?, facing);
        let mut strike = Entity::new(Category::Projectile, rect.pos.x, rect.pos.y, rect.size.x, rect.size.y)
            .with_slot(slot)
            .with_gravity_scale(0.0)
            .with_boundary(Boundary::Free);
        strike.shape = Shape::Rect;
        let id = world.spawn(strike);
        Some(Strike {
            id,
            frames_left: frames,
            dash,
        })
    }

    fn health(world: &World, slot: u8) -> i32 {
        world.player(slot).map(|f| f.health.max(0)).unwrap_or(0)
    }
}

impl Game for Duel {
    type State = DuelState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn gravity(&self) -> f32 {
        GRAVITY
    }

    fn players(&self) -> usize {
        2
    }

    fn bindings(&self) -> KeyBindings {
        KeyBindings::two_player()
    }

    fn setup(&self, world: &mut World) -> DuelState {
        let mut state = DuelState::default();
        for (slot, x) in START_X.iter().enumerate() {
            world.spawn(
                Entity::player(slot as u8, *x, START_Y, FIGHTER_WIDTH, FIGHTER_HEIGHT)
                    .with_gravity_scale(1.0)
                    .with_health(MAX_HEALTH),
            );
            state.fighters[slot].facing = if slot == 0 { 1.0 } else { -1.0 };
        }
        state
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, state: &mut DuelState, input: &InputFrame) {
        for (slot, fighter) in state.fighters.iter_mut().enumerate() {
            let slot = slot as u8;
            let dashing = fighter.strike.is_some_and(|s| s.dash);
            let Some(body) = world.player_mut(slot) else {
                continue;
            };
            if !dashing {
                let axis = input.axis_x(slot);
                body.steer_x(axis, MOVE_SPEED);
                if axis != 0.0 {
                    fighter.facing = axis;
                }
            }
            if input.was_pressed(slot, Action::Jump) {
                body.try_jump(JUMP_FORCE);
            }

            if fighter.strike.is_some() {
                continue;
            }
            if input.was_pressed(slot, Action::Special) && fighter.special_cooldown == 0 {
                body.vel.x = DASH_SPEED * fighter.facing;
                body.vel.y = JUMP_FORCE;
                body.flags.grounded = false;
                fighter.strike = Self::spawn_strike(world, slot, fighter.facing, SPECIAL_FRAMES, true);
                fighter.special_cooldown = SPECIAL_COOLDOWN;
            } else if input.was_pressed(slot, Action::Shoot) && fighter.attack_cooldown == 0 {
                fighter.strike = Self::spawn_strike(world, slot, fighter.facing, ATTACK_FRAMES, false);
                fighter.attack_cooldown = ATTACK_COOLDOWN;
            }
        }
    }

    /// Cooldowns tick; live strikes follow their fighter until they expire
    fn update(&self, world: &mut World, state: &mut DuelState) {
        for (slot, fighter) in state.fighters.iter_mut().enumerate() {
            fighter.attack_cooldown = fighter.attack_cooldown.saturating_sub(1);
            fighter.special_cooldown = fighter.special_cooldown.saturating_sub(1);

            let Some(mut strike) = fighter.strike else {
                continue;
            };
            let rect = world.player(slot as u8).map(|body| Self::strike_rect(body, fighter.facing));
            match (world.get_mut(strike.id), rect) {
                (Some(entity), Some(rect)) if strike.frames_left > 0 && !entity.is_removed() => {
                    entity.pos = rect.pos;
                    strike.frames_left -= 1;
                    fighter.strike = Some(strike);
                }
                (Some(entity), _) => {
                    entity.flags.consumed = true;
                    fighter.strike = None;
                }
                (None, _) => fighter.strike = None,
            }
        }
    }

    fn on_collisions(&self, world: &mut World, state: &mut DuelState, events: &[CollisionEvent]) {
        for event in events {
            let CollisionEvent::Damaged { player, by, .. } = event else {
                continue;
            };
            let Some(attacker) = state
                .fighters
                .iter()
                .position(|f| f.strike.is_some_and(|s| s.id == *by))
            else {
                continue;
            };
            let fighter = &mut state.fighters[attacker];
            fighter.strike = None;
            fighter.hits += 1;
            world.scores.award(attacker as u8, STRIKE_DAMAGE as u64);
            log::debug!(
                "{}: player {} hit #{} ({} hp left)",
                NAME,
                attacker + 1,
                player,
                world.get(*player).map(|p| p.health).unwrap_or(0)
            );
        }
    }

    /// The health race is settled by the winner rule, not by defeat
    fn defeated(&self, _world: &World, _state: &DuelState) -> bool {
        false
    }

    fn goal_winner(&self, world: &World, _state: &DuelState) -> Option<Winner> {
        let down = |slot: u8| world.player(slot).is_none_or(|f| !f.is_alive());
        match (down(0), down(1)) {
            (true, true) => Some(Winner::Draw),
            (true, false) => Some(Winner::Player(1)),
            (false, true) => Some(Winner::Player(0)),
            (false, false) => None,
        }
    }

    fn hud(&self, world: &World, _state: &DuelState) -> Vec<(&'static str, String)> {
        vec![
            ("p1", format!("{}%", Self::health(world, 0))),
            ("p2", format!("{}%", Self::health(world, 1))),
        ]
    }

    /// Walk up to the other fighter and swing; player 1 also dashes in
    /// from long range
    fn autopilot(&self, world: &World, state: &DuelState) -> InputFrame {
        let mut input = InputFrame::new();
        for slot in 0..2u8 {
            let (Some(me), Some(foe)) = (world.player(slot), world.player(1 - slot)) else {
                continue;
            };
            let fighter = &state.fighters[slot as usize];
            let dx = foe.center().x - me.center().x;
            let toward = if dx < 0.0 { Action::Left } else { Action::Right };
            let gap = dx.abs() - FIGHTER_WIDTH;

            if gap > STRIKE_WIDTH * 3.0 && slot == 0 && fighter.special_cooldown == 0 && me.flags.grounded {
                input = input.hold(slot, toward).press(slot, Action::Special);
            } else if gap > STRIKE_WIDTH / 2.0 {
                input = input.hold(slot, toward);
            } else if fighter.facing * dx < 0.0 {
                // Turn around before swinging
                input = input.hold(slot, toward);
            } else if fighter.attack_cooldown == 0 && fighter.strike.is_none() {
                input = input.press(slot, Action::Shoot);
            }
        }
        input
    }
}
