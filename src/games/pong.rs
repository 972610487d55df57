//! Two-player pong: first to five points
//!
//! The ball bounces off the top and bottom walls and off both paddles. A
//! ball that leaves past a paddle scores for the other side and a new ball
//! is served from the centre. Ball speed ramps up with elapsed time.

use rand::Rng;

use crate::input::{Action, InputFrame, KeyBindings};
use crate::sim::{Arena, Category, CollisionEvent, CollisionRule, Effect, Entity, Game, Ramp, Winner, World};

pub const NAME: &str = "pong";

const WIDTH: f32 = 800.0;
const HEIGHT: f32 = 400.0;

const PADDLE_WIDTH: f32 = 10.0;
const PADDLE_HEIGHT: f32 = 80.0;
const PADDLE_SPEED: f32 = 5.0;
/// Left edge of each slot's paddle
const PADDLE_X: [f32; 2] = [10.0, WIDTH - 20.0];

const BALL_SIZE: f32 = 20.0;

/// Ball speed per axis by elapsed frames
pub const BALL_SPEED: Ramp = Ramp::new(5.0, 0.5, 300, 12.0);
pub const WIN_SCORE: u64 = 5;

static RULES: [CollisionRule; 1] = [CollisionRule::new(Category::Projectile, Category::Player, Effect::Bounce)];

#[derive(Debug, Clone, Default)]
pub struct PongState {
    /// Paddle hits since the last serve
    pub rally: u32,
    pub longest_rally: u32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pong;

impl Pong {
    fn serve(world: &mut World) {
        let speed = BALL_SPEED.at(world.frame());
        let vx = if world.rng().random_bool(0.5) { speed } else { -speed };
        let vy = if world.rng().random_bool(0.5) { speed } else { -speed };
        world.spawn(
            Entity::new(
                Category::Projectile,
                (WIDTH - BALL_SIZE) / 2.0,
                (HEIGHT - BALL_SIZE) / 2.0,
                BALL_SIZE,
                BALL_SIZE,
            )
            .with_gravity_scale(0.0)
            .with_velocity(vx, vy),
        );
    }

    /// Keep the ball's direction, set its per-axis speed
    fn set_speed(ball: &mut Entity, speed: f32) {
        if ball.vel.x != 0.0 {
            ball.vel.x = speed.copysign(ball.vel.x);
        }
        if ball.vel.y != 0.0 {
            ball.vel.y = speed.copysign(ball.vel.y);
        }
    }
}

impl Game for Pong {
    type State = PongState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn players(&self) -> usize {
        2
    }

    fn bindings(&self) -> KeyBindings {
        KeyBindings::paddles()
    }

    fn setup(&self, world: &mut World) -> PongState {
        for (slot, x) in PADDLE_X.iter().enumerate() {
            world.spawn(Entity::player(
                slot as u8,
                *x,
                (HEIGHT - PADDLE_HEIGHT) / 2.0,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ));
        }
        Self::serve(world);
        PongState::default()
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, _state: &mut PongState, input: &InputFrame) {
        for slot in 0..self.players() as u8 {
            if let Some(paddle) = world.player_mut(slot) {
                paddle.steer_y(input.axis_y(slot), PADDLE_SPEED);
            }
        }
    }

    /// Wall bounces and the speed ramp
    fn update(&self, world: &mut World, _state: &mut PongState) {
        let speed = BALL_SPEED.at(world.frame());
        for ball in world.of_mut(Category::Projectile) {
            if ball.pos.y < 0.0 {
                ball.pos.y = 0.0;
                ball.vel.y = ball.vel.y.abs();
            } else if ball.rect().bottom() > HEIGHT {
                ball.pos.y = HEIGHT - ball.size.y;
                ball.vel.y = -ball.vel.y.abs();
            }
            Self::set_speed(ball, speed);
        }
    }

    fn on_collisions(&self, _world: &mut World, state: &mut PongState, events: &[CollisionEvent]) {
        let hits = events
            .iter()
            .filter(|e| matches!(e, CollisionEvent::Bounced { .. }))
            .count() as u32;
        state.rally += hits;
        state.longest_rally = state.longest_rally.max(state.rally);
    }

    /// A ball gone off the left edge scores for the right paddle and the
    /// other way round
    fn on_removed(&self, world: &mut World, state: &mut PongState, removed: &[Entity]) {
        let mut served = false;
        for ball in removed.iter().filter(|e| e.category == Category::Projectile) {
            let scorer = if ball.center().x < WIDTH / 2.0 { 1 } else { 0 };
            world.scores.award(scorer, 1);
            log::info!(
                "{}: point to player {} after a rally of {}",
                NAME,
                scorer + 1,
                state.rally
            );
            state.rally = 0;
            served = true;
        }
        if served && world.count(Category::Projectile) == 0 {
            Self::serve(world);
        }
    }

    fn goal_winner(&self, world: &World, _state: &PongState) -> Option<Winner> {
        world
            .scores
            .as_slice()
            .iter()
            .position(|score| *score >= WIN_SCORE)
            .map(|slot| Winner::Player(slot as u8))
    }

    fn hud(&self, world: &World, state: &PongState) -> Vec<(&'static str, String)> {
        vec![
            ("rally", state.rally.to_string()),
            ("speed", format!("{:.1}", BALL_SPEED.at(world.frame()))),
        ]
    }

    /// Each paddle follows the ball while it is coming its way and drifts
    /// back to the middle otherwise
    fn autopilot(&self, world: &World, _state: &PongState) -> InputFrame {
        let mut input = InputFrame::new();
        let ball = world.of(Category::Projectile).next();
        for slot in 0..self.players() as u8 {
            let Some(paddle) = world.player(slot) else {
                continue;
            };
            let incoming = ball.filter(|b| (slot == 0) == (b.vel.x < 0.0));
            let target = match incoming {
                Some(b) => b.center().y,
                None => HEIGHT / 2.0,
            };
            let dy = target - paddle.center().y;
            if dy.abs() > PADDLE_SPEED {
                let action = if dy < 0.0 { Action::Up } else { Action::Down };
                input = input.hold(slot, action);
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{EndReason, GameController, GamePhase};
    use crate::sim::step;
    use glam::Vec2;

    fn fresh() -> (World, PongState) {
        let game = Pong;
        let mut world = World::new(game.arena(), 4).with_players(game.players());
        let state = game.setup(&mut world);
        (world, state)
    }

    fn ball_mut(world: &mut World) -> &mut Entity {
        world.of_mut(Category::Projectile).next().unwrap()
    }

    #[test]
    fn test_setup() {
        let (world, _) = fresh();
        assert_eq!(world.player(0).unwrap().pos, Vec2::new(10.0, 160.0));
        assert_eq!(world.player(1).unwrap().pos, Vec2::new(780.0, 160.0));
        let ball = world.of(Category::Projectile).next().unwrap();
        assert_eq!(ball.pos, Vec2::new(390.0, 190.0));
        assert_eq!(ball.vel.x.abs(), 5.0);
        assert_eq!(ball.vel.y.abs(), 5.0);
        assert_eq!(world.scores.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_ball_bounces_off_paddle() {
        let (mut world, mut state) = fresh();
        let ball = ball_mut(&mut world);
        ball.pos = Vec2::new(24.0, 190.0);
        ball.vel = Vec2::new(-5.0, 0.0);

        step(&Pong, &mut world, &mut state, &InputFrame::new());
        let ball = world.of(Category::Projectile).next().unwrap();
        assert_eq!(ball.pos.x, 20.0);
        assert_eq!(ball.vel.x, 5.0);
        assert_eq!(state.rally, 1);
        assert_eq!(world.scores.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_ball_bounces_off_walls() {
        let (mut world, mut state) = fresh();
        let ball = ball_mut(&mut world);
        ball.pos = Vec2::new(400.0, 2.0);
        ball.vel = Vec2::new(5.0, -5.0);

        step(&Pong, &mut world, &mut state, &InputFrame::new());
        let ball = world.of(Category::Projectile).next().unwrap();
        assert_eq!(ball.pos.y, 0.0);
        assert_eq!(ball.vel.y, 5.0);
    }

    #[test]
    fn test_missed_ball_scores_for_the_other_side() {
        let (mut world, mut state) = fresh();
        world.player_mut(0).unwrap().pos.y = 0.0;
        let ball = ball_mut(&mut world);
        ball.pos = Vec2::new(100.0, 300.0);
        ball.vel = Vec2::new(-5.0, 0.0);

        for _ in 0..30 {
            step(&Pong, &mut world, &mut state, &InputFrame::new());
        }
        assert_eq!(world.scores.as_slice(), &[0, 1]);
        // A fresh ball is back in play
        assert_eq!(world.count(Category::Projectile), 1);
        assert!(world.of(Category::Projectile).next().unwrap().pos.x > 300.0);
    }

    #[test]
    fn test_paddles_move_independently() {
        let (mut world, mut state) = fresh();
        let input = InputFrame::new().hold(0, Action::Up).hold(1, Action::Down);
        step(&Pong, &mut world, &mut state, &input);
        assert_eq!(world.player(0).unwrap().pos, Vec2::new(10.0, 155.0));
        assert_eq!(world.player(1).unwrap().pos, Vec2::new(780.0, 165.0));

        for _ in 0..100 {
            step(&Pong, &mut world, &mut state, &input);
        }
        assert_eq!(world.player(0).unwrap().pos.y, 0.0);
        assert_eq!(world.player(1).unwrap().pos.y, HEIGHT - PADDLE_HEIGHT);
    }

    #[test]
    fn test_speed_ramp() {
        assert_eq!(BALL_SPEED.at(0), 5.0);
        assert_eq!(BALL_SPEED.at(300), 5.5);
        assert_eq!(BALL_SPEED.at(100_000), 12.0);

        let (mut world, mut state) = fresh();
        for _ in 0..300 {
            let input = Pong.autopilot(&world, &state);
            step(&Pong, &mut world, &mut state, &input);
        }
        for ball in world.of(Category::Projectile) {
            assert_eq!(ball.vel.x.abs(), 5.5);
        }
    }

    #[test]
    fn test_first_to_five_wins() {
        let mut c = GameController::new(Pong, 3);
        c.start();
        let ran = c.run_deferred(c.epoch(), |world, _| {
            world.scores.award(1, WIN_SCORE - 1);
            if let Some(paddle) = world.player_mut(0) {
                paddle.pos.y = 0.0;
            }
            if let Some(ball) = world.of_mut(Category::Projectile).next() {
                ball.pos = Vec2::new(390.0, 190.0);
                ball.vel = Vec2::new(-5.0, 0.0);
            }
        });
        assert!(ran);

        let mut outcome = None;
        for _ in 0..200 {
            outcome = c.tick(&InputFrame::new());
            if outcome.is_some() {
                break;
            }
        }
        let outcome = outcome.expect("the ball gets past the left paddle");
        assert_eq!(outcome.reason, EndReason::Goal);
        assert_eq!(outcome.winner, Some(Winner::Player(1)));
        assert_eq!(outcome.title(), "Player 2 Wins!");
        assert_eq!(outcome.final_score, WIN_SCORE);
        assert_eq!(c.phase(), GamePhase::Over);
    }

    #[test]
    fn test_autopilot_tracks_incoming_ball() {
        let (mut world, state) = fresh();
        let ball = ball_mut(&mut world);
        ball.pos = Vec2::new(300.0, 20.0);
        ball.vel = Vec2::new(-5.0, 5.0);
        let input = Pong.autopilot(&world, &state);
        assert!(input.is_held(0, Action::Up));
        // Right paddle is already centred and the ball is moving away
        assert!(!input.is_held(1, Action::Up) && !input.is_held(1, Action::Down));
    }
}
