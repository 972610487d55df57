//! Endless runner: jump the obstacles, grab power-ups
//!
//! Obstacles of random height scroll in from the right at a speed that ramps
//! up over time. Touching one ends the run unless a shield absorbs it. Score
//! is distance travelled; the flash power-up halves the world's pace.

use rand::Rng;

use crate::input::{Action, InputFrame};
use crate::sim::{
    Arena, Category, CollisionRule, Effect, EffectKind, Entity, FrameTimer, Game, PowerUp, Ramp, World,
};
use crate::ticks_to_secs;

pub const NAME: &str = "runner";

const WIDTH: f32 = 800.0;
/// Playfield height above the floor line
const HEIGHT: f32 = 390.0;

const PLAYER_X: f32 = 50.0;
const PLAYER_SIZE: f32 = 30.0;
pub const GRAVITY: f32 = 0.8;
pub const JUMP_FORCE: f32 = -15.0;

const OBSTACLE_WIDTH: f32 = 20.0;
const OBSTACLE_MIN_HEIGHT: f32 = 20.0;
const OBSTACLE_MAX_HEIGHT: f32 = 120.0;
const OBSTACLE_INTERVAL: u32 = 100;
const SLOWED_OBSTACLE_INTERVAL: u32 = 200;
const POWER_UP_INTERVAL: u32 = 750;
const POWER_UP_SIZE: f32 = 30.0;

/// Scroll speed in px/frame by elapsed frames
pub const SPEED: Ramp = Ramp::new(5.0, 0.5, 600, 10.0);
/// World pace while slow motion is active
const SLOW_PACE: f32 = 0.5;

const OBSTACLE_TIMER: &str = "obstacle";
const POWER_UP_TIMER: &str = "power_up";

/// Frames of warning the autopilot wants before an obstacle reaches it
const JUMP_LEAD: f32 = 13.0;

static RULES: [CollisionRule; 2] = [
    CollisionRule::new(Category::Player, Category::Pickup, Effect::Collect),
    CollisionRule::new(Category::Player, Category::Obstacle, Effect::Lethal),
];

/// Apex height of an unboosted jump
fn jump_height() -> f32 {
    JUMP_FORCE * JUMP_FORCE / (2.0 * GRAVITY)
}

#[derive(Debug, Clone, Default)]
pub struct RunnerState {
    /// Distance travelled, in pace-weighted frames
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Runner;

impl Runner {
    fn pace(world: &World) -> f32 {
        let slowed = world
            .player(0)
            .is_some_and(|p| p.effects.is_active(EffectKind::SlowMotion));
        if slowed { SLOW_PACE } else { 1.0 }
    }

    fn spawn_obstacle(world: &mut World, speed: f32) {
        let height = world
            .rng()
            .random_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT);
        world.spawn(
            Entity::new(Category::Obstacle, WIDTH, HEIGHT - height, OBSTACLE_WIDTH, height).with_velocity(-speed, 0.0),
        );
    }

    /// Power-ups appear within reach of a normal jump
    fn spawn_power_up(world: &mut World, speed: f32) {
        let index = world.rng().random_range(0..PowerUp::RUNNER.len());
        let power_up = PowerUp::RUNNER[index];
        let roll = world.rng().random_range(30.0..HEIGHT - POWER_UP_SIZE - 30.0);
        let y = roll.max(HEIGHT - jump_height());
        world.spawn(Entity::pickup(power_up, WIDTH, y, POWER_UP_SIZE).with_velocity(-speed, 0.0));
    }
}

impl Game for Runner {
    type State = RunnerState;

    fn name(&self) -> &'static str {
        NAME
    }

    fn arena(&self) -> Arena {
        Arena::new(WIDTH, HEIGHT)
    }

    fn gravity(&self) -> f32 {
        GRAVITY
    }

    fn setup(&self, world: &mut World) -> RunnerState {
        world.spawn(
            Entity::player(0, PLAYER_X, HEIGHT - PLAYER_SIZE, PLAYER_SIZE, PLAYER_SIZE).with_gravity_scale(1.0),
        );
        world.timers.set(OBSTACLE_TIMER, FrameTimer::every(OBSTACLE_INTERVAL));
        world.timers.set(POWER_UP_TIMER, FrameTimer::every(POWER_UP_INTERVAL));
        RunnerState::default()
    }

    fn rules(&self) -> &[CollisionRule] {
        &RULES
    }

    fn control(&self, world: &mut World, _state: &mut RunnerState, input: &InputFrame) {
        if input.was_pressed(0, Action::Jump) || input.was_pressed(0, Action::Up) {
            if let Some(player) = world.player_mut(0) {
                player.try_jump(JUMP_FORCE);
            }
        }
    }

    fn update(&self, world: &mut World, state: &mut RunnerState) {
        let pace = Self::pace(world);
        let interval = if pace < 1.0 {
            SLOWED_OBSTACLE_INTERVAL
        } else {
            OBSTACLE_INTERVAL
        };
        world.timers.set_period(OBSTACLE_TIMER, interval);

        let speed = SPEED.at(world.frame()) * pace;
        if world.timers.fired(OBSTACLE_TIMER) {
            Self::spawn_obstacle(world, speed);
        }
        if world.timers.fired(POWER_UP_TIMER) {
            Self::spawn_power_up(world, speed);
        }

        state.distance += pace;
        world.scores.raise_to(0, (state.distance / 10.0) as u64);
    }

    fn hud(&self, world: &World, _state: &RunnerState) -> Vec<(&'static str, String)> {
        let mut hud = vec![("speed", format!("{:.1}", SPEED.at(world.frame())))];
        if let Some(player) = world.player(0) {
            for effect in player.effects.iter() {
                let charges = effect.charges.map(|c| format!(" x{c}")).unwrap_or_default();
                hud.push((
                    "effect",
                    format!("{:?} {}s{}", effect.kind, ticks_to_secs(effect.remaining), charges),
                ));
            }
        }
        hud
    }

    /// Jump when the next obstacle is `JUMP_LEAD` frames away
    fn autopilot(&self, world: &World, _state: &RunnerState) -> InputFrame {
        let Some(player) = world.player(0) else {
            return InputFrame::new();
        };
        if !player.flags.grounded {
            return InputFrame::new();
        }
        let right = player.rect().right();
        let next = world
            .of(Category::Obstacle)
            .filter(|o| o.rect().right() > player.pos.x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));
        match next {
            Some(o) if o.pos.x - right > 0.0 && o.pos.x - right <= -o.vel.x * JUMP_LEAD => {
                InputFrame::new().press(0, Action::Jump)
            }
            _ => InputFrame::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CollisionEvent, step};

    fn fresh() -> (World, RunnerState) {
        let game = Runner;
        let mut world = World::new(game.arena(), 11).with_gravity(game.gravity());
        let state = game.setup(&mut world);
        (world, state)
    }

    fn run(world: &mut World, state: &mut RunnerState, frames: usize) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            events.extend(step(&Runner, world, state, &InputFrame::new()).events);
        }
        events
    }

    fn wall(world: &mut World, x: f32) -> u32 {
        world.spawn(Entity::new(Category::Obstacle, x, HEIGHT - 120.0, OBSTACLE_WIDTH, 120.0).with_velocity(-5.0, 0.0))
    }

    #[test]
    fn test_player_starts_on_floor() {
        let (world, _) = fresh();
        let player = world.player(0).unwrap();
        assert_eq!(player.pos.y, 360.0);
        assert!(player.flags.grounded);
    }

    #[test]
    fn test_obstacle_ends_run() {
        let (mut world, mut state) = fresh();
        wall(&mut world, 200.0);
        let events = run(&mut world, &mut state, 40);
        assert!(events.iter().any(|e| matches!(e, CollisionEvent::Killed { .. })));
        assert!(Runner.defeated(&world, &state));
    }

    #[test]
    fn test_autopilot_clears_tall_obstacle() {
        let (mut world, mut state) = fresh();
        wall(&mut world, 300.0);
        for _ in 0..80 {
            let input = Runner.autopilot(&world, &state);
            step(&Runner, &mut world, &mut state, &input);
        }
        assert!(world.player(0).unwrap().is_alive());
        assert_eq!(world.count(Category::Obstacle), 0, "obstacle scrolled off");
        assert!(world.player(0).unwrap().flags.grounded);
    }

    #[test]
    fn test_cap_shield_breaks_obstacles() {
        let (mut world, mut state) = fresh();
        world.player_mut(0).unwrap().apply_power_up(PowerUp::CapShield);
        let first = wall(&mut world, 100.0);
        let second = wall(&mut world, 200.0);
        let events = run(&mut world, &mut state, 40);

        let absorbed: Vec<u32> = events
            .iter()
            .filter_map(|e| match e {
                CollisionEvent::ShieldAbsorbed { by, .. } => Some(*by),
                _ => None,
            })
            .collect();
        assert_eq!(absorbed, vec![first, second]);
        assert!(world.player(0).unwrap().is_alive());
        assert!(world.player(0).unwrap().shielded());
    }

    #[test]
    fn test_slow_motion_halves_pace() {
        let (mut normal, mut normal_state) = fresh();
        run(&mut normal, &mut normal_state, 250);

        let (mut slowed, mut slowed_state) = fresh();
        slowed.player_mut(0).unwrap().apply_power_up(PowerUp::Flash);
        run(&mut slowed, &mut slowed_state, 250);

        assert_eq!(normal.count(Category::Obstacle), 2);
        assert_eq!(slowed.count(Category::Obstacle), 1);
        assert_eq!(normal.scores.get(0), 25);
        assert_eq!(slowed.scores.get(0), 12);
    }

    #[test]
    fn test_power_up_spawns_within_jump_reach() {
        let (mut world, mut state) = fresh();
        run(&mut world, &mut state, 750);
        let pickup = world.of(Category::Pickup).next().expect("power-up spawned");
        assert!(pickup.power_up.is_some_and(|p| PowerUp::RUNNER.contains(&p)));
        assert!(pickup.pos.y >= HEIGHT - jump_height());
        assert!(pickup.pos.y + pickup.size.y <= HEIGHT);
    }

    #[test]
    fn test_score_is_distance_over_ten() {
        let (mut world, mut state) = fresh();
        run(&mut world, &mut state, 95);
        assert_eq!(world.scores.get(0), 9);
    }
}
