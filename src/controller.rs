//! Game controller: run lifecycle and the win/lose state machine
//!
//! ```text
//! Ready --start--> Countdown --N frames--> Running --terminal--> Over
//!                                           ^   |
//!                                     pause |   | pause
//!                                           |   v
//!                                          Paused
//! any --restart--> Ready (fresh world, score 0)
//! ```

use crate::input::{Action, InputFrame};
use crate::sim::{CollisionEvent, Game, StepReport, Winner, World, step};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for a start request
    Ready,
    /// Counting down to the first simulated frame
    Countdown,
    /// Active gameplay
    Running,
    /// Frozen by the player
    Paused,
    /// Run ended; score and winner frozen until restart
    Over,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Ready => "ready",
            GamePhase::Countdown => "countdown",
            GamePhase::Running => "running",
            GamePhase::Paused => "paused",
            GamePhase::Over => "over",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Health or lives ran out
    Defeat,
    /// The run timer expired
    TimeUp,
    /// A goal, lap or zone count was reached
    Goal,
}

/// Frozen result of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub reason: EndReason,
    pub winner: Option<Winner>,
    pub final_score: u64,
    pub frames: u64,
}

impl Outcome {
    pub fn title(&self) -> String {
        match (self.reason, self.winner) {
            (_, Some(winner)) => winner.describe(),
            (EndReason::Goal, None) => "You Win!".to_string(),
            (EndReason::TimeUp, None) => "Time's Up!".to_string(),
            (EndReason::Defeat, None) => "Game Over!".to_string(),
        }
    }
}

/// Restart generation. Work scheduled by the host against one epoch is
/// ignored once the controller has moved on to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Epoch(u64);

/// Owns a game, its world and its run state
pub struct GameController<G: Game> {
    game: G,
    world: World,
    state: G::State,
    phase: GamePhase,
    seed: u64,
    countdown_length: u32,
    countdown_ticks: u32,
    outcome: Option<Outcome>,
    epoch: Epoch,
    last_events: Vec<CollisionEvent>,
}

impl<G: Game> GameController<G> {
    pub fn new(game: G, seed: u64) -> Self {
        let (world, state) = Self::build(&game, seed);
        Self {
            game,
            world,
            state,
            phase: GamePhase::Ready,
            seed,
            countdown_length: 0,
            countdown_ticks: 0,
            outcome: None,
            epoch: Epoch(0),
            last_events: Vec::new(),
        }
    }

    /// Frames to count down between start and the first simulated frame
    pub fn with_countdown(mut self, ticks: u32) -> Self {
        self.countdown_length = ticks;
        self
    }

    fn build(game: &G, seed: u64) -> (World, G::State) {
        let mut world = World::new(game.arena(), seed)
            .with_gravity(game.gravity())
            .with_players(game.players());
        let state = game.setup(&mut world);
        (world, state)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Frames left in the countdown (0 outside it)
    pub fn countdown(&self) -> u32 {
        if self.phase == GamePhase::Countdown {
            self.countdown_ticks
        } else {
            0
        }
    }

    /// Collision events from the latest simulated frame
    pub fn last_events(&self) -> &[CollisionEvent] {
        &self.last_events
    }

    /// Current score (frozen once the run is over)
    pub fn score(&self) -> u64 {
        match &self.outcome {
            Some(outcome) => outcome.final_score,
            None => self.game.final_score(&self.world, &self.state),
        }
    }

    pub fn hud(&self) -> Vec<(&'static str, String)> {
        self.game.hud(&self.world, &self.state)
    }

    /// Input the game's bot would send this frame
    pub fn autopilot(&self) -> InputFrame {
        self.game.autopilot(&self.world, &self.state)
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::info!(
                "{}: {} -> {}",
                self.game.name(),
                self.phase.as_str(),
                phase.as_str()
            );
            self.phase = phase;
        }
    }

    /// Ready -> Countdown, or straight to Running without a countdown
    pub fn start(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        if self.countdown_length > 0 {
            self.countdown_ticks = self.countdown_length;
            self.set_phase(GamePhase::Countdown);
        } else {
            self.set_phase(GamePhase::Running);
        }
    }

    /// Toggle Running <-> Paused
    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.set_phase(GamePhase::Paused),
            GamePhase::Paused => self.set_phase(GamePhase::Running),
            _ => {}
        }
    }

    /// Throw away the world and run state and build them again from the
    /// run seed. Score, outcome and countdown all reset; pending host
    /// callbacks from the previous epoch become no-ops.
    pub fn restart(&mut self) {
        let (world, state) = Self::build(&self.game, self.seed);
        self.world = world;
        self.state = state;
        self.outcome = None;
        self.countdown_ticks = 0;
        self.last_events.clear();
        self.epoch = Epoch(self.epoch.0 + 1);
        log::info!(
            "{}: restart from {} (epoch {})",
            self.game.name(),
            self.phase.as_str(),
            self.epoch.0
        );
        self.phase = GamePhase::Ready;
    }

    /// Restart with a different seed
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.restart();
    }

    /// Run host-scheduled work against the current world, but only if it
    /// was scheduled in the current epoch and the run is not over. Returns
    /// whether it ran.
    pub fn run_deferred<F>(&mut self, epoch: Epoch, f: F) -> bool
    where
        F: FnOnce(&mut World, &mut G::State),
    {
        if epoch != self.epoch {
            log::debug!("{}: dropping stale callback from {:?}", self.game.name(), epoch);
            return false;
        }
        if self.phase == GamePhase::Over {
            log::debug!("{}: run is over, dropping callback", self.game.name());
            return false;
        }
        f(&mut self.world, &mut self.state);
        true
    }

    /// Advance one frame. Returns the outcome on the frame the run ends.
    pub fn tick(&mut self, input: &InputFrame) -> Option<Outcome> {
        if input.any_pressed(Action::Restart) {
            self.restart();
            return None;
        }
        if input.any_pressed(Action::Pause) {
            self.toggle_pause();
        }

        match self.phase {
            GamePhase::Ready => {
                if input.any_pressed(Action::Start) {
                    self.start();
                }
                None
            }
            GamePhase::Countdown => {
                self.countdown_ticks = self.countdown_ticks.saturating_sub(1);
                if self.countdown_ticks == 0 {
                    self.set_phase(GamePhase::Running);
                }
                None
            }
            GamePhase::Running => {
                let StepReport { events, .. } = step(&self.game, &mut self.world, &mut self.state, input);
                self.last_events = events;
                self.evaluate()
            }
            GamePhase::Paused | GamePhase::Over => None,
        }
    }

    /// Terminal conditions in priority order: defeat, timer, goal
    fn evaluate(&mut self) -> Option<Outcome> {
        let (reason, winner) = if self.game.defeated(&self.world, &self.state) {
            (EndReason::Defeat, Winner::from_scores(self.world.scores.as_slice()))
        } else if self.game.time_left(&self.world, &self.state) == Some(0) {
            (EndReason::TimeUp, Winner::from_scores(self.world.scores.as_slice()))
        } else if let Some(winner) = self.game.goal_winner(&self.world, &self.state) {
            // Single-player wins read "You Win!" rather than naming a slot
            let winner = (self.game.players() > 1).then_some(winner);
            (EndReason::Goal, winner)
        } else {
            return None;
        };

        let outcome = Outcome {
            reason,
            winner,
            final_score: self.game.final_score(&self.world, &self.state),
            frames: self.world.frame(),
        };
        log::info!(
            "{}: {} after {} frames, score {}",
            self.game.name(),
            outcome.title(),
            outcome.frames,
            outcome.final_score
        );
        self.outcome = Some(outcome);
        self.set_phase(GamePhase::Over);
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Arena, Category, CollisionRule, Effect, Entity};

    /// A tiny game: the player falls onto a spike unless it has been shielded;
    /// touching the flag wins; the run lasts `limit` frames.
    struct Fall {
        limit: u32,
        rules: Vec<CollisionRule>,
    }

    impl Fall {
        fn new(limit: u32) -> Self {
            Self {
                limit,
                rules: vec![
                    CollisionRule::new(Category::Player, Category::Hazard, Effect::Hazard),
                    CollisionRule::new(Category::Player, Category::Goal, Effect::ReachGoal),
                ],
            }
        }
    }

    #[derive(Default)]
    struct FallState {
        reached: bool,
    }

    impl Game for Fall {
        type State = FallState;

        fn name(&self) -> &'static str {
            "fall"
        }

        fn arena(&self) -> Arena {
            Arena::new(100.0, 100.0)
        }

        fn setup(&self, world: &mut World) -> FallState {
            world.spawn(Entity::player(0, 10.0, 0.0, 10.0, 10.0));
            world.spawn(Entity::new(Category::Hazard, 0.0, 90.0, 100.0, 10.0));
            world.spawn(Entity::new(Category::Goal, 80.0, 0.0, 10.0, 10.0));
            FallState::default()
        }

        fn rules(&self) -> &[CollisionRule] {
            &self.rules
        }

        fn control(&self, world: &mut World, _state: &mut FallState, input: &InputFrame) {
            if let Some(p) = world.player_mut(0) {
                p.steer(input.axis(0), 5.0);
            }
        }

        fn update(&self, world: &mut World, _state: &mut FallState) {
            world.scores.award(0, 1);
        }

        fn on_collisions(&self, _world: &mut World, state: &mut FallState, events: &[CollisionEvent]) {
            if events.iter().any(|e| matches!(e, CollisionEvent::GoalReached { .. })) {
                state.reached = true;
            }
        }

        fn time_left(&self, world: &World, _state: &FallState) -> Option<u32> {
            Some(self.limit.saturating_sub(world.frame() as u32))
        }

        fn goal_winner(&self, _world: &World, state: &FallState) -> Option<Winner> {
            state.reached.then_some(Winner::Player(0))
        }
    }

    fn running(limit: u32) -> GameController<Fall> {
        let mut c = GameController::new(Fall::new(limit), 1);
        c.start();
        assert_eq!(c.phase(), GamePhase::Running);
        c
    }

    fn hold(action: Action) -> InputFrame {
        InputFrame::new().hold(0, action)
    }

    #[test]
    fn test_ready_waits_for_start() {
        let mut c = GameController::new(Fall::new(100), 1);
        assert_eq!(c.phase(), GamePhase::Ready);
        c.tick(&InputFrame::new());
        assert_eq!(c.phase(), GamePhase::Ready);
        assert_eq!(c.world().frame(), 0);

        c.tick(&InputFrame::new().press(0, Action::Start));
        assert_eq!(c.phase(), GamePhase::Running);
    }

    #[test]
    fn test_countdown_then_running() {
        let mut c = GameController::new(Fall::new(100), 1).with_countdown(3);
        c.start();
        assert_eq!(c.phase(), GamePhase::Countdown);
        assert_eq!(c.countdown(), 3);

        c.tick(&InputFrame::new());
        c.tick(&InputFrame::new());
        assert_eq!(c.phase(), GamePhase::Countdown);
        c.tick(&InputFrame::new());
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.world().frame(), 0, "countdown frames do not simulate");
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut c = running(100);
        c.tick(&InputFrame::new());
        let frame = c.world().frame();

        c.tick(&InputFrame::new().press(0, Action::Pause));
        assert_eq!(c.phase(), GamePhase::Paused);
        c.tick(&InputFrame::new());
        assert_eq!(c.world().frame(), frame);

        c.tick(&InputFrame::new().press(0, Action::Pause));
        assert_eq!(c.phase(), GamePhase::Running);
        assert_eq!(c.world().frame(), frame + 1);
    }

    #[test]
    fn test_defeat_freezes_score() {
        let mut c = running(1000);
        let mut outcome = None;
        for _ in 0..100 {
            if let Some(o) = c.tick(&hold(Action::Down)) {
                outcome = Some(o);
                break;
            }
        }
        let outcome = outcome.expect("player reaches the hazard");
        assert_eq!(outcome.reason, EndReason::Defeat);
        assert_eq!(c.phase(), GamePhase::Over);

        let score = c.score();
        let frame = c.world().frame();
        for _ in 0..10 {
            assert!(c.tick(&hold(Action::Down)).is_none());
        }
        assert_eq!(c.score(), score);
        assert_eq!(c.world().frame(), frame);
    }

    #[test]
    fn test_defeat_beats_timer_and_goal() {
        // Player dies on the very frame the timer hits zero
        let mut c = running(17);
        let mut last = None;
        for _ in 0..17 {
            last = c.tick(&hold(Action::Down)).or(last);
        }
        assert_eq!(last.map(|o| o.reason), Some(EndReason::Defeat));
    }

    #[test]
    fn test_timer_expiry() {
        let mut c = running(5);
        let mut outcome = None;
        for _ in 0..5 {
            outcome = c.tick(&InputFrame::new());
        }
        let outcome = outcome.expect("ends on the fifth frame");
        assert_eq!(outcome.reason, EndReason::TimeUp);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.final_score, 5);
        assert_eq!(outcome.title(), "Time's Up!");
    }

    #[test]
    fn test_goal_win() {
        let mut c = running(1000);
        let mut outcome = None;
        for _ in 0..100 {
            outcome = c.tick(&hold(Action::Right));
            if outcome.is_some() {
                break;
            }
        }
        let outcome = outcome.expect("player reaches the flag");
        assert_eq!(outcome.reason, EndReason::Goal);
        assert_eq!(outcome.winner, None);
        assert_eq!(outcome.title(), "You Win!");
    }

    #[test]
    fn test_restart_resets_everything() {
        let fresh: Vec<Entity> = GameController::new(Fall::new(1000), 1).world().entities().to_vec();

        let mut c = running(1000);
        for _ in 0..100 {
            c.tick(&hold(Action::Down));
        }
        assert_eq!(c.phase(), GamePhase::Over);
        assert!(c.score() > 0);

        c.tick(&InputFrame::new().press(0, Action::Restart));
        assert_eq!(c.phase(), GamePhase::Ready);
        assert_eq!(c.score(), 0);
        assert!(c.outcome().is_none());
        assert_eq!(c.world().frame(), 0);
        assert_eq!(c.world().entities(), fresh.as_slice());
    }

    #[test]
    fn test_restart_from_every_phase() {
        let mut c = GameController::new(Fall::new(5), 1).with_countdown(3);
        let mut epochs = vec![c.epoch()];

        c.restart();
        assert_eq!(c.phase(), GamePhase::Ready);
        epochs.push(c.epoch());

        c.start();
        assert_eq!(c.phase(), GamePhase::Countdown);
        c.restart();
        assert_eq!(c.phase(), GamePhase::Ready);
        assert_eq!(c.countdown(), 0);
        epochs.push(c.epoch());

        for phase in [GamePhase::Running, GamePhase::Paused, GamePhase::Over] {
            c.start();
            for _ in 0..3 {
                c.tick(&InputFrame::new());
            }
            assert_eq!(c.phase(), GamePhase::Running);
            if phase == GamePhase::Paused {
                c.toggle_pause();
            }
            if phase == GamePhase::Over {
                for _ in 0..5 {
                    c.tick(&InputFrame::new());
                }
            }
            assert_eq!(c.phase(), phase);
            c.restart();
            assert_eq!(c.phase(), GamePhase::Ready);
            assert_eq!(c.world().frame(), 0);
            epochs.push(c.epoch());
        }

        // Every restart starts a new epoch
        assert!(epochs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_callbacks_cannot_change_a_finished_run() {
        let mut c = running(5);
        while c.tick(&InputFrame::new()).is_none() {}
        assert_eq!(c.phase(), GamePhase::Over);
        let scores = c.world().scores.clone();
        let score = c.score();

        let ran = c.run_deferred(c.epoch(), |world, _| world.scores.award(0, 50));
        assert!(!ran);
        assert_eq!(c.world().scores, scores);
        assert_eq!(c.score(), score);
    }

    #[test]
    fn test_stale_deferred_callback_is_ignored() {
        let mut c = running(1000);
        let epoch = c.epoch();

        c.restart();
        let ran = c.run_deferred(epoch, |world, _| {
            world.scores.award(0, 99);
        });
        assert!(!ran);
        assert_eq!(c.score(), 0);

        let current = c.epoch();
        assert!(c.run_deferred(current, |world, _| world.scores.award(0, 2)));
        assert_eq!(c.score(), 2);
    }
}
