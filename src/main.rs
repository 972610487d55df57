//! Neon Arcade entry point
//!
//! `neon-arcade [game] [frames]` plays a game headless with its autopilot,
//! printing a text frame every so often and recording the best score.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::io;
    use std::time::{SystemTime, UNIX_EPOCH};

    use neon_arcade::input::{Action, InputFrame};
    use neon_arcade::renderer::{Frame, Renderer, TextRenderer};
    use neon_arcade::sim::Game;
    use neon_arcade::{GameController, HighScores, Result, Settings};

    /// Two minutes of play
    pub const DEFAULT_FRAMES: u64 = 2 * 60 * 60;

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Play one run of `game` with its autopilot for at most `frames` frames
    pub fn run<G: Game>(game: G, settings: &Settings, frames: u64) -> Result<()> {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("{} starting with seed: {}", game.name(), seed);

        let mut controller = GameController::new(game, seed).with_countdown(settings.countdown_ticks);
        let stdout = io::stdout();
        let mut renderer =
            TextRenderer::new(stdout.lock(), settings.cols, settings.rows).with_color(settings.color);
        let render_every = u64::from(settings.render_every.max(1));

        controller.tick(&InputFrame::new().press(0, Action::Start));
        let mut outcome = None;
        for n in 0..frames {
            let input = controller.autopilot();
            outcome = controller.tick(&input);
            if outcome.is_some() {
                break;
            }
            if n % render_every == 0 {
                renderer.draw(&Frame::capture(&controller))?;
            }
        }
        renderer.draw(&Frame::capture(&controller))?;

        let name = controller.game().name();
        let score = controller.score();
        match &outcome {
            Some(outcome) => log::info!("{}: {} (score {})", name, outcome.title(), score),
            None => log::info!("{}: stopped after {} frames (score {})", name, frames, score),
        }

        let best = HighScores::load(&settings.highscore_path).best(name);
        if HighScores::record_run(&settings.highscore_path, name, outcome.as_ref())? {
            println!("New high score for {name}: {score} (was {best})");
        } else if outcome.is_none() {
            println!("Stopped after {frames} frames with score {score}, not recorded");
        } else {
            println!("Score {score}, best {best}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::path::Path;
    use std::process::ExitCode;

    use neon_arcade::Settings;
    use neon_arcade::games::{Duel, GameKind, Hoops, Moto, Pong, Runner, Zones};
    use neon_arcade::settings::DEFAULT_PATH;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let kind = match args.next() {
        Some(arg) => match arg.parse::<GameKind>() {
            Ok(kind) => kind,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameKind::Runner,
    };
    let frames = match args.next() {
        Some(arg) => match arg.parse::<u64>() {
            Ok(frames) => frames,
            Err(_) => {
                eprintln!("invalid frame count '{arg}'");
                return ExitCode::FAILURE;
            }
        },
        None => native::DEFAULT_FRAMES,
    };

    let mut settings = Settings::load(Path::new(DEFAULT_PATH));
    settings.apply_env();
    log::info!("Neon Arcade: {} for up to {} frames", kind, frames);

    let result = match kind {
        GameKind::Zones => native::run(Zones, &settings, frames),
        GameKind::Runner => native::run(Runner, &settings, frames),
        GameKind::Hoops => native::run(Hoops, &settings, frames),
        GameKind::Moto => native::run(Moto, &settings, frames),
        GameKind::Pong => native::run(Pong, &settings, frames),
        GameKind::Duel => native::run(Duel, &settings, frames),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser hosts drive a GameController directly; there is no wasm binary
}
