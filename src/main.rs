/// Entry point and game loop.

mod config;
mod domain;
mod error;
mod sim;
mod ui;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use config::{GameConfig, GamepadConfig};
use error::{GameError, GameResult};
use sim::resources::{DirResources, EmbeddedResources, ResourceSource};
use sim::session::{Flow, Session};
use ui::gamepad::GamepadInput;
use ui::input::{prompt_player_name, InputSource, TerminalInput};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const FANFARE_WAIT: Duration = Duration::from_millis(1300);

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "keytrail")]
#[command(about = "A terminal ASCII adventure of keys, doors and companions")]
#[command(version)]
struct Args {
    /// Player name (skips the prompt)
    #[arg(short, long)]
    name: Option<String>,

    /// Directory with level1.txt.., companions.txt and banners.txt
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Play the levels built into the binary
    #[arg(long, conflicts_with = "data_dir")]
    builtin: bool,

    /// Disable sound effects
    #[arg(long)]
    no_sound: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write log lines to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Config file to use instead of searching for config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

/// How the run ended.
enum Outcome {
    Finished,
    Quit,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = initialize_logging(&args) {
        eprintln!("Could not open log file: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(Outcome::Finished) => {
            println!("You made it through every level. Thanks for playing!");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Quit) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `--log-level` when set.
fn initialize_logging(args: &Args) -> io::Result<()> {
    let env = env_logger::Env::default().default_filter_or(args.log_level.as_str());
    let mut builder = env_logger::Builder::from_env(env);
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Directory to read levels from, or None for the built-in pack.
/// `--builtin` beats `--data-dir`, which beats the configured directory.
fn resource_dir<'a>(args: &'a Args, config: &'a GameConfig) -> Option<&'a PathBuf> {
    if args.builtin {
        info!("using built-in levels (--builtin)");
        return None;
    }
    args.data_dir.as_ref().or(config.data_dir.as_ref())
}

/// Pick where levels and messages come from.
fn select_resources(args: &Args, config: &GameConfig) -> Box<dyn ResourceSource> {
    match resource_dir(args, config) {
        Some(dir) => {
            let res = DirResources::new(dir, config.level_count);
            info!("using {} levels from {}", config.level_count, res.dir().display());
            Box::new(res)
        }
        None => {
            info!("using built-in levels");
            Box::new(EmbeddedResources)
        }
    }
}

fn run(args: &Args) -> GameResult<Outcome> {
    let config = GameConfig::load(args.config.as_deref());
    let resources = select_resources(args, &config);

    let name = match &args.name {
        Some(n) => n.trim().to_string(),
        None => prompt_player_name(&mut io::stdin().lock(), &mut io::stdout())?,
    };

    // Load everything before touching the terminal, so load errors print cleanly.
    let mut session = Session::start(&name, resources.as_ref())?;

    let sound = if args.no_sound || !config.sound_enabled {
        None
    } else {
        SoundEngine::new()
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        // Raw mode may already be on.
        if let Err(c) = renderer.cleanup() {
            warn!("terminal cleanup failed: {c}");
        }
        return Err(GameError::Terminal(e));
    }

    let result = game_loop(&mut session, &mut renderer, sound.as_ref(), &config.gamepad);

    let cleanup = renderer.cleanup();
    result?;
    cleanup?;

    if !session.is_finished() {
        return Ok(Outcome::Quit);
    }
    if sound.is_some() {
        // Dropping the engine cuts the closing fanfare short.
        std::thread::sleep(FANFARE_WAIT);
    }
    Ok(Outcome::Finished)
}

fn game_loop(
    session: &mut Session,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    pad_config: &GamepadConfig,
) -> GameResult<()> {
    let mut kb = TerminalInput::new();
    let mut gp = GamepadInput::new(pad_config);
    if gp.connected {
        info!("gamepad detected");
    }
    let started = Instant::now();

    if let Some(frame) = session.frame() {
        renderer.present(&frame, &session.hud())?;
    }

    loop {
        while let Some(key) = kb.poll_key().or_else(|| gp.poll_key()) {
            let flow = session.handle_key(key);
            play_events(session, sound);
            if flow == Flow::Quit {
                return Ok(());
            }
        }

        if let Some(frame) = session.on_tick(started.elapsed().as_secs_f64()) {
            renderer.present(&frame, &session.hud())?;
        }

        std::thread::sleep(FRAME_SLEEP);
    }
}

fn play_events(session: &mut Session, sound: Option<&SoundEngine>) {
    let events = session.take_events();
    if let Some(sfx) = sound {
        for event in &events {
            sfx.play_event(event);
        }
    }
}
