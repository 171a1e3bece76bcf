//! Robop main entry point
//!
//! Startup order:
//! 1. Command line and logging
//! 2. Configuration file and session defaults
//! 3. Resynthesis models (fatal for a configured table; the built-in table
//!    falls back to raw TTS)
//! 4. TTS generator, audio player and scratch directory
//! 5. Interactive loop until quit, Ctrl-C or end of input

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use robop::audio::create_player;
use robop::input::TerminalInput;
use robop::logging;
use robop::models::{default_loader, ModelRegistry};
use robop::resynth::ResynthesisEngine;
use robop::session::{prepare_scratch_dir, RenderPipeline, SessionLoop};
use robop::speech::{EspeakGenerator, OutputWait};
use robop::state::config::Config;
use robop::state::SessionState;
use std::io;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "robop")]
#[command(version)]
#[command(about = "Interactive espeak front end with neural resynthesis", long_about = None)]
struct Cli {
    /// Sample rate for loading and playing raw TTS audio
    #[arg(short = 's', long)]
    sample_rate: Option<u32>,

    /// Directory for generated audio files
    #[arg(short = 'o', long)]
    temp_path: Option<PathBuf>,

    /// Log level: DEBUG, INFO, WARNING or ERROR
    #[arg(short = 'd', long, default_value = "INFO")]
    debug_level: String,

    /// Configuration file (default: <config dir>/robop/robop.cfg)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Directory model paths are relative to
    #[arg(long)]
    model_root: Option<PathBuf>,

    /// Audio player: auto, aplay, paplay or none
    #[arg(long)]
    player: Option<String>,

    /// Skip loading models and play raw TTS only
    #[arg(long)]
    no_rave: bool,
}

fn main() {
    let cli = Cli::parse();

    let Some(level) = logging::parse_level(&cli.debug_level) else {
        eprintln!(
            "Invalid debug level '{}': expected DEBUG, INFO, WARNING or ERROR",
            cli.debug_level
        );
        process::exit(2);
    };
    logging::init(level);
    info!("Robop version {} starting", robop::VERSION);

    if let Err(e) = run(cli) {
        error!("Fatal error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    match config.path() {
        Some(path) => info!("Configuration loaded from {}", path.display()),
        None => info!("Using built-in configuration"),
    }

    let sample_rate = match cli.sample_rate {
        Some(rate) if rate > 0 => rate,
        Some(_) => anyhow::bail!("--sample-rate must be greater than 0"),
        None => config.sample_rate()?,
    };

    let mut defaults = config.session_defaults()?;
    if defaults.debug {
        logging::set_debug(true);
    }

    let mut registry = ModelRegistry::new();
    if cli.no_rave {
        info!("Resynthesis disabled, playing raw TTS only");
        defaults.play_rave = false;
        defaults.play_raw = true;
    } else {
        let root = cli.model_root.unwrap_or_else(|| config.model_root());
        let entries = config.model_entries()?;
        let required = config.path().is_some();
        registry =
            ModelRegistry::load_table(&entries, &root, default_loader().as_ref(), required)
                .with_context(|| format!("Failed to load models from {}", root.display()))?;

        if registry.is_empty() {
            info!("No models loaded, playing raw TTS only");
            defaults.play_rave = false;
            defaults.play_raw = true;
        } else {
            info!("Loaded {} model(s): {}", registry.len(), registry.names().join(", "));
            if !registry.contains(&defaults.model) {
                warn!(
                    "Default model '{}' is not loaded; use 'set model=<name>' before speaking",
                    defaults.model
                );
            }
        }
    }

    let scratch_dir = prepare_scratch_dir(&cli.temp_path.unwrap_or_else(|| config.scratch_dir()))
        .context("Failed to prepare scratch directory")?;
    info!("Writing audio files to {}", scratch_dir.display());

    let generator = EspeakGenerator::new(config.tts_command().as_deref())?;
    let player_choice = cli.player.unwrap_or_else(|| config.player());
    let player = create_player(&player_choice)?;
    let wait = OutputWait {
        timeout: config.output_timeout()?,
        interval: config.poll_interval()?,
    };

    let state = SessionState::new(defaults, registry.names());
    let engine = ResynthesisEngine::new(registry, scratch_dir.clone());
    let pipeline = RenderPipeline::new(
        Box::new(generator),
        player,
        engine,
        scratch_dir,
        sample_rate,
    )
    .with_output_wait(wait);

    let input = TerminalInput::new()?;
    let mut session = SessionLoop::new(input, io::stdout(), pipeline, state, config.prompt());
    session.run()?;

    info!("Session ended after {} utterance(s)", session.state().file_sequence());
    Ok(())
}
