//! Guru - AI assistant CLI for chat, image captioning and image generation.

mod adapters;
mod cassette;
mod cli;
mod commands;
mod config;
mod context;
mod error;
mod logging;
mod model;
mod output;
mod params;
mod ports;
mod session;

use std::path::Path;
use std::process;

use clap::Parser;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::GuruError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), GuruError> {
    config::load_dotenv();

    let config_path = config::discover_config_path(cli.config.as_deref());
    let config = Config::load(&config_path).map_err(GuruError::Config)?;

    // Live, recording or replaying
    let replay_path = std::env::var("GURU_REPLAY").ok();
    let is_recording = std::env::var("GURU_REC").is_ok_and(|v| v == "true" || v == "1");

    let command_name = match cli.command {
        Command::Chat(_) => "chat",
        Command::Caption(_) => "caption",
        Command::Generate(_) => "generate",
    };

    let (ctx, recording_session) = if let Some(ref cassette_path) = replay_path {
        tracing::info!("replaying from {cassette_path}");
        (ServiceContext::replaying(&config, Path::new(cassette_path))?, None)
    } else if is_recording {
        tracing::info!("recording mode enabled");
        let (ctx, session) = ServiceContext::recording(&config, command_name);
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = match cli.command {
        Command::Chat(args) => commands::chat(&ctx, &config, &args).await,
        Command::Caption(args) => commands::caption(&ctx, &config, &args).await,
        Command::Generate(args) => commands::generate(&ctx, &config, &args).await,
    };

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    result
}
