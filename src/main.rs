//! Bowling Sim entry point
//!
//! Headless runner: loads settings, rolls the ball at a fixed 60 Hz frame
//! time until the lane settles, then prints the outcome as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use bowling_sim::consts::FRAME_DT;
use bowling_sim::{RollSession, RollSettings};
use clap::Parser;

const DEFAULT_MAX_FRAMES: u64 = 600;

/// Roll a bowling ball down the lane and report where the pins ended up
#[derive(Parser, Debug)]
#[command(name = "bowling-sim", version, about)]
struct Args {
    /// Roll settings JSON (missing fields use defaults)
    settings: Option<PathBuf>,

    /// Frame cap
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_FRAMES)]
    frames: u64,
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let settings = match &args.settings {
        Some(path) => match RollSettings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::info!("Using default settings");
            RollSettings::default()
        }
    };

    log::info!("Bowling Sim starting...");
    let mut session = RollSession::new(settings);
    let frames = session.run_until_settled(FRAME_DT, args.frames);
    log::info!(
        "Roll finished after {} frames, {} pins down",
        frames,
        session.state.pins_hit()
    );

    match serde_json::to_string_pretty(&session.summary()) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize summary: {e}");
            ExitCode::FAILURE
        }
    }
}
