//! Headless match runner entry point.
//!
//! Run with: `cargo run -p fight-sim -- --content content`

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use fight_content::ContentFactory;
use fight_sim::{Match, MatchOptions};
use tracing::info;

/// Run a scripted match between two fighters and print the result
#[derive(Parser)]
#[command(name = "fight-sim")]
#[command(about = "Headless fighting game match runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory holding config, stage, inputs and fighters
    #[arg(long, default_value = "content")]
    content: PathBuf,

    /// Fighter for player one (defaults to the first fighter found)
    #[arg(long)]
    p1: Option<String>,

    /// Fighter for player two (defaults to the second fighter found)
    #[arg(long)]
    p2: Option<String>,

    /// Frames to run before the round is decided on time
    #[arg(long, default_value_t = MatchOptions::ROUND_FRAMES)]
    frames: u64,

    /// Override the configured time dilation
    #[arg(long)]
    speed: Option<f64>,

    /// Run in training mode (no knockouts, regeneration)
    #[arg(long)]
    training: bool,

    /// List the available fighters and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let factory = ContentFactory::new(cli.content.clone());
    let names = factory.fighter_names()?;

    if cli.list {
        for name in &names {
            println!("{name}");
        }
        return Ok(());
    }

    let Some(first) = names.first() else {
        bail!("no fighters under {}", factory.data_dir().join("fighters").display());
    };
    let second = names.get(1).unwrap_or(first);
    let p1 = cli.p1.as_deref().unwrap_or(first);
    let p2 = cli.p2.as_deref().unwrap_or(second);

    let options = MatchOptions {
        speed: cli.speed,
        training: cli.training,
        max_frames: cli.frames,
    };
    if let Some(speed) = options.speed {
        if speed < 0.0 {
            bail!("speed must not be negative, got {speed}");
        }
    }

    info!(content = %cli.content.display(), p1, p2, "starting match");
    let mut fight = Match::load(&factory, p1, p2, &options)?;
    let report = fight.run(options.max_frames);
    println!("{report}");
    Ok(())
}
