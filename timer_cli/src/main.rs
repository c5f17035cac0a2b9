use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use stage_schema::{MissionCatalog, StageCatalog, StageId};
use timer_core::{GameConfig, GameSession};
use tracing_subscriber::EnvFilter;

mod play;
mod report;
mod simulate;

#[derive(Debug, Parser)]
#[command(name = "timer")]
#[command(about = "Stop-the-timer game", long_about = None)]
struct Cli {
    /// Game config (TOML); a missing file means defaults
    #[arg(short, long, default_value = "timer-game.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check the stage and mission files
    Validate,
    /// Judge scripted stop times, in seconds since start, without touching saved progress
    Simulate {
        stage: StageId,
        #[arg(long = "stop", required = true)]
        stops: Vec<f64>,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play a stage in the terminal; Enter starts and stops
    Play { stage: StageId },
    /// Print saved progress as JSON
    Progress,
    /// List missions and how far along they are
    Missions {
        /// Include hidden missions not yet completed
        #[arg(long)]
        all: bool,
    },
    /// List stages and whether they can be played
    Gate,
    /// Show the skin roster, or select one
    Skin { id: Option<String> },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = GameConfig::load(&cli.config)
        .with_context(|| format!("failed to load config: {}", cli.config.display()))?;

    match cli.command {
        Command::Validate => {
            let (stages, missions) = load_catalogs(&config)?;
            println!("stages={}", stages.len());
            println!("groups={}", stages.groups().len());
            println!("exams={}", stages.exams().count());
            println!("missions={}", missions.len());
        }
        Command::Simulate { stage, stops, seed } => {
            let (stages, missions) = load_catalogs(&config)?;
            simulate::run_simulation(stages, missions, config, stage, &stops, seed)?;
        }
        Command::Play { stage } => {
            play::run(open_session(config)?, stage)?;
        }
        Command::Progress => {
            let session = open_session(config)?;
            let json = serde_json::to_string_pretty(session.query_progress())
                .context("failed to serialize progress")?;
            println!("{json}");
        }
        Command::Missions { all } => {
            let session = open_session(config)?;
            report::print_missions(&session, all);
        }
        Command::Gate => {
            let session = open_session(config)?;
            report::print_gate(&session);
        }
        Command::Skin { id: None } => {
            let session = open_session(config)?;
            report::print_skins(&session);
        }
        Command::Skin { id: Some(id) } => {
            let mut session = open_session(config)?;
            let selected = session
                .select_skin(&id)
                .with_context(|| format!("failed to save skin: {id}"))?;
            if !selected {
                anyhow::bail!("skin {id} is unknown or locked");
            }
            println!("skin={id}");
        }
    }

    Ok(())
}

fn load_catalogs(config: &GameConfig) -> anyhow::Result<(StageCatalog, MissionCatalog)> {
    let stages = stage_loader::load_stages_from_path(&config.stages_path)?;
    let missions = stage_loader::load_missions_from_path(&config.missions_path)?;
    Ok((stages, missions))
}

fn open_session(config: GameConfig) -> anyhow::Result<GameSession> {
    let (stages, missions) = load_catalogs(&config)?;
    ensure_dir(&config.storage_dir)?;
    Ok(GameSession::open(stages, missions, config))
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create storage dir: {}", dir.display()))
}
