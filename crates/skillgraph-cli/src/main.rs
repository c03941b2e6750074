// crates/skillgraph-cli/src/main.rs
//
// CLI entrypoint for the SkillGraph trust engine.
//
// Opens the RocksDB-backed graph in the configured data directory and runs
// one command against it: register or inspect users, stake a verification,
// compute reputation from a seed set, or export the trust graph.

mod commands;
mod config;
mod output;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::graph::GraphCmd;
use commands::reputation::ReputationCmd;
use commands::stake::StakeCmd;
use commands::user::UserCmd;
use config::{expand_tilde, CliConfig};

use skillgraph_engine::{RocksGraphStore, TrustEngine};

/// SkillGraph CLI: staked skill verification and seed-based reputation.
#[derive(Parser, Debug)]
#[command(
    name = "skillgraph",
    version = "0.1.0",
    about = "SkillGraph trust engine: stake reputation to verify skills"
)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "~/.skillgraph/config.toml")]
    config: String,

    /// Data directory; overrides `data_dir` from the config file.
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Commands {
    /// User management: add, show.
    #[command(subcommand)]
    User(UserCmd),

    /// Stake reputation to verify another user's skill.
    Stake(StakeCmd),

    /// Compute global reputation from a trusted seed set.
    Reputation(ReputationCmd),

    /// Export the trust graph.
    Graph(GraphCmd),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // The log level comes from the config file, so load it before tracing is
    // up and report the outcome afterwards.
    let loaded = CliConfig::load(&cli.config);
    let mut cli_config = match &loaded {
        Ok(cfg) => cfg.clone(),
        Err(_) => CliConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli_config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match loaded {
        Ok(_) => tracing::info!("Loaded configuration from {}", cli.config),
        Err(e) => tracing::warn!(
            "Could not load config from {}: {}. Using defaults.",
            cli.config,
            e
        ),
    }

    // CLI --data-dir flag overrides the config file value.
    if let Some(dir) = &cli.data_dir {
        cli_config.data_dir = dir.clone();
    }

    let data_dir = expand_tilde(&cli_config.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    let db_path = format!("{}/graph_rocksdb", data_dir);
    let store = RocksGraphStore::open(&db_path)?;
    tracing::debug!("Opened graph store at {}", db_path);

    let engine = TrustEngine::new(Arc::new(store), cli_config.engine.clone())?;

    match &cli.command {
        Commands::User(cmd) => commands::user::run(&engine, cmd).await?,
        Commands::Stake(cmd) => commands::stake::run(&engine, cmd).await?,
        Commands::Reputation(cmd) => commands::reputation::run(&engine, cmd).await?,
        Commands::Graph(cmd) => commands::graph::run(&engine, cmd).await?,
    }

    Ok(())
}
