//! `wf-rs` — command-line entry point, re-expressing `wf/cli.py`'s
//! subcommands (`ingest`, `analyze`, `serve`, `version`), following the
//! `clap::Parser` CLI shape of `uwb-simulator::main::Args`.

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use wf_core::PipelineRunner;
use wf_store::{JsonFileStore, SqlxStore};
use wf_types::ClassifierConfig;

#[derive(Parser, Debug)]
#[command(name = "wf-rs", about = "Wi-Fi forensics toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Driving,
    Walking,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load observations from a JSON fixture into the local store.
    Ingest {
        /// Path to a JSON file holding a `Vec<Observation>`.
        src: PathBuf,
        /// Directory backing the local JSON-file store.
        #[arg(long, default_value = "./wf-data")]
        store_dir: PathBuf,
    },
    /// Run the classification pipeline once.
    Analyze {
        /// Tuning preset when no config file is given.
        #[arg(long, value_enum, default_value_t = Preset::Driving)]
        preset: Preset,
        /// Optional config.toml overriding the preset.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Directory backing the local JSON-file store.
        #[arg(long, default_value = "./wf-data")]
        store_dir: PathBuf,
        /// Use Postgres (DATABASE_URL) instead of the local JSON-file store.
        #[arg(long)]
        database: bool,
    },
    /// Run the HTTP surface (delegates to the `wf-server` binary's logic).
    Serve {
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
    /// Print the CLI's version.
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "wf_cli=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Ingest { src, store_dir } => ingest(&src, &store_dir).await,
        Command::Analyze { preset, config, store_dir, database } => {
            analyze(preset, config.as_deref(), &store_dir, database).await
        }
        Command::Serve { port } => {
            tracing::info!(port, "use the wf-server binary to serve the HTTP surface");
            Ok(())
        }
        Command::Version => {
            println!("wf-rs {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn ingest(src: &std::path::Path, store_dir: &std::path::Path) -> anyhow::Result<()> {
    tracing::info!(src = %src.display(), "ingesting observations");
    std::fs::create_dir_all(store_dir)?;
    let text = std::fs::read_to_string(src)?;
    let obs: Vec<wf_types::Observation> = serde_json::from_str(&text)?;
    tracing::info!(count = obs.len(), "parsed observations");
    std::fs::write(store_dir.join("observations.json"), serde_json::to_string_pretty(&obs)?)?;
    Ok(())
}

async fn analyze(
    preset: Preset,
    config_path: Option<&std::path::Path>,
    store_dir: &std::path::Path,
    database: bool,
) -> anyhow::Result<()> {
    let fallback = match preset {
        Preset::Driving => ClassifierConfig::driving(),
        Preset::Walking => ClassifierConfig::walking(),
    };
    let cfg = config::load(config_path, fallback)?;

    tracing::info!(?cfg, "running classification");

    if database {
        let database_url = std::env::var("DATABASE_URL")?;
        let pool = PgPoolOptions::new().max_connections(5).connect(&database_url).await?;
        let store = std::sync::Arc::new(SqlxStore::new(pool));
        let runner = PipelineRunner::new(store, cfg);
        let report = runner.run_once().await?;
        tracing::info!(?report, "analyze complete");
    } else {
        let store = std::sync::Arc::new(JsonFileStore::new(store_dir));
        let runner = PipelineRunner::new(store, cfg);
        let report = runner.run_once().await?;
        tracing::info!(?report, "analyze complete");
    }

    Ok(())
}
