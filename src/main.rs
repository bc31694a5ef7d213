use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use conveyor_config::WorkerConfig;
use conveyor_registry::ComponentRegistry;
use conveyor_worker::{ComponentCatalog, WorkerBootstrap};

/// Conveyor - a configuration-composed task-queue worker
#[derive(Parser)]
#[command(name = "conveyor")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Directory holding worker configuration (default: ~/.conveyor)
  #[arg(long, global = true)]
  config_dir: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Compose the worker from configuration and run the dispatch loop
  Run {
    /// Path to the worker config file (default: <config-dir>/conveyor.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured task queue name
    #[arg(long)]
    queue: Option<String>,
  },
}

fn main() -> Result<()> {
  init_tracing();

  let cli = Cli::parse();

  let config_dir = cli.config_dir.unwrap_or_else(|| {
    dirs::home_dir()
      .expect("could not determine home directory")
      .join(".conveyor")
  });

  match cli.command {
    Some(Commands::Run { config, queue }) => {
      let code = run_worker(config_dir, config, queue)?;
      if code != 0 {
        std::process::exit(code);
      }
    }
    None => {
      println!("conveyor - use --help to see available commands");
    }
  }

  Ok(())
}

fn init_tracing() {
  let filter =
    EnvFilter::try_from_env("CONVEYOR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_worker(
  config_dir: PathBuf,
  config_path: Option<PathBuf>,
  queue: Option<String>,
) -> Result<i32> {
  let rt = tokio::runtime::Runtime::new()?;
  rt.block_on(async { run_worker_async(config_dir, config_path, queue).await })
}

async fn run_worker_async(
  config_dir: PathBuf,
  config_path: Option<PathBuf>,
  queue: Option<String>,
) -> Result<i32> {
  let config_path = config_path.unwrap_or_else(|| config_dir.join("conveyor.json"));

  let content = tokio::fs::read_to_string(&config_path)
    .await
    .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

  let mut config = WorkerConfig::from_json_str(&content)
    .with_context(|| format!("failed to parse config file: {}", config_path.display()))?;

  if let Some(queue) = queue {
    config.worker.queue = queue;
  }

  info!(config = %config_path.display(), queue = %config.worker.queue, "configuration loaded");

  // Ctrl-c is the shutdown signal; the worker loop owns everything else.
  let cancel = CancellationToken::new();
  let signal_cancel = cancel.clone();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      signal_cancel.cancel();
    }
  });

  let mut bootstrap = WorkerBootstrap::new(
    config,
    ComponentCatalog::builtin(),
    ComponentRegistry::new(),
    config_dir,
  );

  bootstrap
    .run(cancel)
    .await
    .context("worker bootstrap failed")
}
