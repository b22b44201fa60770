//! CLI entry point for bmm150-ctl.
//!
//! Thin dispatch layer over [`BusRegistry`]: one process invocation is one
//! command, run to completion before the next. The attachment table comes
//! from `--config <path>` or the built-in default, and the simulated driver
//! factory is wired in here at the composition root.
//!
//! # Usage
//!
//! ```bash
//! bmm150-ctl start -X -R 2
//! bmm150-ctl status
//! bmm150-ctl stop -I
//! ```
//!
//! Exit code 0 on success, 1 on failure. A missing verb or an argument
//! parse failure prints usage and exits 0; usage is not an error.

use anyhow::Result;
use bmm150_ctl::drivers::SimFactory;
use bmm150_ctl::{BusConfig, BusRegistry, BusSelector, Rotation};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bmm150-ctl")]
#[command(about = "Lifecycle control for the BMM150 magnetometer", long_about = None)]
struct Cli {
    /// Attachment-table TOML file (defaults to the built-in board table)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ScopeArgs {
    /// Restrict to the internal (on-board) I2C bus
    #[arg(short = 'I', long, conflicts_with = "external")]
    internal: bool,

    /// Restrict to the external (expansion) I2C bus
    #[arg(short = 'X', long)]
    external: bool,
}

impl ScopeArgs {
    fn selector(&self) -> BusSelector {
        if self.internal {
            BusSelector::Internal
        } else if self.external {
            BusSelector::External
        } else {
            BusSelector::All
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start a driver instance on the first free matching attachment point
    Start {
        #[command(flatten)]
        scope: ScopeArgs,

        /// Mounting rotation, passed through to the driver
        #[arg(short = 'R', long, default_value_t = 0)]
        rotation: u8,
    },

    /// Stop the running driver instance in scope
    Stop {
        #[command(flatten)]
        scope: ScopeArgs,
    },

    /// Report status of the running driver instance in scope
    Status {
        #[command(flatten)]
        scope: ScopeArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Usage is not an error: a bad or missing verb prints help and exits 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let Some(command) = cli.command else {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(cli.config, command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Option<PathBuf>, command: Commands) -> Result<()> {
    let config = match config {
        Some(path) => BusConfig::from_file(&path)?,
        None => BusConfig::default(),
    };

    let mut registry = BusRegistry::new(config.into_table()?, Box::new(SimFactory));

    match command {
        Commands::Start { scope, rotation } => {
            registry.start(scope.selector(), Rotation(rotation)).await?;
        }
        Commands::Stop { scope } => {
            registry.stop(scope.selector()).await?;
        }
        Commands::Status { scope } => {
            registry.status(scope.selector()).await?;
        }
    }

    Ok(())
}
