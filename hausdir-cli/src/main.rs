mod commands;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hausdir_core::config::HausdirConfig;
use hausdir_core::dataset::DatasetCache;
use hausdir_core::task::TaskDir;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "hausdir")]
#[command(about = "Read and tick off household tasks stored as .ics files")]
struct Cli {
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all tasks with their progress
    Tasks {
        /// Hide tasks whose subtasks are all done
        #[arg(long)]
        open: bool,
    },
    /// Show one task and its subtasks
    Show {
        /// Task file name inside the task directory
        file: String,
    },
    /// Mark a subtask as done (or not done with --undo)
    Done {
        file: String,
        /// Subtask number as shown by `show` (starting at 1)
        number: usize,
        #[arg(long)]
        undo: bool,
    },
    /// Set or clear (empty text) the hint of a subtask
    Hint {
        file: String,
        number: usize,
        text: String,
    },
    /// Apply a JSON patch such as {"done": true, "hint": "Keller"} to a subtask
    Patch {
        file: String,
        number: usize,
        json: String,
    },
    /// Resolve a free-text unit label, e.g. "Gebäude A - Keller 3"
    Area { label: String },
    /// Show a building with its address, units and tenants
    Building { id: u32 },
}

/// What every command works against.
pub struct App {
    pub config: HausdirConfig,
    pub tasks: TaskDir,
    pub json: bool,
}

impl App {
    fn load(json: bool) -> Result<Self> {
        let config = HausdirConfig::load().context("Failed to load hausdir config")?;
        let tasks = TaskDir::new(config.task_path(), config.modifier.clone());

        Ok(App {
            config,
            tasks,
            json,
        })
    }

    pub fn dataset(&self) -> Result<DatasetCache> {
        let path = self.config.dataset_path();
        DatasetCache::open(&path)
            .with_context(|| format!("Failed to load reference data from {}", path.display()))
    }

    /// Dataset for decorating output; missing reference data is not fatal there.
    pub fn optional_dataset(&self) -> Option<DatasetCache> {
        self.dataset()
            .inspect_err(|e| tracing::warn!("{e:#}"))
            .ok()
    }
}

fn main() -> Result<()> {
    // Tracing is opt-in via RUST_LOG.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    let app = App::load(cli.json)?;

    match cli.command {
        Commands::Tasks { open } => commands::tasks::run(&app, open),
        Commands::Show { file } => commands::show::run(&app, &file),
        Commands::Done { file, number, undo } => {
            commands::subtask::done(&app, &file, number, !undo)
        }
        Commands::Hint { file, number, text } => {
            commands::subtask::hint(&app, &file, number, &text)
        }
        Commands::Patch { file, number, json } => {
            commands::subtask::patch(&app, &file, number, &json)
        }
        Commands::Area { label } => commands::area::run(&app, &label),
        Commands::Building { id } => commands::area::building(&app, id),
    }
}
