//! Foreman - Terminal control plane for a multi-agent fleet
//!
//! Watches projects, workers, managers, the merge queue, and work items
//! through the fleet command-line tool, and dispatches operations on them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use foreman_core::{
    paths, CliExecutor, CommandSnapshotSource, ForemanConfig, PlatformCli, Snapshot,
    SnapshotSource,
};

mod tui;

/// Foreman - fleet control plane
#[derive(Parser)]
#[command(name = "foreman")]
#[command(about = "Terminal control plane for a multi-agent fleet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.foreman/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fleet command-line tool to drive
    #[arg(short, long)]
    bin: Option<String>,

    /// Working directory for platform commands
    #[arg(short, long)]
    workspace: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive control plane
    Tui,

    /// Fetch one snapshot and print it
    Snapshot {
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration
    Config,
}

impl Cli {
    /// Load the config file and apply command-line overrides
    fn resolve_config(&self) -> Result<(ForemanConfig, PathBuf)> {
        let path = self.config.clone().unwrap_or_else(paths::config_file);
        let mut config = ForemanConfig::load(&path)?;
        if let Some(bin) = &self.bin {
            config.bin = bin.clone();
        }
        if let Some(workspace) = &self.workspace {
            config.workspace = Some(workspace.clone());
        }
        if let Some(interval) = self.interval {
            config.refresh_interval_ms = interval;
        }
        config.validate()?;
        Ok((config, path))
    }
}

/// Restore terminal state - called on panic or unexpected exit
fn restore_terminal() {
    use crossterm::{
        execute,
        terminal::{disable_raw_mode, LeaveAlternateScreen},
    };
    let _ = disable_raw_mode();
    let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
}

/// Log to a file; stdout and stderr belong to the TUI
fn init_logging() {
    let log_dir = paths::logs_dir();
    std::fs::create_dir_all(&log_dir).ok();

    #[cfg(unix)]
    let null_device = "/dev/null";
    #[cfg(windows)]
    let null_device = "NUL";

    let log_file = match std::fs::File::create(log_dir.join("foreman.log"))
        .or_else(|_| std::fs::File::create(null_device))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false)
        .init();
}

fn print_summary(snapshot: &Snapshot) {
    if !snapshot.initialized {
        println!("No workspace. Run `foreman` to set one up.");
        return;
    }
    if let Some(taken_at) = snapshot.taken_at {
        println!(
            "Taken at:    {}",
            taken_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        );
    }
    println!("Projects:    {}", snapshot.projects.len());
    println!("Workers:     {}", snapshot.workers.len());
    for worker in &snapshot.workers {
        println!("  {:<24} {}", worker.address(), worker.state);
    }
    println!("Managers:    {}", snapshot.managers.len());
    println!("Merge queue: {}", snapshot.merge_queue.len());
    println!("Work items:  {}", snapshot.work_items.len());
    if !snapshot.errors.is_empty() {
        println!();
        for error in &snapshot.errors {
            println!("  ⚠ {}: {}", error.section, error.message);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up panic hook to restore terminal state
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    init_logging();

    let cli = Cli::parse();
    let (config, config_path) = cli.resolve_config()?;
    tracing::info!(bin = %config.bin, workspace = ?config.workspace, "Starting foreman");

    let platform = PlatformCli::new(config.bin.clone(), config.workspace.clone());

    match cli.command {
        Some(Commands::Snapshot { json }) => {
            let source = CommandSnapshotSource::new(platform);
            let snapshot = tokio::time::timeout(config.timeouts().refresh, source.refresh())
                .await
                .context("snapshot timed out")??;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_summary(&snapshot);
            }
        }
        Some(Commands::Config) => {
            println!("# {}", config_path.display());
            print!("{}", config.to_toml()?);
        }
        Some(Commands::Tui) | None => {
            let source = Arc::new(CommandSnapshotSource::new(platform.clone()));
            let executor = Arc::new(CliExecutor::new(platform));
            let mut app = tui::App::new(&config, source, executor);
            app.run().await?;
        }
    }

    Ok(())
}
