use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use fabrik::config::Config;
use fabrik::pipeline::Pipeline;
use fabrik::ui;

#[derive(Parser)]
#[command(name = "fabrik")]
#[command(version, about = "Autonomous software factory - drive a coding agent from idea to integrated project")]
struct Cli {
    /// The initial software idea or requirement
    idea: String,

    /// Project directory to build in (defaults to the current directory)
    #[arg(long)]
    project_dir: Option<PathBuf>,

    /// Target implementation language the agent is instructed to use
    #[arg(long)]
    language: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("fabrik=debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let config = Config::new(project_dir, cli.language, cli.verbose)?;
    config.ensure_directories()?;

    ui::info(&format!("Input idea: {}", cli.idea));

    let pipeline = Pipeline::new(config);
    if let Err(e) = pipeline.run(&cli.idea).await {
        ui::error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}
