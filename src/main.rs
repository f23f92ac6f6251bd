use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rusty_roughness::data::loader::load_file;
use rusty_roughness::pipeline::analyze_profile;
use rusty_roughness::state::ServerConfig;

#[derive(Debug, Parser)]
#[command(name = "rusty-roughness", version, about = "Surface roughness profile analysis")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Server settings used when no subcommand is given.
    #[command(flatten)]
    serve: ServerConfig,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service (default).
    Serve(ServerConfig),
    /// Analyse a profile file and print the metrics as JSON.
    Analyze {
        /// Headerless table whose first column holds the profile.
        path: PathBuf,
        /// Write the figure to this PNG file instead of embedding it as base64.
        #[arg(long)]
        plot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Command::Analyze { path, plot }) => analyze(path, plot),
        Some(Command::Serve(config)) => serve(config),
        None => serve(cli.serve),
    }
}

fn serve(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(rusty_roughness::app::serve(config))
}

fn analyze(path: PathBuf, plot: Option<PathBuf>) -> Result<()> {
    let profile = load_file(&path).with_context(|| format!("loading {}", path.display()))?;
    let analysis = analyze_profile(&profile)
        .with_context(|| format!("analysing {}", path.display()))?;

    let output = match plot {
        Some(plot_path) => {
            std::fs::write(&plot_path, &analysis.png)
                .with_context(|| format!("writing {}", plot_path.display()))?;
            log::info!("Figure written to {}", plot_path.display());
            serde_json::to_string_pretty(&analysis.metrics)?
        }
        None => serde_json::to_string_pretty(&analysis.into_report())?,
    };
    println!("{output}");
    Ok(())
}
