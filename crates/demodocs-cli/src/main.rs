use std::path::PathBuf;

use clap::{Parser, Subcommand};
use demodocs_core::Config;
use demodocs_generator::Builder;
use eyre::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "demodocs")]
#[command(about = "Builds a static documentation site from demo manifests and an app shell")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "demodocs.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the documentation site
    Build {
        /// Override base source path
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// Override output directory path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load_with_env(&cli.config)?;

    let default_filter = if config.build.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    info!(config = %cli.config.display(), "loaded configuration");

    match cli.command.unwrap_or(Commands::Build {
        base: None,
        output: None,
    }) {
        Commands::Build { base, output } => {
            if let Some(base) = base {
                config.build.base_path = base;
            }
            if let Some(output) = output {
                config.build.output_dir = output;
            }

            let stats = Builder::new(config).build()?;

            info!(
                modules = stats.modules,
                demos = stats.demos,
                routed_files = stats.routed_files,
                duration_ms = stats.duration_ms,
                "site built"
            );
        }
    }

    Ok(())
}
