//! Inset CLI - annotated screenshot portfolio generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "inset")]
#[command(about = "Annotated screenshot portfolio generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to inset.toml config file
    #[arg(short, long, default_value = "inset.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build static portfolio site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve
        #[arg(short, long, default_value = "dist")]
        dir: PathBuf,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Check configuration documents
    Validate {
        /// config.json files to check
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Skip loading the screenshot
        #[arg(long)]
        no_image: bool,
    },

    /// Print connector segments for the given distances
    Path {
        /// Signed horizontal run
        #[arg(long, allow_hyphen_values = true)]
        horizontal: f64,

        /// Signed vertical run
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        vertical: f64,

        /// Horizontal distance before the turn (0 picks the midpoint)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        turn: f64,
    },

    /// Print the overlays of a config.json as the builder would export them
    Export {
        /// config.json to read
        path: PathBuf,

        /// Print the whole document instead of the overlays fragment
        #[arg(long)]
        document: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, output, minify).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(port, dir, !no_open).await?;
        }
        Commands::Validate { paths, no_image } => {
            commands::validate::run(paths, no_image).await?;
        }
        Commands::Path {
            horizontal,
            vertical,
            turn,
        } => {
            commands::path::run(horizontal, vertical, turn)?;
        }
        Commands::Export { path, document } => {
            commands::export::run(path, document).await?;
        }
    }

    Ok(())
}
