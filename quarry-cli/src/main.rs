//! # quarry CLI
//!
//! Command-line interface for inspecting a quarry project's routes.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "quarry.yml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new quarry project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// List every route in the project
    Routes {
        /// Only routes of this page kind (e.g. markdown-post)
        #[arg(long)]
        kind: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show a single route by key
    Route {
        /// Route key (e.g. posts/hello-world)
        key: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Boot the project and report files that failed to parse
    Verify {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; logs go to stderr so JSON output stays parseable
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Routes { kind, json } => commands::list_routes(&cli.config, kind.as_deref(), json),
        Commands::Route { key, json } => commands::show_route(&cli.config, &key, json),
        Commands::Verify { json } => commands::verify_project(&cli.config, json),
    }
}
