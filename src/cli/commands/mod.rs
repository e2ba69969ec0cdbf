//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod extract;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_config, LoadOptions};

#[derive(Parser)]
#[command(name = "menu-ocr")]
#[command(about = "Menu OCR service: extract text from uploaded images")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "MENU_OCR_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind: port, host, or host:port
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Extract text from a local image file and print it
    Ocr {
        /// Image file to read
        path: PathBuf,
    },

    /// Check whether the OCR engine is installed
    Check,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let config = load_config(&options).await?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { bind } => serve::cmd_serve(&config, bind.as_deref()).await,
        Commands::Ocr { path } => extract::cmd_ocr(&config, &path).await,
        Commands::Check => check::cmd_check(&config),
    }
}
