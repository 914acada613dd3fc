use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "officepdf")]
#[command(author, version, about = "Convert office documents to PDF with LibreOffice")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert documents to PDF, one after another
    Convert {
        /// Documents to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output folder (defaults to the configured folder, ~/Desktop)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Create a missing output folder without asking
        #[arg(short, long, conflicts_with = "no_create")]
        yes: bool,

        /// Never create a missing output folder
        #[arg(long)]
        no_create: bool,

        /// Accept files with any extension
        #[arg(long)]
        all_files: bool,

        /// Per-file timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Print events as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Check that the converter is installed
    Check,

    /// Start an interactive session to build and convert a queue
    Session {
        /// Output folder (defaults to the configured folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Accept files with any extension
        #[arg(long)]
        all_files: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Write a commented default configuration file
    InitConfig {
        /// Where to write the file
        #[arg(default_value = "officepdf.toml")]
        path: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display version information
    Version,
}
