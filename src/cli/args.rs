//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    build::BuildArgs,
    completions::CompletionsArgs,
    config::ConfigCommands,
    install::{InstallArgs, StatusArgs, UninstallArgs},
    sizes::SizesCommands,
};

#[derive(Parser)]
#[command(name = "hexscrew")]
#[command(author, version, about = "Parametric ISO 4014 hexagon head screws")]
#[command(long_about = "Builds partial-thread hexagon head screws (ISO 4014) as CAD scripted objects from a dimensional lookup table, and installs the part into the host's macro directory.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// YAML size table to use instead of the built-in ISO 4014 table
    #[arg(long, global = true, env = "HEXSCREW_TABLE")]
    pub table: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the dimension table
    #[command(subcommand)]
    Sizes(SizesCommands),

    /// Build a screw and print its shape
    Build(BuildArgs),

    /// Install the part into the host macro directory
    Install(InstallArgs),

    /// Remove an installation
    Uninstall(UninstallArgs),

    /// Check an installation against its manifest
    #[command(name = "install-status", alias = "status")]
    Status(StatusArgs),

    /// View and edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for shapes, tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}
