//! `hexscrew config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{CONFIG_ENV, VALID_KEYS};
use crate::core::{Config, Length};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show(ShowArgs),

    /// Set a configuration value in the user config file
    Set(SetArgs),

    /// Remove a configuration value from the user config file
    Unset(UnsetArgs),

    /// Show the path of the user config file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,

    /// Print the user config file as written instead of the effective values
    #[arg(long = "file-only")]
    pub file_only: bool,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (see `hexscrew config keys`)
    pub key: String,

    /// Value to set
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, _global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    if args.file_only {
        let path = config_path()?;
        println!(
            "{} {}",
            style("User config:").bold(),
            style(path.display()).dim()
        );
        println!();
        if path.exists() {
            print!("{}", fs::read_to_string(&path).into_diagnostic()?);
        } else {
            println!("{}", style("(not created)").dim());
        }
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        print_config_value(key, config.get(key).as_deref());
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (HEXSCREW_MACRO_DIR, HEXSCREW_TABLE, HEXSCREW_DEFAULT_LENGTH)");
    println!("  2. User config file (see `hexscrew config path`, moved with {})", CONFIG_ENV);
    println!("  3. Built-in defaults");

    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    check_value(&args.key, &args.value)?;

    let path = config_path()?;
    let mut config_map = read_mapping(&path)?;
    config_map.insert(args.key.clone(), ConfigEntry::Text(args.value.clone()));

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    write_mapping(&path, config_map)?;

    println!(
        "{} Set {} {} {}",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow()
    );

    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;

    let path = config_path()?;
    if !path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            path.display()
        ));
    }

    let mut config_map = read_mapping(&path)?;
    if config_map.remove(&args.key).is_none() {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }
    write_mapping(&path, config_map)?;

    println!(
        "{} Removed {} from config",
        style("✓").green(),
        style(&args.key).cyan()
    );

    Ok(())
}

fn run_path() -> Result<()> {
    let path = config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in VALID_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'hexscrew config set <key> <value>' to set a value.").dim()
    );

    Ok(())
}

// Helper functions

fn config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine the user config directory"))
}

fn check_key(key: &str) -> Result<()> {
    if VALID_KEYS.iter().any(|(k, _)| *k == key) {
        return Ok(());
    }
    let keys: Vec<&str> = VALID_KEYS.iter().map(|(k, _)| *k).collect();
    Err(miette::miette!(
        help = format!("valid keys: {}", keys.join(", ")),
        "Unknown configuration key '{}'",
        key
    ))
}

fn check_value(key: &str, value: &str) -> Result<()> {
    match key {
        "default_length" => {
            let length: Length = value.parse().into_diagnostic()?;
            if !length.is_positive() {
                return Err(miette::miette!("default_length must be positive, got {}", length));
            }
        }
        "default_format" => {
            value
                .parse::<OutputFormat>()
                .map_err(|e| miette::miette!("{}", e))?;
        }
        _ => {}
    }
    Ok(())
}

/// A value in the user config file; entries written by hand keep their YAML form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum ConfigEntry {
    Text(String),
    Other(serde_yml::Value),
}

type ConfigMap = BTreeMap<String, ConfigEntry>;

fn read_mapping(path: &Path) -> Result<ConfigMap> {
    if !path.exists() {
        return Ok(ConfigMap::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    if content.trim().is_empty() {
        return Ok(ConfigMap::new());
    }
    serde_yml::from_str::<Option<ConfigMap>>(&content)
        .map(Option::unwrap_or_default)
        .map_err(|e| miette::miette!("cannot parse {} as a mapping: {}", path.display(), e))
}

fn write_mapping(path: &Path, map: ConfigMap) -> Result<()> {
    let yaml = serde_yml::to_string(&map).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}
