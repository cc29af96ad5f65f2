//! `hexscrew install`, `uninstall` and `install-status` commands

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{confirm, load_table, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::install::resolve_macro_dir;
use crate::core::{Config, InstallError, InstallStatus, Installer};

#[derive(clap::Args, Debug)]
pub struct InstallArgs {
    /// Macro directory (default: configured macro_dir, then the host's default)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Overwrite an existing installation
    #[arg(long)]
    pub force: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct UninstallArgs {
    /// Macro directory (default: configured macro_dir, then the host's default)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Macro directory (default: configured macro_dir, then the host's default)
    #[arg(long, short = 'd')]
    pub dir: Option<PathBuf>,
}

pub fn run_install(args: InstallArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let table = load_table(global, &config)?;
    let installer = Installer::new(resolve_macro_dir(args.dir.as_deref(), &config)?);

    let target = installer.install_dir();
    if args.force && target.exists() {
        let prompt = format!("Overwrite the installation in {}?", target.display());
        if !confirm(&prompt, args.yes)? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }
        if let Ok(InstallStatus::Installed { modified, .. }) = installer.status() {
            for path in modified {
                eprintln!(
                    "{} {} was edited after install and will be replaced",
                    style("!").yellow(),
                    style(path).yellow()
                );
            }
        }
    }

    let manifest = installer.install(&table, args.force)?;

    if !global.quiet {
        println!(
            "{} Installed {} ({} sizes) into {}",
            style("✓").green(),
            style(table.title()).cyan(),
            table.len(),
            style(target.display()).dim()
        );
        for file in &manifest.files {
            println!(
                "  {} {}",
                style(&file.path).yellow(),
                style(&file.sha256[..12]).dim()
            );
        }
    }

    Ok(())
}

pub fn run_uninstall(args: UninstallArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let installer = Installer::new(resolve_macro_dir(args.dir.as_deref(), &config)?);
    let target = installer.install_dir();

    // Surface a missing installation before prompting
    if installer.manifest()?.is_none() {
        return Err(InstallError::NotInstalled(target).into());
    }

    let prompt = format!("Remove the installation in {}?", target.display());
    if !confirm(&prompt, args.yes)? {
        println!("{}", style("Cancelled").dim());
        return Ok(());
    }

    let manifest = installer.uninstall()?;
    if !global.quiet {
        println!(
            "{} Removed {} {} ({} file(s)) from {}",
            style("✓").green(),
            manifest.package,
            manifest.version,
            manifest.files.len(),
            style(target.display()).dim()
        );
        if target.exists() {
            println!(
                "  {}",
                style("directory kept: it contains files not created by install").dim()
            );
        }
    }

    Ok(())
}

pub fn run_status(args: StatusArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let installer = Installer::new(resolve_macro_dir(args.dir.as_deref(), &config)?);
    let status = installer.status()?;

    match resolve_format(global, &config, OutputFormat::Auto) {
        format @ (OutputFormat::Yaml | OutputFormat::Json) => {
            let (manifest, modified, missing) = match &status {
                InstallStatus::NotInstalled => (None, Vec::new(), Vec::new()),
                InstallStatus::Installed {
                    manifest,
                    modified,
                    missing,
                } => (Some(manifest), modified.clone(), missing.clone()),
            };
            let report = serde_json::json!({
                "dir": installer.install_dir(),
                "installed": manifest.is_some(),
                "clean": status.is_clean(),
                "manifest": manifest,
                "modified": modified,
                "missing": missing,
            });
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
            } else {
                print!("{}", serde_yml::to_string(&report).into_diagnostic()?);
            }
        }
        _ => print_status(&installer, &status),
    }

    Ok(())
}

fn print_status(installer: &Installer, status: &InstallStatus) {
    let dir = installer.install_dir();
    match status {
        InstallStatus::NotInstalled => {
            println!(
                "{} Not installed in {}",
                style("○").dim(),
                style(dir.display()).dim()
            );
        }
        InstallStatus::Installed {
            manifest,
            modified,
            missing,
        } => {
            let marker = if status.is_clean() {
                style("✓").green()
            } else {
                style("!").yellow()
            };
            println!(
                "{} {} {} installed in {}",
                marker,
                style(&manifest.package).cyan(),
                manifest.version,
                style(dir.display()).dim()
            );
            println!(
                "  {}: {}",
                style("Installed").bold(),
                manifest.installed.format("%Y-%m-%d %H:%M:%S UTC")
            );
            for file in &manifest.files {
                let state = if missing.contains(&file.path) {
                    style("missing").red()
                } else if modified.contains(&file.path) {
                    style("modified").yellow()
                } else {
                    style("ok").green()
                };
                println!("  {:<20} {}", file.path, state);
            }
        }
    }
}
