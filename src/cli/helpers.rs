//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::Term;
use dialoguer::{theme::ColorfulTheme, Confirm};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::borrow::Cow;
use std::path::Path;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::standards::{iso4014, SizeTable};

/// Resolve `auto` against the configured default, then the command's own
pub fn resolve_format(global: &GlobalOpts, config: &Config, fallback: OutputFormat) -> OutputFormat {
    match global.format {
        OutputFormat::Auto => config
            .default_format
            .as_deref()
            .and_then(|f| f.parse::<OutputFormat>().ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback),
        f => f,
    }
}

/// Load the size table selected by `--table`, the config, or the built-in one
pub fn load_table(global: &GlobalOpts, config: &Config) -> Result<Cow<'static, SizeTable>> {
    match global.table.as_deref().or(config.table.as_deref()) {
        Some(path) => load_table_file(path).map(Cow::Owned),
        None => Ok(Cow::Borrowed(iso4014())),
    }
}

fn load_table_file(path: &Path) -> Result<SizeTable> {
    let source = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read size table {}", path.display()))?;
    Ok(SizeTable::from_yaml(&source, &path.display().to_string())?)
}

/// Format a dimension in millimetres without trailing noise
pub fn format_mm(value: f64) -> String {
    format!("{}", value)
}

/// Format an optional dimension, "-" when absent
pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_mm).unwrap_or_else(|| "-".to_string())
}

/// Ask for confirmation on a terminal; non-interactive runs proceed
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes || !Term::stdout().is_term() {
        return Ok(true);
    }
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()
        .into_diagnostic()
}
