//! `hexscrew build` command - Build a screw and print its shape

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::{format_mm, load_table, resolve_format};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Config, Length, ScriptedFeature};
use crate::geometry::ConstructionKernel;
use crate::parts::hex_screw::{LENGTH, SIZE};
use crate::parts::{PartialHexScrew, ScrewGeometry};

#[derive(clap::Args, Debug)]
pub struct BuildArgs {
    /// Size designation (e.g. M8)
    #[arg(long, short = 's')]
    pub size: String,

    /// Shaft length (e.g. 40, "40 mm", "1.5 in"); defaults to the configured length, then 15 mm
    #[arg(long, short = 'l', allow_hyphen_values = true)]
    pub length: Option<String>,

    /// Write the result to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Print derived dimensions instead of the shape tree
    #[arg(long)]
    pub summary: bool,
}

pub fn run(args: BuildArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let table = load_table(global, &config)?;

    let length = match args.length.as_deref() {
        Some(raw) => Some(raw.parse::<Length>().into_diagnostic()?),
        None => config.default_length().into_diagnostic()?,
    };

    // Resolve the size up front so an unknown size reports the table's help
    let size = table.get(&args.size)?;
    if let Some(ref note) = size.deprecation {
        if !global.quiet {
            eprintln!(
                "{} {} is a non-preferred size: {}",
                style("!").yellow(),
                style(&size.designation).cyan(),
                note
            );
        }
    }
    let designation = size.designation.to_string();

    let mut proxy = PartialHexScrew::with_table(table.into_owned());
    if let Some(length) = length {
        proxy = proxy.default_length(length);
    }

    let mut screw = ScriptedFeature::new("Screw", proxy, ConstructionKernel::new())?;
    screw.set_property(SIZE, designation.as_str())?;
    screw.recompute()?;

    let length = screw
        .object()
        .properties
        .length(LENGTH)
        .into_diagnostic()?;

    let format = resolve_format(global, &config, OutputFormat::Yaml);
    let rendered = if args.summary {
        let size = screw.proxy().table().get(&designation)?;
        render(&ScrewGeometry::new(size, length.mm()), format)?
    } else {
        let shape = screw
            .shape()
            .ok_or_else(|| miette::miette!("recompute produced no shape"))?;
        render(shape, format)?
    };

    match args.output {
        Some(path) => {
            fs::write(&path, &rendered).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Built {} x {} mm to {}",
                    style("✓").green(),
                    style(&designation).cyan(),
                    format_mm(length.mm()),
                    style(path.display()).dim()
                );
            }
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yml::to_string(value).into_diagnostic(),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            Ok(json + "\n")
        }
        other => Err(miette::miette!(
            help = "use --format yaml or --format json",
            "build output cannot be written as {:?}",
            other
        )),
    }
}
