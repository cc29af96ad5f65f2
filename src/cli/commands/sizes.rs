//! `hexscrew sizes` command - Browse the dimension table

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_mm, format_optional, load_table, resolve_format};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::standards::{ProductGrade, ScrewSize, ToleranceRange};

#[derive(Subcommand, Debug)]
pub enum SizesCommands {
    /// List the sizes in the table
    List(ListArgs),

    /// Show all dimensions of one size
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Show every dimension column, not just the modelled ones
    #[arg(long, short = 'a')]
    pub all_columns: bool,

    /// List non-preferred sizes too (the default)
    #[arg(long, conflicts_with = "no_deprecated")]
    pub include_deprecated: bool,

    /// Hide non-preferred sizes
    #[arg(long)]
    pub no_deprecated: bool,

    /// Print only the number of sizes
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Size designation (e.g. M8, case-insensitive)
    pub size: String,
}

/// Columns used for the modelled dimensions
const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("size", "SIZE"),
    ColumnDef::new("s_max", "S MAX"),
    ColumnDef::new("k_nom", "K"),
    ColumnDef::new("ds_max", "DS MAX"),
    ColumnDef::new("grade", "GRADE"),
    ColumnDef::new("note", "NOTE"),
];

/// Every column of the table
const ALL_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("size", "SIZE"),
    ColumnDef::new("d", "D"),
    ColumnDef::new("pitch", "P"),
    ColumnDef::new("b1", "B1"),
    ColumnDef::new("b2", "B2"),
    ColumnDef::new("b3", "B3"),
    ColumnDef::new("dw_min", "DW MIN"),
    ColumnDef::new("ds_min", "DS MIN"),
    ColumnDef::new("ds_max", "DS MAX"),
    ColumnDef::new("k_nom", "K"),
    ColumnDef::new("k_a_min", "KA MIN"),
    ColumnDef::new("k_a_max", "KA MAX"),
    ColumnDef::new("k_b_min", "KB MIN"),
    ColumnDef::new("k_b_max", "KB MAX"),
    ColumnDef::new("s_min", "S MIN"),
    ColumnDef::new("s_max", "S MAX"),
    ColumnDef::new("grade", "GRADE"),
    ColumnDef::new("note", "NOTE"),
];

/// Run a sizes subcommand
pub fn run(cmd: SizesCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        SizesCommands::List(args) => run_list(args, global),
        SizesCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let table = load_table(global, &config)?;

    let sizes: Vec<&ScrewSize> = table
        .sorted_sizes()
        .into_iter()
        .filter(|s| !(args.no_deprecated && s.is_deprecated()))
        .collect();

    if args.count {
        println!("{}", sizes.len());
        return Ok(());
    }

    match resolve_format(global, &config, OutputFormat::Tsv) {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(&sizes).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&sizes).into_diagnostic()?;
            println!("{}", json);
        }
        format => {
            let (columns, rows): (&[ColumnDef], Vec<TableRow>) = if args.all_columns {
                (ALL_COLUMNS, sizes.iter().map(|s| full_row(s)).collect())
            } else {
                (COLUMNS, sizes.iter().map(|s| modelled_row(s)).collect())
            };
            let mut formatter = TableFormatter::new(columns, "size");
            if global.quiet {
                formatter = formatter.without_summary();
            }
            formatter.output(&rows, format)?;
        }
    }

    Ok(())
}

fn note(size: &ScrewSize) -> CellValue {
    CellValue::Note(size.deprecation.as_ref().map(|d| d.to_string()))
}

fn modelled_row(size: &ScrewSize) -> TableRow {
    vec![
        CellValue::Size(size.designation.to_string()),
        CellValue::Number(Some(size.s.max)),
        CellValue::Number(Some(size.k_nom)),
        CellValue::Number(Some(size.ds.max)),
        CellValue::Grade(size.product_grade),
        note(size),
    ]
}

fn full_row(size: &ScrewSize) -> TableRow {
    let k_a = size.head_height(ProductGrade::A);
    let k_b = size.head_height(ProductGrade::B);
    vec![
        CellValue::Size(size.designation.to_string()),
        CellValue::Number(Some(size.d)),
        CellValue::Number(Some(size.thread_pitch)),
        CellValue::Number(size.b.b1),
        CellValue::Number(size.b.b2),
        CellValue::Number(size.b.b3),
        CellValue::Number(Some(size.washer_face.min)),
        CellValue::Number(Some(size.ds.min)),
        CellValue::Number(Some(size.ds.max)),
        CellValue::Number(Some(size.k_nom)),
        CellValue::Number(k_a.map(|k| k.min)),
        CellValue::Number(k_a.map(|k| k.max)),
        CellValue::Number(k_b.map(|k| k.min)),
        CellValue::Number(k_b.map(|k| k.max)),
        CellValue::Number(Some(size.s.min)),
        CellValue::Number(Some(size.s.max)),
        CellValue::Grade(size.product_grade),
        note(size),
    ]
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let table = load_table(global, &config)?;
    let size = table.get(&args.size)?;

    match resolve_format(global, &config, OutputFormat::Auto) {
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(size).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(size).into_diagnostic()?;
            println!("{}", json);
        }
        _ => print_size(size, &table.title()),
    }

    Ok(())
}

fn print_range(label: &str, range: Option<ToleranceRange>) {
    match range {
        Some(r) => println!("{}: {} mm", style(label).bold(), r),
        None => println!("{}: {}", style(label).bold(), style("-").dim()),
    }
}

fn print_size(size: &ScrewSize, title: &str) {
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{}: {}",
        style("Size").bold(),
        style(&size.designation).cyan()
    );
    println!("{}: {}", style("Standard").bold(), title);
    println!(
        "{}: {}",
        style("Product grade").bold(),
        style(size.product_grade).green()
    );
    if let Some(ref note) = size.deprecation {
        println!("{}: {}", style("Note").bold(), style(note).yellow());
    }
    println!("{}", style("─".repeat(60)).dim());

    println!("{}: {} mm", style("Thread diameter d").bold(), format_mm(size.d));
    println!("{}: {} mm", style("Pitch P").bold(), format_mm(size.thread_pitch));
    println!(
        "{}: {} / {} / {} mm",
        style("Thread length b (l<=125 / <=200 / >200)").bold(),
        format_optional(size.b.b1),
        format_optional(size.b.b2),
        format_optional(size.b.b3)
    );
    print_range("Washer face dw", Some(size.washer_face));
    print_range("Shank ds", Some(size.ds));
    println!("{}: {} mm", style("Head height k (nominal)").bold(), format_mm(size.k_nom));
    print_range("Head height k, grade A", size.head_height(ProductGrade::A));
    print_range("Head height k, grade B", size.head_height(ProductGrade::B));
    print_range("Across flats s", Some(size.s));
}
