//! Table formatting for the dimension listings
//!
//! Rows are rendered as aligned TSV for the terminal, CSV through the
//! `csv` writer, or Markdown through `tabled`.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::format_optional;
use crate::cli::OutputFormat;
use crate::standards::ProductGrade;

/// Column definition: key (used in CSV headers) and display header
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str) -> Self {
        Self { key, header }
    }
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Size designation (cyan)
    Size(String),
    /// Dimension in mm, "-" when the standard lists none
    Number(Option<f64>),
    /// Product grade (A green, B yellow)
    Grade(ProductGrade),
    /// Deprecation note (yellow), empty when absent
    Note(Option<String>),
}

impl CellValue {
    /// Plain text without styling
    pub fn raw(&self) -> String {
        match self {
            CellValue::Size(s) => s.clone(),
            CellValue::Number(n) => format_optional(*n),
            CellValue::Grade(g) => g.to_string(),
            CellValue::Note(n) => n.clone().unwrap_or_default(),
        }
    }

    fn format_tsv(&self, width: usize) -> String {
        let raw = self.raw();
        let padded = format!("{:<width$}", raw, width = width);
        match self {
            CellValue::Size(_) => style(padded).cyan().to_string(),
            CellValue::Number(None) => style(padded).dim().to_string(),
            CellValue::Number(Some(_)) => padded,
            CellValue::Grade(ProductGrade::A) => style(padded).green().to_string(),
            CellValue::Grade(ProductGrade::B) => style(padded).yellow().to_string(),
            CellValue::Note(_) => style(padded).yellow().to_string(),
        }
    }
}

/// One rendered row, cells in column order
pub type TableRow = Vec<CellValue>;

/// Formats rows for one set of columns
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    /// Disable the "N size(s) found" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Render rows in the requested format
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => Ok(self.render_md(rows)),
            _ => Ok(self.render_tsv(rows)),
        }
    }

    /// Print rows in the requested format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) -> Result<()> {
        print!("{}", self.render(rows, format)?);
        Ok(())
    }

    /// Calculate column widths based on actual content
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                rows.iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| c.raw().chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(col.header.len())
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| style(format!("{:<width$}", col.header, width = w)).bold().to_string())
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| cell.format_tsv(*w))
                .collect();
            out.push_str(cells.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&style(format!("{} {}(s) found", rows.len(), self.entity_name)).dim().to_string());
            out.push('\n');
        }

        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.columns.iter().map(|c| c.key))
            .into_diagnostic()?;
        for row in rows {
            writer
                .write_record(row.iter().map(|c| c.raw()))
                .into_diagnostic()?;
        }
        let bytes = writer.into_inner().into_diagnostic()?;
        String::from_utf8(bytes).into_diagnostic()
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.columns.iter().map(|c| c.header));
        for row in rows {
            builder.push_record(row.iter().map(|c| c.raw()));
        }
        let mut out = builder.build().with(Style::markdown()).to_string();
        out.push('\n');
        out
    }
}
