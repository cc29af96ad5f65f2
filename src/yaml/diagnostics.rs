//! Source-annotated diagnostics for YAML table files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("invalid size table: {message}")]
#[diagnostic(code(hexscrew::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build a diagnostic from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    /// The underlying parser message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Convert a 1-based line/column to a byte offset, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut line_start = 0;
    for (index, text) in source.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            let col_offset = text
                .char_indices()
                .nth(column.saturating_sub(1))
                .map(|(i, _)| i)
                .unwrap_or(text.len());
            return line_start + col_offset;
        }
        line_start += text.len();
    }

    source.len().saturating_sub(1)
}

/// Suggest a fix for the common mistakes in hand-edited tables
fn generate_help(message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    if msg_lower.contains("tab") {
        return Some("YAML requires spaces for indentation, not tabs.".to_string());
    }

    if msg_lower.contains("missing field") {
        return Some(
            "Every size needs designation, d, thread_pitch, washer_face, ds, k_nom, s and product_grade."
                .to_string(),
        );
    }

    if msg_lower.contains("unknown variant") {
        return Some("product_grade is 'A' or 'B'; thread is 'partial' or 'full'; head is 'hex'.".to_string());
    }

    if msg_lower.contains("invalid type") {
        return Some("Dimensions are plain numbers in millimetres, without units.".to_string());
    }

    if msg_lower.contains("duplicate") {
        return Some("Each key can only appear once per size.".to_string());
    }

    if msg_lower.contains("mapping values are not allowed") {
        return Some("You may be missing a space after ':' or have incorrect indentation.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
        assert_eq!(line_col_to_offset(source, 9, 1), 16);
    }

    #[test]
    fn test_help_generation() {
        assert!(generate_help("sizes[0]: missing field `k_nom`").is_some());
        assert!(generate_help("unknown variant `C`, expected `A` or `B`").is_some());
        assert!(generate_help("found tab character").is_some());
        assert!(generate_help("some random error").is_none());
    }

    #[test]
    fn test_from_serde_error_keeps_message() {
        let source = "standard: ISO 4014\nedition: [\n";
        let err = serde_yml::from_str::<serde_yml::Value>(source).unwrap_err();
        let diag = YamlSyntaxError::from_serde_error(&err, source, "table.yaml");
        assert!(!diag.message().is_empty());
        assert!(diag.to_string().starts_with("invalid size table"));
    }
}
