//! Dimensional standards for fasteners
//!
//! - [`iso4014`] - hexagon head screws, partial thread (ISO 4014-1979)
//! - [`dimension`] - min/max limits as printed in the tables

pub mod dimension;
pub mod iso4014;

use miette::Diagnostic;
use thiserror::Error;

use crate::yaml::diagnostics::YamlSyntaxError;

pub use dimension::ToleranceRange;
pub use iso4014::{iso4014, ProductGrade, ScrewSize, SizeTable};

/// Errors raised while looking up or loading a size table
#[derive(Debug, Error, Diagnostic)]
pub enum TableError {
    #[error("unknown screw size '{size}'")]
    #[diagnostic(code(hexscrew::table::unknown_size), help("available sizes: {available}"))]
    UnknownSize { size: String, available: String },

    #[error("size {designation} is invalid: {reason}")]
    #[diagnostic(code(hexscrew::table::invalid_size))]
    InvalidSize { designation: String, reason: String },

    #[error("size {0} appears more than once")]
    #[diagnostic(code(hexscrew::table::duplicate_size))]
    DuplicateSize(String),

    #[error("size table has no sizes")]
    #[diagnostic(code(hexscrew::table::empty))]
    Empty,

    #[error("failed to serialize size table: {0}")]
    Serialize(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlSyntaxError),
}
