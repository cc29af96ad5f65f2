//! Length quantities
//!
//! Lengths are stored in millimetres, the unit every table in this crate
//! uses. Input may carry a unit suffix the way a CAD property editor
//! accepts it: `15`, `15 mm`, `1.5cm`, `0.5 in`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a length
#[derive(Debug, Error, PartialEq)]
pub enum UnitError {
    #[error("empty length")]
    Empty,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("unknown length unit '{0}' (expected mm, cm, m or in)")]
    UnknownUnit(String),

    #[error("length must be finite")]
    NotFinite,
}

/// A length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length(f64);

impl Length {
    pub const fn from_mm(mm: f64) -> Self {
        Self(mm)
    }

    pub fn mm(&self) -> f64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0.0
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mm", self.0)
    }
}

impl std::str::FromStr for Length {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(UnitError::Empty);
        }

        let number = s.trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '"');
        let unit = &s[number.len()..];
        let number = number.trim();

        let value: f64 = number
            .parse()
            .map_err(|_| UnitError::NotANumber(s.to_string()))?;

        let scale = match unit.trim().to_lowercase().as_str() {
            "" | "mm" => 1.0,
            "cm" => 10.0,
            "m" => 1000.0,
            "in" | "\"" => 25.4,
            other => return Err(UnitError::UnknownUnit(other.to_string())),
        };

        let mm = value * scale;
        if !mm.is_finite() {
            return Err(UnitError::NotFinite);
        }

        Ok(Length(mm))
    }
}
