//! Toleranced dimensions as published in fastener standards

use serde::{Deserialize, Serialize};

/// A dimension given as a min/max pair, in millimetres
///
/// Standards tables list limits rather than nominal +/- tolerances, so the
/// range is stored exactly as printed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceRange {
    /// Lower limit
    pub min: f64,

    /// Upper limit
    pub max: f64,
}

impl ToleranceRange {
    /// Create a range from its limits
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Midpoint of the range
    pub fn mid(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    /// Get the total tolerance band
    pub fn band(&self) -> f64 {
        self.max - self.min
    }

    /// Check whether a measured value lies within the limits (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when both limits are finite and ordered
    pub fn is_well_formed(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl std::fmt::Display for ToleranceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}
