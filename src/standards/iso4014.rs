//! ISO 4014 (1979) - hexagon head screws with partial thread
//!
//! Dimensions in millimetres. Product grade A covers d <= 24 (and l <= 10d
//! or 150 mm), grade B the larger sizes. Head heights are published for
//! both tolerance regimes where the standard defines them.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;

use crate::standards::dimension::ToleranceRange;
use crate::standards::TableError;
use crate::yaml::diagnostics::YamlSyntaxError;

/// Product grade (accuracy class)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProductGrade {
    A,
    B,
}

impl std::fmt::Display for ProductGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductGrade::A => write!(f, "A"),
            ProductGrade::B => write!(f, "B"),
        }
    }
}

/// Thread extent along the shank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadExtent {
    Partial,
    Full,
}

/// Head style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadStyle {
    Hex,
}

/// Reference thread length b, by nominal length band
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThreadLengths {
    /// l <= 125
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b1: Option<f64>,

    /// 125 < l <= 200
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b2: Option<f64>,

    /// l > 200
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub b3: Option<f64>,
}

/// One row of the dimension table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrewSize {
    /// Size designation, e.g. "M8"
    pub designation: Cow<'static, str>,

    /// Nominal thread diameter
    pub d: f64,

    /// Coarse thread pitch P
    pub thread_pitch: f64,

    /// Reference thread lengths
    #[serde(default)]
    pub b: ThreadLengths,

    /// Washer face height c
    pub washer_face: ToleranceRange,

    /// Shank diameter ds
    pub ds: ToleranceRange,

    /// Nominal head height k
    pub k_nom: f64,

    /// Head height, product grade A limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_grade_a: Option<ToleranceRange>,

    /// Head height, product grade B limits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k_grade_b: Option<ToleranceRange>,

    /// Width across flats s
    pub s: ToleranceRange,

    /// Product grade the size is supplied in
    pub product_grade: ProductGrade,

    /// Note for non-preferred sizes (e.g. "avoid")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<Cow<'static, str>>,
}

impl ScrewSize {
    /// Head height limits for a tolerance regime, if the standard lists them
    pub fn head_height(&self, grade: ProductGrade) -> Option<ToleranceRange> {
        match grade {
            ProductGrade::A => self.k_grade_a,
            ProductGrade::B => self.k_grade_b,
        }
    }

    /// Head height limits for the grade the size is supplied in
    pub fn default_head_height(&self) -> Option<ToleranceRange> {
        self.head_height(self.product_grade)
    }

    /// Reference thread length b for a nominal screw length
    pub fn reference_thread_length(&self, length: f64) -> Option<f64> {
        if length <= 125.0 {
            self.b.b1
        } else if length <= 200.0 {
            self.b.b2
        } else {
            self.b.b3
        }
    }

    /// True for non-preferred sizes
    pub fn is_deprecated(&self) -> bool {
        self.deprecation.is_some()
    }

    /// Numeric part of the designation ("M12" -> 12)
    pub fn designation_number(&self) -> Option<u32> {
        designation_number(&self.designation)
    }

    /// Check the row for internal consistency
    pub fn validate(&self) -> Result<(), TableError> {
        let invalid = |reason: String| TableError::InvalidSize {
            designation: self.designation.to_string(),
            reason,
        };

        if self.designation_number().is_none() {
            return Err(invalid("designation must look like 'M<number>'".to_string()));
        }

        for (name, value) in [
            ("d", self.d),
            ("thread_pitch", self.thread_pitch),
            ("k_nom", self.k_nom),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        let mut ranges = vec![("washer_face", self.washer_face), ("ds", self.ds), ("s", self.s)];
        if let Some(k) = self.k_grade_a {
            ranges.push(("k_grade_a", k));
        }
        if let Some(k) = self.k_grade_b {
            ranges.push(("k_grade_b", k));
        }
        for (name, range) in ranges {
            if !range.is_well_formed() || range.min < 0.0 {
                return Err(invalid(format!("{} limits are invalid ({})", name, range)));
            }
        }

        if self.ds.max <= 0.0 || self.s.max <= 0.0 {
            return Err(invalid("ds and s must be positive".to_string()));
        }

        // The shank must stay inside the hexagon's inscribed circle
        if self.ds.max >= self.s.max {
            return Err(invalid(format!(
                "shank diameter {} does not fit inside across-flats {}",
                self.ds.max, self.s.max
            )));
        }

        Ok(())
    }
}

/// Parse the number after the leading "M" of a designation
pub fn designation_number(designation: &str) -> Option<u32> {
    let rest = designation
        .trim()
        .strip_prefix('M')
        .or_else(|| designation.trim().strip_prefix('m'))?;
    let plain = !rest.is_empty()
        && rest.bytes().all(|b| b.is_ascii_digit())
        && !rest.starts_with('0');
    if !plain {
        return None;
    }
    rest.parse().ok()
}

/// A dimension table for one screw standard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeTable {
    /// Standard number, e.g. "ISO 4014"
    pub standard: Cow<'static, str>,

    /// Edition year
    pub edition: Cow<'static, str>,

    /// Thread extent
    pub thread: ThreadExtent,

    /// Head style
    pub head: HeadStyle,

    /// Size rows
    pub sizes: Cow<'static, [ScrewSize]>,
}

impl SizeTable {
    /// Look up a size by designation (case-insensitive)
    pub fn get(&self, designation: &str) -> Result<&ScrewSize, TableError> {
        let wanted = designation.trim();
        self.sizes
            .iter()
            .find(|s| s.designation.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| TableError::UnknownSize {
                size: designation.to_string(),
                available: self.designations().join(", "),
            })
    }

    /// Designations ordered by the number after the "M"
    pub fn designations(&self) -> Vec<String> {
        self.sorted_sizes()
            .into_iter()
            .map(|s| s.designation.to_string())
            .collect()
    }

    /// Rows ordered by the number after the "M"
    pub fn sorted_sizes(&self) -> Vec<&ScrewSize> {
        let mut sizes: Vec<&ScrewSize> = self.sizes.iter().collect();
        sizes.sort_by(|a, b| {
            a.designation_number()
                .unwrap_or(u32::MAX)
                .cmp(&b.designation_number().unwrap_or(u32::MAX))
                .then_with(|| a.designation.cmp(&b.designation))
        });
        sizes
    }

    /// Number of sizes in the table
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Human-readable title, e.g. "ISO 4014-1979"
    pub fn title(&self) -> String {
        format!("{}-{}", self.standard, self.edition)
    }

    /// Validate every row and reject duplicate designations
    pub fn validate(&self) -> Result<(), TableError> {
        if self.sizes.is_empty() {
            return Err(TableError::Empty);
        }

        let mut seen = HashSet::new();
        for size in self.sizes.iter() {
            size.validate()?;
            if !seen.insert(size.designation.to_uppercase()) {
                return Err(TableError::DuplicateSize(size.designation.to_string()));
            }
        }

        Ok(())
    }

    /// Serialize the table to YAML
    pub fn to_yaml(&self) -> Result<String, TableError> {
        serde_yml::to_string(self).map_err(|e| TableError::Serialize(e.to_string()))
    }

    /// Parse and validate a table from YAML source
    pub fn from_yaml(source: &str, filename: &str) -> Result<Self, TableError> {
        let table: SizeTable = serde_yml::from_str(source)
            .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename))?;
        table.validate()?;
        Ok(table)
    }
}

/// The built-in ISO 4014-1979 table
pub fn iso4014() -> &'static SizeTable {
    &ISO_4014_1979
}

const fn r(min: f64, max: f64) -> ToleranceRange {
    ToleranceRange::new(min, max)
}

const fn b(b1: Option<f64>, b2: Option<f64>, b3: Option<f64>) -> ThreadLengths {
    ThreadLengths { b1, b2, b3 }
}

static ISO_4014_1979: SizeTable = SizeTable {
    standard: Cow::Borrowed("ISO 4014"),
    edition: Cow::Borrowed("1979"),
    thread: ThreadExtent::Partial,
    head: HeadStyle::Hex,
    sizes: Cow::Borrowed(&[
        ScrewSize {
            designation: Cow::Borrowed("M3"),
            d: 3.0,
            thread_pitch: 0.5,
            b: b(Some(12.0), None, None),
            washer_face: r(0.15, 0.4),
            ds: r(2.86, 3.0),
            k_nom: 2.0,
            k_grade_a: Some(r(1.8, 2.12)),
            k_grade_b: None,
            s: r(5.32, 5.5),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M4"),
            d: 4.0,
            thread_pitch: 0.7,
            b: b(Some(14.0), None, None),
            washer_face: r(0.15, 0.4),
            ds: r(3.82, 4.0),
            k_nom: 2.8,
            k_grade_a: Some(r(2.68, 2.92)),
            k_grade_b: None,
            s: r(6.78, 7.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M5"),
            d: 5.0,
            thread_pitch: 0.8,
            b: b(Some(16.0), None, None),
            washer_face: r(0.15, 0.5),
            ds: r(4.82, 5.0),
            k_nom: 3.5,
            k_grade_a: Some(r(3.35, 3.65)),
            k_grade_b: Some(r(3.26, 3.74)),
            s: r(7.78, 8.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M6"),
            d: 6.0,
            thread_pitch: 1.0,
            b: b(Some(18.0), None, None),
            washer_face: r(0.15, 0.5),
            ds: r(5.82, 6.0),
            k_nom: 4.0,
            k_grade_a: Some(r(3.85, 4.15)),
            k_grade_b: Some(r(3.76, 4.24)),
            s: r(9.78, 10.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M8"),
            d: 8.0,
            thread_pitch: 1.25,
            b: b(Some(22.0), Some(28.0), None),
            washer_face: r(0.15, 0.6),
            ds: r(7.78, 8.0),
            k_nom: 5.3,
            k_grade_a: Some(r(5.15, 5.45)),
            k_grade_b: Some(r(5.06, 5.54)),
            s: r(12.73, 13.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M10"),
            d: 10.0,
            thread_pitch: 1.5,
            b: b(Some(26.0), Some(32.0), None),
            washer_face: r(0.15, 0.6),
            ds: r(9.78, 10.0),
            k_nom: 6.4,
            k_grade_a: Some(r(6.22, 6.58)),
            k_grade_b: Some(r(6.11, 6.69)),
            s: r(15.73, 16.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M12"),
            d: 12.0,
            thread_pitch: 1.75,
            b: b(Some(30.0), Some(36.0), None),
            washer_face: r(0.15, 0.6),
            ds: r(11.73, 12.0),
            k_nom: 7.5,
            k_grade_a: Some(r(7.32, 7.68)),
            k_grade_b: Some(r(7.21, 7.79)),
            s: r(17.73, 18.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M14"),
            d: 14.0,
            thread_pitch: 2.0,
            b: b(Some(34.0), Some(40.0), None),
            washer_face: r(0.15, 0.6),
            ds: r(13.73, 14.0),
            k_nom: 8.8,
            k_grade_a: Some(r(8.62, 8.98)),
            k_grade_b: Some(r(8.51, 9.09)),
            s: r(20.67, 21.0),
            product_grade: ProductGrade::A,
            deprecation: Some(Cow::Borrowed("avoid")),
        },
        ScrewSize {
            designation: Cow::Borrowed("M16"),
            d: 16.0,
            thread_pitch: 2.0,
            b: b(Some(38.0), Some(44.0), Some(57.0)),
            washer_face: r(0.2, 0.8),
            ds: r(15.73, 16.0),
            k_nom: 10.0,
            k_grade_a: Some(r(9.82, 10.18)),
            k_grade_b: Some(r(9.71, 10.29)),
            s: r(23.67, 24.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M20"),
            d: 20.0,
            thread_pitch: 2.5,
            b: b(Some(46.0), Some(52.0), Some(65.0)),
            washer_face: r(0.2, 0.8),
            ds: r(19.67, 20.0),
            k_nom: 12.5,
            k_grade_a: Some(r(12.28, 12.72)),
            k_grade_b: Some(r(12.15, 12.85)),
            s: r(29.67, 30.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M24"),
            d: 24.0,
            thread_pitch: 3.0,
            b: b(Some(54.0), Some(60.0), Some(73.0)),
            washer_face: r(0.2, 0.8),
            ds: r(23.67, 24.0),
            k_nom: 15.0,
            k_grade_a: Some(r(14.78, 15.22)),
            k_grade_b: Some(r(14.65, 15.35)),
            s: r(35.38, 36.0),
            product_grade: ProductGrade::A,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M30"),
            d: 30.0,
            thread_pitch: 3.5,
            b: b(Some(66.0), Some(72.0), Some(85.0)),
            washer_face: r(0.2, 0.8),
            ds: r(29.67, 30.0),
            k_nom: 18.7,
            k_grade_a: None,
            k_grade_b: Some(r(18.28, 19.12)),
            s: r(45.0, 46.0),
            product_grade: ProductGrade::B,
            deprecation: None,
        },
        ScrewSize {
            designation: Cow::Borrowed("M36"),
            d: 36.0,
            thread_pitch: 4.0,
            b: b(Some(78.0), Some(84.0), Some(97.0)),
            washer_face: r(0.2, 0.8),
            ds: r(35.61, 36.0),
            k_nom: 22.5,
            k_grade_a: None,
            k_grade_b: Some(r(22.08, 22.92)),
            s: r(53.8, 55.0),
            product_grade: ProductGrade::B,
            deprecation: None,
        },
    ]),
};
