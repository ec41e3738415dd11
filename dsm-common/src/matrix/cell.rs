//! Pairwise-comparison cell values
//!
//! A cell holds either a plain number (`"3"`, `"2.5"`) or a unit fraction
//! (`"1/3"`). The authored string is always kept verbatim so that no
//! precision is lost when the mirror cell is derived from it.

use once_cell::sync::Lazy;
use regex::Regex;

use super::MatrixError;

static PLAIN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("plain cell pattern is valid"));

static RECIPROCAL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1/([0-9]+(\.[0-9]+)?)$").expect("reciprocal cell pattern is valid"));

/// Parsed form of a non-empty comparison cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Plain numeric string, kept exactly as typed
    Plain(String),
    /// `1/d` form; holds the bare denominator string `d`
    Reciprocal(String),
}

impl CellValue {
    /// Parse a raw cell string
    ///
    /// Accepts `^[0-9]+(\.[0-9]+)?$` or `^1/[0-9]+(\.[0-9]+)?$`. Anything else,
    /// including surrounding whitespace, is rejected with
    /// [`MatrixError::InvalidCellFormat`].
    pub fn parse(raw: &str) -> Result<Self, MatrixError> {
        if PLAIN_PATTERN.is_match(raw) {
            return Ok(CellValue::Plain(raw.to_string()));
        }

        if let Some(caps) = RECIPROCAL_PATTERN.captures(raw) {
            return Ok(CellValue::Reciprocal(caps[1].to_string()));
        }

        Err(MatrixError::InvalidCellFormat {
            value: raw.to_string(),
        })
    }

    /// String to store in the mirror cell `(j, i)` when this value sits at `(i, j)`
    ///
    /// - `1/d` mirrors to `d`
    /// - a plain value equal to 1 mirrors to `1`
    /// - any other plain value `v` mirrors to `1/v`, reusing the original text
    pub fn mirror(&self) -> String {
        match self {
            CellValue::Reciprocal(denominator) => denominator.clone(),
            CellValue::Plain(value) => {
                if value.parse::<f64>().map(|v| v == 1.0).unwrap_or(false) {
                    "1".to_string()
                } else {
                    format!("1/{}", value)
                }
            }
        }
    }

    /// Numeric value represented by the cell
    pub fn to_f64(&self) -> f64 {
        match self {
            CellValue::Plain(value) => value.parse().unwrap_or(f64::NAN),
            CellValue::Reciprocal(denominator) => {
                1.0 / denominator.parse::<f64>().unwrap_or(f64::NAN)
            }
        }
    }
}
