//! Reciprocal pairwise-comparison matrices
//!
//! A [`ComparisonMatrix`] is an `n × n` grid of cell strings where the
//! diagonal is always `"1"` and, for every edited pair, cell `(j, i)` is
//! the reciprocal of cell `(i, j)`. The cell the user touched is stored
//! verbatim; only its mirror is derived.
//!
//! Matrices cross the draft API as a row-major 2D array of strings with
//! `""` for unset cells. Deserialising replays the stored cells through
//! the same edit rule, so a restored matrix always has a fixed diagonal.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

mod cell;

pub use cell::CellValue;

/// Diagonal value of every comparison matrix
pub const DIAGONAL: &str = "1";

/// Tolerance used when checking that two cells multiply to one
const RECIPROCAL_EPSILON: f64 = 1e-9;

/// Rejected matrix edits. The matrix is left unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Value is neither a plain number nor a `1/d` fraction
    #[error("Invalid cell format: {value:?}")]
    InvalidCellFormat { value: String },

    /// Diagonal cells are fixed at 1 and never editable
    #[error("Diagonal cell ({index}, {index}) is fixed at 1")]
    DiagonalCell { index: usize },

    /// Row or column outside the matrix
    #[error("Cell ({row}, {col}) is outside a {size}x{size} matrix")]
    OutOfBounds { row: usize, col: usize, size: usize },
}

/// Square reciprocal comparison matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<String>>", from = "Vec<Vec<String>>")]
pub struct ComparisonMatrix {
    size: usize,
    /// Row-major cells; empty string means unset
    cells: Vec<String>,
}

impl ComparisonMatrix {
    /// Fresh matrix: diagonal `"1"`, everything else unset
    pub fn new(size: usize) -> Self {
        let mut cells = vec![String::new(); size * size];
        for i in 0..size {
            cells[i * size + i] = DIAGONAL.to_string();
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell contents, `Some("")` when unset, `None` when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        if row < self.size && col < self.size {
            Some(self.cells[row * self.size + col].as_str())
        } else {
            None
        }
    }

    pub fn is_set(&self, row: usize, col: usize) -> bool {
        self.get(row, col).map(|v| !v.is_empty()).unwrap_or(false)
    }

    /// Author cell `(row, col)` and derive its mirror `(col, row)`
    ///
    /// The authored string is stored as given. The mirror follows
    /// [`CellValue::mirror`]. On error nothing is written.
    pub fn set_cell(&mut self, row: usize, col: usize, raw: &str) -> Result<(), MatrixError> {
        self.check_editable(row, col)?;
        let value = CellValue::parse(raw)?;

        let mirror = value.mirror();
        self.write(row, col, raw.to_string());
        self.write(col, row, mirror);
        Ok(())
    }

    /// Clear cell `(row, col)` only
    ///
    /// The mirror keeps whatever value it was last given; clearing one side
    /// does not retract a previously derived reciprocal.
    pub fn clear_cell(&mut self, row: usize, col: usize) -> Result<(), MatrixError> {
        self.check_editable(row, col)?;
        self.write(row, col, String::new());
        Ok(())
    }

    /// Rebuild a matrix from a sparse, ordered edit set
    ///
    /// Each `((row, col), value)` is applied with [`set_cell`](Self::set_cell)
    /// semantics in the order supplied, so the last edit touching a pair
    /// wins. Empty values, diagonal keys, out-of-range keys and unparseable
    /// values are skipped. Cells never mentioned stay unset.
    pub fn reconstruct<I, S>(size: usize, cells: I) -> Self
    where
        I: IntoIterator<Item = ((usize, usize), S)>,
        S: AsRef<str>,
    {
        let mut matrix = Self::new(size);

        for ((row, col), value) in cells {
            let value = value.as_ref();
            if value.is_empty() || row == col {
                continue;
            }
            if let Err(e) = matrix.set_cell(row, col, value) {
                debug!(row, col, error = %e, "Skipping cell during matrix reconstruction");
            }
        }

        matrix
    }

    /// Replay a stored row-major grid through [`reconstruct`](Self::reconstruct)
    ///
    /// The matrix size is the number of rows. Ragged rows are tolerated:
    /// missing cells are treated as unset and surplus columns are ignored.
    pub fn restore_from_rows(rows: &[Vec<String>]) -> Self {
        let size = rows.len();
        let cells = rows.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(move |(j, _)| *j < size)
                .map(move |(j, value)| ((i, j), value.as_str()))
        });
        Self::reconstruct(size, cells)
    }

    /// Row-major 2D array of cell strings, `""` for unset cells
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(|row| row.to_vec()).collect()
    }

    /// Check the diagonal and every pair where both cells are set
    ///
    /// A pair with only one side set (left behind by
    /// [`clear_cell`](Self::clear_cell)) is not counted as a violation.
    pub fn is_reciprocal_consistent(&self) -> bool {
        for i in 0..self.size {
            if self.cells[i * self.size + i] != DIAGONAL {
                return false;
            }
            for j in (i + 1)..self.size {
                let upper = &self.cells[i * self.size + j];
                let lower = &self.cells[j * self.size + i];
                if upper.is_empty() || lower.is_empty() {
                    continue;
                }
                match (CellValue::parse(upper), CellValue::parse(lower)) {
                    (Ok(a), Ok(b)) => {
                        let product = a.to_f64() * b.to_f64();
                        if !((product - 1.0).abs() < RECIPROCAL_EPSILON) {
                            return false;
                        }
                    }
                    _ => return false,
                }
            }
        }
        true
    }

    fn check_editable(&self, row: usize, col: usize) -> Result<(), MatrixError> {
        if row >= self.size || col >= self.size {
            return Err(MatrixError::OutOfBounds {
                row,
                col,
                size: self.size,
            });
        }
        if row == col {
            return Err(MatrixError::DiagonalCell { index: row });
        }
        Ok(())
    }

    fn write(&mut self, row: usize, col: usize, value: String) {
        self.cells[row * self.size + col] = value;
    }
}

/// Check a stored grid as-is, without replaying it through the edit rule
///
/// Used where a saved document must be inspected rather than repaired.
/// Non-square grids are reported as inconsistent.
pub fn rows_are_reciprocal(rows: &[Vec<String>]) -> bool {
    let size = rows.len();
    if rows.iter().any(|row| row.len() != size) {
        return false;
    }
    let matrix = ComparisonMatrix {
        size,
        cells: rows.concat(),
    };
    matrix.is_reciprocal_consistent()
}

impl From<Vec<Vec<String>>> for ComparisonMatrix {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::restore_from_rows(&rows)
    }
}

impl From<ComparisonMatrix> for Vec<Vec<String>> {
    fn from(matrix: ComparisonMatrix) -> Self {
        matrix.to_rows()
    }
}
