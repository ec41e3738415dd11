//! # DSM Common Library
//!
//! Shared code for the decision-support method services:
//! - Reciprocal pairwise-comparison matrices
//! - Draft documents and the method catalogue
//! - Draft API request/response types
//! - Configuration loading

pub mod api;
pub mod config;
pub mod draft;
pub mod error;
pub mod matrix;
pub mod method;

pub use draft::{DraftRecord, FormData, Matrices};
pub use error::{Error, Result};
pub use matrix::{rows_are_reciprocal, CellValue, ComparisonMatrix, MatrixError};
pub use method::MethodType;
