//! Structured errors
//!
//! Every failure in quanta is a recoverable value: the caller prints it and
//! carries on with the next expression.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::flydim::Dimensions;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
    pub const UNKNOWN_IDENTIFIER: &str = "UNKNOWN_IDENTIFIER";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const HISTORY_OUT_OF_RANGE: &str = "HISTORY_OUT_OF_RANGE";
    pub const UNIT_NOT_FOUND: &str = "UNIT_NOT_FOUND";
    pub const EXPONENT_RANGE: &str = "EXPONENT_RANGE";
}

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum QuantaError {
    /// Operands of `operation` have incompatible dimensions
    #[error("Dimension mismatch in {operation}: {}", join_dims(.operands))]
    DimensionMismatch {
        operation: String,
        operands: Vec<Dimensions>,
    },

    /// A word could not be resolved and on-the-fly dimensions are disabled
    #[error("Unknown identifier '{word}' at position {position}")]
    UnknownIdentifier { word: String, position: usize },

    #[error("Parse error at position {position}: expected {expected}")]
    Parse { position: usize, expected: String },

    #[error("History index {index} out of range [0, {len})")]
    HistoryOutOfRange { index: usize, len: usize },

    #[error("No unit registered for dimension {dimension}")]
    UnitNotFound { dimension: Dimensions },

    /// A dimension exponent left the `i32` range
    #[error("Exponent out of range in {operation}")]
    ExponentRange { operation: String },
}

fn join_dims(operands: &[Dimensions]) -> String {
    operands
        .iter()
        .map(|d| format!("[{}]", d))
        .collect::<Vec<_>>()
        .join(" vs ")
}

impl QuantaError {
    pub fn mismatch<I, D>(operation: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Dimensions>,
    {
        QuantaError::DimensionMismatch {
            operation: operation.into(),
            operands: operands.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(position: usize, expected: impl Into<String>) -> Self {
        QuantaError::Parse {
            position,
            expected: expected.into(),
        }
    }

    pub fn exponent_range(operation: impl Into<String>) -> Self {
        QuantaError::ExponentRange {
            operation: operation.into(),
        }
    }

    /// Machine-readable code from [`codes`]
    pub fn code(&self) -> &'static str {
        match self {
            QuantaError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
            QuantaError::UnknownIdentifier { .. } => codes::UNKNOWN_IDENTIFIER,
            QuantaError::Parse { .. } => codes::PARSE_ERROR,
            QuantaError::HistoryOutOfRange { .. } => codes::HISTORY_OUT_OF_RANGE,
            QuantaError::UnitNotFound { .. } => codes::UNIT_NOT_FOUND,
            QuantaError::ExponentRange { .. } => codes::EXPONENT_RANGE,
        }
    }

    pub fn is_dimension_mismatch(&self) -> bool {
        matches!(self, QuantaError::DimensionMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, QuantaError>;
