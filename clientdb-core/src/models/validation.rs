//! Validation error types

use std::fmt;

/// Validation error for client fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field exceeds the column's maximum length
    TooLong { field: &'static str, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
