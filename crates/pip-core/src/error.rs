#![forbid(unsafe_code)]

//! Error types for the geometry core.

use thiserror::Error;

/// Errors constructing or decoding a [`Layout`](crate::layout::Layout).
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The anchor/collapse combination breaks the layout invariants.
    #[error("invalid layout: {reason}")]
    InvalidLayout { reason: &'static str },

    /// Persisted layout bytes do not match the schema.
    #[error("layout decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LayoutError {
    #[must_use]
    pub(crate) const fn invalid(reason: &'static str) -> Self {
        Self::InvalidLayout { reason }
    }
}

/// Errors updating a [`PercentLayoutGuide`](crate::guide::PercentLayoutGuide).
#[derive(Debug, Error, PartialEq)]
pub enum GuideError {
    /// Percent outside `[0, 1]` (or not finite).
    #[error("percent must be within [0, 1], got {value}")]
    InvalidPercent { value: f64 },
}
