//! Provenance table error types
//!
//! # Examples
//!
//! ```rust
//! use workbench::errors::{FusionSide, ProvenanceError};
//!
//! let err = ProvenanceError::FeatureNotFound {
//!     step: "Fuse".to_string(),
//!     side: FusionSide::Left,
//!     uri: "urn:poi:1".to_string(),
//!     input: Some("Transform A".to_string()),
//! };
//! assert!(err.is_contract_violation());
//! ```

use std::fmt;

use thiserror::Error;

/// Input side of a fusion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionSide {
    Left,
    Right,
}

impl fmt::Display for FusionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionSide::Left => write!(f, "left"),
            FusionSide::Right => write!(f, "right"),
        }
    }
}

/// Provenance table errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProvenanceError {
    /// Fusion step input feature is missing from the feature collection
    #[error("Fusion step '{step}': {side} feature '{uri}' from input {input:?} not found")]
    FeatureNotFound {
        /// Fusion step name
        step: String,
        /// Which input was searched
        side: FusionSide,
        /// URI of the missing feature
        uri: String,
        /// Source tag of the missing feature
        input: Option<String>,
    },
}

impl ProvenanceError {
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, ProvenanceError::FeatureNotFound { .. })
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ProvenanceError::FeatureNotFound { .. } => "INCONSISTENT_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_not_found_message() {
        let err = ProvenanceError::FeatureNotFound {
            step: "Fuse".to_string(),
            side: FusionSide::Right,
            uri: "urn:poi:2".to_string(),
            input: None,
        };
        assert_eq!(
            err.to_string(),
            "Fusion step 'Fuse': right feature 'urn:poi:2' from input None not found"
        );
        assert_eq!(err.error_code(), "INCONSISTENT_INPUT");
    }
}
