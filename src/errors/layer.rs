//! Layer derivation error types
//!
//! Every variant describes a process/execution pair that does not refer to
//! the same run. These are contract violations on the caller's side and are
//! never retried.
//!
//! # Examples
//!
//! ```rust
//! use workbench::errors::LayerError;
//!
//! let err = LayerError::ExecutionStepNotFound("step-2".to_string());
//! assert!(err.is_contract_violation());
//! assert_eq!(err.error_code(), "INCONSISTENT_INPUT");
//! ```

use thiserror::Error;

/// Layer derivation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayerError {
    /// Output resource does not name the step that produced it
    #[error("Resource '{0}' has no step key")]
    MissingStepKey(String),

    /// Output resource refers to a step missing from the process definition
    #[error("Step '{step_key}' for resource '{resource}' not found in process")]
    StepNotFound {
        /// Resource key
        resource: String,
        /// Step key the resource refers to
        step_key: String,
    },

    /// Process step has no runtime record in the execution
    #[error("Execution has no step with key '{0}'")]
    ExecutionStepNotFound(String),
}

impl LayerError {
    /// Check if the error was caused by mismatched process and execution data
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LayerError::MissingStepKey(_)
                | LayerError::StepNotFound { .. }
                | LayerError::ExecutionStepNotFound(_)
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LayerError::StepNotFound { .. } | LayerError::ExecutionStepNotFound(_)
        )
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            LayerError::MissingStepKey(_)
            | LayerError::StepNotFound { .. }
            | LayerError::ExecutionStepNotFound(_) => "INCONSISTENT_INPUT",
        }
    }
}
