//! Domain-specific error types for the workbench core
//!
//! # Error Categories
//!
//! - **LayerError**: process and execution do not describe the same run
//! - **ProvenanceError**: provenance record is not self-consistent
//! - **ConfigError**: configuration file loading and validation
//!
//! Layer and provenance errors are contract violations: the caller supplied
//! inconsistent data and retrying with the same input cannot succeed.
//! Expected absences (missing table names, unknown tools, missing enrichment
//! features) are not errors and never surface here.
//!
//! # Examples
//!
//! ```rust
//! use workbench::errors::LayerError;
//!
//! fn require_step_key(resource: &str, step_key: Option<&str>) -> Result<String, LayerError> {
//!     step_key
//!         .map(str::to_string)
//!         .ok_or_else(|| LayerError::MissingStepKey(resource.to_string()))
//! }
//!
//! assert!(require_step_key("output-1", None).is_err());
//! ```

pub mod config;
pub mod layer;
pub mod provenance;

pub use config::ConfigError;
pub use layer::LayerError;
pub use provenance::{FusionSide, ProvenanceError};

/// Result type alias for layer derivation
pub type LayerResult<T> = Result<T, LayerError>;

/// Result type alias for provenance table building
pub type ProvenanceResult<T> = Result<T, ProvenanceError>;
