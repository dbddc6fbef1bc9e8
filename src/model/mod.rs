//! Input documents consumed by the layer deriver and the provenance table
//! builder. These mirror the JSON returned by the workbench backend.

pub mod execution;
pub mod process;
pub mod provenance;
pub mod tool;

pub use execution::{Execution, ExecutionStep, StepFile, StepFileType};
pub use process::{InputType, Process, Resource, ResourceType, Step, StepInput};
pub use provenance::{
    EnrichOperation, Feature, FeatureCollection, FuseOperation, Operation, PropertyAction,
    Provenance,
};
pub use tool::{Tool, ToolRole};
