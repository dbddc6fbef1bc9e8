pub mod common;
pub mod config;
pub mod errors;
pub mod export;
pub mod layers;
pub mod model;
pub mod provenance;
pub mod style;
pub mod workbench_run;

pub use layers::{derive_layers, Layer, LayerDeriver};
pub use provenance::{build_provenance_table, ProvenanceTable, ProvenanceTableBuilder};
