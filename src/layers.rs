use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::errors::{LayerError, LayerResult};
use crate::model::{Execution, InputType, Process, Resource, ToolRole};
use crate::style::{Palette, Style, StyleStrategy};

const LAYER_ICON: &str = "\u{f08d}";
const LAYER_ICON_CLASS: &str = "fa fa-map-marker";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerType {
    Input,
    Output,
}

/// A dataset rendered on the map
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub title: String,
    pub hidden: bool,
    pub icon: String,
    pub icon_class: String,
    pub color: String,
    pub table_name: String,
    pub bounding_box: Option<Value>,
    pub input_type: InputType,
    pub step: Option<LayerStep>,
    pub resource: Option<LayerResource>,
    pub file: Option<i64>,
    #[serde(rename = "type")]
    pub layer_type: LayerType,
    pub style: Style,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LayerStep {
    pub key: String,
    pub name: String,
    pub output_key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerResource {
    pub id: Option<i64>,
    pub version: Option<i64>,
    pub name: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeriveOptions {
    /// Skip process steps that have no runtime record yet instead of failing
    pub skip_pending_steps: bool,
}

/// Ordered layers, unique by table name. The first layer for a table wins.
#[derive(Default)]
struct LayerSet {
    layers: Vec<Layer>,
    tables: HashSet<String>,
}

impl LayerSet {
    fn len(&self) -> usize {
        self.layers.len()
    }

    fn contains(&self, table_name: &str) -> bool {
        self.tables.contains(table_name)
    }

    fn push(&mut self, layer: Layer) {
        self.tables.insert(layer.table_name.clone());
        self.layers.push(layer);
    }
}

/// Resource groups that can contribute layers
struct Candidates<'a> {
    catalog: Vec<&'a Resource>,
    transform: Vec<&'a Resource>,
    output: Vec<&'a Resource>,
}

impl<'a> Candidates<'a> {
    fn from_process(process: &'a Process) -> Self {
        // Pass-through steps only re-expose data, so their inputs do not count
        let input_keys: HashSet<&str> = process
            .steps
            .iter()
            .filter(|s| s.tool.role() != ToolRole::PassThrough)
            .flat_map(|s| s.input.iter().map(|i| i.input_key.as_str()))
            .collect();

        let catalog = process
            .resources
            .iter()
            .filter(|r| {
                r.input_type == InputType::Catalog
                    && r.is_poi()
                    && input_keys.contains(r.key.as_str())
            })
            .collect();

        let transform = process
            .resources
            .iter()
            .filter(|r| r.tool.map(|t| t.role()) == Some(ToolRole::Transform))
            .collect();

        let output = process
            .resources
            .iter()
            .filter(|r| {
                r.input_type == InputType::Output
                    && r.is_poi()
                    && !input_keys.contains(r.key.as_str())
            })
            .collect();

        Self {
            catalog,
            transform,
            output,
        }
    }

    fn is_output(&self, resource: &Resource) -> bool {
        self.output.iter().any(|r| r.key == resource.key)
    }
}

/// Derives the map layers of a process execution
pub struct LayerDeriver<S> {
    strategy: S,
    options: DeriveOptions,
}

impl Default for LayerDeriver<Palette> {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl<S: StyleStrategy> LayerDeriver<S> {
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            options: DeriveOptions::default(),
        }
    }

    pub fn with_options(mut self, options: DeriveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn derive(&self, process: &Process, execution: &Execution) -> LayerResult<Vec<Layer>> {
        let candidates = Candidates::from_process(process);
        let mut layers = LayerSet::default();

        debug!(
            "Deriving layers for process '{}': {} catalog, {} transform, {} output resources",
            process.name,
            candidates.catalog.len(),
            candidates.transform.len(),
            candidates.output.len()
        );

        for resource in &candidates.catalog {
            let Some(table_name) = &resource.table_name else {
                debug!("Skipping catalog resource '{}' without table", resource.key);
                continue;
            };
            if layers.contains(table_name) {
                debug!("Ignoring duplicate table {}", table_name);
                continue;
            }

            let index = layers.len();
            layers.push(Layer {
                title: resource.name.clone(),
                hidden: false,
                icon: LAYER_ICON.to_string(),
                icon_class: LAYER_ICON_CLASS.to_string(),
                color: self.strategy.color(index),
                table_name: table_name.clone(),
                bounding_box: resource.bounding_box.clone(),
                input_type: resource.input_type,
                step: None,
                resource: Some(LayerResource {
                    id: resource.id,
                    version: resource.version,
                    name: resource.name.clone(),
                }),
                file: None,
                layer_type: LayerType::Input,
                style: resource
                    .style
                    .clone()
                    .unwrap_or_else(|| self.strategy.style(index)),
            });
        }

        for resource in candidates.transform.iter().chain(candidates.output.iter()) {
            self.push_step_outputs(process, execution, &candidates, resource, &mut layers)?;
        }

        Ok(layers.layers)
    }

    fn push_step_outputs(
        &self,
        process: &Process,
        execution: &Execution,
        candidates: &Candidates<'_>,
        resource: &Resource,
        layers: &mut LayerSet,
    ) -> LayerResult<()> {
        let step_key = resource
            .step_key
            .as_deref()
            .ok_or_else(|| LayerError::MissingStepKey(resource.key.clone()))?;
        let step = process
            .step_by_key(step_key)
            .ok_or_else(|| LayerError::StepNotFound {
                resource: resource.key.clone(),
                step_key: step_key.to_string(),
            })?;

        let runtime = match execution.step_by_key(&step.key) {
            Some(runtime) => runtime,
            None if self.options.skip_pending_steps => {
                warn!("Step '{}' has not been executed yet, skipping", step.key);
                return Ok(());
            }
            None => return Err(LayerError::ExecutionStepNotFound(step.key.clone())),
        };

        let is_output = candidates.is_output(resource);

        for file in runtime.materialized_outputs() {
            let Some(table_name) = &file.table_name else {
                continue;
            };
            // e.g. a registration task exposes the output of its single transform step
            if layers.contains(table_name) {
                debug!("Ignoring duplicate table {}", table_name);
                continue;
            }

            let index = layers.len();
            layers.push(Layer {
                title: step.name.clone(),
                hidden: false,
                icon: LAYER_ICON.to_string(),
                icon_class: LAYER_ICON_CLASS.to_string(),
                color: self.strategy.color(index),
                table_name: table_name.clone(),
                bounding_box: file.bounding_box.clone(),
                input_type: resource.input_type,
                step: Some(LayerStep {
                    key: step.key.clone(),
                    name: step.name.clone(),
                    output_key: if is_output {
                        step.output_key.clone()
                    } else {
                        None
                    },
                }),
                resource: None,
                file: file.id,
                layer_type: if is_output {
                    LayerType::Output
                } else {
                    LayerType::Input
                },
                style: file
                    .style
                    .clone()
                    .unwrap_or_else(|| self.strategy.style(index)),
            });
        }

        Ok(())
    }
}

/// Derives layers with the default palette, failing on steps without a runtime record
pub fn derive_layers(process: &Process, execution: &Execution) -> LayerResult<Vec<Layer>> {
    LayerDeriver::default().derive(process, execution)
}
