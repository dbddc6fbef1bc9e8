use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

use crate::errors::{FusionSide, ProvenanceError, ProvenanceResult};
use crate::model::{
    EnrichOperation, Feature, FuseOperation, Operation, PropertyAction, Provenance, Tool,
};

pub const DEFAULT_FEATURE_URI_KEY: &str = "uri";

/// Value shown when an enrichment step produced no feature
pub const NOT_ENRICHED: &str = "-";

/// Tabular view of how each property of a POI changed across steps
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceTable {
    pub step_name: String,
    pub feature_id: Option<String>,
    pub feature_uri: Option<String>,
    pub steps: Vec<ProvenanceStep>,
    pub properties: Vec<String>,
    /// Input features plus the fused features accumulated while building
    pub features: Vec<Feature>,
    pub step_row: Vec<HeaderCell>,
    pub input_row: Vec<InputCell>,
    pub data_rows: Vec<Vec<DataCell>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "tool")]
pub enum ProvenanceStep {
    #[serde(rename = "DEER")]
    Enrichment(EnrichmentStep),
    #[serde(rename = "FAGI")]
    Fusion(FusionStep),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentStep {
    pub name: String,
    pub icon_class: String,
    pub uri: String,
    pub input: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FusionStep {
    pub name: String,
    pub icon_class: String,
    pub selected_uri: String,
    pub left: FusionInput,
    pub right: FusionInput,
    pub actions: Vec<PropertyAction>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FusionInput {
    pub uri: String,
    pub input: Option<String>,
    /// First input feature carrying `uri`, if any
    #[serde(default)]
    pub feature: Option<Feature>,
}

impl FusionInput {
    fn resolve(
        uri: &str,
        input: &Option<String>,
        features: &[Feature],
        uri_key: &str,
    ) -> Self {
        Self {
            uri: uri.to_string(),
            input: input.clone(),
            feature: features.iter().find(|f| f.has_uri(uri_key, uri)).cloned(),
        }
    }
}

impl ProvenanceStep {
    fn from_operation(
        operation: &Operation,
        features: &[Feature],
        uri_key: &str,
    ) -> Option<Self> {
        match operation {
            Operation::Enrich(EnrichOperation {
                step_name,
                uri,
                input,
                ..
            }) => Some(ProvenanceStep::Enrichment(EnrichmentStep {
                name: step_name.clone(),
                icon_class: Tool::Deer.icon_class().to_string(),
                uri: uri.clone(),
                input: input.clone(),
            })),
            Operation::Fuse(FuseOperation {
                step_name,
                selected_uri,
                left_uri,
                right_uri,
                left_input,
                right_input,
                actions,
                ..
            }) => Some(ProvenanceStep::Fusion(FusionStep {
                name: step_name.clone(),
                icon_class: Tool::Fagi.icon_class().to_string(),
                selected_uri: selected_uri.clone(),
                left: FusionInput::resolve(left_uri, left_input, features, uri_key),
                right: FusionInput::resolve(right_uri, right_input, features, uri_key),
                actions: actions.clone(),
            })),
            Operation::Unsupported => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ProvenanceStep::Enrichment(step) => &step.name,
            ProvenanceStep::Fusion(step) => &step.name,
        }
    }

    /// Number of table columns the step contributes
    pub fn column_count(&self) -> usize {
        match self {
            ProvenanceStep::Enrichment(_) => 1,
            ProvenanceStep::Fusion(_) => 4,
        }
    }

    fn header_cell(&self) -> HeaderCell {
        match self {
            ProvenanceStep::Enrichment(step) => HeaderCell {
                value: step.name.clone(),
                icon_class: Some(step.icon_class.clone()),
                col_span: None,
                row_span: None,
            },
            ProvenanceStep::Fusion(step) => HeaderCell {
                value: step.name.clone(),
                icon_class: Some(step.icon_class.clone()),
                col_span: Some(4),
                row_span: None,
            },
        }
    }

    fn input_cells(&self, step: usize) -> Vec<InputCell> {
        match self {
            ProvenanceStep::Enrichment(enrichment) => vec![InputCell {
                value: enrichment.input.clone(),
                step,
                selected: None,
            }],
            ProvenanceStep::Fusion(fusion) => vec![
                InputCell {
                    value: fusion.left.input.clone(),
                    step,
                    selected: Some(fusion.left.uri == fusion.selected_uri),
                },
                InputCell {
                    value: fusion.right.input.clone(),
                    step,
                    selected: Some(fusion.right.uri == fusion.selected_uri),
                },
                InputCell::caption("Operation", step),
                InputCell::caption("Value", step),
            ],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCell {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub col_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub row_span: Option<u32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InputCell {
    pub value: Option<String>,
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected: Option<bool>,
}

impl InputCell {
    fn caption(value: &str, step: usize) -> Self {
        Self {
            value: Some(value.to_string()),
            step,
            selected: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DataCell {
    pub value: Option<Value>,
    pub step: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub modified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selected: Option<bool>,
}

impl DataCell {
    fn plain(value: Option<Value>, step: usize) -> Self {
        Self {
            value,
            step,
            property: None,
            modified: None,
            selected: None,
        }
    }
}

/// Builds provenance tables, keyed on the feature property that holds POI URIs
#[derive(Clone, Debug)]
pub struct ProvenanceTableBuilder {
    feature_uri_key: String,
}

impl Default for ProvenanceTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvenanceTableBuilder {
    pub fn new() -> Self {
        Self {
            feature_uri_key: DEFAULT_FEATURE_URI_KEY.to_string(),
        }
    }

    pub fn with_feature_uri_key(mut self, key: &str) -> Self {
        self.feature_uri_key = key.to_string();
        self
    }

    /// Builds the table without touching `provenance`.
    ///
    /// Fusion steps record their fused values onto a feature that carries the
    /// selected URI and the step name as source, creating it when missing.
    /// That happens on a private copy of the feature list which is returned
    /// in [`ProvenanceTable::features`].
    pub fn build(&self, provenance: &Provenance) -> ProvenanceResult<ProvenanceTable> {
        let input_features = &provenance.features.features;

        let properties: Vec<String> = input_features
            .iter()
            .flat_map(|f| f.properties.keys().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let steps: Vec<ProvenanceStep> = provenance
            .operations
            .iter()
            .filter_map(|operation| {
                ProvenanceStep::from_operation(operation, input_features, &self.feature_uri_key)
            })
            .collect();

        debug!(
            "Building provenance table for '{}': {} properties, {} of {} operations supported",
            provenance.step_name,
            properties.len(),
            steps.len(),
            provenance.operations.len()
        );

        let mut step_row = vec![HeaderCell {
            value: String::new(),
            icon_class: None,
            col_span: None,
            row_span: Some(2),
        }];
        step_row.extend(steps.iter().map(ProvenanceStep::header_cell));

        let input_row: Vec<InputCell> = steps
            .iter()
            .enumerate()
            .flat_map(|(index, step)| step.input_cells(index + 1))
            .collect();

        let mut features = input_features.clone();
        let mut data_rows = Vec::with_capacity(properties.len());

        for property in &properties {
            let mut cells = vec![DataCell::plain(Some(Value::String(property.clone())), 0)];
            for (index, step) in steps.iter().enumerate() {
                match step {
                    ProvenanceStep::Enrichment(enrichment) => {
                        cells.push(self.enriched_cell(enrichment, property, &features, index + 1));
                    }
                    ProvenanceStep::Fusion(fusion) => {
                        cells.extend(self.fused_cells(fusion, property, &mut features, index + 1)?);
                    }
                }
            }
            data_rows.push(cells);
        }

        Ok(ProvenanceTable {
            step_name: provenance.step_name.clone(),
            feature_id: provenance.feature_id.clone(),
            feature_uri: provenance.feature_uri.clone(),
            steps,
            properties,
            features,
            step_row,
            input_row,
            data_rows,
        })
    }

    fn enriched_cell(
        &self,
        step: &EnrichmentStep,
        property: &str,
        features: &[Feature],
        index: usize,
    ) -> DataCell {
        let key = self.feature_uri_key.as_str();
        // Latest value before enrichment, whichever step produced it
        let initial = features
            .iter()
            .rev()
            .find(|f| f.has_uri(key, &step.uri) && f.source != step.name);
        let enriched = features
            .iter()
            .find(|f| f.has_uri(key, &step.uri) && f.source == step.name);

        let value = match enriched {
            Some(feature) => feature.property(property).cloned(),
            None => Some(Value::String(NOT_ENRICHED.to_string())),
        };
        let modified = match (enriched, initial) {
            (Some(enriched), Some(initial)) => {
                enriched.property(property) != initial.property(property)
            }
            _ => false,
        };

        DataCell {
            value,
            step: index,
            property: Some(property.to_string()),
            modified: Some(modified),
            selected: None,
        }
    }

    fn fused_cells(
        &self,
        step: &FusionStep,
        property: &str,
        features: &mut Vec<Feature>,
        index: usize,
    ) -> ProvenanceResult<[DataCell; 4]> {
        let key = self.feature_uri_key.as_str();

        let left = find_input_feature(features.as_slice(), key, step, FusionSide::Left)?;
        let right = find_input_feature(features.as_slice(), key, step, FusionSide::Right)?;
        let action = step.actions.iter().find(|a| a.property == property);

        let left_value = non_blank(left.property(property));
        let right_value = non_blank(right.property(property));
        // An explicit action always writes its value, null included
        let fused_value = match action {
            Some(action) => Some(action.value.clone().unwrap_or(Value::Null)),
            None if step.selected_uri == step.left.uri => left.property(property).cloned(),
            None => right.property(property).cloned(),
        };

        let position = features
            .iter()
            .position(|f| f.has_uri(key, &step.selected_uri) && f.source == step.name);
        let position = match position {
            Some(position) => position,
            None => {
                debug!(
                    "Adding fused feature {} for step '{}'",
                    step.selected_uri, step.name
                );
                features.push(Feature::with_uri(&step.name, key, &step.selected_uri));
                features.len() - 1
            }
        };
        if let Some(fused_value) = fused_value {
            features[position]
                .properties
                .insert(property.to_string(), fused_value);
        }

        let value = action.and_then(|a| non_blank(a.value.as_ref()));
        let operation = action
            .and_then(|a| a.operation.clone())
            .map(Value::String);

        Ok([
            DataCell::plain(left_value, index),
            DataCell::plain(right_value, index),
            DataCell::plain(operation, index),
            DataCell {
                selected: Some(value.is_some()),
                value,
                step: index,
                property: Some(property.to_string()),
                modified: None,
            },
        ])
    }
}

fn find_input_feature<'a>(
    features: &'a [Feature],
    uri_key: &str,
    step: &FusionStep,
    side: FusionSide,
) -> ProvenanceResult<&'a Feature> {
    let input = match side {
        FusionSide::Left => &step.left,
        FusionSide::Right => &step.right,
    };
    features
        .iter()
        .find(|f| f.has_uri(uri_key, &input.uri) && input.input.as_deref() == Some(f.source.as_str()))
        .ok_or_else(|| ProvenanceError::FeatureNotFound {
            step: step.name.clone(),
            side,
            uri: input.uri.clone(),
            input: input.input.clone(),
        })
}

fn non_blank(value: Option<&Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(v) => Some(v.clone()),
    }
}

/// Builds a provenance table using the default `uri` feature property
pub fn build_provenance_table(provenance: &Provenance) -> ProvenanceResult<ProvenanceTable> {
    ProvenanceTableBuilder::new().build(provenance)
}
