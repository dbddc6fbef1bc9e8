use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::tool::Tool;
use crate::style::Style;

/// ## Structure
/// A process definition as returned by the workbench backend.
///
/// ```text
/// Process
///   ├── name: String
///   ├── steps: Vec<Step>
///   │   ├── key: String
///   │   ├── tool: Tool
///   │   ├── input: Vec<StepInput>
///   │   │   ├── input_key: String
///   │   │   └── part_key: Option<String>
///   │   └── output_key: Option<String>
///   └── resources: Vec<Resource>
///       ├── key: String
///       ├── input_type: InputType
///       ├── resource_type: ResourceType
///       ├── tool: Option<Tool>
///       ├── step_key: Option<String>
///       ├── table_name: Option<String>
///       └── style: Option<Style>
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Process {
    pub fn step_by_key(&self, key: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.key == key)
    }

    /// Returns the step that produces the resource with the given key
    pub fn step_by_resource_key(&self, resource_key: &str) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| s.output_key.as_deref() == Some(resource_key))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub tool: Tool,
    #[serde(default)]
    pub input: Vec<StepInput>,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub right: Option<String>,
    #[serde(default)]
    pub output_key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StepInput {
    pub input_key: String,
    #[serde(default)]
    pub part_key: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
    #[serde(rename = "CATALOG")]
    Catalog,
    #[serde(rename = "OUTPUT")]
    Output,
    #[serde(rename = "EXTERNAL")]
    External,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceType {
    #[serde(rename = "POI_DATA", alias = "POI")]
    Poi,
    #[serde(rename = "POI_LINKED_DATA", alias = "LINKED")]
    Linked,
    #[serde(other)]
    Other,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub key: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub name: String,
    pub input_type: InputType,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub tool: Option<Tool>,
    #[serde(default)]
    pub step_key: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(default)]
    pub bounding_box: Option<Value>,
}

impl Resource {
    pub fn is_poi(&self) -> bool {
        self.resource_type == ResourceType::Poi
    }
}
