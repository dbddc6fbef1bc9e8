use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::Style;

/// Runtime record of a single process run.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub steps: Vec<ExecutionStep>,
}

impl Execution {
    pub fn step_by_key(&self, key: &str) -> Option<&ExecutionStep> {
        self.steps.iter().find(|s| s.key == key)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStep {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub files: Vec<StepFile>,
}

impl ExecutionStep {
    /// Output files that have been materialized into a table
    pub fn materialized_outputs(&self) -> impl Iterator<Item = &StepFile> {
        self.files
            .iter()
            .filter(|f| f.file_type == StepFileType::Output && f.table_name.is_some())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepFileType {
    Input,
    Output,
    Configuration,
    Qa,
    Kpi,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StepFile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub file_type: StepFileType,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub bounding_box: Option<Value>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub style: Option<Style>,
}
