use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Property history of a single POI across the enrichment and fusion steps
/// that produced it.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    #[serde(default)]
    pub step_name: String,
    #[serde(default)]
    pub output_key: Option<String>,
    #[serde(default)]
    pub feature_id: Option<String>,
    #[serde(default)]
    pub feature_uri: Option<String>,
    #[serde(default)]
    pub operations: Vec<Operation>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: FeatureCollection,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "tool")]
pub enum Operation {
    #[serde(rename = "DEER")]
    Enrich(EnrichOperation),
    #[serde(rename = "FAGI")]
    Fuse(FuseOperation),
    /// Any tool kind the table has no columns for
    #[serde(other)]
    Unsupported,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichOperation {
    #[serde(default)]
    pub level: i32,
    pub step_name: String,
    pub uri: String,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FuseOperation {
    #[serde(default)]
    pub level: i32,
    pub step_name: String,
    pub selected_uri: String,
    pub left_uri: String,
    pub right_uri: String,
    #[serde(default)]
    pub left_input: Option<String>,
    #[serde(default)]
    pub right_input: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actions: Vec<PropertyAction>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PropertyAction {
    pub property: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub value: Option<Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub features: Vec<Feature>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: IndexMap<String, Value>,
}

impl Feature {
    /// Creates a feature without geometry that only carries its URI
    pub fn with_uri(source: &str, uri_key: &str, uri: &str) -> Self {
        let mut properties = IndexMap::new();
        properties.insert(uri_key.to_string(), Value::String(uri.to_string()));
        Self {
            kind: feature_type(),
            source: source.to_string(),
            geometry: None,
            properties,
        }
    }

    pub fn uri(&self, uri_key: &str) -> Option<&str> {
        self.properties.get(uri_key).and_then(Value::as_str)
    }

    pub fn has_uri(&self, uri_key: &str, uri: &str) -> bool {
        self.uri(uri_key) == Some(uri)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

fn feature_type() -> String {
    "Feature".to_string()
}

// The backend aggregates empty result sets into `null` instead of `[]`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
