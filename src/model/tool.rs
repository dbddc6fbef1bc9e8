use serde::{Deserialize, Serialize};

/// Tool kinds a process step can be bound to.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tool {
    #[serde(rename = "TRIPLEGEO", alias = "TripleGeo")]
    TripleGeo,
    #[serde(rename = "REVERSE_TRIPLEGEO", alias = "ReverseTripleGeo")]
    ReverseTripleGeo,
    #[serde(rename = "LIMES")]
    Limes,
    #[serde(rename = "FAGI")]
    Fagi,
    #[serde(rename = "DEER")]
    Deer,
    #[serde(rename = "CATALOG")]
    Catalog,
    #[serde(rename = "REGISTER")]
    Register,
}

/// How a tool treats the data it consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolRole {
    /// Re-exposes existing data without processing it (catalog references, exports)
    PassThrough,
    /// Projects external data into the catalog's POI schema
    Transform,
    /// Consumes its inputs to produce a new dataset
    Processing,
}

impl Tool {
    pub fn role(&self) -> ToolRole {
        match self {
            Tool::Catalog | Tool::ReverseTripleGeo => ToolRole::PassThrough,
            Tool::TripleGeo => ToolRole::Transform,
            Tool::Limes | Tool::Fagi | Tool::Deer | Tool::Register => ToolRole::Processing,
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self {
            Tool::TripleGeo => "fa fa-cogs",
            Tool::ReverseTripleGeo => "fa fa-cogs fa-flip-horizontal",
            Tool::Limes => "fa fa-random",
            Tool::Fagi => "fa fa-object-ungroup",
            Tool::Deer => "fa fa-magic",
            Tool::Catalog => "fa fa-book",
            Tool::Register => "fa fa-database",
        }
    }
}
