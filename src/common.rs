use anyhow::Context;
use handlebars::{handlebars_helper, Handlebars};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn create_path_if_not_exists(path: &Path) -> anyhow::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if !parent.as_os_str().is_empty() && !parent.exists() {
        info!("Creating path: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub fn write_string_to_file(path: &Path, content: &str) -> anyhow::Result<()> {
    create_path_if_not_exists(path)?;
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Reads a JSON document previously fetched from the workbench backend
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Renders a table cell value as plain text; null becomes empty
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| {
        !v.is_null() &&
        match v {
            serde_json::Value::String(s) => {
                !s.is_empty() && s != "null"
            }
            _ => true,
        }
    });
    handlebars.register_helper("exists", Box::new(exists));

    handlebars_helper!(isnull: |v: Value| v.is_null());
    handlebars.register_helper("isnull", Box::new(isnull));

    handlebars_helper!(stringeq: |s1: String, s2: String| s1.eq(&s2));
    handlebars.register_helper("stringeq", Box::new(stringeq));

    handlebars_helper!(cell_text: |v: Value| value_to_text(&v));
    handlebars.register_helper("cell_text", Box::new(cell_text));

    handlebars
}
