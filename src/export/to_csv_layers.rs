use super::csv_common::export_to_csv;
use crate::layers::{Layer, LayerType};

pub fn render(layers: &[Layer]) -> anyhow::Result<String> {
    let headers: Vec<String> = [
        "title",
        "table_name",
        "type",
        "color",
        "symbol",
        "step",
        "resource",
        "file",
    ]
    .iter()
    .map(|h| h.to_string())
    .collect();

    export_to_csv(layers.iter(), &headers, |layer| {
        vec![
            layer.title.clone(),
            layer.table_name.clone(),
            match layer.layer_type {
                LayerType::Input => "Input".to_string(),
                LayerType::Output => "Output".to_string(),
            },
            layer.color.clone(),
            layer.style.symbol.clone(),
            layer
                .step
                .as_ref()
                .map(|s| s.key.clone())
                .unwrap_or_default(),
            layer
                .resource
                .as_ref()
                .and_then(|r| r.id)
                .map(|id| id.to_string())
                .unwrap_or_default(),
            layer.file.map(|id| id.to_string()).unwrap_or_default(),
        ]
    })
}
