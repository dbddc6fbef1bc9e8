mod csv_common;
pub mod to_csv_layers;
pub mod to_csv_provenance;
pub mod to_custom;
pub mod to_json;
pub mod to_yaml;

use crate::config::ExportFileType;
use crate::layers::Layer;
use crate::provenance::ProvenanceTable;

/// Result of a transform, ready to be rendered by an exporter
#[derive(Clone, Copy, Debug)]
pub enum ExportSubject<'a> {
    Layers(&'a [Layer]),
    Provenance(&'a ProvenanceTable),
}

impl ExportSubject<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            ExportSubject::Layers(_) => "layers",
            ExportSubject::Provenance(_) => "provenance",
        }
    }
}

/// Renders the subject with the given exporter
pub fn render(subject: ExportSubject<'_>, exporter: &ExportFileType) -> anyhow::Result<String> {
    match exporter {
        ExportFileType::JSON => to_json::render(subject),
        ExportFileType::YAML => to_yaml::render(subject),
        ExportFileType::CSV => match subject {
            ExportSubject::Layers(layers) => to_csv_layers::render(layers),
            ExportSubject::Provenance(table) => to_csv_provenance::render(table),
        },
        ExportFileType::Custom(params) => to_custom::render(subject, params),
    }
}
