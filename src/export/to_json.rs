use super::ExportSubject;

pub fn render(subject: ExportSubject<'_>) -> anyhow::Result<String> {
    let res = match subject {
        ExportSubject::Layers(layers) => serde_json::to_string_pretty(layers)?,
        ExportSubject::Provenance(table) => serde_json::to_string_pretty(table)?,
    };
    Ok(res)
}
