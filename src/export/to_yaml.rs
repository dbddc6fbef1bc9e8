use super::ExportSubject;

pub fn render(subject: ExportSubject<'_>) -> anyhow::Result<String> {
    let res = match subject {
        ExportSubject::Layers(layers) => serde_yaml::to_string(layers)?,
        ExportSubject::Provenance(table) => serde_yaml::to_string(table)?,
    };
    Ok(res)
}
