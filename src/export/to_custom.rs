use anyhow::{anyhow, Context};
use serde_json::json;
use std::fs;
use tracing::error;

use super::ExportSubject;
use crate::config::CustomExportProfile;

pub fn render(subject: ExportSubject<'_>, params: &CustomExportProfile) -> anyhow::Result<String> {
    let mut handlebars = crate::common::get_handlebars();

    if let Some(partials) = &params.partials {
        for (name, partial) in partials {
            let partial_content = fs::read_to_string(partial).map_err(|err| {
                error!("Failed to read partial file '{}': {}", partial, err);
                anyhow!("Failed to read partial file '{}': {}", partial, err)
            })?;
            handlebars
                .register_partial(name, partial_content)
                .with_context(|| {
                    format!("Failed to register partial '{}' from '{}'", name, partial)
                })?;
        }
    }

    let template_content = fs::read_to_string(&params.template)
        .with_context(|| format!("Failed to read template file '{}'", params.template))?;

    let context = match subject {
        ExportSubject::Layers(layers) => json!({ "layers": layers }),
        ExportSubject::Provenance(table) => json!({ "table": table }),
    };

    Ok(handlebars.render_template(&template_content, &context)?)
}
