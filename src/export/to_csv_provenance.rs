use super::csv_common::export_to_csv;
use crate::common::value_to_text;
use crate::provenance::ProvenanceTable;

/// One column per data cell: the property name, then every step's columns
/// labelled `<step name>: <input>`.
pub fn render(table: &ProvenanceTable) -> anyhow::Result<String> {
    let mut headers = vec!["property".to_string()];
    for cell in &table.input_row {
        let step_name = cell
            .step
            .checked_sub(1)
            .and_then(|index| table.steps.get(index))
            .map(|step| step.name())
            .unwrap_or_default();
        headers.push(format!(
            "{}: {}",
            step_name,
            cell.value.as_deref().unwrap_or_default()
        ));
    }

    export_to_csv(table.data_rows.iter(), &headers, |row| {
        row.iter()
            .map(|cell| cell.value.as_ref().map(value_to_text).unwrap_or_default())
            .collect()
    })
}
