/// Common utilities for CSV export operations
use csv::Writer;

/// Generic CSV exporter: writes the header, then one row per item.
///
/// # Example
///
/// ```rust,ignore
/// let csv = export_to_csv(
///     layers.iter(),
///     &["title", "table_name"],
///     |layer| vec![layer.title.clone(), layer.table_name.clone()],
/// )?;
/// ```
pub fn export_to_csv<T, F>(
    items: impl IntoIterator<Item = T>,
    headers: &[String],
    row_fn: F,
) -> anyhow::Result<String>
where
    F: Fn(T) -> Vec<String>,
{
    let mut wtr = Writer::from_writer(vec![]);
    wtr.write_record(headers)?;

    for item in items {
        let row = row_fn(item);
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner()?;
    Ok(String::from_utf8(data)?)
}
