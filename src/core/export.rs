use crate::core::Storage;
use crate::domain::model::AggregateResult;
use crate::utils::error::{QueryError, Result};
use serde_json::Value;
use std::collections::BTreeSet;

/// Render aggregate cells as CSV. Columns are the sorted union of all cell keys.
pub fn cells_to_csv(result: &AggregateResult) -> Result<String> {
    let cells = result.cells();
    if cells.is_empty() {
        return Ok(String::new());
    }
    let columns: BTreeSet<&str> = cells
        .iter()
        .flat_map(|cell| cell.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for cell in &cells {
        writer.write_record(columns.iter().map(|column| match cell.get(*column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| QueryError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| QueryError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

pub async fn export_cells<S: Storage>(
    storage: &S,
    filename: &str,
    result: &AggregateResult,
) -> Result<()> {
    let csv_output = cells_to_csv(result)?;
    tracing::debug!(
        "Writing {} cells ({} bytes) to {}",
        result.cells().len(),
        csv_output.len(),
        filename
    );
    storage.write_file(filename, csv_output.as_bytes()).await
}
