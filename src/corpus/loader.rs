// CSV loader for plot datasets.
//
// The input needs a header row with at least an identifier column and a
// text column. Other columns are ignored.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use super::Document;

/// Load documents from a CSV file with headers.
///
/// Rows with an empty identifier get their 1-based row number as id.
pub fn load_csv(path: &Path, id_column: &str, text_column: &str) -> Result<Vec<Document>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_documents(file, id_column, text_column)
        .with_context(|| format!("reading {}", path.display()))
}

/// Read documents from any CSV source. Split out of `load_csv` for tests.
pub fn read_documents<R: std::io::Read>(
    reader: R,
    id_column: &str,
    text_column: &str,
) -> Result<Vec<Document>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let id_idx = column_index(&headers, id_column)?;
    let text_idx = column_index(&headers, text_column)?;

    let mut documents = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.with_context(|| format!("malformed CSV row {}", row + 1))?;
        let id = record.get(id_idx).unwrap_or("").trim();
        let text = record.get(text_idx).unwrap_or("");
        let id = if id.is_empty() {
            (row + 1).to_string()
        } else {
            id.to_string()
        };
        documents.push(Document::new(id, text));
    }

    info!(documents = documents.len(), "Loaded corpus");
    Ok(documents)
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .with_context(|| {
            format!(
                "column `{name}` not found (available: {})",
                headers.iter().collect::<Vec<_>>().join(", ")
            )
        })
}
