// src/process/mod.rs
pub mod join;
pub mod raw_table;
pub mod write;

pub use join::join_months;
pub use raw_table::MonthTable;
pub use write::write_joined;

use arrow::record_batch::RecordBatch;
use csv::ReaderBuilder;
use std::{
    collections::{BTreeMap, HashSet},
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::error::{io_at, MergeError, Result};
use raw_table::string_batch;

/// Parse one comma-separated file with a header row into an all-`Utf8` batch.
#[tracing::instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
pub fn read_csv_table<P: AsRef<Path>>(path: P) -> Result<RecordBatch> {
    let path = path.as_ref();
    let csv_err = |source: csv::Error| MergeError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_at(path))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // field counts are checked below, with a better message
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || (headers.len() == 1 && headers[0].is_empty()) {
        return Err(MergeError::EmptyFile {
            path: path.to_path_buf(),
        });
    }
    let mut seen = HashSet::with_capacity(headers.len());
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(MergeError::DuplicateColumn {
                path: path.to_path_buf(),
                column: h.clone(),
            });
        }
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_err)?;
        if record.len() != headers.len() {
            return Err(MergeError::RaggedRow {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |p| p.line()),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed CSV");
    string_batch(&headers, &rows)
}

/// Read every discovered file exactly once.
#[tracing::instrument(level = "info", skip_all, fields(months = files.len()))]
pub fn load_collection(files: &BTreeMap<String, PathBuf>) -> Result<BTreeMap<String, MonthTable>> {
    let mut tables = BTreeMap::new();
    for (month, path) in files {
        let table = MonthTable::load(month.clone(), path)?;
        info!(
            month = %month,
            rows = table.num_rows(),
            columns = table.column_names().len(),
            "loaded month"
        );
        tables.insert(month.clone(), table);
    }
    Ok(tables)
}
