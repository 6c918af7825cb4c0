use arrow::{
    array::{ArrayRef, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::error::{MergeError, Result};

/// One month's table, parsed once and kept in memory for the rest of the run.
#[derive(Debug, Clone)]
pub struct MonthTable {
    /// Month key the rows will be tagged with.
    pub month: String,
    /// File the table was read from; `None` for tables built in memory.
    pub source: Option<PathBuf>,
    /// Every column is `Utf8` so cell text survives untouched.
    batch: RecordBatch,
}

impl MonthTable {
    pub fn new(month: impl Into<String>, source: Option<PathBuf>, batch: RecordBatch) -> Self {
        Self {
            month: month.into(),
            source,
            batch,
        }
    }

    /// Parse `path` into the table for `month`.
    pub fn load(month: impl Into<String>, path: &Path) -> Result<Self> {
        let batch = super::read_csv_table(path)?;
        Ok(Self::new(month, Some(path.to_path_buf()), batch))
    }

    /// Build a table straight from header names and string rows. Every row
    /// must have one cell per header, as with a file.
    pub fn from_rows<H, R, C>(month: impl Into<String>, headers: H, rows: R) -> Result<Self>
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let month = month.into();
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|r| r.into_iter().map(Into::into).collect())
            .collect();
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(MergeError::RaggedRecord {
                month,
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }
        let batch = string_batch(&headers, &rows)?;
        Ok(Self::new(month, None, batch))
    }

    /// Column names, in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }
}

/// Transpose row-major strings into an all-`Utf8` batch.
/// Callers guarantee every row has `headers.len()` cells.
pub(crate) fn string_batch(headers: &[String], rows: &[Vec<String>]) -> Result<RecordBatch> {
    let fields: Vec<Field> = headers
        .iter()
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let columns: Vec<ArrayRef> = (0..headers.len())
        .map(|i| {
            let arr: StringArray = rows
                .iter()
                .map(|row| row.get(i).map(String::as_str))
                .collect();
            Arc::new(arr) as ArrayRef
        })
        .collect();

    Ok(RecordBatch::try_new(schema, columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_keeps_headers_and_rows() {
        let table =
            MonthTable::from_rows("July", ["a", "b"], vec![vec!["1", "2"], vec!["3", "4"]])
                .unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.num_rows(), 2);
        assert!(table.source.is_none());
    }

    #[test]
    fn short_row_is_rejected() {
        match MonthTable::from_rows("July", ["a", "b"], vec![vec!["1", "2"], vec!["3"]]) {
            Err(MergeError::RaggedRecord {
                month,
                row,
                expected,
                found,
            }) => {
                assert_eq!(month, "July");
                assert_eq!(row, 1);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn long_row_is_rejected() {
        let result = MonthTable::from_rows("July", ["a"], vec![vec!["1", "extra"]]);
        assert!(matches!(
            result,
            Err(MergeError::RaggedRecord { found: 2, .. })
        ));
    }
}
