// src/schema/check.rs

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

use super::types::{ColumnMismatch, MismatchReport, SchemaCheck};
use crate::{
    error::{MergeError, Result},
    process::MonthTable,
};

/// Compare every month's columns, the reference's own included, against
/// `reference_month`.
#[tracing::instrument(level = "info", skip(tables), fields(months = tables.len()))]
pub fn check_columns(
    reference_month: &str,
    tables: &BTreeMap<String, MonthTable>,
    mode: SchemaCheck,
) -> Result<MismatchReport> {
    let reference = tables
        .get(reference_month)
        .ok_or_else(|| MergeError::MissingReferenceMonth {
            month: reference_month.to_string(),
            available: tables.keys().cloned().collect(),
        })?;
    let ref_cols = reference.column_names();
    let ref_set: HashSet<&str> = ref_cols.iter().copied().collect();

    let mut report = MismatchReport::new(reference_month);
    for (month, table) in tables {
        let cols = table.column_names();
        let mismatch = diff_columns(&ref_cols, &ref_set, &cols, mode);
        if mismatch.is_empty() {
            debug!(month = %month, "columns match reference");
            continue;
        }
        warn!(month = %month, "columns differ from reference: {}", mismatch);
        report.months.insert(month.clone(), mismatch);
    }

    info!(
        "{} of {} months differ from `{}`",
        report.len(),
        tables.len(),
        reference_month
    );
    Ok(report)
}

fn diff_columns(
    ref_cols: &[&str],
    ref_set: &HashSet<&str>,
    cols: &[&str],
    mode: SchemaCheck,
) -> ColumnMismatch {
    let extra = cols
        .iter()
        .filter(|c| !ref_set.contains(*c))
        .map(|c| c.to_string())
        .collect();

    let missing = match mode {
        SchemaCheck::AddedOnly => Vec::new(),
        SchemaCheck::Symmetric => {
            let set: HashSet<&str> = cols.iter().copied().collect();
            ref_cols
                .iter()
                .filter(|c| !set.contains(*c))
                .map(|c| c.to_string())
                .collect()
        }
    };

    ColumnMismatch { extra, missing }
}

impl MismatchReport {
    /// Turn a non-empty report into a [`MergeError::SchemaMismatch`].
    pub fn ensure_consistent(self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }
        Err(MergeError::SchemaMismatch {
            reference: self.reference.clone(),
            report: self,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(month: &str, cols: &[&str]) -> MonthTable {
        let row: Vec<&str> = cols.iter().map(|_| "x").collect();
        MonthTable::from_rows(month, cols.iter().copied(), vec![row]).expect("valid table")
    }

    fn collection(tables: Vec<MonthTable>) -> BTreeMap<String, MonthTable> {
        tables.into_iter().map(|t| (t.month.clone(), t)).collect()
    }

    #[test]
    fn identical_months_are_absent_from_report() {
        let tables = collection(vec![
            table("July", &["A", "B", "C"]),
            table("August", &["A", "B", "C"]),
        ]);
        let report = check_columns("July", &tables, SchemaCheck::Symmetric).unwrap();
        assert!(report.is_empty());
        assert!(report.ensure_consistent().is_ok());
    }

    #[test]
    fn extra_column_is_reported() {
        let tables = collection(vec![
            table("July", &["A", "B", "C"]),
            table("August", &["A", "B", "C", "D"]),
        ]);
        let report = check_columns("July", &tables, SchemaCheck::Symmetric).unwrap();
        assert_eq!(report.len(), 1);
        let aug = report.get("August").unwrap();
        assert_eq!(aug.extra, vec!["D"]);
        assert!(aug.missing.is_empty());
        assert!(report.get("July").is_none());
    }

    #[test]
    fn extras_keep_the_month_column_order() {
        let tables = collection(vec![
            table("July", &["A"]),
            table("August", &["Z", "A", "B"]),
        ]);
        let report = check_columns("July", &tables, SchemaCheck::AddedOnly).unwrap();
        assert_eq!(report.get("August").unwrap().extra, vec!["Z", "B"]);
    }

    #[test]
    fn missing_column_depends_on_mode() {
        let tables = collection(vec![
            table("July", &["A", "B", "C"]),
            table("August", &["A", "C"]),
        ]);

        let symmetric = check_columns("July", &tables, SchemaCheck::Symmetric).unwrap();
        assert_eq!(symmetric.get("August").unwrap().missing, vec!["B"]);

        let added_only = check_columns("July", &tables, SchemaCheck::AddedOnly).unwrap();
        assert!(added_only.is_empty());
    }

    #[test]
    fn column_order_alone_is_not_a_mismatch() {
        let tables = collection(vec![
            table("July", &["A", "B"]),
            table("August", &["B", "A"]),
        ]);
        let report = check_columns("July", &tables, SchemaCheck::Symmetric).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn unknown_reference_month_is_an_error() {
        let tables = collection(vec![table("August", &["A"])]);
        match check_columns("July", &tables, SchemaCheck::Symmetric) {
            Err(MergeError::MissingReferenceMonth { month, available }) => {
                assert_eq!(month, "July");
                assert_eq!(available, vec!["August"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn mismatch_error_names_months_and_columns() {
        let tables = collection(vec![
            table("July", &["A", "B"]),
            table("August", &["A", "B", "Bonus"]),
            table("September", &["A"]),
        ]);
        let report = check_columns("July", &tables, SchemaCheck::Symmetric).unwrap();
        let err = report.ensure_consistent().unwrap_err();
        assert!(matches!(err, MergeError::SchemaMismatch { .. }));
        assert_eq!(
            err.to_string(),
            "columns differ from reference month `July`: \
             August: extra [\"Bonus\"]; September: missing [\"B\"]"
        );
    }
}
