// src/schema/types.rs

use serde::Deserialize;
use std::{collections::BTreeMap, fmt};

/// Which column differences count as a mismatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaCheck {
    /// Columns added to or removed from a month, relative to the reference.
    #[default]
    Symmetric,
    /// Only columns a month adds on top of the reference.
    AddedOnly,
}

/// How one month's columns differ from the reference month.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMismatch {
    /// In this month but not in the reference, in this month's order.
    pub extra: Vec<String>,
    /// In the reference but not in this month, in the reference's order.
    pub missing: Vec<String>,
}

impl ColumnMismatch {
    pub fn is_empty(&self) -> bool {
        self.extra.is_empty() && self.missing.is_empty()
    }
}

impl fmt::Display for ColumnMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.extra.is_empty(), self.missing.is_empty()) {
            (false, false) => write!(f, "extra {:?}, missing {:?}", self.extra, self.missing),
            (false, true) => write!(f, "extra {:?}", self.extra),
            (true, false) => write!(f, "missing {:?}", self.missing),
            (true, true) => f.write_str("no differences"),
        }
    }
}

/// Per-month column differences; months that conform are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MismatchReport {
    pub reference: String,
    pub months: BTreeMap<String, ColumnMismatch>,
}

impl MismatchReport {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            months: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn get(&self, month: &str) -> Option<&ColumnMismatch> {
        self.months.get(month)
    }
}

impl fmt::Display for MismatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (month, mismatch)) in self.months.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{month}: {mismatch}")?;
        }
        Ok(())
    }
}
