// src/pipeline.rs

use std::path::PathBuf;
use tracing::info;

use crate::{
    config::Config,
    discover::discover_month_files,
    error::Result,
    process::{join_months, load_collection, write_joined},
    schema::check_columns,
};

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub months: Vec<String>,
    pub rows: usize,
    /// Columns in the written file, the index column included.
    pub columns: usize,
    pub output: PathBuf,
}

/// Discover, load, validate, join and write. Nothing is written unless every
/// month's columns match the reference month.
#[tracing::instrument(level = "info", skip_all, fields(input = %config.input_dir.display()))]
pub fn run(config: &Config) -> Result<RunSummary> {
    // ─── 1) find one data file per month ─────────────────────────────
    let files = discover_month_files(&config.input_dir, config.file_policy)?;

    // ─── 2) parse each file once ─────────────────────────────────────
    let tables = load_collection(&files)?;

    // ─── 3) validate columns against the reference month ─────────────
    check_columns(&config.reference_month, &tables, config.schema_check)?.ensure_consistent()?;

    // ─── 4) join + write ─────────────────────────────────────────────
    let joined = join_months(&tables, &config.month_column)?;
    let output = config.output_path();
    write_joined(&joined, &output, config.write_index)?;

    let summary = RunSummary {
        months: tables.keys().cloned().collect(),
        rows: joined.num_rows(),
        columns: joined.num_columns() + usize::from(config.write_index),
        output,
    };
    info!(
        months = summary.months.len(),
        rows = summary.rows,
        "merged into {}",
        summary.output.display()
    );
    Ok(summary)
}
