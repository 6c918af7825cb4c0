use arrow::{
    array::{new_null_array, ArrayRef, StringArray},
    compute::concat_batches,
    datatypes::{DataType, Field, Schema, SchemaRef},
    record_batch::RecordBatch,
};
use std::{collections::BTreeMap, iter, sync::Arc};
use tracing::{info, warn};

use super::raw_table::MonthTable;
use crate::error::{MergeError, Result};

/// Stack every month's rows, in collection order, under the union of their
/// columns, and tag each row with its month in a trailing `month_column`.
/// Columns a month lacks come out null.
#[tracing::instrument(level = "info", skip(tables), fields(months = tables.len()))]
pub fn join_months(
    tables: &BTreeMap<String, MonthTable>,
    month_column: &str,
) -> Result<RecordBatch> {
    if tables.is_empty() {
        return Err(MergeError::NoMonths);
    }

    let schema = union_schema(tables.values(), month_column);
    let mut aligned = Vec::with_capacity(tables.len());
    for (month, table) in tables {
        if table.column_names().contains(&month_column) {
            warn!(
                month = %month,
                column = month_column,
                "month already has a tag column; it is moved to the end and its values replaced"
            );
        }
        aligned.push(align_to(table.batch(), &schema, month_column, month)?);
    }

    let joined = concat_batches(&schema, &aligned)?;
    info!(
        rows = joined.num_rows(),
        columns = joined.num_columns(),
        "joined months"
    );
    Ok(joined)
}

/// Union of all data columns in first-seen order, then the month tag.
fn union_schema<'a>(
    tables: impl Iterator<Item = &'a MonthTable>,
    month_column: &str,
) -> SchemaRef {
    let mut names: Vec<&str> = Vec::new();
    for table in tables {
        for name in table.column_names() {
            if name != month_column && !names.contains(&name) {
                names.push(name);
            }
        }
    }

    let fields: Vec<Field> = names
        .into_iter()
        .chain(iter::once(month_column))
        .map(|n| Field::new(n, DataType::Utf8, true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Reorder `batch` to `schema`, null-fill the columns it lacks and fill the
/// tag column with `month`.
fn align_to(
    batch: &RecordBatch,
    schema: &SchemaRef,
    month_column: &str,
    month: &str,
) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let columns: Vec<ArrayRef> = schema
        .fields()
        .iter()
        .map(|f| {
            if f.name() == month_column {
                return Arc::new(StringArray::from(vec![month; rows])) as ArrayRef;
            }
            match batch.column_by_name(f.name()) {
                Some(col) => Arc::clone(col),
                None => new_null_array(f.data_type(), rows),
            }
        })
        .collect();

    Ok(RecordBatch::try_new(Arc::clone(schema), columns)?)
}
