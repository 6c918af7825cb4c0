use arrow::{
    array::{ArrayRef, UInt64Array},
    csv::WriterBuilder,
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use std::{fs, path::Path, sync::Arc};
use tempfile::Builder;
use tracing::info;

use crate::error::{io_at, Result};

/// Write `batch` as CSV with a header row. With `write_index`, a leading
/// unnamed column numbers the rows from 0.
///
/// The CSV goes to a temporary file next to `path` and is renamed over it only
/// once fully written, so an existing file is either replaced whole or left
/// alone.
#[tracing::instrument(level = "info", skip(batch, path), fields(path = %path.as_ref().display(), rows = batch.num_rows()))]
pub fn write_joined<P: AsRef<Path>>(batch: &RecordBatch, path: P, write_index: bool) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(io_at(dir))?;

    let out = if write_index {
        with_row_index(batch)?
    } else {
        batch.clone()
    };

    let tmp = temp_builder().tempfile_in(dir).map_err(io_at(dir))?;
    // a replaced output keeps the mode it already had
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_at(tmp.path()))?;
    }
    {
        let mut writer = WriterBuilder::new().with_header(true).build(tmp.as_file());
        writer.write(&out)?;
    }
    tmp.as_file().sync_all().map_err(io_at(tmp.path()))?;
    tmp.persist(path).map_err(|e| io_at(path)(e.error))?;

    info!(
        rows = out.num_rows(),
        columns = out.num_columns(),
        "wrote {}",
        path.display()
    );
    Ok(())
}

/// Temp files default to 0600; ask for 0666 so a new output gets the
/// umask-derived mode a plain `File::create` would give it.
fn temp_builder<'a, 'b>() -> Builder<'a, 'b> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
}

fn with_row_index(batch: &RecordBatch) -> Result<RecordBatch> {
    let index: ArrayRef = Arc::new(UInt64Array::from_iter_values(0..batch.num_rows() as u64));

    let mut fields: Vec<Arc<Field>> = Vec::with_capacity(batch.num_columns() + 1);
    fields.push(Arc::new(Field::new("", DataType::UInt64, false)));
    fields.extend(batch.schema().fields().iter().cloned());

    let mut columns = Vec::with_capacity(batch.num_columns() + 1);
    columns.push(index);
    columns.extend(batch.columns().iter().cloned());

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
