//! File persistence through polars
//!
//! CSV is the input format of the simulation runs; Arrow IPC is the binary
//! columnar format aggregated results are stored in. Writers go through a
//! sibling staging file so a failed write never leaves a truncated table
//! behind.

use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;
use trial_core::{ColumnKind, ColumnSchema};

use crate::Result;

fn dtype_of(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Int => DataType::Int64,
        ColumnKind::Float => DataType::Float64,
    }
}

/// Read a headered CSV file, casting the declared columns to their kinds
///
/// Columns the file carries but the schema does not name keep their
/// inferred dtype. Declared columns the file lacks are not an error here;
/// asking for them later reports an invalid column.
pub fn read_trial_csv(path: impl AsRef<Path>, schema: &ColumnSchema) -> Result<DataFrame> {
    let path = path.as_ref();
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        // Infer from every row
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    for (name, kind) in schema.iter() {
        let Ok(column) = df.column(name) else {
            continue;
        };
        let dtype = dtype_of(kind);
        if column.dtype() != &dtype {
            let cast = column.strict_cast(&dtype)?;
            df.with_column(cast)?;
        }
    }

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read trial csv");
    Ok(df)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write through a staging file, renaming it into place on success
fn write_staged<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> PolarsResult<()>,
{
    let staging = staging_path(path);
    let mut file = File::create(&staging)?;
    if let Err(e) = write(&mut file) {
        drop(file);
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }
    drop(file);
    fs::rename(&staging, path)?;
    Ok(())
}

/// Persist a frame as Arrow IPC
pub fn write_ipc(path: impl AsRef<Path>, df: &mut DataFrame) -> Result<()> {
    let path = path.as_ref();
    write_staged(path, |file| IpcWriter::new(file).finish(df))?;
    debug!(path = %path.display(), rows = df.height(), "wrote ipc");
    Ok(())
}

/// Load a frame written by [`write_ipc`]
pub fn read_ipc(path: impl AsRef<Path>) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    Ok(IpcReader::new(file).finish()?)
}

/// Persist a frame as headered CSV
pub fn write_csv(path: impl AsRef<Path>, df: &mut DataFrame) -> Result<()> {
    let path = path.as_ref();
    write_staged(path, |file| CsvWriter::new(file).include_header(true).finish(df))?;
    debug!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}
