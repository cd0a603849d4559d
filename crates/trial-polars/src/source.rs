//! DataFrame adapters for the core table traits

use crate::error::into_core;
use polars::prelude::*;
use trial_core::{ColumnData, ColumnKind, NamedColumn, TableSink, TableSource};

/// Read-only view of a DataFrame as a [`TableSource`]
#[derive(Debug, Clone, Copy)]
pub struct FrameSource<'a> {
    frame: &'a DataFrame,
}

impl<'a> FrameSource<'a> {
    pub fn new(frame: &'a DataFrame) -> Self {
        Self { frame }
    }

    pub fn frame(&self) -> &'a DataFrame {
        self.frame
    }
}

impl TableSource for FrameSource<'_> {
    fn row_count(&self) -> usize {
        self.frame.height()
    }

    fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    fn column_kind(&self, name: &str) -> trial_core::Result<ColumnKind> {
        let dtype = self.frame.column(name).map_err(into_core)?.dtype();
        if dtype.is_integer() {
            Ok(ColumnKind::Int)
        } else if dtype.is_float() {
            Ok(ColumnKind::Float)
        } else {
            Err(trial_core::Error::TypeMismatch {
                column: name.to_string(),
                expected: "numeric".to_string(),
                got: format!("{:?}", dtype),
            })
        }
    }

    fn float_column(&self, name: &str) -> trial_core::Result<Vec<f64>> {
        // Rejects non-numeric dtypes before casting
        self.column_kind(name)?;
        let column = self.frame.column(name).map_err(into_core)?;
        let cast = column.cast(&DataType::Float64).map_err(into_core)?;
        collect_non_null(name, cast.f64().map_err(into_core)?.into_iter())
    }

    fn int_column(&self, name: &str) -> trial_core::Result<Vec<i64>> {
        if self.column_kind(name)? == ColumnKind::Float {
            return Err(trial_core::Error::TypeMismatch {
                column: name.to_string(),
                expected: ColumnKind::Int.to_string(),
                got: ColumnKind::Float.to_string(),
            });
        }
        let column = self.frame.column(name).map_err(into_core)?;
        let cast = column.cast(&DataType::Int64).map_err(into_core)?;
        collect_non_null(name, cast.i64().map_err(into_core)?.into_iter())
    }
}

fn collect_non_null<T>(
    name: &str,
    values: impl Iterator<Item = Option<T>>,
) -> trial_core::Result<Vec<T>> {
    values
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                trial_core::Error::InvalidColumn(format!("{name} has a missing value at row {row}"))
            })
        })
        .collect()
}

/// Convert a core column into a polars column
pub fn to_polars_column(column: &NamedColumn) -> Column {
    let name = PlSmallStr::from(column.name.as_str());
    match &column.data {
        ColumnData::Int(values) => Series::new(name, values.as_slice()).into(),
        ColumnData::Float(values) => Series::new(name, values.as_slice()).into(),
    }
}

/// Build a DataFrame from core columns
pub fn columns_to_frame(columns: &[NamedColumn]) -> crate::Result<DataFrame> {
    Ok(DataFrame::new(columns.iter().map(to_polars_column).collect())?)
}

/// [`TableSink`] collecting written columns into a DataFrame
#[derive(Debug, Clone, Default)]
pub struct FrameSink {
    columns: Vec<Column>,
}

impl FrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The columns written so far
    pub fn frame(&self) -> crate::Result<DataFrame> {
        Ok(DataFrame::new(self.columns.clone())?)
    }

    pub fn into_frame(self) -> crate::Result<DataFrame> {
        Ok(DataFrame::new(self.columns)?)
    }
}

impl TableSink for FrameSink {
    fn write_columns(&mut self, columns: &[NamedColumn]) -> trial_core::Result<()> {
        let mut staged = self.columns.clone();
        staged.extend(columns.iter().map(to_polars_column));
        // DataFrame::new rejects duplicate names and ragged lengths
        DataFrame::new(staged.clone()).map_err(into_core)?;
        self.columns = staged;
        Ok(())
    }
}
