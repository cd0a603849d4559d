//! Narrow tabular interfaces
//!
//! The aggregator never touches a concrete dataframe or file format. Input
//! arrives through [`TableSource`] (row count plus named-column lookup) and
//! derived columns leave through [`TableSink`]. [`MemoryTable`] implements
//! both for in-process use and tests.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    Int,
    Float,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Int => write!(f, "integer"),
            ColumnKind::Float => write!(f, "float"),
        }
    }
}

/// Ordered list of named, typed columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    columns: Vec<(String, ColumnKind)>,
}

impl ColumnSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, replacing the kind if the name is already declared
    pub fn with_column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = kind,
            None => self.columns.push((name, kind)),
        }
        self
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, kind)| *kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(n, k)| (n.as_str(), *k))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column payload
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Float(_) => ColumnKind::Float,
        }
    }
}

/// A named column, the unit of exchange with sinks
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColumn {
    pub name: String,
    pub data: ColumnData,
}

impl NamedColumn {
    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Int(values),
        }
    }

    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Float(values),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Read access to a table of simulation records
///
/// Implementations must iterate rows in a stable order; for simulation
/// output that is trial-major, step-minor.
pub trait TableSource {
    /// Number of rows
    fn row_count(&self) -> usize;

    /// Column names in table order
    fn column_names(&self) -> Vec<String>;

    /// Declared type of a column
    fn column_kind(&self, name: &str) -> Result<ColumnKind>;

    /// A column as floats; integer columns are widened
    fn float_column(&self, name: &str) -> Result<Vec<f64>>;

    /// A column as integers; float columns are a type mismatch
    fn int_column(&self, name: &str) -> Result<Vec<i64>>;

    fn has_column(&self, name: &str) -> bool {
        self.column_names().iter().any(|c| c == name)
    }

    /// The schema of the whole table
    fn schema(&self) -> Result<ColumnSchema> {
        self.column_names()
            .into_iter()
            .try_fold(ColumnSchema::new(), |schema, name| -> Result<ColumnSchema> {
                let kind = self.column_kind(&name)?;
                Ok(schema.with_column(name, kind))
            })
    }
}

/// Write access for derived columns
pub trait TableSink {
    /// Write a batch of equally long named columns
    fn write_columns(&mut self, columns: &[NamedColumn]) -> Result<()>;
}

/// In-memory column table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryTable {
    columns: Vec<NamedColumn>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<NamedColumn>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            table.push_column(column)?;
        }
        Ok(table)
    }

    /// Add a column; names must be unique and lengths must agree
    pub fn push_column(&mut self, column: NamedColumn) -> Result<()> {
        if self.columns.iter().any(|c| c.name == column.name) {
            return Err(Error::InvalidColumn(format!(
                "duplicate column {}",
                column.name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(Error::length_mismatch(&column.name, first.len(), column.len()));
            }
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn columns(&self) -> &[NamedColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Result<&NamedColumn> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::InvalidColumn(name.to_string()))
    }
}

impl TableSource for MemoryTable {
    fn row_count(&self) -> usize {
        self.columns.first().map_or(0, NamedColumn::len)
    }

    fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    fn column_kind(&self, name: &str) -> Result<ColumnKind> {
        Ok(self.column(name)?.data.kind())
    }

    fn float_column(&self, name: &str) -> Result<Vec<f64>> {
        match &self.column(name)?.data {
            ColumnData::Float(values) => Ok(values.clone()),
            ColumnData::Int(values) => Ok(values.iter().map(|&v| v as f64).collect()),
        }
    }

    fn int_column(&self, name: &str) -> Result<Vec<i64>> {
        match &self.column(name)?.data {
            ColumnData::Int(values) => Ok(values.clone()),
            ColumnData::Float(_) => Err(Error::TypeMismatch {
                column: name.to_string(),
                expected: ColumnKind::Int.to_string(),
                got: ColumnKind::Float.to_string(),
            }),
        }
    }
}

impl TableSink for MemoryTable {
    fn write_columns(&mut self, columns: &[NamedColumn]) -> Result<()> {
        // Validate the whole batch first so a failure leaves the table untouched
        let mut staged = self.clone();
        for column in columns {
            staged.push_column(column.clone())?;
        }
        *self = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> MemoryTable {
        MemoryTable::from_columns(vec![
            NamedColumn::int("Step", vec![0, 1, 0, 1]),
            NamedColumn::float("Severe", vec![1.0, 2.0, 3.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_source_lookup() {
        let table = sample_table();
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.column_names(), vec!["Step", "Severe"]);
        assert_eq!(table.float_column("Step").unwrap(), vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(table.int_column("Step").unwrap(), vec![0, 1, 0, 1]);
        assert!(table.has_column("Severe"));
        assert!(!table.has_column("Deceased"));
    }

    #[test]
    fn test_int_lookup_of_float_column() {
        let table = sample_table();
        let err = table.int_column("Severe").unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_unknown_column() {
        let table = sample_table();
        assert!(matches!(
            table.float_column("Rt").unwrap_err(),
            Error::InvalidColumn(_)
        ));
    }

    #[test]
    fn test_schema_from_source() {
        let schema = sample_table().schema().unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.kind("Step"), Some(ColumnKind::Int));
        assert_eq!(schema.kind("Severe"), Some(ColumnKind::Float));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut table = sample_table();
        let err = table
            .push_column(NamedColumn::float("Rt", vec![1.0]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidColumn(_)));
    }

    #[test]
    fn test_sink_is_all_or_nothing() {
        let mut table = sample_table();
        let result = table.write_columns(&[
            NamedColumn::float("Rt", vec![0.5; 4]),
            NamedColumn::float("Step", vec![0.0; 4]),
        ]);
        assert!(result.is_err());
        assert_eq!(table.columns().len(), 2);

        table
            .write_columns(&[NamedColumn::float("Rt", vec![0.5; 4])])
            .unwrap();
        assert_eq!(table.columns().len(), 3);
    }

    #[test]
    fn test_schema_replaces_kind() {
        let schema = ColumnSchema::new()
            .with_column("Tested", ColumnKind::Float)
            .with_column("Tested", ColumnKind::Int);
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.kind("Tested"), Some(ColumnKind::Int));
    }
}
