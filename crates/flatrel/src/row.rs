//! A single materialized record.
//!
//! A [`Row`] owns one record's values in schema order, alongside the
//! [`Table`] it came from. Field access is by column name; there is no
//! generated accessor per column.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::table::Table;

/// One record of a table, with name-based field access.
///
/// Rows are value-like: cloning is independent, and equality is structural
/// (same table binding, same values).
#[derive(Clone, PartialEq, Eq)]
pub struct Row {
    table: Arc<Table>,
    values: Vec<Option<String>>,
}

impl Row {
    /// Builds a row from an ordered field sequence.
    ///
    /// Fields pair up with the table's columns in order; surplus fields are
    /// ignored and missing trailing fields are left absent.
    pub fn new<I, S>(table: Arc<Table>, fields: I) -> Row
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let width = table.columns().len();
        let mut values: Vec<Option<String>> = fields
            .into_iter()
            .take(width)
            .map(|f| Some(f.into()))
            .collect();
        values.resize(width, None);
        Row { table, values }
    }

    /// Builds a row from name/value pairs.
    ///
    /// Columns not named stay absent. A name outside the table's columns is
    /// an [`Error::UnknownAttribute`].
    pub fn from_pairs<I, K, V>(table: Arc<Table>, pairs: I) -> Result<Row>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let mut row = Row {
            values: vec![None; table.columns().len()],
            table,
        };
        for (name, value) in pairs {
            row.set(&name.into(), value)?;
        }
        Ok(row)
    }

    /// Returns the raw value of the named field, or `None` if the field is
    /// absent or the name is not a column of the table.
    pub fn get(&self, name: &str) -> Option<&str> {
        let i = self.table.columns().iter().position(|c| c == name)?;
        self.values[i].as_deref()
    }

    /// Sets the named field to the string form of `value`.
    pub fn set(&mut self, name: &str, value: impl ToString) -> Result<()> {
        let i = self
            .table
            .columns()
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::UnknownAttribute {
                name: name.to_string(),
            })?;
        self.values[i] = Some(value.to_string());
        Ok(())
    }

    /// Returns the table this row belongs to.
    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    /// Returns the row as column/value pairs, in schema order.
    pub fn to_pairs(&self) -> Vec<(&str, Option<&str>)> {
        self.table
            .columns()
            .iter()
            .zip(&self.values)
            .map(|(c, v)| (c.as_str(), v.as_deref()))
            .collect()
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Row");
        for (column, value) in self.table.columns().iter().zip(&self.values) {
            s.field(column, value);
        }
        s.finish()
    }
}
