//! The generic column-value representation handed to sqlite.

use rusqlite::types::{
    FromSql, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef,
};

use crate::schema::{Column, Table, ID_COLUMN};

/// An auto-assigned row identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub i64);

impl RowId {
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl core::fmt::Display for RowId {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for RowId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for RowId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(RowId)
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        Value::Integer(id.0)
    }
}

/// Column name to value, in insertion order. Putting a column twice replaces
/// the earlier value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueMap {
    entries: Vec<(&'static str, Table, Value)>,
}

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put<C: Column>(&mut self, column: C, value: impl Into<Value>) {
        self.put_raw(column.table(), column.name(), value.into());
    }

    /// Builder form of [`ValueMap::put`].
    #[must_use]
    pub fn with<C: Column>(mut self, column: C, value: impl Into<Value>) -> Self {
        self.put(column, value);
        self
    }

    /// Sets `_id` explicitly, which is otherwise left for sqlite to assign.
    pub fn put_id(&mut self, table: Table, id: RowId) {
        self.put_raw(table, ID_COLUMN, id.into());
    }

    fn put_raw(&mut self, table: Table, name: &'static str, value: Value) {
        match self.entries.iter_mut().find(|(n, t, _)| *n == name && *t == table)
        {
            Some(entry) => entry.2 = value,
            None => self.entries.push((name, table, value)),
        }
    }

    #[must_use]
    pub fn get<C: Column>(&self, column: C) -> Option<&Value> {
        self.get_raw(column.table(), column.name())
    }

    #[must_use]
    pub fn get_id(&self, table: Table) -> Option<&Value> {
        self.get_raw(table, ID_COLUMN)
    }

    fn get_raw(&self, table: Table, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, t, _)| *n == name && *t == table)
            .map(|(_, _, v)| v)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `(column name, table, value)` triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Table, &Value)> {
        self.entries.iter().map(|(n, t, v)| (*n, *t, v))
    }
}
