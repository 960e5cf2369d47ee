use rusqlite::{params_from_iter, types::Value};
use tracing::debug;

use crate::{
    db::connection::WeatherDb,
    error::{Error, StoreResult},
    record::Record,
    schema::{Table, ID_COLUMN},
    value::{RowId, ValueMap},
};

/// Builds the INSERT for `values`, checking each column belongs to `table`.
/// Every column of both tables is NOT NULL without a default, so an empty
/// map could never insert and is refused here.
fn insert_sql(table: Table, values: &ValueMap) -> StoreResult<String> {
    if values.is_empty() {
        return Err(Error::NoValues { table });
    }
    let mut columns = Vec::with_capacity(values.len());
    for (name, owner, _) in values.iter() {
        if owner != table {
            return Err(Error::ColumnNotInTable { table, column: name.into() });
        }
        columns.push(name);
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders}) RETURNING {ID_COLUMN}",
        columns.join(", ")
    ))
}

impl WeatherDb {
    /// Inserts one row and returns the id sqlite assigned it.
    pub fn insert(&self, table: Table, values: &ValueMap) -> StoreResult<RowId> {
        let sql = insert_sql(table, values)?;
        let args: Vec<&Value> = values.iter().map(|(_, _, v)| v).collect();
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let id = stmt
            .query_row(params_from_iter(args), |row| row.get(0))
            .map_err(|err| Error::from_insert(table, err))?;
        debug!(%table, %id, "inserted row");
        Ok(id)
    }

    pub fn insert_record<R: Record>(&self, record: &R) -> StoreResult<RowId> {
        self.insert(R::TABLE, &record.to_values()?)
    }
}
