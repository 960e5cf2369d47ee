use std::borrow::Cow;

use rusqlite::{params_from_iter, types::Value, Row, Rows, Statement};
use tracing::debug;

use crate::{
    db::connection::WeatherDb,
    error::{Error, StoreResult},
    record::{Location, Record, Stored},
    schema::{Column, LocationColumn, Table, ID_COLUMN},
    value::RowId,
};

/// A SELECT against one table.
///
/// Projection entries that are bare names must be columns of the table;
/// anything else, such as `count(*)` or `max(max_temp) AS hottest`, is
/// passed to sqlite as written.
///
/// # Default
///
/// ```
/// use sunshine_db::{db::read::Query, schema::Table};
/// let query = Query::new(Table::Weather);
///
/// assert_eq!(query.sql().unwrap(), "SELECT * FROM weather");
/// ```
///
/// ```
/// use sunshine_db::{db::read::Query, schema::Table};
/// let query = Query::new(Table::Location)
///     .columns(["_id", "city_name"])
///     .filter("location_setting = ?", ["99705".to_owned()])
///     .order_by("city_name ASC")
///     .limit(1);
///
/// assert_eq!(
///     query.sql().unwrap(),
///     "SELECT _id, city_name FROM location WHERE location_setting = ? \
///      ORDER BY city_name ASC LIMIT 1"
/// );
/// ```
#[derive(Clone, Debug)]
pub struct Query<'a> {
    pub(crate) table: Table,
    pub(crate) columns: Option<Vec<Cow<'a, str>>>,
    pub(crate) filter: Option<Cow<'a, str>>,
    pub(crate) args: Vec<Value>,
    pub(crate) group_by: Option<Cow<'a, str>>,
    pub(crate) having: Option<Cow<'a, str>>,
    pub(crate) order_by: Option<Cow<'a, str>>,
    pub(crate) limit: Option<u32>,
}

impl<'a> Query<'a> {
    #[must_use]
    pub fn new(table: Table) -> Self {
        Self {
            table,
            columns: None,
            filter: None,
            args: Vec::new(),
            group_by: None,
            having: None,
            order_by: None,
            limit: None,
        }
    }

    /// Restricts the projection. Without it every column is returned.
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'a, str>>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Projection built from typed columns, with `_id` first.
    #[must_use]
    pub fn typed_columns<C: Column>(self, columns: &[C]) -> Self {
        let names = std::iter::once(ID_COLUMN)
            .chain(columns.iter().map(|c| c.name()));
        self.columns(names)
    }

    /// A WHERE clause; each `?` is bound to the next of `args`.
    #[must_use]
    pub fn filter<I, V>(mut self, clause: impl Into<Cow<'a, str>>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter = Some(clause.into());
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Shorthand for `filter("_id = ?", [id])`.
    #[must_use]
    pub fn by_id(self, id: RowId) -> Self {
        self.filter(format!("{ID_COLUMN} = ?"), [id])
    }

    #[must_use]
    pub fn group_by(mut self, clause: impl Into<Cow<'a, str>>) -> Self {
        self.group_by = Some(clause.into());
        self
    }

    #[must_use]
    pub fn having(mut self, clause: impl Into<Cow<'a, str>>) -> Self {
        self.having = Some(clause.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, clause: impl Into<Cow<'a, str>>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn table(&self) -> Table {
        self.table
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Renders the statement, checking that bare names in the projection are
    /// columns of the queried table and that HAVING comes with a GROUP BY.
    pub fn sql(&self) -> StoreResult<String> {
        let projection = match &self.columns {
            None => Cow::Borrowed("*"),
            Some(columns) => {
                if let Some(col) = columns
                    .iter()
                    .find(|c| is_bare_name(c) && !self.table.has_column(c))
                {
                    return Err(Error::ColumnNotInTable {
                        table: self.table,
                        column: col.to_string(),
                    });
                }
                Cow::Owned(columns.join(", "))
            }
        };
        if self.having.is_some() && self.group_by.is_none() {
            return Err(Error::HavingWithoutGroupBy);
        }

        let mut sql = format!("SELECT {projection} FROM {}", self.table);
        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }
        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        Ok(sql)
    }
}

fn is_bare_name(entry: &str) -> bool {
    !entry.is_empty()
        && entry.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A prepared query. Call [`Prepared::cursor`] to run it.
#[derive(Debug)]
pub struct Prepared<'conn> {
    stmt: Statement<'conn>,
    args: Vec<Value>,
}

impl<'conn> Prepared<'conn> {
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.stmt.column_names()
    }

    /// Starts the query. The cursor sits before the first row.
    pub fn cursor(&mut self) -> StoreResult<Cursor<'_>> {
        let rows = self.stmt.query(params_from_iter(self.args.iter()))?;
        Ok(Cursor { rows, position: None })
    }
}

/// Forward-only, single-pass view over a query's rows.
pub struct Cursor<'stmt> {
    rows: Rows<'stmt>,
    position: Option<usize>,
}

impl<'stmt> Cursor<'stmt> {
    /// Moves to the next row. `None` once the rows run out.
    pub fn next_row(&mut self) -> StoreResult<Option<&Row<'stmt>>> {
        let row = self.rows.next()?;
        if row.is_some() {
            self.position = Some(self.position.map_or(0, |p| p + 1));
        }
        Ok(row)
    }

    /// Moves to the next row and reads it as a record.
    pub fn next_record<R: Record>(&mut self) -> StoreResult<Option<Stored<R>>> {
        match self.next_row()? {
            Some(row) => Ok(Some(Stored::try_from(row)?)),
            None => Ok(None),
        }
    }

    /// Index of the current row, `None` before the first advance.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        self.position
    }
}

impl WeatherDb {
    pub fn query(&self, query: &Query<'_>) -> StoreResult<Prepared<'_>> {
        let sql = query.sql()?;
        debug!(%sql, args = query.args.len(), "preparing query");
        let stmt = self.conn.prepare(&sql)?;
        Ok(Prepared { stmt, args: query.args.clone() })
    }

    /// Runs `query` against `R`'s table with every column selected. The
    /// query's own table and projection are ignored.
    pub fn fetch<R: Record>(
        &self,
        query: &Query<'_>,
    ) -> StoreResult<Vec<Stored<R>>> {
        let mut query = query.clone();
        query.table = R::TABLE;
        query.columns = None;
        let mut prepared = self.query(&query)?;
        let mut cursor = prepared.cursor()?;
        let mut records = Vec::new();
        while let Some(record) = cursor.next_record()? {
            records.push(record);
        }
        Ok(records)
    }

    pub fn get<R: Record>(&self, id: RowId) -> StoreResult<Option<Stored<R>>> {
        let query = Query::new(R::TABLE).by_id(id);
        Ok(self.fetch(&query)?.into_iter().next())
    }

    /// Looks a location up by its natural key.
    pub fn find_location(
        &self,
        location_setting: &str,
    ) -> StoreResult<Option<Stored<Location>>> {
        let query = Query::new(Table::Location).filter(
            format!("{} = ?", LocationColumn::LocationSetting.name()),
            [location_setting.to_owned()],
        );
        Ok(self.fetch(&query)?.into_iter().next())
    }
}
