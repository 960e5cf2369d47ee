use thiserror::Error;

use crate::schema::Table;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("database migration {0} failed: {1}")]
    MigrationFailed(i32, String),

    #[error("insert into {table} violated a constraint: {message}")]
    Constraint { table: Table, message: String },

    #[error("column {column} does not belong to table {table}")]
    ColumnNotInTable { table: Table, column: String },

    #[error("a HAVING clause requires a GROUP BY clause")]
    HavingWithoutGroupBy,

    #[error("nothing to insert into {table}")]
    NoValues { table: Table },

    #[error("date {0} is outside the storable years 0 to 9999")]
    DateOutOfRange(chrono::NaiveDate),
}

impl Error {
    /// Maps a failed insert into [`Error::Constraint`] when sqlite reports a
    /// constraint violation, otherwise passes the error through.
    pub(crate) fn from_insert(table: Table, err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Error::Constraint {
                    table,
                    message: msg.unwrap_or_else(|| e.to_string()),
                }
            }
            _ => err.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, Error>;
