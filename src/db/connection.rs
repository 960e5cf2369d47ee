use core::ops::Deref;
use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use rusqlite::Connection;
use tracing::{debug, info};

use crate::{
    db::{config::DbConfig, migration},
    error::StoreResult,
    schema::Table,
};

/// Companion files sqlite may leave next to a database file.
const COMPANION_SUFFIXES: [&str; 3] = ["-journal", "-wal", "-shm"];

/// Bookkeeping tables that are not part of the weather schema.
const INTERNAL_TABLES: [&str; 1] = ["android_metadata"];

/// An open weather database with the schema applied.
#[derive(Debug)]
pub struct WeatherDb {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl Deref for WeatherDb {
    type Target = Connection;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl WeatherDb {
    /// Opens the database described by `config`, creating the file and both
    /// tables if they don't exist yet.
    pub fn open(config: &DbConfig) -> StoreResult<Self> {
        let mut conn = match config.path() {
            Some(path) => {
                info!(path = %path.display(), "opening database");
                Connection::open(path)?
            }
            None => {
                info!("opening in-memory database");
                Connection::open_in_memory()?
            }
        };
        config.apply(&conn)?;
        migration::migrate(&mut conn)?;
        Ok(Self { conn, path: config.path().map(Path::to_path_buf) })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&DbConfig::in_memory())
    }

    /// The file backing this database, `None` when in memory.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the handle. On failure the connection is dropped anyway.
    pub fn close(self) -> StoreResult<()> {
        debug!(path = ?self.path, "closing database");
        self.conn.close().map_err(|(_, err)| err.into())
    }

    /// Migration level recorded in the database.
    pub fn schema_version(&self) -> StoreResult<i32> {
        migration::get_user_version(&self.conn)
    }

    /// Names of the tables in the database, skipping sqlite's own tables and
    /// other bookkeeping.
    pub fn table_names(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare_cached(
            r#"
            SELECT name
            FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name"#,
        )?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .filter(|name| {
                name.as_ref()
                    .map(|n| !INTERNAL_TABLES.contains(&n.as_str()))
                    .unwrap_or(true)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Column names of `table` as the database declares them.
    pub fn column_names(&self, table: Table) -> StoreResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare(&format!("PRAGMA table_info({})", table.name()))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_if_exists(path: &Path) -> io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Deletes the database file at `path` along with its journal files.
/// Returns whether the database file existed; a missing file is not an error.
pub fn delete_database(path: impl AsRef<Path>) -> StoreResult<bool> {
    let path = path.as_ref();
    let existed = remove_if_exists(path)?;
    for suffix in COMPANION_SUFFIXES {
        remove_if_exists(&with_suffix(path, suffix))?;
    }
    if existed {
        info!(path = %path.display(), "deleted database");
    }
    Ok(existed)
}
