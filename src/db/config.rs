use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::{error::StoreResult, schema::DATABASE_NAME};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JournalMode {
    Delete,
    Wal,
    Memory,
}

impl JournalMode {
    const fn as_str(self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
            JournalMode::Memory => "MEMORY",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Synchronous {
    Off,
    Normal,
    Full,
}

impl Synchronous {
    const fn as_str(self) -> &'static str {
        match self {
            Synchronous::Off => "OFF",
            Synchronous::Normal => "NORMAL",
            Synchronous::Full => "FULL",
        }
    }
}

/// Where the database lives and the pragmas it is opened with.
///
/// ```
/// use sunshine_db::db::config::{DbConfig, JournalMode};
/// let config = DbConfig::default();
///
/// assert_eq!(config.path().unwrap().to_str(), Some("weather.db"));
/// assert_eq!(config.journal_mode(), JournalMode::Delete);
/// assert!(config.foreign_keys());
/// ```
///
/// ```
/// use sunshine_db::db::config::{DbConfig, JournalMode};
/// let config = DbConfig::in_memory().with_foreign_keys(false);
///
/// assert_eq!(config.path(), None);
/// assert_eq!(config.journal_mode(), JournalMode::Memory);
/// assert!(!config.foreign_keys());
/// ```
#[derive(Clone, Debug)]
pub struct DbConfig {
    pub(crate) path: Option<PathBuf>,
    pub(crate) journal_mode: JournalMode,
    pub(crate) synchronous: Synchronous,
    pub(crate) foreign_keys: bool,
}

impl DbConfig {
    #[must_use]
    pub fn at(path: impl AsRef<Path>) -> Self {
        Self { path: Some(path.as_ref().to_path_buf()), ..Self::default() }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            journal_mode: JournalMode::Memory,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_journal_mode(mut self, mode: JournalMode) -> Self {
        self.journal_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_synchronous(mut self, synchronous: Synchronous) -> Self {
        self.synchronous = synchronous;
        self
    }

    /// Whether sqlite checks `weather.loc_key` against `location._id`.
    #[must_use]
    pub const fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn journal_mode(&self) -> JournalMode {
        self.journal_mode
    }

    #[must_use]
    pub const fn synchronous(&self) -> Synchronous {
        self.synchronous
    }

    #[must_use]
    pub const fn foreign_keys(&self) -> bool {
        self.foreign_keys
    }

    pub(crate) fn apply(&self, conn: &Connection) -> StoreResult<()> {
        // journal_mode reports the resulting mode as a row.
        let _: String = conn.pragma_update_and_check(
            None,
            "journal_mode",
            self.journal_mode.as_str(),
            |row| row.get(0),
        )?;
        conn.pragma_update(None, "synchronous", self.synchronous.as_str())?;
        conn.pragma_update(None, "foreign_keys", self.foreign_keys)?;
        Ok(())
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: Some(PathBuf::from(DATABASE_NAME)),
            journal_mode: JournalMode::Delete,
            synchronous: Synchronous::Normal,
            foreign_keys: true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn at_keeps_other_defaults() {
        let config = DbConfig::at("/tmp/other.db");
        assert_eq!(config.path(), Some(Path::new("/tmp/other.db")));
        assert_eq!(config.synchronous(), Synchronous::Normal);
        assert!(config.foreign_keys());
    }

    #[rstest]
    fn apply_sets_pragmas() {
        let conn = Connection::open_in_memory().unwrap();
        DbConfig::in_memory()
            .with_synchronous(Synchronous::Off)
            .apply(&conn)
            .unwrap();
        let fk: bool = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        let sync: i64 = conn
            .pragma_query_value(None, "synchronous", |row| row.get(0))
            .unwrap();
        assert!(fk);
        assert_eq!(sync, 0);
    }

    #[rstest]
    fn apply_can_disable_foreign_keys() {
        let conn = Connection::open_in_memory().unwrap();
        DbConfig::in_memory().with_foreign_keys(false).apply(&conn).unwrap();
        let fk: bool = conn
            .pragma_query_value(None, "foreign_keys", |row| row.get(0))
            .unwrap();
        assert!(!fk);
    }
}
