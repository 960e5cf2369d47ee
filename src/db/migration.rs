use once_cell::sync::Lazy;
use rusqlite::{Connection, Transaction};
use tracing::{error, info};

use crate::{
    error::{Error, StoreResult},
    schema::{create_location_table_sql, create_weather_table_sql},
};

type MigrationFn =
    Box<dyn Send + Sync + Fn(&Transaction) -> rusqlite::Result<()>>;

static MIGRATIONS: Lazy<[MigrationFn; 1]> = Lazy::new(|| {
    [
        // Migration 1 creates the location and weather tables.
        Box::new(|tx: &Transaction| {
            tx.execute(&create_location_table_sql(), [])?;
            tx.execute(&create_weather_table_sql(), [])?;
            Ok(())
        }),
    ]
});

/// Number of migrations a fully migrated database has applied.
#[must_use]
pub fn latest_version() -> i32 {
    MIGRATIONS.len() as i32
}

/// Gets PRAGMA user_version.
pub(crate) fn get_user_version(conn: &Connection) -> StoreResult<i32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Sets PRAGMA user_version = `version`.
fn set_user_version(conn: &Connection, version: i32) -> StoreResult<()> {
    Ok(conn.pragma_update(None, "user_version", version)?)
}

/// Runs the migrations newer than the stored user_version, each in its own
/// transaction, bumping user_version as each one commits.
pub fn migrate(conn: &mut Connection) -> StoreResult<()> {
    let starting_version = get_user_version(conn)?;

    for (version, migration) in
        MIGRATIONS.iter().enumerate().skip(starting_version.max(0) as usize)
    {
        let version = version as i32 + 1;
        let tx = conn.transaction()?;
        info!("Starting migration version {}", version);

        if let Err(err) = migration(&tx) {
            let err = Error::MigrationFailed(version, err.to_string());
            error!(?err, "Migration failed");
            return Err(err);
        }
        set_user_version(&tx, version)?;
        info!("Migration version {} succeeded", version);
        tx.commit()?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use rusqlite::params;

    use crate::error::Error;

    #[fixture]
    fn test_db() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    mod test_user_version {
        use super::*;
        use pretty_assertions::assert_eq;

        #[rstest]
        fn user_version_is_0_by_default(test_db: Connection) {
            assert_eq!(get_user_version(&test_db).unwrap(), 0);
        }

        #[rstest]
        fn set_user_version_works(test_db: Connection) {
            set_user_version(&test_db, 42).unwrap();
            assert_eq!(get_user_version(&test_db).unwrap(), 42);
        }
    }

    #[rstest]
    #[case("location")]
    #[case("weather")]
    fn creates_table(test_db: Connection, #[case] table: &str) {
        let mut conn = test_db;
        migrate(&mut conn).unwrap();

        let rec: (String, String) = conn
            .query_row(
                r#"SELECT type, name FROM sqlite_schema WHERE tbl_name = ?1"#,
                params![table],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(rec, ("table".to_owned(), table.to_owned()));
    }

    #[rstest]
    fn sets_user_version(test_db: Connection) {
        let mut conn = test_db;
        migrate(&mut conn).unwrap();
        assert_eq!(get_user_version(&conn).unwrap(), latest_version());
    }

    #[rstest]
    fn running_twice_is_a_no_op(test_db: Connection) {
        let mut conn = test_db;
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        assert_eq!(get_user_version(&conn).unwrap(), 1);
    }

    #[rstest]
    fn fails_if_table_exists(test_db: Connection) {
        let mut conn = test_db;
        conn.execute("CREATE TABLE weather (_id INTEGER PRIMARY KEY)", [])
            .unwrap();

        let res = migrate(&mut conn);
        assert!(matches!(res, Err(Error::MigrationFailed(1, _))));

        // The failed step rolled back, location included.
        let count: i64 = conn
            .query_row(
                "SELECT count(*) FROM sqlite_schema WHERE name = 'location'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 0);
        assert_eq!(get_user_version(&conn).unwrap(), 0);
    }
}
