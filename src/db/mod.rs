pub mod config;
pub mod connection;
pub mod migration;
pub mod read;
pub mod write;

pub use config::DbConfig;
pub use connection::{delete_database, WeatherDb};
pub use read::{Cursor, Prepared, Query};
