#![warn(clippy::missing_const_for_fn, clippy::must_use_candidate)]

//! Local storage for a weather app: a `location` table of places and a
//! `weather` table of daily readings, kept in one sqlite file.
//!
//! ```
//! use sunshine_db::{Location, WeatherDb};
//!
//! let db = WeatherDb::open_in_memory()?;
//! let id = db.insert_record(&Location {
//!     location_setting: "99705".to_owned(),
//!     city_name: "North Pole".to_owned(),
//!     coord_lat: 64.7488,
//!     coord_long: -147.353,
//! })?;
//! let stored = db.get::<Location>(id)?.expect("just inserted");
//! assert_eq!(stored.record.city_name, "North Pole");
//! db.close()?;
//! # Ok::<(), sunshine_db::error::Error>(())
//! ```

pub mod db;
pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use db::{delete_database, DbConfig, Query, WeatherDb};
pub use error::{Error, StoreResult};
pub use record::{Location, Record, Stored, WeatherReading};
pub use schema::{Column, LocationColumn, Table, WeatherColumn};
pub use value::{RowId, ValueMap};
