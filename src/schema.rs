//! Table and column definitions for the weather database.
//!
//! Columns are enums rather than bare strings so value maps and projections
//! can only name columns that exist on the table they target.

/// Name of the auto-assigned row identifier column on every table.
pub const ID_COLUMN: &str = "_id";

/// Default database file name.
pub const DATABASE_NAME: &str = "weather.db";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Location,
    Weather,
}

impl Table {
    pub const ALL: [Table; 2] = [Table::Location, Table::Weather];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Table::Location => "location",
            Table::Weather => "weather",
        }
    }

    /// All column names in declaration order, `_id` first.
    #[must_use]
    pub fn column_names(self) -> Vec<&'static str> {
        let mut names = vec![ID_COLUMN];
        match self {
            Table::Location => {
                names.extend(LocationColumn::ALL.iter().map(|c| c.name()))
            }
            Table::Weather => {
                names.extend(WeatherColumn::ALL.iter().map(|c| c.name()))
            }
        }
        names
    }

    /// True if `column` names a column of this table, `_id` included.
    #[must_use]
    pub fn has_column(self, column: &str) -> bool {
        self.column_names().contains(&column)
    }
}

impl core::fmt::Display for Table {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Storage class a column is declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Text,
}

impl SqlType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Real => "REAL",
            SqlType::Text => "TEXT",
        }
    }
}

/// A typed column belonging to exactly one table.
pub trait Column: Copy + core::fmt::Debug {
    fn table(self) -> Table;
    fn name(self) -> &'static str;
    fn sql_type(self) -> SqlType;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocationColumn {
    LocationSetting,
    CityName,
    CoordLat,
    CoordLong,
}

impl LocationColumn {
    pub const ALL: [LocationColumn; 4] = [
        LocationColumn::LocationSetting,
        LocationColumn::CityName,
        LocationColumn::CoordLat,
        LocationColumn::CoordLong,
    ];
}

impl Column for LocationColumn {
    fn table(self) -> Table {
        Table::Location
    }

    fn name(self) -> &'static str {
        match self {
            LocationColumn::LocationSetting => "location_setting",
            LocationColumn::CityName => "city_name",
            LocationColumn::CoordLat => "coord_lat",
            LocationColumn::CoordLong => "coord_long",
        }
    }

    fn sql_type(self) -> SqlType {
        match self {
            LocationColumn::LocationSetting | LocationColumn::CityName => {
                SqlType::Text
            }
            LocationColumn::CoordLat | LocationColumn::CoordLong => {
                SqlType::Real
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeatherColumn {
    LocKey,
    Date,
    Degrees,
    Humidity,
    Pressure,
    MaxTemp,
    MinTemp,
    ShortDesc,
    WindSpeed,
    WeatherId,
}

impl WeatherColumn {
    pub const ALL: [WeatherColumn; 10] = [
        WeatherColumn::LocKey,
        WeatherColumn::Date,
        WeatherColumn::Degrees,
        WeatherColumn::Humidity,
        WeatherColumn::Pressure,
        WeatherColumn::MaxTemp,
        WeatherColumn::MinTemp,
        WeatherColumn::ShortDesc,
        WeatherColumn::WindSpeed,
        WeatherColumn::WeatherId,
    ];
}

impl Column for WeatherColumn {
    fn table(self) -> Table {
        Table::Weather
    }

    fn name(self) -> &'static str {
        match self {
            WeatherColumn::LocKey => "loc_key",
            WeatherColumn::Date => "date",
            WeatherColumn::Degrees => "degrees",
            WeatherColumn::Humidity => "humidity",
            WeatherColumn::Pressure => "pressure",
            WeatherColumn::MaxTemp => "max_temp",
            WeatherColumn::MinTemp => "min_temp",
            WeatherColumn::ShortDesc => "short_desc",
            WeatherColumn::WindSpeed => "wind_speed",
            WeatherColumn::WeatherId => "weather_id",
        }
    }

    fn sql_type(self) -> SqlType {
        use WeatherColumn::*;
        match self {
            LocKey | MaxTemp | MinTemp | WeatherId => SqlType::Integer,
            Date | ShortDesc => SqlType::Text,
            Degrees | Humidity | Pressure | WindSpeed => SqlType::Real,
        }
    }
}

// location_setting is the natural key of a place, so it is unique.
// weather.loc_key must point at an existing location row; the check only
// fires while PRAGMA foreign_keys is on (see DbConfig).
pub(crate) fn create_location_table_sql() -> String {
    format!(
        r#"
        CREATE TABLE {table} (
            {id} INTEGER PRIMARY KEY AUTOINCREMENT,
            {setting} {setting_ty} UNIQUE NOT NULL,
            {city} {city_ty} NOT NULL,
            {lat} {lat_ty} NOT NULL,
            {long} {long_ty} NOT NULL
        )"#,
        table = Table::Location,
        id = ID_COLUMN,
        setting = LocationColumn::LocationSetting.name(),
        setting_ty = LocationColumn::LocationSetting.sql_type().as_str(),
        city = LocationColumn::CityName.name(),
        city_ty = LocationColumn::CityName.sql_type().as_str(),
        lat = LocationColumn::CoordLat.name(),
        lat_ty = LocationColumn::CoordLat.sql_type().as_str(),
        long = LocationColumn::CoordLong.name(),
        long_ty = LocationColumn::CoordLong.sql_type().as_str(),
    )
}

pub(crate) fn create_weather_table_sql() -> String {
    let columns = WeatherColumn::ALL
        .iter()
        .map(|c| format!("{} {} NOT NULL", c.name(), c.sql_type().as_str()))
        .collect::<Vec<_>>()
        .join(",\n            ");
    format!(
        r#"
        CREATE TABLE {table} (
            {id} INTEGER PRIMARY KEY AUTOINCREMENT,
            {columns},
            FOREIGN KEY ({loc_key}) REFERENCES {location} ({id})
        )"#,
        table = Table::Weather,
        id = ID_COLUMN,
        loc_key = WeatherColumn::LocKey.name(),
        location = Table::Location,
    )
}
