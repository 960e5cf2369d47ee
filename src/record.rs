//! Typed rows for the two tables and their mapping to [`ValueMap`]s.

use chrono::{Datelike, NaiveDate};
use rusqlite::types::Type;

use crate::{
    error::{Error, StoreResult},
    schema::{Column, LocationColumn, Table, WeatherColumn, ID_COLUMN},
    value::{RowId, ValueMap},
};

/// Dates are stored as compact text, e.g. `20141205`.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// `%Y` only writes four bare digits for these years.
const STORABLE_YEARS: core::ops::RangeInclusive<i32> = 0..=9999;

pub trait Record: Sized {
    const TABLE: Table;

    /// Fails when a field has no faithful column representation.
    fn to_values(&self) -> StoreResult<ValueMap>;

    /// Reads the record from a row selected with every column of
    /// [`Record::TABLE`]. Columns are looked up by name.
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// A record together with the row id sqlite assigned it.
#[derive(Clone, Debug, PartialEq)]
pub struct Stored<R> {
    pub id: RowId,
    pub record: R,
}

impl<R: Record> TryFrom<&rusqlite::Row<'_>> for Stored<R> {
    type Error = rusqlite::Error;

    fn try_from(row: &rusqlite::Row<'_>) -> Result<Self, Self::Error> {
        Ok(Self { id: row.get(ID_COLUMN)?, record: R::from_row(row)? })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub location_setting: String,
    pub city_name: String,
    pub coord_lat: f64,
    pub coord_long: f64,
}

impl Record for Location {
    const TABLE: Table = Table::Location;

    fn to_values(&self) -> StoreResult<ValueMap> {
        use LocationColumn::*;
        Ok(ValueMap::new()
            .with(LocationSetting, self.location_setting.clone())
            .with(CityName, self.city_name.clone())
            .with(CoordLat, self.coord_lat)
            .with(CoordLong, self.coord_long))
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        use LocationColumn::*;
        Ok(Self {
            location_setting: row.get(LocationSetting.name())?,
            city_name: row.get(CityName.name())?,
            coord_lat: row.get(CoordLat.name())?,
            coord_long: row.get(CoordLong.name())?,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeatherReading {
    pub loc_key: RowId,
    pub date: NaiveDate,
    pub degrees: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub max_temp: i64,
    pub min_temp: i64,
    pub short_desc: String,
    pub wind_speed: f64,
    pub weather_id: i64,
}

impl Record for WeatherReading {
    const TABLE: Table = Table::Weather;

    fn to_values(&self) -> StoreResult<ValueMap> {
        use WeatherColumn::*;
        if !STORABLE_YEARS.contains(&self.date.year()) {
            return Err(Error::DateOutOfRange(self.date));
        }
        Ok(ValueMap::new()
            .with(LocKey, self.loc_key)
            .with(Date, self.date.format(DATE_FORMAT).to_string())
            .with(Degrees, self.degrees)
            .with(Humidity, self.humidity)
            .with(Pressure, self.pressure)
            .with(MaxTemp, self.max_temp)
            .with(MinTemp, self.min_temp)
            .with(ShortDesc, self.short_desc.clone())
            .with(WindSpeed, self.wind_speed)
            .with(WeatherId, self.weather_id))
    }

    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        use WeatherColumn::*;
        let stmt: &rusqlite::Statement<'_> = row.as_ref();
        let date_idx = stmt.column_index(Date.name())?;
        let date: String = row.get(date_idx)?;
        let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(
            |err| {
                rusqlite::Error::FromSqlConversionFailure(
                    date_idx,
                    Type::Text,
                    Box::new(err),
                )
            },
        )?;
        Ok(Self {
            loc_key: row.get(LocKey.name())?,
            date,
            degrees: row.get(Degrees.name())?,
            humidity: row.get(Humidity.name())?,
            pressure: row.get(Pressure.name())?,
            max_temp: row.get(MaxTemp.name())?,
            min_temp: row.get(MinTemp.name())?,
            short_desc: row.get(ShortDesc.name())?,
            wind_speed: row.get(WindSpeed.name())?,
            weather_id: row.get(WeatherId.name())?,
        })
    }
}
