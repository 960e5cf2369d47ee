#![allow(dead_code)]

use std::sync::Once;

use chrono::NaiveDate;
use sunshine_db::{Location, RowId, WeatherReading};
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

static TRACING: Once = Once::new();

/// Sends log output to the test writer, filtered by RUST_LOG.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer())
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .init();
    });
}

pub fn north_pole() -> Location {
    Location {
        location_setting: "99705".to_owned(),
        city_name: "North Pole".to_owned(),
        coord_lat: 64.7488,
        coord_long: -147.353,
    }
}

pub fn asteroids(loc_key: RowId) -> WeatherReading {
    WeatherReading {
        loc_key,
        date: NaiveDate::from_ymd_opt(2014, 12, 5).unwrap(),
        degrees: 1.1,
        humidity: 1.2,
        pressure: 1.3,
        max_temp: 75,
        min_temp: 65,
        short_desc: "Asteroids".to_owned(),
        wind_speed: 5.5,
        weather_id: 321,
    }
}
