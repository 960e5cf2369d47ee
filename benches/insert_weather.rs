use std::ops::Deref;
use std::time::Duration;

use chrono::NaiveDate;
use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, Criterion,
};
use tempfile::TempDir;

use sunshine_db::{
    db::config::JournalMode, DbConfig, Location, Query, RowId, Table,
    WeatherDb, WeatherReading,
};

struct DiskDb {
    db: WeatherDb,
    // Held so the directory outlives the connection.
    _dir: TempDir,
}

impl Deref for DiskDb {
    type Target = WeatherDb;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

fn new_disk_db() -> DiskDb {
    let dir = tempfile::tempdir().unwrap();
    let config = DbConfig::at(dir.path().join("bench.db"))
        .with_journal_mode(JournalMode::Wal);
    DiskDb { db: WeatherDb::open(&config).unwrap(), _dir: dir }
}

fn with_location(db: &WeatherDb) -> RowId {
    db.insert_record(&Location {
        location_setting: "99705".to_owned(),
        city_name: "North Pole".to_owned(),
        coord_lat: 64.7488,
        coord_long: -147.353,
    })
    .unwrap()
}

fn insert_a_reading(db: &WeatherDb, loc_key: RowId) {
    let reading = WeatherReading {
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
    };
    db.insert_record(black_box(&reading)).unwrap();
}

pub fn once_to_memory(c: &mut Criterion) {
    c.bench_function("insert_reading_once_to_memory", |b| {
        b.iter_batched(
            || {
                let db = WeatherDb::open_in_memory().unwrap();
                let loc = with_location(&db);
                (db, loc)
            },
            |(db, loc)| insert_a_reading(&db, loc),
            BatchSize::SmallInput,
        )
    });
}

pub fn many_to_memory(c: &mut Criterion) {
    let db = WeatherDb::open_in_memory().unwrap();
    let loc = with_location(&db);
    c.bench_function("insert_many_readings_to_memory", |b| {
        b.iter(|| insert_a_reading(&db, loc))
    });
}

pub fn many_to_disk(c: &mut Criterion) {
    let db = new_disk_db();
    let loc = with_location(&db);
    c.bench_function("insert_many_readings_to_disk", |b| {
        b.iter(|| insert_a_reading(&db, loc))
    });
}

pub fn fetch_by_location(c: &mut Criterion) {
    let db = WeatherDb::open_in_memory().unwrap();
    let loc = with_location(&db);
    for _ in 0..1_000 {
        insert_a_reading(&db, loc);
    }
    let query = Query::new(Table::Weather)
        .filter("loc_key = ?", [loc])
        .order_by("date DESC")
        .limit(100);
    c.bench_function("fetch_100_readings_from_memory", |b| {
        b.iter(|| {
            let rows = db.fetch::<WeatherReading>(black_box(&query)).unwrap();
            assert_eq!(rows.len(), 100);
        })
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default()
        .measurement_time(Duration::from_secs_f32(10.0));
    targets = once_to_memory,
        many_to_memory,
        many_to_disk,
        fetch_by_location
);
criterion_main!(benches);
