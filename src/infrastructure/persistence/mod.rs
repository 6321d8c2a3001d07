//! Persistence implementations of the domain repositories

pub mod csv_trip_log;

pub use csv_trip_log::{parse_date, CsvTripLog};
