//! Driving-distance lookup for distance-based fares
//!
//! The distance from the home ground to a venue comes from a local
//! distance table CSV (目的地,距離m). A lookup failure is scoped to
//! the one driver whose fare needed it, never the whole submission.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistanceError {
    #[error("Failed to read distance table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse distance table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Destination not found: {0}")]
    Unresolvable(String),

    #[error("Invalid distance value for {destination}: {value}")]
    InvalidDistance { destination: String, value: String },
}

/// Driving distance provider
pub trait DistanceService {
    /// Driving distance in meters from the origin to the destination
    fn distance_meters(&self, destination: &str) -> std::result::Result<f64, DistanceError>;
}

/// Distance table loaded from a local CSV file
pub struct CsvDistanceTable {
    origin: String,
    table: HashMap<String, f64>,
}

impl CsvDistanceTable {
    /// Load the table. Expected header: 目的地,距離m
    pub fn load<P: AsRef<Path>>(path: P, origin: &str) -> std::result::Result<Self, DistanceError> {
        let mut file = File::open(path)?;
        let mut content = String::new();
        file.read_to_string(&mut content)?;
        Self::from_str_table(&content, origin)
    }

    fn from_str_table(content: &str, origin: &str) -> std::result::Result<Self, DistanceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut table = HashMap::new();
        for result in reader.records() {
            let row = result?;
            let destination = row.get(0).unwrap_or("").to_string();
            if destination.is_empty() {
                continue;
            }
            let value = row.get(1).unwrap_or("").replace(',', "");
            let meters: f64 = value
                .parse()
                .map_err(|_| DistanceError::InvalidDistance {
                    destination: destination.clone(),
                    value,
                })?;
            table.insert(destination, meters);
        }

        Ok(Self {
            origin: origin.to_string(),
            table,
        })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl DistanceService for CsvDistanceTable {
    fn distance_meters(&self, destination: &str) -> std::result::Result<f64, DistanceError> {
        self.table
            .get(destination)
            .copied()
            .ok_or_else(|| DistanceError::Unresolvable(destination.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE_CSV: &str = "目的地,距離m\n\
                             市民グラウンド,4200\n\
                             県営競技場,23500\n";

    #[test]
    fn test_lookup() {
        let table = CsvDistanceTable::from_str_table(TABLE_CSV, "ホーム").unwrap();
        assert_eq!(table.distance_meters("市民グラウンド").unwrap(), 4200.0);
        assert_eq!(table.distance_meters("県営競技場").unwrap(), 23500.0);
    }

    #[test]
    fn test_unresolvable_destination() {
        let table = CsvDistanceTable::from_str_table(TABLE_CSV, "ホーム").unwrap();
        let result = table.distance_meters("どこか");
        assert!(matches!(result, Err(DistanceError::Unresolvable(_))));
    }

    #[test]
    fn test_invalid_distance_value() {
        let result = CsvDistanceTable::from_str_table("目的地,距離m\nどこか,遠い\n", "ホーム");
        assert!(matches!(
            result,
            Err(DistanceError::InvalidDistance { .. })
        ));
    }
}
