//! Export of the trip log to downloadable files

pub mod excel;

pub use excel::export_to_excel;

use std::fs::File;
use std::path::Path;

use crate::domain::model::TripRecord;
use crate::error::Result;
use crate::infrastructure::persistence::csv_trip_log;

/// Write the trip log to a standalone CSV file
pub fn export_to_csv(records: &[TripRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(csv_trip_log::HEADERS)?;
    for record in records {
        csv_trip_log::write_row(&mut writer, record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Amount, TollUsage};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    #[test]
    fn test_export_to_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let records = vec![TripRecord {
            date: NaiveDate::from_ymd_opt(2025, 4, 12).unwrap(),
            driver_name: "平野".to_string(),
            base_amount: 600,
            amount: Amount::Known(600),
            toll: TollUsage::None,
            toll_cost: Amount::Known(0),
            one_way: false,
            batch_id: "b1".to_string(),
            notes: String::new(),
        }];

        export_to_csv(&records, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("日付,名前,基本,金額"));
        assert!(content.contains("2025-04-12,平野,600,600"));
    }
}
