//! CSV-backed trip log (車代ログ)
//!
//! The log is append-only: submissions add rows at the end and never
//! rewrite existing ones. The two exceptions are toll-cost
//! reconciliation and explicit deletes, which rewrite the file with
//! only the matched rows changed or removed.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::model::{Amount, TollUsage, TripRecord, PENDING_NOTE};
use crate::domain::repository::TripLogRepository;
use crate::domain::service::{calculate_fare, FareInput};
use crate::error::{Error, Result};

/// Log header: 日付,名前,基本,金額,高速道路,高速代,片道,バッチID,備考
pub(crate) const HEADERS: [&str; 9] = [
    "日付",
    "名前",
    "基本",
    "金額",
    "高速道路",
    "高速代",
    "片道",
    "バッチID",
    "備考",
];

/// File-based trip log repository (CSV)
pub struct CsvTripLog {
    path: PathBuf,
}

impl CsvTripLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<TripRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            // Rows with an unparseable date are skipped rather than
            // failing the whole read
            if let Some(record) = parse_row(&row) {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Rewrite the whole file. Only reconciliation and deletes go
    /// through here.
    fn rewrite(&self, records: &[TripRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(HEADERS)?;
        for record in records {
            write_row(&mut writer, record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl TripLogRepository for CsvTripLog {
    fn append(&mut self, records: &[TripRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header =
            !self.path.exists() || self.path.metadata().map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);
        if needs_header {
            writer.write_record(HEADERS)?;
        }
        for record in records {
            write_row(&mut writer, record)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn find_all(&self) -> Result<Vec<TripRecord>> {
        self.read_all()
    }

    fn resolve_toll(
        &mut self,
        date: NaiveDate,
        driver_name: &str,
        toll_cost: i64,
    ) -> Result<TripRecord> {
        let mut records = self.read_all()?;
        let key = format!("{} {}", date.format("%Y-%m-%d"), driver_name);

        let matches: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.date == date && r.driver_name == driver_name && r.is_pending())
            .map(|(i, _)| i)
            .collect();
        let idx = match matches.as_slice() {
            [] => return Err(Error::RecordNotFound(key)),
            [idx] => *idx,
            _ => return Err(Error::AmbiguousRecord(key)),
        };

        let record = &mut records[idx];
        let breakdown = calculate_fare(&FareInput {
            base_amount: record.base_amount,
            one_way: record.one_way,
            toll_round_trip: record.toll == TollUsage::RoundTrip,
            toll_one_way: record.toll == TollUsage::OneWay,
            toll_cost: Amount::Known(toll_cost),
        });
        record.toll_cost = Amount::Known(toll_cost);
        record.amount = breakdown.amount;
        if record.notes == PENDING_NOTE {
            record.notes.clear();
        }
        let updated = record.clone();

        self.rewrite(&records)?;
        Ok(updated)
    }

    fn delete_batch(&mut self, batch_id: &str) -> Result<usize> {
        let records = self.read_all()?;
        let kept: Vec<TripRecord> = records
            .iter()
            .filter(|r| r.batch_id != batch_id)
            .cloned()
            .collect();
        let deleted = records.len() - kept.len();
        if deleted > 0 {
            self.rewrite(&kept)?;
        }
        Ok(deleted)
    }

    fn delete_record(&mut self, date: NaiveDate, driver_name: &str) -> Result<usize> {
        let records = self.read_all()?;
        let kept: Vec<TripRecord> = records
            .iter()
            .filter(|r| !(r.date == date && r.driver_name == driver_name))
            .cloned()
            .collect();
        let deleted = records.len() - kept.len();
        if deleted > 0 {
            self.rewrite(&kept)?;
        }
        Ok(deleted)
    }
}

pub(crate) fn write_row<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    record: &TripRecord,
) -> Result<()> {
    writer.write_record([
        record.date.format("%Y-%m-%d").to_string(),
        record.driver_name.clone(),
        record.base_amount.to_string(),
        record.amount.to_string(),
        record.toll.label().to_string(),
        record.toll_cost.to_string(),
        flag_label(record.one_way).to_string(),
        record.batch_id.clone(),
        record.notes.clone(),
    ])?;
    Ok(())
}

fn parse_row(row: &csv::StringRecord) -> Option<TripRecord> {
    let date = parse_date(row.get(0).unwrap_or(""))?;
    // Missing cells default rather than abort the whole read
    Some(TripRecord {
        date,
        driver_name: row.get(1).unwrap_or("").to_string(),
        base_amount: Amount::parse(row.get(2).unwrap_or("0")).known().unwrap_or(0),
        amount: Amount::parse(row.get(3).unwrap_or("")),
        toll: TollUsage::parse(row.get(4).unwrap_or("")),
        toll_cost: Amount::parse(row.get(5).unwrap_or("0")),
        one_way: parse_flag(row.get(6).unwrap_or("")),
        batch_id: row.get(7).unwrap_or("").to_string(),
        notes: row.get(8).unwrap_or("").to_string(),
    })
}

/// Parse common Japanese date formats
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日"];
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s.trim(), fmt).ok())
}

fn flag_label(flag: bool) -> &'static str {
    if flag {
        "あり"
    } else {
        "なし"
    }
}

fn parse_flag(s: &str) -> bool {
    matches!(s.trim(), "あり" | "有" | "○" | "1" | "true")
}
