//! Roster CSV loader (名簿)
//!
//! Handles CP932 (Shift-JIS) encoded CSV files commonly exported from
//! Japanese spreadsheet tools; UTF-8 files are accepted as-is.
//!
//! Expected CSV header:
//! 名前,学年,乗車可能人数,保護者
//!
//! One row per person. A row with 乗車可能人数 > 0 contributes a
//! driver; a row with a 学年 contributes a participant. Only 名前 is
//! required; every other column defaults when missing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::SHIFT_JIS;

use crate::domain::model::{Driver, Participant, Roster};
use crate::error::{Error, Result};

/// Load the roster from a CSV file.
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Roster> {
    let mut file = File::open(path.as_ref())
        .map_err(|e| Error::Roster(format!("{}: {}", path.as_ref().display(), e)))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    load_roster_from_bytes(&bytes)
}

fn load_roster_from_bytes(bytes: &[u8]) -> Result<Roster> {
    let decoded = match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, had_errors) = SHIFT_JIS.decode(bytes);
            if had_errors {
                eprintln!("Warning: Some characters could not be decoded from CP932");
            }
            decoded.into_owned()
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(decoded.as_bytes());

    let headers = reader.headers()?.clone();
    let name_col = find_column(&headers, &["名前", "氏名", "name"])
        .ok_or_else(|| Error::Roster("名前 column is required".to_string()))?;
    let grade_col = find_column(&headers, &["学年", "grade"]);
    let capacity_col = find_column(&headers, &["乗車可能人数", "定員", "capacity"]);
    let parent_col = find_column(&headers, &["保護者", "parent"]);

    let mut roster = Roster::default();
    for result in reader.records() {
        let row = result?;
        let name = row.get(name_col).unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let grade = grade_col
            .and_then(|c| row.get(c))
            .and_then(|s| parse_u32(s))
            .unwrap_or(0);
        let capacity = capacity_col
            .and_then(|c| row.get(c))
            .and_then(|s| parse_u32(s))
            .unwrap_or(0);
        let parent = parent_col
            .and_then(|c| row.get(c))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        if capacity > 0 {
            roster.drivers.push(Driver {
                name: name.clone(),
                capacity,
            });
        }
        if grade > 0 {
            roster.participants.push(Participant {
                name,
                grade,
                assigned_parent: parent,
            });
        }
    }

    Ok(roster)
}

fn find_column(headers: &csv::StringRecord, candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.iter().any(|c| h.eq_ignore_ascii_case(c)))
}

fn parse_u32(s: &str) -> Option<u32> {
    let cleaned = s.trim().replace(',', "");
    cleaned.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROSTER_CSV: &str = "名前,学年,乗車可能人数,保護者\n\
                              山田太,5,,山田\n\
                              鈴木一,3,,鈴木\n\
                              佐藤二,4,,\n\
                              山田,,4,\n\
                              鈴木,,2,\n";

    #[test]
    fn test_load_utf8_roster() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ROSTER_CSV.as_bytes()).unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.participants.len(), 3);
        assert_eq!(roster.drivers.len(), 2);

        let taro = &roster.participants[0];
        assert_eq!(taro.name, "山田太");
        assert_eq!(taro.grade, 5);
        assert_eq!(taro.assigned_parent.as_deref(), Some("山田"));

        let sato = &roster.participants[2];
        assert!(sato.assigned_parent.is_none());

        assert_eq!(roster.drivers[0].name, "山田");
        assert_eq!(roster.drivers[0].capacity, 4);
    }

    #[test]
    fn test_load_cp932_roster() {
        let mut file = NamedTempFile::new().unwrap();
        let (encoded, _, _) = SHIFT_JIS.encode(ROSTER_CSV);
        file.write_all(&encoded).unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.participants.len(), 3);
        assert_eq!(roster.drivers.len(), 2);
        assert_eq!(roster.participants[1].name, "鈴木一");
    }

    #[test]
    fn test_missing_optional_columns_default() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("名前,学年\n山田太,5\n".as_bytes()).unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert_eq!(roster.participants.len(), 1);
        assert!(roster.drivers.is_empty());
        assert!(roster.participants[0].assigned_parent.is_none());
    }

    #[test]
    fn test_missing_name_column_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("学年,定員\n5,4\n".as_bytes()).unwrap();

        let result = load_roster(file.path());
        assert!(matches!(result, Err(Error::Roster(_))));
    }

    #[test]
    fn test_blank_grade_row_is_driver_only() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all("名前,学年,乗車可能人数\n平野,,3\n".as_bytes())
            .unwrap();

        let roster = load_roster(file.path()).unwrap();
        assert!(roster.participants.is_empty());
        assert_eq!(roster.drivers.len(), 1);
    }
}
