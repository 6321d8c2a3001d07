//! Submission use case: one form submission becomes one batch of
//! trip records
//!
//! The form is an explicit value passed in, and the result reports
//! per-driver failures instead of aborting the whole batch.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::model::{Amount, TollUsage, TripRecord};
use crate::domain::repository::TripLogRepository;
use crate::domain::service::{base_amount_for_distance, calculate_fare, FareInput};
use crate::error::Result;
use crate::infrastructure::distance::DistanceService;

/// How the base fare is selected for this submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FareSelection {
    /// Flat tier in yen
    Tier(i64),
    /// Derive the tier from the driving distance to a venue
    Destination(String),
}

/// Per-driver options collected from the form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverEntry {
    pub name: String,
    #[serde(default)]
    pub one_way: bool,
    #[serde(default)]
    pub toll_round_trip: bool,
    #[serde(default)]
    pub toll_one_way: bool,
    /// Reported toll cost; Pending when not yet known
    pub toll_cost: Amount,
    /// Per-driver venue override of the form-level selection
    #[serde(default)]
    pub destination: Option<String>,
}

/// One complete form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub date: NaiveDate,
    pub fare: FareSelection,
    pub drivers: Vec<DriverEntry>,
}

/// A driver whose fare could not be computed (e.g. distance lookup
/// failed). The rest of the batch proceeds; this driver can be
/// resubmitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverFailure {
    pub driver_name: String,
    pub reason: String,
}

/// Outcome of one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub batch_id: String,
    pub records: Vec<TripRecord>,
    pub failures: Vec<DriverFailure>,
}

/// Submit a form, appending one record per driver under a fresh batch
/// id.
pub fn submit(
    form: &SubmissionForm,
    repo: &mut dyn TripLogRepository,
    distance: Option<&dyn DistanceService>,
) -> Result<SubmissionOutcome> {
    let batch_id = Local::now().format("%Y%m%d%H%M%S").to_string();
    submit_with_batch_id(form, repo, distance, &batch_id)
}

/// Submission with a caller-supplied batch id.
pub fn submit_with_batch_id(
    form: &SubmissionForm,
    repo: &mut dyn TripLogRepository,
    distance: Option<&dyn DistanceService>,
    batch_id: &str,
) -> Result<SubmissionOutcome> {
    let mut records = Vec::new();
    let mut failures = Vec::new();

    for entry in &form.drivers {
        let base_amount = match resolve_base_amount(&form.fare, entry, distance) {
            Ok(base) => base,
            Err(reason) => {
                failures.push(DriverFailure {
                    driver_name: entry.name.clone(),
                    reason,
                });
                continue;
            }
        };

        let toll = TollUsage::from_flags(entry.toll_round_trip, entry.toll_one_way);
        let breakdown = calculate_fare(&FareInput {
            base_amount,
            one_way: entry.one_way,
            toll_round_trip: entry.toll_round_trip,
            toll_one_way: entry.toll_one_way,
            toll_cost: entry.toll_cost,
        });

        records.push(TripRecord {
            date: form.date,
            driver_name: entry.name.clone(),
            base_amount,
            amount: breakdown.amount,
            toll,
            // Ignored unless a toll flag is set
            toll_cost: if toll.is_used() {
                entry.toll_cost
            } else {
                Amount::Known(0)
            },
            one_way: entry.one_way,
            batch_id: batch_id.to_string(),
            notes: breakdown.note.unwrap_or_default(),
        });
    }

    if !records.is_empty() {
        repo.append(&records)?;
    }

    Ok(SubmissionOutcome {
        batch_id: batch_id.to_string(),
        records,
        failures,
    })
}

fn resolve_base_amount(
    fare: &FareSelection,
    entry: &DriverEntry,
    distance: Option<&dyn DistanceService>,
) -> std::result::Result<i64, String> {
    let destination = entry.destination.as_deref().or(match fare {
        FareSelection::Destination(d) => Some(d.as_str()),
        FareSelection::Tier(_) => None,
    });

    if let Some(dest) = destination {
        let service = distance.ok_or_else(|| "距離テーブルが設定されていません".to_string())?;
        let meters = service.distance_meters(dest).map_err(|e| e.to_string())?;
        return Ok(base_amount_for_distance(meters / 1000.0));
    }
    match fare {
        FareSelection::Tier(tier) => Ok(*tier),
        // Destination selection always yields Some above
        FareSelection::Destination(d) => {
            Err(format!("目的地 {} の距離を解決できませんでした", d))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::distance::DistanceError;
    use crate::infrastructure::CsvTripLog;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    struct FixedDistance;

    impl DistanceService for FixedDistance {
        fn distance_meters(&self, destination: &str) -> std::result::Result<f64, DistanceError> {
            match destination {
                "近場" => Ok(4200.0),
                "遠方" => Ok(23500.0),
                other => Err(DistanceError::Unresolvable(other.to_string())),
            }
        }
    }

    fn entry(name: &str) -> DriverEntry {
        DriverEntry {
            name: name.to_string(),
            one_way: false,
            toll_round_trip: false,
            toll_one_way: false,
            toll_cost: Amount::Known(0),
            destination: None,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 12).unwrap()
    }

    #[test]
    fn test_submit_appends_batch() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Tier(600),
            drivers: vec![entry("平野"), entry("山田")],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, None, "b1").unwrap();

        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.failures.is_empty());
        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.batch_id == "b1"));
        assert!(all.iter().all(|r| r.amount == Amount::Known(600)));
    }

    #[test]
    fn test_submit_distance_based_fare() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Destination("遠方".to_string()),
            drivers: vec![entry("平野")],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, Some(&FixedDistance), "b1").unwrap();

        // 23.5km → 800 yen tier
        assert_eq!(outcome.records[0].base_amount, 800);
        assert_eq!(outcome.records[0].amount, Amount::Known(800));
    }

    #[test]
    fn test_distance_failure_is_per_driver() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let mut failing = entry("山田");
        failing.destination = Some("未知の場所".to_string());
        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Destination("近場".to_string()),
            drivers: vec![entry("平野"), failing],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, Some(&FixedDistance), "b1").unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].driver_name, "平野");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].driver_name, "山田");
        // Only the successful record is persisted
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_distance_table_fails_driver_not_batch() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Destination("近場".to_string()),
            drivers: vec![entry("平野")],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, None, "b1").unwrap();
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.failures.len(), 1);
    }

    #[test]
    fn test_pending_toll_flagged_in_notes() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let mut e = entry("平野");
        e.toll_round_trip = true;
        e.toll_cost = Amount::Pending;
        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Tier(600),
            drivers: vec![e],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, None, "b1").unwrap();

        let record = &outcome.records[0];
        assert!(record.is_pending());
        assert_eq!(record.notes, crate::domain::model::PENDING_NOTE);
        assert_eq!(record.toll, TollUsage::RoundTrip);
    }

    #[test]
    fn test_toll_cost_zeroed_without_toll_flag() {
        let dir = tempdir().unwrap();
        let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

        let mut e = entry("平野");
        e.toll_cost = Amount::Known(1000);
        let form = SubmissionForm {
            date: date(),
            fare: FareSelection::Tier(400),
            drivers: vec![e],
        };
        let outcome = submit_with_batch_id(&form, &mut repo, None, "b1").unwrap();

        assert_eq!(outcome.records[0].toll_cost, Amount::Known(0));
        assert_eq!(outcome.records[0].amount, Amount::Known(400));
    }
}
