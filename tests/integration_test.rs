//! Integration tests for the kurumadai submission and assignment flow

use std::io::Write;

use chrono::NaiveDate;
use tempfile::tempdir;

use kurumadai::app::{submit_with_batch_id, DriverEntry, FareSelection, SubmissionForm};
use kurumadai::domain::model::Amount;
use kurumadai::domain::repository::TripLogRepository;
use kurumadai::domain::service::{assign_seats, summarize, AssignmentOptions};
use kurumadai::export::{export_to_csv, export_to_excel};
use kurumadai::infrastructure::{load_roster, CsvTripLog};

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

fn game_date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Submit, reconcile a pending toll, summarize, and undo a batch
/// against one log file.
#[test]
fn test_full_reimbursement_flow() {
    let dir = tempdir().unwrap();
    let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

    // April 12th: two drivers, one with an unreported round-trip toll
    let mut hirano = entry("平野");
    hirano.toll_round_trip = true;
    hirano.toll_cost = Amount::Pending;
    let form = SubmissionForm {
        date: game_date(4, 12),
        fare: FareSelection::Tier(600),
        drivers: vec![hirano, entry("山田")],
    };
    let outcome = submit_with_batch_id(&form, &mut repo, None, "20250412-1").unwrap();
    assert_eq!(outcome.records.len(), 2);

    // April 26th: one-way drive
    let mut yamada = entry("山田");
    yamada.one_way = true;
    let form = SubmissionForm {
        date: game_date(4, 26),
        fare: FareSelection::Tier(800),
        drivers: vec![yamada],
    };
    submit_with_batch_id(&form, &mut repo, None, "20250426-1").unwrap();

    // The pending toll blocks 平野's month total but not 山田's
    let summary = summarize(&repo.find_all().unwrap());
    assert_eq!(summary.rows.len(), 1);
    assert_eq!(summary.rows[0].total_for("平野"), Amount::Pending);
    assert_eq!(summary.rows[0].total_for("山田"), Amount::Known(1000));

    let pending = repo.find_pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].driver_name, "平野");

    // Reconcile: the round-trip toll replaces the base fare
    let updated = repo.resolve_toll(game_date(4, 12), "平野", 1400).unwrap();
    assert_eq!(updated.amount, Amount::Known(1400));
    assert!(repo.find_pending().unwrap().is_empty());

    let summary = summarize(&repo.find_all().unwrap());
    assert_eq!(summary.rows[0].total_for("平野"), Amount::Known(1400));
    assert_eq!(summary.grand_total_for("山田"), Amount::Known(1000));

    // Bulk undo of the first submission leaves only the April 26th record
    let deleted = repo.delete_batch("20250412-1").unwrap();
    assert_eq!(deleted, 2);
    let remaining = repo.find_all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].batch_id, "20250426-1");
}

/// Roster file to seat assignment, end to end.
#[test]
fn test_roster_to_assignment() {
    let dir = tempdir().unwrap();
    let roster_path = dir.path().join("roster.csv");
    let mut file = std::fs::File::create(&roster_path).unwrap();
    file.write_all(
        "名前,学年,乗車可能人数,保護者\n\
         山田太,5,,山田\n\
         鈴木一,3,,鈴木\n\
         佐藤二,4,,\n\
         田中三,4,,\n\
         高橋四,6,,\n\
         山田,,4,\n\
         鈴木,,2,\n"
            .as_bytes(),
    )
    .unwrap();

    let roster = load_roster(&roster_path).unwrap();
    assert_eq!(roster.participants.len(), 5);
    assert_eq!(roster.drivers.len(), 2);

    let assignment = assign_seats(
        &roster.participants,
        &roster.drivers,
        &AssignmentOptions {
            max_vehicles: None,
            seed: Some(11),
        },
    );

    // Everyone seated (6 seats, 5 riders), children with their parents
    assert_eq!(assignment.assigned_count(), 5);
    assert!(assignment.unassigned.is_empty());
    for vehicle in &assignment.vehicles {
        assert!(vehicle.passengers.len() as u32 <= vehicle.driver.capacity);
    }
    let find = |driver: &str, passenger: &str| {
        assignment
            .vehicles
            .iter()
            .find(|v| v.driver.name == driver)
            .map(|v| v.passengers.iter().any(|p| p.name == passenger))
            .unwrap_or(false)
    };
    assert!(find("山田", "山田太"));
    assert!(find("鈴木", "鈴木一"));
}

/// Exported files reflect the log contents.
#[test]
fn test_export_files() {
    let dir = tempdir().unwrap();
    let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

    let form = SubmissionForm {
        date: game_date(5, 10),
        fare: FareSelection::Tier(400),
        drivers: vec![entry("平野")],
    };
    submit_with_batch_id(&form, &mut repo, None, "b1").unwrap();
    let records = repo.find_all().unwrap();

    let csv_path = dir.path().join("export.csv");
    export_to_csv(&records, &csv_path).unwrap();
    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.contains("2025-05-10,平野,400,400"));

    let xlsx_path = dir.path().join("export.xlsx");
    export_to_excel(&records, &summarize(&records), &xlsx_path).unwrap();
    assert!(xlsx_path.exists());
    assert!(xlsx_path.metadata().unwrap().len() > 0);
}

/// A resubmission after a per-driver distance failure appends to the
/// same log without touching earlier rows.
#[test]
fn test_retry_after_failure_preserves_log() {
    use kurumadai::infrastructure::distance::{DistanceError, DistanceService};

    struct Flaky {
        available: bool,
    }

    impl DistanceService for Flaky {
        fn distance_meters(&self, destination: &str) -> Result<f64, DistanceError> {
            if self.available {
                Ok(12000.0)
            } else {
                Err(DistanceError::Unresolvable(destination.to_string()))
            }
        }
    }

    let dir = tempdir().unwrap();
    let mut repo = CsvTripLog::new(dir.path().join("trips.csv"));

    let form = SubmissionForm {
        date: game_date(6, 7),
        fare: FareSelection::Destination("県営競技場".to_string()),
        drivers: vec![entry("平野")],
    };

    let down = Flaky { available: false };
    let outcome = submit_with_batch_id(&form, &mut repo, Some(&down), "b1").unwrap();
    assert_eq!(outcome.failures.len(), 1);
    assert!(repo.find_all().unwrap().is_empty());

    let up = Flaky { available: true };
    let outcome = submit_with_batch_id(&form, &mut repo, Some(&up), "b2").unwrap();
    assert!(outcome.failures.is_empty());
    // 12km → 600 yen tier
    assert_eq!(outcome.records[0].amount, Amount::Known(600));
    assert_eq!(repo.find_all().unwrap().len(), 1);
}
