//! Repository trait definitions for the trip log

use chrono::NaiveDate;

use crate::domain::model::TripRecord;
use crate::error::Result;

/// Append-only trip log with a reconciliation-update path.
///
/// Submissions only ever append; the single mutating operations are
/// toll-cost reconciliation and explicit administrative deletes, each
/// of which must touch exactly the matched rows and no others.
pub trait TripLogRepository {
    /// Append one submission's records to the log
    fn append(&mut self, records: &[TripRecord]) -> Result<()>;

    /// Read the whole log
    fn find_all(&self) -> Result<Vec<TripRecord>>;

    /// Records still awaiting toll-cost reconciliation
    fn find_pending(&self) -> Result<Vec<TripRecord>> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.is_pending())
            .collect())
    }

    /// Resolve the outstanding toll cost of exactly one pending
    /// record, recomputing its amount from the stored trip flags.
    /// Returns the updated record.
    fn resolve_toll(
        &mut self,
        date: NaiveDate,
        driver_name: &str,
        toll_cost: i64,
    ) -> Result<TripRecord>;

    /// Delete every record of one submission batch (bulk undo).
    /// Returns the number of deleted records.
    fn delete_batch(&mut self, batch_id: &str) -> Result<usize>;

    /// Administrative delete of a single driver's records on a date.
    /// Returns the number of deleted records.
    fn delete_record(&mut self, date: NaiveDate, driver_name: &str) -> Result<usize>;
}
