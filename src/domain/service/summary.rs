//! Monthly reimbursement summary (月ごとの集計)
//!
//! Pivot of the trip log: one row per year-month, one column per
//! driver. A cell or row total containing any unreconciled record is
//! reported 未定, not zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::model::{Amount, TripRecord};

/// One pivot row: a year-month and its per-driver totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthRow {
    /// Year-month key, e.g. "2025-04"
    pub month: String,
    /// Driver name → total for the month
    pub totals: BTreeMap<String, Amount>,
}

impl MonthRow {
    /// Total for one driver; zero when the driver has no record that
    /// month
    pub fn total_for(&self, name: &str) -> Amount {
        self.totals.get(name).copied().unwrap_or(Amount::Known(0))
    }

    /// Row total across all drivers, Pending-propagating
    pub fn row_total(&self) -> Amount {
        Amount::sum(self.totals.values().copied())
    }
}

/// Pivoted monthly summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Driver names appearing in the log, sorted
    pub names: Vec<String>,
    /// Rows in ascending month order
    pub rows: Vec<MonthRow>,
}

impl MonthlySummary {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grand total per driver across all months
    pub fn grand_total_for(&self, name: &str) -> Amount {
        Amount::sum(self.rows.iter().map(|r| r.total_for(name)))
    }
}

/// Build the monthly pivot from the trip log.
pub fn summarize(records: &[TripRecord]) -> MonthlySummary {
    let mut names: Vec<String> = records.iter().map(|r| r.driver_name.clone()).collect();
    names.sort();
    names.dedup();

    let mut by_month: BTreeMap<String, BTreeMap<String, Amount>> = BTreeMap::new();
    for record in records {
        let cell = by_month
            .entry(record.month_key())
            .or_default()
            .entry(record.driver_name.clone())
            .or_insert(Amount::Known(0));
        *cell = cell.add(record.amount);
    }

    let rows = by_month
        .into_iter()
        .map(|(month, totals)| MonthRow { month, totals })
        .collect();

    MonthlySummary { names, rows }
}
