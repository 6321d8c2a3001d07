//! Trip reimbursement records (車代エントリ)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::amount::Amount;

/// Note text flagging a record whose toll cost is still outstanding
pub const PENDING_NOTE: &str = "高速代未定";

/// Toll road usage for a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TollUsage {
    /// No toll road
    None,
    /// Toll road both ways; toll cost replaces the base fare
    RoundTrip,
    /// Toll road one way; toll cost is added to half the base fare
    OneWay,
}

impl TollUsage {
    /// Resolve the two form checkboxes. Round trip wins when both are
    /// checked.
    pub fn from_flags(toll_round_trip: bool, toll_one_way: bool) -> Self {
        if toll_round_trip {
            TollUsage::RoundTrip
        } else if toll_one_way {
            TollUsage::OneWay
        } else {
            TollUsage::None
        }
    }

    pub fn is_used(&self) -> bool {
        !matches!(self, TollUsage::None)
    }

    /// Label as written to the 高速道路 column
    pub fn label(&self) -> &'static str {
        match self {
            TollUsage::None => "なし",
            TollUsage::RoundTrip => "往復",
            TollUsage::OneWay => "片道",
        }
    }

    /// Parse a 高速道路 cell. Legacy logs wrote あり for round-trip
    /// usage.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "往復" | "あり" | "1" | "true" => TollUsage::RoundTrip,
            "片道" => TollUsage::OneWay,
            _ => TollUsage::None,
        }
    }
}

/// One driver's reimbursement entry for one away game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripRecord {
    /// Event date (試合日)
    pub date: NaiveDate,
    /// Driver name; drivers are not a separate persisted entity here
    pub driver_name: String,
    /// Flat tier or distance-derived base fare in yen
    pub base_amount: i64,
    /// Computed reimbursement; Pending while the toll cost is unknown
    pub amount: Amount,
    /// Toll road usage for this trip
    pub toll: TollUsage,
    /// Reported toll cost; Pending until the driver reports it
    pub toll_cost: Amount,
    /// Whether the driver only drove one way
    pub one_way: bool,
    /// Submission batch tag (timestamp), used for bulk undo
    pub batch_id: String,
    /// Free-text annotation; carries the pending marker
    pub notes: String,
}

impl TripRecord {
    /// Whether this record still awaits toll-cost reconciliation
    pub fn is_pending(&self) -> bool {
        self.amount.is_pending()
    }

    /// Year-month grouping key for the monthly summary
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}
