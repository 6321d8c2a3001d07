//! Fare calculation for a single driver's trip
//!
//! The fare policy: start from a flat tier (or a distance-derived
//! tier), halve for a one-way drive, then apply toll adjustments. A
//! round-trip toll replaces the base fare entirely; a one-way toll is
//! added to half the base fare. An unreported toll cost leaves the
//! whole amount 未定 until reconciled.

use serde::{Deserialize, Serialize};

use crate::domain::model::{Amount, TollUsage, PENDING_NOTE};

/// Selectable flat reimbursement tiers in yen
pub const FARE_TIERS: [i64; 6] = [200, 400, 600, 800, 1000, 1200];

/// Trip parameters for one driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareInput {
    /// Flat tier or distance-derived base fare in yen
    pub base_amount: i64,
    /// Driver only drove one way
    pub one_way: bool,
    /// Toll road used for the whole trip
    pub toll_round_trip: bool,
    /// Toll road used for half the trip
    pub toll_one_way: bool,
    /// Reported toll cost, or Pending
    pub toll_cost: Amount,
}

/// Computed reimbursement with the flags that shaped it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FareBreakdown {
    pub amount: Amount,
    pub highway_used: bool,
    pub one_way: bool,
    pub note: Option<String>,
}

/// Compute one driver's reimbursement.
///
/// Precedence: a round-trip toll supersedes both the base fare and the
/// one-way halving; otherwise a one-way toll adds to half the base
/// fare. Pending toll cost makes the amount Pending in either toll
/// branch.
pub fn calculate_fare(input: &FareInput) -> FareBreakdown {
    let toll = TollUsage::from_flags(input.toll_round_trip, input.toll_one_way);

    let mut amount = Amount::Known(input.base_amount);
    if input.one_way {
        amount = amount.halved();
    }

    match toll {
        TollUsage::RoundTrip => {
            amount = input.toll_cost;
        }
        TollUsage::OneWay => {
            amount = Amount::Known(input.base_amount / 2).add(input.toll_cost);
        }
        TollUsage::None => {}
    }

    let note = if amount.is_pending() {
        Some(PENDING_NOTE.to_string())
    } else {
        None
    };

    FareBreakdown {
        amount,
        highway_used: toll.is_used(),
        one_way: input.one_way,
        note,
    }
}

/// Map a driving distance to a flat base fare (half-open upper bounds)
pub fn base_amount_for_distance(distance_km: f64) -> i64 {
    match distance_km {
        d if d < 5.0 => 200,
        d if d < 10.0 => 400,
        d if d < 20.0 => 600,
        d if d < 30.0 => 800,
        d if d < 40.0 => 1000,
        _ => 1200,
    }
}
