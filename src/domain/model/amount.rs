//! Tagged reimbursement amount (確定 or 未定)
//!
//! Log cells hold either an integer or the string 未定. The two states
//! are an explicit enum here, and sums over records propagate Pending
//! instead of silently coercing to zero.

use serde::{Deserialize, Serialize};

/// Label written to CSV cells for an undetermined amount
pub const PENDING_LABEL: &str = "未定";

/// A yen amount that may not be determined yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "yen", rename_all = "lowercase")]
pub enum Amount {
    /// Settled amount in yen
    Known(i64),
    /// Not yet reported (e.g. toll cost outstanding)
    Pending,
}

impl Amount {
    pub fn is_pending(&self) -> bool {
        matches!(self, Amount::Pending)
    }

    /// Settled value, if any
    pub fn known(&self) -> Option<i64> {
        match self {
            Amount::Known(v) => Some(*v),
            Amount::Pending => None,
        }
    }

    /// Halve a known amount (one-way trips); Pending stays Pending
    pub fn halved(self) -> Amount {
        match self {
            Amount::Known(v) => Amount::Known(v / 2),
            Amount::Pending => Amount::Pending,
        }
    }

    /// Add two amounts, Pending-propagating
    pub fn add(self, other: Amount) -> Amount {
        match (self, other) {
            (Amount::Known(a), Amount::Known(b)) => Amount::Known(a + b),
            _ => Amount::Pending,
        }
    }

    /// Sum a sequence of amounts; Pending if any contributor is Pending
    pub fn sum<I: IntoIterator<Item = Amount>>(amounts: I) -> Amount {
        amounts
            .into_iter()
            .fold(Amount::Known(0), |acc, a| acc.add(a))
    }

    /// Parse a CSV cell. Empty, 未定, or non-numeric text all read as
    /// Pending; thousands separators are tolerated.
    pub fn parse(s: &str) -> Amount {
        let cleaned = s.trim().replace(',', "");
        if cleaned.is_empty() || cleaned == PENDING_LABEL {
            return Amount::Pending;
        }
        match cleaned.parse::<i64>() {
            Ok(v) => Amount::Known(v),
            Err(_) => Amount::Pending,
        }
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Known(v) => write!(f, "{}", v),
            Amount::Pending => write!(f, "{}", PENDING_LABEL),
        }
    }
}
