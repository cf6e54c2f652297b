//! Day buckets tracked by the reference data

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One of the three horizons the reference data distinguishes.
///
/// Every date two or more days after the current date shares the
/// `AfterTomorrow` reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayBucket {
    Today,
    Tomorrow,
    AfterTomorrow,
}

impl DayBucket {
    pub const ALL: [DayBucket; 3] = [DayBucket::Today, DayBucket::Tomorrow, DayBucket::AfterTomorrow];

    /// Maps `requested` onto a bucket relative to `current`.
    ///
    /// Past dates are not rejected here and fall through to `AfterTomorrow`;
    /// callers validate them first.
    pub fn select(requested: NaiveDate, current: NaiveDate) -> Self {
        if requested == current {
            DayBucket::Today
        } else if current.checked_add_days(Days::new(1)) == Some(requested) {
            DayBucket::Tomorrow
        } else {
            DayBucket::AfterTomorrow
        }
    }
}

impl Display for DayBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DayBucket::Today => "today",
                DayBucket::Tomorrow => "tomorrow",
                DayBucket::AfterTomorrow => "after_tomorrow",
            }
        )
    }
}
