pub mod accrual;
pub mod compound;
pub mod rates;
pub mod splitter;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};

pub use accrual::{AccrualEngine, AccrualOutcome, DAYS_PER_YEAR};
pub use compound::{capitalize_interest, CapitalizationResult};
pub use rates::{RateEntry, RateTable};
pub use splitter::{PeriodSpan, PeriodSplitter, Timeline};

/// one line of an interest statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestPeriod {
    pub start: NaiveDate,
    /// exclusive
    pub end: NaiveDate,
    pub day_count: u32,
    pub principal_basis: Money,
    pub rate: Rate,
    pub interest_amount: Money,
    /// unpaid interest of this side right after the period
    pub accrued_balance: Money,
    pub is_pause: bool,
    pub is_capitalization_point: bool,
}
