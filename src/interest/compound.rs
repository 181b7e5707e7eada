use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::state::ComponentLedger;

/// interest capitalization event (kapitalisatie)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalizationResult {
    pub date: NaiveDate,
    pub amount_capitalized: Money,
    pub previous_basis: Money,
    pub new_basis: Money,
}

/// capitalize accrued interest into the basis on an anniversary;
/// `None` when nothing was pending
pub fn capitalize_interest(ledger: &mut ComponentLedger, date: NaiveDate) -> Option<CapitalizationResult> {
    let previous_basis = ledger.basis();
    let amount = ledger.capitalize();
    if amount.is_zero() {
        return None;
    }

    Some(CapitalizationResult {
        date,
        amount_capitalized: amount,
        previous_basis,
        new_basis: ledger.basis(),
    })
}
