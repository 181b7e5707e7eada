use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Rate;

/// unique identifier for a claim
pub type ClaimId = Uuid;

/// unique identifier for a payment
pub type PaymentId = Uuid;

/// claim kind, reporting only; both kinds accrue and allocate identically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClaimKind {
    /// a principal claim (vordering)
    #[default]
    Principal,
    /// a cost item entered as its own claim (kosten)
    Cost,
}

/// interest regime as supplied on the input claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegimeKind {
    StatutoryCompound,
    CommercialCompound,
    StatutorySimple,
    CommercialSimple,
    FixedRate,
    StatutoryPlusMargin,
    CommercialPlusMargin,
}

impl RegimeKind {
    /// map the numeric regime codes 1-7 used by case files
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RegimeKind::StatutoryCompound),
            2 => Some(RegimeKind::CommercialCompound),
            3 => Some(RegimeKind::StatutorySimple),
            4 => Some(RegimeKind::CommercialSimple),
            5 => Some(RegimeKind::FixedRate),
            6 => Some(RegimeKind::StatutoryPlusMargin),
            7 => Some(RegimeKind::CommercialPlusMargin),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            RegimeKind::StatutoryCompound => 1,
            RegimeKind::CommercialCompound => 2,
            RegimeKind::StatutorySimple => 3,
            RegimeKind::CommercialSimple => 4,
            RegimeKind::FixedRate => 5,
            RegimeKind::StatutoryPlusMargin => 6,
            RegimeKind::CommercialPlusMargin => 7,
        }
    }

    /// regimes that cannot be resolved without a margin
    pub fn requires_margin(&self) -> bool {
        matches!(
            self,
            RegimeKind::FixedRate
                | RegimeKind::StatutoryPlusMargin
                | RegimeKind::CommercialPlusMargin
        )
    }
}

/// resolved interest regime, produced by claim validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateRegime {
    /// statutory rate (art. 6:119 BW), capitalized yearly
    StatutoryCompound,
    /// commercial rate (art. 6:119a BW), capitalized yearly
    CommercialCompound,
    StatutorySimple,
    CommercialSimple,
    /// contractual flat rate, simple interest
    FixedRate { rate: Rate },
    /// statutory rate plus a margin from `effective_from`, capitalized yearly
    StatutoryPlusMargin { margin: Rate, effective_from: NaiveDate },
    /// commercial rate plus a margin from `effective_from`, capitalized yearly
    CommercialPlusMargin { margin: Rate, effective_from: NaiveDate },
}

impl RateRegime {
    pub fn kind(&self) -> RegimeKind {
        match self {
            RateRegime::StatutoryCompound => RegimeKind::StatutoryCompound,
            RateRegime::CommercialCompound => RegimeKind::CommercialCompound,
            RateRegime::StatutorySimple => RegimeKind::StatutorySimple,
            RateRegime::CommercialSimple => RegimeKind::CommercialSimple,
            RateRegime::FixedRate { .. } => RegimeKind::FixedRate,
            RateRegime::StatutoryPlusMargin { .. } => RegimeKind::StatutoryPlusMargin,
            RateRegime::CommercialPlusMargin { .. } => RegimeKind::CommercialPlusMargin,
        }
    }

    /// accrued interest is capitalized on every anniversary
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            RateRegime::StatutoryCompound
                | RateRegime::CommercialCompound
                | RateRegime::StatutoryPlusMargin { .. }
                | RateRegime::CommercialPlusMargin { .. }
        )
    }

    /// base rate comes from the commercial column of the rate table
    pub fn is_commercial(&self) -> bool {
        matches!(
            self,
            RateRegime::CommercialCompound
                | RateRegime::CommercialSimple
                | RateRegime::CommercialPlusMargin { .. }
        )
    }

    /// whether the rate changes with the published table
    pub fn follows_rate_table(&self) -> bool {
        !matches!(self, RateRegime::FixedRate { .. })
    }

    pub fn margin_effective_date(&self) -> Option<NaiveDate> {
        match self {
            RateRegime::StatutoryPlusMargin { effective_from, .. }
            | RateRegime::CommercialPlusMargin { effective_from, .. } => Some(*effective_from),
            _ => None,
        }
    }
}

/// case-level rule for ordering claims when a payment is not (fully) assigned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AllocationStrategy {
    /// highest current rate first, oldest first on equal rates (art. 6:43 BW)
    #[default]
    #[serde(alias = "A")]
    MostBurdensome,
    /// earliest start date first
    #[serde(alias = "B")]
    OldestFirst,
}

/// claim component a payment is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    InterestOnCost,
    Cost,
    InterestOnPrincipal,
    Principal,
}

/// the two interest-bearing amounts of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceSide {
    Principal,
    Cost,
}

/// claim status at the end of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatus {
    /// balance remains
    Open,
    /// principal, cost and interest fully paid (voldaan)
    Satisfied,
}

/// half-open suspension range [start, end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PauseRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}
