use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::CalculationError;
use crate::interest::Timeline;
use crate::types::{ClaimId, ClaimKind, PauseRange, RateRegime, RegimeKind};

/// a claim (vordering) as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default = "Uuid::new_v4")]
    pub id: ClaimId,
    pub label: String,
    #[serde(default)]
    pub kind: ClaimKind,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub rate_regime: RegimeKind,
    #[serde(default)]
    pub cost_amount: Money,
    #[serde(default)]
    pub cost_interest_start_date: Option<NaiveDate>,
    /// full rate for FixedRate, add-on for the margin regimes
    #[serde(default)]
    pub fixed_margin: Option<Rate>,
    #[serde(default)]
    pub margin_effective_date: Option<NaiveDate>,
    #[serde(default)]
    pub pause_start: Option<NaiveDate>,
    #[serde(default)]
    pub pause_end: Option<NaiveDate>,
}

impl Claim {
    pub fn new(label: impl Into<String>, amount: Money, start_date: NaiveDate, rate_regime: RegimeKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            kind: ClaimKind::Principal,
            amount,
            start_date,
            rate_regime,
            cost_amount: Money::ZERO,
            cost_interest_start_date: None,
            fixed_margin: None,
            margin_effective_date: None,
            pause_start: None,
            pause_end: None,
        }
    }

    pub fn with_kind(mut self, kind: ClaimKind) -> Self {
        self.kind = kind;
        self
    }

    /// attach a cost amount; with an interest date the cost accrues on its own timeline
    pub fn with_cost(mut self, amount: Money, interest_from: Option<NaiveDate>) -> Self {
        self.cost_amount = amount;
        self.cost_interest_start_date = interest_from;
        self
    }

    pub fn with_margin(mut self, margin: Rate, effective_from: Option<NaiveDate>) -> Self {
        self.fixed_margin = Some(margin);
        self.margin_effective_date = effective_from;
        self
    }

    pub fn with_pause(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.pause_start = Some(start);
        self.pause_end = Some(end);
        self
    }

    /// check structural invariants and resolve the rate regime;
    /// returns every problem found, not just the first
    pub fn validate(&self) -> Result<ValidatedClaim, Vec<CalculationError>> {
        let label = self.label.as_str();
        let mut errors = Vec::new();

        if label.trim().is_empty() {
            errors.push(CalculationError::invalid_claim(label, "label must not be empty"));
        }
        if !self.amount.is_positive() {
            errors.push(CalculationError::invalid_claim(
                label,
                format!("amount must be positive, got {}", self.amount),
            ));
        }
        if self.cost_amount.is_negative() {
            errors.push(CalculationError::invalid_claim(
                label,
                format!("cost amount must not be negative, got {}", self.cost_amount),
            ));
        }

        let pause = match (self.pause_start, self.pause_end) {
            (None, None) => None,
            (Some(start), Some(end)) if end >= start => Some(PauseRange { start, end }),
            (Some(start), Some(end)) => {
                errors.push(CalculationError::invalid_claim(
                    label,
                    format!("pause ends {} before it starts {}", end, start),
                ));
                None
            }
            _ => {
                errors.push(CalculationError::invalid_claim(
                    label,
                    "pause needs both a start and an end date",
                ));
                None
            }
        };

        let regime = match self.resolve_regime() {
            Ok(regime) => Some(regime),
            Err(err) => {
                errors.push(err);
                None
            }
        };

        match regime {
            Some(regime) if errors.is_empty() => Ok(ValidatedClaim {
                id: self.id,
                label: self.label.clone(),
                kind: self.kind,
                amount: self.amount,
                start_date: self.start_date,
                regime,
                cost_amount: self.cost_amount,
                cost_interest_start: self.cost_interest_start_date,
                pause,
            }),
            _ => Err(errors),
        }
    }

    fn resolve_regime(&self) -> Result<RateRegime, CalculationError> {
        let margin = match (self.rate_regime.requires_margin(), self.fixed_margin) {
            (true, None) => {
                return Err(CalculationError::invalid_claim(
                    &self.label,
                    format!("{:?} requires a fixed margin", self.rate_regime),
                ))
            }
            (true, Some(margin)) if margin.is_negative() => {
                return Err(CalculationError::invalid_claim(
                    &self.label,
                    format!("margin must not be negative, got {}", margin),
                ))
            }
            (_, margin) => margin.unwrap_or(Rate::ZERO),
        };
        let effective_from = self.margin_effective_date.unwrap_or(self.start_date);

        Ok(match self.rate_regime {
            RegimeKind::StatutoryCompound => RateRegime::StatutoryCompound,
            RegimeKind::CommercialCompound => RateRegime::CommercialCompound,
            RegimeKind::StatutorySimple => RateRegime::StatutorySimple,
            RegimeKind::CommercialSimple => RateRegime::CommercialSimple,
            RegimeKind::FixedRate => RateRegime::FixedRate { rate: margin },
            RegimeKind::StatutoryPlusMargin => RateRegime::StatutoryPlusMargin { margin, effective_from },
            RegimeKind::CommercialPlusMargin => RateRegime::CommercialPlusMargin { margin, effective_from },
        })
    }
}

/// validate a whole case; a repeated label makes the later claim invalid
pub fn validate_claims(claims: &[Claim]) -> Vec<Result<ValidatedClaim, Vec<CalculationError>>> {
    let mut seen = HashSet::new();
    claims
        .iter()
        .map(|claim| {
            let duplicate = !seen.insert(claim.label.as_str());
            match claim.validate() {
                Ok(_) if duplicate => Err(vec![CalculationError::invalid_claim(
                    &claim.label,
                    "label is used by an earlier claim",
                )]),
                Err(mut errors) if duplicate => {
                    errors.push(CalculationError::invalid_claim(
                        &claim.label,
                        "label is used by an earlier claim",
                    ));
                    Err(errors)
                }
                result => result,
            }
        })
        .collect()
}

/// a claim that passed validation, with its regime resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedClaim {
    pub id: ClaimId,
    pub label: String,
    pub kind: ClaimKind,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub regime: RateRegime,
    pub cost_amount: Money,
    pub cost_interest_start: Option<NaiveDate>,
    pub pause: Option<PauseRange>,
}

impl ValidatedClaim {
    fn timeline(&self, anchor: NaiveDate) -> Timeline {
        Timeline {
            anchor,
            compounding: self.regime.is_compound(),
            follows_rate_table: self.regime.follows_rate_table(),
            margin_from: self.regime.margin_effective_date(),
            pauses: self.pause.into_iter().collect(),
        }
    }

    pub fn principal_timeline(&self) -> Timeline {
        self.timeline(self.start_date)
    }

    /// cost interest runs only with a positive cost and its own interest date
    pub fn cost_timeline(&self) -> Option<Timeline> {
        match self.cost_interest_start {
            Some(anchor) if self.cost_amount.is_positive() => Some(self.timeline(anchor)),
            _ => None,
        }
    }
}
