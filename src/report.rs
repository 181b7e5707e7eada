use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claims::Claim;
use crate::decimal::Money;
use crate::errors::{CalculationError, Result};
use crate::events::Event;
use crate::interest::InterestPeriod;
use crate::payments::{AllocationRecord, AllocationWarning, Payment, PaymentOutcome};
use crate::state::ClaimState;
use crate::types::{AllocationStrategy, ClaimId, ClaimKind, ClaimStatus, PauseRange, PaymentId};

/// per-claim figures at the end date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSummary {
    pub original_amount: Money,
    pub cost_amount: Money,
    /// set only when cost interest runs from a date other than the claim start
    pub cost_interest_start_date: Option<NaiveDate>,

    pub interest: Money,
    pub cost_interest: Money,
    pub capitalized_interest: Money,
    pub capitalized_cost_interest: Money,

    pub paid_interest_on_cost: Money,
    pub paid_cost: Money,
    pub paid_interest: Money,
    pub paid_principal: Money,

    pub outstanding_principal: Money,
    pub outstanding_interest: Money,
    pub outstanding_cost: Money,
    pub outstanding_cost_interest: Money,
    pub outstanding: Money,

    pub status: ClaimStatus,
    pub satisfied_on: Option<NaiveDate>,
    pub pause: Option<PauseRange>,
    pub periods: Vec<InterestPeriod>,
    pub cost_periods: Vec<InterestPeriod>,
}

impl ClaimSummary {
    pub fn from_state(state: &ClaimState) -> Self {
        let claim = &state.claim;
        let principal = &state.ledger.principal;
        let cost = &state.ledger.cost;

        Self {
            original_amount: claim.amount,
            cost_amount: claim.cost_amount,
            cost_interest_start_date: claim
                .cost_interest_start
                .filter(|date| *date != claim.start_date),
            interest: principal.total_interest,
            cost_interest: cost.total_interest,
            capitalized_interest: principal.total_capitalized,
            capitalized_cost_interest: cost.total_capitalized,
            paid_interest_on_cost: cost.paid_interest,
            paid_cost: cost.paid_amount,
            paid_interest: principal.paid_interest,
            paid_principal: principal.paid_amount,
            outstanding_principal: principal.remaining,
            outstanding_interest: principal.interest_remaining,
            outstanding_cost: cost.remaining,
            outstanding_cost_interest: cost.interest_remaining,
            outstanding: state.ledger.total_outstanding(),
            status: state.status(),
            satisfied_on: state.satisfied_on,
            pause: claim.pause,
            periods: state.principal_schedule.periods.clone(),
            cost_periods: state
                .cost_schedule
                .as_ref()
                .map(|s| s.periods.clone())
                .unwrap_or_default(),
        }
    }

    pub fn total_paid(&self) -> Money {
        self.paid_interest_on_cost + self.paid_cost + self.paid_interest + self.paid_principal
    }

    /// what the claim should still owe given everything accrued and paid
    pub fn expected_outstanding(&self) -> Money {
        self.original_amount + self.cost_amount + self.interest + self.cost_interest - self.total_paid()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClaimOutcome {
    Computed(ClaimSummary),
    Invalid { errors: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    pub id: ClaimId,
    pub label: String,
    pub kind: ClaimKind,
    pub outcome: ClaimOutcome,
}

impl ClaimResult {
    pub fn computed(state: &ClaimState) -> Self {
        Self {
            id: state.claim.id,
            label: state.claim.label.clone(),
            kind: state.claim.kind,
            outcome: ClaimOutcome::Computed(ClaimSummary::from_state(state)),
        }
    }

    pub fn invalid(claim: &Claim, errors: &[CalculationError]) -> Self {
        Self {
            id: claim.id,
            label: claim.label.clone(),
            kind: claim.kind,
            outcome: ClaimOutcome::Invalid {
                errors: errors.iter().map(ToString::to_string).collect(),
            },
        }
    }

    pub fn summary(&self) -> Option<&ClaimSummary> {
        match &self.outcome {
            ClaimOutcome::Computed(summary) => Some(summary),
            ClaimOutcome::Invalid { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    pub id: PaymentId,
    pub label: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
    /// false for rejected payments and payments after the end date
    pub processed: bool,
    pub applied: Money,
    pub unapplied: Money,
    pub allocations: Vec<AllocationRecord>,
    pub warnings: Vec<AllocationWarning>,
    pub error: Option<String>,
}

impl PaymentResult {
    fn base(payment: &Payment) -> Self {
        Self {
            id: payment.id,
            label: payment.label.clone(),
            amount: payment.amount,
            date: payment.date,
            processed: false,
            applied: Money::ZERO,
            unapplied: Money::ZERO,
            allocations: Vec::new(),
            warnings: Vec::new(),
            error: None,
        }
    }

    pub fn processed(payment: &Payment, outcome: PaymentOutcome) -> Self {
        Self {
            processed: true,
            applied: outcome.applied,
            unapplied: outcome.unapplied,
            allocations: outcome.records,
            warnings: outcome.warnings,
            ..Self::base(payment)
        }
    }

    pub fn rejected(payment: &Payment, error: &CalculationError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::base(payment)
        }
    }

    pub fn after_end_date(payment: &Payment) -> Self {
        Self {
            unapplied: payment.amount,
            warnings: vec![AllocationWarning::AfterEndDate {
                amount: payment.amount,
            }],
            ..Self::base(payment)
        }
    }

    pub fn allocated(&self) -> Money {
        self.allocations.iter().map(|a| a.amount).sum()
    }
}

/// case totals over computed claims and accepted payments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub claims_computed: usize,
    pub claims_invalid: usize,
    pub principal_claims: usize,
    pub cost_claims: usize,

    pub original_amount: Money,
    pub cost_amount: Money,
    pub interest: Money,
    pub cost_interest: Money,
    pub capitalized_interest: Money,

    pub paid_interest_on_cost: Money,
    pub paid_cost: Money,
    pub paid_interest: Money,
    pub paid_principal: Money,
    pub paid_total: Money,

    pub outstanding_principal: Money,
    pub outstanding_interest: Money,
    pub outstanding_cost: Money,
    pub outstanding_cost_interest: Money,
    pub outstanding: Money,

    pub payments_received: Money,
    pub payments_processed: Money,
    pub payments_unapplied: Money,
    pub allocated: Money,
}

impl Totals {
    pub fn collect(claims: &[ClaimResult], payments: &[PaymentResult]) -> Self {
        let mut totals = Totals::default();

        for result in claims {
            let Some(s) = result.summary() else {
                totals.claims_invalid += 1;
                continue;
            };

            totals.claims_computed += 1;
            match result.kind {
                ClaimKind::Principal => totals.principal_claims += 1,
                ClaimKind::Cost => totals.cost_claims += 1,
            }

            totals.original_amount += s.original_amount;
            totals.cost_amount += s.cost_amount;
            totals.interest += s.interest;
            totals.cost_interest += s.cost_interest;
            totals.capitalized_interest += s.capitalized_interest + s.capitalized_cost_interest;

            totals.paid_interest_on_cost += s.paid_interest_on_cost;
            totals.paid_cost += s.paid_cost;
            totals.paid_interest += s.paid_interest;
            totals.paid_principal += s.paid_principal;
            totals.paid_total += s.total_paid();

            totals.outstanding_principal += s.outstanding_principal;
            totals.outstanding_interest += s.outstanding_interest;
            totals.outstanding_cost += s.outstanding_cost;
            totals.outstanding_cost_interest += s.outstanding_cost_interest;
            totals.outstanding += s.outstanding;
        }

        for payment in payments.iter().filter(|p| p.error.is_none()) {
            totals.payments_received += payment.amount;
            totals.payments_processed += payment.applied;
            totals.payments_unapplied += payment.unapplied;
            totals.allocated += payment.allocated();
        }

        totals
    }
}

/// full result of one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    pub end_date: NaiveDate,
    pub strategy: AllocationStrategy,
    pub claims: Vec<ClaimResult>,
    pub payments: Vec<PaymentResult>,
    pub totals: Totals,
    pub is_consistent: bool,
    pub events: Vec<Event>,
}

impl CalculationResponse {
    pub fn claim(&self, label: &str) -> Option<&ClaimResult> {
        self.claims.iter().find(|c| c.label == label)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// assemble the response and run the balance checks
pub fn aggregate(
    end_date: NaiveDate,
    strategy: AllocationStrategy,
    claims: Vec<ClaimResult>,
    payments: Vec<PaymentResult>,
    events: Vec<Event>,
    tolerance: Money,
) -> CalculationResponse {
    let totals = Totals::collect(&claims, &payments);
    let is_consistent = check_consistency(&claims, &totals, tolerance);

    CalculationResponse {
        end_date,
        strategy,
        claims,
        payments,
        totals,
        is_consistent,
        events,
    }
}

/// every claim balances within `tolerance`, the grand total matches the
/// per-component totals and every processed euro is allocated
pub fn check_consistency(claims: &[ClaimResult], totals: &Totals, tolerance: Money) -> bool {
    let claims_balance = claims
        .iter()
        .filter_map(ClaimResult::summary)
        .all(|s| s.outstanding.approx_eq(s.expected_outstanding(), tolerance));

    let components = totals.outstanding_principal
        + totals.outstanding_interest
        + totals.outstanding_cost
        + totals.outstanding_cost_interest;

    claims_balance
        && components == totals.outstanding
        && totals.allocated == totals.payments_processed
        && totals.payments_processed + totals.payments_unapplied == totals.payments_received
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, RegimeKind};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> ClaimState {
        let claim = Claim::new("V1", Money::from_major(1_000), date(2024, 1, 1), RegimeKind::StatutorySimple)
            .with_cost(Money::from_major(100), Some(date(2024, 1, 1)));
        let mut state = ClaimState::new(claim.validate().unwrap());
        state.ledger.principal.accrue(Money::from(dec!(12.34)));
        state.ledger.cost.accrue(Money::from(dec!(1.20)));
        state.ledger.cost.pay_interest(Money::from(dec!(1.20)));
        state.ledger.cost.pay_amount(Money::from_major(50));
        state
    }

    #[test]
    fn test_summary_balances() {
        let summary = ClaimSummary::from_state(&state());

        assert_eq!(summary.total_paid(), Money::from(dec!(51.20)));
        assert_eq!(summary.outstanding, Money::from(dec!(1062.34)));
        assert_eq!(summary.expected_outstanding(), summary.outstanding);
        assert_eq!(summary.status, ClaimStatus::Open);
        // same date as the claim start is not repeated
        assert_eq!(summary.cost_interest_start_date, None);
    }

    #[test]
    fn test_totals_and_consistency() {
        let claims = vec![ClaimResult::computed(&state())];
        let payment = Payment::new(Money::from(dec!(51.20)), date(2024, 3, 1));
        let outcome = PaymentOutcome {
            records: vec![
                AllocationRecord {
                    claim_label: "V1".to_string(),
                    component: Component::InterestOnCost,
                    amount: Money::from(dec!(1.20)),
                    accrued_before_payment: Money::from(dec!(1.20)),
                },
                AllocationRecord {
                    claim_label: "V1".to_string(),
                    component: Component::Cost,
                    amount: Money::from_major(50),
                    accrued_before_payment: Money::from(dec!(1.20)),
                },
            ],
            warnings: Vec::new(),
            applied: Money::from(dec!(51.20)),
            unapplied: Money::ZERO,
        };
        let payments = vec![PaymentResult::processed(&payment, outcome)];

        let totals = Totals::collect(&claims, &payments);
        assert_eq!(totals.claims_computed, 1);
        assert_eq!(totals.principal_claims, 1);
        assert_eq!(totals.allocated, Money::from(dec!(51.20)));
        assert!(check_consistency(&claims, &totals, Money::from(dec!(0.01))));
    }

    #[test]
    fn test_misallocated_payment_is_inconsistent() {
        let claims = vec![ClaimResult::computed(&state())];
        let payment = Payment::new(Money::from_major(60), date(2024, 3, 1));
        let outcome = PaymentOutcome {
            records: Vec::new(),
            warnings: Vec::new(),
            applied: Money::from_major(60),
            unapplied: Money::ZERO,
        };
        let payments = vec![PaymentResult::processed(&payment, outcome)];

        let totals = Totals::collect(&claims, &payments);
        assert!(!check_consistency(&claims, &totals, Money::from(dec!(0.01))));
    }

    #[test]
    fn test_invalid_claims_are_counted_not_summed() {
        let claim = Claim::new("", Money::ZERO, date(2024, 1, 1), RegimeKind::FixedRate);
        let errors = claim.validate().unwrap_err();
        let claims = vec![ClaimResult::invalid(&claim, &errors)];

        let totals = Totals::collect(&claims, &[]);
        assert_eq!(totals.claims_invalid, 1);
        assert_eq!(totals.original_amount, Money::ZERO);
        assert!(claims[0].summary().is_none());
    }

    #[test]
    fn test_after_end_date_payment() {
        let payment = Payment::new(Money::from_major(100), date(2030, 1, 1));
        let result = PaymentResult::after_end_date(&payment);

        assert!(!result.processed);
        assert_eq!(result.unapplied, Money::from_major(100));
        assert_eq!(
            result.warnings,
            vec![AllocationWarning::AfterEndDate {
                amount: Money::from_major(100)
            }]
        );
    }
}
