use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claims::ValidatedClaim;
use crate::decimal::Money;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::interest::{AccrualEngine, InterestPeriod, Timeline};
use crate::types::{BalanceSide, ClaimStatus};

/// running balances of one interest-bearing amount (principal or cost)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentLedger {
    /// unpaid part of the original amount
    pub remaining: Money,
    /// all accrued interest not yet paid, capitalized or not
    pub interest_remaining: Money,
    /// part of `interest_remaining` that has been capitalized into the basis
    pub capitalized_unpaid: Money,

    // totals
    pub total_interest: Money,
    pub total_capitalized: Money,
    pub paid_amount: Money,
    pub paid_interest: Money,
}

impl ComponentLedger {
    pub fn new(amount: Money) -> Self {
        Self {
            remaining: amount,
            ..Self::default()
        }
    }

    /// amount interest is computed on
    pub fn basis(&self) -> Money {
        self.remaining + self.capitalized_unpaid
    }

    /// interest accrued since the last capitalization
    pub fn pending_interest(&self) -> Money {
        self.interest_remaining - self.capitalized_unpaid
    }

    pub fn outstanding(&self) -> Money {
        self.remaining + self.interest_remaining
    }

    pub fn is_settled(&self) -> bool {
        self.remaining.is_zero() && self.interest_remaining.is_zero()
    }

    pub fn accrue(&mut self, interest: Money) {
        self.interest_remaining += interest;
        self.total_interest += interest;
    }

    /// fold pending interest into the basis; returns the amount capitalized
    pub fn capitalize(&mut self) -> Money {
        let pending = self.pending_interest();
        self.capitalized_unpaid = self.interest_remaining;
        self.total_capitalized += pending;
        pending
    }

    /// pay interest, pending accrual before capitalized interest;
    /// returns the amount applied
    pub fn pay_interest(&mut self, available: Money) -> Money {
        let applied = available.min(self.interest_remaining).max(Money::ZERO);
        let from_capitalized = (applied - self.pending_interest()).max(Money::ZERO);
        self.interest_remaining -= applied;
        self.capitalized_unpaid -= from_capitalized;
        self.paid_interest += applied;
        applied
    }

    /// pay the original amount; returns the amount applied
    pub fn pay_amount(&mut self, available: Money) -> Money {
        let applied = available.min(self.remaining).max(Money::ZERO);
        self.remaining -= applied;
        self.paid_amount += applied;
        applied
    }
}

/// the per-claim mutable ledger used during one calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimLedger {
    pub principal: ComponentLedger,
    pub cost: ComponentLedger,
}

impl ClaimLedger {
    pub fn new(amount: Money, cost_amount: Money) -> Self {
        Self {
            principal: ComponentLedger::new(amount),
            cost: ComponentLedger::new(cost_amount),
        }
    }

    pub fn total_outstanding(&self) -> Money {
        self.principal.outstanding() + self.cost.outstanding()
    }

    pub fn is_settled(&self) -> bool {
        self.principal.is_settled() && self.cost.is_settled()
    }

    pub fn side_mut(&mut self, side: BalanceSide) -> &mut ComponentLedger {
        match side {
            BalanceSide::Principal => &mut self.principal,
            BalanceSide::Cost => &mut self.cost,
        }
    }
}

/// accrual progress of one side of a claim
#[derive(Debug, Clone)]
pub struct SideSchedule {
    pub timeline: Timeline,
    pub accrued_through: NaiveDate,
    pub periods: Vec<InterestPeriod>,
}

impl SideSchedule {
    fn new(timeline: Timeline) -> Self {
        Self {
            accrued_through: timeline.anchor,
            timeline,
            periods: Vec::new(),
        }
    }
}

/// working state of a claim during one calculation
#[derive(Debug, Clone)]
pub struct ClaimState {
    pub claim: ValidatedClaim,
    pub ledger: ClaimLedger,
    pub principal_schedule: SideSchedule,
    /// present only when the cost accrues interest
    pub cost_schedule: Option<SideSchedule>,
    pub satisfied_on: Option<NaiveDate>,
}

impl ClaimState {
    pub fn new(claim: ValidatedClaim) -> Self {
        let ledger = ClaimLedger::new(claim.amount, claim.cost_amount);
        let principal_schedule = SideSchedule::new(claim.principal_timeline());
        let cost_schedule = claim.cost_timeline().map(SideSchedule::new);
        Self {
            claim,
            ledger,
            principal_schedule,
            cost_schedule,
            satisfied_on: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.claim.label
    }

    pub fn is_satisfied(&self) -> bool {
        self.satisfied_on.is_some()
    }

    /// started on or before `date` and not yet satisfied
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        !self.is_satisfied() && self.claim.start_date <= date
    }

    pub fn status(&self) -> ClaimStatus {
        if self.is_satisfied() {
            ClaimStatus::Satisfied
        } else {
            ClaimStatus::Open
        }
    }

    /// bring both sides' interest up to `date`; satisfied claims stop accruing
    pub fn accrue_to(
        &mut self,
        date: NaiveDate,
        engine: &AccrualEngine<'_>,
        events: &mut EventStore,
    ) -> Result<()> {
        if self.is_satisfied() {
            return Ok(());
        }

        let regime = self.claim.regime;
        let sides = [
            (BalanceSide::Principal, Some(&mut self.principal_schedule)),
            (BalanceSide::Cost, self.cost_schedule.as_mut()),
        ];

        for (side, schedule) in sides {
            let Some(schedule) = schedule else { continue };
            if schedule.accrued_through >= date {
                continue;
            }

            let ledger = self.ledger.side_mut(side);
            let outcome = engine.accrue(
                ledger,
                &schedule.timeline,
                &regime,
                schedule.accrued_through,
                date,
            )?;

            for cap in outcome.capitalizations {
                events.emit(Event::InterestCapitalized {
                    claim_id: self.claim.id,
                    claim_label: self.claim.label.clone(),
                    side,
                    date: cap.date,
                    amount: cap.amount_capitalized,
                    new_basis: cap.new_basis,
                });
            }

            schedule.periods.extend(outcome.periods);
            schedule.accrued_through = date;
        }

        Ok(())
    }

    /// mark the claim satisfied if every balance is zero
    pub fn settle_if_paid(&mut self, date: NaiveDate, events: &mut EventStore) -> bool {
        if self.is_satisfied() || !self.ledger.is_settled() {
            return false;
        }

        self.satisfied_on = Some(date);
        events.emit(Event::ClaimSatisfied {
            claim_id: self.claim.id,
            claim_label: self.claim.label.clone(),
            date,
        });
        true
    }
}
