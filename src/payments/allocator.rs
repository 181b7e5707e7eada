use std::cmp::Ordering;

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::state::ClaimState;
use crate::types::AllocationStrategy;

use super::{AllocationWarning, Payment, PaymentOutcome, PaymentWaterfall, UnappliedReason};

/// ordering key of a claim under the active strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorityKey {
    rate: Rate,
    start_date: NaiveDate,
}

/// distributes a payment over claims: assigned claims first, then by strategy
pub struct PaymentAllocator<'a> {
    engine: &'a AccrualEngine<'a>,
    strategy: AllocationStrategy,
    waterfall: PaymentWaterfall,
}

impl<'a> PaymentAllocator<'a> {
    pub fn new(engine: &'a AccrualEngine<'a>, strategy: AllocationStrategy) -> Self {
        Self {
            engine,
            strategy,
            waterfall: PaymentWaterfall::statutory(),
        }
    }

    /// allocate one payment; claims are accrued to the payment date only when
    /// the payment reaches them
    pub fn allocate(
        &self,
        payment: &Payment,
        claims: &mut [ClaimState],
        events: &mut EventStore,
    ) -> Result<PaymentOutcome> {
        let date = payment.date;
        let mut outcome = PaymentOutcome::default();
        let mut remaining = payment.amount;
        let any_active = claims.iter().any(|c| c.is_active_on(date));

        for label in &payment.assigned_claim_labels {
            if !remaining.is_positive() {
                break;
            }

            let Some(state) = claims.iter_mut().find(|c| c.label() == label.as_str()) else {
                warn!("payment {}: unknown claim label {}", payment.id, label);
                outcome
                    .warnings
                    .push(AllocationWarning::UnknownClaimLabel { label: label.clone() });
                continue;
            };

            if state.is_satisfied() {
                outcome
                    .warnings
                    .push(AllocationWarning::ClaimAlreadySatisfied { label: label.clone() });
                continue;
            }
            if state.claim.start_date > date {
                outcome.warnings.push(AllocationWarning::ClaimNotActive {
                    label: label.clone(),
                    start_date: state.claim.start_date,
                });
                continue;
            }

            remaining = self.apply_to_claim(payment, state, remaining, &mut outcome, events)?;
        }

        if remaining.is_positive() {
            let candidates: Vec<usize> = claims
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_active_on(date))
                .map(|(i, _)| i)
                .collect();

            for tier in self.priority_tiers(claims, &candidates, date)? {
                if !remaining.is_positive() {
                    break;
                }
                remaining = self.apply_to_tier(payment, claims, &tier, remaining, &mut outcome, events)?;
            }
        }

        outcome.unapplied = remaining.max(Money::ZERO);
        outcome.applied = payment.amount - outcome.unapplied;

        if outcome.unapplied.is_positive() {
            let reason = if any_active {
                UnappliedReason::ExceedsOutstanding
            } else {
                UnappliedReason::NoActiveClaims
            };
            warn!(
                "payment {} on {}: {} not applied ({:?})",
                payment.id, date, outcome.unapplied, reason
            );
            events.emit(Event::PaymentUnapplied {
                payment_id: payment.id,
                amount: outcome.unapplied,
                reason,
                date,
            });
            outcome
                .warnings
                .push(AllocationWarning::unapplied(outcome.unapplied, reason));
        }

        Ok(outcome)
    }

    /// split `available` over one tier in proportion to outstanding balances;
    /// rounding leftovers are offered to the tier again before moving on
    fn apply_to_tier(
        &self,
        payment: &Payment,
        claims: &mut [ClaimState],
        tier: &[usize],
        available: Money,
        outcome: &mut PaymentOutcome,
        events: &mut EventStore,
    ) -> Result<Money> {
        for &i in tier {
            claims[i].accrue_to(payment.date, self.engine, events)?;
        }

        let mut remaining = available;
        loop {
            let open: Vec<usize> = tier
                .iter()
                .copied()
                .filter(|&i| !claims[i].is_satisfied())
                .collect();
            if open.is_empty() || !remaining.is_positive() {
                break;
            }

            let outstanding: Vec<Money> = open
                .iter()
                .map(|&i| claims[i].ledger.total_outstanding())
                .collect();
            let shares = proportional_shares(remaining, &outstanding);
            if open.len() > 1 {
                debug!(
                    "payment {}: {} split over {} tied claims",
                    payment.id,
                    remaining,
                    open.len()
                );
            }

            let before = remaining;
            for (&i, share) in open.iter().zip(shares) {
                if !share.is_positive() {
                    continue;
                }
                let left = self.apply_to_claim(payment, &mut claims[i], share, outcome, events)?;
                remaining -= share - left;
            }

            if remaining == before {
                break;
            }
        }

        Ok(remaining)
    }

    fn apply_to_claim(
        &self,
        payment: &Payment,
        state: &mut ClaimState,
        available: Money,
        outcome: &mut PaymentOutcome,
        events: &mut EventStore,
    ) -> Result<Money> {
        state.accrue_to(payment.date, self.engine, events)?;

        let first = outcome.records.len();
        let left = self
            .waterfall
            .apply(&mut state.ledger, available, &state.claim.label, &mut outcome.records);

        for record in &outcome.records[first..] {
            events.emit(Event::PaymentApplied {
                payment_id: payment.id,
                claim_label: record.claim_label.clone(),
                component: record.component,
                amount: record.amount,
                date: payment.date,
            });
        }

        if state.settle_if_paid(payment.date, events) {
            info!("claim {} satisfied on {}", state.label(), payment.date);
        }

        Ok(left)
    }

    /// group candidate claims into tiers of equal priority, highest first;
    /// claims keep their input order within a tier
    pub fn priority_tiers(
        &self,
        claims: &[ClaimState],
        candidates: &[usize],
        date: NaiveDate,
    ) -> Result<Vec<Vec<usize>>> {
        let mut keyed = Vec::with_capacity(candidates.len());
        for &i in candidates {
            let state = &claims[i];
            keyed.push((
                i,
                PriorityKey {
                    rate: self.engine.rate_on(&state.claim.regime, date)?,
                    start_date: state.claim.start_date,
                },
            ));
        }

        keyed.sort_by(|(_, a), (_, b)| self.compare(a, b));

        let mut tiers: Vec<Vec<usize>> = Vec::new();
        let mut last: Option<PriorityKey> = None;
        for (i, key) in keyed {
            match last {
                Some(prev) if self.compare(&prev, &key) == Ordering::Equal => {
                    if let Some(tier) = tiers.last_mut() {
                        tier.push(i);
                    }
                }
                _ => tiers.push(vec![i]),
            }
            last = Some(key);
        }

        Ok(tiers)
    }

    fn compare(&self, a: &PriorityKey, b: &PriorityKey) -> Ordering {
        match self.strategy {
            AllocationStrategy::MostBurdensome => b
                .rate
                .cmp(&a.rate)
                .then_with(|| a.start_date.cmp(&b.start_date)),
            // rate only separates claims of the same age
            AllocationStrategy::OldestFirst => a
                .start_date
                .cmp(&b.start_date)
                .then_with(|| b.rate.cmp(&a.rate)),
        }
    }
}

/// divide `amount` over `outstanding` in proportion, rounded to cents; the
/// last share takes the rounding remainder. an amount covering the total pays
/// every balance in full
pub fn proportional_shares(amount: Money, outstanding: &[Money]) -> Vec<Money> {
    let total: Money = outstanding.iter().sum();
    if amount >= total {
        return outstanding.to_vec();
    }

    let mut shares = Vec::with_capacity(outstanding.len());
    let mut allocated = Money::ZERO;
    for (i, balance) in outstanding.iter().enumerate() {
        let share = if i + 1 == outstanding.len() {
            amount - allocated
        } else {
            amount.pro_rata(*balance, total)
        };
        allocated += share;
        shares.push(share);
    }
    shares
}
