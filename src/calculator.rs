use log::{debug, info, warn};

use crate::claims::validate_claims;
use crate::config::CalculationConfig;
use crate::errors::Result;
use crate::events::{Event, EventStore};
use crate::interest::AccrualEngine;
use crate::payments::{Payment, PaymentAllocator, UnappliedReason};
use crate::report::{aggregate, CalculationResponse, ClaimResult, PaymentResult};
use crate::request::CalculationRequest;
use crate::state::ClaimState;

/// runs calculations against one immutable configuration
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    config: CalculationConfig,
}

enum ClaimSlot {
    Valid(usize),
    Invalid(ClaimResult),
}

impl Calculator {
    pub fn new(config: CalculationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CalculationConfig {
        &self.config
    }

    /// compute interest and allocate payments up to the request's end date;
    /// only a gap in the rate table aborts the calculation
    pub fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        let engine = AccrualEngine::new(&self.config.rate_table);
        let allocator = PaymentAllocator::new(&engine, request.strategy);
        let mut events = EventStore::new();

        info!(
            "calculating {} claims and {} payments to {} ({:?})",
            request.claims.len(),
            request.payments.len(),
            request.end_date,
            request.strategy
        );

        let mut states = Vec::new();
        let mut slots = Vec::with_capacity(request.claims.len());
        for (claim, validated) in request.claims.iter().zip(validate_claims(&request.claims)) {
            match validated {
                Ok(valid) => {
                    slots.push(ClaimSlot::Valid(states.len()));
                    states.push(ClaimState::new(valid));
                }
                Err(errors) => {
                    warn!("claim {} is invalid: {} problem(s)", claim.label, errors.len());
                    slots.push(ClaimSlot::Invalid(ClaimResult::invalid(claim, &errors)));
                }
            }
        }

        // stable: equal dates keep their input order
        let mut payments: Vec<&Payment> = request.payments.iter().collect();
        payments.sort_by_key(|p| p.date);

        let mut payment_results = Vec::with_capacity(payments.len());
        for payment in payments {
            if let Err(err) = payment.validate() {
                warn!("payment {} rejected: {}", payment.id, err);
                payment_results.push(PaymentResult::rejected(payment, &err));
                continue;
            }

            if payment.date > request.end_date {
                warn!(
                    "payment {} on {} is after the end date {}",
                    payment.id, payment.date, request.end_date
                );
                events.emit(Event::PaymentUnapplied {
                    payment_id: payment.id,
                    amount: payment.amount,
                    reason: UnappliedReason::AfterEndDate,
                    date: payment.date,
                });
                payment_results.push(PaymentResult::after_end_date(payment));
                continue;
            }

            debug!("allocating payment {} of {} on {}", payment.id, payment.amount, payment.date);
            let outcome = allocator.allocate(payment, &mut states, &mut events)?;
            payment_results.push(PaymentResult::processed(payment, outcome));
        }

        for state in &mut states {
            state.accrue_to(request.end_date, &engine, &mut events)?;
        }

        let claim_results = slots
            .into_iter()
            .map(|slot| match slot {
                ClaimSlot::Valid(i) => ClaimResult::computed(&states[i]),
                ClaimSlot::Invalid(result) => result,
            })
            .collect();

        let response = aggregate(
            request.end_date,
            request.strategy,
            claim_results,
            payment_results,
            events.take_events(),
            self.config.tolerance,
        );

        if response.is_consistent {
            info!("calculation complete: outstanding {}", response.totals.outstanding);
        } else {
            warn!("calculation is not consistent: outstanding {}", response.totals.outstanding);
        }

        Ok(response)
    }
}
