use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::payments::UnappliedReason;
use crate::types::{BalanceSide, ClaimId, Component, PaymentId};

/// audit events emitted during a calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // interest events
    InterestCapitalized {
        claim_id: ClaimId,
        claim_label: String,
        side: BalanceSide,
        date: NaiveDate,
        amount: Money,
        new_basis: Money,
    },

    // payment events
    PaymentApplied {
        payment_id: PaymentId,
        claim_label: String,
        component: Component,
        amount: Money,
        date: NaiveDate,
    },
    PaymentUnapplied {
        payment_id: PaymentId,
        amount: Money,
        reason: UnappliedReason,
        date: NaiveDate,
    },

    // status events
    ClaimSatisfied {
        claim_id: ClaimId,
        claim_label: String,
        date: NaiveDate,
    },
}

/// event store for collecting events during a calculation
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }
}
