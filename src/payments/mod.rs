pub mod allocator;
pub mod waterfall;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{CalculationError, Result};
use crate::types::{Component, PaymentId};

pub use allocator::{proportional_shares, PaymentAllocator};
pub use waterfall::PaymentWaterfall;

/// a partial payment (deelbetaling) as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default = "Uuid::new_v4")]
    pub id: PaymentId,
    #[serde(default)]
    pub label: Option<String>,
    pub amount: Money,
    pub date: NaiveDate,
    /// claims this payment is earmarked for, in order; empty means strategy
    #[serde(default)]
    pub assigned_claim_labels: Vec<String>,
}

impl Payment {
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            amount,
            date,
            assigned_claim_labels: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn assigned_to<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_claim_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(CalculationError::InvalidPaymentAmount { amount: self.amount });
        }
        Ok(())
    }
}

/// one step of a payment applied to one claim component (toerekening)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub claim_label: String,
    pub component: Component,
    pub amount: Money,
    /// unpaid interest of the step's side (cost or principal) immediately
    /// before the payment
    pub accrued_before_payment: Money,
}

/// why part of a payment was not absorbed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnappliedReason {
    /// no claim had started on the payment date
    NoActiveClaims,
    /// every eligible claim was paid off
    ExceedsOutstanding,
    /// dated after the calculation end date
    AfterEndDate,
}

/// non-fatal allocation findings, reported with the payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AllocationWarning {
    UnknownClaimLabel { label: String },
    ClaimNotActive { label: String, start_date: NaiveDate },
    ClaimAlreadySatisfied { label: String },
    NoActiveClaims { amount: Money },
    ExceedsOutstanding { amount: Money },
    AfterEndDate { amount: Money },
}

impl AllocationWarning {
    pub fn unapplied(amount: Money, reason: UnappliedReason) -> Self {
        match reason {
            UnappliedReason::NoActiveClaims => Self::NoActiveClaims { amount },
            UnappliedReason::ExceedsOutstanding => Self::ExceedsOutstanding { amount },
            UnappliedReason::AfterEndDate => Self::AfterEndDate { amount },
        }
    }
}

/// what happened to a single payment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentOutcome {
    pub records: Vec<AllocationRecord>,
    pub warnings: Vec<AllocationWarning>,
    pub applied: Money,
    pub unapplied: Money,
}
