use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::claims::Claim;
use crate::errors::Result;
use crate::payments::Payment;
use crate::types::AllocationStrategy;

/// one case: claims, payments and the date interest runs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub end_date: NaiveDate,
    #[serde(default)]
    pub strategy: AllocationStrategy,
    pub claims: Vec<Claim>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl CalculationRequest {
    pub fn new(end_date: NaiveDate, strategy: AllocationStrategy) -> Self {
        Self {
            end_date,
            strategy,
            claims: Vec::new(),
            payments: Vec::new(),
        }
    }

    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payments.push(payment);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
