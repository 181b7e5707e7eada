use chrono::NaiveDate;
use thiserror::Error;

use crate::decimal::Money;

#[derive(Error, Debug)]
pub enum CalculationError {
    #[error("invalid claim configuration for '{label}': {message}")]
    InvalidClaimConfiguration {
        label: String,
        message: String,
    },

    #[error("rate table does not cover {date}: earliest entry is {earliest}")]
    RateTableGap {
        date: NaiveDate,
        earliest: NaiveDate,
    },

    #[error("invalid rate table: {message}")]
    InvalidRateTable {
        message: String,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CalculationError {
    pub(crate) fn invalid_claim(label: &str, message: impl Into<String>) -> Self {
        CalculationError::InvalidClaimConfiguration {
            label: label.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalculationError>;
