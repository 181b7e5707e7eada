use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::interest::RateTable;

/// calculation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationConfig {
    #[serde(default)]
    pub rate_table: RateTable,
    /// allowed drift in the outstanding balance check
    #[serde(default = "default_tolerance")]
    pub tolerance: Money,
}

fn default_tolerance() -> Money {
    Money::from_decimal(dec!(0.01))
}

impl CalculationConfig {
    /// dutch statutory table with a one-cent tolerance
    pub fn dutch() -> Self {
        Self {
            rate_table: RateTable::dutch_statutory(),
            tolerance: default_tolerance(),
        }
    }

    pub fn with_rate_table(mut self, rate_table: RateTable) -> Self {
        self.rate_table = rate_table;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Money) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// load from json; the rate table is validated like any custom table
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for CalculationConfig {
    fn default() -> Self {
        Self::dutch()
    }
}
