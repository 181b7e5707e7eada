pub mod calculator;
pub mod claims;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod interest;
pub mod payments;
pub mod report;
pub mod request;
pub mod state;
pub mod types;

// re-export key types
pub use calculator::Calculator;
pub use claims::{Claim, ValidatedClaim};
pub use config::CalculationConfig;
pub use decimal::{Money, Rate};
pub use errors::{CalculationError, Result};
pub use events::{Event, EventStore};
pub use interest::{AccrualEngine, InterestPeriod, PeriodSplitter, RateEntry, RateTable};
pub use payments::{
    AllocationRecord, AllocationWarning, Payment, PaymentAllocator, PaymentWaterfall,
    UnappliedReason,
};
pub use report::{
    CalculationResponse, ClaimOutcome, ClaimResult, ClaimSummary, PaymentResult, Totals,
};
pub use request::CalculationRequest;
pub use types::{
    AllocationStrategy, BalanceSide, ClaimId, ClaimKind, ClaimStatus, Component, PauseRange,
    PaymentId, RateRegime, RegimeKind,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
