use chrono::NaiveDate;
use log::debug;

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::interest::compound::{capitalize_interest, CapitalizationResult};
use crate::interest::rates::RateTable;
use crate::interest::splitter::{PeriodSplitter, Timeline};
use crate::interest::InterestPeriod;
use crate::state::ComponentLedger;
use crate::types::RateRegime;

/// fixed year basis; statutory interest is not computed actual/actual
pub const DAYS_PER_YEAR: u32 = 365;

/// result of accruing one side of a claim over a date range
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccrualOutcome {
    pub periods: Vec<InterestPeriod>,
    pub capitalizations: Vec<CapitalizationResult>,
    pub interest: Money,
}

/// engine for accruing interest
pub struct AccrualEngine<'a> {
    rates: &'a RateTable,
    splitter: PeriodSplitter<'a>,
}

impl<'a> AccrualEngine<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self {
            rates,
            splitter: PeriodSplitter::new(rates),
        }
    }

    /// annual rate of a regime on `date`
    pub fn rate_on(&self, regime: &RateRegime, date: NaiveDate) -> Result<Rate> {
        match *regime {
            RateRegime::StatutoryCompound | RateRegime::StatutorySimple => {
                self.rates.rate_for(date, false)
            }
            RateRegime::CommercialCompound | RateRegime::CommercialSimple => {
                self.rates.rate_for(date, true)
            }
            RateRegime::FixedRate { rate } => Ok(rate),
            RateRegime::StatutoryPlusMargin { margin, effective_from } => {
                let base = self.rates.rate_for(date, false)?;
                Ok(if date >= effective_from { base + margin } else { base })
            }
            RateRegime::CommercialPlusMargin { margin, effective_from } => {
                let base = self.rates.rate_for(date, true)?;
                Ok(if date >= effective_from { base + margin } else { base })
            }
        }
    }

    /// simple interest on a fixed 365-day year, rounded to cents
    pub fn calculate_simple_interest(&self, basis: Money, rate: Rate, days: u32) -> Money {
        basis.apply_rate(rate, days, DAYS_PER_YEAR)
    }

    /// accrue interest on `ledger` over [from, to), capitalizing on
    /// anniversaries for compounding regimes
    pub fn accrue(
        &self,
        ledger: &mut ComponentLedger,
        timeline: &Timeline,
        regime: &RateRegime,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<AccrualOutcome> {
        let mut outcome = AccrualOutcome::default();

        for span in self.splitter.split(timeline, from, to) {
            let days = span.day_count();
            let basis = ledger.basis();
            let (rate, interest) = if span.is_pause {
                (Rate::ZERO, Money::ZERO)
            } else {
                let rate = self.rate_on(regime, span.start)?;
                (rate, self.calculate_simple_interest(basis, rate, days))
            };

            ledger.accrue(interest);
            outcome.interest += interest;
            outcome.periods.push(InterestPeriod {
                start: span.start,
                end: span.end,
                day_count: days,
                principal_basis: basis,
                rate,
                interest_amount: interest,
                accrued_balance: ledger.interest_remaining,
                is_pause: span.is_pause,
                is_capitalization_point: span.is_capitalization_point,
            });

            if span.is_capitalization_point {
                if let Some(cap) = capitalize_interest(ledger, span.end) {
                    debug!(
                        "capitalized {} on {}: basis {} -> {}",
                        cap.amount_capitalized, cap.date, cap.previous_basis, cap.new_basis
                    );
                    outcome.capitalizations.push(cap);
                }
            }
        }

        Ok(outcome)
    }
}
