/// quick start - one claim, one payment, statutory interest to today
use chrono::NaiveDate;
use statutory_interest_rs::{
    AllocationStrategy, CalculationConfig, CalculationRequest, Calculator, Claim, Money, Payment,
    RegimeKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date");

    // an invoice of 10,000 due since 1 march 2022, compounding yearly
    let request = CalculationRequest::new(date(2025, 1, 1)?, AllocationStrategy::MostBurdensome)
        .with_claim(Claim::new(
            "INV-2022-001",
            Money::from_major(10_000),
            date(2022, 3, 1)?,
            RegimeKind::StatutoryCompound,
        ))
        .with_payment(Payment::new(Money::from_major(2_500), date(2023, 6, 15)?));

    let response = Calculator::new(CalculationConfig::default()).calculate(&request)?;

    println!("{}", response.to_json()?);

    Ok(())
}
