/// partial payments - several claims, costs and an earmarked payment
use chrono::NaiveDate;
use statutory_interest_rs::{
    AllocationStrategy, CalculationConfig, CalculationRequest, Calculator, Claim, ClaimKind,
    Money, Payment, Rate, RegimeKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== partial payments example ===\n");

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).ok_or("invalid date");

    let request = CalculationRequest::new(date(2016, 1, 1)?, AllocationStrategy::MostBurdensome)
        .with_claim(
            Claim::new("V1", Money::from_major(3_000), date(2013, 2, 1)?, RegimeKind::StatutoryCompound)
                .with_cost(Money::from_major(400), Some(date(2013, 5, 1)?)),
        )
        .with_claim(Claim::new(
            "V2",
            Money::from_major(1_200),
            date(2013, 9, 1)?,
            RegimeKind::CommercialCompound,
        ))
        .with_claim(
            Claim::new("V3", Money::from_major(800), date(2014, 1, 15)?, RegimeKind::FixedRate)
                .with_kind(ClaimKind::Cost)
                .with_margin(Rate::from_percentage(6), None)
                .with_pause(date(2014, 6, 1)?, date(2014, 9, 1)?),
        )
        .with_payment(Payment::new(Money::from_major(1_500), date(2014, 12, 12)?).with_label("D1"))
        .with_payment(
            Payment::new(Money::from_major(500), date(2015, 3, 1)?)
                .with_label("D2")
                .assigned_to(["V3"]),
        );

    let response = Calculator::new(CalculationConfig::default()).calculate(&request)?;

    for payment in &response.payments {
        println!(
            "payment {} of {} on {}:",
            payment.label.as_deref().unwrap_or("-"),
            payment.amount,
            payment.date
        );
        for step in &payment.allocations {
            println!("  {:>6} {:?}: {}", step.claim_label, step.component, step.amount);
        }
    }

    println!();
    for claim in &response.claims {
        if let Some(summary) = claim.summary() {
            println!(
                "{}: interest {} + cost interest {}, outstanding {} ({:?})",
                claim.label,
                summary.interest,
                summary.cost_interest,
                summary.outstanding,
                summary.status
            );
        }
    }

    println!("\ntotal outstanding: {}", response.totals.outstanding);
    println!("consistent: {}", response.is_consistent);

    Ok(())
}
