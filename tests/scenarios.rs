use chrono::NaiveDate;
use rust_decimal_macros::dec;
use statutory_interest_rs::{
    AllocationStrategy, CalculationConfig, CalculationError, CalculationRequest, Calculator, Claim,
    ClaimStatus, ClaimSummary, Component, Event, Money, Payment, Rate, RateTable, RegimeKind,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn flat_calculator() -> Calculator {
    let table = RateTable::flat(date(2000, 1, 1), Rate::from_percentage(4), Rate::from_percentage(8));
    Calculator::new(CalculationConfig::default().with_rate_table(table))
}

fn dutch_calculator() -> Calculator {
    Calculator::new(CalculationConfig::default())
}

fn summary<'a>(response: &'a statutory_interest_rs::CalculationResponse, label: &str) -> &'a ClaimSummary {
    response
        .claim(label)
        .and_then(|c| c.summary())
        .unwrap_or_else(|| panic!("no computed claim {}", label))
}

#[test]
fn periods_cover_every_day_exactly_once() {
    let start = date(2013, 2, 1);
    let end = date(2016, 1, 1);
    let request = CalculationRequest::new(end, AllocationStrategy::MostBurdensome)
        .with_claim(
            Claim::new("V1", Money::from_major(3_000), start, RegimeKind::StatutoryCompound)
                .with_pause(date(2014, 6, 1), date(2014, 9, 1)),
        )
        .with_claim(Claim::new("V2", Money::from_major(1_200), start, RegimeKind::CommercialSimple))
        .with_payment(Payment::new(Money::from_major(300), date(2014, 12, 12)));

    let response = dutch_calculator().calculate(&request).unwrap();

    for label in ["V1", "V2"] {
        let periods = &summary(&response, label).periods;
        let days: i64 = periods.iter().map(|p| i64::from(p.day_count)).sum();
        assert_eq!(days, (end - start).num_days());

        // contiguous, no overlap
        for pair in periods.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(periods.first().unwrap().start, start);
        assert_eq!(periods.last().unwrap().end, end);
    }
}

#[test]
fn pause_accrues_no_interest() {
    let request = CalculationRequest::new(date(2024, 1, 1), AllocationStrategy::MostBurdensome).with_claim(
        Claim::new("V1", Money::from_major(10_000), date(2023, 1, 1), RegimeKind::StatutorySimple)
            .with_pause(date(2023, 3, 1), date(2023, 4, 1)),
    );

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    let pause: Vec<_> = v1.periods.iter().filter(|p| p.is_pause).collect();
    assert_eq!(pause.len(), 1);
    assert_eq!(pause[0].day_count, 31);
    assert_eq!(pause[0].interest_amount, Money::ZERO);

    // 59 days before, 275 days after the pause
    assert_eq!(v1.interest, Money::from(dec!(64.66)) + Money::from(dec!(301.37)));
    assert!(v1.interest < Money::from_major(400));
}

#[test]
fn ledger_balances_after_mixed_payments() {
    let request = CalculationRequest::new(date(2016, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(
            Claim::new("V1", Money::from_major(3_000), date(2013, 2, 1), RegimeKind::StatutoryCompound)
                .with_cost(Money::from_major(400), Some(date(2013, 5, 1))),
        )
        .with_claim(Claim::new(
            "V2",
            Money::from_major(1_200),
            date(2013, 9, 1),
            RegimeKind::CommercialCompound,
        ))
        .with_claim(
            Claim::new("V3", Money::from_major(800), date(2014, 1, 15), RegimeKind::FixedRate)
                .with_margin(Rate::from_percentage(6), None),
        )
        .with_payment(Payment::new(Money::from_major(1_500), date(2014, 12, 12)))
        .with_payment(Payment::new(Money::from_major(500), date(2015, 3, 1)).assigned_to(["V3"]))
        .with_payment(Payment::new(Money::from(dec!(2750.55)), date(2015, 9, 28)));

    let response = dutch_calculator().calculate(&request).unwrap();

    assert!(response.is_consistent);
    let tolerance = Money::from(dec!(0.01));
    for claim in &response.claims {
        let s = claim.summary().unwrap();
        assert!(s.outstanding.approx_eq(s.expected_outstanding(), tolerance));
    }
    assert_eq!(response.totals.allocated, response.totals.payments_processed);
    assert_eq!(response.totals.payments_received, Money::from(dec!(4750.55)));
}

#[test]
fn payment_follows_component_order() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(
            Claim::new("V1", Money::from_major(1_000), date(2022, 1, 1), RegimeKind::StatutorySimple)
                .with_cost(Money::from_major(100), Some(date(2022, 1, 1))),
        )
        .with_payment(Payment::new(Money::from_major(150), date(2023, 1, 1)));

    let response = flat_calculator().calculate(&request).unwrap();

    let steps: Vec<_> = response.payments[0]
        .allocations
        .iter()
        .map(|a| (a.component, a.amount))
        .collect();
    assert_eq!(
        steps,
        vec![
            (Component::InterestOnCost, Money::from_major(4)),
            (Component::Cost, Money::from_major(100)),
            (Component::InterestOnPrincipal, Money::from_major(40)),
            (Component::Principal, Money::from_major(6)),
        ]
    );
    assert_eq!(summary(&response, "V1").outstanding, Money::from_major(994));
}

#[test]
fn small_payment_never_reaches_principal() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(
            Claim::new("V1", Money::from_major(1_000), date(2022, 1, 1), RegimeKind::StatutorySimple)
                .with_cost(Money::from_major(100), Some(date(2022, 1, 1))),
        )
        .with_payment(Payment::new(Money::from_major(50), date(2023, 1, 1)));

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    assert_eq!(v1.paid_interest_on_cost, Money::from_major(4));
    assert_eq!(v1.paid_cost, Money::from_major(46));
    assert_eq!(v1.paid_interest, Money::ZERO);
    assert_eq!(v1.paid_principal, Money::ZERO);
}

#[test]
fn tied_claims_split_in_proportion() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(Claim::new("V1", Money::from_major(130_000), date(2023, 1, 1), RegimeKind::StatutorySimple))
        .with_claim(Claim::new("V2", Money::from_major(5_000), date(2023, 1, 1), RegimeKind::StatutorySimple))
        .with_payment(Payment::new(Money::from_major(6_000), date(2023, 1, 1)));

    let response = flat_calculator().calculate(&request).unwrap();

    assert_eq!(summary(&response, "V1").paid_principal, Money::from(dec!(5777.78)));
    assert_eq!(summary(&response, "V2").paid_principal, Money::from(dec!(222.22)));
    assert!(response.is_consistent);
}

#[test]
fn interest_capitalizes_on_the_anniversary() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome).with_claim(
        Claim::new("V1", Money::from_major(10_000), date(2021, 1, 1), RegimeKind::StatutoryCompound),
    );

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    assert_eq!(v1.periods[0].interest_amount, Money::from_major(400));
    assert!(v1.periods[0].is_capitalization_point);
    assert_eq!(v1.periods[1].principal_basis, Money::from_major(10_400));
    assert_eq!(v1.interest, Money::from_major(816));
    assert_eq!(v1.outstanding, Money::from_major(10_816));
    assert!(response.events.iter().any(|e| matches!(
        e,
        Event::InterestCapitalized { date: d, amount, .. }
            if *d == date(2022, 1, 1) && *amount == Money::from_major(400)
    )));
}

#[test]
fn anniversary_on_a_payment_date_still_capitalizes() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(Claim::new("V1", Money::from_major(10_000), date(2021, 1, 1), RegimeKind::StatutoryCompound))
        .with_payment(Payment::new(Money::from_major(100), date(2022, 1, 1)));

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    // 400 capitalized, 100 of it paid: second year runs on 10,300
    assert_eq!(v1.periods[1].principal_basis, Money::from_major(10_300));
    assert_eq!(v1.interest, Money::from_major(812));
    assert_eq!(v1.outstanding, Money::from_major(10_712));
}

#[test]
fn cost_interest_runs_on_its_own_timeline() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome).with_claim(
        Claim::new("V1", Money::from_major(1_000), date(2021, 1, 1), RegimeKind::StatutoryCompound)
            .with_cost(Money::from_major(500), Some(date(2021, 7, 1))),
    );

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    assert_eq!(v1.cost_interest_start_date, Some(date(2021, 7, 1)));
    assert_eq!(v1.cost_periods.len(), 2);
    assert_eq!(v1.cost_periods[0].start, date(2021, 7, 1));
    // anniversary of the cost start, not of the claim start
    assert_eq!(v1.cost_periods[0].end, date(2022, 7, 1));
    assert!(v1.cost_periods[0].is_capitalization_point);
    assert_eq!(v1.cost_periods[0].interest_amount, Money::from_major(20));
    assert_eq!(v1.cost_periods[1].principal_basis, Money::from_major(520));
    assert_eq!(v1.cost_periods[1].interest_amount, Money::from(dec!(10.49)));
    assert_eq!(v1.cost_interest, Money::from(dec!(30.49)));
    assert_eq!(v1.capitalized_cost_interest, Money::from_major(20));

    // principal side keeps its January anniversaries
    assert_eq!(v1.interest, Money::from(dec!(81.60)));
    assert_eq!(v1.outstanding, Money::from(dec!(1612.09)));
}

#[test]
fn simple_interest_reference_value() {
    let request = CalculationRequest::new(date(2023, 7, 1), AllocationStrategy::MostBurdensome).with_claim(
        Claim::new("V1", Money::from_major(10_000), date(2023, 1, 1), RegimeKind::StatutorySimple),
    );

    let response = flat_calculator().calculate(&request).unwrap();
    let v1 = summary(&response, "V1");

    assert_eq!(v1.periods[0].day_count, 181);
    assert_eq!(v1.interest, Money::from(dec!(198.36)));
    assert_eq!(v1.outstanding, Money::from(dec!(10198.36)));
    assert_eq!(v1.status, ClaimStatus::Open);
}

#[test]
fn assigned_payment_takes_precedence() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::MostBurdensome)
        .with_claim(Claim::new("HIGH", Money::from_major(1_000), date(2023, 1, 1), RegimeKind::CommercialSimple))
        .with_claim(Claim::new("LOW", Money::from_major(500), date(2023, 1, 1), RegimeKind::StatutorySimple))
        .with_payment(Payment::new(Money::from_major(700), date(2023, 1, 1)).assigned_to(["LOW"]));

    let response = flat_calculator().calculate(&request).unwrap();

    let allocations = &response.payments[0].allocations;
    assert_eq!(allocations[0].claim_label, "LOW");
    assert_eq!(allocations[0].amount, Money::from_major(500));
    // the remainder follows the strategy
    assert_eq!(allocations[1].claim_label, "HIGH");
    assert_eq!(allocations[1].amount, Money::from_major(200));
    assert_eq!(summary(&response, "LOW").status, ClaimStatus::Satisfied);
}

#[test]
fn oldest_first_ignores_rates() {
    let request = CalculationRequest::new(date(2023, 1, 1), AllocationStrategy::OldestFirst)
        .with_claim(Claim::new("NEW", Money::from_major(1_000), date(2022, 6, 1), RegimeKind::CommercialSimple))
        .with_claim(Claim::new("OLD", Money::from_major(1_000), date(2022, 1, 1), RegimeKind::StatutorySimple))
        .with_payment(Payment::new(Money::from_major(100), date(2022, 7, 1)));

    let response = flat_calculator().calculate(&request).unwrap();

    assert!(response.payments[0].allocations.iter().all(|a| a.claim_label == "OLD"));
}

#[test]
fn rate_table_gap_is_fatal() {
    let request = CalculationRequest::new(date(2005, 1, 1), AllocationStrategy::MostBurdensome).with_claim(
        Claim::new("V1", Money::from_major(1_000), date(2001, 1, 1), RegimeKind::StatutorySimple),
    );

    let err = dutch_calculator().calculate(&request).unwrap_err();
    assert!(matches!(err, CalculationError::RateTableGap { .. }));
}

#[test]
fn json_round_trip_through_the_calculator() {
    let json = r#"{
        "end_date": "2023-07-01",
        "strategy": "A",
        "claims": [
            {"label": "V1", "amount": "10000", "start_date": "2023-01-01", "rate_regime": "StatutorySimple"}
        ]
    }"#;
    let request = CalculationRequest::from_json(json).unwrap();
    let response = flat_calculator().calculate(&request).unwrap();

    let out = response.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["is_consistent"], serde_json::Value::Bool(true));
    assert_eq!(value["totals"]["interest"], serde_json::Value::String("198.36".to_string()));
}
