/// json request - the request and response shapes used by an http shell
use statutory_interest_rs::{CalculationConfig, CalculationRequest, Calculator};

const REQUEST: &str = r#"{
    "end_date": "2024-12-31",
    "strategy": "B",
    "claims": [
        {
            "label": "V1",
            "amount": "130000.00",
            "start_date": "2023-01-01",
            "rate_regime": "StatutorySimple"
        },
        {
            "label": "V2",
            "amount": "5000.00",
            "start_date": "2023-01-01",
            "rate_regime": "StatutorySimple",
            "cost_amount": "250.00",
            "cost_interest_start_date": "2023-04-01"
        },
        {
            "label": "V3",
            "amount": "2000.00",
            "start_date": "2023-06-01",
            "rate_regime": "StatutoryPlusMargin",
            "fixed_margin": "0.02",
            "margin_effective_date": "2024-01-01"
        }
    ],
    "payments": [
        {"label": "D1", "amount": "6000.00", "date": "2023-01-01"},
        {"label": "D2", "amount": "1000.00", "date": "2024-03-01", "assigned_claim_labels": ["V3"]}
    ]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let request = CalculationRequest::from_json(REQUEST)?;
    let calculator = Calculator::new(CalculationConfig::default());

    let response = calculator.calculate(&request)?;
    println!("{}", response.to_json()?);

    Ok(())
}
