use crate::decimal::Money;
use crate::state::ClaimLedger;
use crate::types::Component;

use super::AllocationRecord;

/// order in which a payment consumes the components of one claim
#[derive(Debug, Clone)]
pub struct PaymentWaterfall {
    order: [Component; 4],
}

impl PaymentWaterfall {
    /// art. 6:44 BW: interest on costs, costs, interest, principal
    pub fn statutory() -> Self {
        Self {
            order: [
                Component::InterestOnCost,
                Component::Cost,
                Component::InterestOnPrincipal,
                Component::Principal,
            ],
        }
    }

    /// apply up to `available` to one claim; records every non-zero step and
    /// returns what is left of `available`
    pub fn apply(
        &self,
        ledger: &mut ClaimLedger,
        available: Money,
        claim_label: &str,
        records: &mut Vec<AllocationRecord>,
    ) -> Money {
        let mut remaining = available;
        let cost_interest = ledger.cost.interest_remaining;
        let principal_interest = ledger.principal.interest_remaining;

        for &component in &self.order {
            if !remaining.is_positive() {
                break;
            }

            let applied = self.apply_to_component(component, remaining, ledger);
            if applied.is_zero() {
                continue;
            }

            remaining -= applied;
            records.push(AllocationRecord {
                claim_label: claim_label.to_string(),
                component,
                amount: applied,
                accrued_before_payment: match component {
                    Component::InterestOnCost | Component::Cost => cost_interest,
                    Component::InterestOnPrincipal | Component::Principal => principal_interest,
                },
            });
        }

        remaining
    }

    fn apply_to_component(&self, component: Component, available: Money, ledger: &mut ClaimLedger) -> Money {
        match component {
            Component::InterestOnCost => ledger.cost.pay_interest(available),
            Component::Cost => ledger.cost.pay_amount(available),
            Component::InterestOnPrincipal => ledger.principal.pay_interest(available),
            Component::Principal => ledger.principal.pay_amount(available),
        }
    }
}

impl Default for PaymentWaterfall {
    fn default() -> Self {
        Self::statutory()
    }
}
