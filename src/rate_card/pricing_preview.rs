use crate::rate_card::card::{ConditionType, Discount, DiscountType, Incentive, RateCard};

use serde::{Deserialize, Serialize};

/// Season length assumed when previewing `per_month` discounts.
pub const ASSUMED_SEASON_MONTHS: f64 = 6.;

/// The hypothetical guest a preview is priced for.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GuestContext {
    #[serde(default)]
    pub is_metered: bool,
    #[serde(default)]
    pub pays_in_full: bool,
    #[serde(default)]
    pub payment_method: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AppliedDiscount {
    pub name: String,
    pub amount: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EarnedIncentive {
    pub name: String,
    pub value: f64,
    #[serde(rename = "type")]
    pub incentive_type: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricingPreview {
    pub total: f64,
    pub applied_discounts: Vec<AppliedDiscount>,
    pub earned_incentives: Vec<EarnedIncentive>,
}

/// Price a rate card for display.
///
/// Active discounts are applied in list order against the running total, so a
/// percentage discount listed after a fixed one is taken off the reduced
/// amount. `priority` and `stackable` are not consulted and the total is not
/// clamped at zero.
pub fn preview_pricing(card: &RateCard, guest: &GuestContext) -> PricingPreview {
    let mut total = card.base_rate;
    let mut applied_discounts = vec![];

    for discount in card.discounts.iter().filter(|discount| discount.is_active) {
        if !discount_applies(discount, guest) {
            continue;
        }
        let Some(amount) = discount_reduction(discount, total) else {
            continue;
        };

        applied_discounts.push(AppliedDiscount {
            name: discount.name.clone(),
            amount,
        });
        total -= amount;
    }

    let earned_incentives = card
        .incentives
        .iter()
        .filter(|incentive| incentive.is_active && incentive_earned(incentive, guest))
        .map(|incentive| EarnedIncentive {
            name: incentive.name.clone(),
            value: incentive.incentive_value,
            incentive_type: incentive.incentive_type.clone(),
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        rate_card = %card.name,
        base_rate = card.base_rate,
        total,
        discounts = applied_discounts.len(),
        incentives = earned_incentives.len(),
        "priced rate card preview"
    );

    PricingPreview {
        total,
        applied_discounts,
        earned_incentives,
    }
}

fn discount_applies(discount: &Discount, guest: &GuestContext) -> bool {
    match discount.condition_type {
        ConditionType::MeteredUtilities => guest.is_metered,
        ConditionType::PayInFull => guest.pays_in_full,
        ConditionType::PaymentMethod => match guest.payment_method.as_deref() {
            Some(method) => discount
                .allowed_payment_methods()
                .iter()
                .any(|allowed| allowed == method),
            None => false,
        },
        ConditionType::Other => false,
    }
}

// None when the discount type has no known unit
fn discount_reduction(discount: &Discount, running_total: f64) -> Option<f64> {
    match discount.discount_type {
        DiscountType::FixedAmount => Some(discount.discount_amount),
        DiscountType::Percentage => Some(running_total * discount.discount_amount / 100.),
        DiscountType::PerMonth => Some(discount.discount_amount * ASSUMED_SEASON_MONTHS),
        DiscountType::Unknown => None,
    }
}

// only pay-in-full incentives can be previewed
fn incentive_earned(incentive: &Incentive, guest: &GuestContext) -> bool {
    incentive.condition_type == ConditionType::PayInFull && guest.pays_in_full
}
