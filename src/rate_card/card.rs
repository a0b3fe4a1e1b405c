use std::{io::BufReader, path::Path};

use anyhow::{Context, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConditionType {
    MeteredUtilities,
    PayInFull,
    PaymentMethod,
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    FixedAmount,
    Percentage,
    PerMonth,
    #[serde(other)]
    Unknown,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    #[serde(default)]
    pub name: String,
    pub condition_type: ConditionType,
    #[serde(default)]
    pub condition_value: Option<Value>,
    pub discount_type: DiscountType,
    pub discount_amount: f64,
    // carried for display, the preview does not look at these
    #[serde(default)]
    pub stackable: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub is_active: bool,
}

impl Discount {
    /// Payment methods a `payment_method` discount accepts.
    ///
    /// The condition value is either a JSON-encoded string (`"[\"ach\"]"`) or
    /// the array itself. Anything else is an empty list.
    pub fn allowed_payment_methods(&self) -> Vec<String> {
        let methods = match &self.condition_value {
            Some(Value::String(encoded)) => serde_json::from_str::<Vec<String>>(encoded).ok(),
            Some(value @ Value::Array(_)) => serde_json::from_value::<Vec<String>>(value.clone()).ok(),
            _ => None,
        };

        methods.unwrap_or_else(|| {
            tracing::debug!(
                discount = %self.name,
                condition_value = ?self.condition_value,
                "payment method condition is not a list of strings"
            );
            vec![]
        })
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Incentive {
    #[serde(default)]
    pub name: String,
    pub condition_type: ConditionType,
    #[serde(default)]
    pub condition_value: Option<Value>,
    pub incentive_type: String,
    pub incentive_value: f64,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RateCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season_id: Option<String>,
    pub base_rate: f64,
    #[serde(default)]
    pub discounts: Vec<Discount>,
    #[serde(default)]
    pub incentives: Vec<Incentive>,
}

pub fn read_rate_card(path: &Path) -> Result<RateCard, Error> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.to_string_lossy()))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to decode rate card from {}", path.to_string_lossy()))
}
