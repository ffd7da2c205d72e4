use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "TPE")]
    Tpe,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Tpe => "TPE",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TPE" => Ok(PaymentMethod::Tpe),
            "Cash" => Ok(PaymentMethod::Cash),
            other => Err(UnknownVariant {
                kind: "payment method",
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PaymentMethod {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub product_id: i64,
    pub buyer_name: String,
    #[sqlx(try_from = "String")]
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub product_id: i64,
    #[validate(length(min = 1, max = 200), custom(function = "not_blank"))]
    pub buyer_name: String,
    pub payment_method: PaymentMethod,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
