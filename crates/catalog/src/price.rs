use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::validate::{Validate, fatal_rule, rule};

/// A single price entry. The price type is set at creation from the
/// element's `price_type` attribute; amounts arrive rounded to two
/// decimals and tax as a 0-1 fraction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub price_type: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub tax: Option<f64>,
    pub factor: Option<f64>,
    pub lower_bound: Option<String>,
    pub territory: Option<String>,
}

impl Price {
    pub fn new(price_type: impl Into<String>) -> Self {
        Self {
            price_type: Some(price_type.into()),
            ..Self::default()
        }
    }
}

impl Validate for Price {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.price_type.as_deref().is_none_or(str::is_empty) {
            rule(strict, "price has no price type")?;
        }
        if self.amount.is_none() {
            rule(strict, "price has no amount")?;
        }
        Ok(())
    }
}

/// A validity period with its prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    pub valid_from: Option<NaiveDate>,
    pub valid_to: Option<NaiveDate>,
    pub daily_price: bool,
    pub prices: Vec<Price>,
}

impl PriceDetails {
    pub fn add_price(&mut self, price: Price) {
        self.prices.push(price);
    }
}

impl Validate for PriceDetails {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.daily_price {
            // A daily price marker cannot be exported meaningfully.
            fatal_rule("price details carry a daily price")?;
        }
        for price in &mut self.prices {
            price.validate(strict)?;
        }
        Ok(())
    }
}
