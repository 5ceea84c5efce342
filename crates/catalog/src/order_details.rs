use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::validate::{Validate, rule};

/// Unit codes accepted for order and content units.
const ALLOWED_UNITS: [&str; 14] = [
    "C62", "PCE", "EA", "ST", "PK", "BX", "CT", "PR", "SET", "RO", "PA", "MTR", "KGM", "LTR",
];

/// Ordering constraints of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order_unit: Option<String>,
    pub content_unit: Option<String>,
    pub quantity_min: f64,
    pub quantity_interval: f64,
    pub packing_quantity: f64,
    pub price_quantity: f64,
}

impl Default for OrderDetails {
    fn default() -> Self {
        Self {
            order_unit: Some("C62".into()),
            content_unit: Some("C62".into()),
            quantity_min: 1.0,
            quantity_interval: 1.0,
            packing_quantity: 1.0,
            price_quantity: 1.0,
        }
    }
}

impl Validate for OrderDetails {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        match self.order_unit.as_deref() {
            None | Some("") => rule(strict, "no order unit given")?,
            Some(unit) if !ALLOWED_UNITS.contains(&unit) => {
                rule(strict, format!("invalid order unit '{unit}'"))?;
            }
            Some(_) => {}
        }
        match self.content_unit.as_deref() {
            None | Some("") => rule(strict, "no content unit given")?,
            Some(unit) if !ALLOWED_UNITS.contains(&unit) => {
                rule(strict, format!("invalid content unit '{unit}'"))?;
            }
            Some(_) => {}
        }
        if strict && self.quantity_min != self.quantity_interval {
            rule(
                strict,
                "minimum order quantity and order interval should be equal",
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_model() {
        let details = OrderDetails::default();
        assert_eq!(details.order_unit.as_deref(), Some("C62"));
        assert_eq!(details.content_unit.as_deref(), Some("C62"));
        assert_eq!(details.quantity_min, 1.0);
        assert_eq!(details.quantity_interval, 1.0);
        assert_eq!(details.packing_quantity, 1.0);
        assert_eq!(details.price_quantity, 1.0);
    }

    #[test]
    fn missing_order_unit_fails_strict() {
        for unit in [None, Some(String::new())] {
            let mut details = OrderDetails {
                order_unit: unit,
                ..OrderDetails::default()
            };
            assert!(details.validate(true).is_err());
        }
    }

    #[test]
    fn unknown_units_fail_strict() {
        let mut details = OrderDetails {
            order_unit: Some("Bla".into()),
            ..OrderDetails::default()
        };
        assert!(details.validate(true).is_err());

        let mut details = OrderDetails {
            content_unit: Some("Blubb".into()),
            ..OrderDetails::default()
        };
        assert!(details.validate(true).is_err());
    }

    #[test]
    fn lenient_mode_tolerates_diverging_quantities() {
        let mut details = OrderDetails {
            quantity_min: 11.0,
            ..OrderDetails::default()
        };
        assert!(details.validate(false).is_ok());
    }

    #[test]
    fn strict_mode_requires_min_equal_interval() {
        let mut details = OrderDetails {
            quantity_min: 11.0,
            ..OrderDetails::default()
        };
        assert!(details.validate(true).is_err());

        details.quantity_interval = 11.0;
        details.packing_quantity = 12.0;
        assert!(details.validate(true).is_ok());
    }

    #[test]
    fn empty_details_compare_equal() {
        assert_eq!(OrderDetails::default(), OrderDetails::default());
    }
}
