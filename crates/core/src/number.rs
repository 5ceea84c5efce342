//! Localized number parsing.
//!
//! Catalog documents carry numbers in the supplier's locale ("10.000,00"
//! in german documents, "10,000.00" in english ones). The separator pair is
//! supplied by configuration and converted to a canonical `f64` here.

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// A validated decimal/thousands separator pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    decimal_separator: char,
    thousands_separator: char,
}

impl NumberFormat {
    /// "10.000,00"
    pub const GERMAN: NumberFormat = NumberFormat {
        decimal_separator: ',',
        thousands_separator: '.',
    };

    /// "10,000.00"
    pub const ENGLISH: NumberFormat = NumberFormat {
        decimal_separator: '.',
        thousands_separator: ',',
    };

    /// Separators must be distinct; equal separators make numbers ambiguous.
    pub fn new(decimal_separator: char, thousands_separator: char) -> ConvertResult<Self> {
        if decimal_separator == thousands_separator {
            return Err(ConvertError::configuration(
                "decimal separator and thousands separator must not be equal",
            ));
        }
        Ok(Self {
            decimal_separator,
            thousands_separator,
        })
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub fn thousands_separator(&self) -> char {
        self.thousands_separator
    }

    /// Convert localized numeric text to a canonical value.
    pub fn parse(&self, text: &str) -> ConvertResult<f64> {
        let canonical: String = text
            .trim()
            .chars()
            .filter(|c| *c != self.thousands_separator)
            .map(|c| if c == self.decimal_separator { '.' } else { c })
            .collect();
        canonical
            .parse::<f64>()
            .map_err(|_| ConvertError::validation(format!("invalid numeric value '{text}'")))
    }

    /// Parse a tax field: a trailing percent sign is tolerated and
    /// percentage-like magnitudes (>1) are rescaled into a 0-1 fraction.
    pub fn parse_tax(&self, text: &str) -> ConvertResult<f64> {
        let stripped = text.replace('%', "");
        let mut value = self.parse(stripped.trim())?;
        if value > 1.0 {
            value /= 100.0;
        }
        Ok(round2(value))
    }
}

/// Round to two decimal places, the precision prices are carried in.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
