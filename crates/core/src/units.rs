//! Unit-code mapping.
//!
//! Feature units arrive as codes from one of two vocabularies: BMEcat
//! order-unit codes ("MTR", "KGM", ...) or ETIM unit ids ("EU570448", ...).
//! Both map onto canonical SI unit strings; codes from neither vocabulary
//! pass through verbatim.

use std::collections::HashMap;

use serde::Deserialize;

/// Immutable two-vocabulary unit mapper, built once and shared by all
/// parses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UnitMapper {
    #[serde(default)]
    bmecat: HashMap<String, String>,
    #[serde(default)]
    etim: HashMap<String, String>,
}

impl UnitMapper {
    pub fn new(bmecat: HashMap<String, String>, etim: HashMap<String, String>) -> Self {
        Self { bmecat, etim }
    }

    /// The built-in code tables.
    pub fn with_defaults() -> Self {
        let bmecat = [
            ("C62", ""),
            ("CMT", "cm"),
            ("MTR", "m"),
            ("MMT", "mm"),
            ("KMT", "km"),
            ("GRM", "g"),
            ("KGM", "kg"),
            ("MGM", "mg"),
            ("LTR", "l"),
            ("MLT", "ml"),
            ("HUR", "h"),
            ("MIN", "min"),
            ("SEC", "s"),
            ("WTT", "W"),
            ("KWT", "kW"),
            ("VLT", "V"),
            ("AMP", "A"),
            ("BAR", "bar"),
            ("CEL", "°C"),
            ("MTK", "m²"),
            ("MTQ", "m³"),
            ("NEW", "N"),
            ("PAL", "Pa"),
        ];
        let etim = [
            ("EU570448", "mm"),
            ("EU570449", "cm"),
            ("EU570450", "m"),
            ("EU570551", "g"),
            ("EU570552", "kg"),
            ("EU570013", "A"),
            ("EU570015", "V"),
            ("EU570016", "W"),
            ("EU570060", "bar"),
            ("EU570120", "°C"),
            ("EU570126", "l"),
            ("EU570417", "h"),
        ];
        let to_map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            bmecat: to_map(&bmecat),
            etim: to_map(&etim),
        }
    }

    /// Normalize a raw unit code: BMEcat vocabulary first, then ETIM,
    /// otherwise the code is kept verbatim.
    pub fn normalize<'a>(&'a self, code: &'a str) -> &'a str {
        self.bmecat
            .get(code)
            .or_else(|| self.etim.get(code))
            .map(String::as_str)
            .unwrap_or(code)
    }

    pub fn has_bmecat_code(&self, code: &str) -> bool {
        self.bmecat.contains_key(code)
    }

    pub fn has_etim_code(&self, code: &str) -> bool {
        self.etim.contains_key(code)
    }
}
