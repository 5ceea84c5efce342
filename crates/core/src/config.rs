//! Converter configuration.
//!
//! Explicit values constructed once before any parse begins and passed into
//! the importer and exporter; nothing here is a hidden global.

use serde::Deserialize;

use crate::blacklist::Blacklist;
use crate::error::{ConvertError, ConvertResult};
use crate::number::NumberFormat;
use crate::units::UnitMapper;

/// Separator presets matching the common catalog locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separators {
    /// "10,000.00"
    English,
    /// "10.000,00"
    German,
}

impl Separators {
    pub fn number_format(self) -> NumberFormat {
        match self {
            Separators::English => NumberFormat::ENGLISH,
            Separators::German => NumberFormat::GERMAN,
        }
    }
}

impl std::str::FromStr for Separators {
    type Err = ConvertError;

    fn from_str(s: &str) -> ConvertResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "english" => Ok(Separators::English),
            "german" => Ok(Separators::German),
            other => Err(ConvertError::configuration(format!(
                "unknown separator preset '{other}' (expected 'english' or 'german')"
            ))),
        }
    }
}

/// Core configuration consumed by the parse state machine.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    number_format: NumberFormat,
    date_format: String,
    strict: bool,
}

impl ConverterConfig {
    pub fn new(
        number_format: NumberFormat,
        date_format: impl Into<String>,
        strict: bool,
    ) -> ConvertResult<Self> {
        let date_format = date_format.into();
        if date_format.trim().is_empty() {
            return Err(ConvertError::configuration("date format must not be empty"));
        }
        Ok(Self {
            number_format,
            date_format,
            strict,
        })
    }

    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    /// strftime-style format string used for `DATE` fields.
    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Whether validation violations abort the conversion.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// Process-wide read-only mapping tables, shared by all parses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mappings {
    #[serde(default)]
    pub units: UnitMapper,
    #[serde(default)]
    pub feature_blacklist: Blacklist,
    #[serde(default)]
    pub feature_set_blacklist: Blacklist,
}

impl Mappings {
    pub fn with_default_units() -> Self {
        Self {
            units: UnitMapper::with_defaults(),
            feature_blacklist: Blacklist::empty(),
            feature_set_blacklist: Blacklist::empty(),
        }
    }

    /// Load overrides from a JSON document of the shape
    /// `{"units": {"bmecat": {..}, "etim": {..}}, "feature_blacklist": [..],
    /// "feature_set_blacklist": [..]}`.
    pub fn from_json(json: &str) -> ConvertResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ConvertError::configuration(format!("invalid mappings file: {e}")))
    }
}
