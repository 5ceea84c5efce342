//! `bmeconv-core` — conversion foundation building blocks.
//!
//! This crate contains the pieces shared by import and export: the error
//! taxonomy, the converter configuration, localized number parsing, the
//! unit-code mappers and the feature blacklists. No XML concerns live here.

pub mod blacklist;
pub mod config;
pub mod error;
pub mod number;
pub mod units;

pub use blacklist::Blacklist;
pub use config::{ConverterConfig, Mappings, Separators};
pub use error::{ConvertError, ConvertResult};
pub use number::{NumberFormat, round2};
pub use units::UnitMapper;
