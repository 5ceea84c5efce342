use serde::{Deserialize, Serialize};

use bmeconv_core::{ConvertError, ConvertResult};

use crate::validate::{Validate, rule};

/// One product variant: a suffix appended to the product id for a given
/// feature value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub product_id_suffix: Option<String>,
    pub value: Option<String>,
    pub territory: Option<String>,
}

impl Validate for Variant {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.product_id_suffix.as_deref().is_none_or(str::is_empty) {
            rule(strict, "variant has no product id suffix")?;
        }
        if self.value.as_deref().is_none_or(str::is_empty) {
            rule(strict, "variant has no value")?;
        }
        Ok(())
    }
}

/// The ordered variants of a feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSet {
    pub order: i64,
    pub variants: Vec<Variant>,
}

impl VariantSet {
    pub fn add_variant(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

impl Validate for VariantSet {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.variants.is_empty() {
            rule(strict, "variant set contains no variants")?;
        }
        for variant in &mut self.variants {
            variant.validate(strict)?;
        }
        Ok(())
    }
}

/// A single feature. Scalar values and a variant set are mutually
/// exclusive; the named fields are settable exactly once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    name: Option<String>,
    unit: Option<String>,
    description: Option<String>,
    value_details: Option<String>,
    values: Vec<String>,
    variants: Option<VariantSet>,
}

impl Feature {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn value_details(&self) -> Option<&str> {
        self.value_details.as_deref()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn variants(&self) -> Option<&VariantSet> {
        self.variants.as_ref()
    }

    fn set_once(
        slot: &mut Option<String>,
        value: impl Into<String>,
        what: &str,
    ) -> ConvertResult<()> {
        if slot.is_some() {
            return Err(ConvertError::structure(format!("feature {what} is already set")));
        }
        *slot = Some(value.into());
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> ConvertResult<()> {
        Self::set_once(&mut self.name, name, "name")
    }

    pub fn set_unit(&mut self, unit: impl Into<String>) -> ConvertResult<()> {
        Self::set_once(&mut self.unit, unit, "unit")
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> ConvertResult<()> {
        Self::set_once(&mut self.description, description, "description")
    }

    pub fn set_value_details(&mut self, details: impl Into<String>) -> ConvertResult<()> {
        Self::set_once(&mut self.value_details, details, "value details")
    }

    /// Append a scalar value; fails while a variant set exists.
    pub fn add_value(&mut self, value: impl Into<String>) -> ConvertResult<()> {
        if self.variants.is_some() {
            return Err(ConvertError::structure(
                "a feature value cannot be added: the feature already carries variants",
            ));
        }
        self.values.push(value.into());
        Ok(())
    }

    /// Open a variant set; fails while scalar values exist or a variant
    /// set was already opened.
    pub fn start_variant_set(&mut self) -> ConvertResult<()> {
        if !self.values.is_empty() {
            return Err(ConvertError::structure(
                "variants cannot be added: the feature already carries values",
            ));
        }
        if self.variants.is_some() {
            return Err(ConvertError::structure(
                "variants cannot be added: the feature already carries variants",
            ));
        }
        self.variants = Some(VariantSet::default());
        Ok(())
    }

    pub fn set_variant_order(&mut self, order: i64) -> ConvertResult<()> {
        match self.variants.as_mut() {
            Some(set) => {
                set.order = order;
                Ok(())
            }
            None => Err(ConvertError::missing_context(
                "variant order cannot be set: the feature has no variant set",
            )),
        }
    }

    pub fn add_variant(&mut self, variant: Variant) -> ConvertResult<()> {
        match self.variants.as_mut() {
            Some(set) => {
                set.add_variant(variant);
                Ok(())
            }
            None => Err(ConvertError::missing_context(
                "a variant cannot be committed: the feature has no variant set",
            )),
        }
    }
}

/// Partial equality over name, unit, values and variants.
impl PartialEq for Feature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.unit == other.unit
            && self.values == other.values
            && self.variants == other.variants
    }
}

impl Validate for Feature {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.name.as_deref().is_none_or(str::is_empty) {
            rule(strict, "feature has no name")?;
        }
        if self.values.is_empty() && self.variants.is_none() {
            rule(
                strict,
                format!(
                    "feature '{}' has neither values nor variants",
                    self.name.as_deref().unwrap_or_default()
                ),
            )?;
        }
        if let Some(variants) = self.variants.as_mut() {
            variants.validate(strict)?;
        }
        Ok(())
    }
}

/// A named group of features referencing a classification system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    pub reference_system: Option<String>,
    pub reference_group_id: Option<String>,
    pub features: Vec<Feature>,
}

impl FeatureSet {
    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Partial equality over the reference system and the features.
impl PartialEq for FeatureSet {
    fn eq(&self, other: &Self) -> bool {
        self.reference_system == other.reference_system && self.features == other.features
    }
}

impl Validate for FeatureSet {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        for feature in &mut self.features {
            feature.validate(strict)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_set_exactly_once() {
        let mut feature = Feature::default();
        feature.set_name("Length").unwrap();
        let err = feature.set_name("Width").unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));

        feature.set_unit("mm").unwrap();
        assert!(feature.set_unit("cm").is_err());
        feature.set_description("desc").unwrap();
        assert!(feature.set_description("other").is_err());
        feature.set_value_details("details").unwrap();
        assert!(feature.set_value_details("other").is_err());
    }

    #[test]
    fn values_block_variants() {
        let mut feature = Feature::default();
        feature.add_value("10").unwrap();
        let err = feature.start_variant_set().unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));
    }

    #[test]
    fn variants_block_values() {
        let mut feature = Feature::default();
        feature.start_variant_set().unwrap();
        let err = feature.add_value("10").unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));
    }

    #[test]
    fn double_variant_set_is_rejected() {
        let mut feature = Feature::default();
        feature.start_variant_set().unwrap();
        assert!(feature.start_variant_set().is_err());
    }

    #[test]
    fn variant_without_set_is_a_context_error() {
        let mut feature = Feature::default();
        let err = feature.add_variant(Variant::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingContext(_)));
        assert!(feature.set_variant_order(1).is_err());
    }

    #[test]
    fn feature_without_content_fails_strict() {
        let mut feature = Feature::default();
        feature.set_name("Length").unwrap();
        assert!(feature.validate(true).is_err());
        assert!(feature.validate(false).is_ok());
    }

    #[test]
    fn variant_feature_validates() {
        let mut feature = Feature::default();
        feature.set_name("Volume").unwrap();
        feature.start_variant_set().unwrap();
        feature
            .add_variant(Variant {
                product_id_suffix: Some("1L".into()),
                value: Some("1".into()),
                territory: None,
            })
            .unwrap();
        assert!(feature.validate(true).is_ok());
    }

    #[test]
    fn equality_ignores_description() {
        let mut a = Feature::default();
        a.set_name("Length").unwrap();
        a.add_value("10").unwrap();
        let mut b = a.clone();
        b.set_description("only on b").unwrap();
        assert_eq!(a, b);
    }
}
