use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bmeconv_core::{ConvertError, ConvertResult};

use crate::catalog::Disposition;
use crate::feature::{FeatureSet, VariantSet};
use crate::mime::Mime;
use crate::order_details::OrderDetails;
use crate::price::PriceDetails;
use crate::product_details::ProductDetails;
use crate::reference::Reference;
use crate::treatment_class::TreatmentClass;
use crate::validate::{Validate, commit_ordered, rule};

/// Aggregate root: a single catalog product.
///
/// Created when its opening event fires, mutated by the handlers active
/// while its context is open, committed into a disposition bucket on close.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Option<String>,
    pub disposition: Disposition,
    pub details: Option<ProductDetails>,
    pub order_details: Option<OrderDetails>,
    pub price_details: Vec<PriceDetails>,
    pub mime_info: Vec<Mime>,
    pub feature_sets: Vec<FeatureSet>,
    pub references: Vec<Reference>,
    /// `(order, feature name, variant set)` tuples derived from features.
    pub variants: Vec<(i64, String, VariantSet)>,
    /// Currently inert; carried for forward compatibility.
    pub user_defined_extensions: BTreeMap<String, String>,
}

impl Product {
    pub fn new(disposition: Disposition) -> Self {
        Self {
            disposition,
            ..Self::default()
        }
    }

    fn display_id(&self) -> &str {
        self.product_id.as_deref().unwrap_or("<unknown>")
    }

    pub fn details_mut(&mut self) -> ConvertResult<&mut ProductDetails> {
        self.details
            .as_mut()
            .ok_or_else(|| ConvertError::missing_context("the product has no details yet"))
    }

    pub fn order_details_mut(&mut self) -> ConvertResult<&mut OrderDetails> {
        self.order_details
            .as_mut()
            .ok_or_else(|| ConvertError::missing_context("the product has no order details yet"))
    }

    pub fn add_title(&mut self, title: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.title = Some(title.into());
        Ok(())
    }

    pub fn add_description(&mut self, description: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.description = Some(description.into());
        Ok(())
    }

    pub fn add_ean(&mut self, ean: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.ean = Some(ean.into());
        Ok(())
    }

    pub fn add_manufacturer_article_id(&mut self, id: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.manufacturer_article_id = Some(id.into());
        Ok(())
    }

    pub fn add_manufacturer_name(&mut self, name: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.manufacturer_name = Some(name.into());
        Ok(())
    }

    pub fn add_delivery_time(&mut self, days: f64) -> ConvertResult<()> {
        self.details_mut()?.delivery_time = days;
        Ok(())
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) -> ConvertResult<()> {
        self.details_mut()?.add_keyword(keyword);
        Ok(())
    }

    pub fn add_special_treatment_class(&mut self, class: TreatmentClass) -> ConvertResult<()> {
        self.details_mut()?.add_special_treatment_class(class);
        Ok(())
    }

    /// Price details commit with validation and deduplication; invalid
    /// entries are dropped with a warning.
    pub fn add_price_details(&mut self, mut details: PriceDetails) {
        if let Err(err) = details.validate(true) {
            tracing::warn!("price details not committed: {err}");
            return;
        }
        if self.price_details.contains(&details) {
            tracing::warn!("price details not committed: duplicate entry");
            return;
        }
        self.price_details.push(details);
    }

    /// Product attachments commit with auto-ordering; invalid or duplicate
    /// attachments are dropped with a warning.
    pub fn add_mime(&mut self, mime: Mime) -> bool {
        commit_ordered(&mut self.mime_info, mime, "mime")
    }

    /// Appends the set and derives the product-level variant tuples from
    /// its variant-carrying features.
    pub fn add_feature_set(&mut self, set: FeatureSet) {
        for feature in &set.features {
            if let (Some(name), Some(variants)) = (feature.name(), feature.variants()) {
                self.variants
                    .push((variants.order, name.to_string(), variants.clone()));
            }
        }
        self.feature_sets.push(set);
    }

    pub fn add_reference(&mut self, reference: Reference) {
        self.references.push(reference);
    }

    pub fn add_user_defined_extension(&mut self, _field: impl Into<String>) {
        // Not consumed yet.
    }

    /// Number of sellable variants: the product of the variant-set sizes,
    /// at least 1 since the product itself counts as one variant.
    pub fn variant_count(&self) -> usize {
        self.variants
            .iter()
            .map(|(_, _, set)| set.len().max(1))
            .product::<usize>()
            .max(1)
    }

    pub fn has_variants(&self) -> bool {
        self.variant_count() > 1
    }
}

/// Partial equality over the business-identifying content; disposition,
/// derived variants and extensions are intentionally ignored.
impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.product_id == other.product_id
            && self.details == other.details
            && self.order_details == other.order_details
            && self.price_details == other.price_details
            && self.mime_info == other.mime_info
            && self.feature_sets == other.feature_sets
            && self.references == other.references
    }
}

impl Validate for Product {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.product_id.as_deref().is_none_or(str::is_empty) {
            rule(strict, "the product has no product id")?;
        }
        let id = self.display_id().to_string();
        match self.details.as_mut() {
            Some(details) => details.validate(strict)?,
            None => rule(strict, format!("product '{id}' has no details"))?,
        }
        match self.order_details.as_mut() {
            Some(order_details) => order_details.validate(strict)?,
            None => rule(strict, format!("product '{id}' has no order information"))?,
        }
        if self.price_details.is_empty() {
            rule(strict, format!("product '{id}' has no price information"))?;
        }
        for price_details in &mut self.price_details {
            price_details.validate(strict)?;
        }
        for mime in &mut self.mime_info {
            mime.validate(strict)?;
        }
        for set in &mut self.feature_sets {
            set.validate(strict)?;
        }
        for reference in &mut self.references {
            reference.validate(strict)?;
        }
        Ok(())
    }
}
