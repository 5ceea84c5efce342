//! Event handlers of the catalog parse state machine.
//!
//! Every open and close event is dispatched through a closed match over the
//! tag vocabulary. Opening an element that is already open is a structure
//! error; content arriving without its parent context is a context error.
//! Both abort the conversion, because either means the document's nesting
//! does not line up with the catalog model.

use std::collections::HashMap;

use chrono::NaiveDate;

use bmeconv_catalog::{
    Disposition, Feature, FeatureSet, Mime, OrderDetails, Price, PriceDetails, Product,
    ProductDetails, Reference, TreatmentClass, Validate, Variant,
};
use bmeconv_core::{ConvertError, ConvertResult, ConverterConfig, Mappings, round2};

use crate::state::{ParserState, Target};
use crate::tags::{CloseTag, OpenTag};

/// Element attributes with lowercased keys.
pub type Attrs = HashMap<String, String>;

/// Stateless dispatcher; all mutation happens on the [`ParserState`] it is
/// handed. One importer can drive any number of parses.
pub struct Importer<'a> {
    config: &'a ConverterConfig,
    mappings: &'a Mappings,
}

impl<'a> Importer<'a> {
    pub fn new(config: &'a ConverterConfig, mappings: &'a Mappings) -> Self {
        Self { config, mappings }
    }

    /// Dispatch an element-open event. Unknown elements are skipped; the
    /// text accumulator is cleared either way.
    pub fn handle_open(
        &self,
        state: &mut ParserState,
        name: &str,
        attrs: &Attrs,
    ) -> ConvertResult<()> {
        let result = match OpenTag::resolve(name) {
            Some(tag) => self.dispatch_open(state, tag, attrs),
            None => Ok(()),
        };
        state.clear_text();
        result
    }

    /// Accumulate element content.
    pub fn handle_text(&self, state: &mut ParserState, chunk: &str) {
        state.append_text(chunk);
    }

    /// Dispatch an element-close event, consuming the accumulated content.
    pub fn handle_close(&self, state: &mut ParserState, name: &str) -> ConvertResult<()> {
        match CloseTag::resolve(name) {
            Some(tag) => {
                let text = state.take_text();
                self.dispatch_close(state, tag, text)
            }
            None => {
                state.clear_text();
                Ok(())
            }
        }
    }

    fn dispatch_open(
        &self,
        state: &mut ParserState,
        tag: OpenTag,
        attrs: &Attrs,
    ) -> ConvertResult<()> {
        match tag {
            OpenTag::Article => self.open_article(state, attrs),
            OpenTag::ArticleDetails => {
                let product = product_mut(state, "article details")?;
                if product.details.is_some() {
                    return Err(already_open("article details"));
                }
                product.details = Some(ProductDetails::default());
                Ok(())
            }
            OpenTag::OrderDetails => {
                let product = product_mut(state, "order details")?;
                if product.order_details.is_some() {
                    return Err(already_open("order details"));
                }
                product.order_details = Some(OrderDetails::default());
                Ok(())
            }
            OpenTag::PriceDetails => {
                if state.price_details.is_some() {
                    return Err(already_open("price details"));
                }
                state.price_details = Some(PriceDetails::default());
                state.target = Some(Target::PriceDetails);
                Ok(())
            }
            OpenTag::Price => {
                if state.price.is_some() {
                    return Err(already_open("a price"));
                }
                state.price = Some(match attrs.get("price_type") {
                    Some(price_type) => Price::new(price_type.clone()),
                    None => {
                        tracing::warn!("price carries no price type");
                        Price::default()
                    }
                });
                state.target = Some(Target::Price);
                Ok(())
            }
            OpenTag::MimeInfo => {
                // Attachments inside a reference belong to the reference,
                // everywhere else to the article.
                state.target = Some(if state.reference.is_some() {
                    Target::Reference
                } else {
                    Target::Product
                });
                Ok(())
            }
            OpenTag::Mime => {
                if state.mime.is_some() {
                    return Err(already_open("an attachment"));
                }
                state.mime = Some(Mime::default());
                Ok(())
            }
            OpenTag::DateTime => {
                match attrs.get("type") {
                    Some(kind) => state.date_kind = Some(kind.clone()),
                    None => tracing::warn!("datetime carries no type, its date will be dropped"),
                }
                Ok(())
            }
            OpenTag::ArticleFeatures => {
                if state.feature_set.is_some() {
                    return Err(already_open("a feature set"));
                }
                state.feature_set = Some(FeatureSet::default());
                Ok(())
            }
            OpenTag::Feature => {
                if state.feature_set.is_none() {
                    return Err(outside_parent("a feature", "a feature set"));
                }
                if state.feature.is_some() {
                    return Err(already_open("a feature"));
                }
                state.feature = Some(Feature::default());
                Ok(())
            }
            OpenTag::SpecialTreatmentClass => {
                if state.treatment_class.is_some() {
                    return Err(already_open("a treatment class"));
                }
                state.treatment_class = Some(match attrs.get("type") {
                    Some(class_type) => TreatmentClass::new(class_type.clone()),
                    None => {
                        tracing::warn!("treatment class carries no type");
                        TreatmentClass::default()
                    }
                });
                Ok(())
            }
            OpenTag::ArticleReference => self.open_reference(state, attrs),
            OpenTag::Variants => {
                let feature = feature_mut(state, "variants")?;
                feature.start_variant_set()
            }
            OpenTag::Variant => {
                if state.feature.is_none() {
                    return Err(outside_parent("a variant", "a feature"));
                }
                if state.variant.is_some() {
                    return Err(already_open("a variant"));
                }
                state.variant = Some(Variant::default());
                state.target = Some(Target::Variant);
                Ok(())
            }
            OpenTag::DescriptionLong => {
                state.description_mode = true;
                Ok(())
            }
        }
    }

    fn open_article(&self, state: &mut ParserState, attrs: &Attrs) -> ConvertResult<()> {
        if state.product.is_some() {
            return Err(already_open("an article"));
        }
        let disposition = match attrs.get("mode") {
            Some(mode) => Disposition::parse(mode).unwrap_or_else(|| {
                tracing::warn!(mode, "unknown article mode, treating the article as new");
                Disposition::New
            }),
            None => {
                tracing::warn!("article carries no mode, treating the article as new");
                Disposition::New
            }
        };
        state.product = Some(Product::new(disposition));
        state.target = Some(Target::Product);
        Ok(())
    }

    fn open_reference(&self, state: &mut ParserState, attrs: &Attrs) -> ConvertResult<()> {
        if state.reference.is_some() {
            return Err(already_open("a reference"));
        }
        let Some(reference_type) = attrs.get("type") else {
            tracing::warn!("reference skipped: it carries no type");
            return Ok(());
        };
        let mut reference = Reference::new(reference_type.clone());
        if let Some(quantity) = attrs.get("quantity") {
            match self.config.number_format().parse(quantity) {
                Ok(quantity) => reference.quantity = quantity,
                Err(err) => tracing::warn!("reference quantity ignored: {err}"),
            }
        }
        state.reference = Some(reference);
        state.target = Some(Target::Reference);
        Ok(())
    }

    fn dispatch_close(
        &self,
        state: &mut ParserState,
        tag: CloseTag,
        text: String,
    ) -> ConvertResult<()> {
        match tag {
            CloseTag::Article => self.save_article(state),
            CloseTag::ArticleFeatures => self.save_feature_set(state),
            CloseTag::Feature => self.save_feature(state),
            CloseTag::MimeInfo => {
                state.target = None;
                Ok(())
            }
            CloseTag::Mime => self.save_mime(state),
            CloseTag::DateTime => {
                state.date_kind = None;
                Ok(())
            }
            CloseTag::SupplierAid => {
                product_mut(state, "an article number")?.product_id = Some(text);
                Ok(())
            }
            CloseTag::SupplierAltAid => {
                let product = product_mut(state, "an alternative article number")?;
                promote_alternative_id(product, &text);
                product.details_mut()?.supplier_alt_id = Some(text);
                Ok(())
            }
            CloseTag::BuyerAid => {
                let product = product_mut(state, "a buyer article number")?;
                promote_alternative_id(product, &text);
                product.details_mut()?.buyer_id = Some(text);
                Ok(())
            }
            CloseTag::ManufacturerAid => {
                product_mut(state, "a manufacturer article number")?
                    .add_manufacturer_article_id(text)
            }
            CloseTag::ManufacturerName => {
                product_mut(state, "a manufacturer name")?.add_manufacturer_name(text)
            }
            CloseTag::Ean => product_mut(state, "an ean")?.add_ean(text),
            CloseTag::DescriptionLong => {
                state.description_mode = false;
                product_mut(state, "a description")?.add_description(text)
            }
            CloseTag::DescriptionShort => product_mut(state, "a title")?.add_title(text),
            CloseTag::DeliveryTime => {
                let days = self.config.number_format().parse(&text)?;
                product_mut(state, "a delivery time")?.add_delivery_time(days)
            }
            CloseTag::Keyword => product_mut(state, "a keyword")?.add_keyword(text),
            CloseTag::SpecialTreatmentClass => self.save_treatment_class(state, text),
            CloseTag::PriceDetails => self.save_price_details(state),
            CloseTag::Price => self.save_price(state),
            CloseTag::PriceAmount => {
                let amount = round2(self.config.number_format().parse(&text)?);
                price_mut(state, "a price amount")?.amount = Some(amount);
                Ok(())
            }
            CloseTag::PriceCurrency => {
                price_mut(state, "a currency")?.currency = Some(text);
                Ok(())
            }
            CloseTag::Tax => {
                let tax = self.config.number_format().parse_tax(&text)?;
                price_mut(state, "a tax rate")?.tax = Some(tax);
                Ok(())
            }
            CloseTag::PriceFactor => {
                let factor = self.config.number_format().parse(&text)?;
                price_mut(state, "a price factor")?.factor = Some(factor);
                Ok(())
            }
            CloseTag::LowerBound => {
                price_mut(state, "a lower bound")?.lower_bound = Some(text);
                Ok(())
            }
            CloseTag::Territory => {
                self.assign_territory(state, text);
                Ok(())
            }
            CloseTag::Date => self.assign_date(state, &text),
            CloseTag::MimeSource => {
                mime_mut(state, "an attachment source")?.source = Some(text);
                Ok(())
            }
            CloseTag::MimeType => {
                mime_mut(state, "an attachment type")?.mime_type = Some(text);
                Ok(())
            }
            CloseTag::MimeDescr => {
                mime_mut(state, "an attachment description")?.description = Some(text);
                Ok(())
            }
            CloseTag::MimeAlt => {
                mime_mut(state, "an attachment alternative text")?.alternative_content = Some(text);
                Ok(())
            }
            CloseTag::MimePurpose => {
                mime_mut(state, "an attachment purpose")?.purpose = Some(text);
                Ok(())
            }
            CloseTag::MimeOrder => {
                let mime = mime_mut(state, "an attachment order")?;
                match text.trim().parse::<i64>() {
                    Ok(order) => mime.order = Some(order),
                    Err(_) => tracing::warn!(text, "attachment order is not a number, ignored"),
                }
                Ok(())
            }
            CloseTag::OrderUnit => {
                product_mut(state, "an order unit")?.order_details_mut()?.order_unit = Some(text);
                Ok(())
            }
            CloseTag::ContentUnit => {
                product_mut(state, "a content unit")?.order_details_mut()?.content_unit =
                    Some(text);
                Ok(())
            }
            CloseTag::NoCuPerOu => {
                let quantity = self.config.number_format().parse(&text)?;
                product_mut(state, "a packing quantity")?
                    .order_details_mut()?
                    .packing_quantity = quantity;
                Ok(())
            }
            CloseTag::PriceQuantity => {
                let quantity = self.config.number_format().parse(&text)?;
                product_mut(state, "a price quantity")?
                    .order_details_mut()?
                    .price_quantity = quantity;
                Ok(())
            }
            CloseTag::QuantityMin => {
                let quantity = self.config.number_format().parse(&text)?;
                product_mut(state, "a minimum quantity")?
                    .order_details_mut()?
                    .quantity_min = quantity;
                Ok(())
            }
            CloseTag::QuantityInterval => {
                let quantity = self.config.number_format().parse(&text)?;
                product_mut(state, "a quantity interval")?
                    .order_details_mut()?
                    .quantity_interval = quantity;
                Ok(())
            }
            CloseTag::Fname => feature_mut(state, "a feature name")?.set_name(text),
            CloseTag::Funit => {
                let unit = self.mappings.units.normalize(&text).to_string();
                feature_mut(state, "a feature unit")?.set_unit(unit)
            }
            CloseTag::Fvalue => match state.variant.as_mut() {
                Some(variant) => {
                    variant.value = Some(text);
                    Ok(())
                }
                None => feature_mut(state, "a feature value")?.add_value(text),
            },
            CloseTag::FvalueDetails => {
                feature_mut(state, "feature value details")?.set_value_details(text)
            }
            CloseTag::Fdesc => feature_mut(state, "a feature description")?.set_description(text),
            CloseTag::ReferenceFeatureSystemName => {
                feature_set_mut(state, "a classification system name")?.reference_system =
                    Some(text);
                Ok(())
            }
            CloseTag::ReferenceFeatureGroupId => {
                feature_set_mut(state, "a classification group id")?.reference_group_id =
                    Some(text);
                Ok(())
            }
            CloseTag::ArticleReference => self.save_reference(state),
            CloseTag::ArtIdTo => {
                reference_mut(state, "a referenced article id")?.add_supplier_article_id(text);
                Ok(())
            }
            CloseTag::ReferenceDescr => {
                reference_mut(state, "a reference description")?.description = Some(text);
                Ok(())
            }
            CloseTag::Variants => Ok(()),
            CloseTag::Vorder => {
                let order = text.trim().parse::<i64>().map_err(|_| {
                    ConvertError::validation(format!("invalid variant order '{text}'"))
                })?;
                feature_mut(state, "a variant order")?.set_variant_order(order)
            }
            CloseTag::Variant => self.save_variant(state),
            CloseTag::SupplierAidSupplement => {
                match state.variant.as_mut() {
                    Some(variant) => variant.product_id_suffix = Some(text),
                    None => {
                        return Err(outside_parent("an article number suffix", "a variant"));
                    }
                }
                Ok(())
            }
            CloseTag::CatalogGroupSystem => {
                // Group systems are rebuilt on export; whatever was open is
                // abandoned here.
                state.reset_transient();
                Ok(())
            }
        }
    }

    /// Commit the finished article into its disposition bucket. The
    /// transient context is reset regardless of the outcome.
    fn save_article(&self, state: &mut ParserState) -> ConvertResult<()> {
        let product = state
            .product
            .take()
            .ok_or_else(|| ConvertError::structure("an article closes but none is open"))?;
        let result = self.commit_article(state, product);
        state.reset_transient();
        result
    }

    fn commit_article(&self, state: &mut ParserState, mut product: Product) -> ConvertResult<()> {
        if product.product_id.as_deref().is_none_or(str::is_empty) {
            tracing::error!("article dropped: it carries no article number");
            return Ok(());
        }
        product.validate(self.config.strict())?;
        tracing::debug!(
            product_id = product.product_id.as_deref(),
            disposition = %product.disposition,
            "article committed"
        );
        state.catalog_mut().commit(product);
        Ok(())
    }

    fn save_feature_set(&self, state: &mut ParserState) -> ConvertResult<()> {
        let set = state
            .feature_set
            .take()
            .ok_or_else(|| ConvertError::structure("a feature set closes but none is open"))?;
        let product = product_mut(state, "a feature set")?;
        if set.is_empty() {
            tracing::info!("empty feature set dropped");
            return Ok(());
        }
        if self
            .mappings
            .feature_set_blacklist
            .contains(set.reference_system.as_deref())
        {
            tracing::info!(
                system = set.reference_system.as_deref(),
                "blacklisted feature set dropped"
            );
            return Ok(());
        }
        product.add_feature_set(set);
        Ok(())
    }

    fn save_feature(&self, state: &mut ParserState) -> ConvertResult<()> {
        let feature = state
            .feature
            .take()
            .ok_or_else(|| ConvertError::structure("a feature closes but none is open"))?;
        let set = feature_set_mut(state, "a feature")?;
        if self.mappings.feature_blacklist.contains(feature.name()) {
            tracing::info!(name = feature.name(), "blacklisted feature dropped");
            return Ok(());
        }
        set.add_feature(feature);
        Ok(())
    }

    fn save_mime(&self, state: &mut ParserState) -> ConvertResult<()> {
        let mime = state
            .mime
            .take()
            .ok_or_else(|| ConvertError::structure("an attachment closes but none is open"))?;
        match state.target {
            Some(Target::Reference) => match state.reference.as_mut() {
                Some(reference) => reference.add_mime(mime),
                None => tracing::warn!("attachment dropped: its reference is gone"),
            },
            Some(Target::Product) => match state.product.as_mut() {
                Some(product) => {
                    product.add_mime(mime);
                }
                None => tracing::warn!("attachment dropped: no article to attach it to"),
            },
            _ => tracing::warn!("attachment dropped: nothing to attach it to"),
        }
        Ok(())
    }

    fn save_treatment_class(&self, state: &mut ParserState, text: String) -> ConvertResult<()> {
        let mut class = state
            .treatment_class
            .take()
            .ok_or_else(|| ConvertError::structure("a treatment class closes but none is open"))?;
        class.value = Some(text);
        product_mut(state, "a treatment class")?.add_special_treatment_class(class)
    }

    fn save_price_details(&self, state: &mut ParserState) -> ConvertResult<()> {
        let details = state
            .price_details
            .take()
            .ok_or_else(|| ConvertError::structure("price details close but none are open"))?;
        product_mut(state, "price details")?.add_price_details(details);
        state.target = None;
        Ok(())
    }

    fn save_price(&self, state: &mut ParserState) -> ConvertResult<()> {
        let price = state
            .price
            .take()
            .ok_or_else(|| ConvertError::structure("a price closes but none is open"))?;
        match state.price_details.as_mut() {
            Some(details) => details.add_price(price),
            None => return Err(outside_parent("a price", "price details")),
        }
        state.target = Some(Target::PriceDetails);
        Ok(())
    }

    fn assign_territory(&self, state: &mut ParserState, text: String) {
        match state.target {
            Some(Target::Price) => {
                if let Some(price) = state.price.as_mut() {
                    price.territory = Some(text);
                    return;
                }
            }
            Some(Target::Variant) => {
                if let Some(variant) = state.variant.as_mut() {
                    variant.territory = Some(text);
                    return;
                }
            }
            _ => {}
        }
        tracing::warn!(text, "territory dropped: nothing it applies to");
    }

    fn assign_date(&self, state: &mut ParserState, text: &str) -> ConvertResult<()> {
        let Some(kind) = state.date_kind.as_deref() else {
            tracing::warn!(text, "date dropped: its datetime carries no type");
            return Ok(());
        };
        let Some(details) = state.price_details.as_mut() else {
            tracing::warn!(text, "date dropped: no open price details");
            return Ok(());
        };
        let date = NaiveDate::parse_from_str(text.trim(), self.config.date_format())
            .map_err(|_| ConvertError::validation(format!("invalid date '{text}'")))?;
        match kind {
            "valid_start_date" => details.valid_from = Some(date),
            "valid_end_date" => details.valid_to = Some(date),
            other => tracing::warn!(kind = other, "date dropped: unknown datetime type"),
        }
        Ok(())
    }

    fn save_reference(&self, state: &mut ParserState) -> ConvertResult<()> {
        let Some(reference) = state.reference.take() else {
            // The matching open was skipped for carrying no type.
            tracing::warn!("reference close ignored: the reference was skipped");
            return Ok(());
        };
        product_mut(state, "a reference")?.add_reference(reference);
        state.target = None;
        Ok(())
    }

    fn save_variant(&self, state: &mut ParserState) -> ConvertResult<()> {
        let variant = state
            .variant
            .take()
            .ok_or_else(|| ConvertError::structure("a variant closes but none is open"))?;
        feature_mut(state, "a variant")?.add_variant(variant)?;
        state.target = None;
        Ok(())
    }
}

fn already_open(what: &str) -> ConvertError {
    ConvertError::structure(format!("{what} opens while {what} is already open"))
}

fn outside_parent(what: &str, parent: &str) -> ConvertError {
    ConvertError::missing_context(format!("{what} arrived outside {parent}"))
}

fn product_mut<'s>(state: &'s mut ParserState, what: &str) -> ConvertResult<&'s mut Product> {
    state
        .product
        .as_mut()
        .ok_or_else(|| outside_parent(what, "an article"))
}

fn price_mut<'s>(state: &'s mut ParserState, what: &str) -> ConvertResult<&'s mut Price> {
    state
        .price
        .as_mut()
        .ok_or_else(|| outside_parent(what, "a price"))
}

fn mime_mut<'s>(state: &'s mut ParserState, what: &str) -> ConvertResult<&'s mut Mime> {
    state
        .mime
        .as_mut()
        .ok_or_else(|| outside_parent(what, "an attachment"))
}

fn feature_mut<'s>(state: &'s mut ParserState, what: &str) -> ConvertResult<&'s mut Feature> {
    state
        .feature
        .as_mut()
        .ok_or_else(|| outside_parent(what, "a feature"))
}

fn feature_set_mut<'s>(
    state: &'s mut ParserState,
    what: &str,
) -> ConvertResult<&'s mut FeatureSet> {
    state
        .feature_set
        .as_mut()
        .ok_or_else(|| outside_parent(what, "a feature set"))
}

fn reference_mut<'s>(state: &'s mut ParserState, what: &str) -> ConvertResult<&'s mut Reference> {
    state
        .reference
        .as_mut()
        .ok_or_else(|| outside_parent(what, "a reference"))
}

/// An alternative id becomes the article number when none was given.
fn promote_alternative_id(product: &mut Product, id: &str) {
    if product.product_id.as_deref().is_none_or(str::is_empty) {
        tracing::info!(id, "using the alternative article number as article number");
        product.product_id = Some(id.to_string());
    }
}
