//! `WriteXml` implementations for the catalog entities.
//!
//! Element names mirror the article vocabulary the importer resolves, so an
//! exported document parses back into an equal catalog.

use std::io::Write;

use bmeconv_catalog::{
    Feature, FeatureSet, Mime, OrderDetails, Price, PriceDetails, Product, ProductDetails,
    Reference, TreatmentClass, Variant,
};
use bmeconv_core::{ConvertError, ConvertResult};

use crate::xml::{WriteXml, XmlWriter, fmt_number};

impl WriteXml for Product {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open_with("ARTICLE", &[("mode", self.disposition.as_str())])?;
        xml.mandatory("SUPPLIER_AID", self.product_id.as_deref(), "the article")?;
        match self.details.as_ref() {
            Some(details) => details.write_xml(xml)?,
            None => {
                return Err(ConvertError::validation(format!(
                    "article '{}' has no details to serialize",
                    self.product_id.as_deref().unwrap_or_default()
                )));
            }
        }
        for set in &self.feature_sets {
            set.write_xml(xml)?;
        }
        match self.order_details.as_ref() {
            Some(order_details) => order_details.write_xml(xml)?,
            None => {
                return Err(ConvertError::validation(format!(
                    "article '{}' has no order details to serialize",
                    self.product_id.as_deref().unwrap_or_default()
                )));
            }
        }
        if self.price_details.is_empty() {
            return Err(ConvertError::validation(format!(
                "article '{}' has no price details to serialize",
                self.product_id.as_deref().unwrap_or_default()
            )));
        }
        for price_details in &self.price_details {
            price_details.write_xml(xml)?;
        }
        if !self.mime_info.is_empty() {
            xml.open("MIME_INFO")?;
            for mime in &self.mime_info {
                mime.write_xml(xml)?;
            }
            xml.close("MIME_INFO")?;
        }
        for reference in &self.references {
            reference.write_xml(xml)?;
        }
        xml.close("ARTICLE")
    }
}

impl WriteXml for ProductDetails {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("ARTICLE_DETAILS")?;
        xml.mandatory("DESCRIPTION_SHORT", self.title.as_deref(), "the article details")?;
        xml.optional("DESCRIPTION_LONG", self.description.as_deref())?;
        xml.optional("EAN", self.ean.as_deref())?;
        xml.optional("MANUFACTURER_AID", self.manufacturer_article_id.as_deref())?;
        xml.optional("MANUFACTURER_NAME", self.manufacturer_name.as_deref())?;
        xml.optional(
            "MANUFACTURER_TYPE_DESCR",
            self.manufacturer_type_description.as_deref(),
        )?;
        xml.optional("SUPPLIER_ALT_AID", self.supplier_alt_id.as_deref())?;
        xml.optional("BUYER_AID", self.buyer_id.as_deref())?;
        xml.optional("ERP_GROUP_BUYER", self.erp_group_buyer.as_deref())?;
        xml.optional("ERP_GROUP_SUPPLIER", self.erp_group_supplier.as_deref())?;
        xml.optional("ARTICLE_STATUS", self.article_status.as_deref())?;
        xml.leaf("ARTICLE_ORDER", &self.article_order.to_string())?;
        xml.leaf("DELIVERY_TIME", &fmt_number(self.delivery_time))?;
        for keyword in &self.keywords {
            xml.leaf("KEYWORD", keyword)?;
        }
        for class in &self.special_treatment_classes {
            class.write_xml(xml)?;
        }
        xml.close("ARTICLE_DETAILS")
    }
}

impl WriteXml for TreatmentClass {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        let class_type = match self.class_type.as_deref() {
            Some(class_type) if !class_type.is_empty() => class_type,
            _ => {
                return Err(ConvertError::validation(
                    "the treatment class is missing its mandatory type",
                ));
            }
        };
        xml.leaf_with(
            "SPECIAL_TREATMENT_CLASS",
            &[("type", class_type)],
            self.value.as_deref().unwrap_or_default(),
        )
    }
}

impl WriteXml for OrderDetails {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("ARTICLE_ORDER_DETAILS")?;
        xml.mandatory("ORDER_UNIT", self.order_unit.as_deref(), "the order details")?;
        xml.mandatory("CONTENT_UNIT", self.content_unit.as_deref(), "the order details")?;
        xml.leaf("NO_CU_PER_OU", &fmt_number(self.packing_quantity))?;
        xml.leaf("PRICE_QUANTITY", &fmt_number(self.price_quantity))?;
        xml.leaf("QUANTITY_MIN", &fmt_number(self.quantity_min))?;
        xml.leaf("QUANTITY_INTERVAL", &fmt_number(self.quantity_interval))?;
        xml.close("ARTICLE_ORDER_DETAILS")
    }
}

impl WriteXml for PriceDetails {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("ARTICLE_PRICE_DETAILS")?;
        if let Some(valid_from) = self.valid_from {
            write_validity(xml, "valid_start_date", valid_from)?;
        }
        if let Some(valid_to) = self.valid_to {
            write_validity(xml, "valid_end_date", valid_to)?;
        }
        for price in &self.prices {
            price.write_xml(xml)?;
        }
        xml.close("ARTICLE_PRICE_DETAILS")
    }
}

fn write_validity<W: Write>(
    xml: &mut XmlWriter<W>,
    kind: &str,
    date: chrono::NaiveDate,
) -> ConvertResult<()> {
    xml.open_with("DATETIME", &[("type", kind)])?;
    xml.leaf("DATE", &date.format("%Y-%m-%d").to_string())?;
    xml.close("DATETIME")
}

impl WriteXml for Price {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        let price_type = self.price_type.as_deref().unwrap_or_default();
        xml.open_with("ARTICLE_PRICE", &[("price_type", price_type)])?;
        match self.amount {
            Some(amount) => xml.leaf("PRICE_AMOUNT", &fmt_number(amount))?,
            None => {
                return Err(ConvertError::validation(
                    "the price is missing its mandatory PRICE_AMOUNT",
                ));
            }
        }
        xml.optional("PRICE_CURRENCY", self.currency.as_deref())?;
        if let Some(tax) = self.tax {
            xml.leaf("TAX", &fmt_number(tax))?;
        }
        if let Some(factor) = self.factor {
            xml.leaf("PRICE_FACTOR", &fmt_number(factor))?;
        }
        xml.optional("LOWER_BOUND", self.lower_bound.as_deref())?;
        xml.optional("TERRITORY", self.territory.as_deref())?;
        xml.close("ARTICLE_PRICE")
    }
}

impl WriteXml for Mime {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("MIME")?;
        xml.mandatory("MIME_SOURCE", self.source.as_deref(), "the attachment")?;
        xml.mandatory("MIME_TYPE", self.mime_type.as_deref(), "the attachment")?;
        xml.mandatory("MIME_PURPOSE", self.purpose.as_deref(), "the attachment")?;
        match self.order {
            Some(order) => xml.leaf("MIME_ORDER", &order.to_string())?,
            None => {
                return Err(ConvertError::validation(
                    "the attachment is missing its mandatory MIME_ORDER",
                ));
            }
        }
        xml.optional("MIME_DESCR", self.description.as_deref())?;
        xml.optional("MIME_ALT", self.alternative_content.as_deref())?;
        xml.close("MIME")
    }
}

impl WriteXml for FeatureSet {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("ARTICLE_FEATURES")?;
        xml.optional(
            "REFERENCE_FEATURE_SYSTEM_NAME",
            self.reference_system.as_deref(),
        )?;
        xml.optional(
            "REFERENCE_FEATURE_GROUP_ID",
            self.reference_group_id.as_deref(),
        )?;
        for feature in &self.features {
            feature.write_xml(xml)?;
        }
        xml.close("ARTICLE_FEATURES")
    }
}

impl WriteXml for Feature {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("FEATURE")?;
        xml.mandatory("FNAME", self.name(), "the feature")?;
        xml.optional("FUNIT", self.unit())?;
        match self.variants() {
            Some(variants) => {
                xml.open("VARIANTS")?;
                xml.leaf("VORDER", &variants.order.to_string())?;
                for variant in &variants.variants {
                    variant.write_xml(xml)?;
                }
                xml.close("VARIANTS")?;
            }
            None => {
                for value in self.values() {
                    xml.leaf("FVALUE", value)?;
                }
            }
        }
        xml.optional("FVALUE_DETAILS", self.value_details())?;
        xml.optional("FDESC", self.description())?;
        xml.close("FEATURE")
    }
}

impl WriteXml for Variant {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        xml.open("VARIANT")?;
        xml.mandatory(
            "SUPPLIER_AID_SUPPLEMENT",
            self.product_id_suffix.as_deref(),
            "the variant",
        )?;
        xml.mandatory("FVALUE", self.value.as_deref(), "the variant")?;
        xml.optional("TERRITORY", self.territory.as_deref())?;
        xml.close("VARIANT")
    }
}

impl WriteXml for Reference {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()> {
        let reference_type = match self.reference_type.as_deref() {
            Some(reference_type) if !reference_type.is_empty() => reference_type,
            _ => {
                return Err(ConvertError::validation(
                    "the reference is missing its mandatory type",
                ));
            }
        };
        let quantity = fmt_number(self.quantity);
        let mut attrs = vec![("type", reference_type)];
        if self.quantity != 1.0 {
            attrs.push(("quantity", quantity.as_str()));
        }
        xml.open_with("ARTICLE_REFERENCE", &attrs)?;
        for id in &self.supplier_article_ids {
            xml.leaf("ART_ID_TO", id)?;
        }
        xml.optional("REFERENCE_DESCR", self.description.as_deref())?;
        if !self.mime_info.is_empty() {
            xml.open("MIME_INFO")?;
            for mime in &self.mime_info {
                mime.write_xml(xml)?;
            }
            xml.close("MIME_INFO")?;
        }
        xml.close("ARTICLE_REFERENCE")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(entity: &impl WriteXml) -> ConvertResult<String> {
        let mut xml = XmlWriter::new(Vec::new());
        entity.write_xml(&mut xml)?;
        Ok(String::from_utf8_lossy(&xml.into_inner()).into_owned())
    }

    #[test]
    fn an_article_without_an_id_does_not_serialize() {
        let product = Product::default();
        let err = render(&product).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
    }

    #[test]
    fn an_article_without_details_does_not_serialize() {
        let mut product = Product::default();
        product.product_id = Some("4711".into());
        let err = render(&product).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
    }

    #[test]
    fn the_mode_attribute_carries_the_disposition() {
        let mut product = Product::new(bmeconv_catalog::Disposition::Update);
        product.product_id = Some("4711".into());
        product.details = Some(ProductDetails {
            title: Some("Hammer".into()),
            ..ProductDetails::default()
        });
        product.order_details = Some(OrderDetails::default());
        let mut price_details = PriceDetails::default();
        let mut price = Price::new("net_list");
        price.amount = Some(9.99);
        price_details.add_price(price);
        product.add_price_details(price_details);
        let out = render(&product).unwrap();
        assert!(out.starts_with("<ARTICLE mode=\"update\">"));
        assert!(out.contains("<SUPPLIER_AID>4711</SUPPLIER_AID>"));
        assert!(out.contains("<DELIVERY_TIME>2</DELIVERY_TIME>"));
    }

    #[test]
    fn a_price_without_an_amount_does_not_serialize() {
        let price = Price::new("net_list");
        let err = render(&price).unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
    }

    #[test]
    fn prices_render_their_optional_fields() {
        let mut price = Price::new("net_customer");
        price.amount = Some(10500.99);
        price.currency = Some("EUR".into());
        price.tax = Some(0.19);
        price.territory = Some("DE".into());
        let out = render(&price).unwrap();
        assert!(out.contains("price_type=\"net_customer\""));
        assert!(out.contains("<PRICE_AMOUNT>10500.99</PRICE_AMOUNT>"));
        assert!(out.contains("<TAX>0.19</TAX>"));
        assert!(out.contains("<TERRITORY>DE</TERRITORY>"));
        assert!(!out.contains("LOWER_BOUND"));
    }

    #[test]
    fn variant_features_render_a_variant_block() {
        let mut feature = Feature::default();
        feature.set_name("Volumen").unwrap();
        feature.start_variant_set().unwrap();
        feature.set_variant_order(1).unwrap();
        feature
            .add_variant(Variant {
                product_id_suffix: Some("-1L".into()),
                value: Some("1".into()),
                territory: None,
            })
            .unwrap();
        let out = render(&feature).unwrap();
        assert!(out.contains("<VORDER>1</VORDER>"));
        assert!(out.contains("<SUPPLIER_AID_SUPPLEMENT>-1L</SUPPLIER_AID_SUPPLEMENT>"));
        assert!(!out.contains("<FVALUE_DETAILS>"));
    }

    #[test]
    fn references_render_their_attributes() {
        let mut reference = Reference::new("accessory");
        reference.quantity = 2.0;
        reference.add_supplier_article_id("77");
        let out = render(&reference).unwrap();
        assert!(out.contains("type=\"accessory\""));
        assert!(out.contains("quantity=\"2\""));
        assert!(out.contains("<ART_ID_TO>77</ART_ID_TO>"));
    }
}
