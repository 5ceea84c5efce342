//! The recognized catalog vocabulary.
//!
//! Element names arrive in whatever casing (and with whatever stray
//! whitespace) the supplier's export tool produced. They are normalized to
//! lowercase, run through the alias table that folds the older article
//! vocabulary and the newer product vocabulary onto one canonical name, and
//! resolved into a closed tag enum. Unresolved names are simply skipped by
//! the caller.

/// Folds equivalent element names onto the canonical handler name.
fn alias(name: &str) -> &str {
    match name {
        "product" => "article",
        "product_details" => "article_details",
        "supplier_pid" => "supplier_aid",
        "supplier_alt_pid" => "supplier_alt_aid",
        "supplier_pid_supplement" => "supplier_aid_supplement",
        "manufacturer_pid" => "manufacturer_aid",
        "buyer_pid" => "buyer_aid",
        "article_order_details" | "product_order_details" => "order_details",
        "article_price_details" | "product_price_details" => "price_details",
        "article_price" | "product_price" => "price",
        "product_features" => "article_features",
        "international_pid" => "ean",
        "product_reference" => "article_reference",
        "prod_id_to" => "art_id_to",
        other => other,
    }
}

/// Lowercase, trim and de-alias an element name.
pub fn canonical(name: &str) -> String {
    alias(name.trim().to_ascii_lowercase().as_str()).to_string()
}

/// Elements that open a new parse context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTag {
    Article,
    ArticleDetails,
    OrderDetails,
    PriceDetails,
    Price,
    MimeInfo,
    Mime,
    DateTime,
    ArticleFeatures,
    Feature,
    SpecialTreatmentClass,
    ArticleReference,
    Variants,
    Variant,
    DescriptionLong,
}

impl OpenTag {
    pub fn resolve(name: &str) -> Option<Self> {
        let tag = match canonical(name).as_str() {
            "article" => OpenTag::Article,
            "article_details" => OpenTag::ArticleDetails,
            "order_details" => OpenTag::OrderDetails,
            "price_details" => OpenTag::PriceDetails,
            "price" => OpenTag::Price,
            "mime_info" => OpenTag::MimeInfo,
            "mime" => OpenTag::Mime,
            "datetime" => OpenTag::DateTime,
            "article_features" => OpenTag::ArticleFeatures,
            "feature" => OpenTag::Feature,
            "special_treatment_class" => OpenTag::SpecialTreatmentClass,
            "article_reference" => OpenTag::ArticleReference,
            "variants" => OpenTag::Variants,
            "variant" => OpenTag::Variant,
            "description_long" => OpenTag::DescriptionLong,
            _ => return None,
        };
        Some(tag)
    }
}

/// Elements whose close commits or assigns accumulated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTag {
    Article,
    ArticleFeatures,
    Feature,
    MimeInfo,
    Mime,
    DateTime,
    SupplierAid,
    SupplierAltAid,
    BuyerAid,
    ManufacturerAid,
    ManufacturerName,
    Ean,
    DescriptionLong,
    DescriptionShort,
    DeliveryTime,
    Keyword,
    SpecialTreatmentClass,
    PriceDetails,
    Price,
    PriceAmount,
    PriceCurrency,
    Tax,
    PriceFactor,
    LowerBound,
    Territory,
    Date,
    MimeSource,
    MimeType,
    MimeDescr,
    MimeAlt,
    MimePurpose,
    MimeOrder,
    OrderUnit,
    ContentUnit,
    NoCuPerOu,
    PriceQuantity,
    QuantityMin,
    QuantityInterval,
    Fname,
    Funit,
    Fvalue,
    FvalueDetails,
    Fdesc,
    ReferenceFeatureSystemName,
    ReferenceFeatureGroupId,
    ArticleReference,
    ArtIdTo,
    ReferenceDescr,
    Variants,
    Vorder,
    Variant,
    SupplierAidSupplement,
    CatalogGroupSystem,
}

impl CloseTag {
    pub fn resolve(name: &str) -> Option<Self> {
        let tag = match canonical(name).as_str() {
            "article" => CloseTag::Article,
            "article_features" => CloseTag::ArticleFeatures,
            "feature" => CloseTag::Feature,
            "mime_info" => CloseTag::MimeInfo,
            "mime" => CloseTag::Mime,
            "datetime" => CloseTag::DateTime,
            "supplier_aid" => CloseTag::SupplierAid,
            "supplier_alt_aid" => CloseTag::SupplierAltAid,
            "buyer_aid" => CloseTag::BuyerAid,
            "manufacturer_aid" => CloseTag::ManufacturerAid,
            "manufacturer_name" => CloseTag::ManufacturerName,
            "ean" => CloseTag::Ean,
            "description_long" => CloseTag::DescriptionLong,
            "description_short" => CloseTag::DescriptionShort,
            "delivery_time" => CloseTag::DeliveryTime,
            "keyword" => CloseTag::Keyword,
            "special_treatment_class" => CloseTag::SpecialTreatmentClass,
            "price_details" => CloseTag::PriceDetails,
            "price" => CloseTag::Price,
            "price_amount" => CloseTag::PriceAmount,
            "price_currency" => CloseTag::PriceCurrency,
            "tax" => CloseTag::Tax,
            "price_factor" => CloseTag::PriceFactor,
            "lower_bound" => CloseTag::LowerBound,
            "territory" => CloseTag::Territory,
            "date" => CloseTag::Date,
            "mime_source" => CloseTag::MimeSource,
            "mime_type" => CloseTag::MimeType,
            "mime_descr" => CloseTag::MimeDescr,
            "mime_alt" => CloseTag::MimeAlt,
            "mime_purpose" => CloseTag::MimePurpose,
            "mime_order" => CloseTag::MimeOrder,
            "order_unit" => CloseTag::OrderUnit,
            "content_unit" => CloseTag::ContentUnit,
            "no_cu_per_ou" => CloseTag::NoCuPerOu,
            "price_quantity" => CloseTag::PriceQuantity,
            "quantity_min" => CloseTag::QuantityMin,
            "quantity_interval" => CloseTag::QuantityInterval,
            "fname" => CloseTag::Fname,
            "funit" => CloseTag::Funit,
            "fvalue" => CloseTag::Fvalue,
            "fvalue_details" => CloseTag::FvalueDetails,
            "fdesc" => CloseTag::Fdesc,
            "reference_feature_system_name" => CloseTag::ReferenceFeatureSystemName,
            "reference_feature_group_id" => CloseTag::ReferenceFeatureGroupId,
            "article_reference" => CloseTag::ArticleReference,
            "art_id_to" => CloseTag::ArtIdTo,
            "reference_descr" => CloseTag::ReferenceDescr,
            "variants" => CloseTag::Variants,
            "vorder" => CloseTag::Vorder,
            "variant" => CloseTag::Variant,
            "supplier_aid_supplement" => CloseTag::SupplierAidSupplement,
            "catalog_group_system" => CloseTag::CatalogGroupSystem,
            _ => return None,
        };
        Some(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_onto_the_article_vocabulary() {
        assert_eq!(canonical("PRODUCT"), "article");
        assert_eq!(canonical("product_price_details"), "price_details");
        assert_eq!(canonical("SUPPLIER_PID"), "supplier_aid");
        assert_eq!(canonical("INTERNATIONAL_PID"), "ean");
        assert_eq!(canonical("PROD_ID_TO"), "art_id_to");
    }

    #[test]
    fn stray_whitespace_is_tolerated() {
        assert_eq!(OpenTag::resolve(" ARTICLE "), Some(OpenTag::Article));
        assert_eq!(CloseTag::resolve("FVALUE "), Some(CloseTag::Fvalue));
    }

    #[test]
    fn both_vocabularies_resolve_to_the_same_tag() {
        assert_eq!(OpenTag::resolve("PRODUCT"), OpenTag::resolve("ARTICLE"));
        assert_eq!(
            CloseTag::resolve("PRODUCT_PRICE"),
            CloseTag::resolve("ARTICLE_PRICE")
        );
        assert_eq!(
            CloseTag::resolve("SUPPLIER_PID_SUPPLEMENT"),
            Some(CloseTag::SupplierAidSupplement)
        );
    }

    #[test]
    fn unknown_names_do_not_resolve() {
        assert_eq!(OpenTag::resolve("T_NEW_CATALOG"), None);
        assert_eq!(CloseTag::resolve("HEADER"), None);
    }
}
