use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::treatment_class::TreatmentClass;
use crate::validate::{Validate, commit_ordered, fatal_rule, rule};

/// Line-break marker descriptions are normalized to.
pub const LINE_BREAK: &str = "<br>";

/// Locale-specific shop URLs that must never leak into a description.
const FORBIDDEN_SHOP_URLS: [&str; 2] = ["www.contorion.de", "www.contorion.at"];

/// Marker exempting a description from the shop-URL rule.
const SHOP_URL_EXEMPTION: &str = "profistore";

/// Descriptive part of a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetails {
    pub title: Option<String>,
    pub description: Option<String>,
    pub manufacturer_type_description: Option<String>,
    pub ean: Option<String>,
    pub supplier_alt_id: Option<String>,
    pub buyer_id: Option<String>,
    pub manufacturer_article_id: Option<String>,
    pub manufacturer_name: Option<String>,
    pub erp_group_buyer: Option<String>,
    pub erp_group_supplier: Option<String>,
    pub delivery_time: f64,
    pub special_treatment_classes: Vec<TreatmentClass>,
    pub keywords: Vec<String>,
    pub remarks: Vec<String>,
    pub segment: Vec<String>,
    pub article_order: i64,
    pub article_status: Option<String>,
}

impl Default for ProductDetails {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            manufacturer_type_description: None,
            ean: None,
            supplier_alt_id: None,
            buyer_id: None,
            manufacturer_article_id: None,
            manufacturer_name: None,
            erp_group_buyer: None,
            erp_group_supplier: None,
            delivery_time: 2.0,
            special_treatment_classes: Vec::new(),
            keywords: Vec::new(),
            remarks: Vec::new(),
            segment: Vec::new(),
            article_order: 1,
            article_status: None,
        }
    }
}

impl ProductDetails {
    /// Treatment classes commit with auto-ordering; invalid or duplicate
    /// classes are dropped with a warning.
    pub fn add_special_treatment_class(&mut self, class: TreatmentClass) -> bool {
        commit_ordered(&mut self.special_treatment_classes, class, "treatment class")
    }

    pub fn add_keyword(&mut self, keyword: impl Into<String>) {
        let keyword = keyword.into();
        if !keyword.trim().is_empty() {
            self.keywords.push(keyword);
        }
    }

    fn sanitize_description(&mut self, strict: bool) -> ConvertResult<()> {
        let description = match self.description.take() {
            Some(d) => d,
            None => return Ok(()),
        };
        let description = description.trim().replace('\r', "").replace('\n', LINE_BREAK);
        let has_shop_url = FORBIDDEN_SHOP_URLS.iter().any(|url| description.contains(url));
        if has_shop_url && !description.contains(SHOP_URL_EXEMPTION) {
            fatal_rule("the description must not contain locale-specific shop URLs")?;
        }
        if description.contains("\"\"") {
            fatal_rule("the description must not contain doubled quotation marks")?;
        }
        if description.ends_with('"') {
            rule(strict, "the description should not end with a quotation mark")?;
        }
        self.description = Some(description);
        Ok(())
    }
}

/// Partial equality: title, description, ean (numeric when possible),
/// manufacturer article id and name, and delivery time. The remaining
/// fields are intentionally ignored for deduplication purposes.
impl PartialEq for ProductDetails {
    fn eq(&self, other: &Self) -> bool {
        let ean_equal = match (&self.ean, &other.ean) {
            (None, None) => true,
            (Some(a), Some(b)) => match (a.parse::<i64>(), b.parse::<i64>()) {
                (Ok(a), Ok(b)) => a == b,
                _ => a == b,
            },
            _ => false,
        };
        self.title == other.title
            && self.description == other.description
            && ean_equal
            && self.manufacturer_article_id == other.manufacturer_article_id
            && self.manufacturer_name == other.manufacturer_name
            && self.delivery_time == other.delivery_time
    }
}

impl Validate for ProductDetails {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        match self.title.take() {
            Some(title) if !title.trim().is_empty() => {
                self.title = Some(title.replace('\n', " ").trim().to_string());
            }
            other => {
                self.title = other;
                rule(strict, "the article title is missing")?;
            }
        }
        if self.description.as_deref().is_none_or(str::is_empty) {
            // Recorded, never fatal.
            rule(false, "the article description is missing")?;
        } else {
            self.sanitize_description(strict)?;
        }
        if self.ean.as_deref().is_none_or(str::is_empty) {
            rule(false, "no EAN present")?;
        }
        if let Some(id) = self.manufacturer_article_id.take() {
            self.manufacturer_article_id = Some(id.trim().to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_model() {
        let details = ProductDetails::default();
        assert!(details.title.is_none());
        assert!(details.description.is_none());
        assert_eq!(details.delivery_time, 2.0);
        assert_eq!(details.article_order, 1);
        assert!(details.special_treatment_classes.is_empty());
        assert!(details.keywords.is_empty());
        assert!(details.remarks.is_empty());
        assert!(details.segment.is_empty());
        assert!(details.article_status.is_none());
    }

    #[test]
    fn missing_title_fails_only_strict() {
        let mut details = ProductDetails::default();
        assert!(details.validate(true).is_err());
        assert!(ProductDetails::default().validate(false).is_ok());
    }

    #[test]
    fn validation_trims_and_normalizes() {
        let mut details = ProductDetails {
            title: Some("Test".into()),
            manufacturer_article_id: Some(" 01239 \n".into()),
            description: Some(" \t asdfkjahsdlfas \r\n".into()),
            ..ProductDetails::default()
        };
        details.validate(true).unwrap();
        assert_eq!(details.manufacturer_article_id.as_deref(), Some("01239"));
        assert_eq!(details.description.as_deref(), Some("asdfkjahsdlfas"));
    }

    #[test]
    fn newlines_become_break_markers() {
        let mut details = ProductDetails {
            title: Some("Test".into()),
            description: Some("first\nsecond".into()),
            ..ProductDetails::default()
        };
        details.validate(false).unwrap();
        assert_eq!(details.description.as_deref(), Some("first<br>second"));
    }

    #[test]
    fn doubled_quotes_always_fail() {
        for strict in [true, false] {
            let mut details = ProductDetails {
                title: Some("Test".into()),
                description: Some(r#" asd ""fkjah sdlfas "#.into()),
                ..ProductDetails::default()
            };
            assert!(details.validate(strict).is_err());
        }
    }

    #[test]
    fn trailing_quote_fails_only_strict() {
        let description = " \t asdfkjah sdlfas \r\n\"";
        let mut details = ProductDetails {
            title: Some("Test".into()),
            description: Some(description.into()),
            ..ProductDetails::default()
        };
        assert!(details.validate(true).is_err());

        let mut details = ProductDetails {
            title: Some("Test".into()),
            description: Some(description.into()),
            ..ProductDetails::default()
        };
        assert!(details.validate(false).is_ok());
    }

    #[test]
    fn shop_urls_always_fail_without_exemption() {
        for strict in [true, false] {
            let mut details = ProductDetails {
                title: Some("Test".into()),
                description: Some("see www.contorion.de for details".into()),
                ..ProductDetails::default()
            };
            assert!(details.validate(strict).is_err());
        }
        let mut exempt = ProductDetails {
            title: Some("Test".into()),
            description: Some("see www.contorion.de/profistore".into()),
            ..ProductDetails::default()
        };
        assert!(exempt.validate(true).is_ok());
    }

    #[test]
    fn empty_keywords_are_ignored() {
        let mut details = ProductDetails::default();
        details.add_keyword("");
        details.add_keyword("  ");
        assert!(details.keywords.is_empty());
        details.add_keyword("Test");
        assert_eq!(details.keywords.len(), 1);
    }

    #[test]
    fn invalid_treatment_classes_are_dropped() {
        let mut details = ProductDetails::default();
        assert!(!details.add_special_treatment_class(TreatmentClass::default()));
        assert!(details.special_treatment_classes.is_empty());

        let mut class = TreatmentClass::new("CType");
        class.value = Some("CValue".into());
        assert!(details.add_special_treatment_class(class));
        assert_eq!(details.special_treatment_classes.len(), 1);
    }

    #[test]
    fn ean_compares_numerically() {
        let a = ProductDetails {
            ean: Some("0001234".into()),
            ..ProductDetails::default()
        };
        let b = ProductDetails {
            ean: Some("1234".into()),
            ..ProductDetails::default()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn empty_details_compare_equal() {
        assert_eq!(ProductDetails::default(), ProductDetails::default());
    }
}
