use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::mime::Mime;
use crate::validate::{Validate, next_order, rule};

/// A cross-reference to other supplier articles (spare part, accessory,
/// follow-up article). The type and optional quantity are set at creation
/// from element attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reference {
    pub reference_type: Option<String>,
    pub quantity: f64,
    pub description: Option<String>,
    pub supplier_article_ids: Vec<String>,
    pub mime_info: Vec<Mime>,
}

impl Default for Reference {
    fn default() -> Self {
        Self {
            reference_type: None,
            quantity: 1.0,
            description: None,
            supplier_article_ids: Vec::new(),
            mime_info: Vec::new(),
        }
    }
}

impl Reference {
    pub fn new(reference_type: impl Into<String>) -> Self {
        Self {
            reference_type: Some(reference_type.into()),
            ..Self::default()
        }
    }

    pub fn add_supplier_article_id(&mut self, id: impl Into<String>) {
        self.supplier_article_ids.push(id.into());
    }

    /// Reference attachments auto-order but are not validation-gated.
    pub fn add_mime(&mut self, mut mime: Mime) {
        if mime.order.is_none_or(|order| order <= 0) {
            mime.order = Some(next_order(&self.mime_info));
        }
        self.mime_info.push(mime);
    }
}

/// Partial equality over the reference type and the referenced ids.
impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        self.reference_type == other.reference_type
            && self.supplier_article_ids == other.supplier_article_ids
    }
}

impl Validate for Reference {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.reference_type.as_deref().is_none_or(str::is_empty) {
            rule(strict, "the reference has no type")?;
        }
        if self.supplier_article_ids.is_empty() {
            rule(strict, "the reference names no article id")?;
        }
        Ok(())
    }
}
