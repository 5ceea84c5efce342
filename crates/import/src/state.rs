//! Mutable parse state threaded through the event handlers.

use bmeconv_catalog::{
    Catalog, Feature, FeatureSet, LINE_BREAK, Mime, Price, PriceDetails, Product, Reference,
    TreatmentClass, Variant,
};

/// Where free-floating content such as `TERRITORY` or a closing `MIME`
/// currently belongs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Product,
    PriceDetails,
    Price,
    Reference,
    Variant,
}

/// One owned slot per entity that can be under construction, plus the text
/// accumulator and the finished catalog. A populated slot is the only
/// evidence that the matching element is open.
#[derive(Debug, Default)]
pub struct ParserState {
    pub(crate) product: Option<Product>,
    pub(crate) price_details: Option<PriceDetails>,
    pub(crate) price: Option<Price>,
    pub(crate) mime: Option<Mime>,
    pub(crate) feature_set: Option<FeatureSet>,
    pub(crate) feature: Option<Feature>,
    pub(crate) treatment_class: Option<TreatmentClass>,
    pub(crate) reference: Option<Reference>,
    pub(crate) variant: Option<Variant>,
    pub(crate) target: Option<Target>,
    /// The `type` attribute of an open `DATETIME` element.
    pub(crate) date_kind: Option<String>,
    /// Content accumulated since the last open or close event.
    pub(crate) text: String,
    /// While set, accumulated newlines become explicit line breaks.
    pub(crate) description_mode: bool,
    catalog: Catalog,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn into_catalog(self) -> Catalog {
        self.catalog
    }

    /// Drop every transient slot; the committed catalog is untouched.
    pub(crate) fn reset_transient(&mut self) {
        self.product = None;
        self.price_details = None;
        self.price = None;
        self.mime = None;
        self.feature_set = None;
        self.feature = None;
        self.treatment_class = None;
        self.reference = None;
        self.variant = None;
        self.target = None;
        self.date_kind = None;
        self.text.clear();
        self.description_mode = false;
    }

    /// Append one text chunk. Inside a long description, embedded newlines
    /// become explicit line break markers.
    pub(crate) fn append_text(&mut self, chunk: &str) {
        if self.description_mode {
            for (i, line) in chunk.split('\n').enumerate() {
                if i > 0 {
                    self.text.push_str(LINE_BREAK);
                }
                self.text.push_str(line.trim_matches('\r'));
            }
        } else {
            self.text.push_str(chunk);
        }
    }

    pub(crate) fn take_text(&mut self) -> String {
        std::mem::take(&mut self.text).trim().to_string()
    }

    pub(crate) fn clear_text(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_keeps_the_catalog() {
        let mut state = ParserState::new();
        state.product = Some(Product::default());
        state.text.push_str("leftover");
        let mut committed = Product::default();
        committed.product_id = Some("1".into());
        state.catalog_mut().commit(committed);
        state.reset_transient();
        assert!(state.product.is_none());
        assert!(state.text.is_empty());
        assert_eq!(state.catalog().len(), 1);
    }

    #[test]
    fn description_mode_marks_line_breaks() {
        let mut state = ParserState::new();
        state.description_mode = true;
        state.append_text("first\nsecond");
        assert_eq!(state.take_text(), format!("first{LINE_BREAK}second"));
    }

    #[test]
    fn plain_text_accumulates_verbatim() {
        let mut state = ParserState::new();
        state.append_text("  10,5");
        state.append_text("0 ");
        assert_eq!(state.take_text(), "10,50");
    }
}
