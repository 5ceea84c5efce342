//! `bmeconv-catalog` — the catalog domain entity graph.
//!
//! This crate contains the `Product` aggregate and its nested entities,
//! implemented purely as deterministic domain logic (no IO, no XML).
//! Every entity exposes the `Validate` capability; equality is intentionally
//! partial, over the business-identifying fields only, so the same logical
//! item built via different paths still compares equal.

pub mod catalog;
pub mod feature;
pub mod mime;
pub mod order_details;
pub mod price;
pub mod product;
pub mod product_details;
pub mod reference;
pub mod treatment_class;
pub mod validate;

pub use catalog::{Catalog, Disposition};
pub use feature::{Feature, FeatureSet, Variant, VariantSet};
pub use mime::Mime;
pub use order_details::OrderDetails;
pub use price::{Price, PriceDetails};
pub use product::Product;
pub use product_details::{LINE_BREAK, ProductDetails};
pub use reference::Reference;
pub use treatment_class::TreatmentClass;
pub use validate::{Orderable, Validate};
