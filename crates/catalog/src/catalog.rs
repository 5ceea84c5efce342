use serde::{Deserialize, Serialize};

use crate::product::Product;

/// The bucket a product belongs to in the output, set once at creation
/// from the article's `mode` attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disposition {
    #[default]
    New,
    Update,
    Delete,
    Failed,
}

impl Disposition {
    pub const ALL: [Disposition; 4] = [
        Disposition::New,
        Disposition::Update,
        Disposition::Delete,
        Disposition::Failed,
    ];

    pub fn parse(mode: &str) -> Option<Self> {
        match mode {
            "new" => Some(Disposition::New),
            "update" => Some(Disposition::Update),
            "delete" => Some(Disposition::Delete),
            "failed" => Some(Disposition::Failed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Disposition::New => "new",
            Disposition::Update => "update",
            Disposition::Delete => "delete",
            Disposition::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The validated catalog: committed products bucketed by disposition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    new: Vec<Product>,
    update: Vec<Product>,
    delete: Vec<Product>,
    failed: Vec<Product>,
}

impl Catalog {
    /// Append a product to the bucket matching its disposition.
    pub fn commit(&mut self, product: Product) {
        self.bucket_mut(product.disposition).push(product);
    }

    pub fn bucket(&self, disposition: Disposition) -> &[Product] {
        match disposition {
            Disposition::New => &self.new,
            Disposition::Update => &self.update,
            Disposition::Delete => &self.delete,
            Disposition::Failed => &self.failed,
        }
    }

    fn bucket_mut(&mut self, disposition: Disposition) -> &mut Vec<Product> {
        match disposition {
            Disposition::New => &mut self.new,
            Disposition::Update => &mut self.update,
            Disposition::Delete => &mut self.delete,
            Disposition::Failed => &mut self.failed,
        }
    }

    /// All committed products, in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        Disposition::ALL
            .iter()
            .flat_map(|d| self.bucket(*d).iter())
    }

    pub fn len(&self) -> usize {
        Disposition::ALL.iter().map(|d| self.bucket(*d).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse() {
        assert_eq!(Disposition::parse("new"), Some(Disposition::New));
        assert_eq!(Disposition::parse("update"), Some(Disposition::Update));
        assert_eq!(Disposition::parse("delete"), Some(Disposition::Delete));
        assert_eq!(Disposition::parse("failed"), Some(Disposition::Failed));
        assert_eq!(Disposition::parse("merge"), None);
    }

    #[test]
    fn products_land_in_their_bucket() {
        let mut catalog = Catalog::default();
        let mut product = Product::new(Disposition::Update);
        product.product_id = Some("A".into());
        catalog.commit(product);
        assert_eq!(catalog.bucket(Disposition::Update).len(), 1);
        assert!(catalog.bucket(Disposition::New).is_empty());
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.iter().count(), 1);
    }
}
