//! Name blacklists.
//!
//! Features and feature sets whose names match a configured blacklist are
//! silently dropped at commit time instead of raising.

use std::collections::HashSet;

use serde::Deserialize;

/// A configured set of excluded names. Read-only after construction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Blacklist(HashSet<String>);

impl Blacklist {
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Containment query. An absent or empty name never matches.
    pub fn contains(&self, name: Option<&str>) -> bool {
        match name {
            Some(name) if !name.is_empty() => self.0.contains(name),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_names_match() {
        let blacklist = Blacklist::new(["customs_tariff_number"]);
        assert!(blacklist.contains(Some("customs_tariff_number")));
        assert!(!blacklist.contains(Some("weight")));
    }

    #[test]
    fn absent_and_empty_names_never_match() {
        let blacklist = Blacklist::new([""]);
        assert!(!blacklist.contains(None));
        assert!(!blacklist.contains(Some("")));
    }
}
