//! Validation and ordering capabilities shared by the catalog entities.

use bmeconv_core::{ConvertError, ConvertResult};

/// Validation capability.
///
/// `strict == true` raises on the first violated rule; otherwise the
/// violation is recorded as a diagnostic and processing continues.
/// Validation may normalize fields in place (trimming, newline collapsing).
/// Composite entities recursively validate their owned children.
pub trait Validate {
    fn validate(&mut self, strict: bool) -> ConvertResult<()>;
}

/// Record a rule violation; raise only in strict mode.
pub(crate) fn rule(strict: bool, msg: impl Into<String>) -> ConvertResult<()> {
    let msg = msg.into();
    tracing::error!("{msg}");
    if strict {
        Err(ConvertError::validation(msg))
    } else {
        Ok(())
    }
}

/// Record a rule violation that is fatal regardless of strictness.
pub(crate) fn fatal_rule(msg: impl Into<String>) -> ConvertResult<()> {
    let msg = msg.into();
    tracing::error!("{msg}");
    Err(ConvertError::validation(msg))
}

/// Entities carrying an explicit position in their owning list.
pub trait Orderable {
    fn order(&self) -> Option<i64>;
    fn set_order(&mut self, order: i64);
}

/// The order assigned to an item appended to `list` without a positive
/// order of its own: one past the current maximum, or 1 for an empty list.
pub(crate) fn next_order<T: Orderable>(list: &[T]) -> i64 {
    list.iter()
        .filter_map(Orderable::order)
        .max()
        .map(|max| max + 1)
        .unwrap_or(1)
}

/// Commit an orderable entity into its owning list: auto-assign the order
/// when absent or non-positive, validate, and drop invalid or duplicate
/// items with a warning instead of raising.
pub(crate) fn commit_ordered<T>(list: &mut Vec<T>, mut item: T, what: &str) -> bool
where
    T: Orderable + Validate + PartialEq,
{
    if item.order().is_none_or(|order| order <= 0) {
        item.set_order(next_order(list));
    }
    if let Err(err) = item.validate(true) {
        tracing::warn!("{what} not committed: {err}");
        return false;
    }
    if list.contains(&item) {
        tracing::warn!("{what} not committed: duplicate entry");
        return false;
    }
    list.push(item);
    true
}
