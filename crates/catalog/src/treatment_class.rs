use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::validate::{Orderable, Validate, rule};

/// Special treatment class of a product (hazard classes and the like).
/// The class type is set at creation from the element's `type` attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentClass {
    pub class_type: Option<String>,
    pub value: Option<String>,
    pub order: Option<i64>,
}

impl TreatmentClass {
    pub fn new(class_type: impl Into<String>) -> Self {
        Self {
            class_type: Some(class_type.into()),
            ..Self::default()
        }
    }
}

/// Equality over the identifying pair, ignoring the list position.
impl PartialEq for TreatmentClass {
    fn eq(&self, other: &Self) -> bool {
        self.class_type == other.class_type && self.value == other.value
    }
}

impl Orderable for TreatmentClass {
    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

impl Validate for TreatmentClass {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.class_type.as_deref().is_none_or(str::is_empty) {
            rule(strict, "treatment class has no type")?;
        }
        if self.value.as_deref().is_none_or(str::is_empty) {
            rule(strict, "treatment class has no value")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_class_fails_strict_validation() {
        let mut class = TreatmentClass::default();
        assert!(class.validate(true).is_err());
        assert!(class.validate(false).is_ok());
    }

    #[test]
    fn filled_class_validates() {
        let mut class = TreatmentClass::new("CType");
        class.value = Some("CValue".into());
        assert!(class.validate(true).is_ok());
    }

    #[test]
    fn equality_ignores_order() {
        let mut a = TreatmentClass::new("CType");
        a.value = Some("CValue".into());
        let mut b = a.clone();
        b.order = Some(5);
        assert_eq!(a, b);
    }
}
