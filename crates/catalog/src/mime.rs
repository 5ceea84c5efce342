use serde::{Deserialize, Serialize};

use bmeconv_core::ConvertResult;

use crate::validate::{Orderable, Validate, rule};

/// MIME types accepted for catalog attachments.
const ALLOWED_TYPES: [&str; 9] = [
    "url",
    "application/pdf",
    "image/jpeg",
    "image/jpg",
    "image/tif",
    "image/tiff",
    "image/eps",
    "text/html",
    "text/plain",
];

/// Recognized attachment purposes.
const ALLOWED_PURPOSES: [&str; 6] = ["thumbnail", "normal", "detail", "data_sheet", "logo", "others"];

/// An attachment (image, data sheet, url) of a product or reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mime {
    pub source: Option<String>,
    pub mime_type: Option<String>,
    pub description: Option<String>,
    pub alternative_content: Option<String>,
    pub purpose: Option<String>,
    pub order: Option<i64>,
}

/// Two attachments are the same iff they point at the same source.
impl PartialEq for Mime {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Orderable for Mime {
    fn order(&self) -> Option<i64> {
        self.order
    }

    fn set_order(&mut self, order: i64) {
        self.order = Some(order);
    }
}

impl Validate for Mime {
    fn validate(&mut self, strict: bool) -> ConvertResult<()> {
        if self.source.is_none() {
            rule(strict, "mime has no source path")?;
        }
        if self.order.is_none() {
            rule(strict, "mime order is missing")?;
        }
        match self.mime_type.as_deref() {
            None => rule(strict, "mime type is not set")?,
            Some(t) if !ALLOWED_TYPES.contains(&t) => {
                rule(strict, format!("unknown mime type '{t}'"))?;
            }
            Some(_) => {}
        }
        match self.purpose.as_deref() {
            None => rule(strict, "mime purpose is not set")?,
            Some(p) if !ALLOWED_PURPOSES.contains(&p) => {
                rule(strict, format!("unknown mime purpose '{p}'"))?;
            }
            Some(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_mime() -> Mime {
        Mime {
            source: Some("test.jpg".into()),
            mime_type: Some("image/jpg".into()),
            purpose: Some("detail".into()),
            order: Some(1),
            ..Mime::default()
        }
    }

    #[test]
    fn valid_mime_passes() {
        assert!(valid_mime().validate(true).is_ok());
    }

    #[test]
    fn missing_fields_fail_strict() {
        assert!(Mime::default().validate(true).is_err());
        assert!(Mime::default().validate(false).is_ok());
    }

    #[test]
    fn unknown_type_and_purpose_fail_strict() {
        let mut mime = valid_mime();
        mime.mime_type = Some("video/mp4".into());
        assert!(mime.validate(true).is_err());

        let mut mime = valid_mime();
        mime.purpose = Some("banner".into());
        assert!(mime.validate(true).is_err());
    }

    #[test]
    fn equality_is_source_only() {
        let mut a = valid_mime();
        let mut b = valid_mime();
        b.purpose = Some("logo".into());
        b.order = Some(9);
        assert_eq!(a, b);
        a.source = Some("other.jpg".into());
        assert_ne!(a, b);
    }
}
