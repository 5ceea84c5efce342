//! Thin event-writer wrapper.
//!
//! Serialization is the second validation gate: a mandatory field that is
//! still absent here raises `Validation` even if the lenient import let it
//! through. Optional fields are skipped when absent or empty.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use bmeconv_core::{ConvertError, ConvertResult};

/// Indented XML event writer with catalog-shaped helpers.
pub struct XmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b' ', 2),
        }
    }

    pub fn declaration(&mut self) -> ConvertResult<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    /// `content` is written verbatim between `<!DOCTYPE` and `>`.
    pub fn doctype(&mut self, content: &str) -> ConvertResult<()> {
        self.inner
            .write_event(Event::DocType(BytesText::from_escaped(content)))?;
        Ok(())
    }

    pub fn open(&mut self, tag: &str) -> ConvertResult<()> {
        self.open_with(tag, &[])
    }

    pub fn open_with(&mut self, tag: &str, attrs: &[(&str, &str)]) -> ConvertResult<()> {
        let mut start = BytesStart::new(tag);
        for (key, value) in attrs {
            start.push_attribute((*key, *value));
        }
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn close(&mut self, tag: &str) -> ConvertResult<()> {
        self.inner.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// `<TAG>text</TAG>`
    pub fn leaf(&mut self, tag: &str, text: &str) -> ConvertResult<()> {
        self.open(tag)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    pub fn leaf_with(
        &mut self,
        tag: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> ConvertResult<()> {
        self.open_with(tag, attrs)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.close(tag)
    }

    /// A leaf that must carry a value; `owner` names the entity in the
    /// error message.
    pub fn mandatory(&mut self, tag: &str, value: Option<&str>, owner: &str) -> ConvertResult<()> {
        match value {
            Some(value) if !value.is_empty() => self.leaf(tag, value),
            _ => Err(ConvertError::validation(format!(
                "{owner} is missing its mandatory {tag}"
            ))),
        }
    }

    /// A leaf that is skipped when the value is absent or empty.
    pub fn optional(&mut self, tag: &str, value: Option<&str>) -> ConvertResult<()> {
        match value {
            Some(value) if !value.is_empty() => self.leaf(tag, value),
            _ => Ok(()),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

/// The capability every exportable entity implements.
pub trait WriteXml {
    fn write_xml<W: Write>(&self, xml: &mut XmlWriter<W>) -> ConvertResult<()>;
}

/// Canonical numeric rendering: integers without a decimal point, the
/// canonical `.` separator otherwise.
pub(crate) fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(write: impl FnOnce(&mut XmlWriter<Vec<u8>>) -> ConvertResult<()>) -> String {
        let mut xml = XmlWriter::new(Vec::new());
        write(&mut xml).unwrap();
        String::from_utf8(xml.into_inner()).unwrap()
    }

    #[test]
    fn leaves_escape_their_content() {
        let out = render(|xml| xml.leaf("DESCRIPTION_SHORT", "M8 & M10"));
        assert_eq!(out, "<DESCRIPTION_SHORT>M8 &amp; M10</DESCRIPTION_SHORT>");
    }

    #[test]
    fn attributes_are_rendered() {
        let out = render(|xml| xml.leaf_with("SPECIAL_TREATMENT_CLASS", &[("type", "GGVS")], "1201"));
        assert_eq!(
            out,
            "<SPECIAL_TREATMENT_CLASS type=\"GGVS\">1201</SPECIAL_TREATMENT_CLASS>"
        );
    }

    #[test]
    fn a_missing_mandatory_field_raises() {
        let mut xml = XmlWriter::new(Vec::new());
        let err = xml.mandatory("SUPPLIER_AID", None, "the article").unwrap_err();
        assert!(matches!(err, ConvertError::Validation(_)));
        assert!(xml.mandatory("SUPPLIER_AID", Some(""), "the article").is_err());
    }

    #[test]
    fn a_missing_optional_field_is_skipped() {
        let out = render(|xml| {
            xml.optional("EAN", None)?;
            xml.optional("EAN", Some(""))?;
            xml.leaf("OK", "1")
        });
        assert_eq!(out, "<OK>1</OK>");
    }

    #[test]
    fn numbers_render_canonically() {
        assert_eq!(fmt_number(2.0), "2");
        assert_eq!(fmt_number(10500.99), "10500.99");
        assert_eq!(fmt_number(0.19), "0.19");
    }
}
