//! Streaming document reader.
//!
//! Pulls events out of quick-xml and feeds them to the [`Importer`]. The
//! document is never materialized as a tree; memory usage follows the
//! deepest open element, not the document size.

use std::io::BufRead;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use bmeconv_catalog::Catalog;
use bmeconv_core::{ConvertError, ConvertResult, ConverterConfig, Mappings};

use crate::handler::{Attrs, Importer};
use crate::state::ParserState;

/// Parse a catalog document from any buffered reader.
pub fn read_catalog<R: BufRead>(
    mut reader: Reader<R>,
    config: &ConverterConfig,
    mappings: &Mappings,
) -> ConvertResult<Catalog> {
    reader.config_mut().trim_text(true);
    let importer = Importer::new(config, mappings);
    let mut state = ParserState::new();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                let attrs = element_attrs(&e)?;
                importer.handle_open(&mut state, &name, &attrs)?;
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                let attrs = element_attrs(&e)?;
                importer.handle_open(&mut state, &name, &attrs)?;
                importer.handle_close(&mut state, &name)?;
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                importer.handle_close(&mut state, &name)?;
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|err| ConvertError::read(err.to_string()))?;
                importer.handle_text(&mut state, &text);
            }
            Ok(Event::CData(t)) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                importer.handle_text(&mut state, &text);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(ConvertError::read(err.to_string())),
        }
        buf.clear();
    }
    Ok(state.into_catalog())
}

/// Parse a catalog document held in memory.
pub fn read_str(
    xml: &str,
    config: &ConverterConfig,
    mappings: &Mappings,
) -> ConvertResult<Catalog> {
    read_catalog(Reader::from_reader(xml.as_bytes()), config, mappings)
}

/// Parse a catalog document from disk.
pub fn read_file(
    path: &Path,
    config: &ConverterConfig,
    mappings: &Mappings,
) -> ConvertResult<Catalog> {
    let reader = Reader::from_file(path)
        .map_err(|err| ConvertError::read(format!("{}: {err}", path.display())))?;
    read_catalog(reader, config, mappings)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn element_attrs(e: &BytesStart<'_>) -> ConvertResult<Attrs> {
    let mut attrs = Attrs::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ConvertError::read(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_lowercase();
        let value = attr
            .unescape_value()
            .map_err(|err| ConvertError::read(err.to_string()))?
            .into_owned();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmeconv_catalog::Disposition;
    use bmeconv_core::NumberFormat;

    fn config() -> ConverterConfig {
        ConverterConfig::new(NumberFormat::GERMAN, "%Y-%m-%d", false).unwrap()
    }

    const MINIMAL: &str = r#"
        <BMECAT version="1.2">
          <T_NEW_CATALOG>
            <ARTICLE mode="new">
              <SUPPLIER_AID>4711</SUPPLIER_AID>
              <ARTICLE_DETAILS>
                <DESCRIPTION_SHORT>Schlosserhammer</DESCRIPTION_SHORT>
                <DESCRIPTION_LONG>Stahl, geschmiedet.</DESCRIPTION_LONG>
                <EAN>4003773031703</EAN>
                <DELIVERY_TIME>2</DELIVERY_TIME>
              </ARTICLE_DETAILS>
              <ARTICLE_ORDER_DETAILS>
                <ORDER_UNIT>C62</ORDER_UNIT>
                <NO_CU_PER_OU>1</NO_CU_PER_OU>
              </ARTICLE_ORDER_DETAILS>
              <ARTICLE_PRICE_DETAILS>
                <DATETIME type="valid_start_date">
                  <DATE>2024-01-01</DATE>
                </DATETIME>
                <ARTICLE_PRICE price_type="net_customer">
                  <PRICE_AMOUNT>10.500,99</PRICE_AMOUNT>
                  <PRICE_CURRENCY>EUR</PRICE_CURRENCY>
                  <TAX>19%</TAX>
                  <TERRITORY>DE</TERRITORY>
                </ARTICLE_PRICE>
              </ARTICLE_PRICE_DETAILS>
            </ARTICLE>
          </T_NEW_CATALOG>
        </BMECAT>
    "#;

    #[test]
    fn a_complete_document_parses() {
        let mappings = Mappings::with_default_units();
        let catalog = read_str(MINIMAL, &config(), &mappings).unwrap();
        assert_eq!(catalog.len(), 1);
        let product = &catalog.bucket(Disposition::New)[0];
        assert_eq!(product.product_id.as_deref(), Some("4711"));
        let details = product.details.as_ref().unwrap();
        assert_eq!(details.title.as_deref(), Some("Schlosserhammer"));
        assert_eq!(details.ean.as_deref(), Some("4003773031703"));
        assert_eq!(details.delivery_time, 2.0);
        let price_details = &product.price_details[0];
        assert_eq!(
            price_details.valid_from,
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        let price = &price_details.prices[0];
        assert_eq!(price.amount, Some(10500.99));
        assert_eq!(price.tax, Some(0.19));
        assert_eq!(price.territory.as_deref(), Some("DE"));
    }

    #[test]
    fn the_product_vocabulary_parses_like_the_article_one() {
        let xml = r#"
            <PRODUCT mode="new">
              <SUPPLIER_PID>P-1</SUPPLIER_PID>
              <PRODUCT_DETAILS>
                <DESCRIPTION_SHORT>Titel</DESCRIPTION_SHORT>
              </PRODUCT_DETAILS>
            </PRODUCT>
        "#;
        let mappings = Mappings::with_default_units();
        let catalog = read_str(xml, &config(), &mappings).unwrap();
        let product = &catalog.bucket(Disposition::New)[0];
        assert_eq!(product.product_id.as_deref(), Some("P-1"));
        assert_eq!(
            product.details.as_ref().unwrap().title.as_deref(),
            Some("Titel")
        );
    }

    #[test]
    fn malformed_xml_is_a_read_error() {
        let mappings = Mappings::with_default_units();
        let err = read_str("<ARTICLE><SUPPLIER_AID>1</ARTICLE>", &config(), &mappings)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read(_)));
    }

    #[test]
    fn nested_articles_are_a_structure_error() {
        let mappings = Mappings::with_default_units();
        let err = read_str("<ARTICLE><ARTICLE/></ARTICLE>", &config(), &mappings).unwrap_err();
        assert!(matches!(err, ConvertError::Structure(_)));
    }

    #[test]
    fn escaped_entities_are_decoded() {
        let xml = r#"
            <ARTICLE mode="new">
              <SUPPLIER_AID>1</SUPPLIER_AID>
              <ARTICLE_DETAILS>
                <DESCRIPTION_SHORT>Bolzen M8 &amp; M10</DESCRIPTION_SHORT>
              </ARTICLE_DETAILS>
            </ARTICLE>
        "#;
        let mappings = Mappings::with_default_units();
        let catalog = read_str(xml, &config(), &mappings).unwrap();
        let details = catalog.bucket(Disposition::New)[0].details.as_ref().unwrap();
        assert_eq!(details.title.as_deref(), Some("Bolzen M8 & M10"));
    }

    #[test]
    fn an_empty_document_yields_an_empty_catalog() {
        let mappings = Mappings::with_default_units();
        let catalog = read_str("<BMECAT version=\"1.2\"/>", &config(), &mappings).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn a_missing_file_is_a_read_error() {
        let mappings = Mappings::with_default_units();
        let err = read_file(Path::new("/nonexistent/catalog.xml"), &config(), &mappings)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Read(_)));
    }
}
