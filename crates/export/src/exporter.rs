//! Whole-document catalog export.
//!
//! Writes a BMEcat 1.2 document: header, the fixed two-level group system,
//! all committed articles per disposition bucket, and one group-mapping
//! entry per article.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Local};

use bmeconv_catalog::{Catalog, Product};
use bmeconv_core::ConvertResult;

use crate::xml::{WriteXml, XmlWriter};

/// Fallback catalog-id initials when no operator name is usable.
const FALLBACK_INITIALS: &str = "BC_TEMP";

/// Serialize the catalog into any writer.
pub fn write_catalog<W: Write>(catalog: &Catalog, operator: &str, sink: W) -> ConvertResult<()> {
    write_catalog_at(catalog, operator, Local::now(), sink)
}

/// Serialize the catalog with an explicit generation timestamp.
pub fn write_catalog_at<W: Write>(
    catalog: &Catalog,
    operator: &str,
    now: DateTime<Local>,
    sink: W,
) -> ConvertResult<()> {
    let mut xml = XmlWriter::new(sink);
    xml.declaration()?;
    xml.doctype("BMECAT SYSTEM \"bmecat_new_catalog.dtd\"")?;
    xml.open_with(
        "BMECAT",
        &[
            ("version", "1.2"),
            ("xml:lang", "de"),
            ("xmlns", "http://www.bmecat.org/bmecat/1.2/bmecat_new_catalog"),
        ],
    )?;
    write_header(&mut xml, operator, now)?;
    xml.open("T_NEW_CATALOG")?;
    write_group_system(&mut xml)?;
    for product in catalog.iter() {
        product.write_xml(&mut xml)?;
    }
    for product in catalog.iter() {
        write_group_mapping(&mut xml, product)?;
    }
    xml.close("T_NEW_CATALOG")?;
    xml.close("BMECAT")?;
    tracing::info!(products = catalog.len(), "catalog exported");
    Ok(())
}

/// Serialize the catalog into a string.
pub fn write_string(catalog: &Catalog, operator: &str) -> ConvertResult<String> {
    let mut sink = Vec::new();
    write_catalog(catalog, operator, &mut sink)?;
    Ok(String::from_utf8_lossy(&sink).into_owned())
}

/// Serialize the catalog to disk.
pub fn write_file(catalog: &Catalog, operator: &str, path: &Path) -> ConvertResult<()> {
    let mut sink = BufWriter::new(File::create(path)?);
    write_catalog(catalog, operator, &mut sink)?;
    sink.flush()?;
    Ok(())
}

fn write_header<W: Write>(
    xml: &mut XmlWriter<W>,
    operator: &str,
    now: DateTime<Local>,
) -> ConvertResult<()> {
    let initials = initials(operator);
    let stamp = now.format("%Y%m%d").to_string();
    xml.open("HEADER")?;
    xml.leaf("GENERATOR_INFO", "BMEcatConverter Contorion")?;
    xml.open("CATALOG")?;
    xml.leaf("LANGUAGE", "deu")?;
    xml.leaf("CATALOG_ID", &format!("{stamp}_{initials}"))?;
    xml.leaf("CATALOG_VERSION", "1.0")?;
    xml.leaf("CATALOG_NAME", &format!("{stamp}-Fiege-Update_{initials}"))?;
    xml.open_with("DATETIME", &[("type", "generation_date")])?;
    xml.leaf("DATE", &now.format("%Y-%m-%d").to_string())?;
    xml.leaf("TIME", &now.format("%H:%M:%S").to_string())?;
    xml.close("DATETIME")?;
    xml.leaf("CURRENCY", "EUR")?;
    xml.close("CATALOG")?;
    xml.open("BUYER")?;
    xml.leaf("BUYER_NAME", "Contorion GmbH")?;
    xml.close("BUYER")?;
    xml.open("SUPPLIER")?;
    xml.leaf("SUPPLIER_NAME", "Contorion GmbH")?;
    xml.close("SUPPLIER")?;
    xml.close("HEADER")
}

/// The fixed two-level group system every article maps into.
fn write_group_system<W: Write>(xml: &mut XmlWriter<W>) -> ConvertResult<()> {
    xml.open("CATALOG_GROUP_SYSTEM")?;
    xml.leaf("GROUP_SYSTEM_ID", "1")?;
    xml.leaf("GROUP_SYSTEM_NAME", "Default Groupsystem Contorion")?;
    xml.open_with("CATALOG_STRUCTURE", &[("type", "root")])?;
    xml.leaf("GROUP_ID", "1")?;
    xml.leaf("GROUP_NAME", "Katalog")?;
    xml.leaf("PARENT_ID", "0")?;
    xml.leaf("GROUP_ORDER", "1")?;
    xml.close("CATALOG_STRUCTURE")?;
    xml.open_with("CATALOG_STRUCTURE", &[("type", "leaf")])?;
    xml.leaf("GROUP_ID", "2")?;
    xml.leaf("GROUP_NAME", "Produkte")?;
    xml.leaf("PARENT_ID", "1")?;
    xml.leaf("GROUP_ORDER", "2")?;
    xml.close("CATALOG_STRUCTURE")?;
    xml.close("CATALOG_GROUP_SYSTEM")
}

fn write_group_mapping<W: Write>(xml: &mut XmlWriter<W>, product: &Product) -> ConvertResult<()> {
    xml.open("ARTICLE_TO_CATALOGGROUP_MAP")?;
    xml.mandatory("ART_ID", product.product_id.as_deref(), "the group mapping")?;
    xml.leaf("CATALOG_GROUP_ID", "2")?;
    xml.leaf("ARTICLE_TO_CATALOGGROUP_MAP_ORDER", "2")?;
    xml.close("ARTICLE_TO_CATALOGGROUP_MAP")
}

/// Derive catalog-id initials from the operator name: split on spaces or
/// dots, expand a dash-joined first part, upper-case the first letters.
/// A single-word name contributes its first letter; an empty name falls
/// back to a fixed marker.
fn initials(operator: &str) -> String {
    let operator = operator.trim();
    let mut parts: Vec<&str> = if operator.contains(' ') {
        operator.split(' ').collect()
    } else if operator.contains('.') {
        operator.split('.').collect()
    } else {
        vec![operator]
    };
    if parts.len() > 1 && parts[0].contains('-') {
        let head = parts[0];
        let tail = parts.split_off(1);
        parts = head.split('-').chain(tail).collect();
    }
    let initials: String = parts
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if initials.is_empty() {
        FALLBACK_INITIALS.to_string()
    } else {
        initials
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bmeconv_catalog::{Disposition, OrderDetails, Price, PriceDetails, ProductDetails};

    #[test]
    fn initials_derive_from_the_operator_name() {
        assert_eq!(initials("henrik.pilz"), "HP");
        assert_eq!(initials("Hans Meier"), "HM");
        assert_eq!(initials("hans-peter meier"), "HPM");
        assert_eq!(initials("admin"), "A");
        assert_eq!(initials(""), "BC_TEMP");
        assert_eq!(initials("  "), "BC_TEMP");
    }

    fn one_product() -> Product {
        let mut product = Product::new(Disposition::New);
        product.product_id = Some("4711".into());
        product.details = Some(ProductDetails {
            title: Some("Hammer".into()),
            ..ProductDetails::default()
        });
        product.order_details = Some(OrderDetails::default());
        let mut price_details = PriceDetails::default();
        let mut price = Price::new("net_list");
        price.amount = Some(9.99);
        price_details.add_price(price);
        product.add_price_details(price_details);
        product
    }

    fn one_product_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.commit(one_product());
        catalog
    }

    #[test]
    fn the_document_carries_header_and_group_system() {
        let out = write_string(&one_product_catalog(), "henrik.pilz").unwrap();
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(out.contains("<BMECAT version=\"1.2\""));
        assert!(out.contains("<GENERATOR_INFO>BMEcatConverter Contorion</GENERATOR_INFO>"));
        assert!(out.contains("_HP</CATALOG_ID>"));
        assert!(out.contains("<CURRENCY>EUR</CURRENCY>"));
        assert!(out.contains("<GROUP_SYSTEM_ID>1</GROUP_SYSTEM_ID>"));
        assert!(out.contains("CATALOG_STRUCTURE type=\"leaf\""));
    }

    #[test]
    fn every_article_gets_a_group_mapping() {
        let out = write_string(&one_product_catalog(), "x").unwrap();
        assert!(out.contains("<ART_ID>4711</ART_ID>"));
        assert!(out.contains("<CATALOG_GROUP_ID>2</CATALOG_GROUP_ID>"));
        assert!(out.contains("<ARTICLE_TO_CATALOGGROUP_MAP_ORDER>2</ARTICLE_TO_CATALOGGROUP_MAP_ORDER>"));
    }

    #[test]
    fn an_invalid_product_aborts_the_export() {
        let mut catalog = Catalog::default();
        let mut product = Product::default();
        product.product_id = Some("1".into());
        catalog.commit(product);
        assert!(write_string(&catalog, "x").is_err());
    }

    #[test]
    fn an_article_without_order_details_aborts_the_export() {
        let mut product = one_product();
        product.order_details = None;
        let mut catalog = Catalog::default();
        catalog.commit(product);
        assert!(write_string(&catalog, "x").is_err());
    }

    #[test]
    fn an_article_without_prices_aborts_the_export() {
        let mut product = one_product();
        product.price_details.clear();
        let mut catalog = Catalog::default();
        catalog.commit(product);
        assert!(write_string(&catalog, "x").is_err());
    }
}
