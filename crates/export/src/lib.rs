//! `bmeconv-export` — BMEcat 1.2 catalog export.
//!
//! Entities serialize through the [`WriteXml`] capability; the exporter
//! wraps them in the document frame (header, group system, group mapping).
//! Serialization double-checks mandatory fields, so a catalog assembled
//! leniently still cannot produce a structurally broken document.

pub mod entities;
pub mod exporter;
pub mod xml;

pub use exporter::{write_catalog, write_catalog_at, write_file, write_string};
pub use xml::{WriteXml, XmlWriter};
