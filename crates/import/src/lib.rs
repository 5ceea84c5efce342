//! `bmeconv-import` — streaming catalog document import.
//!
//! The reader pulls XML events out of quick-xml and hands them to a closed
//! dispatch over the recognized tag vocabulary. Element nesting is tracked
//! through owned entity slots on the parse state; the populated slots are
//! the only record of which elements are open.

pub mod handler;
pub mod reader;
pub mod state;
pub mod tags;

pub use handler::{Attrs, Importer};
pub use reader::{read_catalog, read_file, read_str};
pub use state::ParserState;
