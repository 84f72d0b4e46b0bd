//! # Tagscrape
//!
//! Declarative decoding of HTML documents into annotated Rust types.
//!
//! ## Annotations
//!
//! Record fields carry an annotation made of a CSS selector followed by any
//! number of comma separated value selectors:
//!
//! ```text
//! #[scrape("ul.links > li,[href]")]
//! ```
//!
//! - Slot 0 narrows the selection to matching descendants. An empty slot 0
//!   keeps the current selection.
//! - Slot 1 picks the literal handed to scalars: `text` (trimmed text, the
//!   default), `html` (inner markup) or `[attr]` (attribute value). Unknown
//!   keywords fall back to `text`.
//! - Leading `!Name` tokens are directives (`!Parent`, `!Next`, `!Children`,
//!   ...) applied to the selection before slot 0. Unknown names are ignored.
//! - `!ignore` excludes a field. Fields without an annotation are skipped
//!   unless their type decodes raw nodes.
//!
//! ## Shapes
//!
//! - Types implementing [`UnmarshalHtml`] receive the matched nodes and take
//!   precedence over everything below.
//! - Records decode each annotated field from their own selection; any value
//!   selectors left over from an outer level are dropped.
//! - `Vec<T>` decodes one element per matched node, `[T; N]` requires exactly
//!   `N` matched nodes.
//! - Maps need a key selector in slot 1. Keys are taken from the shallowest
//!   generation of descendants containing a match; each value is decoded from
//!   inside its key node with slot 1 shifted off the annotation, so
//!   `Vec<HashMap<String, Vec<String>>>` annotated `"dl,dt,[title]"` uses `dt`
//!   for the keys and `[title]` for the strings.
//! - `Option<T>` and `Box<T>` decode into a freshly allocated `T`.
//! - [`Nodes`] captures the matched nodes verbatim.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tagscrape::Unmarshal;
//!
//! #[derive(Debug, Default, Unmarshal)]
//! struct Item {
//!     #[scrape(".title")]
//!     title: String,
//!     #[scrape(",[data-id]")]
//!     id: u32,
//! }
//!
//! #[derive(Debug, Default, Unmarshal)]
//! struct Page {
//!     #[scrape("li.item")]
//!     items: Vec<Item>,
//! }
//!
//! let mut page = Page::default();
//! tagscrape::unmarshal_str(source, &mut page)?;
//! ```

extern crate self as tagscrape;

pub mod destination;
pub mod dispatch;
pub mod document;
pub mod error;
mod map;
pub mod narrow;
pub mod scalar;
pub mod schema;
pub mod selection;
pub mod tag;
pub mod value_fn;

#[cfg(test)]
mod tests_dispatch;

#[cfg(test)]
mod tests_map;

#[cfg(test)]
mod tests_schema;

pub use destination::{
    Array, Dest, Field, MapSink, Nodes, Record, Scalar, Sequence, Shape, Unmarshal, UnmarshalHtml,
};
pub use dispatch::unmarshal_by_type;
pub use document::{unmarshal, unmarshal_selection, unmarshal_str, Decoder, Document};
pub use error::{
    BoxError, Cause, ConversionError, DecodeError, DecodeResult, Location, Reason, SelectorError,
    SelectorResult, UnmarshalError, UnmarshalResult,
};
pub use narrow::{narrow, Directive};
pub use schema::{DynamicValue, FieldSchema, Schema};
pub use selection::{HtmlNode, Selection};
pub use tag::Tag;
pub use value_fn::{ValueFn, ValueFnCache};

pub use tagscrape_derive::Unmarshal;
