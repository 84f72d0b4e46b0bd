//! Document entry points
//!
//! Parsing is eager: the whole input is read and parsed before any decode
//! starts.

use crate::destination::Unmarshal;
use crate::dispatch::unmarshal_by_type;
use crate::error::{DecodeResult, UnmarshalResult};
use crate::selection::Selection;
use crate::tag::Tag;
use scraper::Html;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::{info, instrument};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Parse bytes as UTF-8, replacing invalid sequences with U+FFFD
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// Read the whole stream, then parse it
    pub fn from_reader(mut reader: impl Read) -> DecodeResult<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Selection holding the document node
    pub fn selection(&self) -> Selection<'_> {
        Selection::from_document(&self.html)
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Decode the whole document into `value`
    pub fn unmarshal<'doc, T: Unmarshal<'doc>>(&'doc self, value: &mut T) -> UnmarshalResult<()> {
        unmarshal_selection(&self.selection(), value)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("errors", &self.html.errors.len())
            .finish_non_exhaustive()
    }
}

/// Decode a selection into `value`
///
/// A custom decoder on `value` receives the selection's nodes; otherwise the
/// value is decoded by shape without an annotation.
#[instrument(skip(selection, value), fields(type_name = value.type_name(), nodes = selection.len()))]
pub fn unmarshal_selection<'doc, T: Unmarshal<'doc>>(
    selection: &Selection<'doc>,
    value: &mut T,
) -> UnmarshalResult<()> {
    unmarshal_by_type(selection, value, &Tag::default())
}

/// Parse `bytes` as HTML and decode the document into `value`
pub fn unmarshal<T>(bytes: &[u8], value: &mut T) -> DecodeResult<()>
where
    T: for<'doc> Unmarshal<'doc>,
{
    let document = Document::from_bytes(bytes);
    document.unmarshal(value)?;
    Ok(())
}

/// Parse `source` as HTML and decode the document into `value`
pub fn unmarshal_str<T>(source: &str, value: &mut T) -> DecodeResult<()>
where
    T: for<'doc> Unmarshal<'doc>,
{
    let document = Document::parse(source);
    document.unmarshal(value)?;
    Ok(())
}

/// Decoder over a byte stream, in the style of `serde_json::from_reader`
///
/// The stream is read and parsed in [`Decoder::new`]; a read failure is
/// reported by every call to [`Decoder::decode`]. The reported error wraps
/// the original one, which `io::Error::get_ref` exposes as an
/// `Arc<io::Error>`.
#[derive(Debug)]
pub struct Decoder {
    document: Result<Document, Arc<io::Error>>,
}

impl Decoder {
    pub fn new(mut reader: impl Read) -> Self {
        let mut bytes = Vec::new();
        let document = match reader.read_to_end(&mut bytes) {
            Ok(_) => Ok(Document::from_bytes(&bytes)),
            Err(err) => Err(Arc::new(err)),
        };
        Self { document }
    }

    /// The parsed document, if reading succeeded
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref().ok()
    }

    #[instrument(skip(self, value))]
    pub fn decode<'doc, T: Unmarshal<'doc>>(&'doc self, value: &mut T) -> DecodeResult<()> {
        let document = match &self.document {
            Ok(document) => document,
            Err(err) => return Err(io::Error::new(err.kind(), Arc::clone(err)).into()),
        };
        document.unmarshal(value)?;
        info!(type_name = value.type_name(), "Decoded document");
        Ok(())
    }
}
