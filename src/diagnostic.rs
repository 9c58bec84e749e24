//! Degrade-and-continue events reported by the decoders.

use crate::document::Document;

/// Something a decoder dropped or skipped while still producing a document.
///
/// Decoding never fails; each variant names the smallest unit that was
/// discarded so callers can audit non-conformant input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A tag declared more value bytes than remained; it and the rest of the
    /// input were dropped.
    TruncatedTag {
        /// Tag name as written.
        name: String,
        /// Declared value length.
        declared: usize,
        /// Bytes that were actually left.
        available: usize,
    },
    /// Input ended with fields that no `<eor>` terminated.
    UnterminatedRecord {
        /// Number of buffered fields that were discarded.
        fields: usize,
    },
    /// `<eor>` with nothing buffered.
    EmptyRecord,
    /// A bare marker other than `<eoh>`/`<eor>`, such as `<APP_LoTW_EOF>`.
    UnknownMarker {
        /// Marker name as written.
        name: String,
    },
    /// A `<...>` span whose length slot is not a number.
    MalformedTag {
        /// Text between the angle brackets.
        text: String,
    },
    /// `<eoh>` after records already started.
    StrayEndOfHeader,
    /// The XML reader failed; everything after `position` was dropped.
    MalformedXml {
        /// Byte offset reported by the reader.
        position: u64,
        /// Reader error text.
        message: String,
    },
    /// An ADX element that does not map onto the document model.
    IgnoredElement {
        /// Element name as written.
        name: String,
    },
}

/// A decoded document plus what was dropped on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parsed {
    /// The decoded document.
    pub document: Document,
    /// Degradations in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    /// Returns true when nothing was dropped.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
