//! Token-to-document state machine for ADI input.

use tracing::{debug, trace};

use crate::{
    diagnostic::{Diagnostic, Parsed},
    document::{Document, Header, Record, UserDef, userdef_id},
    field::FieldMap,
};

use super::tokenizer::{Tag, Token, Tokenizer};

/// Where the assembler is in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing but filler seen so far.
    BeforeHeader,
    /// Fields buffered with no terminator yet. They become the header on
    /// `<eoh>`, or the first record on `<eor>` (headerless input).
    InHeader,
    /// Past the header; fields accumulate into records.
    InRecord,
}

/// Folds a token stream into a [`Document`].
///
/// Never fails: anything that does not fit is dropped at the smallest unit
/// and reported as a [`Diagnostic`].
#[derive(Debug)]
pub struct Assembler {
    state: State,
    pending: FieldMap,
    pending_userdefs: Vec<UserDef>,
    document: Document,
    diagnostics: Vec<Diagnostic>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembler {
    /// Creates an assembler in [`State::BeforeHeader`].
    pub fn new() -> Self {
        Self {
            state: State::BeforeHeader,
            pending: FieldMap::new(),
            pending_userdefs: Vec::new(),
            document: Document::default(),
            diagnostics: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Feeds one token.
    pub fn push(&mut self, token: Token<'_>) {
        match token {
            Token::Text(_) => {}
            Token::Tag(tag) => self.on_field(&tag),
            Token::Marker(name) if name.eq_ignore_ascii_case(b"eoh") => self.on_end_of_header(),
            Token::Marker(name) if name.eq_ignore_ascii_case(b"eor") => self.on_end_of_record(),
            Token::Marker(name) => {
                let name = String::from_utf8_lossy(name).into_owned();
                trace!(marker = %name, "absorbing unknown marker");
                self.diagnostics.push(Diagnostic::UnknownMarker { name });
            }
            Token::Malformed(text) => {
                let text = String::from_utf8_lossy(text).into_owned();
                debug!(tag = %text, "skipping malformed tag");
                self.diagnostics.push(Diagnostic::MalformedTag { text });
            }
            Token::Truncated {
                name,
                declared,
                available,
            } => {
                let name = String::from_utf8_lossy(name).into_owned();
                debug!(
                    tag = %name,
                    declared,
                    available,
                    "dropping truncated tag and remaining input"
                );
                self.diagnostics.push(Diagnostic::TruncatedTag {
                    name,
                    declared,
                    available,
                });
            }
        }
    }

    /// Consumes the assembler, discarding any unterminated record.
    pub fn finish(mut self) -> Parsed {
        if !self.pending.is_empty() {
            let fields = self.pending.len();
            debug!(fields, "discarding unterminated record at end of input");
            self.diagnostics.push(Diagnostic::UnterminatedRecord { fields });
        }
        Parsed {
            document: self.document,
            diagnostics: self.diagnostics,
        }
    }

    fn on_field(&mut self, tag: &Tag<'_>) {
        let name = tag.name();
        let value = tag.value();

        if self.state != State::InRecord {
            self.state = State::InHeader;
            if let Some(id) = userdef_id(&name) {
                let hint = tag.type_hint();
                self.pending_userdefs
                    .push(UserDef::from_adi(id, hint.as_deref(), &value));
            }
        }
        self.pending.insert(&name, value);
    }

    fn on_end_of_header(&mut self) {
        if self.state == State::InRecord {
            debug!("ignoring <eoh> after records started");
            self.diagnostics.push(Diagnostic::StrayEndOfHeader);
            return;
        }

        let mut header = Header::from_pairs(
            std::mem::take(&mut self.pending)
                .iter()
                .map(|f| (f.name.as_str(), f.value.as_str())),
        );
        for userdef in self.pending_userdefs.drain(..) {
            header.add_userdef(userdef);
        }
        trace!(
            fields = header.fields().len(),
            userdefs = header.userdefs().len(),
            "header complete"
        );
        self.document.header = header;
        self.state = State::InRecord;
    }

    fn on_end_of_record(&mut self) {
        if self.pending.is_empty() {
            trace!("ignoring <eor> with no buffered fields");
            self.diagnostics.push(Diagnostic::EmptyRecord);
            self.state = State::InRecord;
            return;
        }

        // Headerless input: buffered USERDEF tags were plain record fields.
        self.pending_userdefs.clear();
        let record = Record::from(std::mem::take(&mut self.pending));
        self.document.push(record);
        self.state = State::InRecord;
    }
}

/// Assembles every token `tokens` yields.
pub fn assemble(tokens: Tokenizer<'_>) -> Parsed {
    let mut asm = Assembler::new();
    for token in tokens {
        asm.push(token);
    }
    asm.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adi::tokenizer::tokenize;

    fn run(input: &str) -> Parsed {
        assemble(tokenize(input.as_bytes()))
    }

    #[test]
    fn states_follow_markers() {
        let mut asm = Assembler::new();
        assert_eq!(asm.state(), State::BeforeHeader);
        for tok in tokenize(b"<programid:4>test") {
            asm.push(tok);
        }
        assert_eq!(asm.state(), State::InHeader);
        for tok in tokenize(b"<eoh>") {
            asm.push(tok);
        }
        assert_eq!(asm.state(), State::InRecord);
        let parsed = asm.finish();
        assert_eq!(parsed.document.header.get("programid"), Some("test"));
        assert!(parsed.document.records.is_empty());
    }

    #[test]
    fn headerless_first_record() {
        let parsed = run("<USERDEF1:3>abc<call:4>K1AB<eor>");
        assert!(parsed.document.header.is_empty());
        assert_eq!(parsed.document.records.len(), 1);
        assert_eq!(parsed.document.records[0].get("userdef1"), Some("abc"));
        assert!(parsed.is_clean());
    }

    #[test]
    fn degradations_are_reported() {
        let parsed = run("<eor><call:4>K1AB<eor><eoh><APP_X_EOF><call:x>Q<call:2>W1");
        assert_eq!(parsed.document.records.len(), 1);
        assert_eq!(
            parsed.diagnostics,
            [
                Diagnostic::EmptyRecord,
                Diagnostic::StrayEndOfHeader,
                Diagnostic::UnknownMarker {
                    name: "APP_X_EOF".to_string()
                },
                Diagnostic::MalformedTag {
                    text: "call:x".to_string()
                },
                Diagnostic::UnterminatedRecord { fields: 1 },
            ]
        );
    }

    #[test]
    fn truncation_drops_pending_record() {
        let parsed = run("<call:4>K1AB<eor><call:4>W1AW<band:40>20M<eor>");
        assert_eq!(parsed.document.records.len(), 1);
        assert!(matches!(
            parsed.diagnostics.as_slice(),
            [
                Diagnostic::TruncatedTag { declared: 40, .. },
                Diagnostic::UnterminatedRecord { fields: 1 }
            ]
        ));
    }
}
