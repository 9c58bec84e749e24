//! Lazy scanner over ADI text.
//!
//! Yields one [`Token`] per `<...>` span plus the filler text between spans.
//! Values are sliced by their declared byte length, so they may contain
//! `<`, `>`, or line breaks.

use std::borrow::Cow;

/// One `<name:length[:type]>value` unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Name bytes as written, surrounding whitespace trimmed.
    pub name: &'a [u8],
    /// Declared value length in bytes.
    pub length: usize,
    /// Optional data type indicator.
    pub type_hint: Option<&'a [u8]>,
    /// Exactly `length` bytes following the closing `>`.
    pub value: &'a [u8],
}

impl<'a> Tag<'a> {
    /// Name as text.
    pub fn name(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    /// Type indicator as text.
    pub fn type_hint(&self) -> Option<Cow<'a, str>> {
        self.type_hint.map(String::from_utf8_lossy)
    }

    /// Value as text.
    pub fn value(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.value)
    }
}

/// Scanner output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Bytes outside any tag: whitespace, banners, comments.
    Text(&'a [u8]),
    /// A tag with a value.
    Tag(Tag<'a>),
    /// A bare `<name>` with no length, e.g. `<eoh>`, `<eor>`, `<APP_LoTW_EOF>`.
    Marker(&'a [u8]),
    /// A `<...>` span that is neither a tag nor a marker.
    Malformed(&'a [u8]),
    /// A tag whose declared length runs past the end of input. Always the
    /// last token.
    Truncated {
        /// Name bytes as written.
        name: &'a [u8],
        /// Declared value length.
        declared: usize,
        /// Bytes left after the closing `>`.
        available: usize,
    },
}

impl Token<'_> {
    /// Returns true when this is the bare marker `name`, ignoring case.
    pub fn is_marker(&self, name: &str) -> bool {
        matches!(self, Token::Marker(m) if m.eq_ignore_ascii_case(name.as_bytes()))
    }
}

/// Iterator over the tokens of one input buffer.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    /// Starts scanning `input` from the beginning.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            done: false,
        }
    }

    fn finish_with_text(&mut self, start: usize) -> Option<Token<'a>> {
        self.done = true;
        self.pos = self.input.len();
        let rest = &self.input[start..];
        (!rest.is_empty()).then_some(Token::Text(rest))
    }

    fn scan_tag(&mut self, open: usize) -> Option<Token<'a>> {
        let body_start = open + 1;
        let Some(rel) = self.input[body_start..]
            .iter()
            .position(|b| *b == b'<' || *b == b'>')
        else {
            return self.finish_with_text(open);
        };
        let close = body_start + rel;

        if self.input[close] == b'<' {
            // A lone '<' in filler text; rescan from the next one.
            self.pos = close;
            return Some(Token::Text(&self.input[open..close]));
        }

        let inner = &self.input[body_start..close];
        let after = close + 1;
        self.pos = after;

        let mut parts = inner.splitn(3, |b| *b == b':');
        let name = parts.next().unwrap_or_default().trim_ascii();
        let Some(length) = parts.next() else {
            if name.is_empty() {
                return Some(Token::Malformed(inner));
            }
            return Some(Token::Marker(name));
        };

        let length = std::str::from_utf8(length.trim_ascii())
            .ok()
            .and_then(|s| s.parse::<usize>().ok());
        let Some(length) = length.filter(|_| !name.is_empty()) else {
            return Some(Token::Malformed(inner));
        };
        let type_hint = parts.next().map(|t| t.trim_ascii()).filter(|t| !t.is_empty());

        let available = self.input.len() - after;
        if length > available {
            self.done = true;
            self.pos = self.input.len();
            return Some(Token::Truncated {
                name,
                declared: length,
                available,
            });
        }

        self.pos = after + length;
        Some(Token::Tag(Tag {
            name,
            length,
            type_hint,
            value: &self.input[after..after + length],
        }))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.input.len() {
            return None;
        }

        let start = self.pos;
        match self.input[start..].iter().position(|b| *b == b'<') {
            None => self.finish_with_text(start),
            Some(0) => self.scan_tag(start),
            Some(i) => {
                self.pos = start + i;
                Some(Token::Text(&self.input[start..start + i]))
            }
        }
    }
}

/// Tokenizes `input` from the start.
pub fn tokenize(input: &[u8]) -> Tokenizer<'_> {
    Tokenizer::new(input)
}
