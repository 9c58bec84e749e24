//! Shared decoder contract for the ADI and ADX front ends.

use crate::{diagnostic::Parsed, document::Document};

/// Encoding of an ADIF input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Tag-length-value text.
    Adi,
    /// XML.
    Adx,
}

impl Format {
    /// Guesses the encoding from the first non-whitespace bytes.
    pub fn detect(input: &[u8]) -> Self {
        let head = input.trim_ascii_start();
        let head = head.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(head);
        let starts_with = |prefix: &[u8]| {
            head.get(..prefix.len())
                .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
        };
        if starts_with(b"<?xml") || starts_with(b"<adx") {
            Self::Adx
        } else {
            Self::Adi
        }
    }

    /// Decoder for this encoding.
    pub fn decoder(self) -> &'static dyn Decoder {
        match self {
            Self::Adi => &Adi,
            Self::Adx => &Adx,
        }
    }
}

/// A front end that turns raw bytes into a [`Document`].
///
/// Implementations never fail; dropped input is listed in
/// [`Parsed::diagnostics`].
pub trait Decoder: Send + Sync {
    /// Decodes `input`.
    fn decode(&self, input: &[u8]) -> Parsed;
}

/// ADI decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adi;

/// ADX decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adx;

impl Decoder for Adi {
    fn decode(&self, input: &[u8]) -> Parsed {
        crate::adi::decode(input)
    }
}

impl Decoder for Adx {
    fn decode(&self, input: &[u8]) -> Parsed {
        crate::adx::decode(input)
    }
}

/// Parses ADI text.
pub fn parse_adi(input: &str) -> Document {
    parse_adi_bytes(input.as_bytes())
}

/// Parses ADI bytes; values that are not UTF-8 are decoded lossily.
pub fn parse_adi_bytes(input: &[u8]) -> Document {
    Adi.decode(input).document
}

/// Parses ADX text.
pub fn parse_adx(input: &str) -> Document {
    parse_adx_bytes(input.as_bytes())
}

/// Parses ADX bytes.
pub fn parse_adx_bytes(input: &[u8]) -> Document {
    Adx.decode(input).document
}

/// Parses either encoding, chosen by [`Format::detect`].
pub fn parse(input: &[u8]) -> Parsed {
    Format::detect(input).decoder().decode(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_xml_and_text() {
        assert_eq!(Format::detect(b"  <?xml version=\"1.0\"?><ADX/>"), Format::Adx);
        assert_eq!(Format::detect(b"\n<adx></adx>"), Format::Adx);
        assert_eq!(Format::detect(b"<call:4>K1AB<eor>"), Format::Adi);
        assert_eq!(Format::detect(b"Exported by WF1B\n<eoh>"), Format::Adi);
        assert_eq!(Format::detect(b""), Format::Adi);
    }
}
