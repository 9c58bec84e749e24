//! ADI (tag-length-value text) decoding.

/// Token-to-document state machine.
pub mod assembler;
/// Lazy tag scanner.
pub mod tokenizer;

use crate::diagnostic::Parsed;

/// Decodes ADI bytes, reporting what was dropped.
pub fn decode(input: &[u8]) -> Parsed {
    assembler::assemble(tokenizer::tokenize(input))
}
