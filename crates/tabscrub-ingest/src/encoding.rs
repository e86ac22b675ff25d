//! Best-effort text-encoding detection.
//!
//! Detection never fails: BOM sniffing first, then UTF-8 validation, then a
//! windows-1252 fallback for byte streams with high bytes that are not valid
//! UTF-8 (the usual shape of legacy western-European exports). The guess is a
//! heuristic; the actual decode can still fail downstream and is reported as
//! its own error.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

/// One input file's detected encoding, together with the bytes it was
/// derived from. Produced once per run; immutable thereafter.
#[derive(Debug, Clone)]
pub struct EncodingGuess {
    bytes: Vec<u8>,
    encoding: &'static Encoding,
    bom_length: usize,
}

impl EncodingGuess {
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// WHATWG name of the guessed encoding (IANA-compatible for display).
    pub fn label(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn has_bom(&self) -> bool {
        self.bom_length > 0
    }
}

/// Inspect raw bytes and return a best-guess encoding. Never fails.
pub fn detect(bytes: Vec<u8>) -> EncodingGuess {
    let (encoding, bom_length) = match Encoding::for_bom(&bytes) {
        Some((encoding, bom_length)) => (encoding, bom_length),
        None if std::str::from_utf8(&bytes).is_ok() => (UTF_8, 0),
        None => (WINDOWS_1252, 0),
    };
    debug!(
        encoding = encoding.name(),
        bytes = bytes.len(),
        bom = bom_length > 0,
        "encoding detected"
    );
    EncodingGuess {
        bytes,
        encoding,
        bom_length,
    }
}
