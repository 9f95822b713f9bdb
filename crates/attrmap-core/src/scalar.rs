//! Scalar conversions shared by the encoder, decoder, taggers and wire codec.

use crate::error::{Result, TranscodeError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Number;

/// The exact text of a parsed number.
///
/// With `arbitrary_precision` enabled, `Number` keeps the digits it was parsed from, so
/// `3.140` is returned as `"3.140"`, not `"3.14"`.
pub fn number_text(number: &Number) -> String {
    number.to_string()
}

/// Parse number text into a document number without reformatting it.
///
/// The text must be a bare JSON number: no surrounding whitespace, no `+` sign, no
/// `NaN`/`Infinity`. Parsing only validates; the parser writes exponents in its own
/// form (`1E3` becomes `1e+3`), so the returned number carries `text` itself.
pub fn parse_number_text(text: &str) -> Result<Number> {
    text.parse::<Number>()
        .map_err(|_| TranscodeError::InvalidNumberText(text.to_string()))?;
    Ok(Number::from_string_unchecked(text.to_string()))
}

/// Standard (padded) base64, matching what previously stored items contain.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text).ok()
}
