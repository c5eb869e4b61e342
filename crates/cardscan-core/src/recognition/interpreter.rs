//! Card number and expiry extraction from recognized text lines.

use tracing::trace;

use crate::models::card::{ExtractedFields, LineCandidate, EXPIRY_DATE_LENGTH};

use super::patterns::{CARD_NUMBER_LINE, EXPIRY_DIGITS, LINE_BREAK, WHITESPACE};
use super::FieldInterpreter;

/// Length of an expiry token with its slash, e.g. `12/25`.
const EXPIRY_TOKEN_LENGTH: usize = EXPIRY_DATE_LENGTH + 1;

/// Rule-based interpreter for card fields.
pub struct CardFieldInterpreter;

impl CardFieldInterpreter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CardFieldInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldInterpreter for CardFieldInterpreter {
    fn interpret(&self, lines: &[String]) -> ExtractedFields {
        extract_fields(lines)
    }

    fn interpret_text(&self, text: &str) -> ExtractedFields {
        extract_fields(lines_from_text(text))
    }
}

/// Extract a card number and an expiry date from one frame's lines.
///
/// Every line is classified on its own; when several lines yield the same
/// kind of candidate, the last one wins.
pub fn extract_fields<I, S>(lines: I) -> ExtractedFields
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut fields = ExtractedFields::default();
    for line in lines {
        fields.apply(classify_line(line.as_ref()));
    }
    fields
}

/// Classify a single recognized line.
pub fn classify_line(line: &str) -> LineCandidate {
    let text = WHITESPACE.replace_all(line, "");

    if CARD_NUMBER_LINE.is_match(&text) {
        trace!("card number candidate in {:?}", line);
        return LineCandidate::CardNumber(text.into_owned());
    }

    if text.contains('/') && text.chars().count() == EXPIRY_TOKEN_LENGTH {
        let date = text.replace('/', "");
        if EXPIRY_DIGITS.is_match(&date) {
            trace!("expiry candidate in {:?}", line);
            return LineCandidate::ExpiryDate(date);
        }
    }

    LineCandidate::None
}

/// Split a recognizer's text block into lines.
pub fn lines_from_text(text: &str) -> impl Iterator<Item = &str> {
    LINE_BREAK.split(text)
}
