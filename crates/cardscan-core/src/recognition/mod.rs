//! Interpretation of recognized text into card fields.

mod interpreter;
pub mod patterns;

pub use interpreter::{classify_line, extract_fields, lines_from_text, CardFieldInterpreter};

use crate::models::card::ExtractedFields;

/// Trait for card field interpreters.
///
/// Implementations hold no state across frames.
pub trait FieldInterpreter {
    /// Interpret the lines recognized in one frame.
    fn interpret(&self, lines: &[String]) -> ExtractedFields;

    /// Interpret a recognizer's full text block for one frame.
    fn interpret_text(&self, text: &str) -> ExtractedFields;
}
