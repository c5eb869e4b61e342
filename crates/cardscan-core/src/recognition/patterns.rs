//! Regex patterns for card field interpretation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Any run of whitespace inside a recognized line
    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Line breaks in a recognizer's text block
    pub static ref LINE_BREAK: Regex = Regex::new(r"\r?\n").unwrap();

    // Card number once whitespace is gone (ASCII digits only)
    pub static ref CARD_NUMBER_LINE: Regex = Regex::new(r"^[0-9]{16}$").unwrap();

    // Expiry date once the slash is gone
    pub static ref EXPIRY_DIGITS: Regex = Regex::new(r"^[0-9]{4}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_number_line_ascii_only() {
        assert!(CARD_NUMBER_LINE.is_match("4111111111111111"));
        assert!(!CARD_NUMBER_LINE.is_match("411111111111111"));
        // Arabic-Indic digits are not card digits
        assert!(!CARD_NUMBER_LINE.is_match("٤١١١١١١١١١١١١١١١"));
    }

    #[test]
    fn test_whitespace_covers_tabs() {
        assert_eq!(WHITESPACE.replace_all("12 /\t25", ""), "12/25");
    }
}
