//! Display formatting for card fields.

use crate::models::card::CardField;
use crate::recognition::patterns::WHITESPACE;

/// Render a field's canonical digits for display.
///
/// A separator follows every group end, even when it is the last character
/// typed so far, so a partly typed field already shows the next separator.
pub fn readable(field: CardField, value: &str) -> String {
    let ends = field.group_ends();
    let separator = field.separator();

    let mut formatted = String::with_capacity(value.len() + ends.len() * separator.len());
    for (index, ch) in value.chars().enumerate() {
        formatted.push(ch);
        if ends.contains(&(index + 1)) {
            formatted.push_str(separator);
        }
    }
    formatted
}

/// Format a card number in groups of four (`4111 1111 1111 1111`).
pub fn readable_card_number(value: &str) -> String {
    readable(CardField::CardNumber, value)
}

/// Format an expiry date as `MM / YY`.
pub fn readable_expiry_date(value: &str) -> String {
    readable(CardField::ExpiryDate, value)
}

/// Remove display separators from a field's text.
pub fn strip(field: CardField, display: &str) -> String {
    let text = WHITESPACE.replace_all(display, "");
    match field {
        CardField::CardNumber => text.into_owned(),
        CardField::ExpiryDate => text.replace('/', ""),
    }
}

/// Remove the grouping spaces from a card number.
pub fn strip_card_number(display: &str) -> String {
    strip(CardField::CardNumber, display)
}

/// Remove the `" / "` separator from an expiry date.
pub fn strip_expiry_date(display: &str) -> String {
    strip(CardField::ExpiryDate, display)
}

/// Mask all but the last four characters of a card number.
pub fn mask_card_number(value: &str) -> String {
    let count = value.chars().count();
    let masked: String = value
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 < count { '•' } else { c })
        .collect();
    readable_card_number(&masked).trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_readable_card_number() {
        assert_eq!(readable_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(readable_card_number("41111"), "4111 1");
        assert_eq!(readable_card_number("4111"), "4111 ");
        assert_eq!(readable_card_number(""), "");
    }

    #[test]
    fn test_readable_expiry_date() {
        assert_eq!(readable_expiry_date("1225"), "12 / 25");
        assert_eq!(readable_expiry_date("12"), "12 / ");
        assert_eq!(readable_expiry_date("1"), "1");
    }

    #[test]
    fn test_card_number_round_trip() {
        for number in [
            "4111111111111111",
            "5500000000000004",
            "0000000000000000",
            "9876543210123456",
        ] {
            let display = readable_card_number(number);
            assert_eq!(display.replace(' ', ""), number);
            assert_eq!(strip_card_number(&display), number);
        }
    }

    #[test]
    fn test_expiry_round_trip() {
        for date in ["0125", "1299", "0000", "0930"] {
            let display = readable_expiry_date(date);
            assert_eq!(display.replace(" / ", ""), date);
            assert_eq!(strip_expiry_date(&display), date);
        }
    }

    #[test]
    fn test_mask_card_number() {
        assert_eq!(mask_card_number("4111111111111234"), "•••• •••• •••• 1234");
        assert_eq!(mask_card_number("123"), "123");
    }
}
