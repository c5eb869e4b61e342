//! Manual entry of a card field.
//!
//! The field keeps its canonical digits and renders the display text from
//! them. Edits arrive as display-text replacements with the caret pinned to
//! the end, like a numeric text field.

use std::ops::Range;

use crate::format::{readable, strip};
use crate::models::card::CardField;

/// Why an edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    /// The typed text contains something other than digits.
    NonDigit,
    /// The field is already full.
    TooLong,
    /// The edited range lies outside the display text.
    OutOfBounds,
}

/// Result of one edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Accepted,
    /// Accepted, but the last typed digits did not fit.
    Truncated { discarded: usize },
    Rejected(EditRejection),
    Unchanged,
}

impl EditOutcome {
    /// True when the canonical value changed.
    pub fn changed(self) -> bool {
        matches!(self, EditOutcome::Accepted | EditOutcome::Truncated { .. })
    }
}

/// One card field being typed by hand.
#[derive(Debug, Clone)]
pub struct ManualEntry {
    field: CardField,
    canonical: String,
}

impl ManualEntry {
    pub fn new(field: CardField) -> Self {
        Self {
            field,
            canonical: String::new(),
        }
    }

    pub fn field(&self) -> CardField {
        self.field
    }

    /// Digits only, no separators.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Text as shown in the field.
    pub fn display(&self) -> String {
        readable(self.field, &self.canonical)
    }

    pub fn is_complete(&self) -> bool {
        self.canonical.len() == self.field.max_len()
    }

    /// Type text at the caret.
    pub fn insert(&mut self, text: &str) -> EditOutcome {
        let end = self.display_len();
        self.replace_display_range(end..end, text)
    }

    /// Delete the character before the caret.
    ///
    /// Always removes exactly one digit while the field is not empty.
    pub fn backspace(&mut self) -> EditOutcome {
        let end = self.display_len();
        if end == 0 {
            return EditOutcome::Unchanged;
        }
        self.replace_display_range(end - 1..end, "")
    }

    /// Replace the whole field, e.g. with a scanned value.
    pub fn set_canonical(&mut self, value: &str) -> EditOutcome {
        let end = self.display_len();
        self.replace_display_range(0..end, value)
    }

    /// Clear the field.
    pub fn clear(&mut self) -> EditOutcome {
        self.set_canonical("")
    }

    /// Replace a character range of the display text.
    ///
    /// Deleting a range that holds only separator characters also deletes
    /// the digit before it, so a separator never swallows a backspace.
    pub fn replace_display_range(&mut self, range: Range<usize>, replacement: &str) -> EditOutcome {
        let display: Vec<char> = self.display().chars().collect();
        if range.start > range.end || range.end > display.len() {
            return EditOutcome::Rejected(EditRejection::OutOfBounds);
        }

        let mut inserted = strip(self.field, replacement);
        if !inserted.chars().all(|c| c.is_ascii_digit()) {
            return EditOutcome::Rejected(EditRejection::NonDigit);
        }

        let digits = |chars: &[char]| -> String { chars.iter().filter(|c| c.is_ascii_digit()).collect() };
        let mut prefix = digits(&display[..range.start]);
        let removed = digits(&display[range.clone()]);
        let suffix = digits(&display[range.end..]);

        if inserted.is_empty() && !range.is_empty() && removed.is_empty() {
            prefix.pop();
        }

        let room = self
            .field
            .max_len()
            .saturating_sub(prefix.len() + suffix.len());
        let discarded = inserted.len().saturating_sub(room);
        inserted.truncate(room);

        let updated = format!("{prefix}{inserted}{suffix}");
        if updated == self.canonical {
            return if discarded > 0 {
                EditOutcome::Rejected(EditRejection::TooLong)
            } else {
                EditOutcome::Unchanged
            };
        }

        self.canonical = updated;
        if discarded > 0 {
            EditOutcome::Truncated { discarded }
        } else {
            EditOutcome::Accepted
        }
    }

    fn display_len(&self) -> usize {
        self.display().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn typed(field: CardField, keys: &str) -> ManualEntry {
        let mut entry = ManualEntry::new(field);
        for key in keys.chars() {
            entry.insert(&key.to_string());
        }
        entry
    }

    #[test]
    fn test_typing_card_number_formats_display() {
        let entry = typed(CardField::CardNumber, "411111111111");
        assert_eq!(entry.canonical(), "411111111111");
        assert_eq!(entry.display(), "4111 1111 1111 ");
        assert!(!entry.is_complete());
    }

    #[test]
    fn test_seventeenth_digit_rejected() {
        let mut entry = typed(CardField::CardNumber, "4111111111111111");
        assert!(entry.is_complete());

        assert_eq!(entry.insert("9"), EditOutcome::Rejected(EditRejection::TooLong));
        assert_eq!(entry.canonical(), "4111111111111111");
    }

    #[test]
    fn test_paste_overflow_discards_last_typed() {
        let mut entry = typed(CardField::ExpiryDate, "1");
        assert_eq!(entry.insert("2256"), EditOutcome::Truncated { discarded: 1 });
        assert_eq!(entry.canonical(), "1225");
        assert_eq!(entry.display(), "12 / 25");
    }

    #[test]
    fn test_non_digit_rejected() {
        let mut entry = typed(CardField::CardNumber, "41");
        assert_eq!(entry.insert("a"), EditOutcome::Rejected(EditRejection::NonDigit));
        assert_eq!(entry.insert("/"), EditOutcome::Rejected(EditRejection::NonDigit));
        assert_eq!(entry.canonical(), "41");
    }

    #[test]
    fn test_pasted_separators_are_accepted() {
        let mut entry = ManualEntry::new(CardField::CardNumber);
        assert_eq!(entry.insert("4111 1111 1111 1111"), EditOutcome::Accepted);
        assert_eq!(entry.canonical(), "4111111111111111");

        let mut entry = ManualEntry::new(CardField::ExpiryDate);
        assert_eq!(entry.insert("12/25"), EditOutcome::Accepted);
        assert_eq!(entry.canonical(), "1225");
    }

    #[test]
    fn test_backspace_after_card_boundary_removes_one_digit() {
        for count in [4, 8, 12] {
            let mut entry = typed(CardField::CardNumber, &"4".repeat(count));
            assert!(entry.display().ends_with(' '));

            assert_eq!(entry.backspace(), EditOutcome::Accepted);
            assert_eq!(entry.canonical().len(), count - 1);
            assert!(!entry.display().ends_with(' '));
        }
    }

    #[test]
    fn test_backspace_after_expiry_separator_removes_one_digit() {
        let mut entry = typed(CardField::ExpiryDate, "12");
        assert_eq!(entry.display(), "12 / ");

        entry.backspace();
        assert_eq!(entry.canonical(), "1");
        assert_eq!(entry.display(), "1");
    }

    #[test]
    fn test_backspace_always_shrinks_by_one() {
        let mut entry = typed(CardField::CardNumber, "4111111111111111");
        for expected in (0..16).rev() {
            entry.backspace();
            assert_eq!(entry.canonical().len(), expected);
        }
        assert_eq!(entry.backspace(), EditOutcome::Unchanged);
    }

    #[test]
    fn test_deleting_separator_inside_display() {
        let mut entry = typed(CardField::CardNumber, "41111111");
        // "4111 1111 " - delete the first space
        assert_eq!(entry.replace_display_range(4..5, ""), EditOutcome::Accepted);
        assert_eq!(entry.canonical(), "4111111");
    }

    #[test]
    fn test_out_of_bounds_range() {
        let mut entry = typed(CardField::ExpiryDate, "1");
        assert_eq!(
            entry.replace_display_range(0..3, ""),
            EditOutcome::Rejected(EditRejection::OutOfBounds)
        );
    }

    #[test]
    fn test_set_canonical_and_clear() {
        let mut entry = ManualEntry::new(CardField::CardNumber);
        assert_eq!(entry.set_canonical("4111111111111111"), EditOutcome::Accepted);
        assert_eq!(entry.display(), "4111 1111 1111 1111");

        assert_eq!(entry.clear(), EditOutcome::Accepted);
        assert_eq!(entry.display(), "");
    }
}
