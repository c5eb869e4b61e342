//! Card field data models.

use serde::{Deserialize, Serialize};

/// Number of digits in a canonical card number.
pub const CARD_NUMBER_LENGTH: usize = 16;

/// Number of digits in a canonical expiry date (MMYY).
pub const EXPIRY_DATE_LENGTH: usize = 4;

/// One of the two fields of the card form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardField {
    CardNumber,
    ExpiryDate,
}

impl CardField {
    /// Canonical (unformatted) length of the field.
    pub fn max_len(self) -> usize {
        match self {
            CardField::CardNumber => CARD_NUMBER_LENGTH,
            CardField::ExpiryDate => EXPIRY_DATE_LENGTH,
        }
    }

    /// Separator inserted into the display text.
    pub fn separator(self) -> &'static str {
        match self {
            CardField::CardNumber => " ",
            CardField::ExpiryDate => " / ",
        }
    }

    /// Digit counts after which a separator is rendered.
    pub fn group_ends(self) -> &'static [usize] {
        match self {
            CardField::CardNumber => &[4, 8, 12],
            CardField::ExpiryDate => &[2],
        }
    }

    /// Parse a field name as used on the command line.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "card" | "number" | "card_number" | "card-number" => Some(CardField::CardNumber),
            "expiry" | "expiry_date" | "expiry-date" | "exp" => Some(CardField::ExpiryDate),
            _ => None,
        }
    }
}

/// What a single recognized line contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCandidate {
    /// Sixteen digits.
    CardNumber(String),
    /// Four digits, separator removed.
    ExpiryDate(String),
    None,
}

/// Candidates extracted from one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl ExtractedFields {
    /// True when the frame produced no candidate at all.
    pub fn is_empty(&self) -> bool {
        self.card_number.is_none() && self.expiry_date.is_none()
    }

    /// Fold one line's candidate in. Later candidates replace earlier ones.
    pub fn apply(&mut self, candidate: LineCandidate) {
        match candidate {
            LineCandidate::CardNumber(number) => self.card_number = Some(number),
            LineCandidate::ExpiryDate(date) => self.expiry_date = Some(date),
            LineCandidate::None => {}
        }
    }
}

/// A completed scan handed to the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedCard {
    pub card_number: String,
    pub expiry_date: String,
}
