//! Two-field card form fed by the keyboard or by a finished scan.

use tracing::debug;

use crate::models::card::{CardField, ScannedCard};
use crate::queue::QueueHandle;

use super::dynamic::Dynamic;
use super::keystroke::{EditOutcome, ManualEntry};

/// Card number and expiry date fields with their published canonical values.
pub struct CardForm {
    card_number: ManualEntry,
    expiry_date: ManualEntry,
    number_value: Dynamic<String>,
    expiry_value: Dynamic<String>,
}

impl CardForm {
    pub fn new(queue: QueueHandle) -> Self {
        Self {
            card_number: ManualEntry::new(CardField::CardNumber),
            expiry_date: ManualEntry::new(CardField::ExpiryDate),
            number_value: Dynamic::new(String::new(), queue.clone()),
            expiry_value: Dynamic::new(String::new(), queue),
        }
    }

    /// Type text into a field.
    pub fn type_text(&mut self, field: CardField, text: &str) -> EditOutcome {
        let outcome = self.entry_mut(field).insert(text);
        self.publish_if_changed(field, outcome);
        outcome
    }

    /// Backspace in a field.
    pub fn backspace(&mut self, field: CardField) -> EditOutcome {
        let outcome = self.entry_mut(field).backspace();
        self.publish_if_changed(field, outcome);
        outcome
    }

    pub fn type_card_number(&mut self, text: &str) -> EditOutcome {
        self.type_text(CardField::CardNumber, text)
    }

    pub fn type_expiry_date(&mut self, text: &str) -> EditOutcome {
        self.type_text(CardField::ExpiryDate, text)
    }

    pub fn backspace_card_number(&mut self) -> EditOutcome {
        self.backspace(CardField::CardNumber)
    }

    pub fn backspace_expiry_date(&mut self) -> EditOutcome {
        self.backspace(CardField::ExpiryDate)
    }

    /// Fill both fields from a completed scan.
    pub fn apply_scanned_card(&mut self, card: &ScannedCard) {
        debug!("populating form from scan");
        for (field, value) in [
            (CardField::CardNumber, &card.card_number),
            (CardField::ExpiryDate, &card.expiry_date),
        ] {
            let outcome = self.entry_mut(field).set_canonical(value);
            self.publish(field);
            if !outcome.changed() && outcome != EditOutcome::Unchanged {
                debug!("scanned {:?} not applied: {:?}", field, outcome);
            }
        }
    }

    pub fn entry(&self, field: CardField) -> &ManualEntry {
        match field {
            CardField::CardNumber => &self.card_number,
            CardField::ExpiryDate => &self.expiry_date,
        }
    }

    /// Display text of a field.
    pub fn display(&self, field: CardField) -> String {
        self.entry(field).display()
    }

    /// True when both fields hold their full number of digits.
    pub fn is_complete(&self) -> bool {
        self.card_number.is_complete() && self.expiry_date.is_complete()
    }

    /// Canonical card number changes.
    pub fn number(&self) -> &Dynamic<String> {
        &self.number_value
    }

    /// Canonical expiry date changes.
    pub fn expiry_date(&self) -> &Dynamic<String> {
        &self.expiry_value
    }

    fn entry_mut(&mut self, field: CardField) -> &mut ManualEntry {
        match field {
            CardField::CardNumber => &mut self.card_number,
            CardField::ExpiryDate => &mut self.expiry_date,
        }
    }

    fn publish_if_changed(&self, field: CardField, outcome: EditOutcome) {
        if outcome.changed() {
            self.publish(field);
        }
    }

    fn publish(&self, field: CardField) {
        let value = self.entry(field).canonical().to_string();
        match field {
            CardField::CardNumber => self.number_value.set(value),
            CardField::ExpiryDate => self.expiry_value.set(value),
        }
    }
}
