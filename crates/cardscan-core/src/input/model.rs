//! Card input model: the two card fields and their validity.

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::format::mask_card_number;
use crate::models::card::{ExtractedFields, ScannedCard, CARD_NUMBER_LENGTH, EXPIRY_DATE_LENGTH};
use crate::queue::QueueHandle;

use super::dynamic::{lock, Dynamic};

/// Card number and expiry date as last set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardInputState {
    pub card_number: String,
    pub expiry_date: String,
}

impl CardInputState {
    /// Length checks only; no Luhn or calendar validation.
    pub fn is_valid(&self) -> bool {
        self.card_number.chars().count() == CARD_NUMBER_LENGTH
            && self.expiry_date.chars().count() == EXPIRY_DATE_LENGTH
    }
}

/// Accumulates card fields from the scanner or the keyboard.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct CardInputModel {
    state: Arc<Mutex<CardInputState>>,
    validity: Dynamic<bool>,
}

impl CardInputModel {
    pub fn new(queue: QueueHandle) -> Self {
        Self {
            state: Arc::new(Mutex::new(CardInputState::default())),
            validity: Dynamic::new(false, queue),
        }
    }

    /// Store a card number as given and publish validity.
    ///
    /// Callers strip separators first.
    pub fn set_card_number(&self, raw: impl Into<String>) {
        let valid = {
            let mut state = lock(&self.state);
            state.card_number = raw.into();
            debug!("card number set to {}", mask_card_number(&state.card_number));
            state.is_valid()
        };
        self.validity.set(valid);
    }

    /// Store an expiry date as given and publish validity.
    pub fn set_expiry_date(&self, raw: impl Into<String>) {
        let valid = {
            let mut state = lock(&self.state);
            state.expiry_date = raw.into();
            debug!("expiry date set to {}", state.expiry_date);
            state.is_valid()
        };
        self.validity.set(valid);
    }

    /// Push every candidate of a frame, card number first.
    ///
    /// Returns true when something was set.
    pub fn apply(&self, fields: &ExtractedFields) -> bool {
        if let Some(number) = &fields.card_number {
            self.set_card_number(number.as_str());
        }
        if let Some(date) = &fields.expiry_date {
            self.set_expiry_date(date.as_str());
        }
        !fields.is_empty()
    }

    pub fn card_number(&self) -> String {
        lock(&self.state).card_number.clone()
    }

    pub fn expiry_date(&self) -> String {
        lock(&self.state).expiry_date.clone()
    }

    pub fn is_valid(&self) -> bool {
        lock(&self.state).is_valid()
    }

    /// Copy of both fields.
    pub fn snapshot(&self) -> CardInputState {
        lock(&self.state).clone()
    }

    /// Both fields, once the card is valid.
    pub fn scanned_card(&self) -> Option<ScannedCard> {
        let state = lock(&self.state);
        state.is_valid().then(|| ScannedCard {
            card_number: state.card_number.clone(),
            expiry_date: state.expiry_date.clone(),
        })
    }

    /// Validity notifications. One listener at a time.
    pub fn validity(&self) -> &Dynamic<bool> {
        &self.validity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::MainQueue;
    use pretty_assertions::assert_eq;

    fn observed(model: &CardInputModel) -> Arc<Mutex<Vec<bool>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        model.validity().bind(move |valid| sink.lock().unwrap().push(valid));
        seen
    }

    #[test]
    fn test_valid_when_both_lengths_match() {
        let mut queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        let seen = observed(&model);

        model.set_card_number("4111111111111111");
        assert!(!model.is_valid());
        model.set_expiry_date("1225");
        assert!(model.is_valid());

        queue.run_pending();
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn test_shortening_a_field_notifies_false() {
        let mut queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        model.set_card_number("4111111111111111");
        model.set_expiry_date("1225");
        queue.run_pending();

        let seen = observed(&model);
        model.set_card_number("411111111111111");
        assert!(!model.is_valid());
        queue.run_pending();
        assert_eq!(*seen.lock().unwrap(), vec![false]);

        model.set_card_number("4111111111111111");
        model.set_expiry_date("122");
        queue.run_pending();
        assert_eq!(*seen.lock().unwrap(), vec![false, true, false]);
    }

    #[test]
    fn test_redundant_set_refires_true() {
        let mut queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        model.set_card_number("4111111111111111");
        model.set_expiry_date("1225");
        queue.run_pending();

        let seen = observed(&model);
        model.set_expiry_date("1225");
        model.set_expiry_date("1225");
        queue.run_pending();
        assert_eq!(*seen.lock().unwrap(), vec![true, true]);
    }

    #[test]
    fn test_values_stored_verbatim() {
        let queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());

        // Sixteen characters, not sixteen digits: still valid by length.
        model.set_card_number("4111 1111 111111");
        model.set_expiry_date("13/9");
        assert_eq!(model.card_number(), "4111 1111 111111");
        assert!(model.is_valid());
    }

    #[test]
    fn test_no_luhn_or_calendar_check() {
        let queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        model.set_card_number("1234567890123456");
        model.set_expiry_date("9999");

        assert_eq!(
            model.scanned_card(),
            Some(ScannedCard {
                card_number: "1234567890123456".into(),
                expiry_date: "9999".into(),
            })
        );
    }

    #[test]
    fn test_bind_and_fire_reports_current_validity() {
        let queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        model
            .validity()
            .bind_and_fire(move |valid| sink.lock().unwrap().push(valid));
        assert_eq!(*seen.lock().unwrap(), vec![false]);
    }

    #[test]
    fn test_apply_extracted_fields() {
        let mut queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        let seen = observed(&model);

        assert!(!model.apply(&ExtractedFields::default()));
        assert!(model.apply(&ExtractedFields {
            card_number: Some("4111111111111111".into()),
            expiry_date: Some("1225".into()),
        }));
        queue.run_pending();

        assert!(model.is_valid());
        assert_eq!(*seen.lock().unwrap(), vec![false, true]);
    }
}
