//! WASM bindings for card field extraction and entry.
//!
//! The page owns the main queue: listener deliveries are collected while
//! the model changes and handed to JavaScript on `flush()`.

use std::sync::{Arc, Mutex};

use wasm_bindgen::prelude::*;
use web_sys::console;

use cardscan_core::format::{readable, strip};
use cardscan_core::{
    mask_card_number, CardField, CardFieldInterpreter, CardInputModel, EditOutcome,
    FieldInterpreter, MainQueue, ManualEntry,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_field(name: &str) -> Result<CardField, JsValue> {
    CardField::from_str(name).ok_or_else(|| JsValue::from_str(&format!("unknown field: {}", name)))
}

/// Extract card fields from one frame's lines (an array of strings).
#[wasm_bindgen]
pub fn extract_fields(lines: JsValue) -> Result<JsValue, JsValue> {
    let lines: Vec<String> = serde_wasm_bindgen::from_value(lines).map_err(to_js_error)?;
    let fields = CardFieldInterpreter::new().interpret(&lines);
    serde_wasm_bindgen::to_value(&fields).map_err(to_js_error)
}

/// Extract card fields from newline-separated text.
#[wasm_bindgen]
pub fn extract_fields_from_text(text: &str) -> Result<JsValue, JsValue> {
    let fields = CardFieldInterpreter::new().interpret_text(text);
    serde_wasm_bindgen::to_value(&fields).map_err(to_js_error)
}

#[wasm_bindgen]
pub fn format_card_number(value: &str) -> String {
    readable(CardField::CardNumber, &strip(CardField::CardNumber, value))
}

#[wasm_bindgen]
pub fn format_expiry_date(value: &str) -> String {
    readable(CardField::ExpiryDate, &strip(CardField::ExpiryDate, value))
}

#[wasm_bindgen]
pub fn mask_number(value: &str) -> String {
    mask_card_number(&strip(CardField::CardNumber, value))
}

/// Card input model for browser use.
///
/// `bind` takes a JavaScript callback receiving the validity flag; it is
/// called from `flush`, once per change, in change order.
#[wasm_bindgen]
pub struct CardInput {
    queue: MainQueue,
    model: CardInputModel,
    delivered: Arc<Mutex<Vec<bool>>>,
    callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl CardInput {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let queue = MainQueue::new();
        let model = CardInputModel::new(queue.handle());
        Self {
            queue,
            model,
            delivered: Arc::new(Mutex::new(Vec::new())),
            callback: None,
        }
    }

    /// Replace the validity callback. With `fire`, the current validity is
    /// delivered on the next `flush`.
    #[wasm_bindgen]
    pub fn bind(&mut self, callback: js_sys::Function, fire: bool) {
        let sink = self.delivered.clone();
        let listener = move |valid: bool| {
            if let Ok(mut pending) = sink.lock() {
                pending.push(valid);
            }
        };
        if fire {
            self.model.validity().bind_and_fire(listener);
        } else {
            self.model.validity().bind(listener);
        }
        self.callback = Some(callback);
    }

    #[wasm_bindgen]
    pub fn unbind(&mut self) {
        self.model.validity().unbind();
        self.callback = None;
    }

    #[wasm_bindgen]
    pub fn set_card_number(&self, value: &str) {
        self.model.set_card_number(value);
    }

    #[wasm_bindgen]
    pub fn set_expiry_date(&self, value: &str) {
        self.model.set_expiry_date(value);
    }

    /// Apply an `extract_fields` result.
    #[wasm_bindgen]
    pub fn apply(&self, fields: JsValue) -> Result<bool, JsValue> {
        let fields = serde_wasm_bindgen::from_value(fields).map_err(to_js_error)?;
        Ok(self.model.apply(&fields))
    }

    #[wasm_bindgen(getter)]
    pub fn card_number(&self) -> String {
        self.model.card_number()
    }

    #[wasm_bindgen(getter)]
    pub fn expiry_date(&self) -> String {
        self.model.expiry_date()
    }

    #[wasm_bindgen(getter)]
    pub fn is_valid(&self) -> bool {
        self.model.is_valid()
    }

    /// Run queued notifications and call the bound callback for each.
    ///
    /// Returns the number of deliveries.
    #[wasm_bindgen]
    pub fn flush(&mut self) -> Result<usize, JsValue> {
        self.queue.run_pending();

        let pending: Vec<bool> = match self.delivered.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => return Err(JsValue::from_str("validity buffer poisoned")),
        };

        if let Some(callback) = &self.callback {
            for valid in &pending {
                callback.call1(&JsValue::NULL, &JsValue::from_bool(*valid))?;
            }
        }
        Ok(pending.len())
    }
}

impl Default for CardInput {
    fn default() -> Self {
        Self::new()
    }
}

/// Keystroke shaping for one text field.
#[wasm_bindgen]
pub struct FieldEntry {
    entry: ManualEntry,
}

#[wasm_bindgen]
impl FieldEntry {
    /// `field` is "card" or "expiry".
    #[wasm_bindgen(constructor)]
    pub fn new(field: &str) -> Result<FieldEntry, JsValue> {
        Ok(Self {
            entry: ManualEntry::new(parse_field(field)?),
        })
    }

    /// Replace `start..end` of the display text, as a text field's change
    /// handler reports it.
    ///
    /// Every edit method returns true when the canonical digits changed.
    #[wasm_bindgen]
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> bool {
        let outcome = self.entry.replace_display_range(start..end, text);
        self.report(outcome)
    }

    #[wasm_bindgen]
    pub fn insert(&mut self, text: &str) -> bool {
        let outcome = self.entry.insert(text);
        self.report(outcome)
    }

    #[wasm_bindgen]
    pub fn backspace(&mut self) -> bool {
        let outcome = self.entry.backspace();
        self.report(outcome)
    }

    #[wasm_bindgen(getter)]
    pub fn display(&self) -> String {
        self.entry.display()
    }

    #[wasm_bindgen(getter)]
    pub fn canonical(&self) -> String {
        self.entry.canonical().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn complete(&self) -> bool {
        self.entry.is_complete()
    }
}

impl FieldEntry {
    fn report(&self, outcome: EditOutcome) -> bool {
        if let EditOutcome::Rejected(reason) = outcome {
            console::warn_1(&JsValue::from_str(&format!(
                "{:?} edit rejected: {:?}",
                self.entry.field(),
                reason
            )));
        }
        outcome.changed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_format_card_number() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_expiry_date("09/27"), "09 / 27");
        assert_eq!(mask_number("4111 1111 1111 1234"), "•••• •••• •••• 1234");
    }

    #[wasm_bindgen_test]
    fn test_card_input_flush() {
        let mut input = CardInput::new();
        input.set_card_number("4111111111111111");
        input.set_expiry_date("0927");
        assert!(input.is_valid());
        // Nothing bound: deliveries are dropped.
        assert_eq!(input.flush().unwrap(), 0);
    }

    #[wasm_bindgen_test]
    fn test_field_entry() {
        let mut entry = FieldEntry::new("expiry").unwrap();
        assert!(entry.insert("09"));
        assert_eq!(entry.display(), "09 / ");
        assert!(!entry.insert("x"));
        assert!(entry.insert("27"));
        assert!(entry.complete());
        assert!(entry.backspace());
        assert_eq!(entry.canonical(), "092");
    }

    #[wasm_bindgen_test]
    fn test_edit_results_agree_on_unchanged() {
        let mut entry = FieldEntry::new("card").unwrap();
        // Nothing to delete: no method reports a change.
        assert!(!entry.backspace());
        assert!(!entry.replace(0, 0, ""));
        assert!(!entry.insert(""));

        assert!(entry.replace(0, 0, "4111"));
        assert!(!entry.replace(0, 5, "4111"));
        assert_eq!(entry.display(), "4111 ");
    }
}
