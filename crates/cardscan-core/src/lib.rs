//! Core library for card scanning.
//!
//! This crate provides:
//! - Interpretation of OCR text lines into a card number and expiry date
//! - The card input model with single-listener validity notifications
//! - A serial main queue the model and its listeners run on
//! - Display formatting and keystroke shaping for manual entry
//! - The scan session tying camera, recognizer and form together

pub mod error;
pub mod format;
pub mod input;
pub mod models;
pub mod queue;
pub mod recognition;
pub mod scan;

pub use error::{CardScanError, RecognitionError, Result, SessionError};
pub use format::{mask_card_number, readable_card_number, readable_expiry_date};
pub use input::{CardForm, CardInputModel, Dynamic, EditOutcome, ManualEntry};
pub use models::card::{CardField, ExtractedFields, LineCandidate, ScannedCard};
pub use models::config::CardScanConfig;
pub use models::transcript::Transcript;
pub use queue::{MainQueue, QueueHandle};
pub use recognition::{extract_fields, CardFieldInterpreter, FieldInterpreter};
pub use scan::{CaptureSession, FrameOutcome, ScanDelegate, ScanSession, SessionStatus, TextRecognizer};
