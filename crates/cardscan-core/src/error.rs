//! Error types for the cardscan-core library.

use thiserror::Error;

/// Main error type for the cardscan library.
#[derive(Error, Debug)]
pub enum CardScanError {
    /// Text recognition error reported by the OCR collaborator.
    #[error("recognition error: {0}")]
    Recognition(#[from] RecognitionError),

    /// Scan session error.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Recorded transcript could not be read.
    #[error("transcript error: {0}")]
    Transcript(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a text recognizer for a single frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    /// The capture device could not deliver a usable frame.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The recognizer ran but failed on this frame.
    #[error("text recognition failed: {0}")]
    Failed(String),
}

/// Errors related to the scan session lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The camera could not be prepared.
    #[error("failed to start capture: {0}")]
    CaptureStart(String),

    /// The main queue is gone; nothing can be delivered anymore.
    #[error("main queue closed")]
    QueueClosed,
}

/// Result type for the cardscan library.
pub type Result<T> = std::result::Result<T, CardScanError>;
