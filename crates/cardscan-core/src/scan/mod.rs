//! Card scan flow: camera frames in, a recognized card out.

mod session;

pub use session::ScanSession;

use crate::error::{RecognitionError, SessionError};
use crate::models::card::{ExtractedFields, ScannedCard};

/// Camera feed controlled by a scan session.
pub trait CaptureSession: Send {
    /// Prepare the device and start delivering frames.
    fn start(&mut self) -> Result<(), SessionError>;

    /// Stop delivering frames. Calling it twice is harmless.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// On-device text recognizer for captured images.
pub trait TextRecognizer<I>: Send + Sync {
    /// Recognize the text lines of one image, in reading order.
    fn recognize(&self, image: &I) -> Result<Vec<String>, RecognitionError>;
}

/// Receiver of the scan result, usually the card form.
pub trait ScanDelegate: Send + Sync {
    fn did_recognize_card(&self, card: &ScannedCard);

    fn did_dismiss(&self) {}
}

impl<F> ScanDelegate for F
where
    F: Fn(&ScannedCard) + Send + Sync,
{
    fn did_recognize_card(&self, card: &ScannedCard) {
        self(card)
    }
}

/// Lifecycle of a scan session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Created, camera not started yet.
    Idle,
    Scanning,
    /// A valid card was handed to the delegate.
    Recognized(ScannedCard),
    /// Closed by the user or because the camera failed.
    Dismissed,
}

impl SessionStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, SessionStatus::Recognized(_) | SessionStatus::Dismissed)
    }
}

/// What happened to one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// At least one candidate was pushed into the card model.
    Extracted(ExtractedFields),
    NoCandidate,
    /// The recognizer failed; state is unchanged.
    RecognizerFailed(RecognitionError),
    /// The session already ended.
    Ignored,
}
