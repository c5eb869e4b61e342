//! Scan session: drives the card model from recognized camera frames.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use crate::error::{RecognitionError, SessionError};
use crate::input::{lock, CardInputModel};
use crate::models::card::ExtractedFields;
use crate::queue::QueueHandle;
use crate::recognition::{CardFieldInterpreter, FieldInterpreter};

use super::{CaptureSession, FrameOutcome, ScanDelegate, SessionStatus, TextRecognizer};

/// One scan of one card.
///
/// Frames are handled on the main queue. The session binds the card model's
/// validity; the first `true` delivery hands the card to the delegate, stops
/// the camera and ends the session. Frames arriving afterwards are ignored.
pub struct ScanSession {
    model: CardInputModel,
    interpreter: Box<dyn FieldInterpreter + Send + Sync>,
    capture: Arc<Mutex<Box<dyn CaptureSession>>>,
    delegate: Arc<dyn ScanDelegate>,
    status: Arc<Mutex<SessionStatus>>,
    frames: AtomicU64,
}

impl ScanSession {
    /// Create a session with the rule-based interpreter.
    pub fn new(
        queue: QueueHandle,
        capture: Box<dyn CaptureSession>,
        delegate: Arc<dyn ScanDelegate>,
    ) -> Self {
        Self::with_interpreter(queue, capture, delegate, Box::new(CardFieldInterpreter::new()))
    }

    pub fn with_interpreter(
        queue: QueueHandle,
        capture: Box<dyn CaptureSession>,
        delegate: Arc<dyn ScanDelegate>,
        interpreter: Box<dyn FieldInterpreter + Send + Sync>,
    ) -> Self {
        Self {
            model: CardInputModel::new(queue),
            interpreter,
            capture: Arc::new(Mutex::new(capture)),
            delegate,
            status: Arc::new(Mutex::new(SessionStatus::Idle)),
            frames: AtomicU64::new(0),
        }
    }

    /// Bind the card model and start the camera.
    ///
    /// When the camera cannot start the session is dismissed.
    pub fn start(&self) -> Result<(), SessionError> {
        self.bind();

        if let Err(e) = lock(&self.capture).start() {
            warn!("capture failed to start: {}", e);
            *lock(&self.status) = SessionStatus::Dismissed;
            self.model.validity().unbind();
            return Err(e);
        }

        *lock(&self.status) = SessionStatus::Scanning;
        debug!("scan session started");
        Ok(())
    }

    fn bind(&self) {
        let model = self.model.clone();
        let capture = self.capture.clone();
        let delegate = self.delegate.clone();
        let status = self.status.clone();

        self.model.validity().bind_and_fire(move |valid| {
            if !valid {
                return;
            }
            let card = {
                let mut status = lock(&status);
                if status.is_finished() {
                    return;
                }
                let Some(card) = model.scanned_card() else {
                    return;
                };
                *status = SessionStatus::Recognized(card.clone());
                card
            };

            info!("card recognized");
            delegate.did_recognize_card(&card);
            lock(&capture).stop();
        });
    }

    /// Interpret the lines recognized in one frame.
    pub fn handle_lines(&self, lines: &[String]) -> FrameOutcome {
        if self.is_finished() {
            return FrameOutcome::Ignored;
        }

        let frame = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        let fields = self.interpreter.interpret(lines);
        debug!("frame {}: {} lines, {:?}", frame, lines.len(), fields_summary(&fields));

        if !self.model.apply(&fields) {
            return FrameOutcome::NoCandidate;
        }
        FrameOutcome::Extracted(fields)
    }

    /// Handle a recognizer result for one frame.
    pub fn handle_recognition(
        &self,
        result: Result<Vec<String>, RecognitionError>,
    ) -> FrameOutcome {
        match result {
            Ok(lines) => self.handle_lines(&lines),
            Err(_) if self.is_finished() => FrameOutcome::Ignored,
            Err(e) => {
                self.frames.fetch_add(1, Ordering::Relaxed);
                warn!("text recognition failed: {}", e);
                FrameOutcome::RecognizerFailed(e)
            }
        }
    }

    /// Run the recognizer on a captured image, unless the session has ended.
    pub fn process_image<I>(&self, recognizer: &dyn TextRecognizer<I>, image: &I) -> FrameOutcome {
        if self.is_finished() {
            return FrameOutcome::Ignored;
        }
        self.handle_recognition(recognizer.recognize(image))
    }

    /// Queue a recognized frame for the main queue.
    pub fn post_recognition(
        self: &Arc<Self>,
        queue: &QueueHandle,
        result: Result<Vec<String>, RecognitionError>,
    ) -> Result<(), SessionError> {
        let session = self.clone();
        queue.dispatch(move || {
            session.handle_recognition(result);
        })
    }

    /// Close the scan without a card.
    pub fn dismiss(&self) {
        {
            let mut status = lock(&self.status);
            if status.is_finished() {
                return;
            }
            *status = SessionStatus::Dismissed;
        }

        lock(&self.capture).stop();
        self.model.validity().unbind();
        info!("scan dismissed");
        self.delegate.did_dismiss();
    }

    pub fn status(&self) -> SessionStatus {
        lock(&self.status).clone()
    }

    pub fn is_finished(&self) -> bool {
        lock(&self.status).is_finished()
    }

    /// Frames handled so far, including failed recognitions.
    pub fn frames_seen(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    pub fn model(&self) -> &CardInputModel {
        &self.model
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        // The listener holds a model handle; unbinding breaks the cycle.
        self.model.validity().unbind();
    }
}

/// Which fields a frame produced, without logging card digits.
fn fields_summary(fields: &ExtractedFields) -> (bool, bool) {
    (fields.card_number.is_some(), fields.expiry_date.is_some())
}
