//! Recorded recognizer output, one entry per captured frame.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CardScanError, Result};

/// Text lines recognized in successive camera frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    pub frames: Vec<Vec<String>>,
}

impl Transcript {
    /// Parse a JSON array of frames, each an array of lines.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Parse plain text where frames are separated by blank lines.
    pub fn from_text(content: &str) -> Self {
        let mut frames = Vec::new();
        let mut current = Vec::new();

        for line in content.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    frames.push(std::mem::take(&mut current));
                }
            } else {
                current.push(line.to_string());
            }
        }
        if !current.is_empty() {
            frames.push(current);
        }

        Self { frames }
    }

    /// Load a transcript, choosing the format by file extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let transcript = match extension.as_str() {
            "json" => Self::from_json(&content)?,
            "txt" | "" => Self::from_text(&content),
            other => {
                return Err(CardScanError::Transcript(format!(
                    "unsupported transcript format: {}",
                    other
                )));
            }
        };

        if transcript.frames.is_empty() {
            return Err(CardScanError::Transcript(format!(
                "no frames in {}",
                path.display()
            )));
        }
        Ok(transcript)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
