pub mod command;

use std::sync::mpsc::Sender;

use thiserror::Error;

pub use command::CommandCapture;

/// Messages produced by a capture backend, delivered in capture order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    /// A finalized transcript segment.
    Chunk(String),
    Error(String),
    /// The backend stopped producing output on its own.
    Ended,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("speech capture is not available on this host")]
    Unavailable,
    #[error("speech capture is already running")]
    AlreadyRunning,
    #[error("failed to start speech capture: {0}")]
    Start(#[from] std::io::Error),
}

/// Host speech-to-text capability.
///
/// `start` hands the backend a channel; finalized chunks and errors arrive on
/// it asynchronously. `stop` is fire-and-forget: chunks already in flight may
/// still be delivered afterwards.
pub trait SpeechCaptureAdapter: Send {
    fn is_available(&self) -> bool;
    fn start(&mut self, sink: Sender<CaptureEvent>) -> Result<(), CaptureError>;
    fn stop(&mut self);
}

/// Used when the host has no speech capability. The interview still works;
/// answers are typed instead.
#[derive(Debug, Default)]
pub struct UnavailableCapture;

impl SpeechCaptureAdapter for UnavailableCapture {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self, _sink: Sender<CaptureEvent>) -> Result<(), CaptureError> {
        Err(CaptureError::Unavailable)
    }

    fn stop(&mut self) {}
}

/// Running transcript for one answer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized chunk, space separated. Blank chunks are ignored.
    pub fn append_chunk(&mut self, chunk: &str) {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(chunk);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;

    #[test]
    fn chunks_are_space_separated_in_order() {
        let mut t = Transcript::new();
        t.append_chunk("I led");
        t.append_chunk(" the migration ");
        t.append_chunk("");
        t.append_chunk("last year");
        assert_eq!(t.as_str(), "I led the migration last year");
    }

    #[test]
    fn blank_transcript_detection() {
        let mut t = Transcript::new();
        assert!(t.is_blank());
        t.set("   ");
        assert!(t.is_blank());
        t.append_chunk("ok");
        assert!(!t.is_blank());
        t.clear();
        assert_eq!(t.as_str(), "");
    }

    #[test]
    fn unavailable_capture_refuses_to_start() {
        let (tx, _rx) = mpsc::channel();
        let mut capture = UnavailableCapture;
        assert!(!capture.is_available());
        assert!(matches!(capture.start(tx), Err(CaptureError::Unavailable)));
    }
}
