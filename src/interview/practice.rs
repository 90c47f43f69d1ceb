use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::capture::{CaptureError, CaptureEvent, SpeechCaptureAdapter, Transcript};
use crate::interview::setup::InterviewConfig;

pub const NO_ANSWER: &str = "No answer recorded";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question: String,
    pub answer: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
    /// Capture was stopped; late chunks are still accepted until the deadline.
    Processing { until: Instant },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    /// Recording or processing is still in progress.
    Blocked,
    Next,
    Finished(Vec<AnsweredQuestion>),
}

/// One pass through an interview's question set.
pub struct PracticeSession {
    pub config: InterviewConfig,
    questions: Vec<String>,
    current: usize,
    answers: Vec<AnsweredQuestion>,
    transcript: Transcript,
    recording: RecordingState,
    grace: Duration,
    capture_rx: Option<Receiver<CaptureEvent>>,
    /// Inline status line (capture problems, hints).
    pub status: Option<String>,
}

impl PracticeSession {
    pub fn new(config: InterviewConfig, questions: Vec<String>, grace: Duration) -> Self {
        Self {
            config,
            questions,
            current: 0,
            answers: Vec::new(),
            transcript: Transcript::new(),
            recording: RecordingState::Idle,
            grace,
            capture_rx: None,
            status: None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// 0-based index of the question being answered.
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.current).map(|s| s.as_str())
    }

    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    pub fn progress(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.current + 1) as f64 / self.questions.len() as f64
    }

    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    pub fn transcript(&self) -> &str {
        self.transcript.as_str()
    }

    pub fn recording(&self) -> RecordingState {
        self.recording
    }

    pub fn is_recording(&self) -> bool {
        self.recording == RecordingState::Recording
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.recording, RecordingState::Processing { .. })
    }

    pub fn start_recording(&mut self, capture: &mut dyn SpeechCaptureAdapter) {
        if self.recording != RecordingState::Idle {
            return;
        }
        self.transcript.clear();
        self.status = None;

        let (tx, rx) = mpsc::channel();
        match capture.start(tx) {
            Ok(()) => {
                self.capture_rx = Some(rx);
                self.recording = RecordingState::Recording;
                debug!("recording question {}", self.current + 1);
            }
            Err(CaptureError::Unavailable) => {
                self.status =
                    Some("Speech capture unavailable. Press [t] to type your answer.".to_string());
            }
            Err(e) => {
                warn!("could not start speech capture: {e}");
                self.status = Some(format!("Could not start recording: {e}"));
            }
        }
    }

    pub fn stop_recording(&mut self, capture: &mut dyn SpeechCaptureAdapter, now: Instant) {
        if self.recording != RecordingState::Recording {
            return;
        }
        capture.stop();
        self.recording = RecordingState::Processing {
            until: now + self.grace,
        };
    }

    /// Drain pending capture events in arrival order and expire the grace period.
    pub fn pump(&mut self, now: Instant) {
        if let Some(rx) = self.capture_rx.take() {
            let mut keep = true;
            for event in rx.try_iter() {
                match event {
                    CaptureEvent::Chunk(text) => {
                        if self.recording == RecordingState::Idle {
                            debug!("dropping late transcript chunk");
                        } else {
                            self.transcript.append_chunk(&text);
                        }
                    }
                    CaptureEvent::Error(e) => {
                        warn!("speech capture error: {e}");
                        self.status = Some(format!("Recording stopped: {e}"));
                        if self.recording == RecordingState::Recording {
                            self.recording = RecordingState::Idle;
                        }
                        keep = false;
                    }
                    CaptureEvent::Ended => {
                        if self.recording == RecordingState::Recording {
                            self.recording = RecordingState::Idle;
                        }
                        keep = false;
                    }
                }
            }
            if keep {
                self.capture_rx = Some(rx);
            }
        }

        if let RecordingState::Processing { until } = self.recording {
            if now >= until {
                self.recording = RecordingState::Idle;
            }
        }
    }

    /// Replace the transcript with typed text. Ignored while capture is active.
    pub fn edit_transcript(&mut self, text: &str) {
        if self.recording == RecordingState::Idle {
            self.transcript.set(text);
        }
    }

    pub fn can_advance(&self) -> bool {
        self.recording == RecordingState::Idle && !self.questions.is_empty()
    }

    pub fn advance(&mut self) -> Advance {
        if !self.can_advance() {
            return Advance::Blocked;
        }
        let Some(question) = self.questions.get(self.current).cloned() else {
            return Advance::Blocked;
        };
        let answer = match self.transcript.as_str().trim() {
            "" => NO_ANSWER.to_string(),
            text => text.to_string(),
        };
        self.answers.push(AnsweredQuestion { question, answer });
        self.transcript.clear();
        self.capture_rx = None;
        self.status = None;

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            Advance::Next
        } else {
            info!("interview answered: {} questions", self.answers.len());
            Advance::Finished(std::mem::take(&mut self.answers))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::Sender;

    use super::*;
    use crate::capture::UnavailableCapture;
    use crate::interview::setup::InterviewType;

    /// Keeps the sender so tests can inject events after `start`.
    #[derive(Default)]
    struct ManualCapture {
        sink: Option<Sender<CaptureEvent>>,
        stops: usize,
    }

    impl ManualCapture {
        fn say(&self, text: &str) {
            self.sink
                .as_ref()
                .unwrap()
                .send(CaptureEvent::Chunk(text.to_string()))
                .unwrap();
        }
    }

    impl SpeechCaptureAdapter for ManualCapture {
        fn is_available(&self) -> bool {
            true
        }
        fn start(&mut self, sink: Sender<CaptureEvent>) -> Result<(), CaptureError> {
            self.sink = Some(sink);
            Ok(())
        }
        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    fn session(n: usize) -> PracticeSession {
        let config = InterviewConfig {
            interview_type: InterviewType::Behavioral,
            field: "Sales".to_string(),
            job_title: "Account Executive".to_string(),
        };
        let questions = (1..=n).map(|i| format!("Question {i}?")).collect();
        PracticeSession::new(config, questions, Duration::from_millis(500))
    }

    #[test]
    fn chunks_accumulate_during_recording_and_grace() {
        let mut s = session(2);
        let mut cap = ManualCapture::default();
        let t0 = Instant::now();

        s.start_recording(&mut cap);
        assert!(s.is_recording());
        cap.say("I organised");
        s.pump(t0);
        s.stop_recording(&mut cap, t0);
        assert_eq!(cap.stops, 1);
        cap.say("the offsite");
        s.pump(t0 + Duration::from_millis(100));
        assert!(s.is_processing());
        assert_eq!(s.advance(), Advance::Blocked);

        s.pump(t0 + Duration::from_millis(600));
        assert_eq!(s.recording(), RecordingState::Idle);
        assert_eq!(s.transcript(), "I organised the offsite");
    }

    #[test]
    fn chunks_after_grace_are_dropped() {
        let mut s = session(1);
        let mut cap = ManualCapture::default();
        let t0 = Instant::now();
        s.start_recording(&mut cap);
        s.stop_recording(&mut cap, t0);
        s.pump(t0 + Duration::from_secs(1));
        cap.say("too late");
        s.pump(t0 + Duration::from_secs(2));
        assert_eq!(s.transcript(), "");
    }

    #[test]
    fn capture_error_leaves_recording_with_status() {
        let mut s = session(1);
        let mut cap = ManualCapture::default();
        s.start_recording(&mut cap);
        cap.sink
            .as_ref()
            .unwrap()
            .send(CaptureEvent::Error("no-speech".to_string()))
            .unwrap();
        s.pump(Instant::now());
        assert_eq!(s.recording(), RecordingState::Idle);
        assert!(s.status.as_deref().unwrap().contains("no-speech"));
    }

    #[test]
    fn unavailable_capture_still_allows_answers() {
        let mut s = session(2);
        let mut cap = UnavailableCapture;
        s.start_recording(&mut cap);
        assert_eq!(s.recording(), RecordingState::Idle);
        assert!(s.status.is_some());

        s.edit_transcript("Typed answer");
        assert_eq!(s.advance(), Advance::Next);
        match s.advance() {
            Advance::Finished(answers) => {
                assert_eq!(answers.len(), 2);
                assert_eq!(answers[0].answer, "Typed answer");
                assert_eq!(answers[1].answer, NO_ANSWER);
                assert_eq!(answers[1].question, "Question 2?");
            }
            other => panic!("expected Finished, got {other:?}"),
        }
    }

    #[test]
    fn starting_a_new_recording_clears_transcript() {
        let mut s = session(1);
        let mut cap = ManualCapture::default();
        s.edit_transcript("draft");
        s.start_recording(&mut cap);
        assert_eq!(s.transcript(), "");
        s.edit_transcript("ignored while recording");
        assert_eq!(s.transcript(), "");
    }

    #[test]
    fn progress_tracks_current_question() {
        let mut s = session(4);
        assert!((s.progress() - 0.25).abs() < f64::EPSILON);
        s.advance();
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.current_question(), Some("Question 2?"));
        assert!(!s.is_last_question());
    }
}
