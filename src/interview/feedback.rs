use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::interview::practice::AnsweredQuestion;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub clarity: String,
    pub confidence: String,
    pub readiness: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub mistakes: Vec<String>,
    pub improvements: Vec<String>,
    pub evaluation: Evaluation,
    pub sample_answer: String,
    pub encouragement: String,
}

/// Turns a finished interview into a coaching report.
///
/// Implementations may block; callers run them through [`FeedbackJob`].
pub trait FeedbackGenerator: Send + Sync {
    fn generate(&self, answers: &[AnsweredQuestion]) -> Result<Feedback>;
}

/// Placeholder coach: waits, then returns the same report for every interview.
pub struct StubFeedbackGenerator {
    delay: Duration,
}

impl StubFeedbackGenerator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn fixed_feedback() -> Feedback {
        Feedback {
            mistakes: vec![
                "Responses could be more structured using the STAR method (Situation, Task, Action, Result).".to_string(),
                "Consider adding more specific examples with measurable outcomes.".to_string(),
                "Watch for filler words that may reduce perceived confidence.".to_string(),
            ],
            improvements: vec![
                "Start each answer by briefly setting the context, then describe your specific actions.".to_string(),
                "Practice quantifying your achievements (e.g., 'increased efficiency by 30%').".to_string(),
                "Pause briefly before answering to gather your thoughts and appear more composed.".to_string(),
            ],
            evaluation: Evaluation {
                clarity: "Your ideas come through, but could be organized more clearly for maximum impact.".to_string(),
                confidence: "Good energy overall. A slower pace would project even more authority.".to_string(),
                readiness: "You're on the right track. A few more practice sessions will sharpen your delivery.".to_string(),
            },
            sample_answer: "In my previous role, I noticed our team was spending excessive time on manual reporting. I took the initiative to research automation tools, presented a proposal to my manager, and led the implementation. This reduced reporting time by 40% and allowed the team to focus on strategic work.".to_string(),
            encouragement: "You're making great progress! Every practice session builds your confidence. Keep going, your dedication will pay off in your next interview!".to_string(),
        }
    }
}

impl FeedbackGenerator for StubFeedbackGenerator {
    fn generate(&self, answers: &[AnsweredQuestion]) -> Result<Feedback> {
        debug!("stub feedback for {} answers", answers.len());
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        Ok(Self::fixed_feedback())
    }
}

/// A feedback generation running on a worker thread.
pub struct FeedbackJob {
    rx: Receiver<Result<Feedback>>,
}

impl FeedbackJob {
    pub fn spawn(generator: Arc<dyn FeedbackGenerator>, answers: Vec<AnsweredQuestion>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = generator.generate(&answers);
            // Receiver is gone if the interview was abandoned meanwhile.
            let _ = tx.send(result);
        });
        info!("feedback generation started");
        Self { rx }
    }

    /// Non-blocking completion check.
    pub fn poll(&self) -> Option<Result<Feedback>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err(anyhow!("feedback generator stopped without a result")))
            }
        }
    }

    /// Block until the generator finishes or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<Result<Feedback>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                Some(Err(anyhow!("feedback generator stopped without a result")))
            }
        }
    }
}
