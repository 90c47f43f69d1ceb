use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use thiserror::Error;

use crate::interview::feedback::{Feedback, FeedbackGenerator, FeedbackJob};
use crate::interview::practice::{Advance, AnsweredQuestion, PracticeSession};
use crate::interview::questions::QuestionBank;
use crate::interview::setup::{InterviewConfig, SetupOutcome, SetupWizard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterviewStage {
    Hero,
    Setup,
    Practice,
    Loading,
    Feedback,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} from the {stage:?} stage")]
    InvalidStage {
        action: &'static str,
        stage: InterviewStage,
    },
}

/// The voice interview wizard: hero, setup, practice, loading, feedback.
///
/// Every transition checks the current stage; a rejected transition leaves
/// the machine untouched.
pub struct AppStateMachine {
    stage: InterviewStage,
    setup: Option<SetupWizard>,
    config: Option<InterviewConfig>,
    practice: Option<PracticeSession>,
    pending_answers: Vec<AnsweredQuestion>,
    job: Option<FeedbackJob>,
    feedback: Option<Feedback>,
    /// Set when the generator failed; shown on the loading screen.
    pub error: Option<String>,
    generator: Arc<dyn FeedbackGenerator>,
    bank: QuestionBank,
    grace: Duration,
}

impl AppStateMachine {
    pub fn new(generator: Arc<dyn FeedbackGenerator>, grace: Duration) -> Self {
        Self {
            stage: InterviewStage::Hero,
            setup: None,
            config: None,
            practice: None,
            pending_answers: Vec::new(),
            job: None,
            feedback: None,
            error: None,
            generator,
            bank: QuestionBank::load(),
            grace,
        }
    }

    pub fn stage(&self) -> InterviewStage {
        self.stage
    }

    pub fn config(&self) -> Option<&InterviewConfig> {
        self.config.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn setup(&self) -> Option<&SetupWizard> {
        self.setup.as_ref()
    }

    pub fn setup_mut(&mut self) -> Option<&mut SetupWizard> {
        self.setup.as_mut()
    }

    pub fn practice(&self) -> Option<&PracticeSession> {
        self.practice.as_ref()
    }

    pub fn practice_mut(&mut self) -> Option<&mut PracticeSession> {
        self.practice.as_mut()
    }

    pub fn pending_answers(&self) -> &[AnsweredQuestion] {
        &self.pending_answers
    }

    fn expect(&self, stage: InterviewStage, action: &'static str) -> Result<(), TransitionError> {
        if self.stage == stage {
            Ok(())
        } else {
            Err(TransitionError::InvalidStage {
                action,
                stage: self.stage,
            })
        }
    }

    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Hero, "start")?;
        self.setup = Some(SetupWizard::new());
        self.stage = InterviewStage::Setup;
        Ok(())
    }

    pub fn setup_next(&mut self) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Setup, "continue setup")?;
        let outcome = match self.setup.as_mut() {
            Some(wizard) => wizard.next(),
            None => SetupOutcome::Stay,
        };
        if let SetupOutcome::Complete(config) = outcome {
            self.complete_setup(config)?;
        }
        Ok(())
    }

    pub fn setup_back(&mut self) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Setup, "go back")?;
        let outcome = match self.setup.as_mut() {
            Some(wizard) => wizard.back(),
            None => SetupOutcome::Back,
        };
        if outcome == SetupOutcome::Back {
            self.setup = None;
            self.stage = InterviewStage::Hero;
        }
        Ok(())
    }

    pub fn complete_setup(&mut self, config: InterviewConfig) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Setup, "complete setup")?;
        let questions = self.bank.questions_for(config.interview_type);
        info!(
            "interview configured: {} / {} / {} ({} questions)",
            config.interview_type.as_str(),
            config.field,
            config.job_title,
            questions.len()
        );
        self.practice = Some(PracticeSession::new(config.clone(), questions, self.grace));
        self.config = Some(config);
        self.setup = None;
        self.stage = InterviewStage::Practice;
        Ok(())
    }

    /// Record the current answer and move on; finishing the last question
    /// hands the answers to the feedback generator.
    pub fn advance_practice(&mut self) -> Result<Advance, TransitionError> {
        self.expect(InterviewStage::Practice, "advance")?;
        let advance = match self.practice.as_mut() {
            Some(session) => session.advance(),
            None => Advance::Blocked,
        };
        if let Advance::Finished(answers) = &advance {
            self.complete_practice(answers.clone())?;
        }
        Ok(advance)
    }

    pub fn complete_practice(
        &mut self,
        answers: Vec<AnsweredQuestion>,
    ) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Practice, "finish practice")?;
        self.practice = None;
        self.pending_answers = answers;
        self.spawn_job();
        self.stage = InterviewStage::Loading;
        Ok(())
    }

    fn spawn_job(&mut self) {
        self.error = None;
        self.job = Some(FeedbackJob::spawn(
            Arc::clone(&self.generator),
            self.pending_answers.clone(),
        ));
    }

    /// Check the running generator. Returns true once the machine has moved
    /// to the feedback stage.
    pub fn poll_feedback(&mut self) -> bool {
        let result = match (&self.stage, self.job.as_ref()) {
            (InterviewStage::Loading, Some(job)) => job.poll(),
            _ => None,
        };
        self.apply(result)
    }

    /// Blocking variant of [`poll_feedback`](Self::poll_feedback).
    pub fn wait_for_feedback(&mut self, timeout: Duration) -> bool {
        let result = match (&self.stage, self.job.as_ref()) {
            (InterviewStage::Loading, Some(job)) => job.wait(timeout),
            _ => None,
        };
        self.apply(result)
    }

    fn apply(&mut self, result: Option<anyhow::Result<Feedback>>) -> bool {
        match result {
            Some(Ok(feedback)) => {
                self.job = None;
                self.pending_answers.clear();
                self.feedback = Some(feedback);
                self.stage = InterviewStage::Feedback;
                true
            }
            Some(Err(e)) => {
                warn!("feedback generation failed: {e:#}");
                self.job = None;
                self.error = Some(format!("Could not generate feedback: {e}"));
                false
            }
            None => false,
        }
    }

    /// Re-run a failed generation on the retained answers.
    pub fn retry_feedback(&mut self) -> Result<(), TransitionError> {
        self.expect(InterviewStage::Loading, "retry feedback")?;
        if self.job.is_none() {
            self.spawn_job();
        }
        Ok(())
    }

    /// Back to the landing screen, forgetting the interview. Allowed from the
    /// feedback report, or from loading once generation has failed.
    pub fn restart(&mut self) -> Result<(), TransitionError> {
        let failed_loading = self.stage == InterviewStage::Loading && self.job.is_none();
        if !failed_loading {
            self.expect(InterviewStage::Feedback, "restart")?;
        }
        self.stage = InterviewStage::Hero;
        self.setup = None;
        self.config = None;
        self.practice = None;
        self.pending_answers.clear();
        self.job = None;
        self.feedback = None;
        self.error = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;
    use crate::interview::feedback::StubFeedbackGenerator;
    use crate::interview::setup::InterviewType;

    struct FailingGenerator;

    impl FeedbackGenerator for FailingGenerator {
        fn generate(&self, _answers: &[AnsweredQuestion]) -> anyhow::Result<Feedback> {
            Err(anyhow!("quota exceeded"))
        }
    }

    fn machine() -> AppStateMachine {
        AppStateMachine::new(
            Arc::new(StubFeedbackGenerator::new(Duration::ZERO)),
            Duration::ZERO,
        )
    }

    fn config() -> InterviewConfig {
        InterviewConfig {
            interview_type: InterviewType::Situational,
            field: "Healthcare".to_string(),
            job_title: "Nurse".to_string(),
        }
    }

    #[test]
    fn stages_cannot_be_skipped() {
        let mut m = machine();
        assert_eq!(
            m.complete_setup(config()),
            Err(TransitionError::InvalidStage {
                action: "complete setup",
                stage: InterviewStage::Hero
            })
        );
        assert!(m.complete_practice(Vec::new()).is_err());
        assert!(m.restart().is_err());
        assert_eq!(m.stage(), InterviewStage::Hero);
    }

    #[test]
    fn setup_back_at_first_step_returns_to_hero() {
        let mut m = machine();
        m.start().unwrap();
        m.setup_back().unwrap();
        assert_eq!(m.stage(), InterviewStage::Hero);
        assert!(m.setup().is_none());
    }

    #[test]
    fn setup_next_is_gated_by_selection() {
        let mut m = machine();
        m.start().unwrap();
        m.setup_next().unwrap();
        assert_eq!(m.setup().unwrap().step_number(), 1);
        m.setup_mut().unwrap().select_type(InterviewType::Case);
        m.setup_next().unwrap();
        assert_eq!(m.setup().unwrap().step_number(), 2);
        m.setup_back().unwrap();
        assert_eq!(m.stage(), InterviewStage::Setup);
        assert_eq!(m.setup().unwrap().step_number(), 1);
    }

    #[test]
    fn failed_generation_can_be_retried_or_abandoned() {
        let mut m = AppStateMachine::new(Arc::new(FailingGenerator), Duration::ZERO);
        m.start().unwrap();
        m.complete_setup(config()).unwrap();
        let answers = vec![AnsweredQuestion {
            question: "q".to_string(),
            answer: "a".to_string(),
        }];
        m.complete_practice(answers).unwrap();
        assert!(!m.wait_for_feedback(Duration::from_secs(5)));
        assert_eq!(m.stage(), InterviewStage::Loading);
        assert!(m.error.as_deref().unwrap().contains("quota exceeded"));
        assert_eq!(m.pending_answers().len(), 1);

        m.retry_feedback().unwrap();
        assert!(m.error.is_none());
        assert!(!m.wait_for_feedback(Duration::from_secs(5)));

        m.restart().unwrap();
        assert_eq!(m.stage(), InterviewStage::Hero);
        assert!(m.pending_answers().is_empty());
        assert!(m.config().is_none());
    }

    #[test]
    fn restart_not_allowed_while_generating() {
        let mut m = AppStateMachine::new(
            Arc::new(StubFeedbackGenerator::new(Duration::from_millis(300))),
            Duration::ZERO,
        );
        m.start().unwrap();
        m.complete_setup(config()).unwrap();
        m.complete_practice(Vec::new()).unwrap();
        assert!(m.restart().is_err());
        assert!(m.wait_for_feedback(Duration::from_secs(5)));
        assert_eq!(m.stage(), InterviewStage::Feedback);
    }
}
