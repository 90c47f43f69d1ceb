use std::sync::Arc;
use std::time::Duration;

use voice2career::interview::feedback::StubFeedbackGenerator;
use voice2career::interview::flow::{AppStateMachine, InterviewStage};
use voice2career::interview::practice::{Advance, NO_ANSWER};
use voice2career::interview::setup::{InterviewType, SetupStep};

fn machine() -> AppStateMachine {
    AppStateMachine::new(
        Arc::new(StubFeedbackGenerator::new(Duration::from_millis(20))),
        Duration::ZERO,
    )
}

/// Walk the setup wizard the way the UI does.
fn configure(m: &mut AppStateMachine, kind: InterviewType, field: &str, title: &str) {
    m.start().unwrap();
    assert_eq!(m.setup().unwrap().step(), SetupStep::Type);
    m.setup_mut().unwrap().select_type(kind);
    m.setup_next().unwrap();
    m.setup_mut().unwrap().select_field(field);
    m.setup_next().unwrap();
    m.setup_mut().unwrap().set_job_title(title);
    m.setup_next().unwrap();
}

#[test]
fn technical_interview_reaches_feedback() {
    let mut m = machine();
    configure(&mut m, InterviewType::Technical, "Finance", "Analyst");
    assert_eq!(m.stage(), InterviewStage::Practice);

    let config = m.config().unwrap().clone();
    assert_eq!(config.interview_type, InterviewType::Technical);
    assert_eq!(config.field, "Finance");
    assert_eq!(config.job_title, "Analyst");

    let total = m.practice().unwrap().question_count();
    assert_eq!(total, 10);

    for i in 0..total {
        let session = m.practice_mut().unwrap();
        assert_eq!(session.current_index(), i);
        session.edit_transcript(&format!("My answer to question {}", i + 1));
        let advance = m.advance_practice().unwrap();
        if i + 1 < total {
            assert_eq!(advance, Advance::Next);
        } else {
            let Advance::Finished(answers) = advance else {
                panic!("expected the last answer to finish the interview");
            };
            assert_eq!(answers.len(), 10);
            assert_eq!(answers[9].answer, "My answer to question 10");
        }
    }

    assert_eq!(m.stage(), InterviewStage::Loading);
    assert_eq!(m.pending_answers().len(), 10);
    assert!(m.wait_for_feedback(Duration::from_secs(5)));

    assert_eq!(m.stage(), InterviewStage::Feedback);
    let feedback = m.feedback().unwrap();
    assert_eq!(feedback.mistakes.len(), 3);
    assert_eq!(feedback.improvements.len(), 3);
}

#[test]
fn unanswered_questions_are_recorded_as_such() {
    let mut m = machine();
    configure(&mut m, InterviewType::Case, "Consulting", "Associate");
    let total = m.practice().unwrap().question_count();
    let mut last = Advance::Blocked;
    for _ in 0..total {
        last = m.advance_practice().unwrap();
    }
    let Advance::Finished(answers) = last else {
        panic!("interview did not finish");
    };
    assert!(answers.iter().all(|a| a.answer == NO_ANSWER));
}

#[test]
fn restart_clears_the_interview() {
    let mut m = machine();
    configure(&mut m, InterviewType::Behavioral, "Sales", "Account Manager");
    let total = m.practice().unwrap().question_count();
    for _ in 0..total {
        m.advance_practice().unwrap();
    }
    assert!(m.wait_for_feedback(Duration::from_secs(5)));

    m.restart().unwrap();
    assert_eq!(m.stage(), InterviewStage::Hero);
    assert!(m.config().is_none());
    assert!(m.feedback().is_none());
    assert!(m.pending_answers().is_empty());
    assert!(m.practice().is_none());

    // A fresh run starts from an empty wizard.
    m.start().unwrap();
    let wizard = m.setup().unwrap();
    assert_eq!(wizard.step_number(), 1);
    assert!(wizard.interview_type.is_none());
}

#[test]
fn blank_job_title_keeps_setup_open() {
    let mut m = machine();
    configure(&mut m, InterviewType::Situational, "Healthcare", "   ");
    assert_eq!(m.stage(), InterviewStage::Setup);
    assert_eq!(m.setup().unwrap().step(), SetupStep::JobTitle);
    assert!(!m.setup().unwrap().can_proceed());
}
