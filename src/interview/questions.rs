use std::collections::HashMap;

use crate::interview::setup::InterviewType;

const QUESTION_SETS: &str = include_str!("../../assets/interview_questions.json");

/// Built-in question sets, one fixed list per interview type.
pub struct QuestionBank {
    sets: HashMap<String, Vec<String>>,
}

impl QuestionBank {
    pub fn load() -> Self {
        let sets: HashMap<String, Vec<String>> =
            serde_json::from_str(QUESTION_SETS).unwrap_or_default();
        Self { sets }
    }

    /// Questions for `interview_type`, falling back to the behavioral set.
    pub fn questions_for(&self, interview_type: InterviewType) -> Vec<String> {
        self.sets
            .get(interview_type.as_str())
            .or_else(|| self.sets.get(InterviewType::Behavioral.as_str()))
            .cloned()
            .unwrap_or_default()
    }
}
