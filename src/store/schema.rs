use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::result::TestResult;

/// A typed field in a remote document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Timestamp(DateTime<Utc>),
    String(String),
}

/// A schemaless document written to a [`DocumentStore`](crate::quiz::persistence::DocumentStore).
pub type Document = BTreeMap<String, FieldValue>;

/// Remote record of one practice test attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAttempt {
    pub total_questions: usize,
    pub attempted_questions: usize,
    pub created_at: DateTime<Utc>,
}

impl RemoteAttempt {
    pub fn from_result(result: &TestResult, created_at: DateTime<Utc>) -> Self {
        Self {
            total_questions: result.total,
            attempted_questions: result.attempted,
            created_at,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(
            "totalQuestions".to_string(),
            FieldValue::Integer(self.total_questions as i64),
        );
        doc.insert(
            "attemptedQuestions".to_string(),
            FieldValue::Integer(self.attempted_questions as i64),
        );
        doc.insert(
            "createdAt".to_string(),
            FieldValue::Timestamp(self.created_at),
        );
        doc
    }
}

pub fn attempts_collection(uid: &str) -> String {
    format!("users/{uid}/attempts")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn remote_attempt_document_keys() {
        let result = TestResult::new(10, 4);
        let when = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let doc = RemoteAttempt::from_result(&result, when).to_document();
        assert_eq!(doc.get("totalQuestions"), Some(&FieldValue::Integer(10)));
        assert_eq!(doc.get("attemptedQuestions"), Some(&FieldValue::Integer(4)));
        assert_eq!(doc.get("createdAt"), Some(&FieldValue::Timestamp(when)));
    }

    #[test]
    fn attempts_live_under_the_user() {
        assert_eq!(attempts_collection("abc"), "users/abc/attempts");
    }
}
