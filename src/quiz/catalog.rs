use std::fs;
use std::path::Path;

use anyhow::Result;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

const BUNDLED_CATALOG: &str = include_str!("../../assets/catalog/software.json");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeQuestion {
    pub id: u32,
    pub question: String,
    #[serde(default)]
    pub sample_answer: String,
}

/// A static question bank for one field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub field: String,
    #[serde(default, deserialize_with = "lenient_questions")]
    pub questions: Vec<PracticeQuestion>,
}

/// Anything other than an array of well-formed questions reads as no questions.
fn lenient_questions<'de, D>(deserializer: D) -> Result<Vec<PracticeQuestion>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(_) => Ok(serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("catalog questions are malformed: {e}");
            Vec::new()
        })),
        other => {
            warn!("catalog questions is not a list: {other}");
            Ok(Vec::new())
        }
    }
}

impl Catalog {
    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn bundled() -> Self {
        Self::parse(BUNDLED_CATALOG).unwrap_or_default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_parses() {
        let catalog = Catalog::bundled();
        assert_eq!(catalog.field, "Software Engineering");
        assert!(catalog.len() >= 10);
        assert!(catalog.questions.iter().all(|q| !q.sample_answer.is_empty()));
    }

    #[test]
    fn sample_answer_uses_camel_case_key() {
        let catalog = Catalog::parse(
            r#"{"field":"Data","questions":[{"id":7,"question":"What is a join?","sampleAnswer":"Combining rows."}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.questions[0].id, 7);
        assert_eq!(catalog.questions[0].sample_answer, "Combining rows.");
    }

    #[test]
    fn non_list_questions_degrade_to_empty() {
        let catalog = Catalog::parse(r#"{"field":"Data","questions":{"id":1}}"#).unwrap();
        assert!(catalog.is_empty());
        let catalog = Catalog::parse(r#"{"field":"Data","questions":null}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn malformed_entries_degrade_to_empty() {
        let catalog = Catalog::parse(r#"{"questions":[{"id":"one"}]}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_questions_is_empty() {
        let catalog = Catalog::parse(r#"{"field":"Data"}"#).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(Catalog::parse("not json").is_err());
    }
}
