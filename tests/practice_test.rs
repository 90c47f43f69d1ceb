use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use regex::Regex;
use serde_json::Value;
use tempfile::TempDir;

use voice2career::quiz::catalog::Catalog;
use voice2career::quiz::persistence::{ConfiguredAuth, PersistError, ResultPersistence};
use voice2career::quiz::score::ScoreBand;
use voice2career::quiz::test_session::PracticeTest;
use voice2career::store::documents::FileDocumentStore;
use voice2career::store::json_store::JsonStore;

fn persistence(dir: &Path, user: Option<&str>) -> ResultPersistence {
    let auth = ConfiguredAuth::new(user.map(str::to_string), None);
    let documents = FileDocumentStore::new(dir.join("documents"));
    let local = JsonStore::with_base_dir(dir.to_path_buf()).unwrap();
    ResultPersistence::new(Box::new(auth), Box::new(documents), local)
}

fn answered_test(answers: usize) -> PracticeTest {
    let catalog = Catalog::bundled();
    assert!(catalog.len() >= 10);
    let mut rng = SmallRng::seed_from_u64(2024);
    let mut test = PracticeTest::new(&catalog, 10, &mut rng);
    for i in 0..answers {
        test.answer(i, &format!("answer {i}"));
    }
    test
}

#[test]
fn six_of_ten_answers_lands_in_average_band() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(dir.path(), Some("user-1"));
    let test = answered_test(6);

    let result = test.submit(&persistence).unwrap();
    persistence.save_local(&result).unwrap();

    assert_eq!((result.total, result.attempted), (10, 6));
    assert_eq!(result.feedback, ScoreBand::Average.message());

    let stored = persistence.last_local().unwrap();
    assert_eq!(stored, result);
    let date = Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}, \d{1,2}:\d{2}:\d{2} (AM|PM)$").unwrap();
    assert!(date.is_match(&stored.date), "unexpected date {}", stored.date);

    let attempts = dir.path().join("documents/users/user-1/attempts");
    let files: Vec<_> = fs::read_dir(&attempts).unwrap().collect();
    assert_eq!(files.len(), 1);
    let path = files[0].as_ref().unwrap().path();
    let doc: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(doc["totalQuestions"], 10);
    assert_eq!(doc["attemptedQuestions"], 6);
    assert!(doc["createdAt"].is_string());
}

#[test]
fn signed_out_submission_is_blocked() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(dir.path(), None);
    let test = answered_test(3);

    let err = test.submit(&persistence).unwrap_err();
    assert!(matches!(err, PersistError::Unauthenticated));
    assert_eq!(err.to_string(), "User not logged in");
    assert!(!dir.path().join("documents").exists());
    assert!(persistence.last_local().is_none());
}

#[test]
fn local_record_is_overwritten_by_the_next_test() {
    let dir = TempDir::new().unwrap();
    let persistence = persistence(dir.path(), Some("user-1"));

    let first = answered_test(10).submit(&persistence).unwrap();
    persistence.save_local(&first).unwrap();
    let second = answered_test(2).submit(&persistence).unwrap();
    persistence.save_local(&second).unwrap();

    let stored = persistence.last_local().unwrap();
    assert_eq!(stored.attempted, 2);
    assert_eq!(stored.feedback, ScoreBand::Low.message());
    let attempts = dir.path().join("documents/users/user-1/attempts");
    assert_eq!(fs::read_dir(attempts).unwrap().count(), 2);
}

#[test]
fn malformed_catalog_gives_an_empty_test() {
    let catalog = Catalog::parse(r#"{"field": "Broken", "questions": "not a list"}"#).unwrap();
    assert!(catalog.is_empty());
    let mut rng = SmallRng::seed_from_u64(1);
    let test = PracticeTest::new(&catalog, 10, &mut rng);
    assert_eq!(test.total(), 0);
    let result = test.result();
    assert_eq!(result.percent(), 0.0);
    assert_eq!(result.feedback, ScoreBand::Low.message());
}
