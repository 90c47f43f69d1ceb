use log::info;
use rand::Rng;

use crate::quiz::catalog::{Catalog, PracticeQuestion};
use crate::quiz::ledger::AnswerLedger;
use crate::quiz::persistence::{PersistError, ResultPersistence};
use crate::quiz::result::TestResult;
use crate::quiz::sampler;

/// A written practice test over a random draw from a catalog.
pub struct PracticeTest {
    pub field: String,
    questions: Vec<PracticeQuestion>,
    ledger: AnswerLedger,
    /// Question currently focused in the UI.
    pub selected: usize,
}

impl PracticeTest {
    pub fn new<R: Rng + ?Sized>(catalog: &Catalog, count: usize, rng: &mut R) -> Self {
        let questions = sampler::sample(&catalog.questions, count, rng);
        let ledger = AnswerLedger::new(questions.len());
        Self {
            field: catalog.field.clone(),
            questions,
            ledger,
            selected: 0,
        }
    }

    pub fn questions(&self) -> &[PracticeQuestion] {
        &self.questions
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answer(&mut self, index: usize, text: &str) {
        self.ledger.set(index, text);
    }

    pub fn answer_text(&self, index: usize) -> &str {
        self.ledger.get(index).unwrap_or("")
    }

    pub fn attempted(&self) -> usize {
        self.ledger.count_non_empty()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.questions.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn result(&self) -> TestResult {
        TestResult::new(self.total(), self.attempted())
    }

    /// Record the attempt remotely. The test only counts as submitted once
    /// this succeeds; the caller shows the returned result.
    pub fn submit(&self, persistence: &ResultPersistence) -> Result<TestResult, PersistError> {
        let result = self.result();
        persistence.save_remote(&result)?;
        info!(
            "practice test submitted: {}/{} attempted",
            result.attempted, result.total
        );
        Ok(result)
    }
}
