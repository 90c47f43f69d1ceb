/// One free-text answer slot per sampled question.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerLedger {
    slots: Vec<String>,
}

impl AnswerLedger {
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![String::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Panics if `index` is out of range; callers only index sampled questions.
    pub fn set(&mut self, index: usize, text: &str) {
        assert!(
            index < self.slots.len(),
            "answer index {index} out of range for {} questions",
            self.slots.len()
        );
        self.slots[index] = text.to_string();
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).map(|s| s.as_str())
    }

    pub fn count_non_empty(&self) -> usize {
        self.slots.iter().filter(|s| !s.trim().is_empty()).count()
    }
}
