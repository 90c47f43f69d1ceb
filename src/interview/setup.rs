use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Behavioral,
    Technical,
    Situational,
    Case,
}

pub const ALL_INTERVIEW_TYPES: [InterviewType; 4] = [
    InterviewType::Behavioral,
    InterviewType::Technical,
    InterviewType::Situational,
    InterviewType::Case,
];

pub const FIELDS: &[&str] = &[
    "Technology",
    "Finance",
    "Healthcare",
    "Marketing",
    "Education",
    "Consulting",
    "Engineering",
    "Sales",
    "Human Resources",
    "Operations",
    "Legal",
    "Other",
];

impl InterviewType {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewType::Behavioral => "behavioral",
            InterviewType::Technical => "technical",
            InterviewType::Situational => "situational",
            InterviewType::Case => "case",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ALL_INTERVIEW_TYPES
            .iter()
            .copied()
            .find(|t| t.as_str() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Technical => "Technical",
            InterviewType::Situational => "Situational",
            InterviewType::Case => "Case Study",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            InterviewType::Behavioral => "Focus on past experiences",
            InterviewType::Technical => "Skills & knowledge assessment",
            InterviewType::Situational => "Hypothetical scenarios",
            InterviewType::Case => "Problem-solving exercises",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewConfig {
    pub interview_type: InterviewType,
    pub field: String,
    pub job_title: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetupStep {
    Type,
    Field,
    JobTitle,
}

/// What the parent flow should do after a wizard navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SetupOutcome {
    Stay,
    Back,
    Complete(InterviewConfig),
}

pub const SETUP_STEPS: usize = 3;

/// Three-step setup: interview type, then field, then job title.
#[derive(Clone, Debug)]
pub struct SetupWizard {
    step: usize,
    pub interview_type: Option<InterviewType>,
    pub field: Option<String>,
    pub job_title: String,
    /// Highlighted row in the type/field lists.
    pub cursor: usize,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            step: 1,
            interview_type: None,
            field: None,
            job_title: String::new(),
            cursor: 0,
        }
    }

    /// 1-based step counter.
    pub fn step_number(&self) -> usize {
        self.step
    }

    pub fn step(&self) -> SetupStep {
        match self.step {
            1 => SetupStep::Type,
            2 => SetupStep::Field,
            _ => SetupStep::JobTitle,
        }
    }

    pub fn progress(&self) -> f64 {
        self.step as f64 / SETUP_STEPS as f64
    }

    pub fn can_proceed(&self) -> bool {
        match self.step() {
            SetupStep::Type => self.interview_type.is_some(),
            SetupStep::Field => self.field.as_deref().is_some_and(|f| !f.is_empty()),
            SetupStep::JobTitle => !self.job_title.trim().is_empty(),
        }
    }

    pub fn select_type(&mut self, interview_type: InterviewType) {
        self.interview_type = Some(interview_type);
    }

    pub fn select_field(&mut self, field: &str) {
        self.field = Some(field.to_string());
    }

    pub fn set_job_title(&mut self, title: &str) {
        self.job_title = title.to_string();
    }

    /// Number of rows in the current step's list (0 for the text step).
    pub fn option_count(&self) -> usize {
        match self.step() {
            SetupStep::Type => ALL_INTERVIEW_TYPES.len(),
            SetupStep::Field => FIELDS.len(),
            SetupStep::JobTitle => 0,
        }
    }

    pub fn cursor_next(&mut self) {
        let n = self.option_count();
        if n > 0 {
            self.cursor = (self.cursor + 1) % n;
        }
    }

    pub fn cursor_prev(&mut self) {
        let n = self.option_count();
        if n > 0 {
            self.cursor = if self.cursor == 0 { n - 1 } else { self.cursor - 1 };
        }
    }

    /// Select the highlighted row of the current list step.
    pub fn select_cursor(&mut self) {
        match self.step() {
            SetupStep::Type => {
                if let Some(&t) = ALL_INTERVIEW_TYPES.get(self.cursor) {
                    self.select_type(t);
                }
            }
            SetupStep::Field => {
                if let Some(f) = FIELDS.get(self.cursor) {
                    self.select_field(f);
                }
            }
            SetupStep::JobTitle => {}
        }
    }

    pub fn next(&mut self) -> SetupOutcome {
        if !self.can_proceed() {
            return SetupOutcome::Stay;
        }
        if self.step < SETUP_STEPS {
            self.step += 1;
            self.sync_cursor();
            return SetupOutcome::Stay;
        }
        match (self.interview_type, self.field.clone()) {
            (Some(interview_type), Some(field)) => SetupOutcome::Complete(InterviewConfig {
                interview_type,
                field,
                job_title: self.job_title.trim().to_string(),
            }),
            _ => SetupOutcome::Stay,
        }
    }

    pub fn back(&mut self) -> SetupOutcome {
        if self.step > 1 {
            self.step -= 1;
            self.sync_cursor();
            SetupOutcome::Stay
        } else {
            SetupOutcome::Back
        }
    }

    /// Park the cursor on the current selection when entering a list step.
    fn sync_cursor(&mut self) {
        self.cursor = match self.step() {
            SetupStep::Type => self
                .interview_type
                .and_then(|t| ALL_INTERVIEW_TYPES.iter().position(|&x| x == t))
                .unwrap_or(0),
            SetupStep::Field => self
                .field
                .as_deref()
                .and_then(|f| FIELDS.iter().position(|&x| x == f))
                .unwrap_or(0),
            SetupStep::JobTitle => 0,
        };
    }
}
