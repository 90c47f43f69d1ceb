use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::quiz::score;

pub const DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Outcome of one practice test.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub total: usize,
    pub attempted: usize,
    pub feedback: String,
    pub date: String,
}

impl TestResult {
    pub fn new(total: usize, attempted: usize) -> Self {
        Self::at(total, attempted, &Local::now())
    }

    pub fn at<Tz: TimeZone>(total: usize, attempted: usize, when: &DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let attempted = attempted.min(total);
        Self {
            total,
            attempted,
            feedback: score::evaluate(attempted, total).to_string(),
            date: when.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn percent(&self) -> f64 {
        score::completion_percent(self.attempted, self.total)
    }
}
