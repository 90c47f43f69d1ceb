#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Low,
}

impl ScoreBand {
    /// Band for a completion ratio. A test with no questions counts as 0%.
    pub fn from_counts(attempted: usize, total: usize) -> Self {
        let percent = completion_percent(attempted, total);
        if percent >= 90.0 {
            ScoreBand::Excellent
        } else if percent >= 70.0 {
            ScoreBand::Good
        } else if percent >= 40.0 {
            ScoreBand::Average
        } else {
            ScoreBand::Low
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent attempt! Strong understanding 🚀",
            ScoreBand::Good => "Good attempt, keep practicing 👍",
            ScoreBand::Average => "Average attempt, needs improvement ⚠️",
            ScoreBand::Low => "Very few answers attempted. Practice more ❌",
        }
    }
}

pub fn completion_percent(attempted: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    attempted as f64 / total as f64 * 100.0
}

pub fn evaluate(attempted: usize, total: usize) -> &'static str {
    ScoreBand::from_counts(attempted, total).message()
}
