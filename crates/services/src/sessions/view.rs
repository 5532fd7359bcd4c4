use ems_core::model::{Assessment, AttemptResult, OptionId, QuestionOption};

/// Presentation-agnostic rendering model for one question.
///
/// This is intentionally **not** a UI view-model: no markup, no pre-formatted
/// strings. The UI decides how to draw the widget and the navigation
/// controls; the flags here only say which controls exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// One-based question number.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub points: u32,
    pub widget: QuestionWidget,
    /// Previous is disabled exactly when this is true.
    pub is_first: bool,
    /// Next is hidden exactly when this is true.
    pub is_last: bool,
    /// Submit is visible only on the last question.
    pub can_submit: bool,
}

/// Which input widget the question renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionWidget {
    /// Single-select option list with the current selection, if any.
    Choice {
        options: Vec<QuestionOption>,
        selected: Option<OptionId>,
    },
    /// Free-text entry pre-filled with any existing answer.
    Text { current: String },
    /// A choice question arrived without options; rendered as an inline
    /// error while the rest of the session continues.
    MissingOptions,
}

/// State of one question-indicator chip.
///
/// A chip can be both answered and current at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorState {
    pub answered: bool,
    pub current: bool,
}

/// Rendered outcome of a graded attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub time_taken_minutes: u32,
    pub passing_score: u32,
    pub passed: bool,
}

impl ResultView {
    #[must_use]
    pub fn from_result(assessment: &Assessment, result: &AttemptResult) -> Self {
        Self {
            score: result.score,
            correct_answers: result.correct_answers,
            total_questions: result.total_questions,
            time_taken_minutes: result.time_taken_minutes,
            passing_score: assessment.passing_score(),
            passed: result.passed,
        }
    }

    /// Badge label chosen by the pass/fail flag.
    #[must_use]
    pub fn badge(&self) -> &'static str {
        if self.passed { "Passed" } else { "Failed" }
    }
}
