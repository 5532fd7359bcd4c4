use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text must not be empty")]
    EmptyText,
}

/// Classification governing which input widget is rendered for a question.
///
/// Unrecognized backend values fall back to `ShortAnswer`, which renders a
/// free-text widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    MultipleChoice,
    TrueFalse,
    #[serde(other)]
    ShortAnswer,
}

impl QuestionType {
    /// True for types answered by picking one option from a list.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice | Self::TrueFalse)
    }
}

/// One selectable answer for a choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    id: OptionId,
    text: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(id: OptionId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// One question of a loaded assessment, immutable for the session.
///
/// A choice question with an empty option list is representable on purpose:
/// the backend can serve one, and rendering reports it as an inline error
/// rather than failing the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    question_type: QuestionType,
    text: String,
    points: u32,
    options: Vec<QuestionOption>,
}

impl Question {
    /// Build a question from backend-provided data.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyText` if the question text is blank.
    pub fn new(
        id: QuestionId,
        question_type: QuestionType,
        text: impl Into<String>,
        points: u32,
        options: Vec<QuestionOption>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        Ok(Self {
            id,
            question_type,
            text,
            points,
            options,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    /// Look up an option belonging to this question.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id() == id)
    }

    #[must_use]
    pub fn has_options(&self) -> bool {
        !self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice_question() -> Question {
        Question::new(
            QuestionId::new(1),
            QuestionType::MultipleChoice,
            "Which door stays locked?",
            5,
            vec![
                QuestionOption::new(OptionId::new(10), "Server room"),
                QuestionOption::new(OptionId::new(11), "Lobby"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new(
            QuestionId::new(1),
            QuestionType::TrueFalse,
            "  ",
            1,
            Vec::new(),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn option_lookup_is_scoped_to_the_question() {
        let question = choice_question();
        assert!(question.option(OptionId::new(10)).is_some());
        assert!(question.option(OptionId::new(99)).is_none());
    }

    #[test]
    fn choice_types_are_classified() {
        assert!(QuestionType::MultipleChoice.is_choice());
        assert!(QuestionType::TrueFalse.is_choice());
        assert!(!QuestionType::ShortAnswer.is_choice());
    }

    #[test]
    fn unknown_wire_type_falls_back_to_short_answer() {
        let parsed: QuestionType = serde_json::from_str("\"ESSAY\"").unwrap();
        assert_eq!(parsed, QuestionType::ShortAnswer);
    }

    #[test]
    fn choice_question_without_options_is_representable() {
        let question = Question::new(
            QuestionId::new(2),
            QuestionType::MultipleChoice,
            "Misconfigured question",
            1,
            Vec::new(),
        )
        .unwrap();
        assert!(!question.has_options());
    }
}
