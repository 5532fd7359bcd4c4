use std::collections::HashMap;

use crate::model::ids::{OptionId, QuestionId};

/// A learner's response to a single question.
///
/// A response is either a selected option or free text, never both; the
/// variants make the exclusivity structural.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Selected(OptionId),
    Text(String),
}

impl Answer {
    #[must_use]
    pub fn selected_option(&self) -> Option<OptionId> {
        match self {
            Answer::Selected(id) => Some(*id),
            Answer::Text(_) => None,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Answer::Selected(_) => None,
            Answer::Text(text) => Some(text),
        }
    }
}

/// In-memory response store for one session.
///
/// Entries are overwritten whenever the learner changes a response and are
/// never removed until the session ends. Keeping entries stable across
/// navigation is what preserves a selection when the learner moves away from
/// a question and back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: HashMap<QuestionId, Answer>,
}

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response, replacing any previous one for the same question.
    pub fn record(&mut self, question_id: QuestionId, answer: Answer) {
        self.answers.insert(question_id, answer);
    }

    #[must_use]
    pub fn get(&self, question_id: QuestionId) -> Option<&Answer> {
        self.answers.get(&question_id)
    }

    #[must_use]
    pub fn is_answered(&self, question_id: QuestionId) -> bool {
        self.answers.contains_key(&question_id)
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, &Answer)> {
        self.answers.iter().map(|(id, answer)| (*id, answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_overwrites_previous_answer() {
        let mut sheet = AnswerSheet::new();
        let question = QuestionId::new(1);

        sheet.record(question, Answer::Selected(OptionId::new(10)));
        sheet.record(question, Answer::Selected(OptionId::new(11)));

        assert_eq!(sheet.answered_count(), 1);
        assert_eq!(
            sheet.get(question).and_then(Answer::selected_option),
            Some(OptionId::new(11))
        );
    }

    #[test]
    fn switching_to_text_replaces_the_selection() {
        let mut sheet = AnswerSheet::new();
        let question = QuestionId::new(1);

        sheet.record(question, Answer::Selected(OptionId::new(10)));
        sheet.record(question, Answer::Text("four eyes principle".into()));

        let answer = sheet.get(question).unwrap();
        assert_eq!(answer.selected_option(), None);
        assert_eq!(answer.text(), Some("four eyes principle"));
    }

    #[test]
    fn unanswered_questions_have_no_entry() {
        let sheet = AnswerSheet::new();
        assert!(!sheet.is_answered(QuestionId::new(1)));
        assert!(sheet.is_empty());
    }
}
