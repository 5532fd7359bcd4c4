use chrono::{DateTime, Utc};
use std::fmt;

use ems_core::model::{
    Answer, AnswerSheet, Assessment, AttemptId, AttemptResult, OptionId, Question, QuestionId,
};

use super::progress::SessionProgress;
use super::timer::{CountdownTimer, TimerEvent};
use super::view::{IndicatorState, QuestionView, QuestionWidget, ResultView};
use crate::error::SessionError;

/// Lifecycle of a session after loading has produced it.
///
/// The loading state has no variant here: while the loader's three network
/// steps run there is no session value yet, so "Loading" is the pending
/// `SessionRunner::start_session` future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Submitting,
    Completed,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state for one attempt at a timed assessment.
///
/// Owns the immutable assessment and question list, the current question
/// index (always within bounds), the answer sheet, the countdown timer, and
/// the phase machine. All I/O lives in `SessionRunner`; everything here is
/// synchronous state manipulation.
pub struct AssessmentSession {
    assessment: Assessment,
    questions: Vec<Question>,
    attempt_id: AttemptId,
    current: usize,
    answers: AnswerSheet,
    timer: CountdownTimer,
    phase: SessionPhase,
    started_at: DateTime<Utc>,
    result: Option<AttemptResult>,
}

impl AssessmentSession {
    /// Create a session from loaded data and a started attempt.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` if the question list is empty.
    pub fn new(
        assessment: Assessment,
        questions: Vec<Question>,
        attempt_id: AttemptId,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }

        let timer = CountdownTimer::new(assessment.time_limit_minutes());
        Ok(Self {
            assessment,
            questions,
            attempt_id,
            current: 0,
            answers: AnswerSheet::new(),
            timer,
            phase: SessionPhase::InProgress,
            started_at,
            result: None,
        })
    }

    #[must_use]
    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn attempt_id(&self) -> AttemptId {
        self.attempt_id
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    #[must_use]
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn result(&self) -> Option<&AttemptResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    //
    // ─── NAVIGATION & ANSWER STORE ─────────────────────────────────────────────
    //

    /// Jump to a question by index and render it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuestionOutOfRange` for an index outside
    /// `[0, total)`; the current index is left unchanged.
    pub fn show_question(&mut self, index: usize) -> Result<QuestionView, SessionError> {
        if index >= self.questions.len() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                total: self.questions.len(),
            });
        }
        self.current = index;
        Ok(self.build_view(index))
    }

    /// Render the current question without moving.
    #[must_use]
    pub fn current_view(&self) -> QuestionView {
        self.build_view(self.current)
    }

    /// Advance to the next question; a no-op on the last one.
    pub fn next(&mut self) -> QuestionView {
        if self.current + 1 < self.questions.len() {
            self.current += 1;
        }
        self.current_view()
    }

    /// Go back one question; a no-op on the first one.
    pub fn previous(&mut self) -> QuestionView {
        self.current = self.current.saturating_sub(1);
        self.current_view()
    }

    /// Record a single-select answer, overwriting any previous response for
    /// the question. The current index is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the question is not part of
    /// this session, `SessionError::UnknownOption` if the option does not
    /// belong to the question. Both guards keep the answer sheet free of
    /// entries for questions that were never loaded.
    pub fn select_option(
        &mut self,
        question_id: QuestionId,
        option_id: OptionId,
    ) -> Result<(), SessionError> {
        let question = self
            .question(question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))?;
        if question.option(option_id).is_none() {
            return Err(SessionError::UnknownOption {
                question: question_id,
                option: option_id,
            });
        }
        self.answers.record(question_id, Answer::Selected(option_id));
        Ok(())
    }

    /// Record a free-text answer, overwriting any previous response for the
    /// question. The current index is unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownQuestion` if the question is not part of
    /// this session.
    pub fn enter_text(
        &mut self,
        question_id: QuestionId,
        text: impl Into<String>,
    ) -> Result<(), SessionError> {
        if self.question(question_id).is_none() {
            return Err(SessionError::UnknownQuestion(question_id));
        }
        self.answers.record(question_id, Answer::Text(text.into()));
        Ok(())
    }

    /// Chip state for every question, in question order.
    #[must_use]
    pub fn indicators(&self) -> Vec<IndicatorState> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| IndicatorState {
                answered: self.answers.is_answered(question.id()),
                current: index == self.current,
            })
            .collect()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.questions.len();
        let answered = self.answers.answered_count();
        SessionProgress {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            current: self.current,
            fraction: (self.current + 1) as f64 / total as f64,
        }
    }

    fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    fn build_view(&self, index: usize) -> QuestionView {
        let question = &self.questions[index];
        let total = self.questions.len();

        let widget = if question.question_type().is_choice() {
            if question.has_options() {
                QuestionWidget::Choice {
                    options: question.options().to_vec(),
                    selected: self
                        .answers
                        .get(question.id())
                        .and_then(Answer::selected_option),
                }
            } else {
                QuestionWidget::MissingOptions
            }
        } else {
            QuestionWidget::Text {
                current: self
                    .answers
                    .get(question.id())
                    .and_then(Answer::text)
                    .unwrap_or_default()
                    .to_owned(),
            }
        };

        QuestionView {
            number: index + 1,
            total,
            text: question.text().to_owned(),
            points: question.points(),
            widget,
            is_first: index == 0,
            is_last: index + 1 == total,
            can_submit: index + 1 == total,
        }
    }

    //
    // ─── TIMER & PHASE TRANSITIONS ─────────────────────────────────────────────
    //

    /// Advance the countdown by one second. Inert once the timer is stopped
    /// or expired, or after submission has begun.
    pub fn tick_timer(&mut self) -> Option<TimerEvent> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        self.timer.tick()
    }

    /// Transition `InProgress -> Submitting`, stopping the timer first.
    ///
    /// Stopping the timer inside the same transition is what makes
    /// "clear timer then submit" atomic: once the phase is Submitting a
    /// racing tick can no longer trigger a second submission.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SubmissionInProgress` or
    /// `SessionError::AlreadyCompleted` when invoked out of phase.
    pub fn begin_submission(&mut self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::InProgress => {
                self.timer.stop();
                self.phase = SessionPhase::Submitting;
                Ok(())
            }
            SessionPhase::Submitting => Err(SessionError::SubmissionInProgress),
            SessionPhase::Completed => Err(SessionError::AlreadyCompleted),
        }
    }

    /// Transition `Submitting -> InProgress` after a rejected submission.
    ///
    /// The timer stays stopped; only the UI is re-enabled so the learner can
    /// retry.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` when no submission is in flight.
    pub fn submission_failed(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Transition `Submitting -> Completed` with the graded result.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitting` when no submission is in flight.
    pub fn complete(&mut self, result: AttemptResult) -> Result<ResultView, SessionError> {
        if self.phase != SessionPhase::Submitting {
            return Err(SessionError::NotSubmitting);
        }
        self.phase = SessionPhase::Completed;
        self.result = Some(result);
        Ok(ResultView::from_result(&self.assessment, &result))
    }

    /// Rendered result once the session is completed.
    #[must_use]
    pub fn result_view(&self) -> Option<ResultView> {
        self.result
            .as_ref()
            .map(|result| ResultView::from_result(&self.assessment, result))
    }

    /// True while leaving the page would abandon a live attempt; drives the
    /// unload confirmation prompt. Once results are shown there is nothing
    /// left to lose.
    #[must_use]
    pub fn should_confirm_exit(&self) -> bool {
        self.phase != SessionPhase::Completed
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("assessment_id", &self.assessment.id())
            .field("attempt_id", &self.attempt_id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.answered_count())
            .field("phase", &self.phase)
            .field("timer", &self.timer.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
