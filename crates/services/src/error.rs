//! Shared error types for the services crate.

use thiserror::Error;

use backend::ApiError;
use ems_core::model::{OptionId, QuestionId};

/// Errors emitted by the assessment session flow.
///
/// Load-time variants (`NoQuestions`, `Api` during start) are terminal for
/// the session; `Api` during submission is not, the learner may retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("assessment has no questions")]
    NoQuestions,

    #[error("question index {index} out of range ({total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },

    #[error("question {0} is not part of this session")]
    UnknownQuestion(QuestionId),

    #[error("option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },

    #[error("a submission is already in flight")]
    SubmissionInProgress,

    #[error("session is already completed")]
    AlreadyCompleted,

    #[error("no submission in progress")]
    NotSubmitting,

    #[error(transparent)]
    Api(#[from] ApiError),
}
