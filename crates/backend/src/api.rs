use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use ems_core::model::{
    AnswerSheet, Assessment, AssessmentId, AssessmentSummary, AttemptId, AttemptResult, Question,
};

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    /// Non-success response carrying the backend-provided message, shown to
    /// the user verbatim.
    #[error("{message}")]
    Rejected { message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// REST contract consumed by the assessment-taking flow.
///
/// One method per endpoint; every call maps a non-2xx response to an
/// `ApiError` rather than a partial value.
#[async_trait]
pub trait AssessmentApi: Send + Sync {
    /// Fetch assessment metadata (`GET /api/assessments/{id}`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown assessment, or other
    /// `ApiError` values on transport and decode failures.
    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, ApiError>;

    /// Fetch the ordered question list (`GET /api/assessments/{id}/questions`).
    ///
    /// An empty list is a valid response; callers decide whether it is
    /// terminal for their flow.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown assessment, or other
    /// `ApiError` values on transport and decode failures.
    async fn list_questions(&self, id: AssessmentId) -> Result<Vec<Question>, ApiError>;

    /// List assessments for the dashboard catalog (`GET /api/assessments`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` values on transport and decode failures.
    async fn list_assessments(&self) -> Result<Vec<AssessmentSummary>, ApiError>;

    /// Start a server-side attempt (`POST /api/assessments/{id}/start`).
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend message when the attempt
    /// is refused (e.g. already taken this quarter).
    async fn start_attempt(&self, id: AssessmentId) -> Result<AttemptId, ApiError>;

    /// Submit the accumulated answers (`POST /api/assessments/{id}/submit`).
    ///
    /// The attempt is correlated server-side; the body carries only the
    /// answer map.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend message when grading
    /// refuses the submission; the caller may retry.
    async fn submit_attempt(
        &self,
        id: AssessmentId,
        answers: &AnswerSheet,
    ) -> Result<AttemptResult, ApiError>;
}

#[derive(Default)]
struct Inner {
    assessments: HashMap<AssessmentId, Assessment>,
    questions: HashMap<AssessmentId, Vec<Question>>,
    next_attempt: u64,
    started: Vec<(AttemptId, AssessmentId)>,
    submissions: Vec<(AssessmentId, AnswerSheet)>,
    results: HashMap<AssessmentId, AttemptResult>,
    reject_next_submission: Option<String>,
}

/// In-memory `AssessmentApi` for service tests.
///
/// Records every started attempt and submission so tests can assert that an
/// empty assessment never starts an attempt and that auto-submit fires
/// exactly once.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, ApiError> {
        self.inner
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// Register an assessment together with its question list.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    pub fn insert_assessment(&self, assessment: Assessment, questions: Vec<Question>) {
        let mut guard = self.inner.lock().expect("backend lock poisoned");
        guard.questions.insert(assessment.id(), questions);
        guard.assessments.insert(assessment.id(), assessment);
    }

    /// Script the result returned for submissions against an assessment.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    pub fn set_result(&self, id: AssessmentId, result: AttemptResult) {
        let mut guard = self.inner.lock().expect("backend lock poisoned");
        guard.results.insert(id, result);
    }

    /// Make the next submission fail with the given backend message.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    pub fn reject_next_submission(&self, message: impl Into<String>) {
        let mut guard = self.inner.lock().expect("backend lock poisoned");
        guard.reject_next_submission = Some(message.into());
    }

    /// Number of attempts started so far.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    #[must_use]
    pub fn started_attempts(&self) -> usize {
        self.inner.lock().expect("backend lock poisoned").started.len()
    }

    /// Submissions received so far, including rejected retries' successors.
    ///
    /// # Panics
    ///
    /// Panics if the backing lock is poisoned.
    #[must_use]
    pub fn submissions(&self) -> Vec<(AssessmentId, AnswerSheet)> {
        self.inner
            .lock()
            .expect("backend lock poisoned")
            .submissions
            .clone()
    }
}

#[async_trait]
impl AssessmentApi for InMemoryBackend {
    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, ApiError> {
        let guard = self.lock()?;
        guard.assessments.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn list_questions(&self, id: AssessmentId) -> Result<Vec<Question>, ApiError> {
        let guard = self.lock()?;
        guard.questions.get(&id).cloned().ok_or(ApiError::NotFound)
    }

    async fn list_assessments(&self) -> Result<Vec<AssessmentSummary>, ApiError> {
        let guard = self.lock()?;
        let mut summaries: Vec<AssessmentSummary> = guard
            .assessments
            .values()
            .map(|assessment| AssessmentSummary {
                id: assessment.id(),
                title: assessment.title().to_owned(),
                question_count: guard
                    .questions
                    .get(&assessment.id())
                    .map_or(0, |qs| qs.len() as u32),
                passing_score: assessment.passing_score(),
                time_limit_minutes: assessment.time_limit_minutes(),
                is_active: true,
            })
            .collect();
        summaries.sort_by_key(|summary| summary.id);
        Ok(summaries)
    }

    async fn start_attempt(&self, id: AssessmentId) -> Result<AttemptId, ApiError> {
        let mut guard = self.lock()?;
        if !guard.assessments.contains_key(&id) {
            return Err(ApiError::NotFound);
        }
        guard.next_attempt += 1;
        let attempt = AttemptId::new(guard.next_attempt);
        guard.started.push((attempt, id));
        Ok(attempt)
    }

    async fn submit_attempt(
        &self,
        id: AssessmentId,
        answers: &AnswerSheet,
    ) -> Result<AttemptResult, ApiError> {
        let mut guard = self.lock()?;
        if let Some(message) = guard.reject_next_submission.take() {
            return Err(ApiError::Rejected { message });
        }
        if !guard.assessments.contains_key(&id) {
            return Err(ApiError::NotFound);
        }
        guard.submissions.push((id, answers.clone()));

        let fallback = AttemptResult {
            score: 0,
            correct_answers: 0,
            total_questions: guard.questions.get(&id).map_or(0, |qs| qs.len() as u32),
            time_taken_minutes: 0,
            passed: false,
        };
        Ok(guard.results.get(&id).copied().unwrap_or(fallback))
    }
}
