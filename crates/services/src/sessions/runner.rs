use std::sync::Arc;

use backend::AssessmentApi;
use ems_core::Clock;
use ems_core::model::AssessmentId;

use super::service::AssessmentSession;
use super::timer::TimerEvent;
use super::view::ResultView;
use crate::error::SessionError;
use crate::notify::Notifier;

/// Alert shown when the warning threshold is crossed.
const TIME_WARNING: &str = "5 minutes remaining!";
/// Alert shown when the allotment runs out.
const TIME_UP: &str = "Time is up! Your assessment will be submitted automatically.";

/// Outcome of driving the session by one timer tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Timer is stopped or the session is past InProgress; nothing happened.
    Idle,
    Running { remaining: u64 },
    Warning { remaining: u64 },
    /// The allotment ran out and the answers were submitted automatically.
    AutoSubmitted(ResultView),
}

/// Orchestrates session loading, ticking, and submission against the API seam.
#[derive(Clone)]
pub struct SessionRunner {
    clock: Clock,
    api: Arc<dyn AssessmentApi>,
}

impl SessionRunner {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn AssessmentApi>) -> Self {
        Self { clock, api }
    }

    /// Load an assessment and start an attempt: metadata, questions, then the
    /// attempt, strictly in that order. The first failure aborts the whole
    /// sequence, and an empty question list fails before any attempt is
    /// started.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoQuestions` for an empty assessment and
    /// `SessionError::Api` for any failed step; both are terminal for the
    /// session (the caller alerts and navigates back to the catalog).
    pub async fn start_session(
        &self,
        id: AssessmentId,
    ) -> Result<AssessmentSession, SessionError> {
        let assessment = self.api.get_assessment(id).await?;
        let questions = self.api.list_questions(id).await?;
        if questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        let attempt_id = self.api.start_attempt(id).await?;
        tracing::info!(
            assessment = %id,
            attempt = %attempt_id,
            questions = questions.len(),
            "assessment session started"
        );
        AssessmentSession::new(assessment, questions, attempt_id, self.clock.now())
    }

    /// Submit the accumulated answers: stop the timer, then post.
    ///
    /// The phase moves to Submitting before any I/O, so a timer expiry
    /// arriving while the request is in flight cannot submit a second time.
    ///
    /// # Errors
    ///
    /// A rejected submission returns `SessionError::Api` after moving the
    /// session back to InProgress (timer still stopped); the learner may
    /// retry. Calling this on a completed session returns
    /// `SessionError::AlreadyCompleted`.
    pub async fn submit(
        &self,
        session: &mut AssessmentSession,
    ) -> Result<ResultView, SessionError> {
        session.begin_submission()?;
        let outcome = self
            .api
            .submit_attempt(session.assessment().id(), session.answers())
            .await;
        match outcome {
            Ok(result) => {
                tracing::info!(
                    attempt = %session.attempt_id(),
                    score = result.score,
                    passed = result.passed,
                    "assessment submitted"
                );
                session.complete(result)
            }
            Err(err) => {
                tracing::warn!(attempt = %session.attempt_id(), error = %err, "submission failed");
                session.submission_failed()?;
                Err(SessionError::Api(err))
            }
        }
    }

    /// Drive the countdown by one second, surfacing the warning and expiry
    /// notices through the notifier and auto-submitting on expiry.
    ///
    /// # Errors
    ///
    /// A failed automatic submission returns `SessionError::Api`; the session
    /// stays alive with the timer expired, and a manual retry remains
    /// possible.
    pub async fn tick(
        &self,
        session: &mut AssessmentSession,
        notifier: &dyn Notifier,
    ) -> Result<TickOutcome, SessionError> {
        match session.tick_timer() {
            None => Ok(TickOutcome::Idle),
            Some(TimerEvent::Tick { remaining }) => Ok(TickOutcome::Running { remaining }),
            Some(TimerEvent::Warning { remaining }) => {
                notifier.alert(TIME_WARNING);
                Ok(TickOutcome::Warning { remaining })
            }
            Some(TimerEvent::Expired) => {
                notifier.alert(TIME_UP);
                let view = self.submit(session).await?;
                Ok(TickOutcome::AutoSubmitted(view))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::InMemoryBackend;
    use ems_core::model::{
        Assessment, AttemptResult, OptionId, Question, QuestionId, QuestionOption, QuestionType,
    };
    use ems_core::time::fixed_clock;

    use crate::notify::RecordingNotifier;
    use crate::sessions::timer::TimerState;

    fn build_assessment(id: u64, time_limit_minutes: u32) -> Assessment {
        Assessment::new(
            AssessmentId::new(id),
            "Security Awareness",
            None,
            70,
            time_limit_minutes,
        )
        .unwrap()
    }

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            QuestionType::MultipleChoice,
            format!("Question {id}"),
            5,
            vec![
                QuestionOption::new(OptionId::new(id * 10), "First"),
                QuestionOption::new(OptionId::new(id * 10 + 1), "Second"),
            ],
        )
        .unwrap()
    }

    fn runner_with(backend: &InMemoryBackend) -> SessionRunner {
        SessionRunner::new(fixed_clock(), Arc::new(backend.clone()))
    }

    #[tokio::test]
    async fn loading_lands_on_question_one_of_n() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(
            build_assessment(1, 30),
            vec![build_question(1), build_question(2), build_question(3)],
        );

        let session = runner_with(&backend)
            .start_session(AssessmentId::new(1))
            .await
            .unwrap();

        let view = session.current_view();
        assert_eq!(view.number, 1);
        assert_eq!(view.total, 3);
        let expected = 1.0 / 3.0;
        assert!((session.progress().fraction - expected).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn empty_assessment_never_starts_an_attempt() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 30), Vec::new());

        let err = runner_with(&backend)
            .start_session(AssessmentId::new(1))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::NoQuestions));
        assert_eq!(backend.started_attempts(), 0);
    }

    #[tokio::test]
    async fn load_failure_aborts_the_sequence() {
        let backend = InMemoryBackend::new();

        let err = runner_with(&backend)
            .start_session(AssessmentId::new(42))
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Api(_)));
        assert_eq!(backend.started_attempts(), 0);
    }

    #[tokio::test]
    async fn sixty_ticks_auto_submit_exactly_once() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 1), vec![build_question(1)]);
        backend.set_result(
            AssessmentId::new(1),
            AttemptResult {
                score: 40,
                correct_answers: 0,
                total_questions: 1,
                time_taken_minutes: 1,
                passed: false,
            },
        );

        let runner = runner_with(&backend);
        let mut session = runner.start_session(AssessmentId::new(1)).await.unwrap();
        let notifier = RecordingNotifier::new();

        let mut auto_submissions = 0;
        for _ in 0..90 {
            match runner.tick(&mut session, &notifier).await.unwrap() {
                TickOutcome::AutoSubmitted(_) => auto_submissions += 1,
                TickOutcome::Idle | TickOutcome::Running { .. } | TickOutcome::Warning { .. } => {}
            }
        }

        assert_eq!(auto_submissions, 1);
        assert_eq!(backend.submissions().len(), 1);
        assert!(session.is_complete());
        assert_eq!(notifier.alerts(), vec![TIME_UP]);
    }

    #[tokio::test]
    async fn warning_is_announced_once() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 6), vec![build_question(1)]);

        let runner = runner_with(&backend);
        let mut session = runner.start_session(AssessmentId::new(1)).await.unwrap();
        let notifier = RecordingNotifier::new();

        // Tick through the first two minutes; the threshold crossing happens
        // at the 60th tick.
        for _ in 0..120 {
            runner.tick(&mut session, &notifier).await.unwrap();
        }

        assert_eq!(notifier.alerts(), vec![TIME_WARNING]);
    }

    #[tokio::test]
    async fn manual_submission_renders_the_result() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 30), vec![build_question(1)]);
        backend.set_result(
            AssessmentId::new(1),
            AttemptResult {
                score: 85,
                correct_answers: 17,
                total_questions: 20,
                time_taken_minutes: 12,
                passed: true,
            },
        );

        let runner = runner_with(&backend);
        let mut session = runner.start_session(AssessmentId::new(1)).await.unwrap();
        session
            .select_option(QuestionId::new(1), OptionId::new(10))
            .unwrap();

        let view = runner.submit(&mut session).await.unwrap();

        assert_eq!(view.score, 85);
        assert_eq!(view.correct_answers, 17);
        assert_eq!(view.total_questions, 20);
        assert_eq!(view.time_taken_minutes, 12);
        assert!(view.passed);
        assert_eq!(view.badge(), "Passed");

        let submissions = backend.submissions();
        let (_, sheet) = &submissions[0];
        assert_eq!(sheet.answered_count(), 1);
    }

    #[tokio::test]
    async fn rejected_submission_allows_a_retry() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 30), vec![build_question(1)]);
        backend.reject_next_submission("Grading unavailable");

        let runner = runner_with(&backend);
        let mut session = runner.start_session(AssessmentId::new(1)).await.unwrap();

        let err = runner.submit(&mut session).await.unwrap_err();
        assert_eq!(err.to_string(), "Grading unavailable");
        assert!(!session.is_complete());
        assert_eq!(session.timer().state(), TimerState::Stopped);

        // Second attempt goes through.
        runner.submit(&mut session).await.unwrap();
        assert!(session.is_complete());
        assert_eq!(backend.submissions().len(), 1);
    }

    #[tokio::test]
    async fn ticks_after_manual_submission_are_idle() {
        let backend = InMemoryBackend::new();
        backend.insert_assessment(build_assessment(1, 1), vec![build_question(1)]);

        let runner = runner_with(&backend);
        let mut session = runner.start_session(AssessmentId::new(1)).await.unwrap();
        let notifier = RecordingNotifier::new();

        runner.submit(&mut session).await.unwrap();

        for _ in 0..120 {
            let outcome = runner.tick(&mut session, &notifier).await.unwrap();
            assert_eq!(outcome, TickOutcome::Idle);
        }
        assert_eq!(backend.submissions().len(), 1);
        assert!(notifier.alerts().is_empty());
    }
}
