/// Scored outcome produced by the backend in response to a submission.
///
/// The client renders these values verbatim; scoring and the pass/fail
/// decision are computed server-side against the assessment's passing score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptResult {
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub time_taken_minutes: u32,
    pub passed: bool,
}
