use thiserror::Error;

use crate::model::ids::AssessmentId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("assessment title must not be empty")]
    EmptyTitle,

    #[error("assessment time limit must be at least one minute")]
    ZeroTimeLimit,
}

/// Metadata for one assessment, immutable once loaded for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    id: AssessmentId,
    title: String,
    description: Option<String>,
    passing_score: u32,
    time_limit_minutes: u32,
}

impl Assessment {
    /// Build an assessment from backend-provided metadata.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::EmptyTitle` for a blank title and
    /// `AssessmentError::ZeroTimeLimit` for a zero-minute time limit.
    pub fn new(
        id: AssessmentId,
        title: impl Into<String>,
        description: Option<String>,
        passing_score: u32,
        time_limit_minutes: u32,
    ) -> Result<Self, AssessmentError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(AssessmentError::EmptyTitle);
        }
        if time_limit_minutes == 0 {
            return Err(AssessmentError::ZeroTimeLimit);
        }

        Ok(Self {
            id,
            title,
            description,
            passing_score,
            time_limit_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> AssessmentId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Score threshold the backend compares the final score against.
    #[must_use]
    pub fn passing_score(&self) -> u32 {
        self.passing_score
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    /// Full time allotment in seconds, as consumed by the countdown timer.
    #[must_use]
    pub fn time_limit_seconds(&self) -> u64 {
        u64::from(self.time_limit_minutes) * 60
    }
}

/// Catalog list entry for an assessment, as shown on the dashboard list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentSummary {
    pub id: AssessmentId,
    pub title: String,
    pub question_count: u32,
    pub passing_score: u32,
    pub time_limit_minutes: u32,
    pub is_active: bool,
}
