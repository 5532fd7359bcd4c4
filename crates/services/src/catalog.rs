use std::sync::Arc;

use backend::AssessmentApi;
use ems_core::model::{AssessmentId, AssessmentSummary};

use crate::error::SessionError;

/// Catalog list entry for the dashboard's assessment screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: AssessmentId,
    pub title: String,
    pub question_count: u32,
    pub passing_score: u32,
    pub time_limit_minutes: u32,
    pub is_active: bool,
}

impl CatalogItem {
    #[must_use]
    pub fn from_summary(summary: AssessmentSummary) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            question_count: summary.question_count,
            passing_score: summary.passing_score,
            time_limit_minutes: summary.time_limit_minutes,
            is_active: summary.is_active,
        }
    }

    /// Whether the take-assessment flow can be entered from this entry.
    #[must_use]
    pub fn is_takeable(&self) -> bool {
        self.is_active && self.question_count > 0
    }
}

/// Facade for the assessment list screen, the page every fatal session error
/// navigates back to. Hides the API seam from the presentation layer.
#[derive(Clone)]
pub struct AssessmentCatalogService {
    api: Arc<dyn AssessmentApi>,
}

impl AssessmentCatalogService {
    #[must_use]
    pub fn new(api: Arc<dyn AssessmentApi>) -> Self {
        Self { api }
    }

    /// List the assessments available to the learner.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Api` on backend failures.
    pub async fn list_assessments(&self) -> Result<Vec<CatalogItem>, SessionError> {
        let summaries = self.api.list_assessments().await?;
        Ok(summaries.into_iter().map(CatalogItem::from_summary).collect())
    }
}
