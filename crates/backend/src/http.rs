use std::collections::BTreeMap;
use std::env;

use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use ems_core::model::{
    AnswerSheet, Assessment, AssessmentId, AssessmentSummary, AttemptId, AttemptResult, Question,
    QuestionId, QuestionOption, QuestionType,
};

use crate::api::{ApiError, AssessmentApi};
use async_trait::async_trait;

/// Connection settings for the REST backend.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: String,
    pub bearer_token: Option<String>,
}

impl BackendConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
        }
    }

    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Read the configuration from `EMS_API_BASE_URL` and `EMS_API_TOKEN`.
    ///
    /// Returns `None` when no base URL is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("EMS_API_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let bearer_token = env::var("EMS_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Some(Self {
            base_url,
            bearer_token,
        })
    }
}

/// `AssessmentApi` implementation over the HTTP/JSON contract.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpBackend {
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Build a backend from environment configuration, if present.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        BackendConfig::from_env().map(Self::new)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "POST");
        let mut request = self.client.post(&url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("request failed with status {status}"));
            tracing::warn!(%status, %message, "backend rejected request");
            return Err(ApiError::Rejected { message });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AssessmentApi for HttpBackend {
    async fn get_assessment(&self, id: AssessmentId) -> Result<Assessment, ApiError> {
        let record: AssessmentRecord = self.get_json(&format!("/api/assessments/{id}")).await?;
        record.into_assessment()
    }

    async fn list_questions(&self, id: AssessmentId) -> Result<Vec<Question>, ApiError> {
        let records: Vec<QuestionRecord> = self
            .get_json(&format!("/api/assessments/{id}/questions"))
            .await?;
        records
            .into_iter()
            .map(QuestionRecord::into_question)
            .collect()
    }

    async fn list_assessments(&self) -> Result<Vec<AssessmentSummary>, ApiError> {
        let records: Vec<AssessmentRecord> = self.get_json("/api/assessments").await?;
        Ok(records
            .into_iter()
            .map(AssessmentRecord::into_summary)
            .collect())
    }

    async fn start_attempt(&self, id: AssessmentId) -> Result<AttemptId, ApiError> {
        let record: StartAttemptRecord = self
            .post_json::<(), _>(&format!("/api/assessments/{id}/start"), None)
            .await?;
        Ok(AttemptId::new(record.id))
    }

    async fn submit_attempt(
        &self,
        id: AssessmentId,
        answers: &AnswerSheet,
    ) -> Result<AttemptResult, ApiError> {
        let body = SubmitBody::from_sheet(answers);
        let record: ResultRecord = self
            .post_json(&format!("/api/assessments/{id}/submit"), Some(&body))
            .await?;
        Ok(record.into_result())
    }
}

//
// ─── WIRE RECORDS ──────────────────────────────────────────────────────────────
//

/// Error payload the backend attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssessmentRecord {
    id: u64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    passing_score: u32,
    time_limit_minutes: u32,
    #[serde(default)]
    question_count: u32,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

impl AssessmentRecord {
    fn into_assessment(self) -> Result<Assessment, ApiError> {
        Assessment::new(
            AssessmentId::new(self.id),
            self.title,
            self.description,
            self.passing_score,
            self.time_limit_minutes,
        )
        .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn into_summary(self) -> AssessmentSummary {
        AssessmentSummary {
            id: AssessmentId::new(self.id),
            title: self.title,
            question_count: self.question_count,
            passing_score: self.passing_score,
            time_limit_minutes: self.time_limit_minutes,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionRecord {
    id: u64,
    option_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    id: u64,
    question_type: QuestionType,
    question_text: String,
    #[serde(default = "default_points")]
    points: u32,
    #[serde(default)]
    options: Vec<OptionRecord>,
}

fn default_points() -> u32 {
    1
}

impl QuestionRecord {
    fn into_question(self) -> Result<Question, ApiError> {
        let options = self
            .options
            .into_iter()
            .map(|option| {
                QuestionOption::new(ems_core::model::OptionId::new(option.id), option.option_text)
            })
            .collect();
        Question::new(
            QuestionId::new(self.id),
            self.question_type,
            self.question_text,
            self.points,
            options,
        )
        .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct StartAttemptRecord {
    id: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRecord {
    selected_option_id: Option<u64>,
    text_answer: Option<String>,
}

/// Submission body: `{"answers": {"<questionId>": {...}}}`.
///
/// A `BTreeMap` keeps the serialized key order stable for request assertions.
#[derive(Debug, Serialize)]
struct SubmitBody {
    answers: BTreeMap<String, AnswerRecord>,
}

impl SubmitBody {
    fn from_sheet(sheet: &AnswerSheet) -> Self {
        let answers = sheet
            .iter()
            .map(|(question_id, answer)| {
                let record = AnswerRecord {
                    selected_option_id: answer.selected_option().map(|id| id.value()),
                    text_answer: answer.text().map(str::to_owned),
                };
                (question_id.to_string(), record)
            })
            .collect();
        Self { answers }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    #[serde(default)]
    score: u32,
    #[serde(default)]
    correct_answers: u32,
    #[serde(default)]
    total_questions: u32,
    #[serde(default)]
    time_taken_minutes: u32,
    #[serde(default)]
    passed: bool,
}

impl ResultRecord {
    fn into_result(self) -> AttemptResult {
        AttemptResult {
            score: self.score,
            correct_answers: self.correct_answers,
            total_questions: self.total_questions,
            time_taken_minutes: self.time_taken_minutes,
            passed: self.passed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ems_core::model::{Answer, OptionId};

    #[test]
    fn submit_body_splits_choice_and_text_answers() {
        let mut sheet = AnswerSheet::new();
        sheet.record(QuestionId::new(1), Answer::Selected(OptionId::new(10)));
        sheet.record(QuestionId::new(2), Answer::Text("least privilege".into()));

        let body = SubmitBody::from_sheet(&sheet);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["answers"]["1"]["selectedOptionId"], 10);
        assert_eq!(json["answers"]["1"]["textAnswer"], serde_json::Value::Null);
        assert_eq!(json["answers"]["2"]["textAnswer"], "least privilege");
        assert_eq!(
            json["answers"]["2"]["selectedOptionId"],
            serde_json::Value::Null
        );
    }

    #[test]
    fn result_record_defaults_missing_fields_to_zero() {
        let record: ResultRecord = serde_json::from_str("{\"score\": 40}").unwrap();
        let result = record.into_result();
        assert_eq!(result.score, 40);
        assert_eq!(result.correct_answers, 0);
        assert!(!result.passed);
    }

    #[test]
    fn question_record_without_points_defaults_to_one() {
        let json = r#"{"id": 3, "questionType": "TRUE_FALSE", "questionText": "MFA is optional?"}"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        let question = record.into_question().unwrap();
        assert_eq!(question.points(), 1);
        assert!(question.options().is_empty());
    }
}
