use httpmock::prelude::*;
use serde_json::json;

use backend::{ApiError, AssessmentApi, BackendConfig, HttpBackend};
use ems_core::model::{Answer, AnswerSheet, AssessmentId, OptionId, QuestionId, QuestionType};

fn backend_for(server: &MockServer) -> HttpBackend {
    HttpBackend::new(BackendConfig::new(server.base_url()))
}

#[tokio::test]
async fn fetches_assessment_metadata() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/assessments/7");
        then.status(200).json_body(json!({
            "id": 7,
            "title": "Security Awareness",
            "description": "Quarterly refresher",
            "passingScore": 70,
            "timeLimitMinutes": 30,
            "isActive": true,
            "questionCount": 20
        }));
    });

    let assessment = backend_for(&server)
        .get_assessment(AssessmentId::new(7))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(assessment.id(), AssessmentId::new(7));
    assert_eq!(assessment.title(), "Security Awareness");
    assert_eq!(assessment.passing_score(), 70);
    assert_eq!(assessment.time_limit_seconds(), 1800);
}

#[tokio::test]
async fn fetches_questions_with_nested_options() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/assessments/7/questions");
        then.status(200).json_body(json!([
            {
                "id": 1,
                "questionType": "MULTIPLE_CHOICE",
                "questionText": "Which channel is approved for secrets?",
                "points": 5,
                "options": [
                    {"id": 11, "optionText": "Email"},
                    {"id": 12, "optionText": "Password manager"}
                ]
            },
            {
                "id": 2,
                "questionType": "TRUE_FALSE",
                "questionText": "Tailgating is a physical attack.",
                "points": 2,
                "options": [
                    {"id": 21, "optionText": "True"},
                    {"id": 22, "optionText": "False"}
                ]
            }
        ]));
    });

    let questions = backend_for(&server)
        .list_questions(AssessmentId::new(7))
        .await
        .unwrap();

    assert_eq!(questions.len(), 2);
    assert_eq!(questions[0].question_type(), QuestionType::MultipleChoice);
    assert_eq!(questions[0].options().len(), 2);
    assert_eq!(questions[0].options()[1].text(), "Password manager");
    assert_eq!(questions[1].question_type(), QuestionType::TrueFalse);
}

#[tokio::test]
async fn empty_question_list_is_a_valid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/assessments/8/questions");
        then.status(200).json_body(json!([]));
    });

    let questions = backend_for(&server)
        .list_questions(AssessmentId::new(8))
        .await
        .unwrap();
    assert!(questions.is_empty());
}

#[tokio::test]
async fn missing_assessment_maps_to_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/assessments/9");
        then.status(404);
    });

    let err = backend_for(&server)
        .get_assessment(AssessmentId::new(9))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[tokio::test]
async fn start_attempt_returns_the_server_issued_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/assessments/7/start");
        then.status(200).json_body(json!({"id": 55}));
    });

    let attempt = backend_for(&server)
        .start_attempt(AssessmentId::new(7))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(attempt.value(), 55);
}

#[tokio::test]
async fn start_rejection_carries_the_backend_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/assessments/7/start");
        then.status(400)
            .json_body(json!({"message": "Assessment already taken this quarter"}));
    });

    let err = backend_for(&server)
        .start_attempt(AssessmentId::new(7))
        .await
        .unwrap_err();
    assert!(
        matches!(err, ApiError::Rejected { message } if message == "Assessment already taken this quarter")
    );
}

#[tokio::test]
async fn rejection_without_a_body_falls_back_to_a_generic_message() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/assessments/7/start");
        then.status(500);
    });

    let err = backend_for(&server)
        .start_attempt(AssessmentId::new(7))
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected { message } => assert!(message.contains("500")),
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn submit_posts_the_answer_map_and_decodes_the_result() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/assessments/7/submit")
            .json_body(json!({
                "answers": {
                    "1": {"selectedOptionId": 12, "textAnswer": null},
                    "2": {"selectedOptionId": null, "textAnswer": "rotate credentials"}
                }
            }));
        then.status(200).json_body(json!({
            "score": 85,
            "correctAnswers": 17,
            "totalQuestions": 20,
            "timeTakenMinutes": 12,
            "passed": true
        }));
    });

    let mut sheet = AnswerSheet::new();
    sheet.record(QuestionId::new(1), Answer::Selected(OptionId::new(12)));
    sheet.record(QuestionId::new(2), Answer::Text("rotate credentials".into()));

    let result = backend_for(&server)
        .submit_attempt(AssessmentId::new(7), &sheet)
        .await
        .unwrap();

    mock.assert();
    assert_eq!(result.score, 85);
    assert_eq!(result.correct_answers, 17);
    assert_eq!(result.total_questions, 20);
    assert_eq!(result.time_taken_minutes, 12);
    assert!(result.passed);
}

#[tokio::test]
async fn bearer_token_is_attached_when_configured() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/assessments")
            .header("authorization", "Bearer sekrit");
        then.status(200).json_body(json!([]));
    });

    let backend = HttpBackend::new(
        BackendConfig::new(server.base_url()).with_bearer_token("sekrit"),
    );
    let summaries = backend.list_assessments().await.unwrap();

    mock.assert();
    assert!(summaries.is_empty());
}
