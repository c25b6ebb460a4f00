//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use lingualisten_core::domain::{ContactMethod, NewAssessment, NewQuestion, NewTopic};
use lingualisten_core::flow::quiz::{score_answers, SubmittedAnswer};
use lingualisten_core::ports::{
    ContentGenerationService, PortError, StorageService, TextToSpeechService,
};
use lingualisten_core::report::build_report;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

/// Prompt length bounds, in characters, checked before any external call.
pub const MIN_PROMPT_CHARS: usize = 3;
pub const MAX_PROMPT_CHARS: usize = 500;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        contact_methods_handler,
        generate_content_handler,
        process_voice_handler,
        submit_answers_handler,
        share_results_handler,
    ),
    components(
        schemas(
            HealthResponse,
            ContactMethodsResponse,
            GenerateContentRequest,
            GenerateContentResponse,
            QuestionPayload,
            ProcessVoiceRequest,
            ProcessVoiceResponse,
            SubmitAnswersRequest,
            AnswerPayload,
            SubmitAnswersResponse,
            AnswerResultPayload,
            ShareResultsRequest,
            ShareResultsResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "LinguaListen API", description = "API endpoints for the listen-then-quiz language practice flow.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Which contact methods currently have a configured provider.
#[derive(Serialize, ToSchema)]
pub struct ContactMethodsResponse {
    pub email: bool,
    pub sms: bool,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub prompt: String,
    pub user_name: String,
}

/// The generated topic. The answer key is deliberately absent: scoring is
/// server-authoritative and happens on submission.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub topic_id: i64,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    pub audio_url: String,
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuestionPayload {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct ProcessVoiceRequest {
    pub text: String,
}

#[derive(Serialize, ToSchema)]
pub struct ProcessVoiceResponse {
    pub text: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersRequest {
    pub topic_id: i64,
    pub user_name: String,
    pub answers: Vec<AnswerPayload>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPayload {
    pub question_id: i64,
    pub selected_option: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersResponse {
    pub assessment_id: i64,
    pub user_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerResultPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResultPayload {
    pub question_id: i64,
    pub selected_option: usize,
    pub is_correct: bool,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShareResultsRequest {
    pub assessment_id: i64,
    pub contact_method: String,
    pub contact_info: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResultsResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

type HandlerError = (StatusCode, Json<ErrorBody>);

fn validation_error(message: impl Into<String>) -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

/// Maps the core error taxonomy onto HTTP status codes.
fn port_error_response(err: PortError) -> HandlerError {
    let status = match &err {
        PortError::Validation(_) => StatusCode::BAD_REQUEST,
        PortError::NotFound(_) => StatusCode::NOT_FOUND,
        PortError::External(_) | PortError::RateLimited(_) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        error!("Port operation failed: {}", err);
    }
    (
        status,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Report which sharing channels are currently available.
///
/// Used only to adjust the UI options; never gates scoring.
#[utoipa::path(
    get,
    path = "/contact-methods",
    responses((status = 200, description = "Channel availability", body = ContactMethodsResponse))
)]
pub async fn contact_methods_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<ContactMethodsResponse> {
    Json(ContactMethodsResponse {
        email: app_state.sharing.is_available(ContactMethod::Email),
        sms: app_state.sharing.is_available(ContactMethod::Sms),
    })
}

/// Generate English content and Spanish questions for a topic prompt.
///
/// Validates the prompt before any external call, then runs the LLM,
/// synthesizes (or reuses cached) audio, and persists the topic with its
/// question batch. The response withholds the answer key.
#[utoipa::path(
    post,
    path = "/generate-content",
    request_body = GenerateContentRequest,
    responses(
        (status = 200, description = "Content generated", body = GenerateContentResponse),
        (status = 400, description = "Invalid prompt or user name", body = ErrorBody),
        (status = 502, description = "Content generator or TTS failure", body = ErrorBody)
    )
)]
pub async fn generate_content_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<GenerateContentRequest>,
) -> Result<Json<GenerateContentResponse>, HandlerError> {
    let prompt = payload.prompt.trim();
    let prompt_chars = prompt.chars().count();
    if prompt_chars < MIN_PROMPT_CHARS || prompt_chars > MAX_PROMPT_CHARS {
        return Err(validation_error(format!(
            "The prompt must be between {} and {} characters",
            MIN_PROMPT_CHARS, MAX_PROMPT_CHARS
        )));
    }
    if payload.user_name.trim().is_empty() {
        return Err(validation_error("A user name is required"));
    }

    let generated = app_state
        .content
        .generate(prompt)
        .await
        .map_err(port_error_response)?;

    // Reuse cached audio for identical content; synthesize otherwise.
    let audio_url = if app_state.audio.contains(&generated.english_content).await {
        app_state.audio.url_for(&generated.english_content)
    } else {
        let bytes = app_state
            .tts
            .synthesize(&generated.english_content)
            .await
            .map_err(port_error_response)?;
        app_state
            .audio
            .save(&generated.english_content, &bytes)
            .await
            .map_err(|e| {
                error!("Failed to store synthesized audio: {}", e);
                port_error_response(PortError::External("Failed to store audio".to_string()))
            })?
    };

    let topic = app_state
        .store
        .create_topic(NewTopic {
            prompt: prompt.to_string(),
            content: generated.english_content.clone(),
            phonetic: generated.phonetic.clone(),
            audio_url,
        })
        .await
        .map_err(port_error_response)?;

    let mut questions = Vec::with_capacity(generated.spanish_questions.len());
    for generated_question in generated.spanish_questions {
        let question = app_state
            .store
            .create_question(NewQuestion {
                topic_id: topic.id,
                question: generated_question.question,
                options: generated_question.options,
                correct_option: generated_question.correct_option_index,
            })
            .await
            .map_err(port_error_response)?;
        questions.push(QuestionPayload {
            id: question.id,
            question: question.question,
            options: question.options,
        });
    }

    Ok(Json(GenerateContentResponse {
        topic_id: topic.id,
        content: topic.content,
        phonetic: topic.phonetic,
        audio_url: topic.audio_url,
        questions,
    }))
}

/// Translate transcribed Spanish speech to English.
#[utoipa::path(
    post,
    path = "/process-voice",
    request_body = ProcessVoiceRequest,
    responses(
        (status = 200, description = "Translated text", body = ProcessVoiceResponse),
        (status = 400, description = "Empty input", body = ErrorBody),
        (status = 502, description = "Translator failure", body = ErrorBody)
    )
)]
pub async fn process_voice_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ProcessVoiceRequest>,
) -> Result<Json<ProcessVoiceResponse>, HandlerError> {
    if payload.text.trim().is_empty() {
        return Err(validation_error("Text to translate must not be empty"));
    }

    let translated = app_state
        .content
        .translate(payload.text.trim())
        .await
        .map_err(port_error_response)?;
    Ok(Json(ProcessVoiceResponse { text: translated }))
}

/// Score a completed attempt and create its assessment.
///
/// Scoring is all-or-nothing: a count mismatch or an unknown question id
/// rejects the whole submission and no assessment is created.
#[utoipa::path(
    post,
    path = "/submit-answers",
    request_body = SubmitAnswersRequest,
    responses(
        (status = 200, description = "Attempt scored", body = SubmitAnswersResponse),
        (status = 400, description = "Answer count mismatch or invalid option", body = ErrorBody),
        (status = 404, description = "Unknown topic or question", body = ErrorBody)
    )
)]
pub async fn submit_answers_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SubmitAnswersRequest>,
) -> Result<Json<SubmitAnswersResponse>, HandlerError> {
    let (_, questions) = app_state
        .store
        .topic_with_questions(payload.topic_id)
        .await
        .map_err(port_error_response)?;

    let submitted: Vec<SubmittedAnswer> = payload
        .answers
        .iter()
        .map(|a| SubmittedAnswer {
            question_id: a.question_id,
            selected_option: a.selected_option,
        })
        .collect();

    let scored = score_answers(&questions, &submitted).map_err(port_error_response)?;

    let assessment = app_state
        .store
        .create_assessment(NewAssessment {
            topic_id: payload.topic_id,
            user_name: payload.user_name,
            score: scored.score,
            total_questions: questions.len() as u32,
            answers: scored.answers,
            contact_info: None,
            contact_method: None,
        })
        .await
        .map_err(port_error_response)?;

    Ok(Json(SubmitAnswersResponse {
        assessment_id: assessment.id,
        user_name: assessment.user_name,
        score: assessment.score,
        total_questions: assessment.total_questions,
        answers: assessment
            .answers
            .into_iter()
            .map(|a| AnswerResultPayload {
                question_id: a.question_id,
                selected_option: a.selected_option,
                is_correct: a.is_correct,
            })
            .collect(),
    }))
}

/// Send an assessment's results summary over email or SMS.
///
/// A provider failure is reported to the caller without retrying and
/// without touching the assessment, which stays re-shareable.
#[utoipa::path(
    post,
    path = "/share-results",
    request_body = ShareResultsRequest,
    responses(
        (status = 200, description = "Results dispatched", body = ShareResultsResponse),
        (status = 400, description = "Unknown method, unavailable channel or empty contact info", body = ErrorBody),
        (status = 404, description = "Unknown assessment", body = ErrorBody),
        (status = 502, description = "Provider failure", body = ErrorBody)
    )
)]
pub async fn share_results_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ShareResultsRequest>,
) -> Result<Json<ShareResultsResponse>, HandlerError> {
    let method: ContactMethod = payload
        .contact_method
        .parse()
        .map_err(|e: String| validation_error(e))?;

    let assessment = app_state
        .store
        .get_assessment(payload.assessment_id)
        .await
        .map_err(port_error_response)?;
    let (topic, questions) = app_state
        .store
        .topic_with_questions(assessment.topic_id)
        .await
        .map_err(port_error_response)?;

    let report = build_report(&assessment, &topic.prompt, &questions);
    app_state
        .sharing
        .share(&report, method, &payload.contact_info)
        .await
        .map_err(port_error_response)?;

    Ok(Json(ShareResultsResponse {
        success: true,
        message: format!("Resultados enviados por {}", method),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FileAudioStore, MemoryStore};
    use crate::config::Config;
    use async_trait::async_trait;
    use lingualisten_core::domain::{GeneratedContent, GeneratedQuestion};
    use lingualisten_core::ports::{DeliveryChannel, PortResult};
    use lingualisten_core::report::ResultsReport;
    use lingualisten_core::sharing::ShareDispatcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubContent {
        calls: AtomicUsize,
    }

    impl StubContent {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ContentGenerationService for StubContent {
        async fn generate(&self, _prompt: &str) -> PortResult<GeneratedContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // Answer key [1, 0, 2, 1, 3].
            let questions = [1usize, 0, 2, 1, 3]
                .iter()
                .enumerate()
                .map(|(i, &correct)| GeneratedQuestion {
                    question: format!("Pregunta {}", i + 1),
                    options: vec![
                        format!("Opción A de {}", i + 1),
                        format!("Opción B de {}", i + 1),
                        format!("Opción C de {}", i + 1),
                        format!("Opción D de {}", i + 1),
                    ],
                    correct_option_index: correct,
                })
                .collect();
            Ok(GeneratedContent {
                english_content: "Put on your safety glasses before starting work.".to_string(),
                spanish_questions: questions,
                phonetic: Some("put on yor sefti glases".to_string()),
            })
        }

        async fn translate(&self, text: &str) -> PortResult<String> {
            Ok(format!("translated: {}", text))
        }
    }

    struct StubTts;

    #[async_trait]
    impl TextToSpeechService for StubTts {
        async fn synthesize(&self, _text: &str) -> PortResult<Vec<u8>> {
            Ok(vec![0u8; 8])
        }
    }

    struct StubChannel {
        method: ContactMethod,
        available: bool,
        fail: bool,
        deliveries: AtomicUsize,
    }

    impl StubChannel {
        fn new(method: ContactMethod, available: bool, fail: bool) -> Arc<Self> {
            Arc::new(Self {
                method,
                available,
                fail,
                deliveries: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DeliveryChannel for StubChannel {
        fn method(&self) -> ContactMethod {
            self.method
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn deliver(&self, _report: &ResultsReport, _contact_info: &str) -> PortResult<()> {
            self.deliveries.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(PortError::External("provider down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn test_config() -> Config {
        Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            allowed_origin: "http://localhost:5173".to_string(),
            openai_api_key: None,
            content_model: "gpt-4o".to_string(),
            tts_voice: "alloy".to_string(),
            audio_dir: std::env::temp_dir().join(format!(
                "lingualisten-rest-test-{}",
                std::process::id()
            )),
            email: None,
            sms: None,
        }
    }

    fn test_state(
        content: Arc<StubContent>,
        channels: Vec<Arc<dyn DeliveryChannel>>,
    ) -> Arc<AppState> {
        let config = Arc::new(test_config());
        Arc::new(AppState {
            store: Arc::new(MemoryStore::new()),
            content,
            tts: Arc::new(StubTts),
            audio: Arc::new(FileAudioStore::new(config.audio_dir.clone())),
            sharing: Arc::new(ShareDispatcher::new(channels)),
            config,
        })
    }

    async fn generate(state: &Arc<AppState>) -> GenerateContentResponse {
        generate_content_handler(
            State(state.clone()),
            Json(GenerateContentRequest {
                prompt: "el trabajo de jardinería".to_string(),
                user_name: "María".to_string(),
            }),
        )
        .await
        .expect("generation should succeed")
        .0
    }

    #[tokio::test]
    async fn short_prompt_is_rejected_before_any_external_call() {
        let content = StubContent::new();
        let state = test_state(content.clone(), vec![]);

        let err = generate_content_handler(
            State(state),
            Json(GenerateContentRequest {
                prompt: "el".to_string(),
                user_name: "María".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(content.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_user_name_is_rejected() {
        let content = StubContent::new();
        let state = test_state(content.clone(), vec![]);

        let err = generate_content_handler(
            State(state),
            Json(GenerateContentRequest {
                prompt: "un tema válido".to_string(),
                user_name: "   ".to_string(),
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(content.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generated_response_withholds_the_answer_key() {
        let state = test_state(StubContent::new(), vec![]);
        let response = generate(&state).await;

        assert_eq!(response.questions.len(), 5);
        assert!(response.audio_url.starts_with("/audio/"));
        let as_json = serde_json::to_string(&response).unwrap();
        assert!(!as_json.contains("correct"));
    }

    #[tokio::test]
    async fn scoring_matches_the_key_and_creates_one_assessment() {
        let state = test_state(StubContent::new(), vec![]);
        let generated = generate(&state).await;

        let answers: Vec<AnswerPayload> = generated
            .questions
            .iter()
            .zip([1usize, 0, 2, 0, 3])
            .map(|(q, pick)| AnswerPayload {
                question_id: q.id,
                selected_option: pick,
            })
            .collect();

        let response = submit_answers_handler(
            State(state.clone()),
            Json(SubmitAnswersRequest {
                topic_id: generated.topic_id,
                user_name: "María".to_string(),
                answers,
            }),
        )
        .await
        .unwrap()
        .0;

        assert_eq!(response.score, 4);
        assert_eq!(response.total_questions, 5);
        assert!(!response.answers[3].is_correct);
        assert!(response.answers.iter().enumerate().all(|(i, a)| i == 3 || a.is_correct));

        let stored = state.store.get_assessment(response.assessment_id).await.unwrap();
        assert_eq!(stored.score, 4);
    }

    #[tokio::test]
    async fn incomplete_answer_set_is_rejected_with_no_assessment() {
        let state = test_state(StubContent::new(), vec![]);
        let generated = generate(&state).await;

        let err = submit_answers_handler(
            State(state.clone()),
            Json(SubmitAnswersRequest {
                topic_id: generated.topic_id,
                user_name: "María".to_string(),
                answers: vec![AnswerPayload {
                    question_id: generated.questions[0].id,
                    selected_option: 0,
                }],
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(state.store.get_assessment(1).await.is_err());
    }

    #[tokio::test]
    async fn unknown_topic_is_a_404() {
        let state = test_state(StubContent::new(), vec![]);
        let err = submit_answers_handler(
            State(state),
            Json(SubmitAnswersRequest {
                topic_id: 42,
                user_name: "María".to_string(),
                answers: vec![],
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_question_id_aborts_scoring() {
        let state = test_state(StubContent::new(), vec![]);
        let generated = generate(&state).await;

        let mut answers: Vec<AnswerPayload> = generated
            .questions
            .iter()
            .map(|q| AnswerPayload {
                question_id: q.id,
                selected_option: 0,
            })
            .collect();
        answers[4].question_id = 999;

        let err = submit_answers_handler(
            State(state),
            Json(SubmitAnswersRequest {
                topic_id: generated.topic_id,
                user_name: "María".to_string(),
                answers,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sharing_survives_an_unavailable_channel_and_works_over_another() {
        let email = StubChannel::new(ContactMethod::Email, true, false);
        let sms = StubChannel::new(ContactMethod::Sms, false, false);
        let state = test_state(StubContent::new(), vec![email.clone(), sms.clone()]);

        let generated = generate(&state).await;
        let answers: Vec<AnswerPayload> = generated
            .questions
            .iter()
            .map(|q| AnswerPayload {
                question_id: q.id,
                selected_option: 0,
            })
            .collect();
        let submitted = submit_answers_handler(
            State(state.clone()),
            Json(SubmitAnswersRequest {
                topic_id: generated.topic_id,
                user_name: "María".to_string(),
                answers,
            }),
        )
        .await
        .unwrap()
        .0;

        // SMS is unavailable: the share fails but nothing crashes.
        let err = share_results_handler(
            State(state.clone()),
            Json(ShareResultsRequest {
                assessment_id: submitted.assessment_id,
                contact_method: "sms".to_string(),
                contact_info: "+15551234567".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(sms.deliveries.load(Ordering::SeqCst), 0);

        // The assessment is still there and shareable via email.
        let shared = share_results_handler(
            State(state),
            Json(ShareResultsRequest {
                assessment_id: submitted.assessment_id,
                contact_method: "email".to_string(),
                contact_info: "maria@example.com".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;
        assert!(shared.success);
        assert_eq!(email.deliveries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_contact_method_is_rejected() {
        let state = test_state(StubContent::new(), vec![]);
        let err = share_results_handler(
            State(state),
            Json(ShareResultsRequest {
                assessment_id: 1,
                contact_method: "carrier-pigeon".to_string(),
                contact_info: "coop 7".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn contact_methods_reflect_channel_availability() {
        let email = StubChannel::new(ContactMethod::Email, true, false);
        let state = test_state(StubContent::new(), vec![email]);

        let response = contact_methods_handler(State(state)).await.0;
        assert!(response.email);
        assert!(!response.sms);
    }

    #[tokio::test]
    async fn voice_text_is_translated() {
        let state = test_state(StubContent::new(), vec![]);
        let response = process_voice_handler(
            State(state),
            Json(ProcessVoiceRequest {
                text: "¿Dónde están las bolsas?".to_string(),
            }),
        )
        .await
        .unwrap()
        .0;
        assert_eq!(response.text, "translated: ¿Dónde están las bolsas?");
    }
}
