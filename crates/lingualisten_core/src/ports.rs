//! crates/lingualisten_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like stores or APIs.

use crate::domain::{
    Assessment, ContactMethod, GeneratedContent, NewAssessment, NewQuestion, NewTopic, Question,
    Topic,
};
use crate::report::ResultsReport;
use async_trait::async_trait;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// This is the whole error taxonomy of the core: malformed input, a missing
/// record, or a failing external collaborator. Rate-limit failures get their
/// own variant so the content-generation boundary can retry them once.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("External service error: {0}")]
    External(String),
    #[error("External service rate limited: {0}")]
    RateLimited(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The append-only store for topics, questions and assessments.
///
/// Ids are monotonically increasing integers allocated by the store;
/// concurrent creates must never collide on id allocation.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- Topic Management ---
    async fn create_topic(&self, new_topic: NewTopic) -> PortResult<Topic>;

    async fn get_topic(&self, topic_id: i64) -> PortResult<Topic>;

    async fn topic_with_questions(&self, topic_id: i64) -> PortResult<(Topic, Vec<Question>)>;

    // --- Question Management ---
    async fn create_question(&self, new_question: NewQuestion) -> PortResult<Question>;

    async fn questions_for_topic(&self, topic_id: i64) -> PortResult<Vec<Question>>;

    // --- Assessment Management ---
    async fn create_assessment(&self, new_assessment: NewAssessment) -> PortResult<Assessment>;

    async fn get_assessment(&self, assessment_id: i64) -> PortResult<Assessment>;
}

/// The LLM collaborator that turns a Spanish topic prompt into English
/// practice content plus localized comprehension questions.
#[async_trait]
pub trait ContentGenerationService: Send + Sync {
    /// Generates English content and Spanish questions for a topic prompt.
    ///
    /// Implementations must validate the model's output shape and return a
    /// typed failure for malformed payloads, never an assumed-shape cast.
    async fn generate(&self, prompt: &str) -> PortResult<GeneratedContent>;

    /// Translates free-form Spanish text to natural-sounding English.
    async fn translate(&self, text: &str) -> PortResult<String>;
}

#[async_trait]
pub trait TextToSpeechService: Send + Sync {
    /// Generates audio data from a string of text.
    async fn synthesize(&self, text: &str) -> PortResult<Vec<u8>>;
}

/// One channel (email or SMS) capable of delivering a results summary.
///
/// Availability is reported by the provider, not decided by the caller;
/// an unconfigured provider simply reports itself unavailable.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    fn method(&self) -> ContactMethod;

    fn is_available(&self) -> bool;

    /// Makes exactly one delivery attempt. No retry, no backoff.
    async fn deliver(&self, report: &ResultsReport, contact_info: &str) -> PortResult<()>;
}
