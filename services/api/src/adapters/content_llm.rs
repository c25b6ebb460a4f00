//! services/api/src/adapters/content_llm.rs
//!
//! This module contains the adapter for the content-generating LLM.
//! It implements the `ContentGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, ResponseFormat,
    },
    Client,
};
use async_trait::async_trait;
use lingualisten_core::domain::{
    GeneratedContent, GeneratedQuestion, OPTIONS_PER_QUESTION, QUESTIONS_PER_TOPIC,
};
use lingualisten_core::ports::{ContentGenerationService, PortError, PortResult};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// The fixed delay before the single rate-limit retry.
const RETRY_DELAY: Duration = Duration::from_secs(2);

const GENERATION_INSTRUCTIONS: &str = r#"You are helping adult Spanish-speaking learners improve their English. They need practical, everyday vocabulary.

Given a topic request in Spanish, respond with a JSON object containing:

1. "englishContent": 5-7 short, practical English statements about the topic. Use simple, everyday vocabulary, common phrases from daily life, and clear natural language. Each statement is 1-2 sentences at most.

2. "spanishQuestions": Exactly 5 comprehension exercises. Each presents one English sentence from the content above ("question") followed by exactly 4 Spanish translation options ("options") where only one is correct ("correctOptionIndex", zero-based). This tests ENGLISH comprehension, not Spanish grammar: all four Spanish options must be grammatically correct, and the wrong options should reflect plausible misunderstandings of the English (confused key words, misheard similar sounds, mixed-up prepositions or tenses). Vary the correct index across questions.

3. "spanishPhoneticTranscription": A phonetic transcription of the English content using Spanish alphabet letters, to help Spanish speakers pronounce the English words.

Use clear, simple Spanish throughout. Respond only with valid JSON."#;

const TRANSLATION_INSTRUCTIONS: &str =
    "You are a Spanish to English translator. Translate the Spanish text to natural-sounding English suitable for everyday communication. Respond with the translation only.";

//=========================================================================================
// Raw Response Shape
//=========================================================================================

// The wire shape the model is asked to produce. Parsed strictly; anything
// that does not fit becomes a typed failure rather than an assumed cast.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGeneratedContent {
    english_content: String,
    spanish_questions: Vec<RawQuestion>,
    spanish_phonetic_transcription: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    question: String,
    options: Vec<String>,
    correct_option_index: usize,
}

fn validate(raw: RawGeneratedContent) -> PortResult<GeneratedContent> {
    if raw.english_content.trim().is_empty() {
        return Err(PortError::External(
            "Content generator returned empty English content".to_string(),
        ));
    }
    if raw.spanish_questions.len() != QUESTIONS_PER_TOPIC {
        return Err(PortError::External(format!(
            "Expected {} questions, got {}",
            QUESTIONS_PER_TOPIC,
            raw.spanish_questions.len()
        )));
    }

    let mut questions = Vec::with_capacity(raw.spanish_questions.len());
    for q in raw.spanish_questions {
        if q.options.len() != OPTIONS_PER_QUESTION {
            return Err(PortError::External(format!(
                "Expected {} options per question, got {}",
                OPTIONS_PER_QUESTION,
                q.options.len()
            )));
        }
        if q.correct_option_index >= q.options.len() {
            return Err(PortError::External(format!(
                "Correct option index {} is out of range",
                q.correct_option_index
            )));
        }
        questions.push(GeneratedQuestion {
            question: q.question,
            options: q.options,
            correct_option_index: q.correct_option_index,
        });
    }

    Ok(GeneratedContent {
        english_content: raw.english_content,
        spanish_questions: questions,
        phonetic: raw.spanish_phonetic_transcription,
    })
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentGenerationService` using an
/// OpenAI-compatible LLM in JSON mode.
#[derive(Clone)]
pub struct OpenAiContentAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiContentAdapter {
    /// Creates a new `OpenAiContentAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn map_openai_error(e: OpenAIError) -> PortError {
        if let OpenAIError::ApiError(ref api) = e {
            let rate_limited = api.code.as_deref() == Some("rate_limit_exceeded")
                || api.r#type.as_deref() == Some("rate_limit_error");
            if rate_limited {
                return PortError::RateLimited(api.message.clone());
            }
        }
        PortError::External(e.to_string())
    }

    async fn chat(&self, instructions: &str, user_input: &str, json_mode: bool) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instructions)
                .build()
                .map_err(|e| PortError::External(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::External(e.to_string()))?
                .into(),
        ];

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&self.model).messages(messages).n(1);
        if json_mode {
            builder.response_format(ResponseFormat::JsonObject);
        }
        let request = builder
            .build()
            .map_err(|e| PortError::External(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(Self::map_openai_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::External("Content LLM response contained no text content".to_string())
            })
    }

    async fn generate_once(&self, prompt: &str) -> PortResult<GeneratedContent> {
        let user_input = format!("Por favor, genera contenido en inglés sobre: {}", prompt);
        let body = self.chat(GENERATION_INSTRUCTIONS, &user_input, true).await?;

        let raw: RawGeneratedContent = serde_json::from_str(&body).map_err(|e| {
            PortError::External(format!("Content generator returned invalid JSON: {}", e))
        })?;
        validate(raw)
    }
}

//=========================================================================================
// `ContentGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentGenerationService for OpenAiContentAdapter {
    /// Generates English content plus Spanish comprehension questions.
    ///
    /// A rate-limited call gets exactly one automatic retry after a fixed
    /// short delay; any further failure is surfaced to the caller.
    async fn generate(&self, prompt: &str) -> PortResult<GeneratedContent> {
        match self.generate_once(prompt).await {
            Err(PortError::RateLimited(message)) => {
                warn!("Content generation rate limited, retrying once: {}", message);
                tokio::time::sleep(RETRY_DELAY).await;
                self.generate_once(prompt).await
            }
            other => other,
        }
    }

    async fn translate(&self, text: &str) -> PortResult<String> {
        let body = self.chat(TRANSLATION_INSTRUCTIONS, text, false).await?;
        Ok(body.trim().to_string())
    }
}
