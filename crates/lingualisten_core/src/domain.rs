//! crates/lingualisten_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The number of comprehension questions generated per topic.
pub const QUESTIONS_PER_TOPIC: usize = 5;

/// The number of answer options per question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// One content-generation request's result: the English practice content
/// and a reference to its synthesized audio.
#[derive(Debug, Clone)]
pub struct Topic {
    pub id: i64,
    pub prompt: String,
    pub content: String,
    /// Spanish-alphabet phonetic transcription of the English content,
    /// when the generator provides one.
    pub phonetic: Option<String>,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
}

/// The insert shape for a [`Topic`]; the store allocates the id.
#[derive(Debug, Clone)]
pub struct NewTopic {
    pub prompt: String,
    pub content: String,
    pub phonetic: Option<String>,
    pub audio_url: String,
}

/// One comprehension-check item tied to a topic.
///
/// `correct_option` is the answer key. It must never leave the server
/// before the attempt is submitted.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub topic_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

/// The insert shape for a [`Question`].
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub topic_id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_option: usize,
}

/// One user response to one question within an assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub selected_option: usize,
    pub is_correct: bool,
}

/// The scored outcome of one completed quiz attempt.
///
/// Created exactly once, when every question of an attempt has been
/// answered and submitted. Immutable afterwards apart from the optional
/// sharing metadata.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub id: i64,
    pub topic_id: i64,
    pub user_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub contact_info: Option<String>,
    pub contact_method: Option<ContactMethod>,
    pub created_at: DateTime<Utc>,
}

/// The insert shape for an [`Assessment`].
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub topic_id: i64,
    pub user_name: String,
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<AnswerRecord>,
    pub contact_info: Option<String>,
    pub contact_method: Option<ContactMethod>,
}

/// The channel used to deliver a results summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactMethod {
    Email,
    Sms,
}

impl ContactMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactMethod::Email => "email",
            ContactMethod::Sms => "sms",
        }
    }
}

impl fmt::Display for ContactMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(ContactMethod::Email),
            "sms" => Ok(ContactMethod::Sms),
            other => Err(format!("'{}' is not a supported contact method", other)),
        }
    }
}

/// The validated output of one content-generation call.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub english_content: String,
    pub spanish_questions: Vec<GeneratedQuestion>,
    pub phonetic: Option<String>,
}

/// One generated question, before it is persisted and given an id.
#[derive(Debug, Clone)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
}
