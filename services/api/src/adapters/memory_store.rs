//! services/api/src/adapters/memory_store.rs
//!
//! The in-memory storage adapter, the concrete implementation of the
//! `StorageService` port. Three append-only maps keyed by sequential ids,
//! behind a single lock so id allocation and insertion are atomic.
//!
//! Constructed explicitly at process start and injected into the handlers;
//! tests instantiate isolated instances.

use async_trait::async_trait;
use chrono::Utc;
use lingualisten_core::domain::{
    Assessment, NewAssessment, NewQuestion, NewTopic, Question, Topic,
};
use lingualisten_core::ports::{PortError, PortResult, StorageService};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreInner {
    topics: HashMap<i64, Topic>,
    questions: HashMap<i64, Question>,
    assessments: HashMap<i64, Assessment>,
    next_topic_id: i64,
    next_question_id: i64,
    next_assessment_id: i64,
}

/// An in-memory adapter that implements the `StorageService` port.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`. Ids start at 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                next_topic_id: 1,
                next_question_id: 1,
                next_assessment_id: 1,
                ..StoreInner::default()
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageService for MemoryStore {
    async fn create_topic(&self, new_topic: NewTopic) -> PortResult<Topic> {
        let mut inner = self.inner.write().await;
        let id = inner.next_topic_id;
        inner.next_topic_id += 1;

        let topic = Topic {
            id,
            prompt: new_topic.prompt,
            content: new_topic.content,
            phonetic: new_topic.phonetic,
            audio_url: new_topic.audio_url,
            created_at: Utc::now(),
        };
        inner.topics.insert(id, topic.clone());
        Ok(topic)
    }

    async fn get_topic(&self, topic_id: i64) -> PortResult<Topic> {
        let inner = self.inner.read().await;
        inner
            .topics
            .get(&topic_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Topic {} not found", topic_id)))
    }

    async fn topic_with_questions(&self, topic_id: i64) -> PortResult<(Topic, Vec<Question>)> {
        let inner = self.inner.read().await;
        let topic = inner
            .topics
            .get(&topic_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Topic {} not found", topic_id)))?;

        let mut questions: Vec<Question> = inner
            .questions
            .values()
            .filter(|q| q.topic_id == topic_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.id);
        Ok((topic, questions))
    }

    async fn create_question(&self, new_question: NewQuestion) -> PortResult<Question> {
        let mut inner = self.inner.write().await;
        if !inner.topics.contains_key(&new_question.topic_id) {
            return Err(PortError::NotFound(format!(
                "Topic {} not found",
                new_question.topic_id
            )));
        }

        let id = inner.next_question_id;
        inner.next_question_id += 1;

        let question = Question {
            id,
            topic_id: new_question.topic_id,
            question: new_question.question,
            options: new_question.options,
            correct_option: new_question.correct_option,
        };
        inner.questions.insert(id, question.clone());
        Ok(question)
    }

    async fn questions_for_topic(&self, topic_id: i64) -> PortResult<Vec<Question>> {
        let inner = self.inner.read().await;
        let mut questions: Vec<Question> = inner
            .questions
            .values()
            .filter(|q| q.topic_id == topic_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.id);
        Ok(questions)
    }

    async fn create_assessment(&self, new_assessment: NewAssessment) -> PortResult<Assessment> {
        let mut inner = self.inner.write().await;
        if !inner.topics.contains_key(&new_assessment.topic_id) {
            return Err(PortError::NotFound(format!(
                "Topic {} not found",
                new_assessment.topic_id
            )));
        }

        let id = inner.next_assessment_id;
        inner.next_assessment_id += 1;

        let assessment = Assessment {
            id,
            topic_id: new_assessment.topic_id,
            user_name: new_assessment.user_name,
            score: new_assessment.score,
            total_questions: new_assessment.total_questions,
            answers: new_assessment.answers,
            contact_info: new_assessment.contact_info,
            contact_method: new_assessment.contact_method,
            created_at: Utc::now(),
        };
        inner.assessments.insert(id, assessment.clone());
        Ok(assessment)
    }

    async fn get_assessment(&self, assessment_id: i64) -> PortResult<Assessment> {
        let inner = self.inner.read().await;
        inner
            .assessments
            .get(&assessment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Assessment {} not found", assessment_id)))
    }
}
