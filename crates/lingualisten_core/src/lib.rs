pub mod domain;
pub mod flow;
pub mod ports;
pub mod report;
pub mod sharing;

pub use domain::{
    AnswerRecord, Assessment, ContactMethod, GeneratedContent, GeneratedQuestion, NewAssessment,
    NewQuestion, NewTopic, Question, Topic, OPTIONS_PER_QUESTION, QUESTIONS_PER_TOPIC,
};
pub use flow::{ListeningGate, QuizFlow, StepTracker, SubmittedAnswer, UnlockPolicy};
pub use ports::{
    ContentGenerationService, DeliveryChannel, PortError, PortResult, StorageService,
    TextToSpeechService,
};
pub use report::{build_report, ResultsReport};
pub use sharing::ShareDispatcher;
