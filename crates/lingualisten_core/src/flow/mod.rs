//! The multi-step listen-then-quiz flow: step tracking, the listening
//! gate, and the quiz state machine with its scorer.

pub mod listening;
pub mod quiz;
pub mod steps;

pub use listening::{ListeningGate, UnlockPolicy, DEFAULT_FALLBACK_DELAY};
pub use quiz::{
    score_answers, shuffle_options, AdvanceOutcome, QuizFlow, QuizState, ScoredAttempt,
    SelectOutcome, SubmittedAnswer,
};
pub use steps::StepTracker;
