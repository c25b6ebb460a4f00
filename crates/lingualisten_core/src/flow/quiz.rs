//! crates/lingualisten_core/src/flow/quiz.rs
//!
//! The quiz state machine and the batch scorer.
//!
//! Per question the state is `Unanswered → Revealed`, terminal for the
//! attempt. The quiz as a whole is `InProgress → Completed`. Scoring is
//! all-or-nothing: a single unknown question id aborts the whole batch.

use crate::domain::{AnswerRecord, Question};
use crate::ports::{PortError, PortResult};
use rand::seq::SliceRandom;
use rand::Rng;

//=========================================================================================
// Sequential Quiz Controller
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Unanswered,
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress,
    Completed,
}

/// The result of a selection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The choice was locked in and the answer revealed.
    Revealed { is_correct: bool },
    /// The current question was already revealed; nothing changed.
    /// Duplicate UI events land here instead of erroring.
    AlreadyRevealed,
    /// The question is not the current one; nothing changed.
    NotCurrent,
}

/// What happened on [`QuizFlow::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved to the question at this index, back in `Unanswered` state.
    NextQuestion(usize),
    /// The last question was revealed; the attempt is complete.
    Completed,
}

/// Walks one attempt through its questions, one at a time.
#[derive(Debug, Clone)]
pub struct QuizFlow {
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    state: QuizState,
}

impl QuizFlow {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            answers: Vec::new(),
            state: QuizState::InProgress,
        }
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            QuizState::InProgress => self.questions.get(self.current_index),
            QuizState::Completed => None,
        }
    }

    pub fn current_question_state(&self) -> QuestionState {
        let answered = self
            .current_question()
            .map(|q| self.answers.iter().any(|a| a.question_id == q.id))
            .unwrap_or(false);
        if answered {
            QuestionState::Revealed
        } else {
            QuestionState::Unanswered
        }
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn score(&self) -> u32 {
        self.answers.iter().filter(|a| a.is_correct).count() as u32
    }

    /// Locks in a choice for the current question and reveals the answer.
    ///
    /// Only valid while the current question is `Unanswered`; once revealed
    /// the stored record never changes within the attempt. Selecting again,
    /// or selecting for a question that is not current, is a no-op.
    pub fn select_option(&mut self, question_id: i64, option_index: usize) -> PortResult<SelectOutcome> {
        let question = match self.current_question() {
            Some(q) => q,
            None => return Ok(SelectOutcome::NotCurrent),
        };
        if question.id != question_id {
            return Ok(SelectOutcome::NotCurrent);
        }
        if option_index >= question.options.len() {
            return Err(PortError::Validation(format!(
                "Option index {} is out of range for question {}",
                option_index, question_id
            )));
        }
        if self.current_question_state() == QuestionState::Revealed {
            return Ok(SelectOutcome::AlreadyRevealed);
        }

        let is_correct = option_index == question.correct_option;
        self.answers.push(AnswerRecord {
            question_id,
            selected_option: option_index,
            is_correct,
        });
        Ok(SelectOutcome::Revealed { is_correct })
    }

    /// Moves past the current question.
    ///
    /// Requires the current question to be revealed; otherwise the caller
    /// gets an "answer required" validation error and nothing changes.
    pub fn advance(&mut self) -> PortResult<AdvanceOutcome> {
        if self.state == QuizState::Completed {
            return Ok(AdvanceOutcome::Completed);
        }
        if self.current_question_state() != QuestionState::Revealed {
            return Err(PortError::Validation(
                "An answer is required before advancing".to_string(),
            ));
        }
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            Ok(AdvanceOutcome::NextQuestion(self.current_index))
        } else {
            self.state = QuizState::Completed;
            Ok(AdvanceOutcome::Completed)
        }
    }
}

//=========================================================================================
// Batch Scoring
//=========================================================================================

/// One submitted choice, before it has been checked against the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected_option: usize,
}

/// A fully scored attempt.
#[derive(Debug, Clone)]
pub struct ScoredAttempt {
    pub score: u32,
    pub answers: Vec<AnswerRecord>,
}

/// Scores a whole attempt in one pass. Deterministic and order-independent.
///
/// The answer count must match the question count, every question id must
/// exist in the key set, and every selected option must be a valid index.
/// Any violation aborts the batch with no partial credit.
pub fn score_answers(questions: &[Question], answers: &[SubmittedAnswer]) -> PortResult<ScoredAttempt> {
    if answers.len() != questions.len() {
        return Err(PortError::Validation(format!(
            "Expected {} answers, got {}",
            questions.len(),
            answers.len()
        )));
    }

    let mut score = 0u32;
    let mut records = Vec::with_capacity(answers.len());
    for answer in answers {
        let question = questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("Question {} not found", answer.question_id))
            })?;
        if answer.selected_option >= question.options.len() {
            return Err(PortError::Validation(format!(
                "Option index {} is out of range for question {}",
                answer.selected_option, question.id
            )));
        }

        let is_correct = question.correct_option == answer.selected_option;
        if is_correct {
            score += 1;
        }
        records.push(AnswerRecord {
            question_id: answer.question_id,
            selected_option: answer.selected_option,
            is_correct,
        });
    }

    Ok(ScoredAttempt {
        score,
        answers: records,
    })
}

//=========================================================================================
// Retry Reshuffle
//=========================================================================================

/// Shuffles a question's options and remaps the correct index to follow.
///
/// The single place where shuffle and remap happen together, so the key
/// can never drift from the option order on quiz retries.
pub fn shuffle_options<R: Rng>(question: &Question, rng: &mut R) -> Question {
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);

    let options = order
        .iter()
        .map(|&i| question.options[i].clone())
        .collect();
    let correct_option = order
        .iter()
        .position(|&i| i == question.correct_option)
        .unwrap_or(question.correct_option);

    Question {
        id: question.id,
        topic_id: question.topic_id,
        question: question.question.clone(),
        options,
        correct_option,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: i64, correct: usize) -> Question {
        Question {
            id,
            topic_id: 1,
            question: format!("Pregunta {}", id),
            options: vec![
                format!("Opción A de {}", id),
                format!("Opción B de {}", id),
                format!("Opción C de {}", id),
                format!("Opción D de {}", id),
            ],
            correct_option: correct,
        }
    }

    fn five_questions() -> Vec<Question> {
        // Answer key [1, 0, 2, 1, 3].
        [1, 0, 2, 1, 3]
            .iter()
            .enumerate()
            .map(|(i, &correct)| question(i as i64 + 1, correct))
            .collect()
    }

    #[test]
    fn walks_an_attempt_to_completion() {
        let mut flow = QuizFlow::new(five_questions());
        let selections = [1usize, 0, 2, 0, 3];

        for (i, &pick) in selections.iter().enumerate() {
            let id = flow.current_question().unwrap().id;
            let outcome = flow.select_option(id, pick).unwrap();
            assert!(matches!(outcome, SelectOutcome::Revealed { .. }));

            let advanced = flow.advance().unwrap();
            if i + 1 < selections.len() {
                assert_eq!(advanced, AdvanceOutcome::NextQuestion(i + 1));
            } else {
                assert_eq!(advanced, AdvanceOutcome::Completed);
            }
        }

        assert_eq!(flow.state(), QuizState::Completed);
        assert_eq!(flow.score(), 4);
        assert!(!flow.answers()[3].is_correct);
    }

    #[test]
    fn reselecting_a_revealed_question_never_changes_the_record() {
        let mut flow = QuizFlow::new(five_questions());
        let id = flow.current_question().unwrap().id;

        flow.select_option(id, 1).unwrap();
        let outcome = flow.select_option(id, 3).unwrap();

        assert_eq!(outcome, SelectOutcome::AlreadyRevealed);
        assert_eq!(flow.answers().len(), 1);
        assert_eq!(flow.answers()[0].selected_option, 1);
        assert!(flow.answers()[0].is_correct);
    }

    #[test]
    fn selecting_a_non_current_question_is_a_no_op() {
        let mut flow = QuizFlow::new(five_questions());
        let outcome = flow.select_option(99, 0).unwrap();
        assert_eq!(outcome, SelectOutcome::NotCurrent);
        assert!(flow.answers().is_empty());
    }

    #[test]
    fn advancing_without_an_answer_is_rejected() {
        let mut flow = QuizFlow::new(five_questions());
        let err = flow.advance().unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
        assert_eq!(flow.state(), QuizState::InProgress);
    }

    #[test]
    fn out_of_range_option_is_rejected() {
        let mut flow = QuizFlow::new(five_questions());
        let id = flow.current_question().unwrap().id;
        let err = flow.select_option(id, 4).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
        assert_eq!(flow.current_question_state(), QuestionState::Unanswered);
    }

    #[test]
    fn batch_scoring_matches_the_key() {
        let questions = five_questions();
        let answers: Vec<SubmittedAnswer> = [1usize, 0, 2, 0, 3]
            .iter()
            .enumerate()
            .map(|(i, &pick)| SubmittedAnswer {
                question_id: i as i64 + 1,
                selected_option: pick,
            })
            .collect();

        let scored = score_answers(&questions, &answers).unwrap();
        assert_eq!(scored.score, 4);
        assert!(!scored.answers[3].is_correct);
        assert!(scored.answers.iter().enumerate().all(|(i, a)| {
            i == 3 || a.is_correct
        }));
    }

    #[test]
    fn batch_scoring_is_order_independent() {
        let questions = five_questions();
        let mut answers: Vec<SubmittedAnswer> = [1usize, 0, 2, 0, 3]
            .iter()
            .enumerate()
            .map(|(i, &pick)| SubmittedAnswer {
                question_id: i as i64 + 1,
                selected_option: pick,
            })
            .collect();
        answers.reverse();

        let scored = score_answers(&questions, &answers).unwrap();
        assert_eq!(scored.score, 4);
    }

    #[test]
    fn answer_count_mismatch_is_rejected() {
        let questions = five_questions();
        let answers = vec![SubmittedAnswer {
            question_id: 1,
            selected_option: 0,
        }];
        let err = score_answers(&questions, &answers).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
    }

    #[test]
    fn unknown_question_id_aborts_the_whole_batch() {
        let questions = five_questions();
        let answers: Vec<SubmittedAnswer> = (0..5)
            .map(|i| SubmittedAnswer {
                question_id: if i == 4 { 999 } else { i + 1 },
                selected_option: 0,
            })
            .collect();
        let err = score_answers(&questions, &answers).unwrap_err();
        assert!(matches!(err, PortError::NotFound(_)));
    }

    #[test]
    fn shuffle_keeps_the_correct_option_text() {
        let original = question(7, 2);
        let correct_text = original.options[original.correct_option].clone();
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..20 {
            let shuffled = shuffle_options(&original, &mut rng);
            assert_eq!(shuffled.options[shuffled.correct_option], correct_text);
            assert_eq!(shuffled.options.len(), original.options.len());
        }
    }
}
