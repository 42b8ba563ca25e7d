//! Question records.

use crate::answer::Answer;
use crate::error::{QuizError, QuizErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Lowest accepted difficulty rank.
pub const MIN_DIFFICULTY: u8 = 1;
/// Highest accepted difficulty rank.
pub const MAX_DIFFICULTY: u8 = 10;

/// Stable question identifier.
pub type QuestionId = u32;

/// A validated, immutable multiple-choice question.
///
/// Difficulty is curation metadata only and never affects play.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct Question {
    /// Unique identifier.
    id: QuestionId,
    /// Prompt shown to the player.
    prompt: String,
    /// Answer texts in slot order A-D.
    answers: [String; 4],
    /// The correct slot.
    correct: Answer,
    /// Difficulty rank (1-10).
    difficulty: u8,
}

impl Question {
    /// Builds a question, checking every field.
    #[instrument(skip(prompt, answers))]
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        answers: [String; 4],
        correct: Answer,
        difficulty: u8,
    ) -> Result<Self, QuizError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(invalid(id, "prompt is empty"));
        }
        if answers.iter().any(|a| a.trim().is_empty()) {
            return Err(invalid(id, "answer text is empty"));
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(invalid(
                id,
                format!("difficulty {difficulty} outside {MIN_DIFFICULTY}..={MAX_DIFFICULTY}"),
            ));
        }
        Ok(Self {
            id,
            prompt,
            answers,
            correct,
            difficulty,
        })
    }

    /// Text of the given answer slot.
    pub fn answer_text(&self, answer: Answer) -> &str {
        &self.answers[answer.index()]
    }

    /// Whether `answer` is the correct slot.
    pub fn is_correct(&self, answer: Answer) -> bool {
        self.correct == answer
    }
}

#[track_caller]
fn invalid(id: QuestionId, reason: impl Into<String>) -> QuizError {
    QuizError::new(QuizErrorKind::InvalidQuestion {
        id,
        reason: reason.into(),
    })
}

/// On-disk shape of a question, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    /// Unique identifier.
    pub id: QuestionId,
    /// Prompt text.
    pub prompt: String,
    /// Answer texts; must contain exactly four entries.
    pub answers: Vec<String>,
    /// Index of the correct answer (0-3).
    pub correct: usize,
    /// Difficulty rank (1-10).
    pub difficulty: u8,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuizError;

    #[track_caller]
    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let count = record.answers.len();
        let answers: [String; 4] = record
            .answers
            .try_into()
            .map_err(|_| invalid(record.id, format!("expected 4 answers, found {count}")))?;
        let correct = Answer::from_index(record.correct).ok_or_else(|| {
            invalid(
                record.id,
                format!("correct index {} outside 0..=3", record.correct),
            )
        })?;
        Question::new(record.id, record.prompt, answers, correct, record.difficulty)
    }
}
