//! The question repository.
//!
//! A bank is loaded once, validated, and never mutated afterwards. The only
//! thing a session can do with it is draw a sample.

use crate::error::{QuizError, QuizErrorKind};
use crate::question::{Question, QuestionId, QuestionRecord};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, instrument};

const BUILTIN_BANK: &str = include_str!("../data/questions.toml");

#[derive(Debug, Deserialize)]
struct BankDocument {
    questions: Vec<QuestionRecord>,
}

/// Read-only pool of validated questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from already-validated questions, rejecting duplicate ids.
    #[instrument(skip(questions), fields(count = questions.len()))]
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut seen: HashSet<QuestionId> = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(*question.id()) {
                return Err(QuizError::new(QuizErrorKind::DuplicateQuestionId(
                    *question.id(),
                )));
            }
        }
        debug!("Question bank assembled");
        Ok(Self { questions })
    }

    /// The bank that ships with the game.
    #[instrument]
    pub fn builtin() -> Result<Self, QuizError> {
        Self::from_toml_str(BUILTIN_BANK)
    }

    /// Parses and validates a TOML question bank.
    #[instrument(skip(source), fields(bytes = source.len()))]
    pub fn from_toml_str(source: &str) -> Result<Self, QuizError> {
        let document: BankDocument = toml::from_str(source)?;
        let questions = document
            .questions
            .into_iter()
            .map(Question::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let bank = Self::new(questions)?;
        info!(count = bank.len(), "Question bank loaded");
        Ok(bank)
    }

    /// Reads and validates a TOML question bank from disk.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuizError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            QuizError::new(QuizErrorKind::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        })?;
        Self::from_toml_str(&source)
    }

    /// Number of questions in the pool.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions, in load order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Draws `n` distinct questions uniformly without replacement, in random order.
    ///
    /// Fails with [`QuizErrorKind::InsufficientQuestionPool`] rather than
    /// returning a short set.
    #[instrument(skip(self, rng), fields(available = self.questions.len()))]
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Question>, QuizError> {
        if n > self.questions.len() {
            return Err(QuizError::new(QuizErrorKind::InsufficientQuestionPool {
                requested: n,
                available: self.questions.len(),
            }));
        }
        let mut drawn = self.questions.clone();
        drawn.shuffle(rng);
        drawn.truncate(n);
        debug!(ids = ?drawn.iter().map(|q| *q.id()).collect::<Vec<_>>(), "Sampled question set");
        Ok(drawn)
    }
}
