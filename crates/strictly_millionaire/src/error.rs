//! Error types for the quiz engine.
//!
//! Two families live here. [`QuizError`] is a real failure (bad content,
//! a pool too small to start a game) and is surfaced to the caller.
//! [`Ignored`] describes an event the session deliberately discarded; the
//! session state is untouched whenever one is returned.

use crate::answer::Answer;
use crate::lifelines::LifelineKind;
use crate::phase::Phase;
use crate::session::Generation;
use derive_more::{Display, Error};
use tracing::instrument;

/// Specific failure behind a [`QuizError`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QuizErrorKind {
    /// The repository holds fewer questions than a session needs.
    #[display("question pool holds {available} questions but {requested} were requested")]
    InsufficientQuestionPool {
        /// Questions requested by the session.
        requested: usize,
        /// Questions available in the pool.
        available: usize,
    },

    /// A question record failed validation.
    #[display("invalid question {id}: {reason}")]
    InvalidQuestion {
        /// Identifier of the offending record.
        id: u32,
        /// What was wrong with it.
        reason: String,
    },

    /// Two records share an identifier.
    #[display("duplicate question id {_0}")]
    DuplicateQuestionId(u32),

    /// The prize ladder is malformed.
    #[display("invalid prize ladder: {_0}")]
    InvalidLadder(String),

    /// Session rules are out of range.
    #[display("invalid session rules: {_0}")]
    InvalidRules(String),

    /// A question bank document could not be parsed.
    #[display("failed to parse question bank: {_0}")]
    Parse(String),

    /// A question bank file could not be read.
    #[display("failed to read {path}: {message}")]
    Io {
        /// Path that was being read.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Quiz error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Quiz error: {} at {}:{}", kind, file, line)]
pub struct QuizError {
    /// What went wrong.
    pub kind: QuizErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl QuizError {
    /// Creates a new quiz error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: QuizErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &QuizErrorKind {
        &self.kind
    }
}

impl From<QuizErrorKind> for QuizError {
    #[track_caller]
    fn from(kind: QuizErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<toml::de::Error> for QuizError {
    #[track_caller]
    fn from(err: toml::de::Error) -> Self {
        Self::new(QuizErrorKind::Parse(err.to_string()))
    }
}

/// Why a session operation had no effect.
///
/// Returning `Ignored` is never a crash: the event is dropped and the
/// session is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Ignored {
    /// The operation is not permitted in the current phase.
    #[display("{operation} is not allowed while {phase}")]
    InvalidTransition {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Phase the session was in.
        phase: Phase,
    },

    /// The chosen answer was removed by fifty-fifty.
    #[display("answer {_0} has been eliminated")]
    EliminatedAnswer(Answer),

    /// The lifeline was already consumed this session.
    #[display("{_0} lifeline already used")]
    LifelineSpent(LifelineKind),

    /// A tick or deferred resolution for a superseded generation.
    #[display("stale event for generation {received} (current {current})")]
    Stale {
        /// Generation the session is on.
        current: Generation,
        /// Generation the event was scheduled for.
        received: Generation,
    },

    /// The timer is paused, so a tick does not count down.
    #[display("timer is paused")]
    TimerPaused,
}

impl std::error::Error for Ignored {}
