//! Session phases and how a session ends.

use crate::ladder::Prize;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Discrete state of a game session.
///
/// ```text
/// Menu -> Playing -> Answered -> Playing | GameOver | Won
/// Playing -> GameOver            (time expired, quit)
/// GameOver | Won -> Menu
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// No game in progress.
    #[default]
    Menu,
    /// Waiting for the player to answer the current question.
    Playing,
    /// An answer was locked in and awaits evaluation.
    Answered,
    /// The session ended without winning.
    GameOver,
    /// The final question was answered correctly.
    Won,
}

impl Phase {
    /// Whether the session has ended.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Won)
    }

    /// Whether a question set is loaded.
    pub fn in_round(self) -> bool {
        matches!(self, Phase::Playing | Phase::Answered)
    }
}

/// Why a session reached a terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum EndReason {
    /// The locked-in answer was wrong.
    #[strum(to_string = "Wrong answer")]
    WrongAnswer,
    /// The countdown reached zero.
    #[strum(to_string = "Time is up")]
    TimeExpired,
    /// The player walked away.
    #[strum(to_string = "Walked away")]
    Quit,
    /// Every question was answered correctly.
    #[strum(to_string = "Won")]
    Won,
}

/// Final result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct GameOutcome {
    /// How the session ended.
    pub reason: EndReason,
    /// Money taken home.
    pub prize: Prize,
    /// Questions answered correctly before the end.
    pub questions_answered: usize,
}

/// Presentation cue, standing in for sounds and effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    /// An answer was locked in.
    Select,
    /// The answer was correct.
    Correct,
    /// The answer was wrong or time ran out.
    Wrong,
    /// The final question was won.
    Win,
    /// A lifeline was played.
    Lifeline,
}
