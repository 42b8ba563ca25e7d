//! Render-ready snapshot of a session.

use crate::answer::Answer;
use crate::ladder::Prize;
use crate::lifelines::{AudiencePoll, LifelineKind};
use crate::phase::{GameOutcome, Phase};
use crate::question::{Question, QuestionId};
use crate::session::Generation;
use serde::{Deserialize, Serialize};

/// A question as the player sees it: no correct answer attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    /// Question identifier.
    pub id: QuestionId,
    /// Prompt text.
    pub prompt: String,
    /// Answer texts in slot order.
    pub answers: [String; 4],
    /// Difficulty rank.
    pub difficulty: u8,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: *question.id(),
            prompt: question.prompt().clone(),
            answers: question.answers().clone(),
            difficulty: *question.difficulty(),
        }
    }
}

impl QuestionView {
    /// Text of the given answer slot.
    pub fn answer_text(&self, answer: Answer) -> &str {
        &self.answers[answer.index()]
    }
}

/// Everything a presentation needs to draw the session.
///
/// `correct` is only filled in once the answer has been revealed or the
/// session has ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// Generation the snapshot was taken at.
    pub generation: Generation,
    /// Current phase.
    pub phase: Phase,
    /// The current question, while a round is loaded.
    pub question: Option<QuestionView>,
    /// Zero-based index of the current question.
    pub question_index: usize,
    /// Questions in the set.
    pub question_count: usize,
    /// Prize for the current question.
    pub current_prize: Prize,
    /// Prize kept on failure or quit right now.
    pub guaranteed_prize: Prize,
    /// Full prize ladder.
    pub prizes: Vec<Prize>,
    /// Safe haven values.
    pub safe_havens: Vec<Prize>,
    /// The locked-in answer.
    pub selected: Option<Answer>,
    /// Answers hidden by fifty-fifty.
    pub eliminated: Vec<Answer>,
    /// Lifelines already played this session.
    pub used_lifelines: Vec<LifelineKind>,
    /// Seconds left on the clock.
    pub time_remaining: u32,
    /// Seconds allowed per question.
    pub time_budget: u32,
    /// Whether the clock is paused.
    pub paused: bool,
    /// Whether the correct answer has been revealed.
    pub revealed: bool,
    /// The correct answer, when it may be shown.
    pub correct: Option<Answer>,
    /// Audience poll for this question.
    pub audience: Option<AudiencePoll>,
    /// Friend's suggestion for this question.
    pub friend_suggestion: Option<Answer>,
    /// Final result, once the session has ended.
    pub outcome: Option<GameOutcome>,
}

impl SessionView {
    /// Whether `kind` can still be played this session.
    pub fn lifeline_available(&self, kind: LifelineKind) -> bool {
        !self.used_lifelines.contains(&kind)
    }

    /// Whether `answer` was hidden by fifty-fifty.
    pub fn is_eliminated(&self, answer: Answer) -> bool {
        self.eliminated.contains(&answer)
    }
}
