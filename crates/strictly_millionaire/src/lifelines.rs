//! Lifeline engine.
//!
//! Each lifeline is a pure function of the current question and a random
//! source. Enforcing once-per-session use is the session's job, not ours.

use crate::answer::Answer;
use crate::question::Question;
use derive_getters::Getters;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, instrument};

/// The three one-time assists.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum LifelineKind {
    /// Removes two wrong answers.
    #[strum(to_string = "50:50")]
    FiftyFifty,
    /// Asks a fallible friend for a suggestion.
    #[strum(to_string = "Phone a Friend")]
    PhoneAFriend,
    /// Polls a simulated studio audience.
    #[strum(to_string = "Ask the Audience")]
    AskTheAudience,
}

/// Vote counts from the audience, indexed by answer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudiencePoll {
    votes: [u32; Answer::COUNT],
}

impl AudiencePoll {
    /// Wraps raw vote counts.
    pub fn new(votes: [u32; Answer::COUNT]) -> Self {
        Self { votes }
    }

    /// Votes for `answer`.
    pub fn votes(&self, answer: Answer) -> u32 {
        self.votes[answer.index()]
    }

    /// Total votes cast.
    pub fn total(&self) -> u32 {
        self.votes.iter().sum()
    }

    /// Share of votes for `answer`, as a percentage.
    pub fn percentage(&self, answer: Answer) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.votes(answer)) * 100.0 / f64::from(total),
        }
    }

    /// Answer with the most votes (first slot wins ties).
    pub fn leader(&self) -> Answer {
        Answer::iter()
            .rev()
            .max_by_key(|a| self.votes(*a))
            .unwrap_or(Answer::A)
    }
}

/// Result of a lifeline, handed back to the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifelineResult {
    /// The two answers that were hidden.
    FiftyFifty([Answer; 2]),
    /// The friend's (possibly wrong) suggestion.
    PhoneAFriend(Answer),
    /// The audience's vote distribution.
    AskTheAudience(AudiencePoll),
}

impl LifelineResult {
    /// Which lifeline produced this result.
    pub fn kind(&self) -> LifelineKind {
        match self {
            LifelineResult::FiftyFifty(_) => LifelineKind::FiftyFifty,
            LifelineResult::PhoneAFriend(_) => LifelineKind::PhoneAFriend,
            LifelineResult::AskTheAudience(_) => LifelineKind::AskTheAudience,
        }
    }
}

/// Tunable odds for the simulated helpers.
#[derive(Debug, Clone, Copy, PartialEq, Getters)]
pub struct LifelineOdds {
    /// Probability the friend names the correct answer.
    friend_accuracy: f64,
    /// Probability a single audience vote is correct.
    audience_accuracy: f64,
    /// Number of simulated audience votes.
    audience_size: u32,
}

impl LifelineOdds {
    /// Builds odds; probabilities are clamped into `[0, 1]` and NaN counts as 0.
    pub fn new(friend_accuracy: f64, audience_accuracy: f64, audience_size: u32) -> Self {
        Self {
            friend_accuracy: probability(friend_accuracy),
            audience_accuracy: probability(audience_accuracy),
            audience_size,
        }
    }
}

impl Default for LifelineOdds {
    fn default() -> Self {
        Self::new(0.7, 0.7, 100)
    }
}

/// Picks two of the three wrong answers to eliminate.
#[instrument(skip(question, rng), fields(question_id = question.id()))]
pub fn fifty_fifty<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> [Answer; 2] {
    let wrong = question.correct().others();
    let mut picked: Vec<Answer> = wrong.choose_multiple(rng, 2).copied().collect();
    picked.sort();
    let eliminated = [picked[0], picked[1]];
    debug!(?eliminated, "Fifty-fifty eliminated answers");
    eliminated
}

/// Returns the friend's suggestion: correct with `accuracy`, otherwise a
/// uniformly random wrong answer.
#[instrument(skip(question, rng), fields(question_id = question.id()))]
pub fn phone_a_friend<R: Rng + ?Sized>(question: &Question, accuracy: f64, rng: &mut R) -> Answer {
    let correct = *question.correct();
    let suggestion = if rng.gen_bool(probability(accuracy)) {
        correct
    } else {
        random_wrong(correct, rng)
    };
    debug!(%suggestion, "Friend suggested an answer");
    suggestion
}

/// Simulates `voters` independent audience votes.
///
/// Each vote is correct with `accuracy`, otherwise lands uniformly on one
/// of the three wrong answers.
#[instrument(skip(question, rng), fields(question_id = question.id()))]
pub fn ask_the_audience<R: Rng + ?Sized>(
    question: &Question,
    accuracy: f64,
    voters: u32,
    rng: &mut R,
) -> AudiencePoll {
    let correct = *question.correct();
    let accuracy = probability(accuracy);
    let mut votes = [0u32; Answer::COUNT];
    for _ in 0..voters {
        let choice = if rng.gen_bool(accuracy) {
            correct
        } else {
            random_wrong(correct, rng)
        };
        votes[choice.index()] += 1;
    }
    let poll = AudiencePoll::new(votes);
    debug!(?votes, "Audience poll complete");
    poll
}

/// Clamps into `[0, 1]`, mapping NaN to 0 so `gen_bool` never panics.
fn probability(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

fn random_wrong<R: Rng + ?Sized>(correct: Answer, rng: &mut R) -> Answer {
    let wrong = correct.others();
    wrong[rng.gen_range(0..wrong.len())]
}
