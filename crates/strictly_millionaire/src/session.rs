//! The game session state machine.
//!
//! A [`GameSession`] is mutated only by discrete events processed one at a
//! time: player input, timer ticks and deferred resolutions. Ticks and
//! resolutions carry the [`Generation`] they were scheduled for; the
//! generation advances on every phase or question change, so an event that
//! arrives after the session moved on is discarded as stale.

use crate::answer::Answer;
use crate::bank::QuestionBank;
use crate::error::{Ignored, QuizError, QuizErrorKind};
use crate::invariants::{InvariantSet, SessionInvariants};
use crate::ladder::{Prize, PrizeLadder};
use crate::lifelines::{self, AudiencePoll, LifelineKind, LifelineResult};
use crate::phase::{Cue, EndReason, GameOutcome, Phase};
use crate::question::Question;
use crate::rules::SessionRules;
use crate::view::{QuestionView, SessionView};
use derive_more::{Display, From};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Epoch of the session's current question and phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, Display,
)]
#[display("#{_0}")]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Signal that an answer is locked in and must be resolved after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingResolution {
    /// Generation the resolution belongs to.
    pub generation: Generation,
    /// How long the presentation holds the suspense.
    pub delay: Duration,
}

/// What a resolution did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Correct; moved on to the question at `index`.
    Advanced {
        /// Index of the new current question.
        index: usize,
    },
    /// Correct on the final question.
    Won(GameOutcome),
    /// Wrong answer.
    GameOver(GameOutcome),
}

/// What a timer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left after this tick.
    Counting(u32),
    /// The countdown hit zero and the session ended.
    Expired(GameOutcome),
}

/// Failure to start a session.
#[derive(Debug, Clone, Display, From)]
pub enum StartError {
    /// A session is already running or has not been dismissed.
    #[display("{_0}")]
    Ignored(Ignored),
    /// The question set could not be drawn.
    #[display("{_0}")]
    Quiz(QuizError),
}

impl std::error::Error for StartError {}

/// State of the question set currently being played.
#[derive(Debug, Clone)]
pub(crate) struct Round {
    pub(crate) questions: Vec<Question>,
    pub(crate) index: usize,
    pub(crate) selected: Option<Answer>,
    pub(crate) eliminated: BTreeSet<Answer>,
    pub(crate) used_lifelines: BTreeSet<LifelineKind>,
    pub(crate) time_remaining: u32,
    pub(crate) paused: bool,
    pub(crate) revealed: bool,
    pub(crate) audience: Option<AudiencePoll>,
    pub(crate) friend: Option<Answer>,
}

impl Round {
    fn new(questions: Vec<Question>, time_budget: u32) -> Self {
        Self {
            questions,
            index: 0,
            selected: None,
            eliminated: BTreeSet::new(),
            used_lifelines: BTreeSet::new(),
            time_remaining: time_budget,
            paused: false,
            revealed: false,
            audience: None,
            friend: None,
        }
    }

    pub(crate) fn question(&self) -> &Question {
        &self.questions[self.index]
    }

    fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// Moves to the next question, clearing everything per-question.
    fn advance(&mut self, time_budget: u32) {
        self.index += 1;
        self.selected = None;
        self.eliminated.clear();
        self.time_remaining = time_budget;
        self.paused = false;
        self.revealed = false;
        self.audience = None;
        self.friend = None;
    }
}

type ChangeListener = Box<dyn FnMut(&SessionView) + Send>;
type CueListener = Box<dyn FnMut(Cue) + Send>;

/// A single-player quiz session.
///
/// Generic over its random source so tests can inject a seeded RNG.
pub struct GameSession<R = StdRng> {
    bank: QuestionBank,
    ladder: PrizeLadder,
    rules: SessionRules,
    rng: R,
    phase: Phase,
    generation: Generation,
    round: Option<Round>,
    outcome: Option<GameOutcome>,
    change_listeners: Vec<ChangeListener>,
    cue_listeners: Vec<CueListener>,
}

impl<R> std::fmt::Debug for GameSession<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("phase", &self.phase)
            .field("generation", &self.generation)
            .field("round", &self.round)
            .field("outcome", &self.outcome)
            .field("listeners", &self.change_listeners.len())
            .finish_non_exhaustive()
    }
}

#[track_caller]
fn rejected(operation: &'static str, phase: Phase) -> Ignored {
    warn!(operation, %phase, "Operation not allowed in this phase");
    Ignored::InvalidTransition { operation, phase }
}

impl<R: Rng> GameSession<R> {
    /// Creates a session in the menu phase.
    ///
    /// Fails if the rules are out of range or the ladder has fewer rungs
    /// than a session plays. Pool size is checked at [`start`](Self::start).
    #[instrument(skip(bank, ladder, rng), fields(pool = bank.len(), rungs = ladder.len()))]
    pub fn new(
        bank: QuestionBank,
        ladder: PrizeLadder,
        rules: SessionRules,
        rng: R,
    ) -> Result<Self, QuizError> {
        rules.validate()?;
        if ladder.len() < *rules.question_count() {
            return Err(QuizError::new(QuizErrorKind::InvalidLadder(format!(
                "ladder has {} rungs but a session plays {} questions",
                ladder.len(),
                rules.question_count()
            ))));
        }
        info!("Created game session");
        Ok(Self {
            bank,
            ladder,
            rules,
            rng,
            phase: Phase::Menu,
            generation: Generation::default(),
            round: None,
            outcome: None,
            change_listeners: Vec::new(),
            cue_listeners: Vec::new(),
        })
    }

    /// Registers a callback invoked with a fresh view after every change.
    pub fn on_session_changed<F>(&mut self, listener: F)
    where
        F: FnMut(&SessionView) + Send + 'static,
    {
        self.change_listeners.push(Box::new(listener));
    }

    /// Registers a callback for presentation cues.
    pub fn on_cue<F>(&mut self, listener: F)
    where
        F: FnMut(Cue) + Send + 'static,
    {
        self.cue_listeners.push(Box::new(listener));
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    /// Starts a new game from the menu with a freshly sampled question set.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn start(&mut self) -> Result<SessionView, StartError> {
        if self.phase != Phase::Menu {
            return Err(rejected("start", self.phase).into());
        }
        let questions = self
            .bank
            .sample(*self.rules.question_count(), &mut self.rng)?;
        self.round = Some(Round::new(questions, *self.rules.time_budget_secs()));
        self.outcome = None;
        self.enter(Phase::Playing);
        info!(generation = %self.generation, "Game started");
        Ok(self.publish())
    }

    /// Locks in an answer for the current question.
    ///
    /// The verdict is deferred: the caller schedules [`resolve`](Self::resolve)
    /// for the returned generation after the returned delay.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn select_answer(&mut self, answer: Answer) -> Result<PendingResolution, Ignored> {
        let phase = self.phase;
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Playing) else {
            return Err(rejected("select_answer", phase));
        };
        if round.eliminated.contains(&answer) {
            debug!(%answer, "Eliminated answer selected, ignoring");
            return Err(Ignored::EliminatedAnswer(answer));
        }
        round.selected = Some(answer);
        let index = round.index;
        self.enter(Phase::Answered);
        info!(%answer, index, "Answer locked in");
        self.cue(Cue::Select);
        self.publish();
        Ok(PendingResolution {
            generation: self.generation,
            delay: self.rules.settle_delay(),
        })
    }

    /// Evaluates the locked-in answer scheduled for `generation`.
    #[instrument(skip(self), fields(current = %self.generation))]
    pub fn resolve(&mut self, generation: Generation) -> Result<Resolution, Ignored> {
        self.check_generation(generation)?;
        let phase = self.phase;
        let time_budget = *self.rules.time_budget_secs();
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Answered) else {
            return Err(rejected("resolve", phase));
        };
        let Some(selected) = round.selected else {
            return Err(rejected("resolve", phase));
        };
        let index = round.index;
        let correct = round.question().is_correct(selected);

        if correct && !round.is_last() {
            round.advance(time_budget);
            self.enter(Phase::Playing);
            info!(index = index + 1, "Correct, next question");
            self.cue(Cue::Correct);
            self.publish();
            Ok(Resolution::Advanced { index: index + 1 })
        } else if correct {
            let outcome = GameOutcome::new(EndReason::Won, self.ladder.top_prize(), index + 1);
            self.finish(Phase::Won, outcome);
            info!(prize = outcome.prize, "Final question correct, game won");
            self.cue(Cue::Correct);
            self.cue(Cue::Win);
            self.publish();
            Ok(Resolution::Won(outcome))
        } else {
            let outcome = GameOutcome::new(
                EndReason::WrongAnswer,
                self.ladder.guaranteed_prize(index),
                index,
            );
            self.finish(Phase::GameOver, outcome);
            info!(index, prize = outcome.prize, "Wrong answer, game over");
            self.cue(Cue::Wrong);
            self.publish();
            Ok(Resolution::GameOver(outcome))
        }
    }

    /// Counts the timer down by one second.
    ///
    /// Reaching zero ends the game exactly as a wrong answer would.
    #[instrument(skip(self), level = "trace", fields(current = %self.generation))]
    pub fn tick(&mut self, generation: Generation) -> Result<TickOutcome, Ignored> {
        self.check_generation(generation)?;
        let phase = self.phase;
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Playing) else {
            return Err(rejected("tick", phase));
        };
        if round.paused {
            debug!("Tick while paused, ignoring");
            return Err(Ignored::TimerPaused);
        }
        round.time_remaining = round.time_remaining.saturating_sub(1);
        let remaining = round.time_remaining;
        let index = round.index;

        if remaining == 0 {
            let outcome = GameOutcome::new(
                EndReason::TimeExpired,
                self.ladder.guaranteed_prize(index),
                index,
            );
            self.finish(Phase::GameOver, outcome);
            info!(index, prize = outcome.prize, "Time expired, game over");
            self.cue(Cue::Wrong);
            self.publish();
            return Ok(TickOutcome::Expired(outcome));
        }

        self.publish();
        Ok(TickOutcome::Counting(remaining))
    }

    /// Plays a lifeline against the current question.
    ///
    /// Each lifeline works once per session; a repeat is a no-op.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn use_lifeline(&mut self, kind: LifelineKind) -> Result<LifelineResult, Ignored> {
        let phase = self.phase;
        let odds = self.rules.lifeline_odds();
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Playing) else {
            return Err(rejected("use_lifeline", phase));
        };
        if round.used_lifelines.contains(&kind) {
            debug!(%kind, "Lifeline already used, ignoring");
            return Err(Ignored::LifelineSpent(kind));
        }

        let question = round.question();
        let result = match kind {
            LifelineKind::FiftyFifty => {
                LifelineResult::FiftyFifty(lifelines::fifty_fifty(question, &mut self.rng))
            }
            LifelineKind::PhoneAFriend => LifelineResult::PhoneAFriend(lifelines::phone_a_friend(
                question,
                *odds.friend_accuracy(),
                &mut self.rng,
            )),
            LifelineKind::AskTheAudience => {
                LifelineResult::AskTheAudience(lifelines::ask_the_audience(
                    question,
                    *odds.audience_accuracy(),
                    *odds.audience_size(),
                    &mut self.rng,
                ))
            }
        };

        match result {
            LifelineResult::FiftyFifty(hidden) => round.eliminated.extend(hidden),
            LifelineResult::PhoneAFriend(suggestion) => round.friend = Some(suggestion),
            LifelineResult::AskTheAudience(poll) => round.audience = Some(poll),
        }
        round.used_lifelines.insert(kind);
        info!(%kind, "Lifeline used");
        self.cue(Cue::Lifeline);
        self.publish();
        Ok(result)
    }

    /// Walks away with the guaranteed prize for the current question.
    #[instrument(skip(self), fields(generation = %self.generation))]
    pub fn quit(&mut self) -> Result<GameOutcome, Ignored> {
        let phase = self.phase;
        let Some(round) = self.round.as_ref().filter(|_| phase == Phase::Playing) else {
            return Err(rejected("quit", phase));
        };
        let index = round.index;
        let outcome = GameOutcome::new(EndReason::Quit, self.ladder.guaranteed_prize(index), index);
        self.finish(Phase::GameOver, outcome);
        info!(index, prize = outcome.prize, "Player quit");
        self.publish();
        Ok(outcome)
    }

    /// Pauses the countdown.
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> Result<(), Ignored> {
        self.set_paused("pause", true)
    }

    /// Resumes the countdown.
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> Result<(), Ignored> {
        self.set_paused("resume", false)
    }

    /// Pauses the countdown and reveals the correct answer for this question.
    #[instrument(skip(self))]
    pub fn reveal(&mut self) -> Result<(), Ignored> {
        let phase = self.phase;
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Playing) else {
            return Err(rejected("reveal", phase));
        };
        round.paused = true;
        round.revealed = true;
        info!(correct = %round.question().correct(), "Answer revealed");
        self.publish();
        Ok(())
    }

    /// Dismisses a finished session and returns to the menu.
    #[instrument(skip(self))]
    pub fn return_to_menu(&mut self) -> Result<SessionView, Ignored> {
        if !self.phase.is_terminal() {
            return Err(rejected("return_to_menu", self.phase));
        }
        self.round = None;
        self.outcome = None;
        self.enter(Phase::Menu);
        info!("Returned to menu");
        Ok(self.publish())
    }
}

impl<R> GameSession<R> {
    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Rules in force.
    pub fn rules(&self) -> &SessionRules {
        &self.rules
    }

    /// Prize ladder in force.
    pub fn ladder(&self) -> &PrizeLadder {
        &self.ladder
    }

    /// How the session ended, once it has.
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    /// The question being played, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.round.as_ref().map(Round::question)
    }

    /// Zero-based index of the current question.
    pub fn current_index(&self) -> Option<usize> {
        self.round.as_ref().map(|r| r.index)
    }

    /// Prize attached to the current question.
    pub fn current_prize(&self) -> Prize {
        self.current_index()
            .and_then(|i| self.ladder.prize_at(i))
            .unwrap_or(0)
    }

    /// Prize kept if the player fails or quits now.
    pub fn guaranteed_prize(&self) -> Prize {
        self.current_index()
            .map(|i| self.ladder.guaranteed_prize(i))
            .unwrap_or(0)
    }

    /// Whether the countdown should be ticking.
    pub fn timer_running(&self) -> bool {
        self.phase == Phase::Playing && self.round.as_ref().is_some_and(|r| !r.paused)
    }

    /// Whether the countdown is paused in the current round.
    pub fn is_paused(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.paused)
    }

    /// The resolution the caller must schedule, while one is outstanding.
    pub fn pending_resolution(&self) -> Option<PendingResolution> {
        (self.phase == Phase::Answered).then(|| PendingResolution {
            generation: self.generation,
            delay: self.rules.settle_delay(),
        })
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let round = self.round.as_ref();
        let show_correct = self.phase.is_terminal() || round.is_some_and(|r| r.revealed);
        SessionView {
            generation: self.generation,
            phase: self.phase,
            question: round.map(|r| QuestionView::from(r.question())),
            question_index: round.map(|r| r.index).unwrap_or(0),
            question_count: round
                .map(|r| r.questions.len())
                .unwrap_or(*self.rules.question_count()),
            current_prize: self.current_prize(),
            guaranteed_prize: self.guaranteed_prize(),
            prizes: self.ladder.prizes().to_vec(),
            safe_havens: self.ladder.safe_havens().to_vec(),
            selected: round.and_then(|r| r.selected),
            eliminated: round
                .map(|r| r.eliminated.iter().copied().collect())
                .unwrap_or_default(),
            used_lifelines: round
                .map(|r| r.used_lifelines.iter().copied().collect())
                .unwrap_or_default(),
            time_remaining: round.map(|r| r.time_remaining).unwrap_or(0),
            time_budget: *self.rules.time_budget_secs(),
            paused: round.is_some_and(|r| r.paused),
            revealed: round.is_some_and(|r| r.revealed),
            correct: round
                .filter(|_| show_correct)
                .map(|r| *r.question().correct()),
            audience: round.and_then(|r| r.audience),
            friend_suggestion: round.and_then(|r| r.friend),
            outcome: self.outcome,
        }
    }

    pub(crate) fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    fn check_generation(&self, received: Generation) -> Result<(), Ignored> {
        if received != self.generation {
            debug!(%received, current = %self.generation, "Discarding stale event");
            return Err(Ignored::Stale {
                current: self.generation,
                received,
            });
        }
        Ok(())
    }

    fn set_paused(&mut self, operation: &'static str, paused: bool) -> Result<(), Ignored> {
        let phase = self.phase;
        let Some(round) = self.round.as_mut().filter(|_| phase == Phase::Playing) else {
            return Err(rejected(operation, phase));
        };
        if round.paused != paused {
            round.paused = paused;
            info!(paused, "Timer pause toggled");
            self.publish();
        }
        Ok(())
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = %self.phase, to = %phase, "Phase transition");
        self.phase = phase;
        self.generation = self.generation.next();
    }

    fn finish(&mut self, phase: Phase, outcome: GameOutcome) {
        self.outcome = Some(outcome);
        self.enter(phase);
    }

    fn cue(&mut self, cue: Cue) {
        for listener in &mut self.cue_listeners {
            listener(cue);
        }
    }

    fn publish(&mut self) -> SessionView {
        debug_assert!(
            SessionInvariants::check_all(&*self).is_ok(),
            "session invariants violated: {:?}",
            SessionInvariants::check_all(&*self)
        );
        let view = self.view();
        for listener in &mut self.change_listeners {
            listener(&view);
        }
        view
    }
}
