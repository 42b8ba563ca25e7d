//! First-class session invariants.
//!
//! Invariants are logical properties that must hold after every session
//! transition. They are checked in debug builds and can be tested
//! independently.

use crate::answer::Answer;
use crate::phase::Phase;
use crate::session::GameSession;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);
impl_invariant_set!(I1, I2, I3, I4, I5);
impl_invariant_set!(I1, I2, I3, I4, I5, I6);

/// Fifty-fifty never hides the correct answer.
pub struct EliminationSparesCorrect;

impl<R> Invariant<GameSession<R>> for EliminationSparesCorrect {
    fn holds(session: &GameSession<R>) -> bool {
        session
            .round()
            .is_none_or(|r| !r.eliminated.contains(r.question().correct()))
    }

    fn description() -> &'static str {
        "Eliminated answers never include the correct answer"
    }
}

/// At most two answers are hidden.
pub struct EliminationBounded;

impl<R> Invariant<GameSession<R>> for EliminationBounded {
    fn holds(session: &GameSession<R>) -> bool {
        session.round().is_none_or(|r| r.eliminated.len() <= 2)
    }

    fn description() -> &'static str {
        "At most two answers are eliminated"
    }
}

/// A selection exists exactly while an answer awaits evaluation or was
/// just judged; never while the player is still choosing.
pub struct SelectionMatchesPhase;

impl<R> Invariant<GameSession<R>> for SelectionMatchesPhase {
    fn holds(session: &GameSession<R>) -> bool {
        let selected: Option<Answer> = session.round().and_then(|r| r.selected);
        match session.phase() {
            Phase::Playing => selected.is_none(),
            Phase::Answered => selected.is_some(),
            Phase::Menu => session.round().is_none(),
            Phase::GameOver | Phase::Won => true,
        }
    }

    fn description() -> &'static str {
        "Selection is unset while playing and set once answered"
    }
}

/// The current index is valid while a round is loaded.
pub struct IndexInRange;

impl<R> Invariant<GameSession<R>> for IndexInRange {
    fn holds(session: &GameSession<R>) -> bool {
        match session.round() {
            Some(r) => r.index < r.questions.len(),
            None => !session.phase().in_round(),
        }
    }

    fn description() -> &'static str {
        "Current index is a valid position in the question set"
    }
}

/// The countdown stays within its budget.
pub struct TimerWithinBudget;

impl<R> Invariant<GameSession<R>> for TimerWithinBudget {
    fn holds(session: &GameSession<R>) -> bool {
        let budget = *session.rules().time_budget_secs();
        session.round().is_none_or(|r| r.time_remaining <= budget)
    }

    fn description() -> &'static str {
        "Time remaining is within the per-question budget"
    }
}

/// An outcome is recorded exactly when the session has ended.
pub struct OutcomeMatchesPhase;

impl<R> Invariant<GameSession<R>> for OutcomeMatchesPhase {
    fn holds(session: &GameSession<R>) -> bool {
        session.phase().is_terminal() == session.outcome().is_some()
    }

    fn description() -> &'static str {
        "Outcome is present exactly in terminal phases"
    }
}

/// All session invariants as a composable set.
pub type SessionInvariants = (
    EliminationSparesCorrect,
    EliminationBounded,
    SelectionMatchesPhase,
    IndexInRange,
    TimerWithinBudget,
    OutcomeMatchesPhase,
);
