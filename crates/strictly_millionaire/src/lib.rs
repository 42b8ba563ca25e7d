//! Strictly Millionaire - pure quiz-show game logic.
//!
//! A single-player, timed multiple-choice game: a ladder of increasingly
//! valuable questions, three one-time lifelines, a countdown per question
//! and guaranteed safe-haven prizes.
//!
//! # Architecture
//!
//! - **Bank**: validated, read-only question pool with uniform sampling
//! - **Ladder**: prize values and safe havens
//! - **Lifelines**: fifty-fifty, phone-a-friend and ask-the-audience
//! - **Session**: the phase state machine driven by input, ticks and
//!   deferred resolutions
//!
//! Presentation, sound and scheduling live outside this crate; they
//! subscribe to [`GameSession::on_session_changed`] and feed events back in.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use strictly_millionaire::{GameSession, Phase, PrizeLadder, QuestionBank, SessionRules};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GameSession::new(
//!     QuestionBank::builtin()?,
//!     PrizeLadder::standard(),
//!     SessionRules::default(),
//!     StdRng::seed_from_u64(7),
//! )?;
//! let view = session.start()?;
//! assert_eq!(view.phase, Phase::Playing);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod answer;
mod bank;
mod error;
mod invariants;
mod ladder;
mod lifelines;
mod phase;
mod question;
mod rules;
mod session;
mod view;

// Crate-level exports - Content
pub use answer::Answer;
pub use bank::QuestionBank;
pub use question::{MAX_DIFFICULTY, MIN_DIFFICULTY, Question, QuestionId, QuestionRecord};

// Crate-level exports - Prizes
pub use ladder::{LadderSpec, Prize, PrizeLadder};

// Crate-level exports - Lifelines
pub use lifelines::{
    AudiencePoll, LifelineKind, LifelineOdds, LifelineResult, ask_the_audience, fifty_fifty,
    phone_a_friend,
};

// Crate-level exports - Session
pub use phase::{Cue, EndReason, GameOutcome, Phase};
pub use rules::SessionRules;
pub use session::{
    GameSession, Generation, PendingResolution, Resolution, StartError, TickOutcome,
};
pub use view::{QuestionView, SessionView};

// Crate-level exports - Invariants
pub use invariants::{
    EliminationBounded, EliminationSparesCorrect, IndexInRange, Invariant, InvariantSet,
    InvariantViolation, OutcomeMatchesPhase, SelectionMatchesPhase, SessionInvariants,
    TimerWithinBudget,
};

// Crate-level exports - Errors
pub use error::{Ignored, QuizError, QuizErrorKind};
