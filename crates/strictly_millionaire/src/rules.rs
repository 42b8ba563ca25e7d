//! Tunable session rules.

use crate::error::{QuizError, QuizErrorKind};
use crate::lifelines::LifelineOdds;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Rules for a session. Every field has a default, so a partial TOML
/// table is enough to override one knob.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct SessionRules {
    /// Questions per session.
    #[serde(default = "default_question_count")]
    question_count: usize,

    /// Seconds allowed per question.
    #[serde(default = "default_time_budget_secs")]
    time_budget_secs: u32,

    /// Delay between locking in an answer and its evaluation.
    #[serde(default = "default_settle_delay_ms")]
    settle_delay_ms: u64,

    /// Probability the friend names the correct answer.
    #[serde(default = "default_accuracy")]
    friend_accuracy: f64,

    /// Probability each audience vote is correct.
    #[serde(default = "default_accuracy")]
    audience_accuracy: f64,

    /// Number of simulated audience votes.
    #[serde(default = "default_audience_size")]
    audience_size: u32,
}

fn default_question_count() -> usize {
    10
}

fn default_time_budget_secs() -> u32 {
    30
}

fn default_settle_delay_ms() -> u64 {
    1_500
}

fn default_accuracy() -> f64 {
    0.7
}

fn default_audience_size() -> u32 {
    100
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            question_count: default_question_count(),
            time_budget_secs: default_time_budget_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            friend_accuracy: default_accuracy(),
            audience_accuracy: default_accuracy(),
            audience_size: default_audience_size(),
        }
    }
}

impl SessionRules {
    /// Checks that every knob is in range.
    #[instrument]
    pub fn validate(&self) -> Result<(), QuizError> {
        let reason = if self.question_count == 0 {
            Some("question_count must be at least 1".to_string())
        } else if self.time_budget_secs == 0 {
            Some("time_budget_secs must be at least 1".to_string())
        } else if !(0.0..=1.0).contains(&self.friend_accuracy) {
            Some(format!("friend_accuracy {} outside [0, 1]", self.friend_accuracy))
        } else if !(0.0..=1.0).contains(&self.audience_accuracy) {
            Some(format!(
                "audience_accuracy {} outside [0, 1]",
                self.audience_accuracy
            ))
        } else if self.audience_size == 0 {
            Some("audience_size must be at least 1".to_string())
        } else {
            None
        };
        match reason {
            Some(reason) => Err(QuizError::new(QuizErrorKind::InvalidRules(reason))),
            None => Ok(()),
        }
    }

    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Odds handed to the lifeline engine.
    pub fn lifeline_odds(&self) -> LifelineOdds {
        LifelineOdds::new(
            self.friend_accuracy,
            self.audience_accuracy,
            self.audience_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let rules = SessionRules::default();
        assert!(rules.validate().is_ok());
        assert_eq!(*rules.question_count(), 10);
        assert_eq!(*rules.time_budget_secs(), 30);
        assert_eq!(rules.settle_delay(), Duration::from_millis(1_500));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let rules: SessionRules = toml::from_str("question_count = 5").unwrap();
        assert_eq!(*rules.question_count(), 5);
        assert_eq!(*rules.audience_size(), 100);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(SessionRules::default().with_question_count(0).validate().is_err());
        assert!(SessionRules::default().with_time_budget_secs(0).validate().is_err());
        assert!(SessionRules::default().with_friend_accuracy(1.5).validate().is_err());
        assert!(SessionRules::default().with_audience_size(0).validate().is_err());
    }
}
