//! The four answer slots of a question.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::instrument;

/// One of the four answer slots, labelled A to D on screen.
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
    derive_more::Display,
)]
pub enum Answer {
    /// First answer (index 0).
    A,
    /// Second answer (index 1).
    B,
    /// Third answer (index 2).
    C,
    /// Fourth answer (index 3).
    D,
}

impl Answer {
    /// Number of answers every question carries.
    pub const COUNT: usize = 4;

    /// Zero-based index of this slot.
    pub fn index(self) -> usize {
        match self {
            Answer::A => 0,
            Answer::B => 1,
            Answer::C => 2,
            Answer::D => 3,
        }
    }

    /// Slot for a zero-based index, if in range.
    #[instrument]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    /// Parses a letter (`a`-`d`, case-insensitive).
    #[instrument]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(Answer::A),
            'B' => Some(Answer::B),
            'C' => Some(Answer::C),
            'D' => Some(Answer::D),
            _ => None,
        }
    }

    /// The other three slots, in order.
    pub fn others(self) -> Vec<Answer> {
        Self::iter().filter(|a| *a != self).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for answer in Answer::iter() {
            assert_eq!(Answer::from_index(answer.index()), Some(answer));
        }
        assert_eq!(Answer::from_index(4), None);
    }

    #[test]
    fn test_from_letter() {
        assert_eq!(Answer::from_letter('c'), Some(Answer::C));
        assert_eq!(Answer::from_letter('D'), Some(Answer::D));
        assert_eq!(Answer::from_letter('e'), None);
    }

    #[test]
    fn test_others_excludes_self() {
        assert_eq!(Answer::B.others(), vec![Answer::A, Answer::C, Answer::D]);
    }
}
