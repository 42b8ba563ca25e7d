//! Prize ladder and safe havens.

use crate::error::{QuizError, QuizErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Monetary prize value.
pub type Prize = u64;

const STANDARD_PRIZES: [Prize; 15] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

const STANDARD_SAFE_HAVENS: [Prize; 2] = [1_000, 32_000];

/// Strictly increasing prize values, one per question position, plus the
/// values the player keeps after a failure.
///
/// Safe havens are matched to the ladder by value, not position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LadderSpec", into = "LadderSpec")]
pub struct PrizeLadder {
    prizes: Vec<Prize>,
    safe_havens: Vec<Prize>,
}

/// Unvalidated ladder as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderSpec {
    /// Prize per question position.
    pub prizes: Vec<Prize>,
    /// Values retained on failure once passed.
    #[serde(default)]
    pub safe_havens: Vec<Prize>,
}

impl PrizeLadder {
    /// Validates and builds a ladder.
    #[instrument]
    pub fn new(prizes: Vec<Prize>, mut safe_havens: Vec<Prize>) -> Result<Self, QuizError> {
        if prizes.is_empty() {
            return Err(QuizError::new(QuizErrorKind::InvalidLadder(
                "ladder has no prizes".to_string(),
            )));
        }
        if let Some(pair) = prizes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(QuizError::new(QuizErrorKind::InvalidLadder(format!(
                "prizes must strictly increase ({} then {})",
                pair[0], pair[1]
            ))));
        }
        if let Some(stray) = safe_havens.iter().find(|h| !prizes.contains(h)) {
            return Err(QuizError::new(QuizErrorKind::InvalidLadder(format!(
                "safe haven {stray} is not a ladder prize"
            ))));
        }
        safe_havens.sort_unstable();
        safe_havens.dedup();
        Ok(Self {
            prizes,
            safe_havens,
        })
    }

    /// The fifteen-rung ladder with safe havens at 1,000 and 32,000.
    pub fn standard() -> Self {
        Self {
            prizes: STANDARD_PRIZES.to_vec(),
            safe_havens: STANDARD_SAFE_HAVENS.to_vec(),
        }
    }

    /// Number of rungs.
    pub fn len(&self) -> usize {
        self.prizes.len()
    }

    /// Always false; a ladder has at least one rung.
    pub fn is_empty(&self) -> bool {
        self.prizes.is_empty()
    }

    /// All prizes, lowest first.
    pub fn prizes(&self) -> &[Prize] {
        &self.prizes
    }

    /// Safe haven values, ascending.
    pub fn safe_havens(&self) -> &[Prize] {
        &self.safe_havens
    }

    /// Prize for the question at `index`.
    pub fn prize_at(&self, index: usize) -> Option<Prize> {
        self.prizes.get(index).copied()
    }

    /// The highest rung.
    pub fn top_prize(&self) -> Prize {
        self.prizes.last().copied().unwrap_or_default()
    }

    /// Whether `prize` is a safe haven value.
    pub fn is_safe_haven(&self, prize: Prize) -> bool {
        self.safe_havens.binary_search(&prize).is_ok()
    }

    /// Prize kept when failing or quitting at `index`.
    ///
    /// The largest safe haven strictly below the prize at `index`, or 0.
    /// The rung at `index` itself never counts.
    #[instrument(skip(self))]
    pub fn guaranteed_prize(&self, index: usize) -> Prize {
        let Some(current) = self.prize_at(index) else {
            return 0;
        };
        let kept = self
            .safe_havens
            .iter()
            .copied()
            .filter(|haven| *haven < current)
            .max()
            .unwrap_or(0);
        debug!(index, current, kept, "Computed guaranteed prize");
        kept
    }
}

impl Default for PrizeLadder {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<LadderSpec> for PrizeLadder {
    type Error = QuizError;

    fn try_from(spec: LadderSpec) -> Result<Self, Self::Error> {
        Self::new(spec.prizes, spec.safe_havens)
    }
}

impl From<PrizeLadder> for LadderSpec {
    fn from(ladder: PrizeLadder) -> Self {
        Self {
            prizes: ladder.prizes,
            safe_havens: ladder.safe_havens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guaranteed_prize_scenarios() {
        let ladder = PrizeLadder::standard();
        // 500 sits below the first safe haven.
        assert_eq!(ladder.guaranteed_prize(3), 0);
        // The 1,000 rung itself is not yet banked.
        assert_eq!(ladder.guaranteed_prize(4), 0);
        assert_eq!(ladder.guaranteed_prize(5), 1_000);
        assert_eq!(ladder.guaranteed_prize(9), 1_000);
        assert_eq!(ladder.guaranteed_prize(10), 32_000);
        assert_eq!(ladder.guaranteed_prize(14), 32_000);
    }

    #[test]
    fn test_guaranteed_prize_monotonic() {
        let ladder = PrizeLadder::standard();
        let kept: Vec<_> = (0..ladder.len()).map(|i| ladder.guaranteed_prize(i)).collect();
        assert!(kept.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_out_of_range_index_guarantees_nothing() {
        assert_eq!(PrizeLadder::standard().guaranteed_prize(99), 0);
    }

    #[test]
    fn test_rejects_non_increasing() {
        let err = PrizeLadder::new(vec![100, 100, 200], vec![]).unwrap_err();
        assert!(matches!(err.kind(), QuizErrorKind::InvalidLadder(_)));
    }

    #[test]
    fn test_rejects_stray_safe_haven() {
        let err = PrizeLadder::new(vec![100, 200, 300], vec![250]).unwrap_err();
        assert!(err.to_string().contains("250"));
    }

    #[test]
    fn test_rejects_empty() {
        assert!(PrizeLadder::new(vec![], vec![]).is_err());
    }

    #[test]
    fn test_top_prize() {
        assert_eq!(PrizeLadder::standard().top_prize(), 1_000_000);
        assert!(PrizeLadder::standard().is_safe_haven(32_000));
        assert!(!PrizeLadder::standard().is_safe_haven(64_000));
    }
}
