//! Consensus Engine
//!
//! Pure evaluation of a round of votes under an [`AgreementMode`]. The engine
//! holds no session state and needs no locking.

use super::mode::{AgreementMode, AverageRounding};
use super::outcome::{Estimate, NoAgreementReason, Outcome};
use crate::core::participant::ParticipantName;
use crate::deck::{Card, Deck};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Evaluates votes into an [`Outcome`]
///
/// # Example
///
/// ```
/// use std::collections::{BTreeMap, BTreeSet};
/// use poker_domain::consensus::{AgreementMode, ConsensusEngine, Estimate, Outcome};
/// use poker_domain::deck::Card;
/// use poker_domain::ParticipantName;
///
/// let a = ParticipantName::new("a").unwrap();
/// let b = ParticipantName::new("b").unwrap();
/// let expected: BTreeSet<_> = [a.clone(), b.clone()].into();
/// let votes: BTreeMap<_, _> = [(a, Card::Number(5)), (b, Card::Number(8))].into();
///
/// let engine = ConsensusEngine::default();
/// assert_eq!(
///     engine.evaluate(AgreementMode::Median, &votes, &expected),
///     Outcome::Agreed(Estimate::new(6.5))
/// );
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusEngine {
    rounding: AverageRounding,
}

impl ConsensusEngine {
    pub fn new(rounding: AverageRounding) -> Self {
        Self { rounding }
    }

    pub fn rounding(&self) -> AverageRounding {
        self.rounding
    }

    /// Evaluate `votes` cast by (a subset of) `expected` participants.
    ///
    /// Votes from names outside `expected` are ignored. A partial vote set
    /// yields `NotAgreed(Incomplete)`, except for Majority-absolute which is
    /// measured against the expected head-count and can already be decided.
    pub fn evaluate(
        &self,
        mode: AgreementMode,
        votes: &BTreeMap<ParticipantName, Card>,
        expected: &BTreeSet<ParticipantName>,
    ) -> Outcome {
        let cast: Vec<Card> = votes
            .iter()
            .filter(|(name, _)| expected.contains(*name))
            .map(|(_, card)| *card)
            .collect();

        if expected.is_empty() || cast.is_empty() {
            return Outcome::NotAgreed(NoAgreementReason::NoVotes);
        }

        if mode != AgreementMode::MajorityAbsolute && cast.len() < expected.len() {
            return Outcome::NotAgreed(NoAgreementReason::Incomplete);
        }

        let numeric: Vec<u16> = cast.iter().filter_map(Card::numeric).collect();

        match mode {
            AgreementMode::Unanimity => unanimity(&cast, &numeric),
            AgreementMode::Median => median(&numeric),
            AgreementMode::Average => self.average(&numeric),
            AgreementMode::MajorityAbsolute => majority_absolute(&numeric, expected.len()),
            AgreementMode::MajorityRelative => majority_relative(&numeric),
        }
    }

    fn average(&self, numeric: &[u16]) -> Outcome {
        if numeric.is_empty() {
            return Outcome::NotAgreed(NoAgreementReason::NoNumericVotes);
        }
        let sum: f64 = numeric.iter().map(|&n| f64::from(n)).sum();
        let mean = sum / numeric.len() as f64;

        let value = match self.rounding {
            AverageRounding::Nearest => Estimate::from(Deck::nearest(mean)),
            AverageRounding::Floor => Estimate::from(Deck::floor(mean)),
            AverageRounding::Unrounded => Estimate::new(mean),
        };
        Outcome::Agreed(value)
    }
}

fn unanimity(cast: &[Card], numeric: &[u16]) -> Outcome {
    if numeric.len() < cast.len() {
        return Outcome::NotAgreed(NoAgreementReason::SpecialCard);
    }
    match numeric.split_first() {
        Some((first, rest)) if rest.iter().all(|n| n == first) => {
            Outcome::Agreed(Estimate::from(*first))
        }
        _ => Outcome::NotAgreed(NoAgreementReason::Disagreement),
    }
}

fn median(numeric: &[u16]) -> Outcome {
    if numeric.is_empty() {
        return Outcome::NotAgreed(NoAgreementReason::NoNumericVotes);
    }
    let mut sorted = numeric.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    let value = if sorted.len() % 2 == 1 {
        f64::from(sorted[mid])
    } else {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    };
    Outcome::Agreed(Estimate::new(value))
}

fn majority_absolute(numeric: &[u16], expected: usize) -> Outcome {
    tally(numeric)
        .into_iter()
        .find(|&(_, count)| count * 2 > expected)
        .map(|(value, _)| Outcome::Agreed(Estimate::from(value)))
        .unwrap_or(Outcome::NotAgreed(NoAgreementReason::NoMajority))
}

fn majority_relative(numeric: &[u16]) -> Outcome {
    let counts = tally(numeric);
    let Some(top) = counts.values().copied().max() else {
        return Outcome::NotAgreed(NoAgreementReason::NoNumericVotes);
    };

    let mut leaders = counts.iter().filter(|&(_, &count)| count == top);
    match (leaders.next(), leaders.next()) {
        (Some((&value, _)), None) => Outcome::Agreed(Estimate::from(value)),
        _ => Outcome::NotAgreed(NoAgreementReason::Tie),
    }
}

fn tally(numeric: &[u16]) -> BTreeMap<u16, usize> {
    let mut counts = BTreeMap::new();
    for &value in numeric {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<ParticipantName> {
        (0..n)
            .map(|i| ParticipantName::new(format!("p{i}")).unwrap())
            .collect()
    }

    /// Expected = `expected` participants; the first `cards.len()` of them vote.
    fn evaluate_with(
        engine: ConsensusEngine,
        mode: AgreementMode,
        expected: usize,
        cards: &[Card],
    ) -> Outcome {
        let people = names(expected);
        let votes: BTreeMap<_, _> = people.iter().cloned().zip(cards.iter().copied()).collect();
        let expected: BTreeSet<_> = people.into_iter().collect();
        engine.evaluate(mode, &votes, &expected)
    }

    fn evaluate(mode: AgreementMode, expected: usize, cards: &[Card]) -> Outcome {
        evaluate_with(ConsensusEngine::default(), mode, expected, cards)
    }

    fn n(values: &[u16]) -> Vec<Card> {
        values.iter().map(|&v| Card::Number(v)).collect()
    }

    fn agreed(value: f64) -> Outcome {
        Outcome::Agreed(Estimate::new(value))
    }

    fn not_agreed(reason: NoAgreementReason) -> Outcome {
        Outcome::NotAgreed(reason)
    }

    // ==================== Unanimity ====================

    #[test]
    fn test_unanimity_agrees_when_all_equal() {
        assert_eq!(evaluate(AgreementMode::Unanimity, 3, &n(&[5, 5, 5])), agreed(5.0));
    }

    #[test]
    fn test_unanimity_single_difference_disagrees() {
        assert_eq!(
            evaluate(AgreementMode::Unanimity, 3, &n(&[5, 5, 8])),
            not_agreed(NoAgreementReason::Disagreement)
        );
    }

    #[test]
    fn test_unanimity_special_card_blocks() {
        let cards = [Card::Number(5), Card::Number(5), Card::Break];
        assert_eq!(
            evaluate(AgreementMode::Unanimity, 3, &cards),
            not_agreed(NoAgreementReason::SpecialCard)
        );
        assert_eq!(
            evaluate(AgreementMode::Unanimity, 1, &[Card::Unknown]),
            not_agreed(NoAgreementReason::SpecialCard)
        );
    }

    #[test]
    fn test_unanimity_requires_everyone() {
        assert_eq!(
            evaluate(AgreementMode::Unanimity, 3, &n(&[5, 5])),
            not_agreed(NoAgreementReason::Incomplete)
        );
    }

    // ==================== Median ====================

    #[test]
    fn test_median_odd_count() {
        assert_eq!(evaluate(AgreementMode::Median, 3, &n(&[8, 3, 5])), agreed(5.0));
    }

    #[test]
    fn test_median_even_count_takes_mean_of_middle() {
        assert_eq!(evaluate(AgreementMode::Median, 4, &n(&[13, 3, 8, 5])), agreed(6.5));
    }

    #[test]
    fn test_median_discards_special_cards() {
        let cards = [Card::Number(2), Card::Unknown, Card::Number(8), Card::Break];
        assert_eq!(evaluate(AgreementMode::Median, 4, &cards), agreed(5.0));
    }

    #[test]
    fn test_median_only_special_cards() {
        assert_eq!(
            evaluate(AgreementMode::Median, 2, &[Card::Break, Card::Unknown]),
            not_agreed(NoAgreementReason::NoNumericVotes)
        );
    }

    // ==================== Average ====================

    #[test]
    fn test_average_rounds_to_nearest_card() {
        // mean 4.0 sits between 3 and 5; midpoint rounds up
        assert_eq!(evaluate(AgreementMode::Average, 3, &n(&[2, 5, 5])), agreed(5.0));
        // mean 5.33 → 5
        assert_eq!(evaluate(AgreementMode::Average, 3, &n(&[3, 5, 8])), agreed(5.0));
        // mean 11.0 → 13
        assert_eq!(evaluate(AgreementMode::Average, 2, &n(&[2, 20])), agreed(13.0));
    }

    #[test]
    fn test_average_rounding_policies() {
        let cards = n(&[5, 8]);
        let nearest = ConsensusEngine::new(AverageRounding::Nearest);
        let floor = ConsensusEngine::new(AverageRounding::Floor);
        let exact = ConsensusEngine::new(AverageRounding::Unrounded);

        assert_eq!(evaluate_with(nearest, AgreementMode::Average, 2, &cards), agreed(8.0));
        assert_eq!(evaluate_with(floor, AgreementMode::Average, 2, &cards), agreed(5.0));
        assert_eq!(evaluate_with(exact, AgreementMode::Average, 2, &cards), agreed(6.5));
    }

    #[test]
    fn test_average_discards_special_cards() {
        let cards = [Card::Number(3), Card::Number(3), Card::Break];
        assert_eq!(evaluate(AgreementMode::Average, 3, &cards), agreed(3.0));
        assert_eq!(
            evaluate(AgreementMode::Average, 1, &[Card::Unknown]),
            not_agreed(NoAgreementReason::NoNumericVotes)
        );
    }

    // ==================== Majority ====================

    #[test]
    fn test_majority_absolute_counts_expected_participants() {
        // 3 of 4 expected (one absent): 3 > 2
        assert_eq!(
            evaluate(AgreementMode::MajorityAbsolute, 4, &n(&[5, 5, 5])),
            agreed(5.0)
        );
        // 2 of 4 expected: 2 is not > 2
        assert_eq!(
            evaluate(AgreementMode::MajorityAbsolute, 4, &n(&[5, 5])),
            not_agreed(NoAgreementReason::NoMajority)
        );
    }

    #[test]
    fn test_majority_absolute_split() {
        assert_eq!(
            evaluate(AgreementMode::MajorityAbsolute, 4, &n(&[5, 5, 8, 8])),
            not_agreed(NoAgreementReason::NoMajority)
        );
        assert_eq!(
            evaluate(AgreementMode::MajorityAbsolute, 4, &n(&[5, 5, 5, 8])),
            agreed(5.0)
        );
    }

    #[test]
    fn test_majority_relative_plurality() {
        assert_eq!(
            evaluate(AgreementMode::MajorityRelative, 3, &n(&[5, 5, 8])),
            agreed(5.0)
        );
        assert_eq!(
            evaluate(AgreementMode::MajorityRelative, 4, &n(&[5, 5, 8, 13])),
            agreed(5.0)
        );
    }

    #[test]
    fn test_majority_relative_tie() {
        assert_eq!(
            evaluate(AgreementMode::MajorityRelative, 4, &n(&[5, 5, 8, 8])),
            not_agreed(NoAgreementReason::Tie)
        );
    }

    // ==================== Edge cases ====================

    #[test]
    fn test_no_votes() {
        for mode in AgreementMode::ALL {
            assert_eq!(
                evaluate(mode, 3, &[]),
                not_agreed(NoAgreementReason::NoVotes)
            );
            assert_eq!(
                evaluate(mode, 0, &[]),
                not_agreed(NoAgreementReason::NoVotes)
            );
        }
    }

    #[test]
    fn test_votes_outside_expected_are_ignored() {
        let people = names(2);
        let outsider = ParticipantName::new("outsider").unwrap();
        let votes: BTreeMap<_, _> = [
            (people[0].clone(), Card::Number(3)),
            (people[1].clone(), Card::Number(3)),
            (outsider, Card::Number(100)),
        ]
        .into();
        let expected: BTreeSet<_> = people.into_iter().collect();

        let outcome = ConsensusEngine::default().evaluate(AgreementMode::Unanimity, &votes, &expected);
        assert_eq!(outcome, agreed(3.0));
    }

    #[test]
    fn test_median_and_average_ignore_submission_order() {
        let values = [1u16, 2, 3, 5, 8, 13, 20];
        let forward = n(&values);
        let mut reversed = forward.clone();
        reversed.reverse();
        let mut rotated = forward.clone();
        rotated.rotate_left(3);

        for mode in [AgreementMode::Median, AgreementMode::Average] {
            let baseline = evaluate(mode, values.len(), &forward);
            assert_eq!(evaluate(mode, values.len(), &reversed), baseline);
            assert_eq!(evaluate(mode, values.len(), &rotated), baseline);
        }
    }
}
