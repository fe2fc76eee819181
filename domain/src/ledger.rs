//! Vote Ledger
//!
//! Per-story record of each participant's current vote. One live vote per
//! participant per story: a revote replaces the previous card.

use crate::core::error::DomainError;
use crate::core::participant::ParticipantName;
use crate::deck::{Card, Deck};
use std::collections::{BTreeMap, BTreeSet};

/// Votes of one session, keyed by story index then participant.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    stories: BTreeMap<usize, BTreeMap<ParticipantName, Card>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `card` for `participant` on story `story_index`.
    ///
    /// Returns the card it replaced, if any. Fails with `InvalidCard` for
    /// cards outside the deck, leaving the ledger untouched.
    pub fn submit(
        &mut self,
        participant: &ParticipantName,
        story_index: usize,
        card: Card,
    ) -> Result<Option<Card>, DomainError> {
        if !Deck::is_valid(&card) {
            return Err(DomainError::InvalidCard(card.to_string()));
        }
        Ok(self
            .stories
            .entry(story_index)
            .or_default()
            .insert(participant.clone(), card))
    }

    /// True when there is at least one expected participant and every one
    /// of them has a vote for the story.
    pub fn all_voted(&self, story_index: usize, expected: &BTreeSet<ParticipantName>) -> bool {
        if expected.is_empty() {
            return false;
        }
        match self.stories.get(&story_index) {
            Some(votes) => expected.iter().all(|name| votes.contains_key(name)),
            None => false,
        }
    }

    pub fn has_voted(&self, story_index: usize, participant: &ParticipantName) -> bool {
        self.vote_of(story_index, participant).is_some()
    }

    pub fn vote_of(&self, story_index: usize, participant: &ParticipantName) -> Option<Card> {
        self.stories
            .get(&story_index)
            .and_then(|votes| votes.get(participant))
            .copied()
    }

    /// Drop every vote for the story.
    pub fn reset(&mut self, story_index: usize) {
        self.stories.remove(&story_index);
    }

    /// Each participant mapped to their card, or `None` if they have not voted.
    pub fn snapshot(
        &self,
        story_index: usize,
        participants: &BTreeSet<ParticipantName>,
    ) -> BTreeMap<ParticipantName, Option<Card>> {
        participants
            .iter()
            .map(|name| (name.clone(), self.vote_of(story_index, name)))
            .collect()
    }

    /// The cast votes only, as handed to the consensus engine.
    pub fn votes(&self, story_index: usize) -> BTreeMap<ParticipantName, Card> {
        self.stories.get(&story_index).cloned().unwrap_or_default()
    }

    pub fn vote_count(&self, story_index: usize) -> usize {
        self.stories.get(&story_index).map_or(0, BTreeMap::len)
    }

    /// Remove a participant's votes from every story.
    pub fn remove_participant(&mut self, participant: &ParticipantName) {
        for votes in self.stories.values_mut() {
            votes.remove(participant);
        }
        self.stories.retain(|_, votes| !votes.is_empty());
    }

    pub fn clear(&mut self) {
        self.stories.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> ParticipantName {
        ParticipantName::new(s).unwrap()
    }

    fn everyone(names: &[&str]) -> BTreeSet<ParticipantName> {
        names.iter().map(|s| name(s)).collect()
    }

    #[test]
    fn test_submit_rejects_card_outside_deck() {
        let mut ledger = VoteLedger::new();
        let result = ledger.submit(&name("ann"), 0, Card::Number(7));
        assert!(matches!(result, Err(DomainError::InvalidCard(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_revote_supersedes() {
        let mut ledger = VoteLedger::new();
        assert_eq!(ledger.submit(&name("ann"), 0, Card::Number(3)).unwrap(), None);
        assert_eq!(
            ledger.submit(&name("ann"), 0, Card::Number(8)).unwrap(),
            Some(Card::Number(3))
        );
        assert_eq!(ledger.vote_count(0), 1);
        assert_eq!(ledger.vote_of(0, &name("ann")), Some(Card::Number(8)));
    }

    #[test]
    fn test_all_voted() {
        let mut ledger = VoteLedger::new();
        let expected = everyone(&["ann", "bob"]);
        assert!(!ledger.all_voted(0, &expected));

        ledger.submit(&name("ann"), 0, Card::Number(5)).unwrap();
        assert!(!ledger.all_voted(0, &expected));

        ledger.submit(&name("bob"), 0, Card::Break).unwrap();
        assert!(ledger.all_voted(0, &expected));

        // Votes on another story do not count
        assert!(!ledger.all_voted(1, &expected));
        // Nobody expected is never "all voted"
        assert!(!ledger.all_voted(0, &BTreeSet::new()));
    }

    #[test]
    fn test_reset_clears_story_only() {
        let mut ledger = VoteLedger::new();
        ledger.submit(&name("ann"), 0, Card::Number(5)).unwrap();
        ledger.submit(&name("ann"), 1, Card::Number(8)).unwrap();

        ledger.reset(0);

        let snapshot = ledger.snapshot(0, &everyone(&["ann"]));
        assert_eq!(snapshot.get(&name("ann")), Some(&None));
        assert_eq!(ledger.vote_of(1, &name("ann")), Some(Card::Number(8)));
    }

    #[test]
    fn test_snapshot_marks_absent() {
        let mut ledger = VoteLedger::new();
        ledger.submit(&name("ann"), 0, Card::Unknown).unwrap();

        let snapshot = ledger.snapshot(0, &everyone(&["ann", "bob"]));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[&name("ann")], Some(Card::Unknown));
        assert_eq!(snapshot[&name("bob")], None);
    }

    #[test]
    fn test_remove_participant() {
        let mut ledger = VoteLedger::new();
        ledger.submit(&name("ann"), 0, Card::Number(5)).unwrap();
        ledger.submit(&name("bob"), 0, Card::Number(5)).unwrap();

        ledger.remove_participant(&name("bob"));

        assert!(!ledger.has_voted(0, &name("bob")));
        assert!(ledger.all_voted(0, &everyone(&["ann"])));
    }
}
