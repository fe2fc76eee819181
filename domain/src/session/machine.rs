//! Session aggregate and its state machine
//!
//! ```text
//! Session:  Open ──first vote──▶ InProgress ──last story closed──▶ Closed
//! Story:    Pending ─▶ Voting ──all voted──▶ Revealed ──close──▶ Closed
//!                        ▲                      │
//!                        └──── NotAgreed/reset ─┘   (round + 1)
//! ```
//!
//! A [`Session`] owns its stories, participants and [`VoteLedger`]. Every
//! mutation goes through `&mut self`, so the caller decides how the aggregate
//! is shared; within one session the operations are applied one at a time.

use super::entities::{SessionStatus, Story, StoryCursor, StoryStatus};
use super::view::{
    CloseReport, CurrentStoryView, Finalization, JoinOutcome, ParticipantView, SessionResults,
    SessionSummary, SessionView, StorySummary, VoteReceipt,
};
use crate::consensus::{AgreementMode, ConsensusEngine, Outcome};
use crate::core::code::SessionCode;
use crate::core::error::DomainError;
use crate::core::participant::ParticipantName;
use crate::deck::{Card, Deck};
use crate::ledger::VoteLedger;
use crate::story::StoryDraft;
use std::collections::BTreeSet;

/// Longest session title accepted, in characters.
pub const MAX_SESSION_TITLE_CHARS: usize = 200;

/// A planning poker session (Aggregate root)
#[derive(Debug, Clone)]
pub struct Session {
    code: SessionCode,
    title: String,
    mode: AgreementMode,
    engine: ConsensusEngine,
    stories: Vec<Story>,
    status: SessionStatus,
    current: usize,
    participants: BTreeSet<ParticipantName>,
    /// Participants whose votes count for the revealed round. Frozen at
    /// reveal so late joiners take part from the next round on.
    electorate: BTreeSet<ParticipantName>,
    ledger: VoteLedger,
    close_log: Vec<CloseReport>,
    finalized: bool,
}

impl Session {
    /// Create a session over a non-empty story list.
    pub fn new(
        code: SessionCode,
        title: impl AsRef<str>,
        stories: Vec<StoryDraft>,
        mode: AgreementMode,
        engine: ConsensusEngine,
    ) -> Result<Self, DomainError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(DomainError::invalid("session title cannot be empty"));
        }
        if title.chars().count() > MAX_SESSION_TITLE_CHARS {
            return Err(DomainError::invalid(format!(
                "session title longer than {} characters",
                MAX_SESSION_TITLE_CHARS
            )));
        }
        if stories.is_empty() {
            return Err(DomainError::invalid("a session needs at least one story"));
        }

        let stories = stories
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Story::from_draft(index, draft))
            .collect();

        Ok(Self {
            code,
            title: title.to_string(),
            mode,
            engine,
            stories,
            status: SessionStatus::Open,
            current: 0,
            participants: BTreeSet::new(),
            electorate: BTreeSet::new(),
            ledger: VoteLedger::new(),
            close_log: Vec::new(),
            finalized: false,
        })
    }

    // ==================== Accessors ====================

    pub fn code(&self) -> &SessionCode {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mode(&self) -> AgreementMode {
        self.mode
    }

    pub fn engine(&self) -> ConsensusEngine {
        self.engine
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn participants(&self) -> &BTreeSet<ParticipantName> {
        &self.participants
    }

    pub fn is_participant(&self, name: &ParticipantName) -> bool {
        self.participants.contains(name)
    }

    /// The story up for estimation, `None` once the session is closed.
    pub fn current_story(&self) -> Option<&Story> {
        if self.status == SessionStatus::Closed {
            return None;
        }
        self.stories.get(self.current)
    }

    pub fn cursor(&self) -> Option<StoryCursor> {
        self.current_story().map(Story::cursor)
    }

    pub fn all_stories_closed(&self) -> bool {
        self.stories.iter().all(Story::is_closed)
    }

    /// The close previously applied at `cursor`, if any.
    pub fn recorded_close(&self, cursor: StoryCursor) -> Option<CloseReport> {
        self.close_log
            .iter()
            .find(|report| report.cursor == cursor)
            .map(CloseReport::replayed)
    }

    pub fn close_history(&self) -> &[CloseReport] {
        &self.close_log
    }

    // ==================== Commands ====================

    /// Add a participant. Joining twice is harmless.
    pub fn join(&mut self, name: ParticipantName) -> Result<JoinOutcome, DomainError> {
        self.ensure_open_for_changes()?;
        if self.participants.insert(name) {
            Ok(JoinOutcome::Joined)
        } else {
            Ok(JoinOutcome::Rejoined)
        }
    }

    /// Remove a participant and their votes.
    ///
    /// Returns true when the departure completed the round and revealed the
    /// current story.
    pub fn leave(&mut self, name: &ParticipantName) -> Result<bool, DomainError> {
        if self.finalized {
            return Err(DomainError::SessionAlreadyClosed(self.code.to_string()));
        }
        if !self.participants.remove(name) {
            return Err(DomainError::ParticipantNotFound(name.to_string()));
        }
        self.ledger.remove_participant(name);
        self.electorate.remove(name);
        Ok(self.reveal_if_complete())
    }

    /// Record a vote on the current story.
    ///
    /// The first accepted vote starts the session. When the vote completes
    /// the round, the story is revealed in the same step.
    pub fn submit_vote(
        &mut self,
        name: &ParticipantName,
        card: Card,
    ) -> Result<VoteReceipt, DomainError> {
        self.ensure_open_for_changes()?;
        if !self.participants.contains(name) {
            return Err(DomainError::ParticipantNotFound(name.to_string()));
        }
        if !Deck::is_valid(&card) {
            return Err(DomainError::InvalidCard(card.to_string()));
        }
        let index = self.current;
        let story = self
            .stories
            .get(index)
            .ok_or(DomainError::StoryNotFound(index))?;
        if story.status() == StoryStatus::Revealed {
            return Err(DomainError::illegal(format!(
                "story {} is revealed; close it or reset the votes first",
                index
            )));
        }

        let replaced = self.ledger.submit(name, index, card)?;
        if self.status == SessionStatus::Open {
            self.status = SessionStatus::InProgress;
        }
        if let Some(story) = self.stories.get_mut(index) {
            story.open();
        }
        let revealed = self.reveal_if_complete();

        Ok(VoteReceipt {
            cursor: StoryCursor::new(index, self.stories[index].round()),
            replaced,
            revealed,
        })
    }

    /// Evaluate and close the round identified by `cursor`.
    ///
    /// A cursor that was already closed replays the recorded report with
    /// `applied == false`, so concurrent or retried requests all observe the
    /// same outcome and the transition happens exactly once.
    pub fn close_current_story(&mut self, cursor: StoryCursor) -> Result<CloseReport, DomainError> {
        if cursor.story_index >= self.stories.len() {
            return Err(DomainError::StoryNotFound(cursor.story_index));
        }
        if let Some(report) = self.recorded_close(cursor) {
            return Ok(report);
        }
        let current = self
            .cursor()
            .ok_or_else(|| DomainError::illegal("every story is already closed"))?;
        if cursor != current {
            return Err(DomainError::illegal(format!(
                "{} is not the current round ({})",
                cursor, current
            )));
        }
        let index = current.story_index;
        if self.stories[index].status() != StoryStatus::Revealed {
            return Err(DomainError::illegal(format!(
                "story {} has not been revealed",
                index
            )));
        }

        let votes = self.ledger.votes(index);
        let outcome = self.engine.evaluate(self.mode, &votes, &self.electorate);

        self.ledger.reset(index);
        self.electorate.clear();

        match outcome {
            Outcome::Agreed(value) => {
                self.stories[index].close(value)?;
                if index + 1 < self.stories.len() {
                    self.current = index + 1;
                    self.stories[self.current].open();
                } else {
                    self.status = SessionStatus::Closed;
                }
            }
            Outcome::NotAgreed(_) => self.stories[index].reopen(),
        }

        let report = CloseReport {
            cursor,
            outcome,
            next: self.cursor(),
            session_closed: self.status == SessionStatus::Closed,
            applied: true,
        };
        self.close_log.push(report.clone());
        Ok(report)
    }

    /// Close whatever the caller is looking at.
    ///
    /// With a cursor this is [`Session::close_current_story`]. Without one the
    /// current round is closed if it is revealed; otherwise the most recent
    /// close is replayed, so a duplicate request that arrives after the
    /// session moved on still observes the outcome it raced for.
    pub fn request_close(&mut self, cursor: Option<StoryCursor>) -> Result<CloseReport, DomainError> {
        if let Some(cursor) = cursor {
            return self.close_current_story(cursor);
        }
        if let Some(story) = self.current_story()
            && story.status() == StoryStatus::Revealed
        {
            let cursor = story.cursor();
            return self.close_current_story(cursor);
        }
        match self.close_log.last() {
            Some(report) => Ok(report.replayed()),
            None => Err(DomainError::illegal("no story has been revealed yet")),
        }
    }

    /// Clear the current story's votes and start a new round.
    pub fn reset_votes(&mut self) -> Result<StoryCursor, DomainError> {
        self.ensure_open_for_changes()?;
        if self.status == SessionStatus::Open {
            return Err(DomainError::illegal("voting has not started"));
        }
        let index = self.current;
        self.ledger.reset(index);
        self.electorate.clear();
        let story = self
            .stories
            .get_mut(index)
            .ok_or(DomainError::StoryNotFound(index))?;
        story.reopen();
        Ok(story.cursor())
    }

    /// Finalize a session whose stories are all closed.
    ///
    /// Participants and votes are released. Calling it again returns the
    /// same results as [`Finalization::AlreadyFinalized`].
    pub fn finalize(&mut self) -> Result<Finalization, DomainError> {
        if self.finalized {
            return Ok(Finalization::AlreadyFinalized(self.results()));
        }
        if let Some(open) = self.stories.iter().find(|story| !story.is_closed()) {
            return Err(DomainError::illegal(format!(
                "story {} ({}) is not closed",
                open.index(),
                open.title()
            )));
        }
        self.finalized = true;
        self.status = SessionStatus::Closed;
        self.participants.clear();
        self.electorate.clear();
        self.ledger.clear();
        Ok(Finalization::Applied(self.results()))
    }

    // ==================== Queries ====================

    /// Project the session for `viewer`.
    ///
    /// Cards stay hidden until the current story is revealed, except the
    /// viewer's own.
    pub fn view(&self, viewer: Option<&ParticipantName>) -> SessionView {
        let current = self.current_story();
        let revealed = current.is_some_and(|story| story.status() == StoryStatus::Revealed);

        let participants = match current {
            Some(story) => self
                .ledger
                .snapshot(story.index(), &self.participants)
                .into_iter()
                .map(|(name, vote)| ParticipantView {
                    name,
                    has_voted: vote.is_some(),
                    vote: if revealed { vote } else { None },
                })
                .collect(),
            None => self
                .participants
                .iter()
                .map(|name| ParticipantView {
                    name: name.clone(),
                    has_voted: false,
                    vote: None,
                })
                .collect(),
        };

        let current = current.map(|story| CurrentStoryView {
            cursor: story.cursor(),
            title: story.title().to_string(),
            content: story.content().to_string(),
            status: story.status(),
            your_vote: viewer.and_then(|name| self.ledger.vote_of(story.index(), name)),
        });

        SessionView {
            code: self.code.clone(),
            title: self.title.clone(),
            mode: self.mode,
            status: self.status,
            finalized: self.finalized,
            current,
            participants,
            stories: self.story_summaries(),
            last_close: self.close_log.last().cloned(),
        }
    }

    pub fn results(&self) -> SessionResults {
        SessionResults {
            code: self.code.clone(),
            title: self.title.clone(),
            mode: self.mode,
            status: self.status,
            complete: self.all_stories_closed(),
            stories: self.story_summaries(),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            code: self.code.clone(),
            title: self.title.clone(),
            mode: self.mode,
            status: self.status,
            story_count: self.stories.len(),
            participant_count: self.participants.len(),
            finalized: self.finalized,
        }
    }

    // ==================== Internals ====================

    fn story_summaries(&self) -> Vec<StorySummary> {
        self.stories
            .iter()
            .map(|story| StorySummary {
                index: story.index(),
                title: story.title().to_string(),
                status: story.status(),
                final_value: story.final_value(),
            })
            .collect()
    }

    fn ensure_open_for_changes(&self) -> Result<(), DomainError> {
        if self.finalized || self.status == SessionStatus::Closed {
            return Err(DomainError::SessionAlreadyClosed(self.code.to_string()));
        }
        Ok(())
    }

    fn reveal_if_complete(&mut self) -> bool {
        if self.status != SessionStatus::InProgress {
            return false;
        }
        let index = self.current;
        let Some(story) = self.stories.get_mut(index) else {
            return false;
        };
        if story.status() != StoryStatus::Voting {
            return false;
        }
        if !self.ledger.all_voted(index, &self.participants) {
            return false;
        }
        story.reveal();
        self.electorate = self.participants.clone();
        true
    }
}
