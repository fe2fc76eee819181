//! Client-side reconciliation state
//!
//! A [`ReconciliationTracker`] turns each polled [`SessionView`] into the one
//! request worth making next. The server is authoritative; the tracker only
//! bounds redundant calls by remembering the furthest round this client has
//! already voted on or closed.

use poker_domain::{
    CloseReport, Finalization, ParticipantName, SessionView, StoryCursor, StoryStatus,
};

/// What the polling loop should do after looking at a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Cast a vote on this round
    Vote(StoryCursor),
    /// The round is revealed; ask the server to close it
    Close(StoryCursor),
    /// Every story is closed; ask the server to finalize
    Finalize,
    /// Nothing to do until others act
    Wait,
    /// The session is finalized
    Done,
}

#[derive(Debug, Clone)]
pub struct ReconciliationTracker {
    participant: ParticipantName,
    last_voted: Option<StoryCursor>,
    last_closed: Option<StoryCursor>,
    finalized: bool,
}

impl ReconciliationTracker {
    pub fn new(participant: ParticipantName) -> Self {
        Self {
            participant,
            last_voted: None,
            last_closed: None,
            finalized: false,
        }
    }

    pub fn participant(&self) -> &ParticipantName {
        &self.participant
    }

    pub fn last_closed(&self) -> Option<StoryCursor> {
        self.last_closed
    }

    pub fn is_done(&self) -> bool {
        self.finalized
    }

    /// Decide the next request from a fresh view.
    pub fn decide(&self, view: &SessionView) -> PollAction {
        if self.finalized || view.finalized {
            return PollAction::Done;
        }
        let Some(story) = &view.current else {
            return PollAction::Finalize;
        };
        let cursor = story.cursor;

        match story.status {
            StoryStatus::Revealed => {
                if self.already_closed(cursor) {
                    PollAction::Wait
                } else {
                    PollAction::Close(cursor)
                }
            }
            StoryStatus::Pending | StoryStatus::Voting => {
                let voted = view
                    .participant(&self.participant)
                    .is_some_and(|me| me.has_voted);
                if voted || self.last_voted == Some(cursor) {
                    PollAction::Wait
                } else {
                    PollAction::Vote(cursor)
                }
            }
            StoryStatus::Closed => PollAction::Wait,
        }
    }

    pub fn record_vote(&mut self, cursor: StoryCursor) {
        self.last_voted = Some(cursor);
    }

    /// Remember the round a close request settled, whether this client
    /// applied it or got a replay.
    pub fn record_close(&mut self, report: &CloseReport) {
        if !self.already_closed(report.cursor) {
            self.last_closed = Some(report.cursor);
        }
    }

    pub fn record_finalize(&mut self, _finalization: &Finalization) {
        self.finalized = true;
    }

    fn already_closed(&self, cursor: StoryCursor) -> bool {
        self.last_closed.is_some_and(|closed| cursor <= closed)
    }
}
