//! Read models of a session
//!
//! Everything a client may observe is projected into these types. Hidden
//! state (other participants' cards before reveal) never leaves the domain:
//! a [`ParticipantView`] carries the card only once the story is revealed.

use super::entities::{SessionStatus, StoryCursor, StoryStatus};
use crate::consensus::{AgreementMode, Estimate, Outcome};
use crate::core::code::SessionCode;
use crate::core::participant::ParticipantName;
use crate::deck::Card;
use serde::{Deserialize, Serialize};

/// What one participant looks like to the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantView {
    pub name: ParticipantName,
    pub has_voted: bool,
    /// Present only after reveal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote: Option<Card>,
}

/// The story currently up for estimation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentStoryView {
    pub cursor: StoryCursor,
    pub title: String,
    pub content: String,
    pub status: StoryStatus,
    /// The viewer's own card, visible to them before reveal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_vote: Option<Card>,
}

impl CurrentStoryView {
    pub fn is_revealed(&self) -> bool {
        self.status == StoryStatus::Revealed
    }
}

/// One line of the story list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorySummary {
    pub index: usize,
    pub title: String,
    pub status: StoryStatus,
    pub final_value: Option<Estimate>,
}

/// Full projection returned by `GetSessionView`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub code: SessionCode,
    pub title: String,
    pub mode: AgreementMode,
    pub status: SessionStatus,
    pub finalized: bool,
    /// `None` once every story is closed
    pub current: Option<CurrentStoryView>,
    pub participants: Vec<ParticipantView>,
    pub stories: Vec<StorySummary>,
    /// Most recent close, so clients that missed it can see why a story
    /// went back to voting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_close: Option<CloseReport>,
}

impl SessionView {
    pub fn cursor(&self) -> Option<StoryCursor> {
        self.current.as_ref().map(|story| story.cursor)
    }

    pub fn participant(&self, name: &ParticipantName) -> Option<&ParticipantView> {
        self.participants.iter().find(|p| &p.name == name)
    }

    pub fn closed_count(&self) -> usize {
        self.stories
            .iter()
            .filter(|story| story.status == StoryStatus::Closed)
            .count()
    }
}

/// Final (or partial) results of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    pub code: SessionCode,
    pub title: String,
    pub mode: AgreementMode,
    pub status: SessionStatus,
    /// True when every story has a final value
    pub complete: bool,
    pub stories: Vec<StorySummary>,
}

impl SessionResults {
    /// Sum of all final values, ignoring open stories.
    pub fn total(&self) -> f64 {
        self.stories
            .iter()
            .filter_map(|story| story.final_value)
            .map(|value| value.value())
            .sum()
    }
}

/// Listing entry for `ListSessions`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub code: SessionCode,
    pub title: String,
    pub mode: AgreementMode,
    pub status: SessionStatus,
    pub story_count: usize,
    pub participant_count: usize,
    pub finalized: bool,
}

/// Result of `CloseCurrentStory`
///
/// `applied` is false when the request matched an already recorded close and
/// the stored outcome was replayed without touching state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseReport {
    pub cursor: StoryCursor,
    pub outcome: Outcome,
    /// The round now open for voting, if the session is still running
    pub next: Option<StoryCursor>,
    pub session_closed: bool,
    pub applied: bool,
}

impl CloseReport {
    pub(crate) fn replayed(&self) -> Self {
        Self {
            applied: false,
            ..self.clone()
        }
    }
}

/// Result of `SubmitVote`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub cursor: StoryCursor,
    /// The card this vote superseded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced: Option<Card>,
    /// The vote completed the round and the story is now revealed
    pub revealed: bool,
}

/// Whether a join added a new participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    Joined,
    Rejoined,
}

/// Result of `FinalizeSession`
///
/// Both variants carry the same results; a repeated finalize is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "finalization", content = "results", rename_all = "snake_case")]
pub enum Finalization {
    Applied(SessionResults),
    AlreadyFinalized(SessionResults),
}

impl Finalization {
    pub fn results(&self) -> &SessionResults {
        match self {
            Finalization::Applied(results) | Finalization::AlreadyFinalized(results) => results,
        }
    }

    pub fn into_results(self) -> SessionResults {
        match self {
            Finalization::Applied(results) | Finalization::AlreadyFinalized(results) => results,
        }
    }

    pub fn was_applied(&self) -> bool {
        matches!(self, Finalization::Applied(_))
    }
}
