//! Session domain entities

use crate::consensus::Estimate;
use crate::core::error::DomainError;
use crate::story::StoryDraft;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a session: `Open → InProgress → Closed`, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting participants, no vote cast yet
    Open,
    /// A story is being voted on or awaits close
    InProgress,
    /// Every story is closed
    Closed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Open => "open",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a story: `Pending → Voting ⇄ Revealed → Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStatus {
    /// Not yet the current story
    Pending,
    /// Current, votes hidden
    Voting,
    /// Current, everyone voted, votes visible, awaiting close
    Revealed,
    /// Final value set; never current again
    Closed,
}

impl fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoryStatus::Pending => write!(f, "pending"),
            StoryStatus::Voting => write!(f, "voting"),
            StoryStatus::Revealed => write!(f, "revealed"),
            StoryStatus::Closed => write!(f, "closed"),
        }
    }
}

/// Identifies one voting round of one story
///
/// `round` starts at 0 and increases every time the story is re-opened for
/// voting. Clients send back the cursor they observed so the server can tell
/// a racing duplicate request from a stale one. Cursors order by story first,
/// then round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoryCursor {
    pub story_index: usize,
    pub round: u32,
}

impl StoryCursor {
    pub fn new(story_index: usize, round: u32) -> Self {
        Self { story_index, round }
    }
}

impl fmt::Display for StoryCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "story {} round {}", self.story_index, self.round)
    }
}

/// A work item estimated within one session (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    index: usize,
    title: String,
    content: String,
    status: StoryStatus,
    round: u32,
    final_value: Option<Estimate>,
}

impl Story {
    pub(crate) fn from_draft(index: usize, draft: StoryDraft) -> Self {
        Self {
            index,
            title: draft.title,
            content: draft.content,
            status: StoryStatus::Pending,
            round: 0,
            final_value: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> StoryStatus {
        self.status
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn final_value(&self) -> Option<Estimate> {
        self.final_value
    }

    pub fn cursor(&self) -> StoryCursor {
        StoryCursor::new(self.index, self.round)
    }

    pub fn is_closed(&self) -> bool {
        self.status == StoryStatus::Closed
    }

    pub(crate) fn open(&mut self) {
        if self.status == StoryStatus::Pending {
            self.status = StoryStatus::Voting;
        }
    }

    pub(crate) fn reveal(&mut self) {
        if self.status == StoryStatus::Voting {
            self.status = StoryStatus::Revealed;
        }
    }

    /// Back to voting for a new round.
    pub(crate) fn reopen(&mut self) {
        if matches!(self.status, StoryStatus::Voting | StoryStatus::Revealed) {
            self.status = StoryStatus::Voting;
            self.round += 1;
        }
    }

    /// Set the final value. A closed story is immutable.
    pub(crate) fn close(&mut self, value: Estimate) -> Result<(), DomainError> {
        if self.final_value.is_some() || self.status == StoryStatus::Closed {
            return Err(DomainError::illegal(format!(
                "story {} already has a final value",
                self.index
            )));
        }
        self.final_value = Some(value);
        self.status = StoryStatus::Closed;
        Ok(())
    }
}
