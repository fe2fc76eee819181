//! Client-facing planning poker port
//!
//! [`PlanningPokerPort`] is everything a participant's client can ask of a
//! session. The in-process service implements it directly; the HTTP client
//! in the infrastructure layer implements it over the network. The polling
//! client only ever talks to this trait.

use crate::error::PokerError;
use async_trait::async_trait;
use poker_domain::{
    Card, CloseReport, Finalization, JoinOutcome, ParticipantName, SessionCode, SessionResults,
    SessionView, StoryCursor, VoteReceipt,
};

#[async_trait]
pub trait PlanningPokerPort: Send + Sync {
    /// Snapshot of the session as seen by `viewer`.
    async fn view(
        &self,
        code: &SessionCode,
        viewer: Option<&ParticipantName>,
    ) -> Result<SessionView, PokerError>;

    async fn join(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<JoinOutcome, PokerError>;

    /// Returns true if leaving revealed the current story.
    async fn leave(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<bool, PokerError>;

    async fn submit_vote(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
        card: Card,
    ) -> Result<VoteReceipt, PokerError>;

    /// Close the revealed round. `cursor` is the round the caller observed.
    async fn request_close(
        &self,
        code: &SessionCode,
        cursor: Option<StoryCursor>,
    ) -> Result<CloseReport, PokerError>;

    /// Start a new round of the current story.
    async fn reset_votes(&self, code: &SessionCode) -> Result<StoryCursor, PokerError>;

    async fn request_finalize(&self, code: &SessionCode) -> Result<Finalization, PokerError>;

    async fn results(&self, code: &SessionCode) -> Result<SessionResults, PokerError>;
}
