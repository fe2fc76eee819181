//! Planning poker use case
//!
//! [`PlanningPokerService`] is the inbound boundary of the core: every
//! operation a transport exposes goes through here. It resolves the session
//! in the [`SessionRegistry`], applies the operation under that session's
//! lock, records the audit trail, and hands finalized results to the
//! exporter.

use crate::config::RegistryConfig;
use crate::error::PokerError;
use crate::ports::poker_port::PlanningPokerPort;
use crate::ports::results_exporter::{NoResultsExporter, ResultsExporter};
use crate::ports::session_event_logger::{
    NoSessionEventLogger, SessionEvent, SessionEventLogger,
};
use crate::registry::{SessionRegistry, SessionSlot};
use async_trait::async_trait;
use poker_domain::{
    AgreementMode, Card, CloseReport, ConsensusEngine, DomainError, Finalization, JoinOutcome,
    ParticipantName, Session, SessionCode, SessionResults, SessionSummary, SessionView,
    StoryCursor, StoryDraft, VoteReceipt,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Input for the CreateSession operation
#[derive(Debug, Clone)]
pub struct CreateSessionInput {
    pub title: String,
    pub stories: Vec<StoryDraft>,
    /// Falls back to the configured default mode
    pub mode: Option<AgreementMode>,
}

impl CreateSessionInput {
    pub fn new(title: impl Into<String>, stories: Vec<StoryDraft>) -> Self {
        Self {
            title: title.into(),
            stories,
            mode: None,
        }
    }

    pub fn with_mode(mut self, mode: AgreementMode) -> Self {
        self.mode = Some(mode);
        self
    }
}

/// Use case serving every planning poker operation
pub struct PlanningPokerService {
    registry: Arc<SessionRegistry>,
    config: RegistryConfig,
    events: Arc<dyn SessionEventLogger>,
    exporter: Arc<dyn ResultsExporter>,
}

impl PlanningPokerService {
    pub fn new(registry: Arc<SessionRegistry>, config: RegistryConfig) -> Self {
        Self {
            registry,
            config,
            events: Arc::new(NoSessionEventLogger),
            exporter: Arc::new(NoResultsExporter),
        }
    }

    pub fn with_event_logger(mut self, events: Arc<dyn SessionEventLogger>) -> Self {
        self.events = events;
        self
    }

    pub fn with_results_exporter(mut self, exporter: Arc<dyn ResultsExporter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ==================== Operations ====================

    pub async fn create_session(
        &self,
        input: CreateSessionInput,
    ) -> Result<SessionSummary, PokerError> {
        let mode = input.mode.unwrap_or(self.config.default_mode);
        let engine = ConsensusEngine::new(self.config.rounding);
        let title = input.title;
        let stories = input.stories;

        let code = self
            .registry
            .create(self.config.code_attempts, |code| {
                Session::new(code, &title, stories, mode, engine)
            })
            .await?;
        let summary = self.with_live(&code, |session| Ok(session.summary())).await?;

        info!(
            "Created session {} '{}' ({} stories, {})",
            code, summary.title, summary.story_count, mode
        );
        self.events.log(SessionEvent::new(
            "session_created",
            &code,
            json!({
                "title": summary.title,
                "mode": mode.as_str(),
                "rounding": self.config.rounding.to_string(),
                "story_count": summary.story_count,
            }),
        ));
        Ok(summary)
    }

    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        self.registry.list().await
    }

    pub async fn join_session(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<JoinOutcome, PokerError> {
        let name = participant.clone();
        let outcome = self
            .with_live(code, move |session| session.join(name))
            .await?;

        if outcome == JoinOutcome::Joined {
            debug!("{} joined session {}", participant, code);
            self.events.log(SessionEvent::new(
                "participant_joined",
                code,
                json!({ "participant": participant.as_str() }),
            ));
        }
        Ok(outcome)
    }

    pub async fn leave_session(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<bool, PokerError> {
        let (revealed, cursor) = self
            .with_live(code, |session| {
                let revealed = session.leave(participant)?;
                Ok((revealed, session.cursor()))
            })
            .await?;

        debug!("{} left session {}", participant, code);
        self.events.log(SessionEvent::new(
            "participant_left",
            code,
            json!({ "participant": participant.as_str() }),
        ));
        if revealed && let Some(cursor) = cursor {
            self.log_revealed(code, cursor);
        }
        Ok(revealed)
    }

    pub async fn submit_vote(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
        card: Card,
    ) -> Result<VoteReceipt, PokerError> {
        let receipt = self
            .with_live(code, |session| session.submit_vote(participant, card))
            .await?;

        debug!(
            "Vote from {} on session {} {}",
            participant, code, receipt.cursor
        );
        self.events.log(SessionEvent::new(
            "vote_submitted",
            code,
            json!({
                "participant": participant.as_str(),
                "story_index": receipt.cursor.story_index,
                "round": receipt.cursor.round,
                "revote": receipt.replaced.is_some(),
            }),
        ));
        if receipt.revealed {
            self.log_revealed(code, receipt.cursor);
        }
        Ok(receipt)
    }

    /// `RequestClose`: close the revealed round, or replay the recorded
    /// outcome when another caller already did.
    pub async fn request_close(
        &self,
        code: &SessionCode,
        cursor: Option<StoryCursor>,
    ) -> Result<CloseReport, PokerError> {
        let report = match self.slot(code).await? {
            SessionSlot::Live(slot) => {
                let mut entry = slot.lock().await;
                let report = entry.session.request_close(cursor)?;
                if report.applied {
                    entry.touch();
                }
                report
            }
            SessionSlot::Archived(session) => {
                let recorded = match cursor {
                    Some(cursor) => session.recorded_close(cursor),
                    None => session.close_history().last().map(|r| CloseReport {
                        applied: false,
                        ..r.clone()
                    }),
                };
                recorded.ok_or_else(|| DomainError::SessionAlreadyClosed(code.to_string()))?
            }
        };

        if report.applied {
            info!(
                "Session {} {}: {}",
                code, report.cursor, report.outcome
            );
            self.events.log(SessionEvent::new(
                "story_closed",
                code,
                json!({
                    "story_index": report.cursor.story_index,
                    "round": report.cursor.round,
                    "outcome": report.outcome,
                    "session_closed": report.session_closed,
                }),
            ));
        } else {
            debug!("Replayed close of {} on session {}", report.cursor, code);
        }
        Ok(report)
    }

    pub async fn reset_votes(&self, code: &SessionCode) -> Result<StoryCursor, PokerError> {
        let cursor = self.with_live(code, Session::reset_votes).await?;

        info!("Session {} votes reset, now {}", code, cursor);
        self.events.log(SessionEvent::new(
            "votes_reset",
            code,
            json!({ "story_index": cursor.story_index, "round": cursor.round }),
        ));
        Ok(cursor)
    }

    /// `RequestFinalize`: finalize once, archive, export. Repeated calls get
    /// the same results back.
    pub async fn request_finalize(&self, code: &SessionCode) -> Result<Finalization, PokerError> {
        let slot = match self.slot(code).await? {
            SessionSlot::Archived(session) => {
                return Ok(Finalization::AlreadyFinalized(session.results()));
            }
            SessionSlot::Live(slot) => slot,
        };

        let (finalization, snapshot) = {
            let mut entry = slot.lock().await;
            let finalization = entry.session.finalize()?;
            entry.touch();
            let snapshot = finalization.was_applied().then(|| entry.session.clone());
            (finalization, snapshot)
        };

        if let Some(session) = snapshot {
            self.registry.archive(session).await;
            info!("Session {} finalized", code);
            self.events.log(SessionEvent::new(
                "session_finalized",
                code,
                json!({
                    "stories": finalization.results().stories.len(),
                    "total": finalization.results().total(),
                }),
            ));
            match self.exporter.export(finalization.results()).await {
                Ok(location) if !location.is_empty() => {
                    info!("Exported results of {} to {}", code, location)
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to export results of {}: {}", code, e),
            }
        }
        Ok(finalization)
    }

    /// `GetSessionView`: read-only snapshot for `viewer`. Polling keeps a
    /// live session from being swept as idle.
    pub async fn session_view(
        &self,
        code: &SessionCode,
        viewer: Option<&ParticipantName>,
    ) -> Result<SessionView, PokerError> {
        match self.slot(code).await? {
            SessionSlot::Live(slot) => {
                let mut entry = slot.lock().await;
                entry.touch();
                Ok(entry.session.view(viewer))
            }
            SessionSlot::Archived(session) => Ok(session.view(viewer)),
        }
    }

    pub async fn results(&self, code: &SessionCode) -> Result<SessionResults, PokerError> {
        match self.slot(code).await? {
            SessionSlot::Live(slot) => {
                let mut entry = slot.lock().await;
                entry.touch();
                Ok(entry.session.results())
            }
            SessionSlot::Archived(session) => Ok(session.results()),
        }
    }

    // ==================== Internals ====================

    async fn slot(&self, code: &SessionCode) -> Result<SessionSlot, PokerError> {
        self.registry
            .get(code)
            .await
            .ok_or_else(|| DomainError::SessionNotFound(code.to_string()).into())
    }

    /// Run a mutation under the session lock. Archived sessions refuse
    /// every change.
    async fn with_live<T, F>(&self, code: &SessionCode, apply: F) -> Result<T, PokerError>
    where
        F: FnOnce(&mut Session) -> Result<T, DomainError>,
    {
        match self.slot(code).await? {
            SessionSlot::Live(slot) => {
                let mut entry = slot.lock().await;
                let value = apply(&mut entry.session)?;
                entry.touch();
                Ok(value)
            }
            SessionSlot::Archived(_) => {
                Err(DomainError::SessionAlreadyClosed(code.to_string()).into())
            }
        }
    }

    fn log_revealed(&self, code: &SessionCode, cursor: StoryCursor) {
        debug!("Session {} revealed {}", code, cursor);
        self.events.log(SessionEvent::new(
            "story_revealed",
            code,
            json!({ "story_index": cursor.story_index, "round": cursor.round }),
        ));
    }
}

#[async_trait]
impl PlanningPokerPort for PlanningPokerService {
    async fn view(
        &self,
        code: &SessionCode,
        viewer: Option<&ParticipantName>,
    ) -> Result<SessionView, PokerError> {
        self.session_view(code, viewer).await
    }

    async fn join(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<JoinOutcome, PokerError> {
        self.join_session(code, participant).await
    }

    async fn leave(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
    ) -> Result<bool, PokerError> {
        self.leave_session(code, participant).await
    }

    async fn submit_vote(
        &self,
        code: &SessionCode,
        participant: &ParticipantName,
        card: Card,
    ) -> Result<VoteReceipt, PokerError> {
        PlanningPokerService::submit_vote(self, code, participant, card).await
    }

    async fn request_close(
        &self,
        code: &SessionCode,
        cursor: Option<StoryCursor>,
    ) -> Result<CloseReport, PokerError> {
        PlanningPokerService::request_close(self, code, cursor).await
    }

    async fn reset_votes(&self, code: &SessionCode) -> Result<StoryCursor, PokerError> {
        PlanningPokerService::reset_votes(self, code).await
    }

    async fn request_finalize(&self, code: &SessionCode) -> Result<Finalization, PokerError> {
        PlanningPokerService::request_finalize(self, code).await
    }

    async fn results(&self, code: &SessionCode) -> Result<SessionResults, PokerError> {
        PlanningPokerService::results(self, code).await
    }
}
