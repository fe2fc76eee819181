//! Polling client
//!
//! Without a push channel every participant's client polls the session on a
//! fixed interval and makes whatever request the
//! [`ReconciliationTracker`] decides on. Several clients racing to close the
//! same revealed story is expected; the server applies the first close and
//! replays it to everyone else.

use super::tracker::{PollAction, ReconciliationTracker};
use crate::config::PollingConfig;
use crate::error::PokerError;
use crate::ports::poker_port::PlanningPokerPort;
use poker_domain::{Card, CurrentStoryView, ParticipantName, SessionCode, SessionResults};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Picks the card a client plays on a story
pub trait VoteChooser: Send + Sync {
    fn choose(&self, story: &CurrentStoryView) -> Card;
}

impl<F> VoteChooser for F
where
    F: Fn(&CurrentStoryView) -> Card + Send + Sync,
{
    fn choose(&self, story: &CurrentStoryView) -> Card {
        self(story)
    }
}

/// Cards fixed in advance per story and round.
///
/// Round `n` of a story plays the `n`-th card listed for it, or the last one
/// once the list runs out. Stories without a script play `fallback`.
#[derive(Debug, Clone)]
pub struct ScriptedVotes {
    by_story: BTreeMap<usize, Vec<Card>>,
    fallback: Card,
}

impl ScriptedVotes {
    pub fn new(fallback: Card) -> Self {
        Self {
            by_story: BTreeMap::new(),
            fallback,
        }
    }

    pub fn with_story(mut self, story_index: usize, rounds: Vec<Card>) -> Self {
        self.by_story.insert(story_index, rounds);
        self
    }
}

impl VoteChooser for ScriptedVotes {
    fn choose(&self, story: &CurrentStoryView) -> Card {
        let round = story.cursor.round as usize;
        self.by_story
            .get(&story.cursor.story_index)
            .and_then(|rounds| rounds.get(round).or(rounds.last()))
            .copied()
            .unwrap_or(self.fallback)
    }
}

/// What one client did over its lifetime
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollReport {
    pub polls: usize,
    pub votes_cast: usize,
    pub closes_applied: usize,
    pub closes_replayed: usize,
    /// This client's finalize request was the one applied
    pub finalized_here: bool,
    /// Set once the session is finalized
    pub results: Option<SessionResults>,
    /// Stopped by cancellation or the poll limit before finalization
    pub interrupted: bool,
}

/// One participant's poll → decide → act loop
pub struct PollingClient<P: PlanningPokerPort + ?Sized> {
    port: Arc<P>,
    code: SessionCode,
    chooser: Arc<dyn VoteChooser>,
    config: PollingConfig,
    tracker: ReconciliationTracker,
}

impl<P: PlanningPokerPort + ?Sized> PollingClient<P> {
    pub fn new(
        port: Arc<P>,
        code: SessionCode,
        participant: ParticipantName,
        chooser: Arc<dyn VoteChooser>,
    ) -> Self {
        Self {
            port,
            code,
            chooser,
            config: PollingConfig::default(),
            tracker: ReconciliationTracker::new(participant),
        }
    }

    pub fn with_config(mut self, config: PollingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn participant(&self) -> &ParticipantName {
        self.tracker.participant()
    }

    /// Join, then poll until the session is finalized, `cancel` fires or the
    /// poll limit is reached.
    ///
    /// Transient failures (lost races, transport errors) are retried on the
    /// next tick; anything else ends the loop with the error.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<PollReport, PokerError> {
        let me = self.tracker.participant().clone();
        self.port.join(&self.code, &me).await?;
        info!("{} polling session {}", me, self.code);

        let mut report = PollReport::default();
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    report.interrupted = true;
                    break;
                }
                _ = ticker.tick() => {}
            }

            if self.config.max_polls.is_some_and(|max| report.polls >= max) {
                report.interrupted = true;
                break;
            }
            report.polls += 1;

            match self.poll_once(&me, &mut report).await {
                Ok(true) => break,
                Ok(false) => {}
                Err(e) if e.is_retryable() => {
                    debug!("{} will retry after: {}", me, e);
                }
                Err(e) => {
                    warn!("{} stopped polling {}: {}", me, self.code, e);
                    return Err(e);
                }
            }
        }

        Ok(report)
    }

    /// One poll. Returns true once there is nothing left to do.
    async fn poll_once(
        &mut self,
        me: &ParticipantName,
        report: &mut PollReport,
    ) -> Result<bool, PokerError> {
        let view = self.port.view(&self.code, Some(me)).await?;

        match self.tracker.decide(&view) {
            PollAction::Vote(cursor) => {
                let Some(story) = &view.current else {
                    return Ok(false);
                };
                let card = self.chooser.choose(story);
                let receipt = self.port.submit_vote(&self.code, me, card).await?;
                self.tracker.record_vote(receipt.cursor);
                report.votes_cast += 1;
                debug!("{} voted {} on {}", me, card, cursor);
                Ok(false)
            }
            PollAction::Close(cursor) => {
                let close = self.port.request_close(&self.code, Some(cursor)).await?;
                self.tracker.record_close(&close);
                if close.applied {
                    report.closes_applied += 1;
                    info!("{} closed {}: {}", me, close.cursor, close.outcome);
                } else {
                    report.closes_replayed += 1;
                }
                Ok(false)
            }
            PollAction::Finalize => {
                let finalization = self.port.request_finalize(&self.code).await?;
                self.tracker.record_finalize(&finalization);
                report.finalized_here = finalization.was_applied();
                report.results = Some(finalization.into_results());
                Ok(true)
            }
            PollAction::Wait => Ok(false),
            PollAction::Done => {
                report.results = Some(self.port.results(&self.code).await?);
                Ok(true)
            }
        }
    }
}
