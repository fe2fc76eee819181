//! Session registry
//!
//! Maps session codes to independently locked [`Session`] aggregates. The
//! outer map lock is held only long enough to clone an `Arc`; every mutation
//! then runs under that session's own mutex, so sessions never wait on each
//! other.
//!
//! Finalized sessions move to a read-only archive where views, results and
//! close replays keep working until the archive TTL runs out.

use crate::error::PokerError;
use poker_domain::core::code::CODE_SPACE;
use poker_domain::{DomainError, Session, SessionCode, SessionSummary};
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// A session still accepting changes, with its last touch time.
#[derive(Debug)]
pub struct LiveSession {
    pub session: Session,
    last_activity: Instant,
}

impl LiveSession {
    fn new(session: Session) -> Self {
        Self {
            session,
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }
}

#[derive(Debug)]
struct ArchivedSession {
    session: Arc<Session>,
    archived_at: Instant,
}

/// Where a code currently lives.
#[derive(Debug, Clone)]
pub enum SessionSlot {
    Live(Arc<Mutex<LiveSession>>),
    Archived(Arc<Session>),
}

/// Codes removed by one sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub expired_live: Vec<SessionCode>,
    pub expired_archived: Vec<SessionCode>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.expired_live.is_empty() && self.expired_archived.is_empty()
    }
}

/// Owner of every session known to this process.
///
/// Lock order is always `live` before `archive`.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    live: RwLock<HashMap<SessionCode, Arc<Mutex<LiveSession>>>>,
    archive: RwLock<HashMap<SessionCode, ArchivedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a free random code and register the session `build` makes
    /// for it.
    ///
    /// A code is free when neither a live nor an archived session holds it.
    pub async fn create<F>(&self, attempts: usize, build: F) -> Result<SessionCode, PokerError>
    where
        F: FnOnce(SessionCode) -> Result<Session, DomainError>,
    {
        let mut live = self.live.write().await;
        let archive = self.archive.read().await;

        let code = (0..attempts.max(1))
            .map(|_| random_code())
            .find(|code| !live.contains_key(code) && !archive.contains_key(code))
            .ok_or(PokerError::CodeSpaceExhausted(attempts))?;

        let session = build(code.clone())?;
        live.insert(code.clone(), Arc::new(Mutex::new(LiveSession::new(session))));
        debug!("Registered session {} ({} live)", code, live.len());
        Ok(code)
    }

    /// Register a session under the code it already carries.
    #[cfg(test)]
    pub(crate) async fn insert(&self, session: Session) -> Result<(), PokerError> {
        let mut live = self.live.write().await;
        let archive = self.archive.read().await;
        let code = session.code().clone();
        if live.contains_key(&code) || archive.contains_key(&code) {
            return Err(DomainError::InvalidInput(format!("session code {} is taken", code)).into());
        }
        live.insert(code, Arc::new(Mutex::new(LiveSession::new(session))));
        Ok(())
    }

    pub async fn get(&self, code: &SessionCode) -> Option<SessionSlot> {
        if let Some(slot) = self.live.read().await.get(code) {
            return Some(SessionSlot::Live(Arc::clone(slot)));
        }
        self.archive
            .read()
            .await
            .get(code)
            .map(|archived| SessionSlot::Archived(Arc::clone(&archived.session)))
    }

    /// Move a finalized session out of the live map.
    pub async fn archive(&self, session: Session) {
        let code = session.code().clone();
        let mut live = self.live.write().await;
        let mut archive = self.archive.write().await;
        live.remove(&code);
        archive.insert(
            code.clone(),
            ArchivedSession {
                session: Arc::new(session),
                archived_at: Instant::now(),
            },
        );
        debug!("Archived session {}", code);
    }

    /// Summaries of every session, live ones first, each group by code.
    pub async fn list(&self) -> Vec<SessionSummary> {
        let live: Vec<_> = self.live.read().await.values().cloned().collect();

        let mut summaries = Vec::with_capacity(live.len());
        for slot in live {
            summaries.push(slot.lock().await.session.summary());
        }
        summaries.sort_by(|a, b| a.code.cmp(&b.code));

        let mut archived: Vec<_> = self
            .archive
            .read()
            .await
            .values()
            .map(|archived| archived.session.summary())
            .collect();
        archived.sort_by(|a, b| a.code.cmp(&b.code));

        summaries.extend(archived);
        summaries
    }

    /// Remove live sessions idle for longer than `idle_ttl` and archived
    /// ones older than `archive_ttl`, as of `now`.
    ///
    /// A live session whose lock is held is in use and is skipped.
    pub async fn sweep(&self, now: Instant, idle_ttl: Duration, archive_ttl: Duration) -> SweepReport {
        let mut report = SweepReport::default();

        let mut live = self.live.write().await;
        live.retain(|code, slot| {
            let expired = match slot.try_lock() {
                Ok(entry) => now.saturating_duration_since(entry.last_activity()) > idle_ttl,
                Err(_) => false,
            };
            if expired {
                report.expired_live.push(code.clone());
            }
            !expired
        });

        let mut archive = self.archive.write().await;
        archive.retain(|code, archived| {
            let expired = now.saturating_duration_since(archived.archived_at) > archive_ttl;
            if expired {
                report.expired_archived.push(code.clone());
            }
            !expired
        });

        report.expired_live.sort();
        report.expired_archived.sort();
        report
    }

    pub async fn live_count(&self) -> usize {
        self.live.read().await.len()
    }

    pub async fn archived_count(&self) -> usize {
        self.archive.read().await.len()
    }
}

fn random_code() -> SessionCode {
    SessionCode::from_number(rand::thread_rng().gen_range(0..CODE_SPACE))
}
