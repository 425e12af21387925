//! Per-session conversation histories.
//!
//! Each session owns one [`ConversationHistory`] behind its own async mutex.
//! A caller holds the lock for the whole turn so concurrent requests on the
//! same session are serialized, while different sessions never contend.
//!
//! Session ids come from clients, so the store is bounded: sessions idle for
//! longer than [`SessionLimits::idle_ttl`] are swept, and when more than
//! [`SessionLimits::max_sessions`] remain the least recently used go first.
//! The [`DEFAULT_SESSION`] is never evicted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use legalchat_types::chat::ConversationHistory;
use legalchat_types::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_SECS, ServerSettings};

/// Session used when a request names none.
pub const DEFAULT_SESSION: &str = "default";

pub type SharedHistory = Arc<Mutex<ConversationHistory>>;

/// Bounds on how many sessions are kept and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: usize,
    pub idle_ttl: Duration,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_sessions: DEFAULT_MAX_SESSIONS,
            idle_ttl: Duration::from_secs(DEFAULT_SESSION_IDLE_SECS),
        }
    }
}

impl From<&ServerSettings> for SessionLimits {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            max_sessions: settings.max_sessions,
            idle_ttl: Duration::from_secs(settings.session_idle_secs),
        }
    }
}

#[derive(Debug)]
struct SessionEntry {
    history: SharedHistory,
    /// Milliseconds since the store's epoch at last access.
    last_used_ms: AtomicU64,
    /// Store-wide access counter value at last access; orders LRU eviction.
    last_tick: AtomicU64,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    limits: SessionLimits,
    epoch: Instant,
    ticks: AtomicU64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(SessionLimits::default())
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            sessions: DashMap::new(),
            limits: SessionLimits {
                max_sessions: limits.max_sessions.max(1),
                ..limits
            },
            epoch: Instant::now(),
            ticks: AtomicU64::new(0),
        }
    }

    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// History handle for `id`, created empty on first use.
    pub fn session(&self, id: &str) -> SharedHistory {
        let now_ms = self.millis_at(Instant::now());
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);

        if let Some(existing) = self.sessions.get(id) {
            existing.last_used_ms.store(now_ms, Ordering::Relaxed);
            existing.last_tick.store(tick, Ordering::Relaxed);
            return Arc::clone(&existing.history);
        }

        let history = {
            let entry = self.sessions.entry(id.to_string()).or_insert_with(|| {
                debug!(session_id = %id, "new session");
                SessionEntry {
                    history: Arc::new(Mutex::new(ConversationHistory::new())),
                    last_used_ms: AtomicU64::new(now_ms),
                    last_tick: AtomicU64::new(tick),
                }
            });
            Arc::clone(&entry.history)
        };

        if self.sessions.len() > self.limits.max_sessions {
            self.evict_idle();
            self.evict_over_capacity();
        }
        history
    }

    /// Drop sessions idle for longer than the configured TTL.
    pub fn evict_idle(&self) -> usize {
        self.evict_idle_at(Instant::now())
    }

    /// [`Self::evict_idle`] as seen from `now`.
    pub fn evict_idle_at(&self, now: Instant) -> usize {
        let now_ms = self.millis_at(now);
        let ttl_ms = u64::try_from(self.limits.idle_ttl.as_millis()).unwrap_or(u64::MAX);

        let stale: Vec<String> = self
            .sessions
            .iter()
            .filter(|e| e.key() != DEFAULT_SESSION)
            .filter(|e| now_ms.saturating_sub(e.last_used_ms.load(Ordering::Relaxed)) > ttl_ms)
            .map(|e| e.key().clone())
            .collect();

        let removed = stale.into_iter().filter(|k| self.sessions.remove(k).is_some()).count();
        if removed > 0 {
            info!(removed, remaining = self.sessions.len(), "evicted idle sessions");
        }
        removed
    }

    fn evict_over_capacity(&self) {
        let excess = self.sessions.len().saturating_sub(self.limits.max_sessions);
        if excess == 0 {
            return;
        }

        let mut candidates: Vec<(u64, String)> = self
            .sessions
            .iter()
            .filter(|e| e.key() != DEFAULT_SESSION)
            .map(|e| (e.last_tick.load(Ordering::Relaxed), e.key().clone()))
            .collect();
        candidates.sort_unstable();

        let removed = candidates
            .into_iter()
            .take(excess)
            .filter(|(_, k)| self.sessions.remove(k).is_some())
            .count();
        info!(removed, remaining = self.sessions.len(), "evicted least recently used sessions");
    }

    fn millis_at(&self, at: Instant) -> u64 {
        u64::try_from(at.saturating_duration_since(self.epoch).as_millis()).unwrap_or(u64::MAX)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
