//! Debounce scheduler
//!
//! Holds at most one pending trigger. The scheduler only tracks deadlines;
//! whoever owns the event loop sleeps until `deadline()` and then calls
//! `take_due()`.

use std::time::Duration;

use tokio::time::Instant;

/// Trimmed queries must be longer than this to trigger a lookup
pub const MIN_QUERY_CHARS: usize = 2;

/// One debounce/lookup attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    /// Query text exactly as typed
    pub query: String,
    /// Issuance sequence number from the staleness guard
    pub seq: u64,
}

#[derive(Debug)]
struct PendingTrigger {
    session: SearchSession,
    due: Instant,
}

#[derive(Debug)]
pub struct DebounceScheduler {
    quiet_period: Duration,
    pending: Option<PendingTrigger>,
}

/// Whether `text` is long enough to search for
pub fn qualifies(text: &str) -> bool {
    text.trim().chars().count() > MIN_QUERY_CHARS
}

impl DebounceScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Replace any pending trigger with `session`
    ///
    /// The previous trigger is always cancelled. A new one is only armed when
    /// the query qualifies; returns whether it was.
    pub fn schedule(&mut self, session: SearchSession, now: Instant) -> bool {
        if let Some(previous) = self.pending.take() {
            tracing::trace!(seq = previous.session.seq, "Cancelled pending lookup trigger");
        }

        if !qualifies(&session.query) {
            return false;
        }

        self.pending = Some(PendingTrigger {
            session,
            due: now + self.quiet_period,
        });
        true
    }

    /// Drop the pending trigger, if any
    pub fn cancel(&mut self) -> Option<SearchSession> {
        self.pending.take().map(|p| p.session)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending session if its quiet period has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<SearchSession> {
        match &self.pending {
            Some(p) if p.due <= now => self.pending.take().map(|p| p.session),
            _ => None,
        }
    }
}
