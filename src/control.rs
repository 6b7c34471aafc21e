//! Lookup control
//!
//! `AbnLookupControl` is the per-instance controller. It owns the state, the
//! debounce scheduler and the staleness guard, and exposes the host lifecycle
//! entry points (init, update, render, outputs, teardown).
//!
//! The controller never performs I/O itself. Asking it for a due session
//! yields a `SearchSession` to look up; the result goes back in through
//! `apply_lookup` together with the session's sequence number. The driver in
//! `crate::driver` wires this to tokio, but any event loop can.
//!
//! Only two paths notify the host: input changes and real commits. Lookup
//! results, dismissals and failures are visual only.

use std::sync::Arc;

use tokio::time::Instant;

use crate::config::ControlConfig;
use crate::debounce::{DebounceScheduler, SearchSession};
use crate::error::LookupError;
use crate::host::{HostFields, HostOutputs, OutputNotifier};
use crate::lookup::CandidateRecord;
use crate::selection::SelectionOutcome;
use crate::staleness::StalenessGuard;
use crate::state::{CommittedFields, ControlState};
use crate::view::ControlView;

pub struct AbnLookupControl {
    config: ControlConfig,
    state: ControlState,
    scheduler: DebounceScheduler,
    guard: StalenessGuard,
    notifier: Arc<dyn OutputNotifier>,
    destroyed: bool,
}

impl std::fmt::Debug for AbnLookupControl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbnLookupControl")
            .field("state", &self.state)
            .field("scheduler", &self.scheduler)
            .field("guard", &self.guard)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl AbnLookupControl {
    /// Initialize from configuration and the host's prior field values
    ///
    /// A `sub_key` bound on the host takes precedence over the configured one.
    pub fn init(
        mut config: ControlConfig,
        fields: HostFields,
        notifier: Arc<dyn OutputNotifier>,
    ) -> Self {
        if let Some(key) = fields.sub_key.as_deref().filter(|k| !k.trim().is_empty()) {
            config.sub_key = Some(key.to_string());
        }
        if config.credential().is_none() {
            tracing::warn!(
                kind = LookupError::ConfigurationMissing.kind(),
                "No lookup credential configured; searches will return nothing"
            );
        }

        let scheduler = DebounceScheduler::new(config.debounce());
        Self {
            config,
            state: ControlState::new(CommittedFields::from(&fields)),
            scheduler,
            guard: StalenessGuard::new(),
            notifier,
            destroyed: false,
        }
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Host-side field values changed
    ///
    /// The input text follows the host only when the business name really
    /// changed, so an echo of our own outputs does not clobber typing.
    pub fn update_view(&mut self, fields: &HostFields) {
        if self.destroyed {
            return;
        }
        let incoming = CommittedFields::from(fields);
        if incoming.business_name != self.state.committed.business_name {
            self.state.input_text = incoming.business_name.clone();
        }
        self.state.committed = incoming;
    }

    /// Render entry point
    pub fn view(&self) -> ControlView {
        ControlView::from(&self.state)
    }

    /// Output-retrieval entry point
    pub fn get_outputs(&self) -> HostOutputs {
        HostOutputs::from(&self.state.committed)
    }

    /// The search box changed
    ///
    /// Always updates the input and notifies the host. Starts a new session,
    /// which cancels the pending trigger and invalidates in-flight lookups;
    /// returns whether a lookup is now scheduled.
    pub fn on_input_changed(&mut self, text: impl Into<String>, now: Instant) -> bool {
        if self.destroyed {
            return false;
        }
        let text = text.into();
        self.state.input_text = text.clone();
        self.notifier.output_changed();

        let seq = self.guard.begin();
        let scheduled = self.scheduler.schedule(SearchSession { query: text, seq }, now);
        tracing::trace!(seq, scheduled, "Input changed");
        scheduled
    }

    /// When the pending trigger is due, if there is one
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    /// Take the session to look up, once its quiet period has elapsed
    pub fn fire_due(&mut self, now: Instant) -> Option<SearchSession> {
        let session = self.scheduler.take_due(now)?;
        tracing::debug!(
            seq = session.seq,
            query = %session.query,
            "Debounce elapsed, issuing lookup"
        );
        Some(session)
    }

    /// Apply the outcome of the lookup for session `seq`
    ///
    /// Superseded sessions are dropped. Failures are reported and collapse to
    /// "no results". Returns whether the dropdown state was updated.
    pub fn apply_lookup(
        &mut self,
        seq: u64,
        result: Result<Vec<CandidateRecord>, LookupError>,
    ) -> bool {
        if self.destroyed {
            return false;
        }
        if let Err(stale) = self.guard.check(seq) {
            tracing::debug!(
                kind = stale.kind(),
                seq,
                latest = self.guard.latest(),
                "Discarding superseded lookup response"
            );
            return false;
        }

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                report_lookup_failure(seq, &err);
                Vec::new()
            }
        };

        tracing::debug!(seq, results = candidates.len(), "Applying lookup results");
        self.state.dropdown.set_candidates(candidates);
        true
    }

    /// The user picked row `index`
    pub fn select(&mut self, index: usize) -> Option<SelectionOutcome> {
        if self.destroyed {
            return None;
        }
        let outcome = self.state.select(index)?;
        if outcome.output_changed() {
            tracing::info!(
                business_name = %self.state.committed.business_name,
                abn = %self.state.committed.registration_number,
                "Committed business selection"
            );
            self.notifier.output_changed();
        }
        Some(outcome)
    }

    /// A pointer interaction landed outside the dropdown
    pub fn on_outside_interaction(&mut self) {
        if self.destroyed {
            return;
        }
        if self.state.dropdown_open() {
            self.dismiss();
        }
    }

    /// Close the dropdown with no selection
    pub fn dismiss(&mut self) {
        if self.destroyed {
            return;
        }
        self.state.clear();
    }

    /// Teardown: cancel the timer and orphan any in-flight lookup
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if let Some(session) = self.scheduler.cancel() {
            tracing::debug!(seq = session.seq, "Cancelled pending lookup on teardown");
        }
        self.guard.invalidate();
        self.state.dropdown.dismiss();
        self.destroyed = true;
    }
}

fn report_lookup_failure(seq: u64, err: &LookupError) {
    match err {
        LookupError::ConfigurationMissing => {
            tracing::error!(kind = err.kind(), seq, error = %err, "Company lookup skipped")
        }
        LookupError::StaleResponse { .. } => {
            tracing::debug!(kind = err.kind(), seq, "Company lookup superseded")
        }
        _ => tracing::warn!(kind = err.kind(), seq, error = %err, "Company lookup failed"),
    }
}
