//! Control driver
//!
//! Runs one `AbnLookupControl` on a single tokio task, standing in for the
//! host's UI event loop. The task selects over host events, lookup
//! completions and the debounce deadline. Lookups run on spawned tasks and
//! report back `(seq, result)`; the control's staleness guard decides whether
//! a completion still applies. The control itself is never shared.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::control::AbnLookupControl;
use crate::debounce::SearchSession;
use crate::error::LookupError;
use crate::host::{HostFields, HostOutputs};
use crate::lookup::{CandidateRecord, CandidateSource};
use crate::view::ControlView;

/// Events delivered to the control by the host and rendering surface
#[derive(Debug)]
pub enum ControlEvent {
    /// The search box now contains this text
    InputChanged(String),
    /// A dropdown row was clicked
    Select(usize),
    /// Pointer interaction outside the dropdown region
    OutsideInteraction,
    /// Host-side field values changed
    HostUpdate(HostFields),
    /// Output retrieval
    GetOutputs(oneshot::Sender<HostOutputs>),
    /// Teardown
    Shutdown,
}

/// Completion of a spawned lookup
#[derive(Debug)]
struct LookupCompletion {
    seq: u64,
    result: Result<Vec<CandidateRecord>, LookupError>,
}

/// Host-side handle to a running control
#[derive(Debug, Clone)]
pub struct ControlHandle {
    events: mpsc::UnboundedSender<ControlEvent>,
    views: watch::Receiver<ControlView>,
}

impl ControlHandle {
    /// Send an event; returns false once the driver has stopped
    pub fn send(&self, event: ControlEvent) -> bool {
        self.events.send(event).is_ok()
    }

    pub fn input(&self, text: impl Into<String>) -> bool {
        self.send(ControlEvent::InputChanged(text.into()))
    }

    pub fn select(&self, index: usize) -> bool {
        self.send(ControlEvent::Select(index))
    }

    pub fn outside_interaction(&self) -> bool {
        self.send(ControlEvent::OutsideInteraction)
    }

    pub fn update(&self, fields: HostFields) -> bool {
        self.send(ControlEvent::HostUpdate(fields))
    }

    pub fn shutdown(&self) -> bool {
        self.send(ControlEvent::Shutdown)
    }

    /// Current outputs, or `None` if the driver has stopped
    pub async fn outputs(&self) -> Option<HostOutputs> {
        let (tx, rx) = oneshot::channel();
        if !self.send(ControlEvent::GetOutputs(tx)) {
            return None;
        }
        rx.await.ok()
    }

    /// Subscribe to rendered views
    pub fn views(&self) -> watch::Receiver<ControlView> {
        self.views.clone()
    }

    /// The most recently published view
    pub fn current_view(&self) -> ControlView {
        self.views.borrow().clone()
    }
}

pub struct ControlDriver {
    control: AbnLookupControl,
    source: Arc<dyn CandidateSource>,
    events: mpsc::UnboundedReceiver<ControlEvent>,
    completions_tx: mpsc::UnboundedSender<LookupCompletion>,
    completions: mpsc::UnboundedReceiver<LookupCompletion>,
    views: watch::Sender<ControlView>,
}

impl ControlDriver {
    pub fn new(
        control: AbnLookupControl,
        source: Arc<dyn CandidateSource>,
    ) -> (Self, ControlHandle) {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (completions_tx, completions) = mpsc::unbounded_channel();
        let (views, views_rx) = watch::channel(control.view());

        let driver = Self {
            control,
            source,
            events,
            completions_tx,
            completions,
            views,
        };
        let handle = ControlHandle {
            events: events_tx,
            views: views_rx,
        };
        (driver, handle)
    }

    /// Spawn the driver; the join handle yields the torn-down control
    pub fn spawn(
        control: AbnLookupControl,
        source: Arc<dyn CandidateSource>,
    ) -> (ControlHandle, JoinHandle<AbnLookupControl>) {
        let (driver, handle) = Self::new(control, source);
        (handle, tokio::spawn(driver.run()))
    }

    /// Run until `Shutdown` or until every handle is dropped
    pub async fn run(mut self) -> AbnLookupControl {
        tracing::debug!("Lookup control driver started");

        loop {
            let deadline = self.control.next_deadline();

            tokio::select! {
                event = self.events.recv() => match event {
                    Some(ControlEvent::Shutdown) | None => break,
                    Some(event) => self.handle_event(event),
                },
                Some(completion) = self.completions.recv() => {
                    self.control.apply_lookup(completion.seq, completion.result);
                }
                _ = wait_until(deadline) => {
                    if let Some(session) = self.control.fire_due(Instant::now()) {
                        self.issue(session);
                    }
                }
            }

            self.publish();
        }

        self.control.destroy();
        self.publish();
        tracing::debug!("Lookup control driver stopped");
        self.control
    }

    fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::InputChanged(text) => {
                self.control.on_input_changed(text, Instant::now());
            }
            ControlEvent::Select(index) => {
                if self.control.select(index).is_none() {
                    tracing::debug!(index, "Ignoring selection of missing row");
                }
            }
            ControlEvent::OutsideInteraction => self.control.on_outside_interaction(),
            ControlEvent::HostUpdate(fields) => self.control.update_view(&fields),
            ControlEvent::GetOutputs(reply) => {
                let _ = reply.send(self.control.get_outputs());
            }
            ControlEvent::Shutdown => {}
        }
    }

    /// Fire-and-forget lookup; the completion is checked for staleness on arrival
    ///
    /// The credential is read from the control when the session is issued, so
    /// a host-bound key applies to every lookup after it is bound.
    fn issue(&self, session: SearchSession) {
        let source = Arc::clone(&self.source);
        let completions = self.completions_tx.clone();
        let credential = self.control.config().credential().map(str::to_string);

        tokio::spawn(async move {
            let result = source
                .lookup(&session.query, credential.as_deref())
                .await;
            // The driver may already be gone; nothing to apply then
            let _ = completions.send(LookupCompletion {
                seq: session.seq,
                result,
            });
        });
    }

    fn publish(&self) {
        let next = self.control.view();
        self.views.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
