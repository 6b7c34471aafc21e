//! End-to-end tests for the control driver against an in-memory candidate source

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, timeout};

use abn_lookup::{
    AbnLookupControl, CandidateRecord, CandidateSource, ControlConfig, ControlDriver,
    ControlHandle, ControlView, HostFields, HostOutputs, LookupError,
};

type Scripted = (Duration, Result<Vec<CandidateRecord>, LookupError>);

/// Records every query and answers from a script (unknown queries get no results)
#[derive(Default)]
struct ScriptedSource {
    calls: Mutex<Vec<String>>,
    credentials: Mutex<Vec<Option<String>>>,
    script: HashMap<String, Scripted>,
}

impl ScriptedSource {
    fn answer(
        mut self,
        query: &str,
        delay_ms: u64,
        result: Result<Vec<CandidateRecord>, LookupError>,
    ) -> Self {
        self.script
            .insert(query.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn credentials(&self) -> Vec<Option<String>> {
        self.credentials.lock().unwrap().clone()
    }
}

#[async_trait]
impl CandidateSource for ScriptedSource {
    async fn lookup(
        &self,
        query: &str,
        credential: Option<&str>,
    ) -> Result<Vec<CandidateRecord>, LookupError> {
        self.calls.lock().unwrap().push(query.to_string());
        self.credentials
            .lock()
            .unwrap()
            .push(credential.map(str::to_string));
        match self.script.get(query) {
            Some((delay, result)) => {
                sleep(*delay).await;
                result.clone()
            }
            None => Ok(Vec::new()),
        }
    }
}

fn acme() -> CandidateRecord {
    CandidateRecord::new("Acme Pty Ltd", "51824753556")
        .with_postcode("2000")
        .with_region("NSW")
}

struct Harness {
    handle: ControlHandle,
    task: tokio::task::JoinHandle<AbnLookupControl>,
    source: Arc<ScriptedSource>,
    notified: Arc<AtomicUsize>,
}

fn start(source: ScriptedSource, debounce_ms: u64, fields: HostFields) -> Harness {
    start_with(
        source,
        ControlConfig::default()
            .with_sub_key("test-guid")
            .with_debounce_ms(debounce_ms),
        fields,
    )
}

fn start_with(source: ScriptedSource, config: ControlConfig, fields: HostFields) -> Harness {
    let source = Arc::new(source);
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&notified);

    let control = AbnLookupControl::init(
        config,
        fields,
        Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }),
    );
    let (handle, task) = ControlDriver::spawn(control, source.clone());

    Harness {
        handle,
        task,
        source,
        notified,
    }
}

async fn wait_view(handle: &ControlHandle, pred: impl FnMut(&ControlView) -> bool) -> ControlView {
    let mut views = handle.views();
    timeout(Duration::from_secs(2), async move {
        let view = views.wait_for(pred).await.map(|view| view.clone());
        view
    })
    .await
    .expect("timed out waiting for view")
    .expect("driver stopped")
}

async fn wait_calls(source: &ScriptedSource, count: usize) {
    timeout(Duration::from_secs(2), async {
        while source.calls().len() < count {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timed out waiting for lookups");
}

fn row_names(view: &ControlView) -> Vec<&str> {
    view.rows.iter().map(|r| r.name.as_str()).collect()
}

#[tokio::test]
async fn test_burst_then_select_commits() {
    let h = start(
        ScriptedSource::default().answer("acme p", 0, Ok(vec![acme()])),
        50,
        HostFields::default(),
    );

    for text in ["ac", "acm", "acme", "acme p"] {
        assert!(h.handle.input(text));
    }

    let view = wait_view(&h.handle, |v| v.dropdown_open).await;
    assert_eq!(row_names(&view), vec!["Acme Pty Ltd"]);
    assert_eq!(view.rows[0].abn, "51824753556");
    assert_eq!(h.source.calls(), vec!["acme p"]);
    assert_eq!(h.notified.load(Ordering::SeqCst), 4);

    h.handle.select(0);
    let view = wait_view(&h.handle, |v| !v.dropdown_open).await;
    assert_eq!(view.input_text, "Acme Pty Ltd");
    assert_eq!(h.notified.load(Ordering::SeqCst), 5);

    assert_eq!(
        h.handle.outputs().await.unwrap(),
        HostOutputs {
            lookup_host: "Acme Pty Ltd".into(),
            abn_input: "51824753556".into(),
            business_name: "Acme Pty Ltd".into(),
            post_code: "2000".into(),
            state: "NSW".into(),
            acn: "824753556".into(),
        }
    );

    h.handle.shutdown();
    let control = h.task.await.unwrap();
    assert!(control.is_destroyed());
}

#[tokio::test]
async fn test_configured_credential_reaches_source() {
    let h = start(
        ScriptedSource::default().answer("acme", 0, Ok(vec![acme()])),
        10,
        HostFields::default(),
    );

    h.handle.input("acme");
    wait_view(&h.handle, |v| v.dropdown_open).await;
    assert_eq!(h.source.credentials(), vec![Some("test-guid".to_string())]);
}

#[tokio::test]
async fn test_host_bound_sub_key_is_used_for_lookups() {
    // No key in config: only the host supplies one
    let h = start_with(
        ScriptedSource::default().answer("acme", 0, Ok(vec![acme()])),
        ControlConfig::default().with_debounce_ms(10),
        HostFields {
            sub_key: Some("host-guid".into()),
            ..Default::default()
        },
    );

    h.handle.input("acme");
    let view = wait_view(&h.handle, |v| v.dropdown_open).await;

    assert_eq!(row_names(&view), vec!["Acme Pty Ltd"]);
    assert_eq!(h.source.calls(), vec!["acme"]);
    assert_eq!(h.source.credentials(), vec![Some("host-guid".to_string())]);
}

#[tokio::test]
async fn test_late_response_is_discarded() {
    let h = start(
        ScriptedSource::default()
            .answer("acme", 300, Ok(vec![acme()]))
            .answer("beta", 0, Ok(vec![CandidateRecord::new("Beta Ltd", "12004044937")])),
        20,
        HostFields::default(),
    );

    h.handle.input("acme");
    wait_calls(&h.source, 1).await;
    h.handle.input("beta");

    let view = wait_view(&h.handle, |v| v.dropdown_open).await;
    assert_eq!(row_names(&view), vec!["Beta Ltd"]);

    // Let the slow "acme" lookup land
    sleep(Duration::from_millis(400)).await;
    assert_eq!(row_names(&h.handle.current_view()), vec!["Beta Ltd"]);
    assert_eq!(h.source.calls(), vec!["acme", "beta"]);
}

#[tokio::test]
async fn test_malformed_response_shows_nothing() {
    let h = start(
        ScriptedSource::default().answer(
            "acme",
            0,
            Err(LookupError::MalformedResponse("<html>".into())),
        ),
        10,
        HostFields::default(),
    );

    h.handle.input("acme");
    wait_calls(&h.source, 1).await;
    sleep(Duration::from_millis(50)).await;

    let view = h.handle.current_view();
    assert!(!view.dropdown_open);
    assert!(view.rows.is_empty());
    assert_eq!(view.input_text, "acme");

    // The driver is still alive and answering
    assert!(h.handle.outputs().await.is_some());
}

#[tokio::test]
async fn test_outside_interaction_dismisses_without_notifying() {
    let h = start(
        ScriptedSource::default().answer("acme", 0, Ok(vec![acme()])),
        10,
        HostFields {
            business_name: Some("Previous Ltd".into()),
            abn_input: Some("98765432109".into()),
            ..Default::default()
        },
    );
    let outputs_before = h.handle.outputs().await.unwrap();

    h.handle.input("acme");
    wait_view(&h.handle, |v| v.dropdown_open).await;
    let notified_before = h.notified.load(Ordering::SeqCst);

    h.handle.outside_interaction();
    let view = wait_view(&h.handle, |v| !v.dropdown_open).await;

    assert_eq!(view.input_text, "acme");
    assert_eq!(h.handle.outputs().await.unwrap(), outputs_before);
    assert_eq!(h.notified.load(Ordering::SeqCst), notified_before);
}

#[tokio::test]
async fn test_short_input_never_looks_up() {
    let h = start(ScriptedSource::default(), 10, HostFields::default());

    h.handle.input("acme");
    h.handle.input("ac");
    sleep(Duration::from_millis(80)).await;

    assert!(h.source.calls().is_empty());
    assert_eq!(h.handle.current_view().input_text, "ac");
}

#[tokio::test]
async fn test_dropping_handle_stops_driver() {
    let h = start(ScriptedSource::default(), 10, HostFields::default());
    let Harness { handle, task, .. } = h;
    drop(handle);

    let control = timeout(Duration::from_secs(2), task)
        .await
        .expect("driver did not stop")
        .unwrap();
    assert!(control.is_destroyed());
}
