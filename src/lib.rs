//! ABN Lookup - company-name autocomplete control
//!
//! Resolves a free-text company name into a business identity record
//! (name, ABN, postcode, state, and the 9-character short identifier) by
//! querying the ABR matching-names service.
//!
//! # Architecture
//!
//! ```text
//! keystroke ──► DebounceScheduler ──► CandidateSource (async, AbnLookupClient)
//!                                            │
//!                                            ▼ (seq, candidates)
//!                                     StalenessGuard
//!                                            │
//!                                            ▼
//! outside click / row click ──► DropdownController ──► SelectionBinder
//!                                                           │
//!                                                           ▼
//!                                                 HostOutputs + notify
//! ```
//!
//! `AbnLookupControl` owns all of the above for one control instance and
//! performs no I/O. `ControlDriver` runs it on a tokio task.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use abn_lookup::{AbnLookupClient, AbnLookupControl, ControlConfig, ControlDriver, HostFields};
//!
//! let config = ControlConfig::from_env()?;
//! let client = Arc::new(AbnLookupClient::new(&config)?);
//! let control = AbnLookupControl::init(config, HostFields::default(), Arc::new(|| {}));
//!
//! let (handle, task) = ControlDriver::spawn(control, client);
//! handle.input("acme pty");
//! ```

pub mod config;
pub mod control;
pub mod debounce;
pub mod driver;
pub mod dropdown;
pub mod error;
pub mod host;
pub mod lookup;
pub mod selection;
pub mod staleness;
pub mod state;
pub mod view;

pub use config::ControlConfig;
pub use control::AbnLookupControl;
pub use debounce::{DebounceScheduler, SearchSession};
pub use driver::{ControlDriver, ControlEvent, ControlHandle};
pub use dropdown::{DropdownController, DropdownState};
pub use error::{ConfigError, LookupError};
pub use host::{HostFields, HostOutputs, OutputNotifier};
pub use lookup::{AbnLookupClient, CandidateRecord, CandidateSource};
pub use selection::{short_id, SelectionOutcome};
pub use staleness::StalenessGuard;
pub use state::{CommittedFields, ControlState};
pub use view::{CandidateRow, ControlView};
