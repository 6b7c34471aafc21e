//! ABR name lookup
//!
//! This module provides:
//! - `CandidateRecord` and the wire payload of the matching-names endpoint
//! - The callback-wrapper (JSONP) parser
//! - `AbnLookupClient`, the HTTP implementation of `CandidateSource`

pub mod client;
pub mod jsonp;
pub mod types;

pub use client::{AbnLookupClient, CandidateSource, ACTIVE_ONLY, MAX_RESULTS};
pub use jsonp::parse_matching_names;
pub use types::{CandidateRecord, MatchingNamesPayload};
