//! Callback-wrapper extraction
//!
//! The ABR JSON service answers with `callback({...})`. Extraction is a plain
//! text step in front of ordinary JSON decoding and has one failure mode,
//! `MalformedResponse`.

use std::sync::LazyLock;

use regex::Regex;

use super::client::MAX_RESULTS;
use super::types::{CandidateRecord, MatchingNamesPayload};
use crate::error::LookupError;

/// Greedy up to the last `)`; the payload may span lines
static CALLBACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)callback\((.*)\)").unwrap());

/// Return the JSON text inside the callback wrapper
pub fn extract_payload(body: &str) -> Result<&str, LookupError> {
    CALLBACK_RE
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| {
            LookupError::MalformedResponse(format!(
                "expected callback(...) wrapper, got: {}",
                body.chars().take(200).collect::<String>()
            ))
        })
}

/// Parse a matching-names response body into at most `MAX_RESULTS` candidates
///
/// Remote order is preserved. A missing or empty `Names` list is "no results".
pub fn parse_matching_names(body: &str) -> Result<Vec<CandidateRecord>, LookupError> {
    let payload: MatchingNamesPayload = serde_json::from_str(extract_payload(body)?)?;

    if let Some(message) = payload.message.as_deref().filter(|m| !m.is_empty()) {
        tracing::warn!(service_message = message, "ABR lookup service returned a message");
    }

    let mut names = payload.names.unwrap_or_default();
    names.truncate(MAX_RESULTS);
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names_body(count: usize) -> String {
        let names: Vec<String> = (0..count)
            .map(|i| format!(r#"{{"Name":"Company {}","Abn":"5182475355{}"}}"#, i, i))
            .collect();
        format!(r#"callback({{"Message":"","Names":[{}]}})"#, names.join(","))
    }

    #[test]
    fn test_extract_payload() {
        assert_eq!(extract_payload(r#"callback({"a":1})"#).unwrap(), r#"{"a":1}"#);
        // Multi-line payloads and trailing whitespace
        assert_eq!(
            extract_payload("callback({\n\"a\": 1\n})\n").unwrap(),
            "{\n\"a\": 1\n}"
        );
    }

    #[test]
    fn test_extract_payload_keeps_inner_parens() {
        let body = r#"callback({"Names":[{"Name":"Acme (Aust) Pty Ltd","Abn":"1"}]})"#;
        assert_eq!(
            extract_payload(body).unwrap(),
            r#"{"Names":[{"Name":"Acme (Aust) Pty Ltd","Abn":"1"}]}"#
        );
    }

    #[test]
    fn test_missing_wrapper_is_malformed() {
        let err = parse_matching_names(r#"{"Names":[]}"#).unwrap_err();
        assert!(matches!(err, LookupError::MalformedResponse(_)));

        let err = parse_matching_names("<html>Service Unavailable</html>").unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
    }

    #[test]
    fn test_bad_json_inside_wrapper_is_transport_failure() {
        let err = parse_matching_names("callback({not json})").unwrap_err();
        assert!(matches!(err, LookupError::TransportFailure(_)));
    }

    #[test]
    fn test_truncates_to_cap_preserving_order() {
        let names = parse_matching_names(&names_body(8)).unwrap();
        assert_eq!(names.len(), MAX_RESULTS);
        let order: Vec<&str> = names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(
            order,
            vec!["Company 0", "Company 1", "Company 2", "Company 3", "Company 4"]
        );
    }

    #[test]
    fn test_empty_and_missing_names() {
        assert!(parse_matching_names(&names_body(0)).unwrap().is_empty());
        assert!(parse_matching_names(r#"callback({"Message":"Search text is not valid"})"#)
            .unwrap()
            .is_empty());
    }
}
