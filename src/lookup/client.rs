//! ABR matching-names HTTP client
//!
//! Issues `GET <endpoint>?name=..&maxResults=5&activeOnly=Y&guid=..` and
//! parses the callback-wrapped body. The credential travels with each call,
//! so a key bound by the host after the client was built still applies. The
//! credential check happens before any request is built, so a missing GUID
//! never touches the network.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::jsonp::parse_matching_names;
use super::types::CandidateRecord;
use crate::config::ControlConfig;
use crate::error::{ConfigError, LookupError};

/// Result cap sent to the service and enforced on the response
pub const MAX_RESULTS: usize = 5;

/// Only active ABNs are offered
pub const ACTIVE_ONLY: &str = "Y";

const CREDENTIAL_PARAM: &str = "guid";
const REDACTED: &str = "***";

/// Anything that can turn a company-name query into candidates
///
/// Implementations must be Send + Sync so lookups can run on spawned tasks.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Look up businesses matching `query` using `credential`
    ///
    /// Returns at most `MAX_RESULTS` records in remote order. An empty vector
    /// means "no results".
    async fn lookup(
        &self,
        query: &str,
        credential: Option<&str>,
    ) -> Result<Vec<CandidateRecord>, LookupError>;
}

/// ABR JSON web services client
pub struct AbnLookupClient {
    http: Client,
    endpoint: Url,
}

impl AbnLookupClient {
    /// Create a client from control configuration
    ///
    /// Only the endpoint and timeout are taken from `config`; the credential
    /// is supplied per lookup.
    pub fn new(config: &ControlConfig) -> Result<Self, ConfigError> {
        let endpoint =
            Url::parse(&config.endpoint).map_err(|source| ConfigError::InvalidEndpoint {
                url: config.endpoint.clone(),
                source,
            })?;

        let http = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self { http, endpoint })
    }

    /// Build the request URL for `query`
    fn request_url(&self, query: &str, sub_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", query)
            .append_pair("maxResults", &MAX_RESULTS.to_string())
            .append_pair("activeOnly", ACTIVE_ONLY)
            .append_pair(CREDENTIAL_PARAM, sub_key);
        url
    }
}

/// `url` with the credential parameter masked, for logging
fn redact_credential(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == CREDENTIAL_PARAM {
                REDACTED.to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[async_trait]
impl CandidateSource for AbnLookupClient {
    async fn lookup(
        &self,
        query: &str,
        credential: Option<&str>,
    ) -> Result<Vec<CandidateRecord>, LookupError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sub_key = credential
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(LookupError::ConfigurationMissing)?;

        let url = self.request_url(query, sub_key);
        tracing::debug!(url = %redact_credential(&url), query, "Issuing ABN name lookup");

        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::TransportFailure(format!(
                "ABR API error {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        let text = response.text().await?;
        let names = parse_matching_names(&text)?;

        tracing::debug!(query, results = names.len(), "ABN name lookup complete");
        Ok(names)
    }
}
