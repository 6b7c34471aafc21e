//! Matching-names payload types
//!
//! Field names follow the ABR JSON service (PascalCase). Anything the
//! control does not use (`Score`, `NameType`, `AbnStatus`, ...) is ignored
//! on decode.

use serde::{Deserialize, Serialize};

/// One business matched by the remote registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "Name")]
    pub name: String,
    /// The ABN
    #[serde(rename = "Abn")]
    pub registration_number: String,
    #[serde(rename = "Postcode", default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// State or territory code (NSW, VIC, ...)
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
}

impl CandidateRecord {
    pub fn new(name: impl Into<String>, registration_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registration_number: registration_number.into(),
            postcode: None,
            region_code: None,
        }
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    pub fn with_region(mut self, region_code: impl Into<String>) -> Self {
        self.region_code = Some(region_code.into());
        self
    }

    /// A record without a name carries no selection
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

/// The JSON object inside the `callback(...)` wrapper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingNamesPayload {
    /// Service-level message; non-empty when the GUID is rejected
    #[serde(rename = "Message", default)]
    pub message: Option<String>,
    #[serde(rename = "Names", default)]
    pub names: Option<Vec<CandidateRecord>>,
}
