//! Host-facing property types
//!
//! The host binds six properties. `HostFields` is what it hands us on init
//! and update; `HostOutputs` is what it reads back after a notification.

use serde::{Deserialize, Serialize};

use crate::state::CommittedFields;

/// Bound property values as the host supplies them (all optional)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostFields {
    pub business_name: Option<String>,
    /// Registration number (ABN)
    pub abn_input: Option<String>,
    pub post_code: Option<String>,
    pub state: Option<String>,
    /// Ignored: the short identifier is always derived from the ABN
    pub acn: Option<String>,
    /// Lookup credential
    pub sub_key: Option<String>,
}

impl From<&HostFields> for CommittedFields {
    fn from(fields: &HostFields) -> Self {
        Self {
            business_name: fields.business_name.clone().unwrap_or_default(),
            registration_number: fields.abn_input.clone().unwrap_or_default(),
            postcode: fields.post_code.clone().unwrap_or_default(),
            region_code: fields.state.clone().unwrap_or_default(),
        }
    }
}

/// Values returned to the host for persistence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostOutputs {
    /// The lookup field itself displays the business name
    pub lookup_host: String,
    pub abn_input: String,
    pub business_name: String,
    pub post_code: String,
    pub state: String,
    pub acn: String,
}

impl From<&CommittedFields> for HostOutputs {
    fn from(committed: &CommittedFields) -> Self {
        Self {
            lookup_host: committed.business_name.clone(),
            abn_input: committed.registration_number.clone(),
            business_name: committed.business_name.clone(),
            post_code: committed.postcode.clone(),
            state: committed.region_code.clone(),
            acn: committed.short_id(),
        }
    }
}

/// The host's "output changed" callback
pub trait OutputNotifier: Send + Sync {
    fn output_changed(&self);
}

impl<F> OutputNotifier for F
where
    F: Fn() + Send + Sync,
{
    fn output_changed(&self) {
        self()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_use_host_property_names() {
        let committed = CommittedFields {
            business_name: "Acme Pty Ltd".into(),
            registration_number: "51824753556".into(),
            postcode: "2000".into(),
            region_code: "NSW".into(),
        };
        let json = serde_json::to_value(HostOutputs::from(&committed)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "lookupHost": "Acme Pty Ltd",
                "abnInput": "51824753556",
                "businessName": "Acme Pty Ltd",
                "postCode": "2000",
                "state": "NSW",
                "acn": "824753556"
            })
        );
    }

    #[test]
    fn test_host_acn_is_not_trusted() {
        let fields: HostFields = serde_json::from_value(serde_json::json!({
            "businessName": "Acme Pty Ltd",
            "abnInput": "51824753556",
            "acn": "999999999"
        }))
        .unwrap();
        let committed = CommittedFields::from(&fields);
        assert_eq!(committed.short_id(), "824753556");
        assert_eq!(committed.postcode, "");
    }
}
