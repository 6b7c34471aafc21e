//! Control state
//!
//! `ControlState` is the single owned value behind one control instance.
//! The host persists only `committed`; candidates and dropdown visibility
//! live and die with the instance.

use serde::Serialize;

use crate::dropdown::DropdownController;
use crate::selection::short_id;

/// Durable output fields
///
/// The short identifier is derived from `registration_number` on read and
/// is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommittedFields {
    pub business_name: String,
    pub registration_number: String,
    pub postcode: String,
    pub region_code: String,
}

impl CommittedFields {
    /// Last 9 characters of the registration number, or empty
    pub fn short_id(&self) -> String {
        short_id(&self.registration_number)
    }
}

#[derive(Debug, Default)]
pub struct ControlState {
    /// Text shown in the search box
    pub input_text: String,
    pub dropdown: DropdownController,
    pub committed: CommittedFields,
}

impl ControlState {
    pub fn new(committed: CommittedFields) -> Self {
        Self {
            input_text: committed.business_name.clone(),
            dropdown: DropdownController::new(),
            committed,
        }
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown.is_open()
    }
}
