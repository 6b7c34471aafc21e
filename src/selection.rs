//! Selection binder
//!
//! Turns a chosen candidate into the committed output fields, or closes the
//! dropdown without touching them.

use crate::lookup::CandidateRecord;
use crate::state::ControlState;

/// Length of the short identifier carved off the registration number
pub const SHORT_ID_LEN: usize = 9;

/// What a selection did to the observable output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Output fields changed; the host must be notified
    Committed,
    /// Only the dropdown closed
    Cleared,
}

impl SelectionOutcome {
    pub fn output_changed(self) -> bool {
        matches!(self, Self::Committed)
    }
}

/// Last `SHORT_ID_LEN` characters of `registration_number`, or empty if shorter
pub fn short_id(registration_number: &str) -> String {
    let len = registration_number.chars().count();
    if len < SHORT_ID_LEN {
        return String::new();
    }
    registration_number.chars().skip(len - SHORT_ID_LEN).collect()
}

impl ControlState {
    /// Commit `record` into the output fields and close the dropdown
    ///
    /// A record without a name is treated as "no selection".
    pub fn commit(&mut self, record: &CandidateRecord) -> SelectionOutcome {
        if record.is_empty() {
            self.clear();
            return SelectionOutcome::Cleared;
        }

        let committed = &mut self.committed;
        committed.business_name = record.name.clone();
        committed.registration_number = record.registration_number.clone();
        committed.postcode = record.postcode.clone().unwrap_or_default();
        committed.region_code = record.region_code.clone().unwrap_or_default();

        self.input_text = record.name.clone();
        self.dropdown.dismiss();
        SelectionOutcome::Committed
    }

    /// Close the dropdown, leaving input and committed fields as they are
    pub fn clear(&mut self) {
        self.dropdown.dismiss();
    }

    /// Commit the candidate at `index`; `None` if there is no such row
    pub fn select(&mut self, index: usize) -> Option<SelectionOutcome> {
        let record = self.dropdown.take(index)?;
        Some(self.commit(&record))
    }
}
