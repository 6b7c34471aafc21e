//! Dropdown controller
//!
//! Two states, `Closed` and `Open`. `Open` always carries a non-empty list,
//! so "open with nothing to show" cannot be represented.

use crate::lookup::CandidateRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DropdownState {
    #[default]
    Closed,
    Open(Vec<CandidateRecord>),
}

#[derive(Debug, Default)]
pub struct DropdownController {
    state: DropdownState,
}

impl DropdownController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DropdownState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, DropdownState::Open(_))
    }

    pub fn candidates(&self) -> &[CandidateRecord] {
        match &self.state {
            DropdownState::Open(list) => list,
            DropdownState::Closed => &[],
        }
    }

    /// Show `list`, or close if it is empty
    pub fn set_candidates(&mut self, list: Vec<CandidateRecord>) {
        self.state = if list.is_empty() {
            DropdownState::Closed
        } else {
            DropdownState::Open(list)
        };
    }

    /// Close and drop the candidates; returns whether the dropdown was open
    pub fn dismiss(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = DropdownState::Closed;
        was_open
    }

    /// Take the candidate at `index` and close
    ///
    /// Out-of-range indexes and a closed dropdown leave the state untouched.
    pub fn take(&mut self, index: usize) -> Option<CandidateRecord> {
        let DropdownState::Open(list) = &mut self.state else {
            return None;
        };
        if index >= list.len() {
            return None;
        }
        let record = list.swap_remove(index);
        self.state = DropdownState::Closed;
        Some(record)
    }
}
