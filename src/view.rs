//! Render snapshot handed to the rendering surface

use serde::Serialize;

use crate::state::ControlState;

pub const PLACEHOLDER: &str = "Enter company name to search...";

/// One dropdown row: name on top, ABN underneath
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRow {
    pub name: String,
    pub abn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlView {
    pub input_text: String,
    pub placeholder: &'static str,
    pub dropdown_open: bool,
    pub rows: Vec<CandidateRow>,
}

impl Default for ControlView {
    fn default() -> Self {
        Self {
            input_text: String::new(),
            placeholder: PLACEHOLDER,
            dropdown_open: false,
            rows: Vec::new(),
        }
    }
}

impl From<&ControlState> for ControlView {
    fn from(state: &ControlState) -> Self {
        Self {
            input_text: state.input_text.clone(),
            placeholder: PLACEHOLDER,
            dropdown_open: state.dropdown_open(),
            rows: state
                .dropdown
                .candidates()
                .iter()
                .map(|c| CandidateRow {
                    name: c.name.clone(),
                    abn: c.registration_number.clone(),
                })
                .collect(),
        }
    }
}
