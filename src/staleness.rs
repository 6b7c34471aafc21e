//! Issuance-ordered staleness guard
//!
//! Every new search session takes the next sequence number. A lookup
//! response is applied only if it carries the latest number; anything older
//! belongs to a superseded session and is dropped on arrival.

use crate::error::LookupError;

#[derive(Debug, Default)]
pub struct StalenessGuard {
    latest: u64,
}

impl StalenessGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session, invalidating every earlier one
    pub fn begin(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Invalidate all outstanding sessions without starting a usable one
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    /// `Ok` if `seq` is the most recent session
    pub fn check(&self, seq: u64) -> Result<(), LookupError> {
        if seq == self.latest {
            Ok(())
        } else {
            Err(LookupError::StaleResponse {
                seq,
                latest: self.latest,
            })
        }
    }
}
