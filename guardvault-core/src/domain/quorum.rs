use crate::foundation::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of recounting a request's signatures against the current guardian set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumReport {
    /// Distinct signers that still hold an active credential.
    pub count: u32,
    pub required: u32,
    pub met: bool,
    /// Signers whose credential is no longer active, in signing order.
    pub excluded: Vec<Address>,
}

impl QuorumReport {
    /// Builds a report from `(signer, currently_active)` pairs in signing order.
    ///
    /// Repeated signers are counted once.
    pub fn from_signer_status<'a>(required: u32, statuses: impl IntoIterator<Item = (&'a Address, bool)>) -> Self {
        let mut valid: HashSet<&Address> = HashSet::new();
        let mut seen: HashSet<&Address> = HashSet::new();
        let mut excluded = Vec::new();
        for (signer, active) in statuses {
            if !seen.insert(signer) {
                continue;
            }
            if active {
                valid.insert(signer);
            } else {
                excluded.push(*signer);
            }
        }
        let count = u32::try_from(valid.len()).unwrap_or(u32::MAX);
        Self { count, required, met: required > 0 && count >= required, excluded }
    }
}
