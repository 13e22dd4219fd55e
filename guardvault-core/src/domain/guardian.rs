use crate::foundation::util::decimal;
use crate::foundation::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// A guardian credential: a non-transferable token granting co-signing authority over one vault.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guardian {
    pub address: Address,
    #[serde(with = "decimal")]
    pub token_id: U256,
    pub token_address: Address,
    #[serde(default)]
    pub granted_at_block: u64,
    #[serde(default)]
    pub granted_tx_hash: B256,
}
