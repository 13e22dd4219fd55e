use crate::api::state::RpcState;
use guardvault_core::domain::AccountActivity;
use guardvault_core::foundation::{Address, GuardError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AccountParams {
    pub account: Address,
}

pub async fn list_by_account(state: &RpcState, params: AccountParams) -> Result<Vec<AccountActivity>, GuardError> {
    state.coordinator.list_activities(&params.account).await
}
