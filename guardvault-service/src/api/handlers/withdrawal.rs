use crate::api::state::RpcState;
use guardvault_core::domain::canonical::payload_hash;
use guardvault_core::domain::{PendingWithdrawalRequest, QuorumReport, SignedWithdrawal, WithdrawalRequest};
use guardvault_core::foundation::{Address, GuardError, RequestId, B256};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateParams {
    pub vault: Address,
    pub request: WithdrawalRequest,
    pub quorum: u32,
    pub creator: Address,
}

#[derive(Debug, Deserialize)]
pub struct SignParams {
    pub request_id: RequestId,
    pub signed: SignedWithdrawal,
}

#[derive(Debug, Deserialize)]
pub struct RequestIdParams {
    pub request_id: RequestId,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteParams {
    pub request_id: RequestId,
    pub tx_hash: B256,
}

#[derive(Debug, Deserialize)]
pub struct ActorParams {
    pub request_id: RequestId,
    pub actor: Address,
}

#[derive(Debug, Deserialize)]
pub struct VaultParams {
    pub vault: Address,
}

/// Wire form of a request aggregate.
#[derive(Debug, Serialize)]
pub struct RequestView {
    #[serde(flatten)]
    pub request: PendingWithdrawalRequest,
    pub signature_count: usize,
    /// keccak-256 of the canonical signing payload.
    pub payload_hash: B256,
}

impl From<PendingWithdrawalRequest> for RequestView {
    fn from(request: PendingWithdrawalRequest) -> Self {
        let payload_hash = payload_hash(&request.vault, &request.request);
        Self { signature_count: request.signature_count(), payload_hash, request }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub deleted: bool,
}

pub async fn create(state: &RpcState, params: CreateParams) -> Result<RequestView, GuardError> {
    let created = state.coordinator.create_request(params.vault, params.request, params.quorum, params.creator).await?;
    info!("rpc withdrawal.create ok request_id={} vault={}", created.id, created.vault);
    Ok(created.into())
}

pub async fn sign(state: &RpcState, params: SignParams) -> Result<RequestView, GuardError> {
    Ok(state.coordinator.submit_signature(&params.request_id, params.signed).await?.into())
}

pub async fn get(state: &RpcState, params: RequestIdParams) -> Result<RequestView, GuardError> {
    Ok(state.coordinator.get_request(&params.request_id).await?.into())
}

pub async fn quorum(state: &RpcState, params: RequestIdParams) -> Result<QuorumReport, GuardError> {
    state.coordinator.evaluate_quorum(&params.request_id).await
}

pub async fn execute(state: &RpcState, params: ExecuteParams) -> Result<RequestView, GuardError> {
    Ok(state.coordinator.mark_executed(&params.request_id, params.tx_hash).await?.into())
}

pub async fn reject(state: &RpcState, params: ActorParams) -> Result<RequestView, GuardError> {
    Ok(state.coordinator.reject(&params.request_id, params.actor).await?.into())
}

pub async fn delete(state: &RpcState, params: ActorParams) -> Result<DeleteResult, GuardError> {
    state.coordinator.delete(&params.request_id, params.actor).await?;
    Ok(DeleteResult { deleted: true })
}

pub async fn list_by_vault(state: &RpcState, params: VaultParams) -> Result<Vec<RequestView>, GuardError> {
    Ok(state.coordinator.list_by_vault(&params.vault).await?.into_iter().map(RequestView::from).collect())
}
