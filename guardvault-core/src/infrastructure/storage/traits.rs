use crate::domain::{AccountActivity, PendingWithdrawalRequest};
use crate::foundation::GuardError;
use crate::foundation::{Address, RequestId, U256};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, GuardError>;

/// A single aggregate change committed together with its activity entry.
#[derive(Clone, Debug)]
pub enum RequestMutation {
    Put(PendingWithdrawalRequest),
    Delete(RequestId),
}

impl RequestMutation {
    pub fn request_id(&self) -> &RequestId {
        match self {
            RequestMutation::Put(request) => &request.id,
            RequestMutation::Delete(id) => id,
        }
    }
}

/// Persistence collaborator for withdrawal requests and the account activity log.
///
/// Implementations are opaque key-value stores; the coordinator serializes
/// writers per request id, so implementations only need per-call atomicity.
#[async_trait]
pub trait WithdrawalStore: Send + Sync {
    async fn get(&self, id: &RequestId) -> Result<Option<PendingWithdrawalRequest>>;

    async fn put(&self, request: PendingWithdrawalRequest) -> Result<()>;

    /// Returns `Ok(true)` if a record was removed.
    async fn delete(&self, id: &RequestId) -> Result<bool>;

    /// All requests of a vault ordered by creation time.
    async fn list_by_vault(&self, vault: &Address) -> Result<Vec<PendingWithdrawalRequest>>;

    async fn append_activity(&self, entry: AccountActivity) -> Result<()>;

    /// Activities of an account ordered by timestamp.
    async fn list_activities_by_account(&self, account: &Address) -> Result<Vec<AccountActivity>>;

    /// Applies `mutation` and appends `activity` as one unit.
    ///
    /// The default composes the primitives and is only atomic if the backing
    /// store cannot fail between the two calls; stores with transactions should override it.
    async fn commit(&self, mutation: RequestMutation, activity: AccountActivity) -> Result<()> {
        match mutation {
            RequestMutation::Put(request) => self.put(request).await?,
            RequestMutation::Delete(id) => {
                self.delete(&id).await?;
            }
        }
        self.append_activity(activity).await
    }

    /// The open or executed request occupying `(vault, nonce)`, if any.
    async fn find_nonce_holder(&self, vault: &Address, nonce: &U256) -> Result<Option<PendingWithdrawalRequest>> {
        Ok(self.list_by_vault(vault).await?.into_iter().find(|request| request.request.nonce == *nonce && request.status.holds_nonce()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
