use crate::fixtures::{guardian_keys, sample_request, ControlledRegistry, FailingCommitStore, WithdrawalRequestBuilder, TEST_CREATOR, TEST_VAULT};
use guardvault_core::application::WithdrawalCoordinator;
use guardvault_core::domain::WithdrawalStatus;
use guardvault_core::foundation::GuardError;
use guardvault_core::infrastructure::registry::StaticGuardianRegistry;
use guardvault_core::infrastructure::storage::WithdrawalStore;
use guardvault_core::infrastructure::verifier::Eip191Verifier;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn registry_failure_is_dependency_unavailable_and_retryable() -> Result<(), GuardError> {
    let keys = guardian_keys();
    let registry = Arc::new(ControlledRegistry::with_guardians(TEST_VAULT, &keys));
    let store = FailingCommitStore::new();
    let coordinator = WithdrawalCoordinator::new(Arc::new(store.clone()), Arc::new(Eip191Verifier::new()), registry.clone());

    let request = sample_request();
    let created = coordinator.create_request(TEST_VAULT, request.clone(), 2, TEST_CREATOR).await?;

    registry.fail.store(true, Ordering::SeqCst);
    let err = coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)).await.expect_err("registry down");
    assert!(matches!(err, GuardError::DependencyUnavailable { .. }), "{err:?}");
    assert!(err.is_retryable());
    assert!(store.get(&created.id).await?.expect("request").signatures.is_empty());

    // No signatures yet, so there is nothing to look up.
    assert_eq!(coordinator.evaluate_quorum(&created.id).await?.count, 0);

    registry.fail.store(false, Ordering::SeqCst);
    let signed = coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)).await?;
    assert_eq!(signed.signature_count(), 1);
    Ok(())
}

#[tokio::test]
async fn failed_commit_has_no_effect() -> Result<(), GuardError> {
    let keys = guardian_keys();
    let registry = Arc::new(StaticGuardianRegistry::new());
    for key in &keys {
        registry.grant(TEST_VAULT, key.guardian())?;
    }
    let store = FailingCommitStore::new();
    let coordinator = WithdrawalCoordinator::new(Arc::new(store.clone()), Arc::new(Eip191Verifier::new()), registry);

    let request = sample_request();
    let created = coordinator.create_request(TEST_VAULT, request.clone(), 1, TEST_CREATOR).await?;

    store.fail_commit.store(true, Ordering::SeqCst);
    let err = coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)).await.expect_err("commit fails");
    assert!(matches!(err, GuardError::DependencyUnavailable { .. }));

    let stored = store.get(&created.id).await?.expect("request");
    assert_eq!(stored.status, WithdrawalStatus::Pending);
    assert!(stored.signatures.is_empty());
    assert!(store.list_activities_by_account(&keys[0].address).await?.is_empty());

    let second = WithdrawalRequestBuilder::default().nonce(77).build();
    assert!(coordinator.create_request(TEST_VAULT, second, 1, TEST_CREATOR).await.is_err());
    assert_eq!(store.list_by_vault(&TEST_VAULT).await?.len(), 1);

    store.fail_commit.store(false, Ordering::SeqCst);
    let approved = coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)).await?;
    assert_eq!(approved.status, WithdrawalStatus::Approved);
    Ok(())
}
