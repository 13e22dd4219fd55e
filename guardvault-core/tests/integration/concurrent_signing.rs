use crate::fixtures::{guardian_keys, sample_request, ControlledRegistry, Harness, TEST_CREATOR, TEST_VAULT};
use guardvault_core::application::WithdrawalCoordinator;
use guardvault_core::domain::WithdrawalStatus;
use guardvault_core::foundation::GuardError;
use guardvault_core::infrastructure::storage::{MemoryStore, WithdrawalStore};
use guardvault_core::infrastructure::verifier::Eip191Verifier;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_guardians_approve_exactly_once() -> Result<(), GuardError> {
    for _ in 0..10 {
        let h = Harness::new();
        let request = sample_request();
        let created = h.coordinator.create_request(TEST_VAULT, request.clone(), 2, TEST_CREATOR).await?;

        let mut handles = Vec::new();
        for key in h.guardians.iter().cloned() {
            let coordinator = h.coordinator.clone();
            let id = created.id.clone();
            let signed = key.sign(&TEST_VAULT, &request);
            handles.push(tokio::spawn(async move { coordinator.submit_signature(&id, signed).await }));
        }
        for handle in handles {
            handle.await.expect("join")?;
        }

        let stored = h.coordinator.get_request(&created.id).await?;
        assert_eq!(stored.status, WithdrawalStatus::Approved);
        assert_eq!(stored.signature_count(), 3);
        let distinct: HashSet<_> = stored.signers().collect();
        assert_eq!(distinct.len(), 3);

        assert_eq!(h.observer.transitions_to(WithdrawalStatus::Approved), 1);
        let mut approving_activities = 0;
        for key in &h.guardians {
            approving_activities +=
                h.coordinator.list_activities(&key.address).await?.iter().filter(|entry| entry.details["approved"] == true).count();
        }
        assert_eq!(approving_activities, 1);
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_signature_is_recorded_once() -> Result<(), GuardError> {
    let h = Harness::new();
    let request = sample_request();
    let created = h.coordinator.create_request(TEST_VAULT, request.clone(), 2, TEST_CREATOR).await?;
    let signed = h.a().sign(&TEST_VAULT, &request);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let coordinator = h.coordinator.clone();
        let id = created.id.clone();
        let signed = signed.clone();
        handles.push(tokio::spawn(async move { coordinator.submit_signature(&id, signed).await }));
    }
    for handle in handles {
        handle.await.expect("join")?;
    }
    assert_eq!(h.coordinator.get_request(&created.id).await?.signature_count(), 1);
    assert_eq!(h.coordinator.list_activities(&h.a().address).await?.len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creation_with_same_nonce_has_single_winner() -> Result<(), GuardError> {
    let h = Harness::new();
    let mut handles = Vec::new();
    for _ in 0..8 {
        let coordinator = h.coordinator.clone();
        handles.push(tokio::spawn(async move { coordinator.create_request(TEST_VAULT, sample_request(), 2, TEST_CREATOR).await }));
    }

    let mut winners = 0u32;
    for handle in handles {
        match handle.await.expect("join") {
            Ok(_) => winners += 1,
            Err(GuardError::DuplicateNonce { .. }) => {}
            Err(other) => return Err(other),
        }
    }
    assert_eq!(winners, 1);
    assert_eq!(h.coordinator.list_by_vault(&TEST_VAULT).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn cancelled_submission_leaves_no_partial_state() -> Result<(), GuardError> {
    let store = MemoryStore::new();
    let keys = guardian_keys();
    let registry = Arc::new(ControlledRegistry::with_guardians(TEST_VAULT, &keys));
    let coordinator = WithdrawalCoordinator::new(Arc::new(store.clone()), Arc::new(Eip191Verifier::new()), registry.clone());

    let request = sample_request();
    let created = coordinator.create_request(TEST_VAULT, request.clone(), 2, TEST_CREATOR).await?;

    *registry.delay.lock().expect("delay lock") = Some(Duration::from_millis(500));
    let outcome =
        tokio::time::timeout(Duration::from_millis(20), coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)))
            .await;
    assert!(outcome.is_err(), "submission should have been cancelled while awaiting the registry");

    let stored = store.get(&created.id).await?.expect("request");
    assert!(stored.signatures.is_empty());
    assert!(store.list_activities_by_account(&keys[0].address).await?.is_empty());

    // The request lock was released by the cancelled call.
    *registry.delay.lock().expect("delay lock") = None;
    let signed = coordinator.submit_signature(&created.id, keys[0].sign(&TEST_VAULT, &request)).await?;
    assert_eq!(signed.signature_count(), 1);
    Ok(())
}
