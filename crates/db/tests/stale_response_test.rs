//! A fetch issued for one identity must not land after switching to another.

mod common;

use std::sync::Arc;

use clarity_core::models::NewCategory;
use clarity_db::{MemoryStore, Session};
use clarity_shared::types::UserId;

use common::GatedStore;

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let store = Arc::new(GatedStore::new(MemoryStore::new()));
    let (alice, bob) = (UserId::new(), UserId::new());

    // Seed one category per identity.
    for (user, name) in [(alice, "Alice food"), (bob, "Bob food")] {
        let seeding = Session::new(store.clone());
        seeding.set_identity(Some(user)).await;
        seeding
            .categories()
            .create(&NewCategory::new(name))
            .await
            .unwrap();
    }

    let session = Session::new(store.clone());
    store.gate(alice).await;

    let sign_in_alice = session.set_identity(Some(alice));
    let switch_to_bob = async {
        store.wait_entered().await;
        session.set_identity(Some(bob)).await;
        store.release().await;
    };
    tokio::join!(sign_in_alice, switch_to_bob);

    let names: Vec<String> = session
        .categories()
        .records()
        .await
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Bob food"]);
    assert_eq!(session.identity().await, Some(bob));
    assert_eq!(session.categories().identity().await, Some(bob));
    assert_eq!(session.transactions().identity().await, Some(bob));
    assert!(!session.categories().is_loading().await);
}
