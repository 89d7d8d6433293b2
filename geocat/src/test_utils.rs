// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_store::identities::IdentityStore;
use geocat_store::memory::MemoryStore;
use geocat_store::traits::Transaction;

use crate::registry::Registry;

pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }
}

/// In-memory registry knowing the given users and their personal workspaces.
pub async fn memory_registry(users: &[&str]) -> Registry<MemoryStore, MemoryStore> {
    let store = MemoryStore::new();

    let permit = store.begin().await.unwrap();
    for user in users {
        store.ensure_user(user).await.unwrap();
    }
    store.commit(permit).await.unwrap();

    Registry::new(store.clone(), store)
}
