// SPDX-License-Identifier: MIT OR Apache-2.0

/// Macro to run the same test logic against all store backend implementations.
///
/// This macro takes a closure that will be executed against each store type:
/// - In-memory store (`MemoryStore`)
/// - SQLite store (`SqliteStore`), wrapped in one transaction
///
/// ## Example
///
/// ```rust
/// # use geocat_store::identities::IdentityStore;
/// # use geocat_store::assert_all_stores;
/// # async fn run() {
/// assert_all_stores!(|store| async {
///     assert!(store.ensure_user("alice").await.unwrap());
/// });
/// # }
/// ```
#[macro_export]
macro_rules! assert_all_stores {
    (|$store:ident| $test_body:expr) => {
        // Test with MemoryStore.
        {
            let $store = $crate::memory::MemoryStore::default();
            $test_body.await;
        }

        // Test with SqliteStore.
        {
            let sqlite_store = $crate::sqlite::SqliteStoreBuilder::new()
                .random_memory_url()
                // We're running in a single test thread and can't have more parallel connections.
                .max_connections(1)
                .build()
                .await
                .unwrap();
            let permit = $crate::traits::Transaction::begin(&sqlite_store)
                .await
                .unwrap();
            let $store = sqlite_store.clone();
            $test_body.await;
            $crate::traits::Transaction::commit(&sqlite_store, permit)
                .await
                .unwrap();
        }
    };
}

#[cfg(test)]
pub(crate) use helpers::*;
