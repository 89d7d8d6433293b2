// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::identities::{IdentitiesMemoryStore, IdentitiesSnapshot};
use crate::publications::{PublicationsMemoryStore, PublicationsSnapshot};

/// In-memory store.
///
/// This does not persist data permamently, all changes are lost when the process ends. Use this
/// only in development or test contexts.
///
/// Transactions are serialized with a semaphore just like in the SQLite store. Beginning a
/// transaction takes a snapshot of all data which gets restored on rollback.
#[derive(Clone)]
pub struct MemoryStore {
    pub publications: PublicationsMemoryStore,
    pub identities: IdentitiesMemoryStore,
    snapshot: Rc<RefCell<Option<Snapshot>>>,
    semaphore: Arc<Semaphore>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            publications: PublicationsMemoryStore::new(),
            identities: IdentitiesMemoryStore::new(),
            snapshot: Rc::default(),
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

struct Snapshot {
    publications: PublicationsSnapshot,
    identities: IdentitiesSnapshot,
}

#[allow(unused)]
pub struct MemoryPermit(OwnedSemaphorePermit);

impl crate::traits::Transaction for MemoryStore {
    type Error = Infallible;

    type Permit = MemoryPermit;

    async fn begin(&self) -> Result<MemoryPermit, Infallible> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("if semaphore is closed then the whole struct is gone as well");

        self.snapshot.replace(Some(Snapshot {
            publications: self.publications.snapshot(),
            identities: self.identities.snapshot(),
        }));

        Ok(MemoryPermit(permit))
    }

    async fn rollback(&self, permit: MemoryPermit) -> Result<(), Infallible> {
        let Some(snapshot) = self.snapshot.take() else {
            panic!("can't have no snapshot without dropping permit first")
        };

        self.publications.restore(snapshot.publications);
        self.identities.restore(snapshot.identities);

        drop(permit);

        Ok(())
    }

    async fn commit(&self, permit: MemoryPermit) -> Result<(), Infallible> {
        self.snapshot.take();
        drop(permit);
        Ok(())
    }
}

// Store trait implementations are in the regarding modules, see `publications` and `identities`.

#[cfg(test)]
mod tests {
    use geocat_core::{NewPublication, PublicationKey, PublicationType};

    use crate::identities::IdentityStore;
    use crate::memory::MemoryStore;
    use crate::publications::PublicationStore;
    use crate::test_utils::publication;
    use crate::traits::Transaction;

    #[tokio::test]
    async fn rollback_restores_snapshot() {
        let store = MemoryStore::new();

        let permit = store.begin().await.unwrap();
        store.ensure_user("alice").await.unwrap();
        store
            .insert_publication(publication("alice", NewPublication::new("first")))
            .await
            .unwrap();
        store.commit(permit).await.unwrap();

        let permit = store.begin().await.unwrap();
        store.ensure_user("bob").await.unwrap();
        store
            .insert_publication(publication("alice", NewPublication::new("second")))
            .await
            .unwrap();
        store.rollback(permit).await.unwrap();

        assert!(store.identities.contains_user("alice"));
        assert!(!store.identities.contains_user("bob"));

        let key = PublicationKey::new("alice", PublicationType::Map, "second");
        assert_eq!(store.get_publication(&key).await.unwrap(), None);

        // Sequence counter was rolled back as well.
        let permit = store.begin().await.unwrap();
        let third = store
            .insert_publication(publication("alice", NewPublication::new("third")))
            .await
            .unwrap()
            .unwrap();
        store.commit(permit).await.unwrap();
        assert_eq!(third.sequence, 2);
    }
}
