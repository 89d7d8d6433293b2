// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;

use geocat_core::{Publication, PublicationKey};
use uuid::Uuid;

use crate::memory::MemoryStore;
use crate::publications::{PublicationStore, Publications, StoreFilter};

#[derive(Clone, Debug)]
pub struct PublicationsMemoryStore {
    records: Rc<RefCell<BTreeMap<PublicationKey, Publication>>>,
    next_sequence: Rc<Cell<u64>>,
}

pub(crate) struct PublicationsSnapshot {
    records: BTreeMap<PublicationKey, Publication>,
    next_sequence: u64,
}

impl PublicationsMemoryStore {
    pub fn new() -> Self {
        Self {
            records: Rc::new(RefCell::new(BTreeMap::new())),
            next_sequence: Rc::new(Cell::new(1)),
        }
    }

    pub(crate) fn snapshot(&self) -> PublicationsSnapshot {
        PublicationsSnapshot {
            records: self.records.borrow().clone(),
            next_sequence: self.next_sequence.get(),
        }
    }

    pub(crate) fn restore(&self, snapshot: PublicationsSnapshot) {
        self.records.replace(snapshot.records);
        self.next_sequence.set(snapshot.next_sequence);
    }
}

impl Default for PublicationsMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PublicationStore for MemoryStore {
    type Error = Infallible;

    async fn insert_publication(
        &self,
        mut publication: Publication,
    ) -> Result<Option<Publication>, Infallible> {
        let mut records = self.publications.records.borrow_mut();

        let uuid_taken = records
            .values()
            .any(|record| record.uuid == publication.uuid);
        if uuid_taken || records.contains_key(&publication.key) {
            return Ok(None);
        }

        let sequence = self.publications.next_sequence.get();
        self.publications.next_sequence.set(sequence + 1);
        publication.sequence = sequence;

        records.insert(publication.key.clone(), publication.clone());
        Ok(Some(publication))
    }

    async fn get_publication(&self, key: &PublicationKey) -> Result<Option<Publication>, Infallible> {
        Ok(self.publications.records.borrow().get(key).cloned())
    }

    async fn get_publication_for_update(
        &self,
        key: &PublicationKey,
    ) -> Result<Option<Publication>, Infallible> {
        self.get_publication(key).await
    }

    async fn get_publication_by_uuid(&self, uuid: &Uuid) -> Result<Option<Publication>, Infallible> {
        Ok(self
            .publications
            .records
            .borrow()
            .values()
            .find(|record| &record.uuid == uuid)
            .cloned())
    }

    async fn update_publication(&self, publication: &Publication) -> Result<bool, Infallible> {
        let mut records = self.publications.records.borrow_mut();
        let Some(record) = records.get_mut(&publication.key) else {
            return Ok(false);
        };

        record.title = publication.title.clone();
        record.style_type = publication.style_type;
        record.bounding_box = publication.bounding_box;
        record.access_rights = publication.access_rights.clone();
        record.last_change = publication.last_change;

        Ok(true)
    }

    async fn update_owner(
        &self,
        key: &PublicationKey,
        owner: Option<&str>,
    ) -> Result<bool, Infallible> {
        let mut records = self.publications.records.borrow_mut();
        let Some(record) = records.get_mut(key) else {
            return Ok(false);
        };

        record.owner = owner.map(str::to_string);
        Ok(true)
    }

    async fn delete_publication(
        &self,
        key: &PublicationKey,
    ) -> Result<Option<Publication>, Infallible> {
        Ok(self.publications.records.borrow_mut().remove(key))
    }

    async fn get_all(&self, filter: &StoreFilter) -> Result<Publications, Infallible> {
        Ok(self
            .publications
            .records
            .borrow()
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }
}
