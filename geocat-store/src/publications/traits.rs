// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use geocat_core::{Publication, PublicationKey};
use uuid::Uuid;

use crate::publications::{Publications, StoreFilter};

/// Trait defining a store API for publication records and their access rights.
///
/// Implementations are expected to be used inside a transaction for all writes. Reads run inside
/// the open transaction if there is one, hold its permit to read a consistent snapshot.
pub trait PublicationStore {
    type Error: Error;

    /// Insert a new publication and assign it the next insertion sequence number.
    ///
    /// Returns the stored record or `None` if a publication with the same key or uuid already
    /// exists. The `sequence` field of the passed value is ignored.
    fn insert_publication(
        &self,
        publication: Publication,
    ) -> impl Future<Output = Result<Option<Publication>, Self::Error>>;

    /// Get a publication by its key.
    fn get_publication(
        &self,
        key: &PublicationKey,
    ) -> impl Future<Output = Result<Option<Publication>, Self::Error>>;

    /// Get a publication by its key from within the currently held transaction.
    ///
    /// Use this when the returned record is validated against before writing to it.
    fn get_publication_for_update(
        &self,
        key: &PublicationKey,
    ) -> impl Future<Output = Result<Option<Publication>, Self::Error>>;

    /// Get a publication by its uuid.
    fn get_publication_by_uuid(
        &self,
        uuid: &Uuid,
    ) -> impl Future<Output = Result<Option<Publication>, Self::Error>>;

    /// Replace the mutable fields and access rights of an existing publication.
    ///
    /// Uuid, owner and sequence are never rewritten. Returns `false` if no publication with this
    /// key exists.
    fn update_publication(
        &self,
        publication: &Publication,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Set or clear the owner of a publication. Returns `false` if no publication with this key
    /// exists.
    fn update_owner(
        &self,
        key: &PublicationKey,
        owner: Option<&str>,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a publication together with its access rights and return it.
    fn delete_publication(
        &self,
        key: &PublicationKey,
    ) -> impl Future<Output = Result<Option<Publication>, Self::Error>>;

    /// Get all publications matching the filter, in no particular order.
    fn get_all(
        &self,
        filter: &StoreFilter,
    ) -> impl Future<Output = Result<Publications, Self::Error>>;
}
