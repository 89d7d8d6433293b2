// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use geocat_auth::{
    IdentityProvider, RightsChange, RightsError, can_write, check_rights, project_effective_roles,
};
use geocat_core::{
    Actor, BoundingBox, NewPublication, Publication, PublicationKey, PublicationPatch,
    PublicationType, Role, Timestamp,
};
use geocat_query::{PublicationInfos, PublicationQuery, select};
use geocat_store::publications::{PublicationStore, StoreFilter};
use geocat_store::traits::Transaction;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::builder::RegistryBuilder;
use crate::error::RegistryError;

type StoreError<S> = <S as PublicationStore>::Error;

type IdentityError<I> = <I as IdentityProvider>::Error;

/// Result of registry operations.
pub type RegistryResult<T, S, I> = Result<T, RegistryError<StoreError<S>, IdentityError<I>>>;

/// Registry of all publications.
///
/// Every mutation runs in one store transaction: the record is looked up, access rights are
/// validated and the change is persisted atomically. Any failure rolls the transaction back and
/// leaves the store untouched.
///
/// Reads acquire the same transaction permit and roll back when done. They wait for a mutation in
/// progress and never see its uncommitted state.
///
/// The store and identity provider are injected, use [`Registry::builder`] for a registry backed
/// by SQLite.
#[derive(Clone, Debug)]
pub struct Registry<S, I> {
    store: S,
    identities: I,
}

impl Registry<(), ()> {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }
}

impl<S, I> Registry<S, I>
where
    S: PublicationStore + Transaction<Error = StoreError<S>>,
    I: IdentityProvider,
{
    pub fn new(store: S, identities: I) -> Self {
        Self { store, identities }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn identities(&self) -> &I {
        &self.identities
    }

    /// Insert a new publication owned by the acting user.
    ///
    /// The owner is added to the read and write sets of the stored record.
    pub async fn insert_publication(
        &self,
        actor: &Actor,
        workspace: &str,
        publication_type: PublicationType,
        new: NewPublication,
    ) -> RegistryResult<Publication, S, I> {
        let permit = self.begin().await?;
        let result = self
            .insert_publication_inner(actor, workspace, publication_type, new)
            .await;
        self.finish(permit, result).await
    }

    async fn insert_publication_inner(
        &self,
        actor: &Actor,
        workspace: &str,
        publication_type: PublicationType,
        new: NewPublication,
    ) -> RegistryResult<Publication, S, I> {
        let key = PublicationKey::new(workspace, publication_type, &new.name);

        if self.get_for_update(&key).await?.is_some() {
            return Err(RegistryError::AlreadyExists(key));
        }

        let owner = actor.name();
        let mut access_rights = check_rights(
            &self.identities,
            RightsChange {
                read: &new.read,
                write: &new.write,
                actor,
                was_writer_before: false,
                owner,
            },
        )
        .await?;

        if let Some(owner) = owner {
            access_rights.read.insert(Role::User(owner.to_string()));
            access_rights.write.insert(Role::User(owner.to_string()));
        }

        let publication = Publication {
            key: key.clone(),
            uuid: new.uuid,
            title: new.title,
            style_type: new.style_type,
            bounding_box: new.bounding_box,
            owner: owner.map(str::to_string),
            access_rights,
            last_change: Timestamp::now(),
            sequence: 0,
        };

        // Either the key or the uuid was taken.
        let Some(publication) = self
            .store
            .insert_publication(publication)
            .await
            .map_err(RegistryError::StoreUnavailable)?
        else {
            return Err(RegistryError::AlreadyExists(key));
        };

        debug!(%key, %actor, uuid = %publication.uuid, "inserted publication");

        Ok(publication)
    }

    /// Apply a partial update to a publication.
    ///
    /// Access right sets which are not part of the patch are kept as they are. The full chain of
    /// access rights checks runs against the merged sets, using the write set before the update
    /// to decide whether the actor could write.
    pub async fn update_publication(
        &self,
        actor: &Actor,
        key: &PublicationKey,
        patch: PublicationPatch,
    ) -> RegistryResult<Publication, S, I> {
        let permit = self.begin().await?;
        let result = self.update_publication_inner(actor, key, patch).await;
        self.finish(permit, result).await
    }

    async fn update_publication_inner(
        &self,
        actor: &Actor,
        key: &PublicationKey,
        patch: PublicationPatch,
    ) -> RegistryResult<Publication, S, I> {
        let Some(mut publication) = self.get_for_update(key).await? else {
            return Err(RegistryError::NotFound(key.clone()));
        };

        let current_read = names(publication.access_rights.read_names());
        let current_write = names(publication.access_rights.write_names());

        let mut access_rights = check_rights(
            &self.identities,
            RightsChange {
                read: patch.read.or(&current_read),
                write: patch.write.or(&current_write),
                actor,
                was_writer_before: can_write(&publication, actor),
                owner: publication.owner.as_deref(),
            },
        )
        .await?;

        if let Some(owner) = &publication.owner {
            access_rights.read.insert(Role::User(owner.clone()));
            access_rights.write.insert(Role::User(owner.clone()));
        }

        patch.title.apply(&mut publication.title);
        patch.style_type.apply(&mut publication.style_type);
        patch.bounding_box.apply(&mut publication.bounding_box);
        publication.access_rights = access_rights;
        publication.last_change = Timestamp::now();

        self.persist(&publication).await?;

        debug!(%key, %actor, "updated publication");

        Ok(publication)
    }

    /// Delete a publication and return the removed record.
    pub async fn delete_publication(
        &self,
        key: &PublicationKey,
    ) -> RegistryResult<Publication, S, I> {
        let permit = self.begin().await?;
        let result = self.delete_publication_inner(key).await;
        self.finish(permit, result).await
    }

    async fn delete_publication_inner(
        &self,
        key: &PublicationKey,
    ) -> RegistryResult<Publication, S, I> {
        let Some(publication) = self
            .store
            .delete_publication(key)
            .await
            .map_err(RegistryError::StoreUnavailable)?
        else {
            return Err(RegistryError::NotFound(key.clone()));
        };

        debug!(%key, "deleted publication");

        Ok(publication)
    }

    /// Delete all publications of a workspace, optionally only those of one type.
    ///
    /// Returns the removed records in insertion order.
    pub async fn delete_publications(
        &self,
        workspace: &str,
        publication_type: Option<PublicationType>,
    ) -> RegistryResult<Vec<Publication>, S, I> {
        let permit = self.begin().await?;
        let result = self
            .delete_publications_inner(workspace, publication_type)
            .await;
        self.finish(permit, result).await
    }

    async fn delete_publications_inner(
        &self,
        workspace: &str,
        publication_type: Option<PublicationType>,
    ) -> RegistryResult<Vec<Publication>, S, I> {
        let filter = StoreFilter {
            workspace: Some(workspace.to_string()),
            publication_type,
        };
        let mut publications: Vec<Publication> = self
            .store
            .get_all(&filter)
            .await
            .map_err(RegistryError::StoreUnavailable)?
            .into_iter()
            .collect();
        publications.sort_by_key(|publication| publication.sequence);

        for publication in &publications {
            self.store
                .delete_publication(&publication.key)
                .await
                .map_err(RegistryError::StoreUnavailable)?;
        }

        debug!(workspace, count = publications.len(), "deleted publications");

        Ok(publications)
    }

    /// Set or clear the extent of a publication.
    ///
    /// Access rights are not touched and therefore not validated again.
    pub async fn set_bounding_box(
        &self,
        key: &PublicationKey,
        bounding_box: Option<BoundingBox>,
    ) -> RegistryResult<Publication, S, I> {
        let permit = self.begin().await?;
        let result = self.set_bounding_box_inner(key, bounding_box).await;
        self.finish(permit, result).await
    }

    async fn set_bounding_box_inner(
        &self,
        key: &PublicationKey,
        bounding_box: Option<BoundingBox>,
    ) -> RegistryResult<Publication, S, I> {
        let Some(mut publication) = self.get_for_update(key).await? else {
            return Err(RegistryError::NotFound(key.clone()));
        };

        publication.bounding_box = bounding_box;
        publication.last_change = Timestamp::now();
        self.persist(&publication).await?;

        debug!(%key, "set bounding box");

        Ok(publication)
    }

    /// Remove a deleted user or workspace from the access rights of all publications.
    ///
    /// Publications owned by that identity lose their owner. Fails with
    /// [`RightsError::NoWriter`] without changing anything if a publication would be left without
    /// any writer. Returns the number of changed publications.
    pub async fn remove_identity(&self, name: &str) -> RegistryResult<usize, S, I> {
        let permit = self.begin().await?;
        let result = self.remove_identity_inner(name).await;
        self.finish(permit, result).await
    }

    async fn remove_identity_inner(&self, name: &str) -> RegistryResult<usize, S, I> {
        let publications = self
            .store
            .get_all(&StoreFilter::new())
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        let mut changed = 0;
        for mut publication in publications {
            let read = project_effective_roles(&publication.access_rights.read, name);
            let write = project_effective_roles(&publication.access_rights.write, name);
            let owned = publication.owner.as_deref() == Some(name);

            if read == publication.access_rights.read
                && write == publication.access_rights.write
                && !owned
            {
                continue;
            }

            if write.is_empty() {
                debug!(key = %publication.key, name, "identity is the only writer");
                return Err(RightsError::NoWriter.into());
            }

            if owned {
                self.store
                    .update_owner(&publication.key, None)
                    .await
                    .map_err(RegistryError::StoreUnavailable)?;
            }

            publication.access_rights.read = read;
            publication.access_rights.write = write;
            publication.last_change = Timestamp::now();
            self.persist(&publication).await?;

            changed += 1;
        }

        debug!(name, changed, "removed identity from publications");

        Ok(changed)
    }

    pub async fn get_publication(
        &self,
        key: &PublicationKey,
    ) -> RegistryResult<Option<Publication>, S, I> {
        let permit = self.begin().await?;
        let result = self
            .store
            .get_publication(key)
            .await
            .map_err(RegistryError::StoreUnavailable);
        self.release(permit, result).await
    }

    pub async fn get_publication_by_uuid(
        &self,
        uuid: &Uuid,
    ) -> RegistryResult<Option<Publication>, S, I> {
        let permit = self.begin().await?;
        let result = self
            .store
            .get_publication_by_uuid(uuid)
            .await
            .map_err(RegistryError::StoreUnavailable);
        self.release(permit, result).await
    }

    /// Filter and order publications.
    ///
    /// The result is keyed by publication and iterates in the requested order.
    pub async fn get_publication_infos(
        &self,
        query: &PublicationQuery,
    ) -> RegistryResult<PublicationInfos, S, I> {
        let filter = StoreFilter {
            workspace: query.workspace.clone(),
            publication_type: query.publication_type,
        };

        let permit = self.begin().await?;
        let result = self
            .store
            .get_all(&filter)
            .await
            .map_err(RegistryError::StoreUnavailable);
        let publications = self.release(permit, result).await?;

        let infos = select(publications, query).inspect_err(|err| {
            debug!(%err, "rejected query");
        })?;

        Ok(infos)
    }

    async fn begin(&self) -> RegistryResult<S::Permit, S, I> {
        self.store
            .begin()
            .await
            .map_err(RegistryError::StoreUnavailable)
    }

    /// Commits on success and rolls back on failure.
    async fn finish<T>(
        &self,
        permit: S::Permit,
        result: RegistryResult<T, S, I>,
    ) -> RegistryResult<T, S, I> {
        match result {
            Ok(value) => {
                self.store
                    .commit(permit)
                    .await
                    .map_err(RegistryError::StoreUnavailable)?;
                Ok(value)
            }
            Err(err) => {
                debug!(code = %err.code(), "rejected mutation: {err}");
                if let Err(rollback_err) = self.store.rollback(permit).await {
                    warn!(%rollback_err, "rolling back transaction failed");
                }
                Err(err)
            }
        }
    }

    /// Ends a read-only transaction.
    async fn release<T>(
        &self,
        permit: S::Permit,
        result: RegistryResult<T, S, I>,
    ) -> RegistryResult<T, S, I> {
        let rollback = self.store.rollback(permit).await;
        let value = result?;
        rollback.map_err(RegistryError::StoreUnavailable)?;
        Ok(value)
    }

    async fn get_for_update(
        &self,
        key: &PublicationKey,
    ) -> RegistryResult<Option<Publication>, S, I> {
        self.store
            .get_publication_for_update(key)
            .await
            .map_err(RegistryError::StoreUnavailable)
    }

    async fn persist(&self, publication: &Publication) -> RegistryResult<(), S, I> {
        let updated = self
            .store
            .update_publication(publication)
            .await
            .map_err(RegistryError::StoreUnavailable)?;

        if !updated {
            return Err(RegistryError::NotFound(publication.key.clone()));
        }

        Ok(())
    }
}

fn names(roles: BTreeSet<&str>) -> BTreeSet<String> {
    roles.into_iter().map(str::to_string).collect()
}
