// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use geocat_core::{AccessRights, Actor, Role, RoleSet, covers};
use thiserror::Error;
use tracing::trace;

use crate::identity::{IdentityProvider, ResolveError, validate_identifiers};

/// Violations of the access rights invariants.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RightsError {
    #[error("unknown users or workspaces in access rights: {}", join(.0.iter()))]
    UnknownIdentifier(BTreeSet<String>),

    #[error("at least one user, workspace or EVERYONE must be able to write")]
    NoWriter,

    #[error("roles which can write must also be able to read: {}", join(.0.iter()))]
    WriteWithoutRead(RoleSet),

    #[error("user '{0}' would lose their own write access")]
    SelfLockout(String),

    #[error("owner '{0}' would lose write access")]
    OwnerLockout(String),
}

fn join<T: ToString>(values: impl Iterator<Item = T>) -> String {
    values
        .map(|value| value.to_string())
        .collect::<Vec<String>>()
        .join(", ")
}

/// Fails if nobody can write.
pub fn require_nonempty_writer(write: &RoleSet) -> Result<(), RightsError> {
    if write.is_empty() {
        return Err(RightsError::NoWriter);
    }
    Ok(())
}

/// Fails if a writer is not able to read.
///
/// A writer is readable when the same name is a reader or when `EVERYONE` is a reader.
pub fn require_writers_can_read(write: &RoleSet, read: &RoleSet) -> Result<(), RightsError> {
    if read.contains(&Role::Everyone) {
        return Ok(());
    }

    let read_names: BTreeSet<&str> = read.iter().map(Role::name).collect();
    let unreadable: RoleSet = write
        .iter()
        .filter(|role| !read_names.contains(role.name()))
        .cloned()
        .collect();

    if !unreadable.is_empty() {
        return Err(RightsError::WriteWithoutRead(unreadable));
    }

    Ok(())
}

/// Fails if an identified actor who could write before is not able to write afterwards.
///
/// Anonymous actors and actors who were not writers are not checked.
pub fn require_actor_retains_write(
    actor: &Actor,
    was_writer_before: bool,
    write_after: &RoleSet,
) -> Result<(), RightsError> {
    let Actor::User(name) = actor else {
        return Ok(());
    };

    if was_writer_before && !covers(write_after, actor) {
        return Err(RightsError::SelfLockout(name.clone()));
    }

    Ok(())
}

/// Fails if the owner of a publication is not able to write afterwards.
pub fn require_owner_retains_write(
    owner: Option<&str>,
    write_after: &RoleSet,
) -> Result<(), RightsError> {
    let Some(owner) = owner else {
        return Ok(());
    };

    if !covers(write_after, &Actor::user(owner)) {
        return Err(RightsError::OwnerLockout(owner.to_string()));
    }

    Ok(())
}

/// Returns the roles without any role carrying the excluded name.
///
/// Used to scrub a deleted user or workspace from the access rights of all publications.
pub fn project_effective_roles(roles: &RoleSet, excluded: &str) -> RoleSet {
    roles
        .iter()
        .filter(|role| role.name() != excluded)
        .cloned()
        .collect()
}

/// Access rights as requested by a mutation together with the context needed to validate them.
#[derive(Clone, Debug)]
pub struct RightsChange<'a> {
    /// Names which should be able to read after the change.
    pub read: &'a BTreeSet<String>,

    /// Names which should be able to write after the change.
    pub write: &'a BTreeSet<String>,

    /// Identity performing the change.
    pub actor: &'a Actor,

    /// Whether the actor could write before the change, always `false` for inserts.
    pub was_writer_before: bool,

    /// Owner of the publication, `None` if it was inserted anonymously.
    pub owner: Option<&'a str>,
}

/// Validates requested access rights and resolves them into roles.
///
/// The checks run in a fixed order and the first failure is returned: identifier validity,
/// non-empty writers, writers can read, actor retains write, owner retains write.
pub async fn check_rights<P>(
    provider: &P,
    change: RightsChange<'_>,
) -> Result<AccessRights, ResolveError<P::Error>>
where
    P: IdentityProvider,
{
    let roles = validate_identifiers(provider, change.read.iter().chain(change.write.iter())).await?;

    let pick = |names: &BTreeSet<String>| -> RoleSet {
        roles
            .iter()
            .filter(|role| names.contains(role.name()))
            .cloned()
            .collect()
    };
    let read = pick(change.read);
    let write = pick(change.write);

    require_nonempty_writer(&write)?;
    require_writers_can_read(&write, &read)?;
    require_actor_retains_write(change.actor, change.was_writer_before, &write)?;
    require_owner_retains_write(change.owner, &write)?;

    trace!(actor = %change.actor, read = read.len(), write = write.len(), "access rights valid");

    Ok(AccessRights::new(read, write))
}
