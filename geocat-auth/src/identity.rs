// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;
use std::error::Error;

use geocat_core::{EVERYONE, Role, RoleSet};
use thiserror::Error;

use crate::rights::RightsError;

/// Source of truth about which users and workspaces exist.
///
/// Users and workspaces share one namespace: a user owns the workspace with the same name. The
/// registry assumes this invariant is enforced by the implementor.
pub trait IdentityProvider {
    type Error: Error;

    /// Returns `true` if a user with this name exists.
    fn user_exists(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns `true` if a workspace with this name exists.
    fn workspace_exists(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;
}

#[derive(Debug, Error)]
pub enum ResolveError<E> {
    /// Access rights were rejected.
    #[error(transparent)]
    Rights(#[from] RightsError),

    /// Identity provider failed to answer.
    #[error("identity provider error: {0}")]
    Provider(E),
}

/// Resolves a single name into a role, returns `None` if it is unknown.
///
/// Users take precedence over workspaces as every user also owns a workspace with the same name.
pub async fn resolve_role<P>(provider: &P, name: &str) -> Result<Option<Role>, P::Error>
where
    P: IdentityProvider,
{
    if name == EVERYONE {
        return Ok(Some(Role::Everyone));
    }

    if provider.user_exists(name).await? {
        return Ok(Some(Role::User(name.to_string())));
    }

    if provider.workspace_exists(name).await? {
        return Ok(Some(Role::Workspace(name.to_string())));
    }

    Ok(None)
}

/// Resolves all names into roles.
///
/// Fails with [`RightsError::UnknownIdentifier`] listing every name which is neither a known user,
/// a known workspace nor `EVERYONE`.
pub async fn validate_identifiers<'a, P, I>(
    provider: &P,
    names: I,
) -> Result<RoleSet, ResolveError<P::Error>>
where
    P: IdentityProvider,
    I: IntoIterator<Item = &'a String>,
{
    let mut roles = RoleSet::new();
    let mut unknown = BTreeSet::new();

    for name in names {
        match resolve_role(provider, name)
            .await
            .map_err(ResolveError::Provider)?
        {
            Some(role) => {
                roles.insert(role);
            }
            None => {
                unknown.insert(name.clone());
            }
        }
    }

    if !unknown.is_empty() {
        return Err(RightsError::UnknownIdentifier(unknown).into());
    }

    Ok(roles)
}
