// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

/// Trait defining a store API for the users and workspaces access rights can refer to.
///
/// Every user owns a workspace with the same name, creating a user creates that workspace as well
/// and deleting the workspace removes the user.
pub trait IdentityStore {
    type Error: Error;

    /// Register a workspace. Returns `false` if it already existed.
    fn ensure_workspace(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Register a user together with its personal workspace. Returns `false` if the user already
    /// existed.
    fn ensure_user(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a user, its personal workspace is kept.
    fn delete_user(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a workspace and the user owning it.
    fn delete_workspace(&self, name: &str) -> impl Future<Output = Result<bool, Self::Error>>;
}
