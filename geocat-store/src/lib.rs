// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage backends for the geocat registry.
//!
//! Publications and the users and workspaces they refer to are kept behind the
//! [`PublicationStore`](publications::PublicationStore) and
//! [`IdentityStore`](identities::IdentityStore) traits. Two implementations are provided: an
//! in-memory store for tests and development and an SQLite store for everything else. Both
//! implement the [`Transaction`](traits::Transaction) trait so a validation and the following
//! write can be executed atomically.
pub mod identities;
#[cfg(feature = "memory")]
pub mod memory;
pub mod publications;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(any(test, feature = "test_utils"))]
mod test_utils;
pub mod traits;
