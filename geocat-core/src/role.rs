// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Reserved identifier of the pseudo-role which includes every caller, even anonymous ones.
pub const EVERYONE: &str = "EVERYONE";

/// Entity which can be granted read or write access to a publication.
///
/// Role names are resolved once when access rights get validated. Usernames and workspace names
/// share one namespace, a user owns the workspace carrying the same name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Named user.
    User(String),

    /// Workspace acting as a group.
    Workspace(String),

    /// Everyone, including anonymous callers.
    Everyone,
}

impl Role {
    pub fn name(&self) -> &str {
        match self {
            Role::User(name) | Role::Workspace(name) => name,
            Role::Everyone => EVERYONE,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub type RoleSet = BTreeSet<Role>;

/// Identity on whose behalf an operation is performed.
///
/// Authentication happens elsewhere, the registry only receives the already resolved identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    #[default]
    Anonymous,
    User(String),
}

impl Actor {
    pub fn user(name: impl Into<String>) -> Self {
        Actor::User(name.into())
    }

    /// Returns the username for identified actors.
    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::Anonymous => None,
            Actor::User(name) => Some(name),
        }
    }
}

impl Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Anonymous => write!(f, "anonymous"),
            Actor::User(name) => write!(f, "{name}"),
        }
    }
}
