// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashSet;
use std::convert::Infallible;

use crate::identity::IdentityProvider;

/// Fixed set of known users and workspaces.
#[derive(Clone, Debug, Default)]
pub struct TestIdentities {
    users: HashSet<String>,
    workspaces: HashSet<String>,
}

impl TestIdentities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, name: &str) -> Self {
        self.users.insert(name.to_string());
        self
    }

    pub fn workspace(mut self, name: &str) -> Self {
        self.workspaces.insert(name.to_string());
        self
    }
}

impl IdentityProvider for TestIdentities {
    type Error = Infallible;

    async fn user_exists(&self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.users.contains(name))
    }

    async fn workspace_exists(&self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.workspaces.contains(name))
    }
}
