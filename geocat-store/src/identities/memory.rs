// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::convert::Infallible;
use std::rc::Rc;

use geocat_auth::IdentityProvider;

use crate::identities::IdentityStore;
use crate::memory::MemoryStore;

#[derive(Clone, Debug)]
pub struct IdentitiesMemoryStore {
    users: Rc<RefCell<BTreeSet<String>>>,
    workspaces: Rc<RefCell<BTreeSet<String>>>,
}

pub(crate) struct IdentitiesSnapshot {
    users: BTreeSet<String>,
    workspaces: BTreeSet<String>,
}

impl IdentitiesMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Rc::new(RefCell::new(BTreeSet::new())),
            workspaces: Rc::new(RefCell::new(BTreeSet::new())),
        }
    }

    pub fn contains_user(&self, name: &str) -> bool {
        self.users.borrow().contains(name)
    }

    pub fn contains_workspace(&self, name: &str) -> bool {
        self.workspaces.borrow().contains(name)
    }

    pub(crate) fn snapshot(&self) -> IdentitiesSnapshot {
        IdentitiesSnapshot {
            users: self.users.borrow().clone(),
            workspaces: self.workspaces.borrow().clone(),
        }
    }

    pub(crate) fn restore(&self, snapshot: IdentitiesSnapshot) {
        self.users.replace(snapshot.users);
        self.workspaces.replace(snapshot.workspaces);
    }
}

impl Default for IdentitiesMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityStore for MemoryStore {
    type Error = Infallible;

    async fn ensure_workspace(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.identities.workspaces.borrow_mut().insert(name.to_string()))
    }

    async fn ensure_user(&self, name: &str) -> Result<bool, Infallible> {
        self.ensure_workspace(name).await?;
        Ok(self.identities.users.borrow_mut().insert(name.to_string()))
    }

    async fn delete_user(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.identities.users.borrow_mut().remove(name))
    }

    async fn delete_workspace(&self, name: &str) -> Result<bool, Infallible> {
        self.identities.users.borrow_mut().remove(name);
        Ok(self.identities.workspaces.borrow_mut().remove(name))
    }
}

impl IdentityProvider for MemoryStore {
    type Error = Infallible;

    async fn user_exists(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.identities.contains_user(name))
    }

    async fn workspace_exists(&self, name: &str) -> Result<bool, Infallible> {
        Ok(self.identities.contains_workspace(name))
    }
}
