// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_auth::{IdentityProvider, resolve_role};
use geocat_core::{EVERYONE, Role};

use crate::assert_all_stores;
use crate::identities::IdentityStore;

#[tokio::test]
async fn users_own_workspaces() {
    assert_all_stores!(|store| async {
        assert!(store.ensure_user("alice").await.unwrap());
        assert!(!store.ensure_user("alice").await.unwrap());

        // Creating a user also creates the personal workspace.
        assert!(store.user_exists("alice").await.unwrap());
        assert!(store.workspace_exists("alice").await.unwrap());
        assert!(!store.ensure_workspace("alice").await.unwrap());

        assert!(store.ensure_workspace("team").await.unwrap());
        assert!(!store.user_exists("team").await.unwrap());
        assert!(store.workspace_exists("team").await.unwrap());

        assert!(!store.user_exists("bob").await.unwrap());
        assert!(!store.workspace_exists("bob").await.unwrap());
    });
}

#[tokio::test]
async fn resolve_against_store() {
    assert_all_stores!(|store| async {
        store.ensure_user("alice").await.unwrap();
        store.ensure_workspace("team").await.unwrap();

        assert_eq!(
            resolve_role(&store, "alice").await.unwrap(),
            Some(Role::User("alice".into()))
        );
        assert_eq!(
            resolve_role(&store, "team").await.unwrap(),
            Some(Role::Workspace("team".into()))
        );
        assert_eq!(
            resolve_role(&store, EVERYONE).await.unwrap(),
            Some(Role::Everyone)
        );
        assert_eq!(resolve_role(&store, "bob").await.unwrap(), None);
    });
}

#[tokio::test]
async fn delete_identities() {
    assert_all_stores!(|store| async {
        store.ensure_user("alice").await.unwrap();
        store.ensure_user("bob").await.unwrap();

        // Deleting a user keeps its workspace.
        assert!(store.delete_user("alice").await.unwrap());
        assert!(!store.delete_user("alice").await.unwrap());
        assert!(!store.user_exists("alice").await.unwrap());
        assert!(store.workspace_exists("alice").await.unwrap());

        // Deleting a workspace removes its owner as well.
        assert!(store.delete_workspace("bob").await.unwrap());
        assert!(!store.user_exists("bob").await.unwrap());
        assert!(!store.workspace_exists("bob").await.unwrap());
        assert!(!store.delete_workspace("bob").await.unwrap());
    });
}
