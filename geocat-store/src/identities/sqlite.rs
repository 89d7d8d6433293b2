// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_auth::IdentityProvider;
use sqlx::query;

use crate::identities::IdentityStore;
use crate::sqlite::{SqliteError, SqliteStore};

impl<'a> IdentityStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn ensure_workspace(&self, name: &str) -> Result<bool, Self::Error> {
        self.tx(async |tx| {
            let result = query(
                "
                INSERT OR IGNORE
                INTO
                    workspaces_v1 (name)
                VALUES
                    (?)
                ",
            )
            .bind(name)
            .execute(&mut **tx)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn ensure_user(&self, name: &str) -> Result<bool, Self::Error> {
        self.ensure_workspace(name).await?;

        self.tx(async |tx| {
            let result = query(
                "
                INSERT OR IGNORE
                INTO
                    users_v1 (name)
                VALUES
                    (?)
                ",
            )
            .bind(name)
            .execute(&mut **tx)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete_user(&self, name: &str) -> Result<bool, Self::Error> {
        self.tx(async |tx| {
            let result = query(
                "
                DELETE FROM
                    users_v1
                WHERE
                    name = ?
                ",
            )
            .bind(name)
            .execute(&mut **tx)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete_workspace(&self, name: &str) -> Result<bool, Self::Error> {
        // The user owning this workspace is removed by the cascading foreign key.
        self.tx(async |tx| {
            let result = query(
                "
                DELETE FROM
                    workspaces_v1
                WHERE
                    name = ?
                ",
            )
            .bind(name)
            .execute(&mut **tx)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}

impl<'a> IdentityProvider for SqliteStore<'a> {
    type Error = SqliteError;

    async fn user_exists(&self, name: &str) -> Result<bool, Self::Error> {
        self.read(async |connection| {
            let exists = query(
                "
                SELECT
                    1
                FROM
                    users_v1
                WHERE
                    name = ?
                ",
            )
            .bind(name)
            .fetch_optional(&mut *connection)
            .await?
            .is_some();

            Ok(exists)
        })
        .await
    }

    async fn workspace_exists(&self, name: &str) -> Result<bool, Self::Error> {
        self.read(async |connection| {
            let exists = query(
                "
                SELECT
                    1
                FROM
                    workspaces_v1
                WHERE
                    name = ?
                ",
            )
            .bind(name)
            .fetch_optional(&mut *connection)
            .await?
            .is_some();

            Ok(exists)
        })
        .await
    }
}
