// SPDX-License-Identifier: MIT OR Apache-2.0

use std::str::FromStr;

use geocat_core::{
    AccessRights, BoundingBox, EVERYONE, Publication, PublicationKey, PublicationType, Role,
    StyleType, Timestamp,
};
use sqlx::sqlite::SqliteConnection;
use sqlx::{FromRow, query, query_as};
use uuid::Uuid;

use crate::publications::{PublicationStore, Publications, StoreFilter};
use crate::sqlite::{DecodeError, SqliteError, SqliteStore};

const SELECT_PUBLICATIONS: &str = "
    SELECT
        p.id,
        p.workspace,
        p.publication_type,
        p.name,
        p.uuid,
        p.title,
        p.style_type,
        p.bbox_min_x,
        p.bbox_min_y,
        p.bbox_max_x,
        p.bbox_max_y,
        p.owner,
        p.last_change,
        r.right_type,
        r.role_kind,
        r.role_name
    FROM
        publications_v1 p
        LEFT JOIN publication_rights_v1 r ON r.publication_id = p.id
    ";

impl<'a> PublicationStore for SqliteStore<'a> {
    type Error = SqliteError;

    async fn insert_publication(
        &self,
        mut publication: Publication,
    ) -> Result<Option<Publication>, Self::Error> {
        self.tx(async move |tx| {
            let (min_x, min_y, max_x, max_y) = bbox_columns(publication.bounding_box.as_ref());

            // Ignore insertion when key or uuid already exist (UNIQUE constraints).
            let result = query(
                "
                INSERT OR IGNORE
                INTO
                    publications_v1 (
                        workspace,
                        publication_type,
                        name,
                        uuid,
                        title,
                        style_type,
                        bbox_min_x,
                        bbox_min_y,
                        bbox_max_x,
                        bbox_max_y,
                        owner,
                        last_change
                    )
                VALUES
                    (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&publication.key.workspace)
            .bind(publication.key.publication_type.as_str())
            .bind(&publication.key.name)
            .bind(publication.uuid.to_string())
            .bind(&publication.title)
            .bind(publication.style_type.map(|style_type| style_type.as_str()))
            .bind(min_x)
            .bind(min_y)
            .bind(max_x)
            .bind(max_y)
            .bind(&publication.owner)
            .bind(u64::from(publication.last_change) as i64)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                return Ok(None);
            }

            let id = result.last_insert_rowid();
            insert_access_rights(tx, id, &publication.access_rights).await?;

            publication.sequence = id as u64;
            Ok(Some(publication))
        })
        .await
    }

    async fn get_publication(&self, key: &PublicationKey) -> Result<Option<Publication>, Self::Error> {
        self.read(async |connection| select_by_key(connection, key).await)
            .await
    }

    async fn get_publication_for_update(
        &self,
        key: &PublicationKey,
    ) -> Result<Option<Publication>, Self::Error> {
        self.tx(async |tx| select_by_key(tx, key).await).await
    }

    async fn get_publication_by_uuid(&self, uuid: &Uuid) -> Result<Option<Publication>, Self::Error> {
        self.read(async |connection| {
            let rows = query_as::<_, PublicationRow>(&format!(
                "{SELECT_PUBLICATIONS} WHERE p.uuid = ? ORDER BY p.id"
            ))
            .bind(uuid.to_string())
            .fetch_all(&mut *connection)
            .await?;

            Ok(decode_rows(rows)?.into_iter().next())
        })
        .await
    }

    async fn update_publication(&self, publication: &Publication) -> Result<bool, Self::Error> {
        self.tx(async |tx| {
            let (min_x, min_y, max_x, max_y) = bbox_columns(publication.bounding_box.as_ref());

            let id: Option<(i64,)> = query_as(
                "
                UPDATE
                    publications_v1
                SET
                    title = ?,
                    style_type = ?,
                    bbox_min_x = ?,
                    bbox_min_y = ?,
                    bbox_max_x = ?,
                    bbox_max_y = ?,
                    last_change = ?
                WHERE
                    workspace = ?
                    AND publication_type = ?
                    AND name = ?
                RETURNING
                    id
                ",
            )
            .bind(&publication.title)
            .bind(publication.style_type.map(|style_type| style_type.as_str()))
            .bind(min_x)
            .bind(min_y)
            .bind(max_x)
            .bind(max_y)
            .bind(u64::from(publication.last_change) as i64)
            .bind(&publication.key.workspace)
            .bind(publication.key.publication_type.as_str())
            .bind(&publication.key.name)
            .fetch_optional(&mut **tx)
            .await?;

            let Some((id,)) = id else {
                return Ok(false);
            };

            query(
                "
                DELETE FROM
                    publication_rights_v1
                WHERE
                    publication_id = ?
                ",
            )
            .bind(id)
            .execute(&mut **tx)
            .await?;

            insert_access_rights(tx, id, &publication.access_rights).await?;

            Ok(true)
        })
        .await
    }

    async fn update_owner(
        &self,
        key: &PublicationKey,
        owner: Option<&str>,
    ) -> Result<bool, Self::Error> {
        self.tx(async |tx| {
            let result = query(
                "
                UPDATE
                    publications_v1
                SET
                    owner = ?
                WHERE
                    workspace = ?
                    AND publication_type = ?
                    AND name = ?
                ",
            )
            .bind(owner)
            .bind(&key.workspace)
            .bind(key.publication_type.as_str())
            .bind(&key.name)
            .execute(&mut **tx)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn delete_publication(
        &self,
        key: &PublicationKey,
    ) -> Result<Option<Publication>, Self::Error> {
        self.tx(async |tx| {
            let Some(publication) = select_by_key(tx, key).await? else {
                return Ok(None);
            };

            // Access rights are removed by the cascading foreign key.
            query(
                "
                DELETE FROM
                    publications_v1
                WHERE
                    id = ?
                ",
            )
            .bind(publication.sequence as i64)
            .execute(&mut **tx)
            .await?;

            Ok(Some(publication))
        })
        .await
    }

    async fn get_all(&self, filter: &StoreFilter) -> Result<Publications, Self::Error> {
        self.read(async |connection| {
            let rows = query_as::<_, PublicationRow>(&format!(
                "
                {SELECT_PUBLICATIONS}
                WHERE
                    (?1 IS NULL OR p.workspace = ?1)
                    AND (?2 IS NULL OR p.publication_type = ?2)
                ORDER BY
                    p.id
                "
            ))
            .bind(filter.workspace.as_deref())
            .bind(
                filter
                    .publication_type
                    .map(|publication_type| publication_type.as_str()),
            )
            .fetch_all(&mut *connection)
            .await?;

            Ok(decode_rows(rows)?.into())
        })
        .await
    }
}

async fn select_by_key(
    connection: &mut SqliteConnection,
    key: &PublicationKey,
) -> Result<Option<Publication>, SqliteError> {
    let rows = query_as::<_, PublicationRow>(&format!(
        "
        {SELECT_PUBLICATIONS}
        WHERE
            p.workspace = ?
            AND p.publication_type = ?
            AND p.name = ?
        ORDER BY
            p.id
        "
    ))
    .bind(&key.workspace)
    .bind(key.publication_type.as_str())
    .bind(&key.name)
    .fetch_all(&mut *connection)
    .await?;

    Ok(decode_rows(rows)?.into_iter().next())
}

async fn insert_access_rights(
    connection: &mut SqliteConnection,
    id: i64,
    access_rights: &AccessRights,
) -> Result<(), SqliteError> {
    let rights = access_rights
        .read
        .iter()
        .map(|role| (RIGHT_READ, role))
        .chain(access_rights.write.iter().map(|role| (RIGHT_WRITE, role)));

    for (right_type, role) in rights {
        let role_kind = match role {
            Role::User(_) => "user",
            Role::Workspace(_) => "workspace",
            Role::Everyone => "everyone",
        };

        query(
            "
            INSERT
            INTO
                publication_rights_v1 (
                    publication_id,
                    right_type,
                    role_kind,
                    role_name
                )
            VALUES
                (?, ?, ?, ?)
            ",
        )
        .bind(id)
        .bind(right_type)
        .bind(role_kind)
        .bind(role.name())
        .execute(&mut *connection)
        .await?;
    }

    Ok(())
}

fn bbox_columns(
    bounding_box: Option<&BoundingBox>,
) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
    match bounding_box {
        Some(bbox) => (
            Some(bbox.min_x()),
            Some(bbox.min_y()),
            Some(bbox.max_x()),
            Some(bbox.max_y()),
        ),
        None => (None, None, None, None),
    }
}

/// Folds joined rows into publications, rows of one publication are expected to be adjacent.
fn decode_rows(rows: Vec<PublicationRow>) -> Result<Vec<Publication>, SqliteError> {
    let mut publications: Vec<Publication> = Vec::new();

    for row in rows {
        let is_next = publications
            .last()
            .is_none_or(|publication| publication.sequence != row.id as u64);
        if is_next {
            publications.push(row.publication()?);
        }

        let Some((right_type, role)) = row.right()? else {
            continue;
        };

        if let Some(publication) = publications.last_mut() {
            match right_type.as_str() {
                RIGHT_READ => publication.access_rights.read.insert(role),
                _ => publication.access_rights.write.insert(role),
            };
        }
    }

    Ok(publications)
}

const RIGHT_READ: &str = "read";

const RIGHT_WRITE: &str = "write";

/// A publication row joined with one of its access rights.
#[derive(Debug, FromRow)]
struct PublicationRow {
    id: i64,
    workspace: String,
    publication_type: String,
    name: String,
    uuid: String,
    title: String,
    style_type: Option<String>,
    bbox_min_x: Option<f64>,
    bbox_min_y: Option<f64>,
    bbox_max_x: Option<f64>,
    bbox_max_y: Option<f64>,
    owner: Option<String>,
    last_change: i64,
    right_type: Option<String>,
    role_kind: Option<String>,
    role_name: Option<String>,
}

impl PublicationRow {
    fn publication(&self) -> Result<Publication, SqliteError> {
        let publication_type = PublicationType::from_str(&self.publication_type)
            .map_err(|err| SqliteError::Decode("publication_type".into(), err.into()))?;

        let uuid = Uuid::parse_str(&self.uuid)
            .map_err(|err| SqliteError::Decode("uuid".into(), err.into()))?;

        let style_type = self
            .style_type
            .as_deref()
            .map(StyleType::from_str)
            .transpose()
            .map_err(|err| SqliteError::Decode("style_type".into(), err.into()))?;

        let bounding_box = match (
            self.bbox_min_x,
            self.bbox_min_y,
            self.bbox_max_x,
            self.bbox_max_y,
        ) {
            (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) => Some(
                BoundingBox::new(min_x, min_y, max_x, max_y)
                    .map_err(|err| SqliteError::Decode("bounding_box".into(), err.into()))?,
            ),
            _ => None,
        };

        Ok(Publication {
            key: PublicationKey::new(&self.workspace, publication_type, &self.name),
            uuid,
            title: self.title.clone(),
            style_type,
            bounding_box,
            owner: self.owner.clone(),
            access_rights: AccessRights::default(),
            last_change: Timestamp::new(self.last_change as u64),
            sequence: self.id as u64,
        })
    }

    fn right(&self) -> Result<Option<(String, Role)>, SqliteError> {
        let (Some(right_type), Some(role_kind), Some(role_name)) =
            (&self.right_type, &self.role_kind, &self.role_name)
        else {
            return Ok(None);
        };

        let role = match role_kind.as_str() {
            "user" => Role::User(role_name.clone()),
            "workspace" => Role::Workspace(role_name.clone()),
            "everyone" if role_name == EVERYONE => Role::Everyone,
            _ => {
                return Err(SqliteError::Decode(
                    "role_kind".into(),
                    DecodeError::Role(role_kind.clone()),
                ));
            }
        };

        Ok(Some((right_type.clone(), role)))
    }
}
