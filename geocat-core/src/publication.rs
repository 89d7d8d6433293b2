// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::bbox::BoundingBox;
use crate::patch::Patch;
use crate::role::{Actor, Role, RoleSet};
use crate::timestamp::Timestamp;

/// Kinds of publications managed by the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Layer,
    Map,
}

impl PublicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Layer => "layer",
            PublicationType::Map => "map",
        }
    }
}

impl Display for PublicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PublicationType {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "layer" => Ok(PublicationType::Layer),
            "map" => Ok(PublicationType::Map),
            _ => Err(ParseTypeError::PublicationType(value.to_string())),
        }
    }
}

/// Format of the visual style attached to a layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleType {
    Sld,
    Qml,
}

impl StyleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleType::Sld => "sld",
            StyleType::Qml => "qml",
        }
    }
}

impl Display for StyleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StyleType {
    type Err = ParseTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "sld" => Ok(StyleType::Sld),
            "qml" => Ok(StyleType::Qml),
            _ => Err(ParseTypeError::StyleType(value.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseTypeError {
    #[error("unknown publication type '{0}'")]
    PublicationType(String),

    #[error("unknown style type '{0}'")]
    StyleType(String),
}

/// Identity of a publication, unique across the whole registry.
///
/// The derived ordering (workspace, type, name) is the final tie-break of every query ordering.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicationKey {
    pub workspace: String,
    pub publication_type: PublicationType,
    pub name: String,
}

impl PublicationKey {
    pub fn new(
        workspace: impl Into<String>,
        publication_type: PublicationType,
        name: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            publication_type,
            name: name.into(),
        }
    }
}

impl Display for PublicationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.workspace, self.publication_type, self.name)
    }
}

/// Materialized read and write role sets of a publication.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRights {
    pub read: RoleSet,
    pub write: RoleSet,
}

impl AccessRights {
    pub fn new(read: RoleSet, write: RoleSet) -> Self {
        Self { read, write }
    }

    /// Names of all readers, `EVERYONE` included.
    pub fn read_names(&self) -> BTreeSet<&str> {
        self.read.iter().map(Role::name).collect()
    }

    /// Names of all writers, `EVERYONE` included.
    pub fn write_names(&self) -> BTreeSet<&str> {
        self.write.iter().map(Role::name).collect()
    }
}

/// Publication record as it is kept by the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub key: PublicationKey,

    /// Assigned once on insert, never changes.
    pub uuid: Uuid,

    pub title: String,

    pub style_type: Option<StyleType>,

    /// Extent of the publication, `None` when it is not known (yet).
    pub bounding_box: Option<BoundingBox>,

    /// User who inserted the publication, `None` for anonymous inserts.
    pub owner: Option<String>,

    pub access_rights: AccessRights,

    /// Time of the last mutating write.
    pub last_change: Timestamp,

    /// Monotonic insertion counter assigned by the store, defines the default order.
    pub sequence: u64,
}

impl Publication {
    pub fn workspace(&self) -> &str {
        &self.key.workspace
    }

    pub fn publication_type(&self) -> PublicationType {
        self.key.publication_type
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }
}

/// Input for inserting a new publication.
///
/// Access rights are given as plain names here, they get resolved into roles when they are
/// validated by the registry.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPublication {
    pub name: String,
    pub uuid: Uuid,
    pub title: String,
    pub style_type: Option<StyleType>,
    pub bounding_box: Option<BoundingBox>,
    pub read: BTreeSet<String>,
    pub write: BTreeSet<String>,
}

impl NewPublication {
    /// Publication with a random uuid, title equal to the name and no access rights.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            uuid: Uuid::new_v4(),
            style_type: None,
            bounding_box: None,
            read: BTreeSet::new(),
            write: BTreeSet::new(),
        }
    }

    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn style_type(mut self, style_type: StyleType) -> Self {
        self.style_type = Some(style_type);
        self
    }

    pub fn bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn read<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn write<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Partial update of a publication.
///
/// Fields left at `Patch::Keep` stay untouched. Supplied access right sets replace the current
/// ones wholesale, they are never merged.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PublicationPatch {
    pub title: Patch<String>,
    pub style_type: Patch<Option<StyleType>>,
    pub bounding_box: Patch<Option<BoundingBox>>,
    pub read: Patch<BTreeSet<String>>,
    pub write: Patch<BTreeSet<String>>,
}

impl PublicationPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Patch::Set(title.into());
        self
    }

    pub fn style_type(mut self, style_type: Option<StyleType>) -> Self {
        self.style_type = Patch::Set(style_type);
        self
    }

    pub fn bounding_box(mut self, bounding_box: Option<BoundingBox>) -> Self {
        self.bounding_box = Patch::Set(bounding_box);
        self
    }

    pub fn read<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.read = Patch::Set(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn write<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.write = Patch::Set(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn touches_access_rights(&self) -> bool {
        self.read.is_set() || self.write.is_set()
    }
}

/// Returns `true` if the actor is covered by one of the given roles.
///
/// `EVERYONE` covers every actor, identified users are matched by name against user and workspace
/// roles.
pub fn covers(roles: &RoleSet, actor: &Actor) -> bool {
    roles.iter().any(|role| match (role, actor) {
        (Role::Everyone, _) => true,
        (_, Actor::Anonymous) => false,
        (role, Actor::User(name)) => role.name() == name,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::role::{Actor, Role};

    use super::{PublicationKey, PublicationType, StyleType, covers};

    #[test]
    fn key_ordering() {
        let mut keys = vec![
            PublicationKey::new("ws2", PublicationType::Layer, "a"),
            PublicationKey::new("ws1", PublicationType::Map, "a"),
            PublicationKey::new("ws1", PublicationType::Layer, "b"),
            PublicationKey::new("ws1", PublicationType::Layer, "a"),
        ];
        keys.sort();

        assert_eq!(
            keys.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["ws1/layer/a", "ws1/layer/b", "ws1/map/a", "ws2/layer/a"]
        );
    }

    #[test]
    fn parse_types() {
        assert_eq!("map".parse::<PublicationType>(), Ok(PublicationType::Map));
        assert_eq!("qml".parse::<StyleType>(), Ok(StyleType::Qml));
        assert!("raster".parse::<PublicationType>().is_err());
        assert_eq!(
            serde_json::to_string(&PublicationType::Layer).unwrap(),
            "\"layer\""
        );
    }

    #[test]
    fn actor_coverage() {
        let roles = BTreeSet::from([Role::User("alice".into()), Role::Workspace("team".into())]);

        assert!(covers(&roles, &Actor::user("alice")));
        assert!(covers(&roles, &Actor::user("team")));
        assert!(!covers(&roles, &Actor::user("bob")));
        assert!(!covers(&roles, &Actor::Anonymous));

        let public = BTreeSet::from([Role::Everyone]);
        assert!(covers(&public, &Actor::Anonymous));
        assert!(covers(&public, &Actor::user("bob")));
    }
}
