// SPDX-License-Identifier: MIT OR Apache-2.0

//! Publication registry and access-control engine for geospatial layers and maps.
//!
//! The [`Registry`] keeps track of all publications of a catalog. Every publication lives in a
//! workspace, has a title, an optional extent and two sets of roles deciding who can read and who
//! can write it. Inserts and updates validate these access rights against the known users and
//! workspaces before anything is persisted:
//!
//! ```text
//! begin --> lookup --> check rights --> persist --> commit
//!                            |
//!                            +--> rollback on any failure
//! ```
//!
//! Publications can be searched with [`PublicationQuery`], combining attribute and access filters,
//! a spatial filter, full-text search over titles and names and a list of orderings.
//!
//! Storage is pluggable through the traits in `geocat-store`. An SQLite backed registry is
//! created with [`Registry::builder`], tests use the in-memory store.
mod builder;
mod config;
mod error;
mod registry;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use builder::RegistryBuilder;
pub use config::{Config, StoreConfig};
pub use error::{ErrorCode, RegistryError};
pub use geocat_auth::{IdentityProvider, RightsError, can_read, can_write};
pub use geocat_core::{
    AccessRights, Actor, BoundingBox, BoundingBoxError, EVERYONE, NewPublication, Patch,
    Publication, PublicationKey, PublicationPatch, PublicationType, Role, RoleSet, StyleType,
    Timestamp,
};
pub use geocat_query::{OrderBy, PublicationInfos, PublicationQuery, QueryError};
pub use registry::{Registry, RegistryResult};
