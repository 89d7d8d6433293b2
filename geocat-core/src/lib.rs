// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data types shared by all geocat crates.
//!
//! A [`Publication`] is a named layer or map living in a workspace. It is identified by its
//! [`PublicationKey`], carries a stable uuid, a human-readable title, an optional extent in form
//! of a [`BoundingBox`] and two sets of [`Role`]s describing who is allowed to read and write it.
mod bbox;
mod patch;
mod publication;
mod role;
mod timestamp;

pub use bbox::{BoundingBox, BoundingBoxError};
pub use patch::Patch;
pub use publication::{
    AccessRights, NewPublication, ParseTypeError, Publication, PublicationKey, PublicationPatch,
    PublicationType, StyleType, covers,
};
pub use role::{Actor, EVERYONE, Role, RoleSet};
pub use timestamp::Timestamp;
