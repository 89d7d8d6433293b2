// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query engine for geocat publications.
//!
//! A [`PublicationQuery`] is evaluated against a snapshot of publication records with
//! [`select`]. The result keeps the computed order and is keyed by [`PublicationKey`] so callers
//! can iterate it in order and still look up single records.
//!
//! Full-text filters use a small expression language over search terms:
//!
//! ```text
//! kun & ody         both terms
//! dva | kun         any of the terms
//! !draft            negation
//! (a | b) c         grouping, juxtaposed terms are combined with AND
//! ```
//!
//! [`PublicationKey`]: geocat_core::PublicationKey
mod collation;
mod full_text;
mod request;
mod select;

pub use collation::{TitleKey, normalize, tokenize};
pub use full_text::{Expression, ParseError};
pub use request::{OrderBy, PublicationQuery, QueryError};
pub use select::{PublicationInfos, select};
