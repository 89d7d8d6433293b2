// SPDX-License-Identifier: MIT OR Apache-2.0

use geocat_core::{Publication, PublicationType};

/// Narrows down which publications are returned by `PublicationStore::get_all`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreFilter {
    pub workspace: Option<String>,
    pub publication_type: Option<PublicationType>,
}

impl StoreFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn publication_type(mut self, publication_type: PublicationType) -> Self {
        self.publication_type = Some(publication_type);
        self
    }

    pub fn matches(&self, publication: &Publication) -> bool {
        self.workspace
            .as_deref()
            .is_none_or(|workspace| publication.workspace() == workspace)
            && self
                .publication_type
                .is_none_or(|publication_type| publication.publication_type() == publication_type)
    }
}

/// Materialised result of a store scan.
///
/// Can be iterated as often as needed, the underlying store is not touched again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Publications(Vec<Publication>);

impl Publications {
    pub fn iter(&self) -> std::slice::Iter<'_, Publication> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Publication>> for Publications {
    fn from(value: Vec<Publication>) -> Self {
        Self(value)
    }
}

impl FromIterator<Publication> for Publications {
    fn from_iter<I: IntoIterator<Item = Publication>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Publications {
    type Item = Publication;

    type IntoIter = std::vec::IntoIter<Publication>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Publications {
    type Item = &'a Publication;

    type IntoIter = std::slice::Iter<'a, Publication>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
