// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use geocat_core::{Actor, BoundingBox, PublicationType, StyleType};
use thiserror::Error;

use crate::full_text::ParseError;

/// Criteria to order publications by, applied in the given sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OrderBy {
    /// Relevance against `ordering_full_text`, most relevant first.
    FullText,

    /// Title in ascending collation order.
    Title,

    /// Most recently changed first.
    LastChange,

    /// Spatial similarity to `ordering_bbox`, most similar first.
    Bbox,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::FullText => "full_text",
            OrderBy::Title => "title",
            OrderBy::LastChange => "last_change",
            OrderBy::Bbox => "bbox",
        }
    }
}

impl Display for OrderBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query over the publications of the registry.
///
/// All filters are optional and combined with AND, an empty query returns every publication in
/// insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PublicationQuery {
    pub workspace: Option<String>,
    pub publication_type: Option<PublicationType>,
    pub style_type: Option<StyleType>,

    /// Only publications this actor can read.
    pub reader: Option<Actor>,

    /// Only publications this actor can write.
    pub writer: Option<Actor>,

    pub full_text_filter: Option<String>,
    pub bbox_filter: Option<BoundingBox>,
    pub order_by_list: Vec<OrderBy>,
    pub ordering_full_text: Option<String>,
    pub ordering_bbox: Option<BoundingBox>,
}

impl PublicationQuery {
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

    pub fn style_type(mut self, style_type: StyleType) -> Self {
        self.style_type = Some(style_type);
        self
    }

    pub fn reader(mut self, actor: Actor) -> Self {
        self.reader = Some(actor);
        self
    }

    pub fn writer(mut self, actor: Actor) -> Self {
        self.writer = Some(actor);
        self
    }

    pub fn full_text_filter(mut self, expression: impl Into<String>) -> Self {
        self.full_text_filter = Some(expression.into());
        self
    }

    pub fn bbox_filter(mut self, bbox: BoundingBox) -> Self {
        self.bbox_filter = Some(bbox);
        self
    }

    pub fn order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by_list.push(order_by);
        self
    }

    pub fn ordering_full_text(mut self, expression: impl Into<String>) -> Self {
        self.ordering_full_text = Some(expression.into());
        self
    }

    pub fn ordering_bbox(mut self, bbox: BoundingBox) -> Self {
        self.ordering_bbox = Some(bbox);
        self
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid full-text expression: {0}")]
    FullText(#[from] ParseError),

    #[error("ordering by {0} requires a reference value")]
    MissingOrderingParameter(OrderBy),
}
