// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cmp::Ordering;

use geocat_auth::{can_read, can_write};
use geocat_core::{BoundingBox, Publication, PublicationKey};
use indexmap::IndexMap;

use crate::collation::{TitleKey, tokenize};
use crate::full_text::Expression;
use crate::request::{OrderBy, PublicationQuery, QueryError};

/// Query result in computed order.
pub type PublicationInfos = IndexMap<PublicationKey, Publication>;

/// Filters and orders publications according to the query.
///
/// All parts of the query are validated before any record is looked at, a malformed query fails
/// with [`QueryError`] even if there are no publications. Records which compare equal under all
/// requested orderings are ordered by their key; without any ordering requested the insertion
/// order is kept.
pub fn select<I>(publications: I, query: &PublicationQuery) -> Result<PublicationInfos, QueryError>
where
    I: IntoIterator<Item = Publication>,
{
    let filter_expression = query
        .full_text_filter
        .as_deref()
        .map(Expression::parse)
        .transpose()?;
    let bbox_filter = query.bbox_filter;

    let ordering_expression = query
        .ordering_full_text
        .as_deref()
        .map(Expression::parse)
        .transpose()?;
    let ordering_bbox = query.ordering_bbox;

    for order_by in &query.order_by_list {
        let missing = match order_by {
            OrderBy::FullText => ordering_expression.is_none(),
            OrderBy::Bbox => ordering_bbox.is_none(),
            OrderBy::Title | OrderBy::LastChange => false,
        };
        if missing {
            return Err(QueryError::MissingOrderingParameter(*order_by));
        }
    }

    let mut candidates: Vec<Candidate> = publications
        .into_iter()
        .filter(|publication| {
            query
                .workspace
                .as_deref()
                .is_none_or(|workspace| publication.workspace() == workspace)
                && query
                    .publication_type
                    .is_none_or(|publication_type| publication.publication_type() == publication_type)
                && query
                    .style_type
                    .is_none_or(|style_type| publication.style_type == Some(style_type))
                && query
                    .reader
                    .as_ref()
                    .is_none_or(|actor| can_read(publication, actor))
                && query
                    .writer
                    .as_ref()
                    .is_none_or(|actor| can_write(publication, actor))
                && bbox_filter.as_ref().is_none_or(|bbox| {
                    publication
                        .bounding_box
                        .is_some_and(|own| own.intersects(bbox))
                })
        })
        .map(|publication| Candidate::new(publication, ordering_expression.as_ref()))
        .filter(|candidate| {
            filter_expression
                .as_ref()
                .is_none_or(|expression| expression.matches(&candidate.tokens))
        })
        .collect();

    candidates.sort_by(|a, b| {
        compare(a, b, &query.order_by_list, ordering_bbox.as_ref())
    });

    Ok(candidates
        .into_iter()
        .map(|candidate| (candidate.publication.key.clone(), candidate.publication))
        .collect())
}

/// Publication with its precomputed sort keys.
struct Candidate {
    publication: Publication,
    tokens: Vec<String>,
    relevance: Option<usize>,
    title_key: TitleKey,
}

impl Candidate {
    fn new(publication: Publication, ordering: Option<&Expression>) -> Self {
        let mut tokens = tokenize(&publication.title);
        tokens.extend(tokenize(publication.name()));

        let relevance = ordering.and_then(|expression| expression.relevance(&tokens));
        let title_key = TitleKey::new(&publication.title);

        Self {
            publication,
            tokens,
            relevance,
            title_key,
        }
    }
}

fn compare(
    a: &Candidate,
    b: &Candidate,
    order_by_list: &[OrderBy],
    ordering_bbox: Option<&BoundingBox>,
) -> Ordering {
    if order_by_list.is_empty() {
        return a.publication.sequence.cmp(&b.publication.sequence);
    }

    order_by_list
        .iter()
        .map(|order_by| match order_by {
            OrderBy::FullText => none_last(a.relevance, b.relevance, |x, y| y.cmp(&x)),
            OrderBy::Title => a.title_key.cmp(&b.title_key),
            OrderBy::LastChange => b.publication.last_change.cmp(&a.publication.last_change),
            OrderBy::Bbox => match ordering_bbox {
                Some(reference) => none_last(
                    a.publication.bounding_box,
                    b.publication.bounding_box,
                    |x, y| compare_bbox(&x, &y, reference),
                ),
                None => Ordering::Equal,
            },
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.publication.key.cmp(&b.publication.key))
}

fn none_last<T>(a: Option<T>, b: Option<T>, compare: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Larger overlap with the reference first, then the closer centroid.
fn compare_bbox(a: &BoundingBox, b: &BoundingBox, reference: &BoundingBox) -> Ordering {
    b.intersection_area(reference)
        .total_cmp(&a.intersection_area(reference))
        .then_with(|| {
            a.centroid_distance(reference)
                .total_cmp(&b.centroid_distance(reference))
        })
}
