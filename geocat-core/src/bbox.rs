// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned extent of a publication.
///
/// Boxes are closed: two boxes which only share an edge or a corner intersect. A box can have zero
/// area, for example when a layer consists of a single point.
///
/// Boxes are only built through [`BoundingBox::new`] or `TryFrom`, deserialization included. Every
/// box is finite and has its minimum below or equal to its maximum.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64, f64, f64)", into = "(f64, f64, f64, f64)")]
pub struct BoundingBox {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, BoundingBoxError> {
        if ![min_x, min_y, max_x, max_y].iter().all(|value| value.is_finite()) {
            return Err(BoundingBoxError::NotFinite);
        }

        if min_x > max_x || min_y > max_y {
            return Err(BoundingBoxError::Inverted {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }

        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn min_y(&self) -> f64 {
        self.min_y
    }

    pub fn max_x(&self) -> f64 {
        self.max_x
    }

    pub fn max_y(&self) -> f64 {
        self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns `true` if both boxes share at least one point.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Area both boxes have in common, `0.0` for disjoint or merely touching boxes.
    pub fn intersection_area(&self, other: &BoundingBox) -> f64 {
        let width = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let height = self.max_y.min(other.max_y) - self.min_y.max(other.min_y);
        if width <= 0.0 || height <= 0.0 {
            return 0.0;
        }
        width * height
    }

    /// Euclidean distance between the centroids of both boxes.
    pub fn centroid_distance(&self, other: &BoundingBox) -> f64 {
        let (x1, y1) = self.centroid();
        let (x2, y2) = other.centroid();
        (x1 - x2).hypot(y1 - y2)
    }
}

impl Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}

impl TryFrom<(f64, f64, f64, f64)> for BoundingBox {
    type Error = BoundingBoxError;

    fn try_from(value: (f64, f64, f64, f64)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2, value.3)
    }
}

impl From<BoundingBox> for (f64, f64, f64, f64) {
    fn from(value: BoundingBox) -> Self {
        (value.min_x, value.min_y, value.max_x, value.max_y)
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum BoundingBoxError {
    #[error("bounding box coordinates must be finite numbers")]
    NotFinite,

    #[error("bounding box ({min_x}, {min_y}, {max_x}, {max_y}) has minimum greater than maximum")]
    Inverted {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}
