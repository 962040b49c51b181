// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Flatscan pipeline.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::{FlatscanError, Result};

/// A point in image pixel coordinates (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

/// An immutable, non-empty raster image.
///
/// The only way to build one is through [`RasterImage::new`], which rejects
/// zero-sized buffers. The pipeline reads the wrapped image but never
/// mutates it; every derived buffer is a fresh allocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage(DynamicImage);

impl RasterImage {
    /// Wrap a decoded image, rejecting images with no pixels.
    pub fn new(image: DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(FlatscanError::EmptyImage { width, height });
        }
        Ok(Self(image))
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.0.width(), self.0.height())
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.0
    }

    /// Consume the handle and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.0
    }
}

impl TryFrom<DynamicImage> for RasterImage {
    type Error = FlatscanError;

    fn try_from(image: DynamicImage) -> Result<Self> {
        Self::new(image)
    }
}

/// Signed area of a closed polygon (shoelace formula).
///
/// Positive for clockwise vertices in image coordinates (y grows downward);
/// zero for fewer than three points.
pub fn signed_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice_area: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice_area / 2.0
}

/// Four document corners with fixed labels.
///
/// Always fully populated; the labels come from the corner-ordering rule,
/// never from the order in which a detector produced the vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedQuad {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl OrderedQuad {
    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Enclosed area.
    pub fn area(&self) -> f64 {
        signed_area(&self.corners()).abs()
    }

    /// The same quad with every coordinate multiplied by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            top_left: self.top_left.scale(factor),
            top_right: self.top_right.scale(factor),
            bottom_right: self.bottom_right.scale(factor),
            bottom_left: self.bottom_left.scale(factor),
        }
    }
}

/// Which branch of the fallback chain produced a [`ScanResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOutcome {
    /// A four-cornered document boundary was found and rectified.
    Rectified,
    /// No quadrilateral was found; the bounding box of the largest
    /// significant region was cropped instead.
    BoundingBox,
    /// Nothing usable was found (or processing failed); the source image is
    /// returned unchanged.
    Passthrough,
}

impl ScanOutcome {
    /// Whether the caller should surface an advisory notice.
    pub fn is_warning(self) -> bool {
        !matches!(self, Self::Rectified)
    }
}

/// Result of one scan invocation. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScanResult {
    image: RasterImage,
    outcome: ScanOutcome,
    quad: Option<OrderedQuad>,
}

impl ScanResult {
    /// A confidently rectified document.
    pub fn rectified(image: RasterImage, quad: OrderedQuad) -> Self {
        Self {
            image,
            outcome: ScanOutcome::Rectified,
            quad: Some(quad),
        }
    }

    /// A best-guess crop through the bounding box of the largest region.
    pub fn bounding_box(image: RasterImage, quad: OrderedQuad) -> Self {
        Self {
            image,
            outcome: ScanOutcome::BoundingBox,
            quad: Some(quad),
        }
    }

    /// The untouched source image.
    pub fn passthrough(source: RasterImage) -> Self {
        Self {
            image: source,
            outcome: ScanOutcome::Passthrough,
            quad: None,
        }
    }

    /// The output image (rectified, cropped, or the original).
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    pub fn into_image(self) -> RasterImage {
        self.image
    }

    pub fn outcome(&self) -> ScanOutcome {
        self.outcome
    }

    /// `true` unless the document boundary was found with confidence.
    pub fn warning(&self) -> bool {
        self.outcome.is_warning()
    }

    /// The full-resolution quad the output was warped from, if any.
    pub fn quad(&self) -> Option<&OrderedQuad> {
        self.quad.as_ref()
    }
}
