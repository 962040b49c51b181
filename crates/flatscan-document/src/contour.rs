// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour extraction — outer region boundaries traced from a binary mask.

use flatscan_core::Point2D;
use image::{GrayImage, imageops};
use imageproc::contours::{BorderType, find_contours};

use crate::geometry::{self, BoundingBox};

/// A closed boundary traced around a foreground region.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2D>,
}

impl Contour {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area in square pixels.
    pub fn area(&self) -> f64 {
        geometry::polygon_area(&self.points)
    }

    /// Closed perimeter length in pixels.
    pub fn perimeter(&self) -> f64 {
        geometry::closed_arc_length(&self.points)
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(&self.points)
    }
}

/// Trace the outer border of every foreground region in `mask`.
///
/// Any non-zero pixel is foreground. Hole borders are skipped, as are
/// borders with fewer than three points (they enclose no area).
///
/// The mask is traced inside a one-pixel background margin, so regions
/// running off the frame still close; points come back in mask coordinates.
pub fn outer_contours(mask: &GrayImage) -> Vec<Contour> {
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.points.len() >= 3)
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point2D::new(f64::from(p.x - 1), f64::from(p.y - 1)))
                    .collect(),
            )
        })
        .collect()
}
