// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Candidate scoring — pick the largest contour that simplifies to a
// quadrilateral.

use flatscan_core::Point2D;
use tracing::debug;

use crate::contour::Contour;
use crate::geometry;

/// A contour that simplified to exactly four vertices and cleared the area
/// floor. Coordinates are in analysis space.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    vertices: [Point2D; 4],
    /// Area of the contour the candidate came from.
    area: f64,
}

impl Candidate {
    pub fn new(vertices: [Point2D; 4], area: f64) -> Self {
        Self { vertices, area }
    }

    pub fn vertices(&self) -> &[Point2D; 4] {
        &self.vertices
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Vertices mapped onto the full-resolution source.
    pub fn to_source(&self, ratio: f64) -> [Point2D; 4] {
        self.vertices.map(|p| p.scale(ratio))
    }
}

/// Parameters for [`score_contours`].
#[derive(Debug, Clone, Copy)]
pub struct Scoring {
    /// Contours below this area (square analysis pixels) are ignored.
    pub min_area: f64,
    /// Simplification tolerance as a fraction of each contour's perimeter.
    pub epsilon_fraction: f64,
    /// How many of the largest contours to examine.
    pub top_k: usize,
}

/// What scoring found in one set of contours.
#[derive(Debug, Clone, Default)]
pub struct Scored {
    pub candidate: Option<Candidate>,
    /// The largest contour that cleared the area floor, quad or not.
    pub largest: Option<Contour>,
}

/// Examine the `top_k` largest contours, in descending area order, and
/// accept the first whose simplified polygon has exactly four vertices.
/// Accepted corners are sharpened with [`geometry::refine_quad_corners`],
/// keeping the simplified vertices when refinement fails.
pub fn score_contours(mut contours: Vec<Contour>, scoring: &Scoring) -> Scored {
    contours.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut scored = Scored::default();
    for (rank, contour) in contours.into_iter().take(scoring.top_k).enumerate() {
        let area = contour.area();
        if area < scoring.min_area {
            // Sorted descending: everything after is smaller still.
            debug!(rank, area, min_area = scoring.min_area, "Contour below area floor");
            break;
        }

        let epsilon = scoring.epsilon_fraction * contour.perimeter();
        let polygon = geometry::approximate_polygon_indices(contour.points(), epsilon);
        debug!(rank, area, vertices = polygon.len(), "Contour simplified");

        let quad = <[usize; 4]>::try_from(polygon).ok().map(|indices| {
            let points = contour.points();
            geometry::refine_quad_corners(points, indices, epsilon)
                .unwrap_or_else(|| indices.map(|i| points[i]))
        });
        if scored.largest.is_none() {
            scored.largest = Some(contour);
        }
        if let Some(vertices) = quad {
            scored.candidate = Some(Candidate::new(vertices, area));
            break;
        }
    }
    scored
}
