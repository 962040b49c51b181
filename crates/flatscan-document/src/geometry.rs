// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Planar geometry helpers for closed polygons: area, perimeter, bounding box,
// Douglas-Peucker simplification and line-fit corner refinement.

use flatscan_core::{Point2D, signed_area};

/// Absolute enclosed area of a closed polygon.
pub fn polygon_area(points: &[Point2D]) -> f64 {
    signed_area(points).abs()
}

/// Perimeter of a closed polygon, including the closing edge.
pub fn closed_arc_length(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .sum()
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Point2D]) -> Option<Self> {
        let first = points.first()?;
        let init = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.iter().skip(1).fold(init, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Corners clockwise from the top-left.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            Point2D::new(self.min_x, self.min_y),
            Point2D::new(self.max_x, self.min_y),
            Point2D::new(self.max_x, self.max_y),
            Point2D::new(self.min_x, self.max_y),
        ]
    }

    /// Multiply every coordinate by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            min_x: self.min_x * factor,
            min_y: self.min_y * factor,
            max_x: self.max_x * factor,
            max_y: self.max_y * factor,
        }
    }

    /// Clip the box to `[0, width] x [0, height]`.
    pub fn clamp_to(&self, width: f64, height: f64) -> Self {
        Self {
            min_x: self.min_x.clamp(0.0, width),
            min_y: self.min_y.clamp(0.0, height),
            max_x: self.max_x.clamp(0.0, width),
            max_y: self.max_y.clamp(0.0, height),
        }
    }
}

/// Simplify a closed polygon with the Douglas-Peucker algorithm.
///
/// The ring is split at the vertex farthest from the first point and each
/// half is simplified as an open chain. A final pass removes any vertex that
/// lies within `epsilon` of the segment joining its neighbours, so the result
/// does not depend on where the ring happened to start.
pub fn approximate_polygon(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    approximate_polygon_indices(points, epsilon)
        .into_iter()
        .map(|i| points[i])
        .collect()
}

/// As [`approximate_polygon`], but returns the surviving vertices as
/// ascending indices into `points`.
pub fn approximate_polygon_indices(points: &[Point2D], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n < 3 {
        return (0..n).collect();
    }

    let origin = points[0];
    let split = (1..n)
        .max_by(|&a, &b| {
            origin
                .distance(points[a])
                .total_cmp(&origin.distance(points[b]))
        })
        .unwrap_or(n / 2);

    // Chain 0..=split, then split..=n wrapping back to the origin.
    let mut ring: Vec<Point2D> = points.to_vec();
    ring.push(origin);

    let mut kept = vec![false; ring.len()];
    kept[0] = true;
    kept[split] = true;
    kept[n] = true;
    mark_kept(&ring, 0, split, epsilon, &mut kept);
    mark_kept(&ring, split, n, epsilon, &mut kept);

    // Drop the duplicated origin at index n.
    let simplified: Vec<usize> = (0..n).filter(|&i| kept[i]).collect();
    drop_flat_vertices(points, simplified, epsilon)
}

/// Iterative Douglas-Peucker over `points[start..=end]`.
fn mark_kept(points: &[Point2D], start: usize, end: usize, epsilon: f64, kept: &mut [bool]) {
    let mut stack = vec![(start, end)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut max_dist = 0.0;
        let mut max_idx = lo;
        for i in (lo + 1)..hi {
            let d = perpendicular_distance(points[i], points[lo], points[hi]);
            if d > max_dist {
                max_dist = d;
                max_idx = i;
            }
        }
        if max_dist > epsilon {
            kept[max_idx] = true;
            stack.push((lo, max_idx));
            stack.push((max_idx, hi));
        }
    }
}

/// Remove vertices that sit within `epsilon` of the line through their
/// neighbours, flattest first, until none remain or only a triangle is left.
fn drop_flat_vertices(points: &[Point2D], mut polygon: Vec<usize>, epsilon: f64) -> Vec<usize> {
    while polygon.len() > 3 {
        let n = polygon.len();
        let flattest = (0..n)
            .map(|i| {
                let prev = points[polygon[(i + n - 1) % n]];
                let next = points[polygon[(i + 1) % n]];
                (i, perpendicular_distance(points[polygon[i]], prev, next))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match flattest {
            Some((i, d)) if d <= epsilon => {
                polygon.remove(i);
            }
            _ => break,
        }
    }
    polygon
}

/// An infinite line through `origin` along the unit vector `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub origin: Point2D,
    pub direction: Point2D,
}

impl Line {
    /// Total-least-squares fit: the line through the centroid along the
    /// principal axis of the points. `None` for fewer than two distinct points.
    pub fn fit(points: &[Point2D]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        let n = points.len() as f64;
        let cx = points.iter().map(|p| p.x).sum::<f64>() / n;
        let cy = points.iter().map(|p| p.y).sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for p in points {
            let (dx, dy) = (p.x - cx, p.y - cy);
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }
        if sxx + syy <= f64::EPSILON {
            return None;
        }

        let angle = 0.5 * (2.0 * sxy).atan2(sxx - syy);
        Some(Self {
            origin: Point2D::new(cx, cy),
            direction: Point2D::new(angle.cos(), angle.sin()),
        })
    }

    /// Crossing point with `other`, or `None` when the two are within about
    /// three degrees of parallel.
    pub fn intersect(&self, other: &Self) -> Option<Point2D> {
        let d1 = self.direction;
        let d2 = other.direction;
        let cross = d1.x * d2.y - d1.y * d2.x;
        if cross.abs() < 0.05 {
            return None;
        }
        let wx = other.origin.x - self.origin.x;
        let wy = other.origin.y - self.origin.y;
        let t = (wx * d2.y - wy * d2.x) / cross;
        Some(Point2D::new(
            self.origin.x + t * d1.x,
            self.origin.y + t * d1.y,
        ))
    }
}

/// Share of each side, at either end, left out of the side's line fit.
const CORNER_TRIM: f64 = 0.2;

/// Sharpen the corners of a ring that simplified to four vertices.
///
/// `vertices` are ascending indices into `ring`. Each side is the run of ring
/// points between two consecutive vertices; a line is fitted to the middle of
/// every run and adjacent lines are intersected. Traced outlines round their
/// corners off, so the simplified vertices land somewhere along the rounding
/// while the intersections recover where the straight edges actually meet.
///
/// Returns `None` when a side is too short to fit, two sides are nearly
/// parallel, or a corner would move more than `max_shift` from its vertex.
pub fn refine_quad_corners(
    ring: &[Point2D],
    vertices: [usize; 4],
    max_shift: f64,
) -> Option<[Point2D; 4]> {
    let n = ring.len();
    if vertices.iter().any(|&v| v >= n) {
        return None;
    }

    let mut sides = Vec::with_capacity(4);
    for i in 0..4 {
        let start = vertices[i];
        let span = (vertices[(i + 1) % 4] + n - start) % n;
        let trim = (span as f64 * CORNER_TRIM).floor() as usize;
        let run: Vec<Point2D> = (trim..=span.saturating_sub(trim))
            .map(|k| ring[(start + k) % n])
            .collect();
        sides.push(Line::fit(&run)?);
    }

    let mut corners = [Point2D::default(); 4];
    for i in 0..4 {
        let corner = sides[(i + 3) % 4].intersect(&sides[i])?;
        if corner.distance(ring[vertices[i]]) > max_shift {
            return None;
        }
        corners[i] = corner;
    }
    Some(corners)
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// When `a` and `b` coincide, returns the distance from `p` to `a`.
fn perpendicular_distance(p: Point2D, a: Point2D, b: Point2D) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return p.distance(a);
    }
    (dx * (a.y - p.y) - dy * (a.x - p.x)).abs() / length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2D> {
        coords.iter().map(|&(x, y)| Point2D::new(x, y)).collect()
    }

    /// Walk the border of an axis-aligned rectangle one pixel at a time,
    /// starting at the top-left corner, clockwise.
    fn rectangle_ring(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2D> {
        let mut ring = Vec::new();
        let mut x = x0;
        while x < x1 {
            ring.push(Point2D::new(x, y0));
            x += 1.0;
        }
        let mut y = y0;
        while y < y1 {
            ring.push(Point2D::new(x1, y));
            y += 1.0;
        }
        let mut x = x1;
        while x > x0 {
            ring.push(Point2D::new(x, y1));
            x -= 1.0;
        }
        let mut y = y1;
        while y > y0 {
            ring.push(Point2D::new(x0, y));
            y -= 1.0;
        }
        ring
    }

    #[test]
    fn shoelace_area_rectangle() {
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 5.0), (0.0, 5.0)]);
        assert!((polygon_area(&square) - 50.0).abs() < 1e-9);
        assert!(signed_area(&square) > 0.0, "clockwise in image coordinates");
    }

    #[test]
    fn degenerate_polygons_have_zero_area() {
        assert_eq!(polygon_area(&[]), 0.0);
        assert_eq!(polygon_area(&pts(&[(0.0, 0.0), (5.0, 5.0)])), 0.0);
    }

    #[test]
    fn arc_length_includes_closing_edge() {
        let square = pts(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0), (0.0, 4.0)]);
        assert!((closed_arc_length(&square) - 14.0).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_of_scattered_points() {
        let b = BoundingBox::enclosing(&pts(&[(3.0, 9.0), (-1.0, 2.0), (7.0, 4.0)]))
            .expect("non-empty");
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (-1.0, 2.0, 7.0, 9.0));
        assert_eq!(b.width(), 8.0);
        assert_eq!(b.height(), 7.0);
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn bounding_box_clamps_to_frame() {
        let b = BoundingBox {
            min_x: -4.0,
            min_y: 2.0,
            max_x: 120.0,
            max_y: 50.0,
        };
        let c = b.clamp_to(100.0, 40.0);
        assert_eq!((c.min_x, c.min_y, c.max_x, c.max_y), (0.0, 2.0, 100.0, 40.0));
    }

    #[test]
    fn pixel_rectangle_simplifies_to_four_corners() {
        let ring = rectangle_ring(10.0, 20.0, 110.0, 80.0);
        let eps = 0.02 * closed_arc_length(&ring);
        let poly = approximate_polygon(&ring, eps);
        assert_eq!(poly.len(), 4, "got {poly:?}");
        for corner in pts(&[(10.0, 20.0), (110.0, 20.0), (110.0, 80.0), (10.0, 80.0)]) {
            assert!(poly.contains(&corner), "missing corner {corner:?} in {poly:?}");
        }
    }

    #[test]
    fn start_point_mid_edge_still_gives_four_vertices() {
        let mut ring = rectangle_ring(0.0, 0.0, 60.0, 40.0);
        ring.rotate_left(25);
        let eps = 0.02 * closed_arc_length(&ring);
        assert_eq!(approximate_polygon(&ring, eps).len(), 4);
    }

    #[test]
    fn octagon_is_not_a_quad() {
        let ring: Vec<Point2D> = (0..360)
            .map(|deg| {
                let t = f64::from(deg).to_radians();
                Point2D::new(100.0 + 80.0 * t.cos(), 100.0 + 80.0 * t.sin())
            })
            .collect();
        let eps = 0.02 * closed_arc_length(&ring);
        let poly = approximate_polygon(&ring, eps);
        assert!(poly.len() > 4, "circle collapsed to {} vertices", poly.len());
    }

    #[test]
    fn tiny_inputs_returned_unchanged() {
        let two = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(approximate_polygon(&two, 1.0), two);
    }

    /// Trace a closed polygon at unit steps along each edge.
    fn sampled_ring(vertices: &[(f64, f64)]) -> Vec<Point2D> {
        let mut ring = Vec::new();
        for (i, &(ax, ay)) in vertices.iter().enumerate() {
            let (bx, by) = vertices[(i + 1) % vertices.len()];
            let steps = (bx - ax).abs().max((by - ay).abs()).ceil() as usize;
            for k in 0..steps {
                let t = k as f64 / steps as f64;
                ring.push(Point2D::new(ax + t * (bx - ax), ay + t * (by - ay)));
            }
        }
        ring
    }

    fn chamfered_rectangle() -> Vec<Point2D> {
        sampled_ring(&[
            (4.0, 0.0),
            (96.0, 0.0),
            (100.0, 4.0),
            (100.0, 56.0),
            (96.0, 60.0),
            (4.0, 60.0),
            (0.0, 56.0),
            (0.0, 4.0),
        ])
    }

    #[test]
    fn vertex_indices_are_ascending_and_match_points() {
        let ring = rectangle_ring(10.0, 20.0, 110.0, 80.0);
        let eps = 0.02 * closed_arc_length(&ring);
        let indices = approximate_polygon_indices(&ring, eps);
        assert!(indices.windows(2).all(|w| w[0] < w[1]), "{indices:?}");
        let mapped: Vec<Point2D> = indices.iter().map(|&i| ring[i]).collect();
        assert_eq!(mapped, approximate_polygon(&ring, eps));
    }

    #[test]
    fn chamfered_corners_are_sharpened() {
        let ring = chamfered_rectangle();
        let eps = 0.02 * closed_arc_length(&ring);
        let indices: [usize; 4] = approximate_polygon_indices(&ring, eps)
            .try_into()
            .expect("four vertices");

        let corners = refine_quad_corners(&ring, indices, eps).expect("refined");
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 60.0), (0.0, 60.0)] {
            let target = Point2D::new(x, y);
            assert!(
                corners.iter().any(|c| c.distance(target) < 1e-6),
                "no corner at ({x}, {y}) in {corners:?}"
            );
        }
    }

    #[test]
    fn refinement_respects_max_shift() {
        let ring = chamfered_rectangle();
        let eps = 0.02 * closed_arc_length(&ring);
        let indices: [usize; 4] = approximate_polygon_indices(&ring, eps)
            .try_into()
            .expect("four vertices");
        assert!(refine_quad_corners(&ring, indices, 0.5).is_none());
    }

    #[test]
    fn line_fit_and_intersection() {
        let horizontal = Line::fit(&pts(&[(0.0, 3.0), (5.0, 3.0), (9.0, 3.0)])).expect("line");
        let vertical = Line::fit(&pts(&[(7.0, -2.0), (7.0, 1.0), (7.0, 8.0)])).expect("line");
        let p = horizontal.intersect(&vertical).expect("not parallel");
        assert!((p.x - 7.0).abs() < 1e-9 && (p.y - 3.0).abs() < 1e-9, "{p:?}");

        let shifted = Line::fit(&pts(&[(0.0, 10.0), (4.0, 10.0)])).expect("line");
        assert!(horizontal.intersect(&shifted).is_none());
        assert!(Line::fit(&pts(&[(2.0, 2.0), (2.0, 2.0)])).is_none());
    }

    #[test]
    fn perpendicular_distance_to_horizontal_line() {
        let d = perpendicular_distance(
            Point2D::new(5.0, 3.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
        );
        assert!((d - 3.0).abs() < 1e-9);
    }
}
