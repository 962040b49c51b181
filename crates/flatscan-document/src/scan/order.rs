// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering — label four unordered vertices as top-left, top-right,
// bottom-right and bottom-left.

use std::cmp::Ordering;

use flatscan_core::{OrderedQuad, Point2D};

/// Assign corner labels by diagonal extremes.
///
/// With `s = x + y` and `d = y - x` (image coordinates, y down):
/// top-left has the smallest `s`, bottom-right the largest `s`, top-right
/// the smallest `d` and bottom-left the largest `d`. Ties are broken on
/// `(x, y)` so the labelling depends only on the set of points, never on
/// their input order.
///
/// Assumes a roughly upright document. A square rotated by close to 45°
/// can receive the same point under two labels.
pub fn order_corners(points: [Point2D; 4]) -> OrderedQuad {
    let sum = |p: &Point2D| p.x + p.y;
    let diff = |p: &Point2D| p.y - p.x;

    OrderedQuad {
        top_left: extreme(&points, sum, Ordering::Less),
        top_right: extreme(&points, diff, Ordering::Less),
        bottom_right: extreme(&points, sum, Ordering::Greater),
        bottom_left: extreme(&points, diff, Ordering::Greater),
    }
}

/// The point whose `key` is smallest (`Less`) or largest (`Greater`), with
/// lexicographic `(x, y)` as the tie-break in the same direction.
fn extreme(points: &[Point2D; 4], key: impl Fn(&Point2D) -> f64, want: Ordering) -> Point2D {
    let compare = |a: &Point2D, b: &Point2D| {
        key(a)
            .total_cmp(&key(b))
            .then(a.x.total_cmp(&b.x))
            .then(a.y.total_cmp(&b.y))
    };
    let mut best = points[0];
    for p in &points[1..] {
        if compare(p, &best) == want {
            best = *p;
        }
    }
    best
}
