// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flatscan-document — Finds the page in a photograph and warps it flat.
//
// Provides input decoding (raster images, first page of a PDF through a
// pluggable rasterizer), contour-based boundary detection with a fallback
// strategy cascade, and homography-based perspective rectification.

pub mod contour;
pub mod decode;
pub mod geometry;
pub mod raster;
pub mod scan;

// Re-export the primary entry points so callers can use `flatscan_document::Scanner` etc.
pub use decode::{ImageDecoder, PageRasterizer, RasterDecoder};
pub use scan::{BoundaryDetector, Detection, Scanner, StrategyKind, order_corners, rectify, scan};
