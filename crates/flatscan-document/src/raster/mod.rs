// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster preparation — analysis downscaling, smoothing, and local-mean
// thresholding.

pub mod analysis;
pub mod threshold;

pub use analysis::AnalysisImage;
pub use threshold::adaptive_threshold;
