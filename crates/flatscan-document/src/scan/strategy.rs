// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Detection strategies — different ways of turning the analysis image into a
// binary mask whose contours might outline the document.
//
// The boundary detector runs an ordered cascade of strategies and stops at
// the first one that yields a quadrilateral. Each strategy only decides how
// the mask is built; contour tracing and candidate scoring are shared.

use flatscan_core::ScanConfig;
use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::morphology::{close, dilate};
use tracing::debug;

use crate::contour;
use crate::raster::{AnalysisImage, adaptive_threshold};
use crate::scan::candidate::{Scored, Scoring, score_contours};

/// Selects a mask-building strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Canny edges, dilated to bridge small gaps. Cheap and general; fails
    /// when the document barely contrasts with its background.
    #[default]
    EdgeDilate,
    /// Local-mean adaptive threshold followed by a morphological close.
    /// Tolerates uneven lighting and weak contrast.
    AdaptiveClose,
}

impl StrategyKind {
    /// The cascade used when no other order is configured.
    pub const CASCADE: [StrategyKind; 2] = [Self::EdgeDilate, Self::AdaptiveClose];
}

/// Result of running one strategy.
#[derive(Debug, Clone, Default)]
pub struct StrategyAttempt {
    /// Number of outer contours traced from the mask.
    pub contour_count: usize,
    pub scored: Scored,
}

/// A way of producing a binary mask from the smoothed analysis image.
pub trait DetectionStrategy {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Build the mask. Non-zero pixels are foreground.
    fn binary_mask(&self, smoothed: &GrayImage, config: &ScanConfig) -> GrayImage;

    /// Mask, trace and score. Returns the accepted candidate, if any, along
    /// with the largest significant contour.
    fn try_detect(&self, analysis: &AnalysisImage, config: &ScanConfig) -> StrategyAttempt {
        let mask = self.binary_mask(analysis.gray(), config);
        let contours = contour::outer_contours(&mask);
        let contour_count = contours.len();
        debug!(strategy = self.name(), contour_count, "Contours traced");

        let scoring = Scoring {
            min_area: config.min_area_fraction * analysis.area(),
            epsilon_fraction: config.epsilon_fraction,
            top_k: config.top_k,
        };
        StrategyAttempt {
            contour_count,
            scored: score_contours(contours, &scoring),
        }
    }
}

impl DetectionStrategy for StrategyKind {
    fn name(&self) -> &'static str {
        match self {
            Self::EdgeDilate => "edge_dilate",
            Self::AdaptiveClose => "adaptive_close",
        }
    }

    fn binary_mask(&self, smoothed: &GrayImage, config: &ScanConfig) -> GrayImage {
        match *self {
            Self::EdgeDilate => edge_mask(smoothed, config),
            Self::AdaptiveClose => adaptive_mask(smoothed, config),
        }
    }
}

/// Canny edge map with a square dilation.
fn edge_mask(smoothed: &GrayImage, config: &ScanConfig) -> GrayImage {
    let edges = canny(smoothed, config.canny_low, config.canny_high);
    if config.dilate_radius == 0 {
        return edges;
    }
    dilate(&edges, Norm::LInf, config.dilate_radius)
}

/// Bright-rim adaptive threshold with a square closing.
fn adaptive_mask(smoothed: &GrayImage, config: &ScanConfig) -> GrayImage {
    let mask = adaptive_threshold(
        smoothed,
        config.adaptive_block_radius,
        config.adaptive_offset,
    );
    if config.close_radius == 0 {
        return mask;
    }
    close(&mask, Norm::LInf, config.close_radius)
}
