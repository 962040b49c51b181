// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Boundary detection — find the document outline in a full-resolution image.

use flatscan_core::{FlatscanError, OrderedQuad, Point2D, RasterImage, Result, ScanConfig};
use tracing::{debug, info, instrument};

use crate::contour::Contour;
use crate::geometry::BoundingBox;
use crate::raster::AnalysisImage;
use crate::scan::order::order_corners;
use crate::scan::strategy::{DetectionStrategy, StrategyKind};

/// What the detector found, in full-resolution source coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// Four document corners, unordered.
    Quad {
        corners: [Point2D; 4],
        strategy: StrategyKind,
    },
    /// No quadrilateral, but a region large enough to matter; its
    /// axis-aligned bounds, clipped to the source frame.
    Region { bounds: BoundingBox },
    /// Nothing above the area floor.
    Nothing,
}

/// Runs the strategy cascade over a downscaled copy of the source.
///
/// Holds only immutable configuration, so one detector can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct BoundaryDetector {
    config: ScanConfig,
    strategies: Vec<StrategyKind>,
}

impl Default for BoundaryDetector {
    fn default() -> Self {
        Self {
            config: ScanConfig::default(),
            strategies: StrategyKind::CASCADE.to_vec(),
        }
    }
}

impl BoundaryDetector {
    /// Detector with the default cascade.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_strategies(config, StrategyKind::CASCADE.to_vec())
    }

    /// Detector with an explicit strategy order.
    pub fn with_strategies(config: ScanConfig, strategies: Vec<StrategyKind>) -> Result<Self> {
        config.validate()?;
        if strategies.is_empty() {
            return Err(FlatscanError::Config(
                "at least one detection strategy is required".into(),
            ));
        }
        Ok(Self { config, strategies })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    /// Locate the document and return its ordered corners, or `None` when no
    /// four-sided outline clears the area floor.
    pub fn detect(&self, image: &RasterImage) -> Option<OrderedQuad> {
        match self.analyze(image) {
            Detection::Quad { corners, .. } => Some(order_corners(corners)),
            Detection::Region { .. } | Detection::Nothing => None,
        }
    }

    /// Run the full cascade and report the best evidence found.
    ///
    /// Strategies run in order and the first accepted candidate wins. When
    /// none is accepted, the largest significant contour seen across all
    /// strategies is reported as a [`Detection::Region`].
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn analyze(&self, image: &RasterImage) -> Detection {
        let analysis = AnalysisImage::prepare(image, &self.config);
        let ratio = analysis.ratio();

        let mut largest: Option<Contour> = None;
        for &strategy in &self.strategies {
            let attempt = strategy.try_detect(&analysis, &self.config);

            if let Some(candidate) = attempt.scored.candidate {
                let corners = candidate.to_source(ratio);
                info!(
                    strategy = strategy.name(),
                    area = candidate.area(),
                    ?corners,
                    "Document outline found"
                );
                return Detection::Quad { corners, strategy };
            }

            debug!(
                strategy = strategy.name(),
                contours = attempt.contour_count,
                significant = attempt.scored.largest.is_some(),
                "No quadrilateral from strategy"
            );
            if let Some(contour) = attempt.scored.largest {
                if largest.as_ref().is_none_or(|l| contour.area() > l.area()) {
                    largest = Some(contour);
                }
            }
        }

        match largest.and_then(|c| c.bounding_box()) {
            Some(bounds) => {
                let bounds = bounds
                    .scale(ratio)
                    .clamp_to(f64::from(image.width()), f64::from(image.height()));
                info!(?bounds, "Falling back to largest region");
                Detection::Region { bounds }
            }
            None => {
                info!("No document outline found");
                Detection::Nothing
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn page_on_black(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> RasterImage {
        let rgb = RgbImage::from_fn(w, h, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        RasterImage::new(DynamicImage::ImageRgb8(rgb)).expect("non-empty")
    }

    fn near(p: Point2D, x: f64, y: f64, tol: f64) -> bool {
        (p.x - x).abs() <= tol && (p.y - y).abs() <= tol
    }

    #[test]
    fn corners_come_back_in_source_coordinates() {
        // 1000x800 analyses at 625x500, so every vertex is scaled by 1.6.
        let image = page_on_black(1000, 800, 100, 100, 900, 700);
        let detector = BoundaryDetector::default();
        let quad = detector.detect(&image).expect("page found");

        assert!(near(quad.top_left, 100.0, 100.0, 8.0), "{quad:?}");
        assert!(near(quad.top_right, 900.0, 100.0, 8.0), "{quad:?}");
        assert!(near(quad.bottom_right, 900.0, 700.0, 8.0), "{quad:?}");
        assert!(near(quad.bottom_left, 100.0, 700.0, 8.0), "{quad:?}");
    }

    #[test]
    fn first_strategy_wins_on_clean_input() {
        let image = page_on_black(600, 500, 60, 50, 540, 450);
        match BoundaryDetector::default().analyze(&image) {
            Detection::Quad { strategy, .. } => assert_eq!(strategy, StrategyKind::EdgeDilate),
            other => panic!("expected a quad, got {other:?}"),
        }
    }

    #[test]
    fn blank_image_has_nothing() {
        let rgb = RgbImage::from_pixel(400, 300, Rgb([128, 128, 128]));
        let image = RasterImage::new(DynamicImage::ImageRgb8(rgb)).expect("non-empty");
        assert_eq!(BoundaryDetector::default().analyze(&image), Detection::Nothing);
    }

    #[test]
    fn empty_cascade_is_rejected() {
        let err = BoundaryDetector::with_strategies(ScanConfig::default(), Vec::new()).unwrap_err();
        assert!(matches!(err, FlatscanError::Config(_)));
    }
}
