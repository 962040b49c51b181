// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanner — the end-to-end pipeline. Detects the page, orders its corners and
// rectifies it, degrading to a bounding-box crop or the untouched input when
// detection comes up short. Never fails for a non-empty image.

use std::panic::{AssertUnwindSafe, catch_unwind};

use flatscan_core::{RasterImage, Result, ScanConfig, ScanResult};
use tracing::{error, info, instrument, warn};

use crate::scan::detect::{BoundaryDetector, Detection};
use crate::scan::order::order_corners;
use crate::scan::rectify::rectify;
use crate::scan::strategy::StrategyKind;

/// Reusable, thread-safe document scanner.
///
/// ```ignore
/// let scanner = Scanner::new(ScanConfig::default())?;
/// let result = scanner.scan(&image);
/// if result.warning() {
///     eprintln!("page edges not found");
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    detector: BoundaryDetector,
}

impl Scanner {
    /// Scanner with a validated configuration and the default cascade.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Ok(Self {
            detector: BoundaryDetector::new(config)?,
        })
    }

    /// Scanner with an explicit strategy order.
    pub fn with_strategies(config: ScanConfig, strategies: Vec<StrategyKind>) -> Result<Self> {
        Ok(Self {
            detector: BoundaryDetector::with_strategies(config, strategies)?,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        self.detector.config()
    }

    pub fn detector(&self) -> &BoundaryDetector {
        &self.detector
    }

    /// Scan one image.
    ///
    /// Internal failures (a singular homography, degenerate geometry, even a
    /// panic inside an image routine) are logged and turned into a
    /// passthrough result carrying a copy of the input.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn scan(&self, image: &RasterImage) -> ScanResult {
        match catch_unwind(AssertUnwindSafe(|| self.try_scan(image))) {
            Ok(Ok(result)) => {
                info!(outcome = ?result.outcome(), warning = result.warning(), "Scan complete");
                result
            }
            Ok(Err(err)) => {
                warn!(error = %err, "Scan failed, returning original image");
                ScanResult::passthrough(image.clone())
            }
            Err(_) => {
                error!("Scan panicked, returning original image");
                ScanResult::passthrough(image.clone())
            }
        }
    }

    fn try_scan(&self, image: &RasterImage) -> Result<ScanResult> {
        let policy = self.config().aspect_policy;
        match self.detector.analyze(image) {
            Detection::Quad { corners, .. } => {
                let quad = order_corners(corners);
                let rectified = rectify(image, &quad, policy)?;
                Ok(ScanResult::rectified(rectified, quad))
            }
            Detection::Region { bounds } => {
                let quad = order_corners(bounds.corners());
                let cropped = rectify(image, &quad, policy)?;
                Ok(ScanResult::bounding_box(cropped, quad))
            }
            Detection::Nothing => Ok(ScanResult::passthrough(image.clone())),
        }
    }
}

/// Scan with the default configuration.
pub fn scan(image: &RasterImage) -> ScanResult {
    Scanner::default().scan(image)
}
