// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline and application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FlatscanError, Result};

/// How the rectifier sizes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectPolicy {
    /// Width = longer of top/bottom edges, height = longer of left/right edges.
    #[default]
    MeasuredEdges,
    /// Width as measured, height = width × √2 (ISO 216 page proportions).
    PageRatio,
}

/// Tuning knobs for boundary detection and rectification.
///
/// Missing fields in a JSON document fall back to [`ScanConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Shorter side of the downscaled analysis image, in pixels.
    pub analysis_size: u32,
    /// Gaussian sigma applied to the analysis image before masking.
    pub blur_sigma: f32,
    /// Canny hysteresis thresholds (primary strategy).
    pub canny_low: f32,
    pub canny_high: f32,
    /// Square dilation radius applied to the Canny edge map.
    pub dilate_radius: u8,
    /// Half-width of the local-mean window (secondary strategy).
    pub adaptive_block_radius: u32,
    /// How much brighter than its local mean a pixel must be to count as
    /// foreground (secondary strategy).
    pub adaptive_offset: i32,
    /// Square closing radius applied to the adaptive mask.
    pub close_radius: u8,
    /// Number of largest contours examined per strategy.
    pub top_k: usize,
    /// Minimum contour area as a fraction of the analysis image area.
    pub min_area_fraction: f64,
    /// Polygon simplification tolerance as a fraction of contour perimeter.
    pub epsilon_fraction: f64,
    /// Output sizing policy for the rectifier.
    pub aspect_policy: AspectPolicy,
}

impl ScanConfig {
    pub const DEFAULT_ANALYSIS_SIZE: u32 = 500;
    pub const DEFAULT_BLUR_SIGMA: f32 = 2.0;
    pub const DEFAULT_CANNY_LOW: f32 = 50.0;
    pub const DEFAULT_CANNY_HIGH: f32 = 150.0;
    pub const DEFAULT_ADAPTIVE_BLOCK_RADIUS: u32 = 15;
    pub const DEFAULT_ADAPTIVE_OFFSET: i32 = 6;
    pub const DEFAULT_CLOSE_RADIUS: u8 = 2;
    pub const DEFAULT_TOP_K: usize = 5;
    pub const DEFAULT_MIN_AREA_FRACTION: f64 = 0.10;
    pub const DEFAULT_EPSILON_FRACTION: f64 = 0.02;

    /// Reject values that would make the pipeline meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.analysis_size < 16 {
            return Err(FlatscanError::Config(format!(
                "analysis_size must be at least 16, got {}",
                self.analysis_size
            )));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(FlatscanError::Config(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(FlatscanError::Config(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {}..{}",
                self.canny_low, self.canny_high
            )));
        }
        if self.adaptive_block_radius == 0 {
            return Err(FlatscanError::Config(
                "adaptive_block_radius must be at least 1".into(),
            ));
        }
        if self.top_k == 0 {
            return Err(FlatscanError::Config("top_k must be at least 1".into()));
        }
        if !(0.0..1.0).contains(&self.min_area_fraction) {
            return Err(FlatscanError::Config(format!(
                "min_area_fraction must lie in [0, 1), got {}",
                self.min_area_fraction
            )));
        }
        if !(self.epsilon_fraction > 0.0 && self.epsilon_fraction < 0.5) {
            return Err(FlatscanError::Config(format!(
                "epsilon_fraction must lie in (0, 0.5), got {}",
                self.epsilon_fraction
            )));
        }
        Ok(())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            analysis_size: Self::DEFAULT_ANALYSIS_SIZE,
            blur_sigma: Self::DEFAULT_BLUR_SIGMA,
            canny_low: Self::DEFAULT_CANNY_LOW,
            canny_high: Self::DEFAULT_CANNY_HIGH,
            dilate_radius: 1,
            adaptive_block_radius: Self::DEFAULT_ADAPTIVE_BLOCK_RADIUS,
            adaptive_offset: Self::DEFAULT_ADAPTIVE_OFFSET,
            close_radius: Self::DEFAULT_CLOSE_RADIUS,
            top_k: Self::DEFAULT_TOP_K,
            min_area_fraction: Self::DEFAULT_MIN_AREA_FRACTION,
            epsilon_fraction: Self::DEFAULT_EPSILON_FRACTION,
            aspect_policy: AspectPolicy::MeasuredEdges,
        }
    }
}

/// Persistent settings for the command-line front end.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pipeline tuning.
    pub scan: ScanConfig,
    /// Where scans are stored. `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.scan.validate()?;
        Ok(config)
    }
}
