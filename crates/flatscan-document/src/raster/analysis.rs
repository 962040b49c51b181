// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analysis image — the downscaled, smoothed grayscale copy that boundary
// detection runs on, plus the ratio that maps its coordinates back onto the
// full-resolution source.

use flatscan_core::{Point2D, RasterImage, ScanConfig};
use image::GrayImage;
use image::imageops::{self, FilterType};
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

/// Smoothed single-channel working copy of a source image.
///
/// Owns its buffer; the source is only read.
pub struct AnalysisImage {
    gray: GrayImage,
    /// Source pixels per analysis pixel (≥ 1).
    ratio: f64,
}

impl AnalysisImage {
    /// Downscale `source` so its shorter side is `config.analysis_size`,
    /// convert to grayscale and apply a Gaussian blur.
    ///
    /// Sources whose shorter side is already at or below the analysis size
    /// are not upscaled; their ratio is 1.
    #[instrument(skip_all, fields(width = source.width(), height = source.height()))]
    pub fn prepare(source: &RasterImage, config: &ScanConfig) -> Self {
        let gray = source.as_dynamic().to_luma8();
        let (width, height) = gray.dimensions();
        let (target_w, target_h, ratio) = analysis_dimensions(width, height, config.analysis_size);

        let scaled = if ratio > 1.0 {
            imageops::resize(&gray, target_w, target_h, FilterType::Triangle)
        } else {
            gray
        };
        let smoothed = gaussian_blur_f32(&scaled, config.blur_sigma);

        debug!(
            analysis_w = smoothed.width(),
            analysis_h = smoothed.height(),
            ratio,
            sigma = config.blur_sigma,
            "Analysis image prepared"
        );
        Self {
            gray: smoothed,
            ratio,
        }
    }

    /// Wrap an already-prepared grayscale buffer.
    pub fn from_parts(gray: GrayImage, ratio: f64) -> Self {
        Self { gray, ratio }
    }

    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Pixel area of the analysis image.
    pub fn area(&self) -> f64 {
        f64::from(self.gray.width()) * f64::from(self.gray.height())
    }

    /// Map an analysis-space point onto the full-resolution source.
    pub fn to_source(&self, point: Point2D) -> Point2D {
        point.scale(self.ratio)
    }
}

/// Target analysis size and ratio for a `width x height` source.
///
/// Returns `(width, height, ratio)` where `ratio = shorter_side / target`,
/// or the unchanged size with ratio 1 when no downscaling is needed.
pub fn analysis_dimensions(width: u32, height: u32, target: u32) -> (u32, u32, f64) {
    let shorter = width.min(height);
    if shorter <= target || target == 0 {
        return (width, height, 1.0);
    }
    let ratio = f64::from(shorter) / f64::from(target);
    let scaled = |side: u32| ((f64::from(side) / ratio).round() as u32).max(1);
    (scaled(width), scaled(height), ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Luma, RgbImage};

    #[test]
    fn landscape_is_scaled_by_height() {
        assert_eq!(analysis_dimensions(800, 600, 500), (667, 500, 1.2));
    }

    #[test]
    fn portrait_is_scaled_by_width() {
        let (w, h, r) = analysis_dimensions(1000, 2000, 500);
        assert_eq!((w, h), (500, 1000));
        assert!((r - 2.0).abs() < 1e-12);
    }

    #[test]
    fn small_images_are_not_upscaled() {
        assert_eq!(analysis_dimensions(320, 240, 500), (320, 240, 1.0));
    }

    #[test]
    fn prepare_produces_grayscale_at_analysis_size() {
        let source = RasterImage::new(DynamicImage::ImageRgb8(RgbImage::new(1000, 750)))
            .expect("non-empty");
        let analysis = AnalysisImage::prepare(&source, &ScanConfig::default());
        assert_eq!(analysis.gray().dimensions(), (667, 500));
        assert!((analysis.ratio() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn prepare_leaves_source_untouched() {
        let gray = GrayImage::from_fn(40, 30, |x, _| Luma([(x * 6) as u8]));
        let source = RasterImage::new(DynamicImage::ImageLuma8(gray.clone())).expect("non-empty");
        let _ = AnalysisImage::prepare(&source, &ScanConfig::default());
        assert_eq!(source.as_dynamic().as_bytes(), gray.as_raw().as_slice());
    }

    #[test]
    fn to_source_scales_by_ratio() {
        let analysis = AnalysisImage::from_parts(GrayImage::new(10, 10), 2.5);
        let p = analysis.to_source(Point2D::new(4.0, 10.0));
        assert_eq!(p, Point2D::new(10.0, 25.0));
    }
}
