// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp the quadrilateral spanned by four ordered
// corners onto an axis-aligned rectangle.

use flatscan_core::{AspectPolicy, FlatscanError, OrderedQuad, RasterImage, Result};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument};

/// Shortest edge, in source pixels, that the rectifier will accept.
const MIN_EDGE_LENGTH: f64 = 1.0;

/// Output width and height for `quad` under `policy`.
///
/// Width is the longer of the top and bottom edges. Height is the longer of
/// the left and right edges, or `width × √2` under
/// [`AspectPolicy::PageRatio`]. Both are rounded and at least 1.
pub fn output_size(quad: &OrderedQuad, policy: AspectPolicy) -> Result<(u32, u32)> {
    let top = quad.top_left.distance(quad.top_right);
    let bottom = quad.bottom_left.distance(quad.bottom_right);
    let left = quad.top_left.distance(quad.bottom_left);
    let right = quad.top_right.distance(quad.bottom_right);

    let width = top.max(bottom);
    let height = match policy {
        AspectPolicy::MeasuredEdges => left.max(right),
        AspectPolicy::PageRatio => width * std::f64::consts::SQRT_2,
    };

    if !(width >= MIN_EDGE_LENGTH && height >= MIN_EDGE_LENGTH) {
        return Err(FlatscanError::DegenerateGeometry(format!(
            "quad spans {width:.2}x{height:.2} px"
        )));
    }

    Ok((width.round() as u32, height.round() as u32))
}

/// Warp `quad` out of `source` into a new upright image.
///
/// Corners map top-left → (0, 0), top-right → (W, 0), bottom-right → (W, H)
/// and bottom-left → (0, H). Sampling is bilinear; anything that falls
/// outside the source is filled white. Luma and RGB sources keep their
/// layout; every other layout is warped as RGBA.
#[instrument(skip(source), fields(src_w = source.width(), src_h = source.height()))]
pub fn rectify(
    source: &RasterImage,
    quad: &OrderedQuad,
    policy: AspectPolicy,
) -> Result<RasterImage> {
    let (out_w, out_h) = output_size(quad, policy)?;

    let to_f32 = |p: flatscan_core::Point2D| (p.x as f32, p.y as f32);
    let src = quad.corners().map(to_f32);
    let (w, h) = (out_w as f32, out_h as f32);
    let dest: [(f32, f32); 4] = [
        (0.0, 0.0), // top-left
        (w, 0.0),   // top-right
        (w, h),     // bottom-right
        (0.0, h),   // bottom-left
    ];
    debug!(?src, out_w, out_h, "Solving homography");

    // from_control_points computes the mapping from `src` to `dest`.
    let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
        FlatscanError::Homography(format!("no projection maps {src:?} onto {out_w}x{out_h}"))
    })?;

    let warped = match source.as_dynamic() {
        DynamicImage::ImageLuma8(gray) => {
            let mut output = GrayImage::new(out_w, out_h);
            warp_into(gray, &projection, Interpolation::Bilinear, Luma([255u8]), &mut output);
            DynamicImage::ImageLuma8(output)
        }
        DynamicImage::ImageRgb8(rgb) => {
            let mut output = RgbImage::new(out_w, out_h);
            warp_into(rgb, &projection, Interpolation::Bilinear, Rgb([255u8; 3]), &mut output);
            DynamicImage::ImageRgb8(output)
        }
        other => {
            let rgba = other.to_rgba8();
            let mut output = RgbaImage::new(out_w, out_h);
            warp_into(&rgba, &projection, Interpolation::Bilinear, Rgba([255u8; 4]), &mut output);
            DynamicImage::ImageRgba8(output)
        }
    };

    info!(out_w, out_h, "Perspective correction applied");
    RasterImage::new(warped)
}
