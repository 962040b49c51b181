// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local-mean adaptive thresholding over a summed-area table.

use image::{GrayImage, Luma};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use tracing::{debug, instrument};

/// Mark pixels that are brighter than their neighbourhood.
///
/// For each pixel the threshold is the mean intensity of the square window
/// of radius `block_radius` centred on it (clipped to the image), plus
/// `offset`. Pixels strictly above the threshold become 255, all others 0.
///
/// Uniform areas never exceed their own mean, so they drop out regardless of
/// their absolute brightness; what survives is the bright side of every
/// local intensity step. This makes the mask insensitive to gradual lighting
/// changes across the frame.
#[instrument(skip(gray), fields(width = gray.width(), height = gray.height()))]
pub fn adaptive_threshold(gray: &GrayImage, block_radius: u32, offset: i32) -> GrayImage {
    let (width, height) = gray.dimensions();
    let sums = integral_image::<_, u64>(gray);
    let offset = f64::from(offset);

    let mut foreground = 0usize;
    let output = GrayImage::from_fn(width, height, |x, y| {
        let (left, right) = window(x, block_radius, width);
        let (top, bottom) = window(y, block_radius, height);
        let count = f64::from((right - left + 1) * (bottom - top + 1));
        let [sum] = sum_image_pixels(&sums, left, top, right, bottom);
        let local_mean = sum as f64 / count;

        if f64::from(gray.get_pixel(x, y).0[0]) > local_mean + offset {
            foreground += 1;
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    });

    debug!(foreground, "Adaptive threshold complete");
    output
}

/// Inclusive span of the window of `radius` around `centre`, clipped to
/// `0..len`. Never empty while `centre < len`.
fn window(centre: u32, radius: u32, len: u32) -> (u32, u32) {
    (
        centre.saturating_sub(radius),
        centre.saturating_add(radius).min(len - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_has_no_foreground() {
        for level in [0u8, 90, 255] {
            let gray = GrayImage::from_pixel(30, 20, Luma([level]));
            let mask = adaptive_threshold(&gray, 5, 0);
            assert!(mask.pixels().all(|p| p.0[0] == 0), "level {level}");
        }
    }

    #[test]
    fn marks_bright_side_of_a_step() {
        // Left half 100, right half 160; step at x = 20.
        let gray = GrayImage::from_fn(40, 10, |x, _| Luma([if x < 20 { 100 } else { 160 }]));
        let mask = adaptive_threshold(&gray, 5, 10);
        assert_eq!(mask.get_pixel(21, 5).0[0], 255, "bright pixel next to the step");
        assert_eq!(mask.get_pixel(18, 5).0[0], 0, "dark side never passes");
        assert_eq!(mask.get_pixel(35, 5).0[0], 0, "far from the step the mean catches up");
    }

    #[test]
    fn window_clips_at_borders() {
        assert_eq!(window(0, 3, 10), (0, 3));
        assert_eq!(window(5, 3, 10), (2, 8));
        assert_eq!(window(9, 3, 10), (6, 9));
        assert_eq!(window(0, 5, 1), (0, 0));
    }

    #[test]
    fn corner_pixels_use_clipped_window() {
        // Corner (0,0) with radius 1 sees 10, 10, 10, 40: mean 17.5.
        let gray = GrayImage::from_fn(3, 3, |x, y| Luma([if (x, y) == (1, 1) { 40 } else { 10 }]));
        assert_eq!(adaptive_threshold(&gray, 1, 0).get_pixel(0, 0).0[0], 0);
        assert_eq!(adaptive_threshold(&gray, 1, 0).get_pixel(1, 1).0[0], 255);
        // Centre mean over all nine is 13.3; 40 clears an offset of 26 but not 27.
        assert_eq!(adaptive_threshold(&gray, 1, 26).get_pixel(1, 1).0[0], 255);
        assert_eq!(adaptive_threshold(&gray, 1, 27).get_pixel(1, 1).0[0], 0);
    }
}
