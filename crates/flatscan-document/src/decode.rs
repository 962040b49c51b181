// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input decoding — turn an arbitrary input file into one full-resolution
// raster. Paginated documents contribute their first page only.

use std::path::Path;

use flatscan_core::{FlatscanError, RasterImage, Result};
use tracing::{debug, info, instrument};

/// Zoom at which the first page of a paginated document is rendered.
pub const PAGE_RENDER_ZOOM: f32 = 2.0;

/// Magic bytes at the start of a PDF file.
const PDF_SIGNATURE: &[u8] = b"%PDF";

/// Something that can produce a single raster from encoded bytes.
pub trait RasterDecoder {
    fn decode(&self, data: &[u8]) -> Result<RasterImage>;

    /// Read `path` and decode its contents.
    fn decode_file(&self, path: &Path) -> Result<RasterImage> {
        let data = std::fs::read(path)?;
        debug!(path = %path.display(), bytes = data.len(), "Input read");
        self.decode(&data)
    }
}

/// Renders page 1 of a paginated document.
///
/// Rendering lives outside this crate; the front end plugs in whatever
/// renderer it has available.
pub trait PageRasterizer: Send + Sync {
    fn render_first_page(&self, data: &[u8], zoom: f32) -> Result<RasterImage>;
}

/// Decoder for every raster format the `image` crate understands, with
/// optional routing of PDF input to a [`PageRasterizer`].
#[derive(Default)]
pub struct ImageDecoder {
    rasterizer: Option<Box<dyn PageRasterizer>>,
}

impl std::fmt::Debug for ImageDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageDecoder")
            .field("rasterizer", &self.rasterizer.is_some())
            .finish()
    }
}

impl ImageDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route paginated documents through `rasterizer`.
    pub fn with_rasterizer(rasterizer: Box<dyn PageRasterizer>) -> Self {
        Self {
            rasterizer: Some(rasterizer),
        }
    }
}

/// Whether `data` starts with a PDF header.
pub fn is_paginated(data: &[u8]) -> bool {
    data.starts_with(PDF_SIGNATURE)
}

impl RasterDecoder for ImageDecoder {
    #[instrument(skip_all, fields(data_len = data.len()))]
    fn decode(&self, data: &[u8]) -> Result<RasterImage> {
        if is_paginated(data) {
            let rasterizer = self.rasterizer.as_ref().ok_or_else(|| {
                FlatscanError::UnsupportedDocument(
                    "PDF input needs a page rasterizer".into(),
                )
            })?;
            let page = rasterizer.render_first_page(data, PAGE_RENDER_ZOOM)?;
            info!(width = page.width(), height = page.height(), "First page rendered");
            return Ok(page);
        }

        let img = image::load_from_memory(data).map_err(|err| {
            FlatscanError::ImageError(format!("failed to decode image: {err}"))
        })?;
        debug!(width = img.width(), height = img.height(), "Image decoded from bytes");
        RasterImage::new(img)
    }
}
