// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/document/raster.rs

use std::fmt;

use image::RgbaImage;

use crate::DocResult;
use crate::domain::document::operations::{ImageBackend, RasterBackend};

/// Decoded raster of one page, tagged with where it came from.
#[derive(Clone)]
pub struct PageImage {
    /// Page index (0-based).
    pub page: u32,
    /// Address the bytes were fetched from.
    pub url: String,
    /// The decoded page in RGBA8.
    pub image: RgbaImage,
}

impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "PageImage({} {width}x{height} {})", self.page, self.url)
    }
}

impl PageImage {
    /// Decode encoded bytes (PNG, JPEG, WebP) fetched for `page`.
    pub fn decode(page: u32, url: String, bytes: &[u8]) -> DocResult<Self> {
        let image = ImageBackend.decode(bytes)?;
        Ok(Self { page, url, image })
    }

    /// Returns the native pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
