// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/compose.rs
//
// Crop every region out of a page raster and stack the crops vertically
// into one composite image.

use std::fmt;
use std::io::Cursor;

use image::{ImageFormat, ImageReader, Rgba, RgbaImage, imageops};

use super::crop::CropRect;
use crate::DocResult;
use crate::constant::COMPOSITE_GAP;
use crate::domain::bbox::{Region, regions_to_points};

/// Raster capabilities the composer needs.
pub trait RasterBackend {
    type Image;

    /// Decode an encoded image (PNG, JPEG, ...).
    fn decode(&self, bytes: &[u8]) -> DocResult<Self::Image>;

    /// Native pixel dimensions (width, height).
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Solid white canvas.
    fn blank(&self, width: u32, height: u32) -> Self::Image;

    /// Copy `rect` out of `image`. Pixels outside the source are transparent.
    fn crop(&self, image: &Self::Image, rect: CropRect) -> Self::Image;

    /// Paint `src` onto `dest` with its top-left corner at `(x, y)`.
    fn composite(&self, dest: &mut Self::Image, src: &Self::Image, x: u32, y: u32);

    /// Encode to the given format.
    fn encode(&self, image: &Self::Image, format: ImageFormat) -> DocResult<Vec<u8>>;
}

/// [`RasterBackend`] on top of the `image` crate, working in RGBA8.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

impl RasterBackend for ImageBackend {
    type Image = RgbaImage;

    fn decode(&self, bytes: &[u8]) -> DocResult<RgbaImage> {
        let image = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| anyhow::anyhow!("Failed to read image format: {e}"))?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode image: {e}"))?;
        Ok(image.to_rgba8())
    }

    fn dimensions(&self, image: &RgbaImage) -> (u32, u32) {
        image.dimensions()
    }

    fn blank(&self, width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    }

    fn crop(&self, image: &RgbaImage, rect: CropRect) -> RgbaImage {
        let mut slice = RgbaImage::new(rect.width, rect.height);
        let (img_width, img_height) = image.dimensions();
        if let Some(((x, y, w, h), (dx, dy))) = rect.clip_to(img_width, img_height) {
            let visible = imageops::crop_imm(image, x, y, w, h).to_image();
            imageops::replace(&mut slice, &visible, i64::from(dx), i64::from(dy));
        }
        slice
    }

    fn composite(&self, dest: &mut RgbaImage, src: &RgbaImage, x: u32, y: u32) {
        imageops::overlay(dest, src, i64::from(x), i64::from(y));
    }

    fn encode(&self, image: &RgbaImage, format: ImageFormat) -> DocResult<Vec<u8>> {
        let mut data = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut data), format)
            .map_err(|e| anyhow::anyhow!("Failed to encode composite: {e}"))?;
        Ok(data)
    }
}

/// Placement of one crop inside the composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub crop: CropRect,
    pub offset_x: u32,
    pub offset_y: u32,
}

/// Canvas size and slice placement for a region list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeLayout {
    pub width: u32,
    pub height: u32,
    pub slices: Vec<Slice>,
}

impl CompositeLayout {
    /// Lay out `regions` (pixel space) top to bottom in input order,
    /// centered horizontally, `gap` pixels apart.
    pub fn new(regions: &[Region], gap: u32) -> DocResult<Self> {
        if regions.is_empty() {
            anyhow::bail!("Nothing to compose: region list is empty");
        }

        let crops: Vec<CropRect> = regions.iter().map(CropRect::from_region).collect();
        let width = crops.iter().map(|c| c.width).max().unwrap_or(0);
        let gaps = gap.saturating_mul(crops.len() as u32 - 1);
        let height = crops
            .iter()
            .fold(gaps, |acc, c| acc.saturating_add(c.height));

        let mut cursor = 0u32;
        let slices = crops
            .into_iter()
            .map(|crop| {
                let slice = Slice {
                    crop,
                    offset_x: (width - crop.width) / 2,
                    offset_y: cursor,
                };
                cursor = cursor.saturating_add(crop.height).saturating_add(gap);
                slice
            })
            .collect();

        Ok(Self {
            width,
            height,
            slices,
        })
    }
}

/// Result of a compose: the encoded image plus the regions in point space.
#[derive(Clone, PartialEq)]
pub struct Composite {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub regions: Vec<Region>,
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Composite")
            .field("png_len", &self.png.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("regions", &self.regions)
            .finish()
    }
}

/// Builds composite images through a [`RasterBackend`].
#[derive(Debug, Clone)]
pub struct Composer<B: RasterBackend = ImageBackend> {
    backend: B,
    gap: u32,
}

impl Default for Composer<ImageBackend> {
    fn default() -> Self {
        Self::new(ImageBackend, COMPOSITE_GAP)
    }
}

impl<B: RasterBackend> Composer<B> {
    pub fn new(backend: B, gap: u32) -> Self {
        Self { backend, gap }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Crop and stack `regions` (pixel space) from `source`.
    pub fn compose(&self, source: &B::Image, regions: &[Region]) -> DocResult<Composite> {
        let layout = CompositeLayout::new(regions, self.gap)?;
        if layout.width == 0 || layout.height == 0 {
            anyhow::bail!(
                "Composite would be empty ({}x{}): every region has zero area",
                layout.width,
                layout.height
            );
        }

        let mut canvas = self.backend.blank(layout.width, layout.height);
        for slice in &layout.slices {
            if !slice.crop.is_valid() {
                log::debug!("Skipping empty crop {:?}", slice.crop.as_tuple());
                continue;
            }
            let piece = self.backend.crop(source, slice.crop);
            self.backend
                .composite(&mut canvas, &piece, slice.offset_x, slice.offset_y);
        }

        let png = self.backend.encode(&canvas, ImageFormat::Png)?;
        log::debug!(
            "Composed {} regions into {}x{} ({} bytes)",
            regions.len(),
            layout.width,
            layout.height,
            png.len()
        );

        Ok(Composite {
            png,
            width: layout.width,
            height: layout.height,
            regions: regions_to_points(regions),
        })
    }

    /// Decode `source_bytes` and compose.
    pub fn compose_bytes(&self, source_bytes: &[u8], regions: &[Region]) -> DocResult<Composite> {
        let source = self.backend.decode(source_bytes)?;
        self.compose(&source, regions)
    }
}
