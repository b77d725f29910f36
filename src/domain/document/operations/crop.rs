// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/crop.rs
//
// Crop operation domain model.

use crate::domain::bbox::Region;

/// Crop rectangle in whole source pixels.
///
/// The origin is signed: regions are never clamped to the image, so a
/// rectangle may start left of or above the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pixel rectangle covered by a (pixel-space) region.
    ///
    /// Fractional sizes truncate the way a raster canvas does; negative
    /// sizes become zero.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn from_region(region: &Region) -> Self {
        Self {
            x: region.x0.round() as i64,
            y: region.y0.round() as i64,
            width: region.width() as u32,
            height: region.height() as u32,
        }
    }

    pub fn as_tuple(&self) -> (i64, i64, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }

    /// Check if region has valid dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Part of this rectangle that lies inside a `width` x `height` image,
    /// as `(x, y, w, h)` in source coordinates plus the offset of that part
    /// inside the crop.
    #[allow(clippy::cast_sign_loss)]
    #[must_use]
    pub fn clip_to(&self, width: u32, height: u32) -> Option<((u32, u32, u32, u32), (u32, u32))> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = (self.x + i64::from(self.width)).min(i64::from(width));
        let bottom = (self.y + i64::from(self.height)).min(i64::from(height));
        if left >= right || top >= bottom {
            return None;
        }
        let offset = ((left - self.x) as u32, (top - self.y) as u32);
        Some((
            (
                left as u32,
                top as u32,
                (right - left) as u32,
                (bottom - top) as u32,
            ),
            offset,
        ))
    }
}
