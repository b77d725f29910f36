// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/bbox/convert.rs
//
// Conversion between point space (72 DPI) and pixel space (200 DPI).

use super::region::Region;
use crate::constant::{PIXEL_TO_POINT, POINT_TO_PIXEL};

/// Scale a point-space region into pixel space.
#[must_use]
pub fn to_pixels(region: &Region, point_to_pixel: f64) -> Region {
    region.scaled(point_to_pixel)
}

/// Scale a pixel-space region into point space.
#[must_use]
pub fn to_points(region: &Region, pixel_to_point: f64) -> Region {
    region.scaled(pixel_to_point)
}

/// Convert a persisted (point) list for editing.
///
/// An empty list yields a single zero-sized region on page 0, so the
/// editor always has something to manipulate.
#[must_use]
pub fn regions_to_pixels(regions: &[Region]) -> Vec<Region> {
    if regions.is_empty() {
        return vec![Region::default()];
    }
    regions
        .iter()
        .map(|r| to_pixels(r, POINT_TO_PIXEL))
        .collect()
}

/// Convert an edited (pixel) list for persistence. Order and count are kept.
#[must_use]
pub fn regions_to_points(regions: &[Region]) -> Vec<Region> {
    regions
        .iter()
        .map(|r| to_points(r, PIXEL_TO_POINT))
        .collect()
}
