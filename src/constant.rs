// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Print resolution of the point unit (PDF user space).
pub const POINT_DPI: f64 = 72.0;

/// Raster resolution of the pixel unit (rendered page images).
pub const PIXEL_DPI: f64 = 200.0;

/// Scale factor from point coordinates to pixel coordinates.
pub const POINT_TO_PIXEL: f64 = PIXEL_DPI / POINT_DPI;

/// Scale factor from pixel coordinates to point coordinates.
pub const PIXEL_TO_POINT: f64 = POINT_DPI / PIXEL_DPI;

/// Coordinates are kept at two decimal places (value * 100, rounded, / 100).
pub const ROUNDING_FACTOR: f64 = 100.0;

/// Vertical separator between stacked crops in the composite image (pixels).
pub const COMPOSITE_GAP: u32 = 2;

/// Width of a freshly added region in image pixels.
pub const DEFAULT_REGION_WIDTH: f64 = 200.0;

/// Height of a freshly added region in image pixels.
pub const DEFAULT_REGION_HEIGHT: f64 = 100.0;

/// Side of the square around a corner that grabs a resize handle (screen pixels).
pub const HANDLE_HIT_SIZE: f64 = 24.0;

/// Default file name pattern for page images inside a pages directory.
pub const PAGE_PATTERN: &str = "page-{page}.png";

/// Config directory name.
pub const CONFIG_DIR: &str = "pagecrop";

/// Config file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";
