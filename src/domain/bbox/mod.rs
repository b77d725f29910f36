// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/bbox/mod.rs
//
// Bounding-box geometry: region model, unit conversion, resize handles.

pub mod convert;
pub mod handle;
pub mod region;

pub use convert::{regions_to_pixels, regions_to_points, to_pixels, to_points};
pub use handle::ResizeHandle;
pub use region::{Region, round2};
