// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/document/operations/mod.rs
//
// Raster operations on page images.

pub mod compose;
pub mod crop;

pub use compose::{Composer, Composite, CompositeLayout, ImageBackend, RasterBackend};
pub use crop::CropRect;
