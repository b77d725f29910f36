// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/mod.rs
//
// Pure domain layer: geometry and raster operations, no editor state.

pub mod bbox;
pub mod document;
