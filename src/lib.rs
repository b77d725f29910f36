// SPDX-License-Identifier: GPL-3.0-or-later
// src/lib.rs
//
// Bounding-box editing engine for scanned exam pages: point/pixel
// conversion, interactive region editing, crop-and-stack composition.

pub mod app;
pub mod config;
pub mod constant;
pub mod domain;

/// Result type used across the document and editor layers.
pub type DocResult<T> = anyhow::Result<T>;
