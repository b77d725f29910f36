// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/bbox/region.rs
//
// Region (bounding box) domain model.

use serde::{Deserialize, Serialize};

use crate::constant::ROUNDING_FACTOR;

/// Round to two decimal places, half away from zero.
#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * ROUNDING_FACTOR).round() / ROUNDING_FACTOR
}

/// Axis-aligned rectangle on a page.
///
/// The unit (points or pixels) is implied by where the region lives: the
/// editor works in pixels, persisted lists are in points. Order inside a
/// region list is meaningful and there is no other identity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Region {
    pub page: u32,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Region {
    pub fn new(page: u32, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            page,
            x0,
            y0,
            x1,
            y1,
        }
    }

    /// Region with every coordinate multiplied by `factor` and rounded.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            page: self.page,
            x0: round2(self.x0 * factor),
            y0: round2(self.y0 * factor),
            x1: round2(self.x1 * factor),
            y1: round2(self.y1 * factor),
        }
    }

    /// Move by `(dx, dy)`; all four coordinates shift and are rounded.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x0 = round2(self.x0 + dx);
        self.y0 = round2(self.y0 + dy);
        self.x1 = round2(self.x1 + dx);
        self.y1 = round2(self.y1 + dy);
    }

    /// Swap x0/x1 and y0/y1 independently where they are inverted.
    pub fn normalize(&mut self) {
        if self.x0 > self.x1 {
            std::mem::swap(&mut self.x0, &mut self.x1);
        }
        if self.y0 > self.y1 {
            std::mem::swap(&mut self.y0, &mut self.y1);
        }
    }

    /// Check the `x0 <= x1 && y0 <= y1` invariant.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        self.x0 <= self.x1 && self.y0 <= self.y1
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// Center point `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Point-in-rectangle test, inclusive on all edges. Works on
    /// unnormalized regions too.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (left, right) = (self.x0.min(self.x1), self.x0.max(self.x1));
        let (top, bottom) = (self.y0.min(self.y1), self.y0.max(self.y1));
        x >= left && x <= right && y >= top && y <= bottom
    }
}
