// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/bbox/handle.rs
//
// Corner handles used to resize a region.

use std::fmt;
use std::str::FromStr;

use super::region::{Region, round2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 4] = [
        ResizeHandle::TopLeft,
        ResizeHandle::TopRight,
        ResizeHandle::BottomLeft,
        ResizeHandle::BottomRight,
    ];

    /// Corner position of this handle on `region`.
    #[must_use]
    pub fn corner(self, region: &Region) -> (f64, f64) {
        match self {
            Self::TopLeft => (region.x0, region.y0),
            Self::TopRight => (region.x1, region.y0),
            Self::BottomLeft => (region.x0, region.y1),
            Self::BottomRight => (region.x1, region.y1),
        }
    }

    /// Move the edges owned by this handle to `(x, y)`.
    ///
    /// The opposite edges are left alone, so the region may end up
    /// inverted until it is normalized.
    pub fn apply(self, region: &mut Region, x: f64, y: f64) {
        let (x, y) = (round2(x), round2(y));
        match self {
            Self::TopLeft => {
                region.x0 = x;
                region.y0 = y;
            }
            Self::TopRight => {
                region.x1 = x;
                region.y0 = y;
            }
            Self::BottomLeft => {
                region.x0 = x;
                region.y1 = y;
            }
            Self::BottomRight => {
                region.x1 = x;
                region.y1 = y;
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown resize handle: {s}"))
    }
}
