// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/viewport.rs
//
// Screen/image coordinate mapping, hit testing and auto-scroll.

use crate::domain::bbox::{Region, ResizeHandle};

/// Pointer position relative to the top-left corner of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle(usize, ResizeHandle),
    Interior(usize),
}

/// Natural image size and the size it is currently displayed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    natural: (u32, u32),
    display: Option<(f64, f64)>,
}

impl Viewport {
    pub fn new(natural: (u32, u32), display: Option<(f64, f64)>) -> Self {
        Self { natural, display }
    }

    /// Image pixels per screen pixel on each axis. Unknown or degenerate
    /// display sizes map 1:1.
    #[must_use]
    pub fn ratio(&self) -> (f64, f64) {
        let Some((dw, dh)) = self.display else {
            return (1.0, 1.0);
        };
        let rx = if dw > 0.0 {
            f64::from(self.natural.0) / dw
        } else {
            1.0
        };
        let ry = if dh > 0.0 {
            f64::from(self.natural.1) / dh
        } else {
            1.0
        };
        (rx, ry)
    }

    #[must_use]
    pub fn to_image(&self, point: ScreenPoint) -> (f64, f64) {
        let (rx, ry) = self.ratio();
        (point.x * rx, point.y * ry)
    }

    #[must_use]
    pub fn to_screen(&self, x: f64, y: f64) -> ScreenPoint {
        let (rx, ry) = self.ratio();
        ScreenPoint::new(x / rx, y / ry)
    }

    /// Convert a screen-space delta into an image-space delta.
    #[must_use]
    pub fn delta_to_image(&self, from: ScreenPoint, to: ScreenPoint) -> (f64, f64) {
        let (rx, ry) = self.ratio();
        ((to.x - from.x) * rx, (to.y - from.y) * ry)
    }

    /// Resolve a pointer position against the regions on `page`.
    ///
    /// Corner handles win over interiors; among several candidates the
    /// region drawn last (highest index) wins.
    #[must_use]
    pub fn hit_test(
        &self,
        regions: &[Region],
        page: u32,
        point: ScreenPoint,
        handle_hit_size: f64,
    ) -> Option<Hit> {
        let half = handle_hit_size / 2.0;

        for (index, region) in topmost_on_page(regions, page) {
            for handle in ResizeHandle::ALL {
                let (cx, cy) = handle.corner(region);
                let corner = self.to_screen(cx, cy);
                if (point.x - corner.x).abs() <= half && (point.y - corner.y).abs() <= half {
                    return Some(Hit::Handle(index, handle));
                }
            }
        }

        let (x, y) = self.to_image(point);
        topmost_on_page(regions, page)
            .find(|(_, r)| r.contains(x, y))
            .map(|(index, _)| Hit::Interior(index))
    }
}

/// Regions on `page`, last drawn first.
fn topmost_on_page(regions: &[Region], page: u32) -> impl Iterator<Item = (usize, &Region)> {
    regions
        .iter()
        .enumerate()
        .rev()
        .filter(move |(_, r)| r.page == page)
}

/// Where to scroll so a region ends up centered, as fractions of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTarget {
    pub fraction_x: f64,
    pub fraction_y: f64,
}

impl ScrollTarget {
    /// Center of `region` relative to a `width` x `height` image.
    #[must_use]
    pub fn for_region(region: &Region, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let (cx, cy) = region.center();
        Some(Self {
            fraction_x: cx / f64::from(width),
            fraction_y: cy / f64::from(height),
        })
    }

    /// Scroll offset that centers the target inside `viewport`, given the
    /// rendered `content` size. Never negative.
    #[must_use]
    pub fn offset_for(&self, content: (f64, f64), viewport: (f64, f64)) -> (f64, f64) {
        let x = self.fraction_x * content.0 - viewport.0 / 2.0;
        let y = self.fraction_y * content.1 - viewport.1 / 2.0;
        (x.max(0.0), y.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn half_size_viewport() -> Viewport {
        // 2000x1000 image shown at 1000x500.
        Viewport::new((2000, 1000), Some((1000.0, 500.0)))
    }

    #[test]
    fn ratio_defaults_to_one() {
        assert_eq!(Viewport::new((800, 600), None).ratio(), (1.0, 1.0));
        assert_eq!(Viewport::new((800, 600), Some((0.0, 0.0))).ratio(), (1.0, 1.0));
    }

    #[test]
    fn screen_maps_to_image_pixels() {
        let viewport = half_size_viewport();
        assert_eq!(viewport.to_image(ScreenPoint::new(10.0, 20.0)), (20.0, 40.0));
        assert_eq!(
            viewport.delta_to_image(ScreenPoint::new(0.0, 0.0), ScreenPoint::new(5.0, -5.0)),
            (10.0, -10.0)
        );
    }

    #[test]
    fn handle_beats_interior() {
        let viewport = half_size_viewport();
        let regions = [Region::new(0, 100.0, 100.0, 400.0, 300.0)];
        // Top-left corner at screen (50, 50).
        assert_eq!(
            viewport.hit_test(&regions, 0, ScreenPoint::new(55.0, 52.0), 24.0),
            Some(Hit::Handle(0, ResizeHandle::TopLeft))
        );
        assert_eq!(
            viewport.hit_test(&regions, 0, ScreenPoint::new(100.0, 100.0), 24.0),
            Some(Hit::Interior(0))
        );
        assert_eq!(
            viewport.hit_test(&regions, 0, ScreenPoint::new(400.0, 400.0), 24.0),
            None
        );
    }

    #[test]
    fn topmost_region_on_current_page_wins() {
        let viewport = Viewport::new((1000, 1000), None);
        let regions = [
            Region::new(0, 0.0, 0.0, 500.0, 500.0),
            Region::new(0, 100.0, 100.0, 300.0, 300.0),
            Region::new(1, 0.0, 0.0, 1000.0, 1000.0),
        ];
        assert_eq!(
            viewport.hit_test(&regions, 0, ScreenPoint::new(200.0, 200.0), 24.0),
            Some(Hit::Interior(1))
        );
        assert_eq!(
            viewport.hit_test(&regions, 1, ScreenPoint::new(200.0, 200.0), 24.0),
            Some(Hit::Interior(2))
        );
    }

    #[test]
    fn scroll_target_centers_region() {
        let target =
            ScrollTarget::for_region(&Region::new(0, 100.0, 100.0, 700.0, 300.0), 1600, 2000)
                .unwrap();
        assert_eq!(target.fraction_x, 0.25);
        assert_eq!(target.fraction_y, 0.1);
        assert_eq!(target.offset_for((800.0, 1000.0), (400.0, 400.0)), (0.0, 0.0));
        assert_eq!(
            target.offset_for((3200.0, 4000.0), (400.0, 200.0)),
            (600.0, 300.0)
        );
        assert!(ScrollTarget::for_region(&Region::default(), 0, 10).is_none());
    }
}
