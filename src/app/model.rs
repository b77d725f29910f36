// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Editor session state and the region operations on it.

use std::sync::Arc;

use super::document::{PageImage, PageRequest};
use super::interaction::{Gesture, Interaction, PointerCapture};
use super::viewport::{Hit, ScreenPoint, ScrollTarget, Viewport};
use crate::config::EditorConfig;
use crate::domain::bbox::{Region, ResizeHandle, regions_to_pixels, round2};
use crate::domain::document::operations::Composite;

// =============================================================================
// Model
// =============================================================================

/// One editing session: created on open, dropped on close or after a
/// successful commit. All region coordinates are in image pixels.
#[derive(Debug)]
pub struct EditorModel {
    pub config: EditorConfig,

    // Regions.
    pub regions: Vec<Region>,
    pub selected: Option<usize>,

    // Pages.
    pub current_page: u32,
    pub page_count: Option<u32>,

    // Image.
    pub image: Option<Arc<PageImage>>,
    pub requested_url: Option<String>,
    pub display_size: Option<(f64, f64)>,

    // Pointer.
    pub gesture: Gesture,

    // Commit.
    pub composing: bool,
    pub compose_cancelled: bool,
    pub saving: bool,
    pub confirm_open: bool,
    pub preview: Option<Arc<Composite>>,

    // UI state.
    pub error: Option<String>,
    pub closed: bool,
}

impl EditorModel {
    /// Open a session on a persisted (point-space) region list.
    pub fn open(config: EditorConfig, regions: &[Region], capture: Box<dyn PointerCapture>) -> Self {
        let regions = regions_to_pixels(regions);
        let current_page = regions.first().map_or(0, |r| r.page);
        log::debug!(
            "Editor opened with {} regions on page {current_page}",
            regions.len()
        );

        Self {
            config,
            regions,
            selected: None,
            current_page,
            page_count: None,
            image: None,
            requested_url: None,
            display_size: None,
            gesture: Gesture::new(capture),
            composing: false,
            compose_cancelled: false,
            saving: false,
            confirm_open: false,
            preview: None,
            error: None,
            closed: false,
        }
    }

    pub fn set_error<S: Into<String>>(&mut self, msg: S) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn interaction(&self) -> Interaction {
        self.gesture.state()
    }

    /// Natural size of the loaded page image.
    pub fn image_dimensions(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.image_dimensions()
            .map(|natural| Viewport::new(natural, self.display_size))
    }

    /// Region and page edits are frozen from the moment a commit is
    /// requested until its dialog is dismissed or the commit settles.
    pub fn accepts_edits(&self) -> bool {
        !self.composing && !self.confirm_open && !self.saving && !self.closed
    }

    /// Pointer input is accepted only with an image on screen and no modal
    /// layer or commit in the way.
    pub fn is_interactive(&self) -> bool {
        self.image.is_some() && self.accepts_edits()
    }

    // -------------------------------------------------------------------------
    // Selection and region list
    // -------------------------------------------------------------------------

    pub fn select(&mut self, index: usize) {
        if self.selected == Some(index) || index >= self.regions.len() {
            return;
        }
        self.selected = Some(index);
    }

    /// Append a default-sized region centered on the current page image and
    /// select it. No-op until the image size is known.
    pub fn add_region(&mut self) -> Option<usize> {
        let (width, height) = self.image_dimensions()?;
        let w = self.config.default_region_width;
        let h = self.config.default_region_height;
        let x0 = round2(f64::from(width) / 2.0 - w / 2.0);
        let y0 = round2(f64::from(height) / 2.0 - h / 2.0);

        self.regions.push(Region::new(
            self.current_page,
            x0,
            y0,
            round2(x0 + w),
            round2(y0 + h),
        ));
        let index = self.regions.len() - 1;
        self.selected = Some(index);
        Some(index)
    }

    /// Remove a region and keep the selection on the same logical region.
    pub fn remove_region(&mut self, index: usize) {
        if index >= self.regions.len() {
            return;
        }
        self.end_gesture();
        self.regions.remove(index);
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
    }

    // -------------------------------------------------------------------------
    // Pages
    // -------------------------------------------------------------------------

    /// Switch the page on screen. Returns whether the page changed; the
    /// caller then loads the new page image.
    pub fn navigate_page(&mut self, page: u32) -> bool {
        if page == self.current_page {
            return false;
        }
        if self.page_count.is_some_and(|count| page >= count) {
            return false;
        }
        self.end_gesture();
        self.current_page = page;
        self.image = None;
        self.requested_url = None;
        true
    }

    /// Remember which load the session is waiting for. Results for any
    /// other URL are stale.
    pub fn begin_load(&mut self, request: &PageRequest) {
        log::debug!("Loading page {} from {}", request.page, request.url);
        self.requested_url = Some(request.url.clone());
    }

    /// Move a region to another page.
    pub fn assign_region_to_page(&mut self, index: usize, page: u32) {
        if let Some(region) = self.regions.get_mut(index) {
            region.page = page;
        }
    }

    /// Browse forward; the selected region (if any) travels along.
    pub fn next_page(&mut self) -> bool {
        let target = self.current_page.saturating_add(1);
        self.navigate_carrying_selection(target)
    }

    /// Browse backward; no-op on page 0.
    pub fn prev_page(&mut self) -> bool {
        let Some(target) = self.current_page.checked_sub(1) else {
            return false;
        };
        self.navigate_carrying_selection(target)
    }

    fn navigate_carrying_selection(&mut self, page: u32) -> bool {
        if !self.navigate_page(page) {
            return false;
        }
        if let Some(index) = self.selected {
            self.assign_region_to_page(index, page);
        }
        true
    }

    /// Center of the selected (or first) region as image fractions.
    pub fn auto_scroll_target(&self) -> Option<ScrollTarget> {
        let (width, height) = self.image_dimensions()?;
        let region = self
            .selected
            .and_then(|i| self.regions.get(i))
            .or_else(|| self.regions.first())?;
        ScrollTarget::for_region(region, width, height)
    }

    // -------------------------------------------------------------------------
    // Pointer gestures
    // -------------------------------------------------------------------------

    /// Pointer-down at a screen position; hit-tests handles, then interiors.
    pub fn pointer_down(&mut self, pos: ScreenPoint) {
        let Some(viewport) = self.viewport() else {
            return;
        };
        match viewport.hit_test(
            &self.regions,
            self.current_page,
            pos,
            self.config.handle_hit_size,
        ) {
            Some(Hit::Handle(index, handle)) => self.press_handle(index, handle, pos),
            Some(Hit::Interior(index)) => self.press_region(index, pos),
            None => {}
        }
    }

    /// Pointer-down on a region interior: select it and start dragging.
    pub fn press_region(&mut self, index: usize, pos: ScreenPoint) {
        if index >= self.regions.len() {
            return;
        }
        self.select(index);
        self.gesture.begin_drag(index, pos);
    }

    /// Pointer-down on a corner handle: select the owner and start resizing.
    pub fn press_handle(&mut self, index: usize, handle: ResizeHandle, pos: ScreenPoint) {
        if index >= self.regions.len() {
            return;
        }
        self.select(index);
        self.gesture.begin_resize(index, handle, pos);
    }

    pub fn pointer_move(&mut self, pos: ScreenPoint) {
        let Some(viewport) = self.viewport() else {
            return;
        };
        match self.gesture.state() {
            Interaction::Idle => {}
            Interaction::Dragging { index, last } => {
                let (dx, dy) = viewport.delta_to_image(last, pos);
                if let Some(region) = self.regions.get_mut(index) {
                    region.translate(dx, dy);
                }
                self.gesture.moved_to(pos);
            }
            Interaction::Resizing { index, handle, .. } => {
                let (x, y) = viewport.to_image(pos);
                if let Some(region) = self.regions.get_mut(index) {
                    handle.apply(region, x, y);
                }
            }
        }
    }

    pub fn pointer_up(&mut self) {
        self.end_gesture();
    }

    /// End the running gesture, whatever interrupts it. A finished resize
    /// leaves the region normalized.
    pub fn end_gesture(&mut self) {
        if let Interaction::Resizing { index, handle, .. } = self.gesture.end()
            && let Some(region) = self.regions.get_mut(index)
        {
            region.normalize();
            log::debug!("Resized region {index} via {handle}: {region:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::interaction::NoCapture;
    use crate::app::interaction::tests::RecordingCapture;
    use image::RgbaImage;

    fn page_image(page: u32, width: u32, height: u32) -> Arc<PageImage> {
        Arc::new(PageImage {
            page,
            url: format!("page-{page}.png"),
            image: RgbaImage::new(width, height),
        })
    }

    /// Session on one 1600x2200 page with a single 100..700 x 100..300 region.
    fn session() -> EditorModel {
        let mut model = EditorModel::open(
            EditorConfig::default(),
            &[Region::new(0, 36.0, 36.0, 252.0, 108.0)],
            Box::new(NoCapture),
        );
        model.image = Some(page_image(0, 1600, 2200));
        model
    }

    #[test]
    fn open_converts_to_pixels() {
        let model = session();
        assert_eq!(model.regions, vec![Region::new(0, 100.0, 100.0, 700.0, 300.0)]);
        assert_eq!(model.selected, None);
        assert_eq!(model.current_page, 0);
    }

    #[test]
    fn open_empty_list_yields_default_region() {
        let model = EditorModel::open(EditorConfig::default(), &[], Box::new(NoCapture));
        assert_eq!(model.regions, vec![Region::default()]);
    }

    #[test]
    fn open_starts_on_first_region_page() {
        let model = EditorModel::open(
            EditorConfig::default(),
            &[Region::new(3, 0.0, 0.0, 1.0, 1.0)],
            Box::new(NoCapture),
        );
        assert_eq!(model.current_page, 3);
    }

    #[test]
    fn add_region_centers_default_box() {
        let mut model = session();
        let index = model.add_region().unwrap();
        assert_eq!(index, 1);
        assert_eq!(model.selected, Some(1));
        assert_eq!(model.regions[1], Region::new(0, 700.0, 1050.0, 900.0, 1150.0));
    }

    #[test]
    fn add_region_without_image_is_noop() {
        let mut model = session();
        model.image = None;
        assert_eq!(model.add_region(), None);
        assert_eq!(model.regions.len(), 1);
    }

    #[test]
    fn remove_keeps_selection_on_same_region() {
        for (selected, removed, expected) in [
            (Some(2), 2, None),
            (Some(3), 1, Some(2)),
            (Some(1), 3, Some(1)),
            (None, 0, None),
        ] {
            let mut model = session();
            model.regions = vec![Region::default(); 4];
            model.selected = selected;
            model.remove_region(removed);
            assert_eq!(model.selected, expected, "selected {selected:?} removed {removed}");
            assert_eq!(model.regions.len(), 3);
        }
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut model = session();
        model.remove_region(5);
        assert_eq!(model.regions.len(), 1);
    }

    #[test]
    fn drag_preserves_size() {
        let mut model = session();
        model.display_size = Some((800.0, 1100.0));
        model.press_region(0, ScreenPoint::new(100.0, 100.0));
        assert_eq!(model.selected, Some(0));
        model.pointer_move(ScreenPoint::new(110.0, 95.0));
        model.pointer_move(ScreenPoint::new(125.5, 90.0));
        model.pointer_up();

        // Screen delta (25.5, -10) at ratio 2.
        let region = model.regions[0];
        assert_eq!(region, Region::new(0, 151.0, 80.0, 751.0, 280.0));
        assert_eq!(region.width(), 600.0);
        assert_eq!(region.height(), 200.0);
        assert!(model.interaction().is_idle());
    }

    #[test]
    fn resize_past_opposite_corner_normalizes_on_release() {
        let mut model = session();
        model.press_handle(0, ResizeHandle::TopLeft, ScreenPoint::new(100.0, 100.0));
        model.pointer_move(ScreenPoint::new(800.0, 400.0));

        // Transiently inverted; the opposite edges did not move.
        assert_eq!(model.regions[0], Region::new(0, 800.0, 400.0, 700.0, 300.0));
        assert!(!model.regions[0].is_normalized());

        model.pointer_up();
        assert_eq!(model.regions[0], Region::new(0, 700.0, 300.0, 800.0, 400.0));
        assert!(model.regions[0].is_normalized());
    }

    #[test]
    fn resize_moves_only_the_handle_edges() {
        let mut model = session();
        model.display_size = Some((800.0, 1100.0));
        model.press_handle(0, ResizeHandle::BottomRight, ScreenPoint::new(350.0, 150.0));
        model.pointer_move(ScreenPoint::new(400.123, 175.0));
        model.pointer_up();
        assert_eq!(model.regions[0], Region::new(0, 100.0, 100.0, 800.25, 350.0));
    }

    #[test]
    fn every_resize_sequence_ends_normalized() {
        let moves = [(-50.0, 900.0), (2000.0, -3.0), (0.0, 0.0), (650.0, 120.0)];
        let endings: [(&str, fn(&mut EditorModel)); 4] = [
            ("pointer up", |m| m.pointer_up()),
            ("next page", |m| {
                m.next_page();
            }),
            ("goto page", |m| {
                m.navigate_page(3);
            }),
            ("remove other", |m| m.remove_region(1)),
        ];
        for handle in ResizeHandle::ALL {
            for (ending, end) in endings {
                let mut model = session();
                model.regions.push(Region::new(0, 0.0, 0.0, 10.0, 10.0));
                model.press_handle(0, handle, ScreenPoint::default());
                for (x, y) in moves {
                    model.pointer_move(ScreenPoint::new(x, y));
                }
                end(&mut model);
                assert!(model.interaction().is_idle(), "{handle} / {ending}");
                assert!(
                    model.regions[0].is_normalized(),
                    "{handle} / {ending}: {:?}",
                    model.regions[0]
                );
            }
        }
    }

    #[test]
    fn navigation_mid_resize_normalizes() {
        let mut model = session();
        model.press_handle(0, ResizeHandle::TopLeft, ScreenPoint::new(100.0, 100.0));
        model.pointer_move(ScreenPoint::new(800.0, 400.0));
        assert!(model.next_page());

        assert!(model.interaction().is_idle());
        assert_eq!(model.regions[0], Region::new(1, 700.0, 300.0, 800.0, 400.0));
    }

    #[test]
    fn removing_another_region_mid_resize_normalizes() {
        let mut model = session();
        model.regions.push(Region::new(0, 0.0, 0.0, 10.0, 10.0));
        model.press_handle(0, ResizeHandle::TopLeft, ScreenPoint::new(100.0, 100.0));
        model.pointer_move(ScreenPoint::new(800.0, 400.0));
        model.remove_region(1);

        assert!(model.interaction().is_idle());
        assert_eq!(model.regions, vec![Region::new(0, 700.0, 300.0, 800.0, 400.0)]);
    }

    #[test]
    fn pointer_down_hit_tests() {
        let mut model = session();
        model.pointer_down(ScreenPoint::new(702.0, 298.0));
        assert!(matches!(
            model.interaction(),
            Interaction::Resizing {
                index: 0,
                handle: ResizeHandle::BottomRight,
                ..
            }
        ));
        model.pointer_up();

        model.pointer_down(ScreenPoint::new(400.0, 200.0));
        assert!(matches!(model.interaction(), Interaction::Dragging { index: 0, .. }));
        model.pointer_up();

        model.selected = None;
        model.pointer_down(ScreenPoint::new(1500.0, 2000.0));
        assert!(model.interaction().is_idle());
        assert_eq!(model.selected, None);
    }

    #[test]
    fn gestures_capture_and_release_the_pointer() {
        let log = RecordingCapture::default();
        let mut model = EditorModel::open(
            EditorConfig::default(),
            &[Region::new(0, 36.0, 36.0, 252.0, 108.0)],
            Box::new(log.clone()),
        );
        model.image = Some(page_image(0, 1600, 2200));

        model.press_region(0, ScreenPoint::new(200.0, 200.0));
        model.pointer_move(ScreenPoint::new(210.0, 200.0));
        model.pointer_up();
        model.press_handle(0, ResizeHandle::TopRight, ScreenPoint::new(700.0, 100.0));
        model.pointer_up();

        assert_eq!(
            *log.0.lock().unwrap(),
            vec!["capture", "release", "capture", "release"]
        );
    }

    #[test]
    fn next_page_carries_selected_region() {
        let mut model = session();
        model.regions.push(Region::new(0, 0.0, 0.0, 10.0, 10.0));
        model.select(1);

        assert!(model.next_page());
        assert_eq!(model.current_page, 1);
        assert_eq!(model.regions[1].page, 1);
        assert_eq!(model.regions[0].page, 0);
        assert!(model.image.is_none());

        assert!(model.prev_page());
        assert_eq!(model.regions[1].page, 0);
    }

    #[test]
    fn navigation_without_selection_moves_nothing() {
        let mut model = session();
        assert!(model.next_page());
        assert_eq!(model.regions[0].page, 0);
    }

    #[test]
    fn prev_page_below_zero_is_noop() {
        let mut model = session();
        model.select(0);
        assert!(!model.prev_page());
        assert_eq!(model.current_page, 0);
        assert!(model.image.is_some());
    }

    #[test]
    fn next_page_respects_known_page_count() {
        let mut model = session();
        model.page_count = Some(1);
        assert!(!model.next_page());
        assert_eq!(model.current_page, 0);
    }

    #[test]
    fn auto_scroll_uses_selection_or_first() {
        let mut model = session();
        let target = model.auto_scroll_target().unwrap();
        assert_eq!(target.fraction_x, 0.25);
        assert_eq!(target.fraction_y, 200.0 / 2200.0);

        model.regions.push(Region::new(0, 1200.0, 1100.0, 1600.0, 2200.0));
        model.select(1);
        let target = model.auto_scroll_target().unwrap();
        assert_eq!(target.fraction_x, 0.875);
        assert_eq!(target.fraction_y, 0.75);

        // Pure: nothing about the regions changed.
        assert_eq!(model.regions.len(), 2);
    }
}
