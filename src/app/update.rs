// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// Message handling: apply a message to the model, return the follow-up work.

use super::message::{EditorMessage, Effect};
use super::model::EditorModel;

pub fn update(model: &mut EditorModel, message: EditorMessage) -> Effect {
    if model.closed {
        return Effect::None;
    }

    match message {
        // Pointer.
        EditorMessage::PointerDown { pos } => {
            if model.is_interactive() {
                model.pointer_down(pos);
            }
        }
        EditorMessage::PressRegion { index, pos } => {
            if model.is_interactive() {
                model.press_region(index, pos);
            }
        }
        EditorMessage::PressHandle { index, handle, pos } => {
            if model.is_interactive() {
                model.press_handle(index, handle, pos);
            }
        }
        EditorMessage::PointerMove { pos } => model.pointer_move(pos),
        EditorMessage::PointerUp => model.pointer_up(),

        // Regions.
        EditorMessage::Select(index) => model.select(index),
        EditorMessage::AddRegion => {
            if model.accepts_edits() {
                model.add_region();
            }
        }
        EditorMessage::RemoveRegion(index) => {
            if model.accepts_edits() {
                model.remove_region(index);
            }
        }

        // Pages.
        EditorMessage::NextPage => {
            if model.accepts_edits() && model.next_page() {
                return Effect::LoadPage(model.current_page);
            }
        }
        EditorMessage::PrevPage => {
            if model.accepts_edits() && model.prev_page() {
                return Effect::LoadPage(model.current_page);
            }
        }
        EditorMessage::GotoPage(page) => {
            if model.accepts_edits() && model.navigate_page(page) {
                return Effect::LoadPage(page);
            }
        }
        EditorMessage::AssignToPage { index, page } => {
            if model.accepts_edits() {
                model.assign_region_to_page(index, page);
            }
        }

        // View.
        EditorMessage::DisplayResized { width, height } => {
            model.display_size = Some((width, height));
        }

        // Image loading.
        EditorMessage::PageLoaded { url, result } => {
            if model.requested_url.as_deref() != Some(url.as_str()) {
                log::debug!("Discarding stale page load for {url}");
                return Effect::None;
            }
            match result {
                Ok(image) => {
                    let (width, height) = image.dimensions();
                    log::info!("Loaded page {} ({width}x{height}) from {url}", image.page);
                    model.image = Some(image);
                    model.clear_error();
                }
                Err(e) => {
                    log::error!("{e}");
                    model.image = None;
                    model.set_error(e);
                }
            }
        }

        // Commit.
        EditorMessage::RequestCommit => {
            if model.composing || model.saving {
                return Effect::None;
            }
            if model.regions.is_empty() {
                model.set_error("Add at least one region before saving");
                return Effect::None;
            }
            let Some(image) = model.image.clone() else {
                model.set_error("The page image has not been loaded");
                return Effect::None;
            };
            model.end_gesture();
            model.composing = true;
            model.compose_cancelled = false;
            model.clear_error();
            return Effect::Compose {
                image,
                regions: model.regions.clone(),
            };
        }
        EditorMessage::Composed(result) => {
            model.composing = false;
            if std::mem::take(&mut model.compose_cancelled) {
                log::debug!("Discarding composite of a cancelled commit");
                return Effect::None;
            }
            match result {
                Ok(composite) => {
                    model.preview = Some(composite);
                    model.confirm_open = true;
                }
                Err(e) => {
                    log::error!("Compose failed: {e}");
                    model.set_error(e);
                }
            }
        }
        EditorMessage::ConfirmCommit => {
            if model.saving || !model.confirm_open {
                return Effect::None;
            }
            if let Some(composite) = model.preview.clone() {
                model.saving = true;
                return Effect::Commit(composite);
            }
        }
        EditorMessage::CancelCommit => close_dialog(model),
        EditorMessage::CommitFinished(result) => {
            model.saving = false;
            match result {
                Ok(()) => {
                    log::info!("Committed {} regions", model.regions.len());
                    return close(model);
                }
                Err(e) => {
                    log::warn!("Commit failed, edits kept: {e}");
                    model.set_error(e);
                }
            }
        }

        // Closing.
        EditorMessage::Escape => {
            if model.saving {
                return Effect::None;
            }
            if model.confirm_open || model.composing {
                close_dialog(model);
            } else {
                return close(model);
            }
        }
        EditorMessage::Cancel => {
            if !model.saving {
                return close(model);
            }
        }
    }

    Effect::None
}

fn close_dialog(model: &mut EditorModel) {
    if model.saving {
        return;
    }
    if model.composing {
        model.compose_cancelled = true;
    }
    model.confirm_open = false;
    model.preview = None;
}

fn close(model: &mut EditorModel) -> Effect {
    model.end_gesture();
    model.closed = true;
    Effect::Close
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::app::document::PageImage;
    use crate::app::interaction::NoCapture;
    use crate::app::viewport::ScreenPoint;
    use crate::config::EditorConfig;
    use crate::domain::bbox::{Region, ResizeHandle};
    use crate::domain::document::operations::Composite;
    use image::RgbaImage;

    fn loaded(url: &str) -> EditorMessage {
        EditorMessage::PageLoaded {
            url: url.to_string(),
            result: Ok(Arc::new(PageImage {
                page: 0,
                url: url.to_string(),
                image: RgbaImage::new(1000, 1000),
            })),
        }
    }

    fn ready_model() -> EditorModel {
        let mut model = EditorModel::open(
            EditorConfig::default(),
            &[Region::new(0, 36.0, 36.0, 252.0, 108.0)],
            Box::new(NoCapture),
        );
        model.requested_url = Some("p0".into());
        update(&mut model, loaded("p0"));
        model
    }

    fn composite() -> Arc<Composite> {
        Arc::new(Composite {
            png: vec![1, 2, 3],
            width: 600,
            height: 200,
            regions: vec![Region::new(0, 36.0, 36.0, 252.0, 108.0)],
        })
    }

    #[test]
    fn stale_load_is_discarded() {
        let mut model = ready_model();
        assert!(matches!(update(&mut model, EditorMessage::NextPage), Effect::LoadPage(1)));
        model.requested_url = Some("p1".into());

        update(&mut model, loaded("p0"));
        assert!(model.image.is_none());

        update(&mut model, loaded("p1"));
        assert!(model.image.is_some());
    }

    #[test]
    fn load_failure_is_reported_and_blocks_input() {
        let mut model = ready_model();
        model.requested_url = Some("p0".into());
        update(
            &mut model,
            EditorMessage::PageLoaded {
                url: "p0".into(),
                result: Err("Failed to load page image p0".into()),
            },
        );
        assert_eq!(model.error.as_deref(), Some("Failed to load page image p0"));
        update(
            &mut model,
            EditorMessage::PressRegion {
                index: 0,
                pos: ScreenPoint::default(),
            },
        );
        assert!(model.interaction().is_idle());
        assert_eq!(model.selected, None);
    }

    #[test]
    fn goto_page_does_not_move_selection() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::Select(0));
        assert!(matches!(update(&mut model, EditorMessage::GotoPage(4)), Effect::LoadPage(4)));
        assert_eq!(model.regions[0].page, 0);
        update(&mut model, EditorMessage::AssignToPage { index: 0, page: 4 });
        assert_eq!(model.regions[0].page, 4);
    }

    #[test]
    fn commit_flow_closes_on_success() {
        let mut model = ready_model();
        let effect = update(&mut model, EditorMessage::RequestCommit);
        assert!(matches!(effect, Effect::Compose { ref regions, .. } if regions.len() == 1));
        assert!(matches!(update(&mut model, EditorMessage::RequestCommit), Effect::None));

        update(&mut model, EditorMessage::Composed(Ok(composite())));
        assert!(model.confirm_open);

        assert!(matches!(update(&mut model, EditorMessage::ConfirmCommit), Effect::Commit(_)));
        assert!(model.saving);
        // At most one commit in flight.
        assert!(matches!(update(&mut model, EditorMessage::ConfirmCommit), Effect::None));

        assert!(matches!(
            update(&mut model, EditorMessage::CommitFinished(Ok(()))),
            Effect::Close
        ));
        assert!(model.closed);
        assert!(matches!(update(&mut model, EditorMessage::AddRegion), Effect::None));
    }

    #[test]
    fn failed_commit_keeps_edits_and_preview() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RequestCommit);
        update(&mut model, EditorMessage::Composed(Ok(composite())));
        update(&mut model, EditorMessage::ConfirmCommit);
        let effect = update(
            &mut model,
            EditorMessage::CommitFinished(Err("upload rejected".into())),
        );

        assert!(matches!(effect, Effect::None));
        assert!(!model.saving);
        assert!(!model.closed);
        assert!(model.preview.is_some());
        assert_eq!(model.regions.len(), 1);
        assert_eq!(model.error.as_deref(), Some("upload rejected"));

        // Retry is allowed.
        assert!(matches!(update(&mut model, EditorMessage::ConfirmCommit), Effect::Commit(_)));
    }

    #[test]
    fn commit_requires_regions_and_image() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RemoveRegion(0));
        assert!(matches!(update(&mut model, EditorMessage::RequestCommit), Effect::None));
        assert!(model.error.is_some());

        let mut model = ready_model();
        model.image = None;
        assert!(matches!(update(&mut model, EditorMessage::RequestCommit), Effect::None));
        assert!(!model.composing);
    }

    #[test]
    fn escape_closes_dialog_before_editor() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RequestCommit);
        update(&mut model, EditorMessage::Composed(Ok(composite())));

        assert!(matches!(update(&mut model, EditorMessage::Escape), Effect::None));
        assert!(!model.confirm_open);
        assert!(!model.closed);

        assert!(matches!(update(&mut model, EditorMessage::Escape), Effect::Close));
        assert!(model.closed);
    }

    #[test]
    fn commit_request_mid_resize_composes_normalized_regions() {
        let mut model = ready_model();
        update(
            &mut model,
            EditorMessage::PressHandle {
                index: 0,
                handle: ResizeHandle::TopLeft,
                pos: ScreenPoint::new(100.0, 100.0),
            },
        );
        update(
            &mut model,
            EditorMessage::PointerMove {
                pos: ScreenPoint::new(800.0, 400.0),
            },
        );

        let effect = update(&mut model, EditorMessage::RequestCommit);
        assert!(model.interaction().is_idle());
        let expected = vec![Region::new(0, 700.0, 300.0, 800.0, 400.0)];
        assert!(matches!(effect, Effect::Compose { ref regions, .. } if *regions == expected));
        assert_eq!(model.regions, expected);
    }

    #[test]
    fn cancel_mid_resize_normalizes_before_closing() {
        let mut model = ready_model();
        update(
            &mut model,
            EditorMessage::PressHandle {
                index: 0,
                handle: ResizeHandle::BottomRight,
                pos: ScreenPoint::new(700.0, 300.0),
            },
        );
        update(
            &mut model,
            EditorMessage::PointerMove {
                pos: ScreenPoint::new(50.0, 60.0),
            },
        );
        assert!(matches!(update(&mut model, EditorMessage::Cancel), Effect::Close));
        assert!(model.regions[0].is_normalized());
    }

    #[test]
    fn edits_are_frozen_while_composing() {
        let mut model = ready_model();
        let Effect::Compose { regions, .. } = update(&mut model, EditorMessage::RequestCommit)
        else {
            panic!("expected a compose effect");
        };

        update(
            &mut model,
            EditorMessage::PressRegion {
                index: 0,
                pos: ScreenPoint::new(200.0, 200.0),
            },
        );
        update(
            &mut model,
            EditorMessage::PointerMove {
                pos: ScreenPoint::new(300.0, 200.0),
            },
        );
        update(&mut model, EditorMessage::PointerUp);
        update(&mut model, EditorMessage::AddRegion);
        update(&mut model, EditorMessage::RemoveRegion(0));
        assert!(matches!(update(&mut model, EditorMessage::NextPage), Effect::None));
        update(&mut model, EditorMessage::AssignToPage { index: 0, page: 2 });

        assert!(model.interaction().is_idle());
        assert_eq!(model.regions, regions);
        assert_eq!(model.current_page, 0);
    }

    #[test]
    fn cancel_while_composing_discards_the_preview() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RequestCommit);
        update(&mut model, EditorMessage::CancelCommit);
        update(&mut model, EditorMessage::Composed(Ok(composite())));

        assert!(!model.confirm_open);
        assert!(model.preview.is_none());
        assert!(!model.composing);
        assert!(model.accepts_edits());
        assert!(matches!(update(&mut model, EditorMessage::ConfirmCommit), Effect::None));

        // A fresh request goes through the dialog as usual.
        assert!(matches!(
            update(&mut model, EditorMessage::RequestCommit),
            Effect::Compose { .. }
        ));
        update(&mut model, EditorMessage::Composed(Ok(composite())));
        assert!(model.confirm_open);
    }

    #[test]
    fn escape_while_composing_cancels_the_commit_only() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RequestCommit);
        assert!(matches!(update(&mut model, EditorMessage::Escape), Effect::None));
        assert!(!model.closed);

        // Still one compose in flight; a second request waits for it.
        assert!(matches!(update(&mut model, EditorMessage::RequestCommit), Effect::None));

        update(&mut model, EditorMessage::Composed(Ok(composite())));
        assert!(!model.confirm_open);
        assert!(model.preview.is_none());
    }

    #[test]
    fn modal_dialog_blocks_pointer_input() {
        let mut model = ready_model();
        update(&mut model, EditorMessage::RequestCommit);
        update(&mut model, EditorMessage::Composed(Ok(composite())));
        update(
            &mut model,
            EditorMessage::PointerDown {
                pos: ScreenPoint::new(300.0, 200.0),
            },
        );
        assert!(model.interaction().is_idle());
    }
}
