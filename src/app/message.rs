// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Editor messages (user input and task results) and the effects the
// runtime carries out in response.

use std::sync::Arc;

use super::document::PageImage;
use super::viewport::ScreenPoint;
use crate::domain::bbox::{Region, ResizeHandle};
use crate::domain::document::operations::Composite;

#[derive(Debug, Clone)]
pub enum EditorMessage {
    // Pointer.
    PointerDown {
        pos: ScreenPoint,
    },
    PressRegion {
        index: usize,
        pos: ScreenPoint,
    },
    PressHandle {
        index: usize,
        handle: ResizeHandle,
        pos: ScreenPoint,
    },
    PointerMove {
        pos: ScreenPoint,
    },
    PointerUp,

    // Regions.
    Select(usize),
    AddRegion,
    RemoveRegion(usize),

    // Pages.
    NextPage,
    PrevPage,
    GotoPage(u32),
    AssignToPage {
        index: usize,
        page: u32,
    },

    // View.
    DisplayResized {
        width: f64,
        height: f64,
    },

    // Image loading.
    PageLoaded {
        url: String,
        result: Result<Arc<PageImage>, String>,
    },

    // Commit.
    RequestCommit,
    Composed(Result<Arc<Composite>, String>),
    ConfirmCommit,
    CancelCommit,
    CommitFinished(Result<(), String>),

    // Closing.
    Escape,
    Cancel,
}

/// Work requested by [`super::update::update`]. The runtime performs it
/// and feeds results back as messages.
#[derive(Debug, Clone, Default)]
pub enum Effect {
    #[default]
    None,
    /// Fetch and decode the image of a page.
    LoadPage(u32),
    /// Crop and stack these pixel-space regions out of the image.
    Compose {
        image: Arc<PageImage>,
        regions: Vec<Region>,
    },
    /// Hand the composite to the commit callback.
    Commit(Arc<Composite>),
    /// Invoke the close callback; the session is over.
    Close,
}
