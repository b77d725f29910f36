// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/mod.rs
//
// Region editor: session model, messages, update loop and async runtime.

pub mod batch;
pub mod document;
pub mod interaction;
pub mod message;
pub mod model;
pub mod runtime;
pub mod update;
pub mod viewport;

pub use batch::compose_session;
pub use document::{DirectoryPageSource, PageImage, PageRequest, PageSource};
pub use interaction::{Interaction, NoCapture, PointerCapture};
pub use message::{EditorMessage, Effect};
pub use model::EditorModel;
pub use runtime::{CloseFn, ConfirmFn, EditorRuntime, confirm_fn};
pub use viewport::{Hit, ScreenPoint, ScrollTarget, Viewport};
