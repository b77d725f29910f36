// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/interaction.rs
//
// Pointer gesture state and exclusive pointer capture.

use std::fmt;

use super::viewport::ScreenPoint;
use crate::domain::bbox::ResizeHandle;

/// Input surface that can route every pointer event to the editor while
/// a gesture is running.
pub trait PointerCapture: Send {
    fn capture(&mut self);
    fn release(&mut self);
}

/// Surface for headless use: capture requests go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self) {}
    fn release(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        index: usize,
        last: ScreenPoint,
    },
    Resizing {
        index: usize,
        handle: ResizeHandle,
        anchor: ScreenPoint,
    },
}

impl Interaction {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Region the running gesture operates on.
    pub fn index(&self) -> Option<usize> {
        match *self {
            Self::Idle => None,
            Self::Dragging { index, .. } | Self::Resizing { index, .. } => Some(index),
        }
    }
}

/// Gesture state machine. Holds the pointer capture for exactly as long as
/// the state is not [`Interaction::Idle`].
pub struct Gesture {
    state: Interaction,
    surface: Box<dyn PointerCapture>,
}

impl fmt::Debug for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gesture")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Default for Gesture {
    fn default() -> Self {
        Self::new(Box::new(NoCapture))
    }
}

impl Gesture {
    pub fn new(surface: Box<dyn PointerCapture>) -> Self {
        Self {
            state: Interaction::Idle,
            surface,
        }
    }

    pub fn state(&self) -> Interaction {
        self.state
    }

    pub fn begin_drag(&mut self, index: usize, at: ScreenPoint) {
        self.enter(Interaction::Dragging { index, last: at });
    }

    pub fn begin_resize(&mut self, index: usize, handle: ResizeHandle, at: ScreenPoint) {
        self.enter(Interaction::Resizing {
            index,
            handle,
            anchor: at,
        });
    }

    /// Record the latest pointer position of a drag.
    pub fn moved_to(&mut self, at: ScreenPoint) {
        if let Interaction::Dragging { last, .. } = &mut self.state {
            *last = at;
        }
    }

    /// Return to idle and hand back the state that just ended.
    pub fn end(&mut self) -> Interaction {
        let ended = std::mem::take(&mut self.state);
        if !ended.is_idle() {
            self.surface.release();
        }
        ended
    }

    fn enter(&mut self, next: Interaction) {
        if self.state.is_idle() {
            self.surface.capture();
        }
        self.state = next;
    }
}
