use std::fmt;

use eframe::egui::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::VisualError;
use crate::physics::Viewport;

/// Opaque token the host uses to identify a selectable data point.
///
/// The core only stores and forwards handles; it never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionHandle(String);

impl SelectionHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn for_row(index: usize) -> Self {
        Self(format!("row:{index}"))
    }

    pub fn for_category(index: usize) -> Self {
        Self(format!("category:{index}"))
    }

    pub fn for_group(index: usize) -> Self {
        Self(format!("group:{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selection and context-menu services provided by the host.
pub trait SelectionHost {
    /// Replace the host's selection with `handles`.
    fn select(&mut self, handles: &[SelectionHandle]);
    fn clear(&mut self);
    /// `handle` is `None` when the menu was opened on the background.
    fn show_context_menu(&mut self, handle: Option<&SelectionHandle>, position: Vec2);
}

/// Rendering lifecycle notifications and user-facing warnings.
pub trait RenderingEvents {
    fn rendering_started(&mut self);
    fn rendering_finished(&mut self);
    fn rendering_failed(&mut self, reason: &str);
    fn display_warning(&mut self, error: &VisualError);
    /// Drawable bounds changed; the next frame is laid out inside `viewport`.
    fn viewport_changed(&mut self, _viewport: Viewport) {}
}

/// Everything a [`crate::Visual`] needs from its host.
pub trait VisualHost: SelectionHost + RenderingEvents {}

impl<T: SelectionHost + RenderingEvents> VisualHost for T {}
