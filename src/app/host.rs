use constellation::{RenderingEvents, SelectionHandle, SelectionHost, VisualError};
use eframe::egui::Vec2;
use log::{debug, info, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(super) enum RenderStatus {
    #[default]
    Idle,
    Rendering,
    Finished,
    Failed(String),
}

#[derive(Clone, Debug)]
pub(super) struct MenuRequest {
    pub(super) handle: Option<SelectionHandle>,
    pub(super) position: Vec2,
}

#[derive(Debug, Default)]
pub(super) struct DemoHost {
    pub(super) status: RenderStatus,
    pub(super) warning: Option<VisualError>,
    pub(super) selection: Vec<SelectionHandle>,
    pub(super) menu: Option<MenuRequest>,
}

impl DemoHost {
    pub(super) fn selection_summary(&self) -> String {
        self.selection
            .iter()
            .map(SelectionHandle::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl SelectionHost for DemoHost {
    fn select(&mut self, handles: &[SelectionHandle]) {
        debug!("host selection: {} handles", handles.len());
        self.selection = handles.to_vec();
    }

    fn clear(&mut self) {
        debug!("host selection cleared");
        self.selection.clear();
    }

    fn show_context_menu(&mut self, handle: Option<&SelectionHandle>, position: Vec2) {
        self.menu = Some(MenuRequest {
            handle: handle.cloned(),
            position,
        });
    }
}

impl RenderingEvents for DemoHost {
    fn rendering_started(&mut self) {
        self.status = RenderStatus::Rendering;
        self.warning = None;
    }

    fn rendering_finished(&mut self) {
        self.status = RenderStatus::Finished;
        self.menu = None;
    }

    fn rendering_failed(&mut self, reason: &str) {
        info!("rendering failed: {reason}");
        self.status = RenderStatus::Failed(reason.to_owned());
    }

    fn display_warning(&mut self, error: &VisualError) {
        warn!("{}: {error}", error.title());
        self.warning = Some(error.clone());
    }
}
