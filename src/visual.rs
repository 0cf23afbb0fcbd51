//! One rendered visual instance: runs update cycles and routes input.

use std::sync::atomic::{AtomicUsize, Ordering};

use eframe::egui::Vec2;
use log::{debug, info, warn};

use crate::config::{Settings, SettingsBag};
use crate::error::VisualError;
use crate::frame::{Frame, FrameRenderer};
use crate::graph::{DataView, build_graph};
use crate::host::VisualHost;
use crate::interaction::{InteractionController, Modifiers};
use crate::physics::{Simulation, Viewport};

static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(1);

/// Everything the host hands over on a data or settings refresh.
#[derive(Clone, Debug, Default)]
pub struct UpdateOptions {
    pub data: DataView,
    pub settings: SettingsBag,
    /// New container size; `None` keeps the current viewport.
    pub viewport: Option<(f32, f32)>,
}

struct Session {
    simulation: Simulation,
    interaction: InteractionController,
}

pub struct Visual<H: VisualHost> {
    host: H,
    instance: usize,
    settings: Settings,
    viewport: Viewport,
    session: Option<Session>,
}

impl<H: VisualHost> Visual<H> {
    pub fn new(host: H) -> Self {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        debug!("Constellation #{instance}: created");
        Self {
            host,
            instance,
            settings: Settings::default(),
            viewport: Viewport::default(),
            session: None,
        }
    }

    pub fn instance(&self) -> usize {
        self.instance
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.session.as_ref().map(|session| &session.simulation)
    }

    pub fn interaction(&self) -> Option<&InteractionController> {
        self.session.as_ref().map(|session| &session.interaction)
    }

    /// Rebuilds the graph and restarts the layout.
    ///
    /// The previous session is replaced only once the new one is complete;
    /// on failure it stays on screen and the host gets exactly one
    /// `rendering_failed`.
    pub fn update(&mut self, options: UpdateOptions) -> Result<(), VisualError> {
        self.host.rendering_started();

        match self.prepare(&options) {
            Ok((settings, viewport, session)) => {
                info!(
                    "Constellation #{}: {} nodes, {} links",
                    self.instance,
                    session.simulation.graph().node_count(),
                    session.simulation.graph().link_count()
                );
                let had_selection = self
                    .interaction()
                    .is_some_and(|interaction| !interaction.selected().is_empty());
                let viewport_changed = viewport != self.viewport;

                self.settings = settings;
                self.viewport = viewport;
                self.session = Some(session);
                if had_selection {
                    self.host.clear();
                }
                if viewport_changed {
                    self.host.viewport_changed(viewport);
                }
                self.host.rendering_finished();
                Ok(())
            }
            Err(error) => {
                warn!("Constellation #{}: {}: {error}", self.instance, error.title());
                self.host.display_warning(&error);
                self.host.rendering_failed(&error.to_string());
                Err(error)
            }
        }
    }

    fn prepare(&self, options: &UpdateOptions) -> Result<(Settings, Viewport, Session), VisualError> {
        let settings = Settings::from_bag(&options.settings);
        let viewport = match options.viewport {
            Some((width, height)) => {
                if !(width.is_finite() && height.is_finite()) {
                    return Err(VisualError::generic(format!(
                        "invalid viewport size {width}x{height}"
                    )));
                }
                Viewport::new(width, height)
            }
            None => self.viewport,
        };

        let graph = build_graph(&options.data, &settings)?;
        let mut simulation = Simulation::start(graph, &settings, viewport);
        if settings.advanced.preserve_layout
            && let Some(previous) = self.simulation()
        {
            simulation.adopt_layout(previous.graph());
        }

        Ok((
            settings,
            viewport,
            Session {
                simulation,
                interaction: InteractionController::new(),
            },
        ))
    }

    /// Advances the layout one step. Returns whether another tick is wanted.
    pub fn tick(&mut self) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.simulation.tick())
    }

    pub fn frame(&self) -> Frame {
        match &self.session {
            Some(session) => {
                FrameRenderer::new(&self.settings).project(&session.simulation, &session.interaction)
            }
            None => Frame::default(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height);
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        if let Some(session) = self.session.as_mut() {
            session.simulation.set_viewport(viewport);
            session.simulation.restart();
        }
        debug!("Constellation #{}: viewport {width}x{height}", self.instance);
        self.host.viewport_changed(viewport);
    }

    pub fn pointer_down(&mut self, point: Vec2) -> Option<usize> {
        let session = self.session.as_mut()?;
        session.interaction.pointer_down(&mut session.simulation, point)
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        if let Some(session) = self.session.as_mut() {
            session.interaction.pointer_move(&mut session.simulation, point);
        }
    }

    pub fn pointer_up(&mut self, point: Vec2, modifiers: Modifiers) {
        if let Some(session) = self.session.as_mut() {
            session
                .interaction
                .pointer_up(&mut session.simulation, point, modifiers, &mut self.host);
        }
    }

    pub fn context_menu(&mut self, point: Vec2) {
        match &self.session {
            Some(session) => {
                session
                    .interaction
                    .context_menu(&session.simulation, point, &mut self.host)
            }
            None => self.host.show_context_menu(None, point),
        }
    }
}
