use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::{Context as _, Result};
use constellation::{DataView, SettingsBag, UpdateOptions, Visual};
use eframe::egui::{self, Align, Context, Layout};

mod canvas;
mod host;
mod render_utils;

use host::{DemoHost, RenderStatus};

#[derive(Clone, Debug)]
pub struct InputPaths {
    pub data: PathBuf,
    pub settings: Option<PathBuf>,
}

struct LoadedInput {
    data: DataView,
    settings: SettingsBag,
}

pub struct ConstellationApp {
    paths: InputPaths,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedInput, String>>>,
    visual: Visual<DemoHost>,
    canvas: canvas::CanvasState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedInput, String>>,
    },
    Ready,
    Error(String),
}

impl ConstellationApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, paths: InputPaths) -> Self {
        let state = Self::start_load(paths.clone());
        Self {
            paths,
            state,
            reload_rx: None,
            visual: Visual::new(DemoHost::default()),
            canvas: canvas::CanvasState::default(),
        }
    }

    fn spawn_load(paths: InputPaths) -> Receiver<Result<LoadedInput, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_input(&paths).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(paths: InputPaths) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(paths),
        }
    }

    fn apply(&mut self, input: LoadedInput) -> AppState {
        let viewport = self.canvas.size().map(|size| (size.x, size.y));
        let options = UpdateOptions {
            data: input.data,
            settings: input.settings,
            viewport,
        };
        if let Err(error) = self.visual.update(options) {
            log::warn!("update rejected: {error}");
        }
        self.canvas.reset();
        AppState::Ready
    }

    fn show_ready(&mut self, ctx: &Context, reload_requested: &mut bool) {
        let is_reloading = self.reload_rx.is_some();

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Constellation");
                    ui.separator();
                    ui.label(format!("data: {}", self.paths.data.display()));
                    if let Some(settings) = &self.paths.settings {
                        ui.label(format!("settings: {}", settings.display()));
                    }
                    let reload_button = ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(simulation) = self.visual.simulation() {
                            let graph = simulation.graph();
                            ui.label(format!(
                                "nodes: {}  links: {}  alpha: {:.3}",
                                graph.node_count(),
                                graph.link_count(),
                                simulation.alpha()
                            ));
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("status_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let host = self.visual.host();
                    match &host.status {
                        RenderStatus::Idle => ui.label("idle"),
                        RenderStatus::Rendering => ui.label("rendering..."),
                        RenderStatus::Finished => ui.label("rendered"),
                        RenderStatus::Failed(reason) => {
                            ui.colored_label(ui.visuals().error_fg_color, format!("failed: {reason}"))
                        }
                    };
                    if let Some(warning) = &host.warning {
                        ui.separator();
                        ui.colored_label(
                            ui.visuals().warn_fg_color,
                            format!("{}: {warning}", warning.title()),
                        );
                    }
                    if !host.selection.is_empty() {
                        ui.separator();
                        ui.label(format!("selected: {}", host.selection_summary()));
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.canvas.show(ui, &mut self.visual));
    }
}

impl eframe::App for ConstellationApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let mut retry = false;
        let mut ready = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading data view...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the data view");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    retry = ui.button("Retry").clicked();
                });
            }
            AppState::Ready => ready = true,
        }

        if ready {
            let mut reload_requested = false;
            self.show_ready(ctx, &mut reload_requested);

            if reload_requested && self.reload_rx.is_none() {
                self.reload_rx = Some(Self::spawn_load(self.paths.clone()));
            }

            if let Some(rx) = self.reload_rx.take() {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => {
                        self.reload_rx = Some(rx);
                        ctx.request_repaint();
                    }
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }
            }
        }

        if retry {
            self.state = Self::start_load(self.paths.clone());
        }

        if let Some(result) = transition {
            self.reload_rx = None;
            self.state = match result {
                Ok(input) => self.apply(input),
                Err(error) => AppState::Error(error),
            };
        }
    }
}

fn load_input(paths: &InputPaths) -> Result<LoadedInput> {
    let data = read_json::<DataView>(&paths.data)?;
    let settings = match &paths.settings {
        Some(path) => read_json::<SettingsBag>(path)?,
        None => SettingsBag::new(),
    };
    Ok(LoadedInput { data, settings })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}
