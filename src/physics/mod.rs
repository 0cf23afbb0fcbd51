//! Iterative force layout: springs along links, many-body repulsion,
//! damped integration and elastic reflection off the viewport edges.

mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use log::debug;

use crate::config::{NodeSettings, Settings};
use crate::graph::Graph;
use crate::util::seed_position;

use forces::{LinkForce, apply_link_force, apply_many_body_force};

pub const ALPHA_START: f32 = 1.0;
pub const ALPHA_MIN: f32 = 0.001;
pub const REHEAT_ALPHA_TARGET: f32 = 0.3;
pub const VELOCITY_DECAY: f32 = 0.6;
const BARNES_HUT_THETA: f32 = 0.9;
const ALPHA_DECAY_TICKS: f32 = 300.0;

/// Drawable area, centered at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub half_width: f32,
    pub half_height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_width: (width * 0.5).max(0.0),
            half_height: (height * 0.5).max(0.0),
        }
    }

    pub fn width(self) -> f32 {
        self.half_width * 2.0
    }

    pub fn height(self) -> f32 {
        self.half_height * 2.0
    }

    /// A zero-sized viewport has not been measured yet and constrains nothing.
    pub fn is_bounded(self) -> bool {
        self.half_width > 0.0 && self.half_height > 0.0
    }

    /// Largest |x| and |y| a circle of `radius` may be centered at.
    fn limits(self, radius: f32) -> Vec2 {
        vec2(
            (self.half_width - radius).max(0.0),
            (self.half_height - radius).max(0.0),
        )
    }

    pub fn clamp_point(self, point: Vec2, radius: f32) -> Vec2 {
        if !self.is_bounded() {
            return point;
        }
        let limits = self.limits(radius);
        vec2(
            point.x.clamp(-limits.x, limits.x),
            point.y.clamp(-limits.y, limits.y),
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct ForceParams {
    default_distance: f32,
    gravity: f32,
}

/// One simulation per update cycle; owns the graph for that cycle.
pub struct Simulation {
    graph: Graph,
    node_defaults: NodeSettings,
    params: ForceParams,
    degrees: Vec<usize>,
    radii: Vec<f32>,
    positions: Vec<Vec2>,
    viewport: Viewport,
    alpha: f32,
    alpha_target: f32,
    alpha_decay: f32,
    running: bool,
}

impl Simulation {
    pub fn start(mut graph: Graph, settings: &Settings, viewport: Viewport) -> Self {
        for (index, node) in graph.nodes_mut().iter_mut().enumerate() {
            node.position = seed_position(index);
            node.velocity = Vec2::ZERO;
        }

        let degrees = graph.degrees();
        let radii = graph
            .nodes()
            .iter()
            .map(|node| node.resolved_radius(&settings.node))
            .collect::<Vec<_>>();

        let mut simulation = Self {
            graph,
            node_defaults: settings.node.clone(),
            params: ForceParams {
                default_distance: settings.link.distance,
                gravity: settings.link.gravity,
            },
            degrees,
            radii,
            positions: Vec::new(),
            viewport,
            alpha: ALPHA_START,
            alpha_target: 0.0,
            alpha_decay: 1.0 - ALPHA_MIN.powf(1.0 / ALPHA_DECAY_TICKS),
            running: true,
        };
        simulation.reflect_boundaries();

        debug!(
            "simulation started: {} nodes, {} links, viewport {}x{}",
            simulation.graph.node_count(),
            simulation.graph.link_count(),
            viewport.width(),
            viewport.height()
        );
        simulation
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn node_defaults(&self) -> &NodeSettings {
        &self.node_defaults
    }

    pub fn radius(&self, index: usize) -> f32 {
        self.radii
            .get(index)
            .copied()
            .unwrap_or(self.node_defaults.radius)
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
    }

    pub fn reheat(&mut self) {
        self.set_alpha_target(REHEAT_ALPHA_TARGET);
        self.alpha = self.alpha.max(REHEAT_ALPHA_TARGET);
        self.running = true;
    }

    pub fn cool(&mut self) {
        self.set_alpha_target(0.0);
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn restart(&mut self) {
        self.running = true;
    }

    /// Fixes a node at `position`, kept inside the viewport.
    pub fn pin(&mut self, index: usize, position: Vec2) {
        let radius = self.radius(index);
        let viewport = self.viewport;
        let Some(node) = self.graph.nodes_mut().get_mut(index) else {
            return;
        };
        let pinned = viewport.clamp_point(position, radius);
        node.pin = Some(pinned);
        node.position = pinned;
        node.velocity = Vec2::ZERO;
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.graph.nodes_mut().get_mut(index) {
            node.pin = None;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for index in 0..self.graph.node_count() {
            if let Some(pin) = self.graph.nodes()[index].pin {
                self.pin(index, pin);
            }
        }
        self.reflect_boundaries();
    }

    /// Copies position and velocity of same-label nodes from `previous`.
    pub fn adopt_layout(&mut self, previous: &Graph) {
        let mut adopted = 0usize;
        for node in self.graph.nodes_mut() {
            if let Some(old) = previous.node(&node.label) {
                node.position = old.position;
                node.velocity = old.velocity;
                adopted += 1;
            }
        }
        self.reflect_boundaries();
        debug!("adopted layout for {adopted} nodes");
    }

    /// Advances one step. Returns whether the simulation is still running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        let alpha = self.alpha;

        let (nodes, links) = self.graph.nodes_and_links_mut();
        apply_link_force(
            nodes,
            LinkForce {
                links,
                degrees: &self.degrees,
                default_distance: self.params.default_distance,
            },
            alpha,
        );

        self.positions.clear();
        self.positions
            .extend(self.graph.nodes().iter().map(|node| node.position));
        apply_many_body_force(
            self.graph.nodes_mut(),
            &self.positions,
            self.params.gravity,
            BARNES_HUT_THETA,
            alpha,
        );

        for node in self.graph.nodes_mut() {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
            } else {
                node.velocity *= VELOCITY_DECAY;
                node.position += node.velocity;
            }
        }

        self.reflect_boundaries();

        if self.alpha < ALPHA_MIN && self.alpha_target < ALPHA_MIN {
            self.running = false;
            debug!("simulation converged");
        }
        self.running
    }

    /// Keeps every free node's circle inside the viewport, bouncing its
    /// velocity on the clamped axis.
    fn reflect_boundaries(&mut self) {
        if !self.viewport.is_bounded() {
            return;
        }

        let viewport = self.viewport;
        for (index, node) in self.graph.nodes_mut().iter_mut().enumerate() {
            if node.pin.is_some() {
                continue;
            }
            let radius = self.radii.get(index).copied().unwrap_or(0.0);
            let limits = viewport.limits(radius);

            if node.position.x < -limits.x {
                node.position.x = -limits.x;
                node.velocity.x = -node.velocity.x;
            } else if node.position.x > limits.x {
                node.position.x = limits.x;
                node.velocity.x = -node.velocity.x;
            }

            if node.position.y < -limits.y {
                node.position.y = -limits.y;
                node.velocity.y = -node.velocity.y;
            } else if node.position.y > limits.y {
                node.position.y = limits.y;
                node.velocity.y = -node.velocity.y;
            }
        }
    }
}
