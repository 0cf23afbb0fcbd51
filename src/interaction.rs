//! Pointer, click and context-menu handling.
//!
//! Drag state pins the grabbed node and reheats the simulation; selection
//! is a purely visual projection (other nodes render dimmed) and is
//! forwarded to the host as selection handles.

use eframe::egui::Vec2;

use crate::graph::Graph;
use crate::host::{SelectionHandle, SelectionHost};
use crate::physics::Simulation;

/// Pointer travel below which a press/release pair counts as a click.
pub const CLICK_TOLERANCE: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Free,
    Dragging,
    Selected,
    Dimmed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Toggle the clicked node instead of replacing the selection.
    pub multi_select: bool,
}

#[derive(Clone, Copy, Debug)]
struct Press {
    node: Option<usize>,
    origin: Vec2,
    dragged: bool,
}

#[derive(Debug, Default)]
pub struct InteractionController {
    press: Option<Press>,
    selected: Vec<usize>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Topmost node whose circle contains `point`.
    pub fn hit_test(simulation: &Simulation, point: Vec2) -> Option<usize> {
        simulation
            .graph()
            .nodes()
            .iter()
            .enumerate()
            .rev()
            .find(|(index, node)| {
                let radius = simulation.radius(*index);
                (node.position - point).length_sq() <= radius * radius
            })
            .map(|(index, _)| index)
    }

    pub fn pointer_down(&mut self, simulation: &mut Simulation, point: Vec2) -> Option<usize> {
        let node = Self::hit_test(simulation, point);
        self.press = Some(Press {
            node,
            origin: point,
            dragged: false,
        });

        if let Some(index) = node {
            simulation.reheat();
            let position = simulation.graph().nodes()[index].position;
            simulation.pin(index, position);
        }
        node
    }

    pub fn pointer_move(&mut self, simulation: &mut Simulation, point: Vec2) {
        let Some(press) = self.press.as_mut() else {
            return;
        };
        if (point - press.origin).length() > CLICK_TOLERANCE {
            press.dragged = true;
        }
        if let Some(index) = press.node {
            simulation.pin(index, point);
        }
    }

    pub fn pointer_up(
        &mut self,
        simulation: &mut Simulation,
        point: Vec2,
        modifiers: Modifiers,
        host: &mut dyn SelectionHost,
    ) {
        let Some(press) = self.press.take() else {
            return;
        };

        if let Some(index) = press.node {
            simulation.unpin(index);
            simulation.cool();
        }

        let dragged = press.dragged || (point - press.origin).length() > CLICK_TOLERANCE;
        if !dragged {
            self.click(simulation.graph(), press.node, modifiers, host);
        }
    }

    /// Selection change for a click on `node` (`None` is the background).
    pub fn click(
        &mut self,
        graph: &Graph,
        node: Option<usize>,
        modifiers: Modifiers,
        host: &mut dyn SelectionHost,
    ) {
        match node {
            None => self.selected.clear(),
            Some(index) if modifiers.multi_select => {
                if let Some(position) = self.selected.iter().position(|&i| i == index) {
                    self.selected.remove(position);
                } else {
                    self.selected.push(index);
                }
            }
            Some(index) => {
                if self.selected == [index] {
                    self.selected.clear();
                } else {
                    self.selected = vec![index];
                }
            }
        }

        if self.selected.is_empty() {
            host.clear();
        } else {
            host.select(&self.selected_handles(graph));
        }
    }

    pub fn context_menu(&self, simulation: &Simulation, point: Vec2, host: &mut dyn SelectionHost) {
        let handle = Self::hit_test(simulation, point)
            .and_then(|index| simulation.graph().nodes()[index].selection.first());
        host.show_context_menu(handle, point);
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_handles(&self, graph: &Graph) -> Vec<SelectionHandle> {
        let mut handles = Vec::new();
        for &index in &self.selected {
            let Some(node) = graph.nodes().get(index) else {
                continue;
            };
            for handle in &node.selection {
                if !handles.contains(handle) {
                    handles.push(handle.clone());
                }
            }
        }
        handles
    }

    pub fn dragged_node(&self) -> Option<usize> {
        self.press.and_then(|press| press.node)
    }

    pub fn node_state(&self, index: usize) -> NodeState {
        if self.dragged_node() == Some(index) {
            NodeState::Dragging
        } else if self.selected.contains(&index) {
            NodeState::Selected
        } else if !self.selected.is_empty() {
            NodeState::Dimmed
        } else {
            NodeState::Free
        }
    }
}
