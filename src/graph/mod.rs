//! Deduplicated node/link graph rebuilt on every update cycle.
//!
//! Nodes and links are stored in insertion order; string keys resolve to
//! indices only through the lookup maps. Links always hold resolved node
//! indices, never labels.

mod build;
mod input;

use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::config::NodeSettings;
use crate::host::SelectionHandle;

pub use build::{GraphBuilder, build_graph};
pub use input::{CategoricalInput, CategoryColumn, Column, DataView, TableInput, ValueGroup};

#[derive(Clone, Debug)]
pub struct Node {
    pub label: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position; while set the simulation does not move the node.
    pub pin: Option<Vec2>,
    /// Per-row override; `None` renders with the configured default.
    pub fill: Option<String>,
    pub radius: Option<f32>,
    pub selection: Vec<SelectionHandle>,
}

impl Node {
    pub fn new(label: String) -> Self {
        Self {
            label,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
            fill: None,
            radius: None,
            selection: Vec::new(),
        }
    }

    pub fn resolved_radius(&self, defaults: &NodeSettings) -> f32 {
        self.radius.unwrap_or(defaults.radius)
    }

    pub fn resolved_fill<'a>(&'a self, defaults: &'a NodeSettings) -> &'a str {
        self.fill.as_deref().unwrap_or(&defaults.fill)
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct Link {
    pub key: String,
    pub source: usize,
    pub target: usize,
    /// Rest length override; `None` uses the configured default.
    pub distance: Option<f32>,
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    node_index: HashMap<String, usize>,
    links: Vec<Link>,
    link_index: HashMap<String, usize>,
}

impl Graph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn nodes_and_links_mut(&mut self) -> (&mut [Node], &[Link]) {
        (&mut self.nodes, &self.links)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.node_index.get(label).copied()
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.index_of(label).map(|index| &self.nodes[index])
    }

    pub fn link(&self, key: &str) -> Option<&Link> {
        self.link_index.get(key).map(|&index| &self.links[index])
    }

    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0usize; self.nodes.len()];
        for link in &self.links {
            degrees[link.source] += 1;
            degrees[link.target] += 1;
        }
        degrees
    }

    fn insert_node(&mut self, node: Node) -> usize {
        let index = self.nodes.len();
        self.node_index.insert(node.label.clone(), index);
        self.nodes.push(node);
        index
    }

    fn insert_link(&mut self, link: Link) -> usize {
        let index = self.links.len();
        self.link_index.insert(link.key.clone(), index);
        self.links.push(link);
        index
    }
}
