//! Force-directed node-link visual.
//!
//! The host feeds a [`DataView`] plus a flat settings bag into
//! [`Visual::update`]; the visual builds a deduplicated graph, runs a
//! d3-style force layout one [`Visual::tick`] at a time and hands back
//! draw records through [`Visual::frame`].

pub mod config;
pub mod error;
pub mod frame;
pub mod graph;
pub mod host;
pub mod interaction;
pub mod physics;
pub mod util;
pub mod visual;

pub use config::{Settings, SettingsBag};
pub use error::VisualError;
pub use frame::{Frame, FrameRenderer, LinkDraw, NodeDraw};
pub use graph::{DataView, Graph, GraphBuilder, Link, Node, build_graph};
pub use host::{RenderingEvents, SelectionHandle, SelectionHost, VisualHost};
pub use interaction::{InteractionController, Modifiers, NodeState};
pub use physics::{Simulation, Viewport};
pub use visual::{UpdateOptions, Visual};
