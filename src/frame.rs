use eframe::egui::Vec2;

use crate::config::Settings;
use crate::interaction::{InteractionController, NodeState};
use crate::physics::{Simulation, Viewport};
use crate::util::dim_color;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeDraw {
    pub label: String,
    pub position: Vec2,
    pub radius: f32,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f32,
    /// Anchor of the label text, up and to the right of the circle.
    pub label_position: Vec2,
    pub state: NodeState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkDraw {
    pub key: String,
    pub from: Vec2,
    pub to: Vec2,
    pub stroke: String,
    pub opacity: f32,
    pub width: f32,
}

/// Draw records for one tick, links first so nodes paint on top.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub links: Vec<LinkDraw>,
    pub nodes: Vec<NodeDraw>,
}

impl Frame {
    pub fn node(&self, label: &str) -> Option<&NodeDraw> {
        self.nodes.iter().find(|node| node.label == label)
    }
}

/// Projects the live simulation state into draw records.
pub struct FrameRenderer<'a> {
    settings: &'a Settings,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    pub fn project(&self, simulation: &Simulation, interaction: &InteractionController) -> Frame {
        let graph = simulation.graph();
        let viewport = simulation.viewport();
        let node_settings = &self.settings.node;
        let link_settings = &self.settings.link;

        let positions = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| viewport.clamp_point(node.position, simulation.radius(index)))
            .collect::<Vec<_>>();

        let links = graph
            .links()
            .iter()
            .map(|link| LinkDraw {
                key: link.key.clone(),
                from: positions[link.source],
                to: positions[link.target],
                stroke: link
                    .color
                    .clone()
                    .unwrap_or_else(|| link_settings.stroke.clone()),
                opacity: link_settings.opacity.clamp(0.0, 1.0),
                width: link_settings.width,
            })
            .collect();

        let nodes = graph
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let radius = simulation.radius(index);
                let position = positions[index];
                let state = interaction.node_state(index);
                let fill = node.resolved_fill(node_settings);
                let stroke = node_settings.stroke.as_str();
                let (fill, stroke) = if state == NodeState::Dimmed {
                    (dim_color(fill), dim_color(stroke))
                } else {
                    (fill.to_owned(), stroke.to_owned())
                };

                NodeDraw {
                    label: node.label.clone(),
                    position,
                    radius,
                    fill,
                    stroke,
                    stroke_width: node_settings.stroke_width,
                    label_position: position + Vec2::new(radius, -radius),
                    state,
                }
            })
            .collect();

        Frame {
            viewport,
            links,
            nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;
    use serde_json::json;

    use super::*;
    use crate::graph::{DataView, build_graph};
    use crate::host::{SelectionHandle, SelectionHost};
    use crate::interaction::Modifiers;

    struct NullHost;

    impl SelectionHost for NullHost {
        fn select(&mut self, _handles: &[SelectionHandle]) {}
        fn clear(&mut self) {}
        fn show_context_menu(&mut self, _handle: Option<&SelectionHandle>, _position: Vec2) {}
    }

    fn setup(settings: &Settings) -> Simulation {
        let data: DataView = serde_json::from_value(json!({
            "table": {
                "columns": [
                    { "roles": { "source_node": true } },
                    { "roles": { "target_node": true } },
                    { "roles": { "source_fill": true } },
                    { "roles": { "link_color": true } },
                ],
                "rows": [["A", "B", "#112233", "#ff0000"], ["B", "C", null, null]],
            }
        }))
        .expect("data view");
        let graph = build_graph(&data, settings).expect("graph");
        Simulation::start(graph, settings, Viewport::new(400.0, 300.0))
    }

    #[test]
    fn links_track_live_endpoints() {
        let settings = Settings::default();
        let mut simulation = setup(&settings);
        let controller = InteractionController::new();

        for _ in 0..5 {
            simulation.tick();
            let frame = FrameRenderer::new(&settings).project(&simulation, &controller);
            for (link, draw) in simulation.graph().links().iter().zip(&frame.links) {
                assert_eq!(draw.from, simulation.graph().nodes()[link.source].position);
                assert_eq!(draw.to, simulation.graph().nodes()[link.target].position);
            }
        }
    }

    #[test]
    fn styles_fall_back_to_settings() {
        let settings = Settings::default();
        let simulation = setup(&settings);
        let frame = FrameRenderer::new(&settings).project(&simulation, &InteractionController::new());

        assert_eq!(frame.node("A").map(|n| n.fill.as_str()), Some("#112233"));
        assert_eq!(frame.node("B").map(|n| n.fill.as_str()), Some("#A0A0A0"));
        assert_eq!(frame.links[0].stroke, "#ff0000");
        assert_eq!(frame.links[1].stroke, "#999999");
        assert_eq!(frame.links[1].opacity, 0.6);
        assert_eq!(frame.links[1].width, 10.0);

        let a = frame.node("A").expect("A");
        assert_eq!(a.label_position, a.position + vec2(15.0, -15.0));
        assert_eq!(frame.viewport, Viewport::new(400.0, 300.0));
    }

    #[test]
    fn selection_dims_other_nodes_and_clearing_restores() {
        let settings = Settings::default();
        let simulation = setup(&settings);
        let mut controller = InteractionController::new();
        controller.click(simulation.graph(), Some(1), Modifiers::default(), &mut NullHost);

        let frame = FrameRenderer::new(&settings).project(&simulation, &controller);
        assert_eq!(frame.node("B").map(|n| n.fill.as_str()), Some("#A0A0A0"));
        assert_eq!(frame.node("A").map(|n| n.fill.as_str()), Some("#11223366"));
        assert_eq!(frame.node("C").map(|n| n.stroke.as_str()), Some("#0A0A0A66"));

        controller.click(simulation.graph(), None, Modifiers::default(), &mut NullHost);
        let frame = FrameRenderer::new(&settings).project(&simulation, &controller);
        assert!(frame.nodes.iter().all(|node| !node.fill.ends_with("66")));
    }
}
