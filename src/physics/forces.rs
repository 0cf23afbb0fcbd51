use eframe::egui::Vec2;

use crate::graph::{Link, Node};
use crate::util::jiggle_direction;

use super::quadtree::QuadNode;

const JIGGLE: f32 = 1e-6;
const DISTANCE_MIN_SQ: f32 = 1.0;

#[derive(Clone, Copy)]
pub(super) struct LinkForce<'a> {
    pub(super) links: &'a [Link],
    pub(super) degrees: &'a [usize],
    pub(super) default_distance: f32,
}

/// Spring force towards each link's rest length, applied to velocities.
pub(super) fn apply_link_force(nodes: &mut [Node], force: LinkForce<'_>, alpha: f32) {
    for (link_index, link) in force.links.iter().enumerate() {
        let (source, target) = (link.source, link.target);
        let source_pinned = nodes[source].is_pinned();
        let target_pinned = nodes[target].is_pinned();
        if source_pinned && target_pinned {
            continue;
        }

        let mut delta = (nodes[target].position + nodes[target].velocity)
            - (nodes[source].position + nodes[source].velocity);
        if delta.length_sq() == 0.0 {
            delta = jiggle_direction(link_index, source) * JIGGLE;
        }
        let length = delta.length();
        let rest = link.distance.unwrap_or(force.default_distance);

        let source_degree = force.degrees[source].max(1) as f32;
        let target_degree = force.degrees[target].max(1) as f32;
        let strength = 1.0 / source_degree.min(target_degree);
        let correction = delta * ((length - rest) / length * alpha * strength);

        let target_share = if source_pinned {
            1.0
        } else if target_pinned {
            0.0
        } else {
            source_degree / (source_degree + target_degree)
        };

        nodes[target].velocity -= correction * target_share;
        nodes[source].velocity += correction * (1.0 - target_share);
    }
}

/// Barnes-Hut many-body force. Negative `strength` repels.
pub(super) fn apply_many_body_force(
    nodes: &mut [Node],
    positions: &[Vec2],
    strength: f32,
    theta: f32,
    alpha: f32,
) {
    let Some(quadtree) = QuadNode::build(positions) else {
        return;
    };

    let scaled = strength * alpha;
    let theta_sq = theta * theta;
    for (index, node) in nodes.iter_mut().enumerate() {
        let mut force = Vec2::ZERO;
        accumulate_many_body_for_node(&quadtree, index, positions, scaled, theta_sq, &mut force);
        node.velocity += force;
    }
}

fn pair_force(delta: Vec2, weight: f32, scaled_strength: f32) -> Vec2 {
    let mut distance_sq = delta.length_sq();
    if distance_sq < DISTANCE_MIN_SQ {
        distance_sq = (DISTANCE_MIN_SQ * distance_sq).sqrt();
    }
    delta * (scaled_strength * weight / distance_sq)
}

fn accumulate_many_body_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    scaled_strength: f32,
    theta_sq: f32,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            let mut delta = positions[other_index] - point;
            if delta.length_sq() == 0.0 {
                delta = jiggle_direction(index, other_index) * JIGGLE;
            }
            *force += pair_force(delta, 1.0, scaled_strength);
        }
        return;
    }

    let delta = node.center_of_mass - point;
    let side = node.bounds.side_length();
    let can_approximate = !node.bounds.contains(point)
        && (side * side) / theta_sq < delta.length_sq()
        && node.mass > 1.0;

    if can_approximate {
        *force += pair_force(delta, node.mass, scaled_strength);
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_many_body_for_node(child, index, positions, scaled_strength, theta_sq, force);
    }
}
