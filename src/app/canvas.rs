use constellation::{Frame, Modifiers, Visual};
use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, Vec2};

use super::host::DemoHost;
use super::render_utils::{
    draw_background, parse_color, screen_to_world, with_opacity, world_to_screen,
};

const LABEL_FONT_SIZE: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PointerStep {
    Down,
    Move,
    Up,
}

/// Turns one frame of primary-button input into visual calls. A press and
/// release landing in the same frame still yield both `Down` and `Up`.
fn pointer_steps(held: bool, pressed: bool, released: bool) -> Vec<PointerStep> {
    let mut steps = Vec::with_capacity(2);
    let mut held = held;
    if pressed {
        held = true;
        steps.push(PointerStep::Down);
    }
    if held && released {
        steps.push(PointerStep::Up);
    } else if held && !pressed {
        steps.push(PointerStep::Move);
    }
    steps
}

#[derive(Default)]
pub(super) struct CanvasState {
    size: Option<Vec2>,
    pressed: bool,
}

impl CanvasState {
    pub(super) fn size(&self) -> Option<Vec2> {
        self.size
    }

    pub(super) fn reset(&mut self) {
        self.pressed = false;
    }

    pub(super) fn show(&mut self, ui: &mut Ui, visual: &mut Visual<DemoHost>) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        if self.size != Some(rect.size()) {
            self.size = Some(rect.size());
            visual.resize(rect.width(), rect.height());
        }

        self.handle_pointer(ui, rect, &response, visual);

        if visual.tick() || self.pressed {
            ui.ctx().request_repaint();
        }

        let frame = visual.frame();
        if frame.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "Nothing to draw",
                FontId::proportional(16.0),
                Color32::GRAY,
            );
        }
        paint_frame(&painter, rect, &frame);

        response.context_menu(|ui| {
            let Some(menu) = &visual.host().menu else {
                ui.label("No data point");
                return;
            };
            match &menu.handle {
                Some(handle) => ui.label(format!("Data point {handle}")),
                None => ui.label("Background"),
            };
            ui.label(format!("at ({:.0}, {:.0})", menu.position.x, menu.position.y));
            if ui.button("Close").clicked() {
                ui.close();
            }
        });
    }

    fn handle_pointer(
        &mut self,
        ui: &Ui,
        rect: egui::Rect,
        response: &egui::Response,
        visual: &mut Visual<DemoHost>,
    ) {
        let (pressed, released, pointer, multi_select) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.interact_pos(),
                input.modifiers.command || input.modifiers.shift,
            )
        });
        let Some(pointer) = pointer else {
            return;
        };
        let world = screen_to_world(rect, pointer);

        for step in pointer_steps(self.pressed, pressed && response.hovered(), released) {
            match step {
                PointerStep::Down => {
                    self.pressed = true;
                    visual.pointer_down(world);
                }
                PointerStep::Move => visual.pointer_move(world),
                PointerStep::Up => {
                    self.pressed = false;
                    visual.pointer_up(world, Modifiers { multi_select });
                }
            }
        }

        if response.secondary_clicked() {
            visual.context_menu(world);
        }
    }
}

fn paint_frame(painter: &egui::Painter, rect: egui::Rect, frame: &Frame) {
    for link in &frame.links {
        let color = with_opacity(parse_color(&link.stroke), link.opacity);
        painter.line_segment(
            [world_to_screen(rect, link.from), world_to_screen(rect, link.to)],
            Stroke::new(link.width, color),
        );
    }

    for node in &frame.nodes {
        let center = world_to_screen(rect, node.position);
        painter.circle(
            center,
            node.radius,
            parse_color(&node.fill),
            Stroke::new(node.stroke_width, parse_color(&node.stroke)),
        );
        painter.text(
            world_to_screen(rect, node.label_position),
            Align2::LEFT_BOTTOM,
            &node.label,
            FontId::proportional(LABEL_FONT_SIZE),
            Color32::LIGHT_GRAY,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::PointerStep::{Down, Move, Up};
    use super::pointer_steps;

    #[test]
    fn quick_click_inside_one_frame_releases() {
        assert_eq!(pointer_steps(false, true, true), [Down, Up]);
    }

    #[test]
    fn held_button_moves_until_release() {
        assert_eq!(pointer_steps(false, true, false), [Down]);
        assert_eq!(pointer_steps(true, false, false), [Move]);
        assert_eq!(pointer_steps(true, false, true), [Up]);
    }

    #[test]
    fn stray_release_is_ignored() {
        assert!(pointer_steps(false, false, true).is_empty());
        assert!(pointer_steps(false, false, false).is_empty());
    }
}
