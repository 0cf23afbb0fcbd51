use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

const GRID_STEP: f32 = 56.0;

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
    let origin = rect.center();

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(GRID_STEP);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
        x += GRID_STEP;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(GRID_STEP);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
        y += GRID_STEP;
    }
}

pub(super) fn world_to_screen(rect: Rect, world: Vec2) -> Pos2 {
    rect.center() + world
}

pub(super) fn screen_to_world(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.center()
}

/// Parses `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`; anything else paints gray.
pub(super) fn parse_color(color: &str) -> Color32 {
    Color32::from_hex(color.trim()).unwrap_or(Color32::GRAY)
}

pub(super) fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn parses_dimmed_colors() {
        assert_eq!(parse_color("#A0A0A0"), Color32::from_rgb(0xA0, 0xA0, 0xA0));
        assert_eq!(
            parse_color("#A0A0A066"),
            Color32::from_rgba_unmultiplied(0xA0, 0xA0, 0xA0, 0x66)
        );
        assert_eq!(parse_color("steelblue"), Color32::GRAY);
    }

    #[test]
    fn screen_mapping_round_trips_through_center() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(200.0, 100.0));
        assert_eq!(world_to_screen(rect, Vec2::ZERO), pos2(110.0, 70.0));
        assert_eq!(screen_to_world(rect, pos2(130.0, 60.0)), vec2(20.0, -10.0));
    }
}
