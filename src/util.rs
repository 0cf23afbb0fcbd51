use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};
use serde_json::Value;

const INITIAL_RADIUS: f32 = 10.0;
const DIMMED_ALPHA_SUFFIX: &str = "66";

/// Phyllotaxis seed position for the node at `index`.
pub fn seed_position(index: usize) -> Vec2 {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
    let angle = index as f32 * golden_angle;
    vec2(radius * angle.cos(), radius * angle.sin())
}

pub fn jiggle_direction(from: usize, to: usize) -> Vec2 {
    let angle = ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// JavaScript-style truthiness of a data cell.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerces a cell to a node label. `None` only for null.
pub fn cell_label(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

pub fn cell_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

pub fn cell_number(value: &Value) -> Option<f32> {
    let number = match value {
        Value::Number(number) => number.as_f64()? as f32,
        Value::String(text) => text.trim().parse::<f32>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Reduced-opacity variant of a `#rgb` / `#rrggbb` / `#rrggbbaa` color.
///
/// Non-hex colors are returned unchanged.
pub fn dim_color(color: &str) -> String {
    let Some(hex) = color.strip_prefix('#') else {
        return color.to_owned();
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return color.to_owned();
    }

    match hex.len() {
        3 => {
            let expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
            format!("#{expanded}{DIMMED_ALPHA_SUFFIX}")
        }
        6 => format!("#{hex}{DIMMED_ALPHA_SUFFIX}"),
        8 => format!("#{}{DIMMED_ALPHA_SUFFIX}", &hex[..6]),
        _ => color.to_owned(),
    }
}
