use serde_json::{Map, Value};

pub const DEFAULT_NODE_FILL: &str = "#A0A0A0";
pub const DEFAULT_NODE_STROKE: &str = "#0A0A0A";
pub const DEFAULT_NODE_RADIUS: f32 = 15.0;
pub const DEFAULT_NODE_STROKE_WIDTH: f32 = 2.5;
pub const DEFAULT_LINK_DISTANCE: f32 = 75.0;
pub const DEFAULT_LINK_GRAVITY: f32 = -30.0;
pub const DEFAULT_LINK_STROKE: &str = "#999999";
pub const DEFAULT_LINK_OPACITY_PERCENT: f32 = 60.0;
pub const DEFAULT_LINK_WIDTH: f32 = 10.0;
pub const DEFAULT_SEPARATOR: &str = "<SEPARATOR>";

/// Flat key/value settings as delivered by the host's formatting pane.
pub type SettingsBag = Map<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeSettings {
    pub fill: String,
    pub stroke: String,
    pub radius: f32,
    pub stroke_width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkSettings {
    pub distance: f32,
    /// Many-body strength; negative repels.
    pub gravity: f32,
    pub stroke: String,
    /// Already scaled to `0.0..=1.0`.
    pub opacity: f32,
    pub width: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdvancedSettings {
    pub separator: String,
    pub preserve_layout: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub node: NodeSettings,
    pub link: LinkSettings,
    pub advanced: AdvancedSettings,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            fill: DEFAULT_NODE_FILL.to_owned(),
            stroke: DEFAULT_NODE_STROKE.to_owned(),
            radius: DEFAULT_NODE_RADIUS,
            stroke_width: DEFAULT_NODE_STROKE_WIDTH,
        }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            distance: DEFAULT_LINK_DISTANCE,
            gravity: DEFAULT_LINK_GRAVITY,
            stroke: DEFAULT_LINK_STROKE.to_owned(),
            opacity: DEFAULT_LINK_OPACITY_PERCENT / 100.0,
            width: DEFAULT_LINK_WIDTH,
        }
    }
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            preserve_layout: false,
        }
    }
}

impl Settings {
    pub fn from_bag(bag: &SettingsBag) -> Self {
        Self {
            node: NodeSettings {
                fill: color(bag, "node.defaultFill", DEFAULT_NODE_FILL),
                stroke: color(bag, "node.defaultStroke", DEFAULT_NODE_STROKE),
                radius: positive(bag, "node.defaultRadius", DEFAULT_NODE_RADIUS),
                stroke_width: positive(bag, "node.strokeWidth", DEFAULT_NODE_STROKE_WIDTH),
            },
            link: LinkSettings {
                distance: positive(bag, "link.defaultDistance", DEFAULT_LINK_DISTANCE),
                gravity: non_zero(bag, "link.defaultGravity", DEFAULT_LINK_GRAVITY),
                stroke: color(bag, "link.defaultStroke", DEFAULT_LINK_STROKE),
                opacity: opacity_fraction(number(bag, "link.defaultOpacity")),
                width: positive(bag, "link.defaultWidth", DEFAULT_LINK_WIDTH),
            },
            advanced: AdvancedSettings {
                separator: text(bag, "advanced.separator", DEFAULT_SEPARATOR),
                preserve_layout: bag
                    .get("advanced.preserveLayout")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
        }
    }
}

/// Converts the pane's 0-100 percentage into a stroke opacity.
pub fn opacity_fraction(percent: Option<f32>) -> f32 {
    let percent = percent.unwrap_or(DEFAULT_LINK_OPACITY_PERCENT);
    percent.clamp(0.0, 100.0) / 100.0
}

fn number(bag: &SettingsBag, key: &str) -> Option<f32> {
    let value = match bag.get(key)? {
        Value::Number(number) => number.as_f64()? as f32,
        Value::String(raw) => raw.trim().parse::<f32>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn positive(bag: &SettingsBag, key: &str, default: f32) -> f32 {
    number(bag, key)
        .filter(|value| *value > 0.0)
        .unwrap_or(default)
}

fn non_zero(bag: &SettingsBag, key: &str, default: f32) -> f32 {
    number(bag, key)
        .filter(|value| *value != 0.0)
        .unwrap_or(default)
}

fn text(bag: &SettingsBag, key: &str, default: &str) -> String {
    bag.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .to_owned()
}

fn color(bag: &SettingsBag, key: &str, default: &str) -> String {
    text(bag, key, default).trim().to_owned()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn bag(value: Value) -> SettingsBag {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn empty_bag_yields_component_defaults() {
        let settings = Settings::from_bag(&SettingsBag::new());
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.link.opacity, 0.6);
        assert_eq!(settings.advanced.separator, "<SEPARATOR>");
    }

    #[test]
    fn zero_nan_and_null_numbers_fall_back() {
        let settings = Settings::from_bag(&bag(json!({
            "node.defaultRadius": 0,
            "link.defaultDistance": null,
            "link.defaultGravity": 0,
            "link.defaultWidth": "NaN",
        })));
        assert_eq!(settings.node.radius, DEFAULT_NODE_RADIUS);
        assert_eq!(settings.link.distance, DEFAULT_LINK_DISTANCE);
        assert_eq!(settings.link.gravity, DEFAULT_LINK_GRAVITY);
        assert_eq!(settings.link.width, DEFAULT_LINK_WIDTH);
    }

    #[test]
    fn opacity_is_scaled_and_clamped() {
        assert_eq!(opacity_fraction(Some(0.0)), 0.0);
        assert_eq!(opacity_fraction(Some(100.0)), 1.0);
        assert_eq!(opacity_fraction(Some(250.0)), 1.0);
        assert_eq!(opacity_fraction(Some(-5.0)), 0.0);
        assert_eq!(opacity_fraction(None), 0.6);

        let settings = Settings::from_bag(&bag(json!({ "link.defaultOpacity": 0 })));
        assert_eq!(settings.link.opacity, 0.0);
    }

    #[test]
    fn explicit_values_are_kept() {
        let settings = Settings::from_bag(&bag(json!({
            "node.defaultFill": "#112233",
            "node.defaultRadius": 8,
            "link.defaultGravity": -120.5,
            "advanced.separator": "|",
            "advanced.preserveLayout": true,
        })));
        assert_eq!(settings.node.fill, "#112233");
        assert_eq!(settings.node.radius, 8.0);
        assert_eq!(settings.link.gravity, -120.5);
        assert_eq!(settings.advanced.separator, "|");
        assert!(settings.advanced.preserve_layout);
    }

    #[test]
    fn empty_strings_fall_back() {
        let settings = Settings::from_bag(&bag(json!({
            "node.defaultFill": "",
            "advanced.separator": "",
        })));
        assert_eq!(settings.node.fill, DEFAULT_NODE_FILL);
        assert_eq!(settings.advanced.separator, DEFAULT_SEPARATOR);
    }
}
