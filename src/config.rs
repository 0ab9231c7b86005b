use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Space reserved above the tree for the page header.
    pub header: f32,
    pub vertical_spacing: f32,
    pub horizontal_spacing: f32,
    /// Vertical gap between a person and their partner.
    pub spouse_distance: f32,
    /// Horizontal run from a partner block to its junction.
    pub after_ascendant_spacing: f32,
    /// Horizontal run from a junction to the child blocks.
    pub before_descendant_spacing: f32,
    pub sibling_distance: f32,
    pub line_thickness: f32,
    pub junction_radius: f32,
    /// Upward shift applied to connectors and junctions so they sit on the
    /// text's visual center rather than its hanging baseline.
    pub baseline_offset: f32,
    /// Line height as a multiple of the font size, used by the metrics providers.
    pub line_height: f32,
    pub max_depth: usize,
    /// Use the calibrated character table instead of loading system fonts.
    pub fast_text_metrics: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header: 78.0,
            vertical_spacing: 16.0,
            horizontal_spacing: 16.0,
            spouse_distance: 16.0,
            after_ascendant_spacing: 20.0,
            before_descendant_spacing: 20.0,
            sibling_distance: 0.0,
            line_thickness: 0.8,
            junction_radius: 3.0,
            baseline_offset: 3.0,
            line_height: 1.15,
            max_depth: 512,
            fast_text_metrics: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Viewport width reported by the hosting surface.
    pub width: f32,
    /// Viewport height reported by the hosting surface.
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    text_color: Option<String>,
    line_color: Option<String>,
    hover_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    header: Option<f32>,
    vertical_spacing: Option<f32>,
    horizontal_spacing: Option<f32>,
    spouse_distance: Option<f32>,
    after_ascendant_spacing: Option<f32>,
    before_descendant_spacing: Option<f32>,
    sibling_distance: Option<f32>,
    line_thickness: Option<f32>,
    junction_radius: Option<f32>,
    baseline_offset: Option<f32>,
    line_height: Option<f32>,
    max_depth: Option<usize>,
    fast_text_metrics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    render: Option<RenderConfigFile>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a JSON5 config document and overlays it on the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" => config.theme = Theme::classic(),
            other => log::warn!(theme = other; "Unknown theme, keeping default"),
        }
        config.render.background = config.theme.background.clone();
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.hover_color {
            config.theme.hover_color = v;
        }
        if let Some(v) = vars.background {
            config.render.background = v.clone();
            config.theme.background = v;
        }
    }

    if let Some(layout) = parsed.layout {
        let target = &mut config.layout;
        let overlay = [
            (layout.header, &mut target.header),
            (layout.vertical_spacing, &mut target.vertical_spacing),
            (layout.horizontal_spacing, &mut target.horizontal_spacing),
            (layout.spouse_distance, &mut target.spouse_distance),
            (layout.after_ascendant_spacing, &mut target.after_ascendant_spacing),
            (layout.before_descendant_spacing, &mut target.before_descendant_spacing),
            (layout.sibling_distance, &mut target.sibling_distance),
            (layout.line_thickness, &mut target.line_thickness),
            (layout.junction_radius, &mut target.junction_radius),
            (layout.baseline_offset, &mut target.baseline_offset),
            (layout.line_height, &mut target.line_height),
        ];
        for (value, slot) in overlay {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(v) = layout.max_depth {
            target.max_depth = v;
        }
        if let Some(v) = layout.fast_text_metrics {
            target.fast_text_metrics = v;
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.width {
            config.render.width = v;
        }
        if let Some(v) = render.height {
            config.render.height = v;
        }
        if let Some(v) = render.background {
            config.render.background = v;
        }
    }

    Ok(config)
}
