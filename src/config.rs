use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper limit for `grid_columns` and `grid_rows`.
pub const MAX_GRID_DIVISIONS: u32 = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    /// Blank border kept between the data extent and the canvas edge.
    pub padding: f32,
    pub device_pixel_ratio: f32,
    /// The collision grid splits the canvas into this many columns...
    pub grid_columns: u32,
    /// ...and this many rows.
    pub grid_rows: u32,
    pub max_labels_on_screen: usize,
    pub label_margin: f32,
    pub label_stroke_width: f32,
    pub label_scale_default: f32,
    pub label_scale_large: f32,
    /// Opacity of labels whose opacity flag is set.
    pub label_fade_opacity: f32,
    pub point_radius: f32,
    pub point_scale_default: f32,
    pub point_scale_selected: f32,
    pub point_scale_neighbor: f32,
    pub point_scale_hover: f32,
    /// Try left, above and below when the right-hand spot is taken.
    pub alternate_anchors: bool,
    /// Append every unselected point after the selection-driven labels.
    pub label_all_points: bool,
    /// Skip font lookup and use the average-advance estimate.
    pub fast_text: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            padding: 24.0,
            device_pixel_ratio: 1.0,
            grid_columns: 25,
            grid_rows: 50,
            max_labels_on_screen: 10_000,
            label_margin: 2.0,
            label_stroke_width: 3.0,
            label_scale_default: 1.0,
            label_scale_large: 2.0,
            label_fade_opacity: 0.7,
            point_radius: 2.5,
            point_scale_default: 1.2,
            point_scale_selected: 2.0,
            point_scale_neighbor: 1.2,
            point_scale_hover: 2.5,
            alternate_anchors: false,
            label_all_points: false,
            fast_text: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
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

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::projector();
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

impl Config {
    /// Resizes both the layout canvas and the rendered output.
    pub fn set_canvas_size(&mut self, width: f32, height: f32) {
        self.layout.canvas_width = width;
        self.layout.canvas_height = height;
        self.render.width = width;
        self.render.height = height;
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    point_color_no_selection: Option<String>,
    point_color_unselected: Option<String>,
    point_color_selected: Option<String>,
    point_color_checked: Option<String>,
    point_color_hover: Option<String>,
    label_fill_hover: Option<String>,
    label_stroke_hover: Option<String>,
    label_fill_checked: Option<String>,
    label_stroke_checked: Option<String>,
    label_fill_selected: Option<String>,
    label_stroke_selected: Option<String>,
    label_fill_neighbor: Option<String>,
    label_stroke_neighbor: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<f32>,
    device_pixel_ratio: Option<f32>,
    grid_columns: Option<u32>,
    grid_rows: Option<u32>,
    max_labels_on_screen: Option<usize>,
    label_margin: Option<f32>,
    label_stroke_width: Option<f32>,
    label_scale_default: Option<f32>,
    label_scale_large: Option<f32>,
    label_fade_opacity: Option<f32>,
    point_radius: Option<f32>,
    alternate_anchors: Option<bool>,
    label_all_points: Option<bool>,
    fast_text: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    let config = parse_config(&contents)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        apply_theme_variables(&mut config.theme, vars);
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        apply_layout_overrides(&mut config.layout, layout)?;
    }

    let width = parsed.width.unwrap_or(config.layout.canvas_width);
    let height = parsed.height.unwrap_or(config.layout.canvas_height);
    check_canvas_size(width, height)?;
    config.set_canvas_size(width, height);

    Ok(config)
}

/// Canvas sides must be positive and finite.
pub fn check_canvas_size(width: f32, height: f32) -> anyhow::Result<()> {
    let valid = |side: f32| side.is_finite() && side > 0.0;
    if !(valid(width) && valid(height)) {
        anyhow::bail!("canvas size must be positive and finite, got {width} x {height}");
    }
    Ok(())
}

fn apply_theme_variables(theme: &mut Theme, vars: ThemeVariables) {
    let colors = [
        (vars.background, &mut theme.background),
        (vars.point_color_no_selection, &mut theme.point_color_no_selection),
        (vars.point_color_unselected, &mut theme.point_color_unselected),
        (vars.point_color_selected, &mut theme.point_color_selected),
        (vars.point_color_checked, &mut theme.point_color_checked),
        (vars.point_color_hover, &mut theme.point_color_hover),
        (vars.label_fill_hover, &mut theme.label_fill_hover),
        (vars.label_stroke_hover, &mut theme.label_stroke_hover),
        (vars.label_fill_checked, &mut theme.label_fill_checked),
        (vars.label_stroke_checked, &mut theme.label_stroke_checked),
        (vars.label_fill_selected, &mut theme.label_fill_selected),
        (vars.label_stroke_selected, &mut theme.label_stroke_selected),
        (vars.label_fill_neighbor, &mut theme.label_fill_neighbor),
        (vars.label_stroke_neighbor, &mut theme.label_stroke_neighbor),
    ];
    for (value, slot) in colors {
        if let Some(value) = value {
            *slot = value;
        }
    }
    if let Some(v) = vars.font_family {
        theme.font_family = v;
    }
    if let Some(v) = vars.font_size {
        theme.font_size = v;
    }
}

fn apply_layout_overrides(layout: &mut LayoutConfig, file: LayoutConfigFile) -> anyhow::Result<()> {
    if let Some(v) = file.grid_columns {
        layout.grid_columns = v;
    }
    if let Some(v) = file.grid_rows {
        layout.grid_rows = v;
    }
    if layout.grid_columns == 0 || layout.grid_rows == 0 {
        anyhow::bail!(
            "grid must have at least one column and one row, got {} x {}",
            layout.grid_columns,
            layout.grid_rows
        );
    }
    if layout.grid_columns > MAX_GRID_DIVISIONS || layout.grid_rows > MAX_GRID_DIVISIONS {
        anyhow::bail!(
            "grid may have at most {MAX_GRID_DIVISIONS} columns and rows, got {} x {}",
            layout.grid_columns,
            layout.grid_rows
        );
    }
    if let Some(v) = file.padding {
        layout.padding = v.max(0.0);
    }
    if let Some(v) = file.device_pixel_ratio {
        layout.device_pixel_ratio = v;
    }
    if let Some(v) = file.max_labels_on_screen {
        layout.max_labels_on_screen = v;
    }
    if let Some(v) = file.label_margin {
        layout.label_margin = v;
    }
    if let Some(v) = file.label_stroke_width {
        layout.label_stroke_width = v;
    }
    if let Some(v) = file.label_scale_default {
        layout.label_scale_default = v;
    }
    if let Some(v) = file.label_scale_large {
        layout.label_scale_large = v;
    }
    if let Some(v) = file.label_fade_opacity {
        layout.label_fade_opacity = v.clamp(0.0, 1.0);
    }
    if let Some(v) = file.point_radius {
        layout.point_radius = v;
    }
    if let Some(v) = file.alternate_anchors {
        layout.alternate_anchors = v;
    }
    if let Some(v) = file.label_all_points {
        layout.label_all_points = v;
    }
    if let Some(v) = file.fast_text {
        layout.fast_text = v;
    }
    Ok(())
}
