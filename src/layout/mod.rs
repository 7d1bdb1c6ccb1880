mod label_placement;
mod projection;

pub use projection::Projection;

use crate::collision_grid::GridStats;
use crate::config::LayoutConfig;
use crate::geom::BoundingBox;
use crate::ir::PointCloud;
use crate::label_params::{LabelKind, LabelRenderParams};
use crate::theme::Theme;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: String,
    pub highlighted: bool,
}

/// Side of its point a label was placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelAnchor {
    Right,
    Left,
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedLabel {
    pub point_index: usize,
    pub text: String,
    pub kind: LabelKind,
    pub anchor: LabelAnchor,
    /// Left edge of the text.
    pub x: f32,
    /// Vertical center of the text.
    pub y: f32,
    pub font_size: f32,
    pub width: f32,
    /// Area reserved in the collision grid, margin included.
    pub bbox: BoundingBox,
    pub fill_color: String,
    pub stroke_color: String,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectReason {
    Collision,
    OutOfBounds,
    OffScreen,
    EmptyText,
    LimitReached,
    /// The entry names a point index the cloud does not have.
    MissingPoint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedLabel {
    pub point_index: usize,
    pub text: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub width: f32,
    pub height: f32,
    pub points: Vec<ScreenPoint>,
    pub placed: Vec<PlacedLabel>,
    pub rejected: Vec<RejectedLabel>,
    pub grid: GridStats,
}

/// Runs one label layout pass: projects the cloud onto the canvas, derives
/// the label priority list from the selection and places labels greedily on
/// a fresh collision grid.
pub fn compute_label_layout(cloud: &PointCloud, theme: &Theme, config: &LayoutConfig) -> LabelLayout {
    let defaults = LayoutConfig::default();
    let width = canvas_side(config.canvas_width, defaults.canvas_width);
    let height = canvas_side(config.canvas_height, defaults.canvas_height);
    let projection = Projection::fit(cloud.extent(), width, height, config.padding);
    let points = project_points(cloud, &projection, theme, config);

    let params = LabelRenderParams::from_selection(cloud, theme, config);
    let result = label_placement::place_labels(&params.entries, &points, width, height, theme, config);

    tracing::debug!(
        points = points.len(),
        candidates = params.len(),
        placed = result.placed.len(),
        rejected = result.rejected.len(),
        occupied_cells = result.grid.occupied_cells,
        "label layout pass finished"
    );

    LabelLayout {
        width,
        height,
        points,
        placed: result.placed,
        rejected: result.rejected,
        grid: result.grid,
    }
}

fn canvas_side(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        return value.max(1.0);
    }
    tracing::warn!(value, fallback, "non-finite canvas size, using default");
    fallback
}

fn project_points(
    cloud: &PointCloud,
    projection: &Projection,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<ScreenPoint> {
    let selection = &cloud.selection;
    let no_selection = selection.is_empty();
    cloud
        .points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let (x, y) = projection.to_screen(point.x, point.y);
            let (color, scale) = if selection.hover == Some(index) {
                (&theme.point_color_hover, config.point_scale_hover)
            } else if selection.checked.contains(&index) {
                (&theme.point_color_checked, config.point_scale_selected)
            } else if selection.query_result.contains(&index) {
                (&theme.point_color_selected, config.point_scale_selected)
            } else if selection.neighbors.contains(&index) {
                (&theme.point_color_unselected, config.point_scale_neighbor)
            } else if no_selection {
                (&theme.point_color_no_selection, config.point_scale_default)
            } else {
                (&theme.point_color_unselected, config.point_scale_default)
            };
            ScreenPoint {
                index,
                x,
                y,
                radius: config.point_radius * scale,
                color: color.clone(),
                highlighted: selection.is_highlighted(index),
            }
        })
        .collect()
}
