// Greedy label placement over a collision grid.
// Labels are tried in priority order; each one is test-inserted first and
// committed only when its box is free, so earlier labels always keep their spot.

use super::{LabelAnchor, PlacedLabel, RejectReason, RejectedLabel, ScreenPoint};
use crate::collision_grid::{CollisionGrid, GridStats, Placement};
use crate::config::{LayoutConfig, MAX_GRID_DIVISIONS};
use crate::geom::BoundingBox;
use crate::label_params::LabelRenderEntry;
use crate::text_metrics::label_text_width;
use crate::theme::Theme;

const RIGHT_ONLY: [LabelAnchor; 1] = [LabelAnchor::Right];
const ALL_ANCHORS: [LabelAnchor; 4] = [
    LabelAnchor::Right,
    LabelAnchor::Left,
    LabelAnchor::Above,
    LabelAnchor::Below,
];

pub(crate) struct PlacementResult {
    pub placed: Vec<PlacedLabel>,
    pub rejected: Vec<RejectedLabel>,
    pub grid: GridStats,
}

/// Grid over the whole canvas, `grid_columns` x `grid_rows` cells.
/// Divisions are clamped to `1..=MAX_GRID_DIVISIONS` and a non-finite side
/// shrinks to one pixel, so the grid always builds.
pub(crate) fn canvas_grid(width: f32, height: f32, config: &LayoutConfig) -> CollisionGrid {
    let side = |value: f32| if value.is_finite() { value.max(1.0) } else { 1.0 };
    let width = side(width);
    let height = side(height);
    let cell_width = width / config.grid_columns.clamp(1, MAX_GRID_DIVISIONS) as f32;
    let cell_height = height / config.grid_rows.clamp(1, MAX_GRID_DIVISIONS) as f32;
    CollisionGrid::new(BoundingBox::new(0.0, 0.0, width, height), cell_width, cell_height)
}

pub(crate) fn place_labels(
    entries: &[LabelRenderEntry],
    points: &[ScreenPoint],
    width: f32,
    height: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> PlacementResult {
    let mut grid = canvas_grid(width, height, config);
    let mut placed = Vec::new();
    let mut rejected = Vec::new();
    let anchors: &[LabelAnchor] = if config.alternate_anchors {
        &ALL_ANCHORS
    } else {
        &RIGHT_ONLY
    };
    let dpr = config.device_pixel_ratio.max(0.0);
    let margin = config.label_margin * dpr;

    for entry in entries {
        let reject = |reason| RejectedLabel {
            point_index: entry.point_index,
            text: entry.text.clone(),
            reason,
        };
        if placed.len() >= config.max_labels_on_screen {
            rejected.push(reject(RejectReason::LimitReached));
            continue;
        }
        if entry.text.trim().is_empty() {
            rejected.push(reject(RejectReason::EmptyText));
            continue;
        }
        let Some(point) = points.get(entry.point_index) else {
            rejected.push(reject(RejectReason::MissingPoint));
            continue;
        };
        if point.x < 0.0 || point.x > width || point.y < 0.0 || point.y > height {
            rejected.push(reject(RejectReason::OffScreen));
            continue;
        }

        let font_size = theme.font_size * entry.scale * dpr;
        let text_width = label_text_width(&entry.text, font_size, &theme.font_family, config.fast_text);
        let offset = point.radius + margin;

        let mut outcome = Placement::OutOfBounds;
        for &anchor in anchors {
            let (x, y) = anchor_origin(anchor, point, offset, text_width, font_size);
            let bbox = BoundingBox::new(
                x - margin,
                y - font_size / 2.0 - margin,
                x + 1.0 + text_width + margin,
                y + font_size / 2.0 + margin,
            );
            // Test first so a refused label never touches the grid.
            outcome = grid.place(bbox, true);
            if !outcome.is_accepted() {
                continue;
            }
            grid.place(bbox, false);
            placed.push(PlacedLabel {
                point_index: entry.point_index,
                text: entry.text.clone(),
                kind: entry.kind,
                anchor,
                x,
                y,
                font_size,
                width: text_width,
                bbox,
                fill_color: entry.fill_color.clone(),
                stroke_color: entry.stroke_color.clone(),
                opacity: if entry.fade { config.label_fade_opacity } else { 1.0 },
            });
            break;
        }

        if !outcome.is_accepted() {
            let reason = match outcome {
                Placement::OutOfBounds => RejectReason::OutOfBounds,
                _ => RejectReason::Collision,
            };
            tracing::trace!(point = entry.point_index, text = %entry.text, ?reason, "label rejected");
            rejected.push(reject(reason));
        }
    }

    PlacementResult {
        placed,
        rejected,
        grid: grid.stats(),
    }
}

/// Text origin (left edge, vertical center) for a label at `anchor`.
fn anchor_origin(
    anchor: LabelAnchor,
    point: &ScreenPoint,
    offset: f32,
    text_width: f32,
    font_size: f32,
) -> (f32, f32) {
    match anchor {
        LabelAnchor::Right => (point.x + offset, point.y),
        LabelAnchor::Left => (point.x - offset - 1.0 - text_width, point.y),
        LabelAnchor::Above => (
            point.x - (text_width + 1.0) / 2.0,
            point.y - offset - font_size / 2.0,
        ),
        LabelAnchor::Below => (
            point.x - (text_width + 1.0) / 2.0,
            point.y + offset + font_size / 2.0,
        ),
    }
}
