#[cfg(feature = "cli")]
pub mod cli;
pub mod collision_grid;
pub mod config;
pub mod geom;
pub mod ir;
pub mod label_params;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use collision_grid::{CollisionGrid, GridError, GridStats, Placement};
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use geom::{BoundingBox, box_height, box_width, boxes_intersect};
pub use ir::{DataPoint, PointCloud, Selection};
pub use layout::{LabelLayout, compute_label_layout};
pub use parser::{ParseError, parse_point_cloud};
pub use render::render_svg;
pub use theme::Theme;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn projector() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
            ..Self::default()
        }
    }
}

/// Parses a point cloud, lays out its labels and returns the SVG.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let cloud = parse_point_cloud(input)?;
    let layout = compute_label_layout(&cloud, &options.theme, &options.layout);
    Ok(render_svg(&layout, &options.theme, &options.layout))
}
