use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{LabelLayout, PlacedLabel, ScreenPoint};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

pub fn render_svg(layout: &LabelLayout, theme: &Theme, config: &LayoutConfig) -> String {
    let width = layout.width;
    let height = layout.height;
    let mut svg = String::new();

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    );

    // Highlighted points are drawn last so they sit on top.
    svg.push_str("<g class=\"points\">");
    for point in layout.points.iter().filter(|p| !p.highlighted) {
        svg.push_str(&point_svg(point));
    }
    for point in layout.points.iter().filter(|p| p.highlighted) {
        svg.push_str(&point_svg(point));
    }
    svg.push_str("</g>");

    svg.push_str("<g class=\"labels\">");
    for label in &layout.placed {
        svg.push_str(&label_svg(label, theme, config));
    }
    svg.push_str("</g>");

    svg.push_str("</svg>");
    svg
}

fn point_svg(point: &ScreenPoint) -> String {
    format!(
        "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\"/>",
        point.x, point.y, point.radius, point.color
    )
}

fn label_svg(label: &PlacedLabel, theme: &Theme, config: &LayoutConfig) -> String {
    let stroke_width = config.label_stroke_width * config.device_pixel_ratio;
    let mut text = format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{:.2}\" stroke-linejoin=\"round\" paint-order=\"stroke\"",
        label.x,
        label.y,
        escape_xml(&theme.font_family),
        label.font_size,
        label.fill_color,
        label.stroke_color,
        stroke_width,
    );
    if label.opacity < 1.0 {
        let _ = write!(text, " opacity=\"{:.2}\"", label.opacity);
    }
    let _ = write!(text, ">{}</text>", escape_xml(&label.text));
    text
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    if let Some(family) = theme.font_family.split(',').next() {
        opt.font_family = family.trim().trim_matches('"').to_string();
    }
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .ok_or_else(|| anyhow::anyhow!("invalid output size {} x {}", render_cfg.width, render_cfg.height))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
