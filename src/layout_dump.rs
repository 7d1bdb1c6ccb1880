use crate::collision_grid::GridStats;
use crate::layout::{LabelLayout, PlacedLabel, RejectedLabel};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump<'a> {
    pub width: f32,
    pub height: f32,
    pub points: Vec<PointDump>,
    pub placed: &'a [PlacedLabel],
    pub rejected: &'a [RejectedLabel],
    pub grid: GridStats,
}

#[derive(Debug, Serialize)]
pub struct PointDump {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub highlighted: bool,
}

impl<'a> LayoutDump<'a> {
    pub fn from_layout(layout: &'a LabelLayout) -> Self {
        let points = layout
            .points
            .iter()
            .map(|point| PointDump {
                index: point.index,
                x: point.x,
                y: point.y,
                highlighted: point.highlighted,
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            points,
            placed: &layout.placed,
            rejected: &layout.rejected,
            grid: layout.grid,
        }
    }
}

pub fn layout_dump_json(layout: &LabelLayout) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&LayoutDump::from_layout(layout))?)
}

pub fn write_layout_dump(path: &Path, layout: &LabelLayout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &LayoutDump::from_layout(layout))?;
    Ok(())
}
