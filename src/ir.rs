use serde::{Deserialize, Serialize};

/// A projected embedding point in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub label: String,
}

/// Which points the user is currently interacting with. All values are
/// indices into [`PointCloud::points`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    #[serde(default)]
    pub hover: Option<usize>,
    #[serde(default)]
    pub checked: Vec<usize>,
    #[serde(default)]
    pub query_result: Vec<usize>,
    #[serde(default)]
    pub neighbors: Vec<usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.hover.is_none()
            && self.checked.is_empty()
            && self.query_result.is_empty()
            && self.neighbors.is_empty()
    }

    /// Points drawn with the highlight color: hovered, checked or matched by
    /// the current query.
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.hover == Some(index)
            || self.checked.contains(&index)
            || self.query_result.contains(&index)
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.hover
            .iter()
            .chain(&self.checked)
            .chain(&self.query_result)
            .chain(&self.neighbors)
            .copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    pub points: Vec<DataPoint>,
    pub selection: Selection,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, x: f32, y: f32, label: impl Into<String>) -> usize {
        self.points.push(DataPoint {
            x,
            y,
            label: label.into(),
        });
        self.points.len() - 1
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// World-space extent `(min_x, min_y, max_x, max_y)` of all points.
    pub fn extent(&self) -> Option<(f32, f32, f32, f32)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(x0, y0, x1, y1), p| {
            (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y))
        }))
    }
}
