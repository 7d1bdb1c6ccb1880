// Which labels to draw and in what order.
// Entries are emitted most important first: the hovered point, then checked
// points, then query results that are not checked, then neighbors of the
// first selected point. The layout pass places them in this order, so an
// earlier entry always wins a contested spot.

use crate::config::LayoutConfig;
use crate::ir::PointCloud;
use crate::theme::Theme;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LabelKind {
    Hover,
    Checked,
    Selected,
    Neighbor,
    Unselected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelRenderEntry {
    pub point_index: usize,
    pub text: String,
    pub kind: LabelKind,
    pub scale: f32,
    /// `false` draws the label fully opaque.
    pub fade: bool,
    pub fill_color: String,
    pub stroke_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LabelRenderParams {
    pub entries: Vec<LabelRenderEntry>,
}

impl LabelRenderParams {
    pub fn from_selection(cloud: &PointCloud, theme: &Theme, config: &LayoutConfig) -> Self {
        let selection = &cloud.selection;
        let mut params = Self::default();
        let large = config.label_scale_large;

        if let Some(hover) = selection.hover {
            params.push(cloud, hover, LabelKind::Hover, large, false, theme);
        }

        let fade_checked = selection.checked.len() != 1;
        for &index in &selection.checked {
            params.push(cloud, index, LabelKind::Checked, large, fade_checked, theme);
        }

        let selected: Vec<usize> = selection
            .query_result
            .iter()
            .copied()
            .filter(|index| !selection.checked.contains(index))
            .collect();
        let fade_selected = selected.len() != 1;
        for index in selected {
            params.push(cloud, index, LabelKind::Selected, large, fade_selected, theme);
        }

        for &index in &selection.neighbors {
            params.push(cloud, index, LabelKind::Neighbor, large, true, theme);
        }

        if config.label_all_points {
            let mut labeled = vec![false; cloud.points.len()];
            for index in selection.indices() {
                if let Some(slot) = labeled.get_mut(index) {
                    *slot = true;
                }
            }
            for index in (0..cloud.points.len()).filter(|&index| !labeled[index]) {
                params.push(
                    cloud,
                    index,
                    LabelKind::Unselected,
                    config.label_scale_default,
                    true,
                    theme,
                );
            }
        }

        params
    }

    fn push(
        &mut self,
        cloud: &PointCloud,
        point_index: usize,
        kind: LabelKind,
        scale: f32,
        fade: bool,
        theme: &Theme,
    ) {
        let Some(point) = cloud.points.get(point_index) else {
            return;
        };
        let (fill, stroke) = match kind {
            LabelKind::Hover => (&theme.label_fill_hover, &theme.label_stroke_hover),
            LabelKind::Checked => (&theme.label_fill_checked, &theme.label_stroke_checked),
            LabelKind::Selected => (&theme.label_fill_selected, &theme.label_stroke_selected),
            LabelKind::Neighbor | LabelKind::Unselected => {
                (&theme.label_fill_neighbor, &theme.label_stroke_neighbor)
            }
        };
        self.entries.push(LabelRenderEntry {
            point_index,
            text: point.label.clone(),
            kind,
            scale,
            fade,
            fill_color: fill.clone(),
            stroke_color: stroke.clone(),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Selection;

    fn cloud_with(selection: Selection) -> PointCloud {
        let mut cloud = PointCloud::new();
        for i in 0..6 {
            cloud.push(i as f32, 0.0, format!("p{i}"));
        }
        cloud.selection = selection;
        cloud
    }

    fn order(params: &LabelRenderParams) -> Vec<(usize, LabelKind)> {
        params.entries.iter().map(|e| (e.point_index, e.kind)).collect()
    }

    #[test]
    fn priority_order_follows_selection_groups() {
        let cloud = cloud_with(Selection {
            hover: Some(5),
            checked: vec![2],
            query_result: vec![1, 2, 3],
            neighbors: vec![4, 0],
        });
        let params =
            LabelRenderParams::from_selection(&cloud, &Theme::projector(), &LayoutConfig::default());
        assert_eq!(
            order(&params),
            vec![
                (5, LabelKind::Hover),
                (2, LabelKind::Checked),
                (1, LabelKind::Selected),
                (3, LabelKind::Selected),
                (4, LabelKind::Neighbor),
                (0, LabelKind::Neighbor),
            ]
        );
        assert_eq!(params.entries[0].text, "p5");
        assert!(params.entries.iter().all(|e| e.scale == 2.0));
    }

    #[test]
    fn single_member_groups_are_opaque() {
        let cloud = cloud_with(Selection {
            hover: Some(0),
            checked: vec![1],
            query_result: vec![2, 3],
            neighbors: vec![4],
        });
        let params =
            LabelRenderParams::from_selection(&cloud, &Theme::projector(), &LayoutConfig::default());
        let fades: Vec<bool> = params.entries.iter().map(|e| e.fade).collect();
        assert_eq!(fades, vec![false, false, true, true, true]);
    }

    #[test]
    fn colors_come_from_theme() {
        let theme = Theme::projector();
        let cloud = cloud_with(Selection {
            hover: Some(0),
            query_result: vec![1],
            ..Selection::default()
        });
        let params = LabelRenderParams::from_selection(&cloud, &theme, &LayoutConfig::default());
        assert_eq!(params.entries[0].fill_color, theme.label_fill_hover);
        assert_eq!(params.entries[1].fill_color, theme.label_fill_selected);
        assert_eq!(params.entries[1].stroke_color, theme.label_stroke_selected);
    }

    #[test]
    fn label_all_points_appends_the_rest() {
        let cloud = cloud_with(Selection {
            neighbors: vec![3],
            ..Selection::default()
        });
        let config = LayoutConfig {
            label_all_points: true,
            ..LayoutConfig::default()
        };
        let params = LabelRenderParams::from_selection(&cloud, &Theme::projector(), &config);
        assert_eq!(params.len(), 6);
        assert_eq!(params.entries[0].point_index, 3);
        assert!(params.entries[1..]
            .iter()
            .all(|e| e.kind == LabelKind::Unselected && e.scale == 1.0));
    }

    #[test]
    fn empty_selection_yields_no_labels() {
        let cloud = cloud_with(Selection::default());
        let params =
            LabelRenderParams::from_selection(&cloud, &Theme::projector(), &LayoutConfig::default());
        assert!(params.is_empty());
    }
}
