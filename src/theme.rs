use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub background: String,
    pub point_color_no_selection: String,
    pub point_color_unselected: String,
    pub point_color_selected: String,
    pub point_color_checked: String,
    pub point_color_hover: String,
    pub label_fill_hover: String,
    pub label_stroke_hover: String,
    pub label_fill_checked: String,
    pub label_stroke_checked: String,
    pub label_fill_selected: String,
    pub label_stroke_selected: String,
    pub label_fill_neighbor: String,
    pub label_stroke_neighbor: String,
}

impl Theme {
    /// Colors of the embedding projector's canvas labels.
    pub fn projector() -> Self {
        Self {
            font_family: "Roboto, sans-serif".to_string(),
            font_size: 10.0,
            background: "#FFFFFF".to_string(),
            point_color_no_selection: "#7575D9".to_string(),
            point_color_unselected: "#E3E3E3".to_string(),
            point_color_selected: "#FA6666".to_string(),
            point_color_checked: "#32CD32".to_string(),
            point_color_hover: "#70DB93".to_string(),
            label_fill_hover: "#FF8000".to_string(),
            label_stroke_hover: "#FF8000".to_string(),
            label_fill_checked: "#00FF00".to_string(),
            label_stroke_checked: "#00FF00".to_string(),
            label_fill_selected: "#560731".to_string(),
            label_stroke_selected: "#FFFFFF".to_string(),
            label_fill_neighbor: "#000000".to_string(),
            label_stroke_neighbor: "#FFFFFF".to_string(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#1E1E1E".to_string(),
            point_color_unselected: "#4A4A4A".to_string(),
            label_fill_selected: "#F2C1D9".to_string(),
            label_stroke_selected: "#1E1E1E".to_string(),
            label_fill_neighbor: "#F0F0F0".to_string(),
            label_stroke_neighbor: "#1E1E1E".to_string(),
            ..Self::projector()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "projector" | "default" => Some(Self::projector()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::projector()
    }
}
