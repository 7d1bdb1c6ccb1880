use projector_labels::{BoundingBox, CollisionGrid, RenderOptions, Theme, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    fast_text: Option<bool>,
    label_all_points: Option<bool>,
    alternate_anchors: Option<bool>,
}

fn build_render_options(options: LabelRenderOptions) -> RenderOptions {
    let mut render_options = match options.theme.as_deref().and_then(Theme::by_name) {
        Some(theme) => RenderOptions {
            theme,
            ..RenderOptions::default()
        },
        None => RenderOptions::projector(),
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(width) = options.width.filter(|w| *w > 0.0) {
        render_options.layout.canvas_width = width;
    }
    if let Some(height) = options.height.filter(|h| *h > 0.0) {
        render_options.layout.canvas_height = height;
    }
    // No system fonts in the browser.
    render_options.layout.fast_text = options.fast_text.unwrap_or(true);
    if let Some(label_all) = options.label_all_points {
        render_options.layout.label_all_points = label_all;
    }
    if let Some(alternate) = options.alternate_anchors {
        render_options.layout.alternate_anchors = alternate;
    }

    render_options
}

#[wasm_bindgen]
pub fn render_labels_svg(input: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<LabelRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        LabelRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(input, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

/// Collision grid handle for callers that lay out their own labels.
#[wasm_bindgen]
pub struct WasmCollisionGrid {
    inner: CollisionGrid,
}

#[wasm_bindgen]
impl WasmCollisionGrid {
    #[wasm_bindgen(constructor)]
    pub fn new(
        lo_x: f32,
        lo_y: f32,
        hi_x: f32,
        hi_y: f32,
        cell_width: f32,
        cell_height: f32,
    ) -> Result<WasmCollisionGrid, JsValue> {
        let bound = BoundingBox::new(lo_x, lo_y, hi_x, hi_y);
        CollisionGrid::try_new(bound, cell_width, cell_height)
            .map(|inner| WasmCollisionGrid { inner })
            .map_err(|error| JsValue::from_str(&error.to_string()))
    }

    pub fn insert(&mut self, lo_x: f32, lo_y: f32, hi_x: f32, hi_y: f32, just_test: bool) -> bool {
        self.inner
            .insert(BoundingBox::new(lo_x, lo_y, hi_x, hi_y), just_test)
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
