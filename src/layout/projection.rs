/// Maps world coordinates onto the canvas: the data extent is centered and
/// scaled uniformly to fit inside the padded canvas, with world y pointing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    scale: f32,
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
}

impl Projection {
    pub fn fit(extent: Option<(f32, f32, f32, f32)>, width: f32, height: f32, padding: f32) -> Self {
        let (min_x, min_y, max_x, max_y) = extent.unwrap_or((0.0, 0.0, 0.0, 0.0));
        let avail_w = (width - 2.0 * padding).max(1.0);
        let avail_h = (height - 2.0 * padding).max(1.0);
        let data_w = max_x - min_x;
        let data_h = max_y - min_y;

        let fit_x = if data_w > f32::EPSILON { avail_w / data_w } else { f32::INFINITY };
        let fit_y = if data_h > f32::EPSILON { avail_h / data_h } else { f32::INFINITY };
        let scale = fit_x.min(fit_y);
        // A single point (or all points stacked) has no extent to fit.
        let scale = if scale.is_finite() { scale } else { 1.0 };

        Self {
            scale,
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            width,
            height,
        }
    }

    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.width / 2.0 + (x - self.center_x) * self.scale,
            self.height / 2.0 - (y - self.center_y) * self.scale,
        )
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
