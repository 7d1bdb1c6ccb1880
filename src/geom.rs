use serde::{Deserialize, Serialize};

/// Axis-aligned box in screen space. Both corners are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub lo_x: f32,
    pub lo_y: f32,
    pub hi_x: f32,
    pub hi_y: f32,
}

impl BoundingBox {
    pub const fn new(lo_x: f32, lo_y: f32, hi_x: f32, hi_y: f32) -> Self {
        Self {
            lo_x,
            lo_y,
            hi_x,
            hi_y,
        }
    }

    pub fn width(&self) -> f32 {
        box_width(self)
    }

    pub fn height(&self) -> f32 {
        box_height(self)
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        boxes_intersect(self, other)
    }

    pub fn is_inverted(&self) -> bool {
        self.hi_x < self.lo_x || self.hi_y < self.lo_y
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.lo_x + dx, self.lo_y + dy, self.hi_x + dx, self.hi_y + dy)
    }
}

pub fn box_width(bbox: &BoundingBox) -> f32 {
    bbox.hi_x - bbox.lo_x
}

pub fn box_height(bbox: &BoundingBox) -> f32 {
    bbox.hi_y - bbox.lo_y
}

/// Closed-interval overlap test: boxes that only share an edge or a corner
/// still intersect.
pub fn boxes_intersect(a: &BoundingBox, b: &BoundingBox) -> bool {
    !(a.lo_x > b.hi_x || a.lo_y > b.hi_y || a.hi_x < b.lo_x || a.hi_y < b.lo_y)
}
