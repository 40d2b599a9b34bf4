use glimpse_types::{BoundingBox, Point};

use crate::ViewRect;

/// Converts between the overlay's logical pixels and screenshot pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMapping {
    scale_x: f32,
    scale_y: f32,
}

impl ViewMapping {
    /// `view_*` is the overlay size in logical pixels
    pub fn new(image_width: u32, image_height: u32, view_width: f32, view_height: f32) -> Self {
        let ratio = |image: u32, view: f32| {
            if view > 0.0 { image as f32 / view } else { 1.0 }
        };
        Self {
            scale_x: ratio(image_width, view_width),
            scale_y: ratio(image_height, view_height),
        }
    }

    /// Screenshot pixel under a logical pointer position. Not clamped; the
    /// selection session clamps.
    pub fn to_image(&self, x: f32, y: f32) -> Point {
        Point::new(
            (x * self.scale_x).floor() as i32,
            (y * self.scale_y).floor() as i32,
        )
    }

    pub fn to_view(&self, b: &BoundingBox) -> ViewRect {
        ViewRect {
            x: b.x1 as f32 / self.scale_x,
            y: b.y1 as f32 / self.scale_y,
            width: b.width() as f32 / self.scale_x,
            height: b.height() as f32 / self.scale_y,
        }
    }
}
