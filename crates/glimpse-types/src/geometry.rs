//! Pixel-space geometry shared by the selector, the encoder and the pipeline

use serde::{Deserialize, Serialize};

/// Raw pointer position in image pixels. May lie outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned box with `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    /// Build a box from two corners in any order
    pub fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// The whole image as a box
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Box spanned by two pointer positions, both clamped into `bounds` first
    pub fn from_corners(a: Point, b: Point, bounds: &BoundingBox) -> Self {
        let (ax, ay) = bounds.clamp_point(a);
        let (bx, by) = bounds.clamp_point(b);
        Self::new(ax, ay, bx, by)
    }

    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }

    /// Too thin to be a usable selection
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 1 || self.height() <= 1
    }

    /// Edge-inclusive hit test
    pub fn contains(&self, point: Point) -> bool {
        let x = i64::from(point.x);
        let y = i64::from(point.y);
        x >= i64::from(self.x1)
            && x <= i64::from(self.x2)
            && y >= i64::from(self.y1)
            && y <= i64::from(self.y2)
    }

    /// Clamp a pointer position onto this box
    pub fn clamp_point(&self, point: Point) -> (u32, u32) {
        let x = i64::from(point.x).clamp(i64::from(self.x1), i64::from(self.x2));
        let y = i64::from(point.y).clamp(i64::from(self.y1), i64::from(self.y2));
        (x as u32, y as u32)
    }

    /// Express this box in the frame whose origin is `origin`'s top-left corner
    pub fn relative_to(&self, origin: &BoundingBox) -> Self {
        Self::new(
            self.x1.saturating_sub(origin.x1),
            self.y1.saturating_sub(origin.y1),
            self.x2.saturating_sub(origin.x1),
            self.y2.saturating_sub(origin.y1),
        )
    }

    /// Inverse of [`BoundingBox::relative_to`]
    pub fn offset_by(&self, origin: &BoundingBox) -> Self {
        Self::new(
            self.x1 + origin.x1,
            self.y1 + origin.y1,
            self.x2 + origin.x1,
            self.y2 + origin.y1,
        )
    }
}

/// What the region selector hands back on confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionResult {
    /// Plain crop, no annotation requested (or none drawn)
    Crop(BoundingBox),
    /// Crop plus highlight boxes relative to the crop's top-left corner
    Annotated {
        crop: BoundingBox,
        highlights: Vec<BoundingBox>,
    },
}

impl SelectionResult {
    pub fn crop_box(&self) -> BoundingBox {
        match self {
            SelectionResult::Crop(crop) => *crop,
            SelectionResult::Annotated { crop, .. } => *crop,
        }
    }

    pub fn highlight_boxes(&self) -> &[BoundingBox] {
        match self {
            SelectionResult::Crop(_) => &[],
            SelectionResult::Annotated { highlights, .. } => highlights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_corners() {
        let b = BoundingBox::new(50, 50, 10, 10);
        assert_eq!(b, BoundingBox::new(10, 10, 50, 50));
        assert_eq!((b.x1, b.y1, b.x2, b.y2), (10, 10, 50, 50));
    }

    #[test]
    fn test_from_corners_clamps_to_bounds() {
        let bounds = BoundingBox::from_size(200, 200);
        let b = BoundingBox::from_corners(Point::new(20, 20), Point::new(-5, 300), &bounds);
        assert_eq!(b, BoundingBox::new(0, 20, 20, 200));
    }

    #[test]
    fn test_degenerate() {
        assert!(BoundingBox::new(10, 10, 11, 50).is_degenerate());
        assert!(BoundingBox::new(10, 10, 50, 10).is_degenerate());
        assert!(!BoundingBox::new(10, 10, 12, 12).is_degenerate());
    }

    #[test]
    fn test_relative_and_offset_are_inverse() {
        let crop = BoundingBox::new(100, 100, 300, 300);
        let absolute = BoundingBox::new(105, 105, 125, 125);
        let relative = absolute.relative_to(&crop);
        assert_eq!(relative, BoundingBox::new(5, 5, 25, 25));
        assert_eq!(relative.offset_by(&crop), absolute);
    }

    #[test]
    fn test_contains_is_edge_inclusive() {
        let b = BoundingBox::new(10, 10, 20, 20);
        assert!(b.contains(Point::new(10, 20)));
        assert!(!b.contains(Point::new(9, 15)));
        assert!(!b.contains(Point::new(-1, -1)));
    }

    #[test]
    fn test_selection_result_accessors() {
        let crop = BoundingBox::new(0, 0, 10, 10);
        let plain = SelectionResult::Crop(crop);
        assert_eq!(plain.crop_box(), crop);
        assert!(plain.highlight_boxes().is_empty());

        let annotated = SelectionResult::Annotated {
            crop,
            highlights: vec![BoundingBox::new(1, 1, 5, 5)],
        };
        assert_eq!(annotated.highlight_boxes().len(), 1);
    }

    #[test]
    fn test_selection_result_serializes() {
        let result = SelectionResult::Crop(BoundingBox::new(1, 2, 3, 4));
        let json = serde_json::to_string(&result).unwrap();
        let back: SelectionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
