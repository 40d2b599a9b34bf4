pub mod geometry;
pub mod types;

pub use geometry::{BoundingBox, Point, SelectionResult};
pub use types::{AppEvent, StreamUpdate};
