pub use bounding_box::BoundingBox;
pub use matrix::Matrix;
pub use path::{Path, PathCommand};
pub use point::Point;

mod bounding_box;
mod matrix;
mod path;
mod point;
