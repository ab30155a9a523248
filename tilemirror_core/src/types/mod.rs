//! Contains types like tile coordinates and bounding boxes.

mod tile_bbox;
pub use tile_bbox::*;

mod tile_coord;
pub use tile_coord::*;
