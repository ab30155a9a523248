//! Core types for the tilemirror toolchain.
//!
//! Contains tile coordinates, single-level tile bounding boxes, and a
//! terminal progress bar.

pub mod progress;

pub mod types;

pub use types::*;
