//! Detector module for data module categories

pub mod category;

pub use category::{CategoryDetector, CATEGORY_MARKERS};
