//! Analyzer module - data module analysis engine

pub mod engine;
pub mod extractor;
pub mod rules;

pub use engine::{AggregateStats, AnalysisEngine};
pub use extractor::{Extractor, NamespaceContext};
