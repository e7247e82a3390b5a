//! Parser module for data module XML

pub mod document;

pub use document::{Descendants, Element, Node, XmlDocument, MAX_DEPTH};
