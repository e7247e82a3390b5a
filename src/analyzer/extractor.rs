//! Namespace-tolerant structural lookups over a parsed data module

use crate::parser::{Element, XmlDocument};
use crate::{Counts, Metadata};

pub const PROCEDURAL_STEP: &str = "proceduralStep";
pub const WARNING: &str = "warning";
pub const CAUTION: &str = "caution";
pub const NOTE: &str = "note";
pub const DM_TITLE: &str = "dmTitle";
pub const DM_CODE: &str = "dmCode";

/// The one namespace every lookup in an analysis is qualified with.
///
/// Built once from the root's default namespace binding. When the document
/// declares none, only elements in no namespace match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    uri: Option<String>,
}

impl NamespaceContext {
    pub fn from_document(doc: &XmlDocument) -> Self {
        Self {
            uri: doc.default_namespace().map(str::to_string),
        }
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// True if `el` is named `tag` within this context
    pub fn matches(&self, el: &Element, tag: &str) -> bool {
        el.local_name() == tag && el.namespace() == self.uri()
    }
}

/// Counts and text lookups bound to one document and its namespace context
pub struct Extractor<'a> {
    doc: &'a XmlDocument,
    ns: NamespaceContext,
}

impl<'a> Extractor<'a> {
    pub fn new(doc: &'a XmlDocument) -> Self {
        Self {
            doc,
            ns: NamespaceContext::from_document(doc),
        }
    }

    pub fn namespace(&self) -> &NamespaceContext {
        &self.ns
    }

    fn matching(&self, tag: &'a str) -> impl Iterator<Item = &'a Element> + '_ {
        self.doc
            .root()
            .descendants()
            .filter(move |el| self.ns.matches(el, tag))
    }

    /// Number of elements named `tag` anywhere in the tree, root included
    pub fn count(&self, tag: &'a str) -> usize {
        self.matching(tag).count()
    }

    /// True if at least one element named `tag` exists
    pub fn contains(&self, tag: &'a str) -> bool {
        self.matching(tag).next().is_some()
    }

    /// Whitespace-normalized text of the first element named `tag`, in document order
    pub fn first_text(&self, tag: &'a str) -> Option<String> {
        let el = self.matching(tag).next()?;
        normalize_whitespace(&el.text())
    }

    pub fn counts(&self) -> Counts {
        Counts {
            steps: self.count(PROCEDURAL_STEP),
            warnings: self.count(WARNING),
            cautions: self.count(CAUTION),
            notes: self.count(NOTE),
        }
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            dm_code: self.first_text(DM_CODE),
            dm_title: self.first_text(DM_TITLE),
        }
    }
}

/// Collapse whitespace runs to single spaces; all-whitespace input becomes None
pub fn normalize_whitespace(text: &str) -> Option<String> {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
