//! Data module category detection

use crate::analyzer::extractor::Extractor;
use crate::Category;
use tracing::debug;

/// Structural containers that identify each category, highest priority first
pub const CATEGORY_MARKERS: [(&str, Category); 4] = [
    ("partsData", Category::Parts),
    ("faultIsolation", Category::Fault),
    ("procedure", Category::Procedure),
    ("description", Category::Description),
];

/// Picks a category from which structural container is present.
///
/// First marker found anywhere in the tree wins; element counts play no part.
pub struct CategoryDetector<'e, 'a> {
    extractor: &'e Extractor<'a>,
}

impl<'e, 'a> CategoryDetector<'e, 'a> {
    pub fn new(extractor: &'e Extractor<'a>) -> Self {
        Self { extractor }
    }

    pub fn detect(&self) -> Category {
        for (marker, category) in CATEGORY_MARKERS {
            if self.extractor.contains(marker) {
                debug!(marker, %category, "category marker found");
                return category;
            }
        }
        Category::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::XmlDocument;

    fn detect(xml: &str) -> Category {
        let doc = XmlDocument::parse(xml.as_bytes()).unwrap();
        let extractor = Extractor::new(&doc);
        CategoryDetector::new(&extractor).detect()
    }

    #[test]
    fn test_each_marker() {
        assert_eq!(detect("<dmodule><content><partsData/></content></dmodule>"), Category::Parts);
        assert_eq!(detect("<dmodule><content><faultIsolation/></content></dmodule>"), Category::Fault);
        assert_eq!(detect("<dmodule><content><procedure/></content></dmodule>"), Category::Procedure);
        assert_eq!(detect("<dmodule><content><description/></content></dmodule>"), Category::Description);
        assert_eq!(detect("<dmodule><content/></dmodule>"), Category::Unknown);
    }

    #[test]
    fn test_priority_parts_over_procedure() {
        assert_eq!(
            detect("<dmodule><procedure/><description/><partsData/></dmodule>"),
            Category::Parts
        );
    }

    #[test]
    fn test_priority_fault_over_procedure_and_description() {
        assert_eq!(
            detect("<dmodule><description/><procedure/><faultIsolation/></dmodule>"),
            Category::Fault
        );
    }

    #[test]
    fn test_priority_procedure_over_description() {
        assert_eq!(
            detect("<dmodule><description/><procedure/></dmodule>"),
            Category::Procedure
        );
    }

    #[test]
    fn test_marker_found_at_depth() {
        assert_eq!(
            detect("<dmodule><a><b><c><faultIsolation/></c></b></a></dmodule>"),
            Category::Fault
        );
    }

    #[test]
    fn test_marker_as_root() {
        assert_eq!(detect("<procedure/>"), Category::Procedure);
    }

    #[test]
    fn test_empty_procedure_still_procedure() {
        assert_eq!(
            detect("<dmodule><content><procedure><mainProcedure/></procedure></content></dmodule>"),
            Category::Procedure
        );
    }

    #[test]
    fn test_marker_in_foreign_namespace_ignored() {
        assert_eq!(
            detect(r#"<dmodule xmlns:x="urn:other"><x:partsData/><description/></dmodule>"#),
            Category::Description
        );
    }
}
