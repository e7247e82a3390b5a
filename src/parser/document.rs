//! Namespace-resolving XML tree builder on top of quick-xml

use crate::error::AnalyzeError;
use quick_xml::encoding::Decoder;
use quick_xml::escape::{resolve_predefined_entity, unescape, unescape_with};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Deepest element nesting accepted before the document is rejected
pub const MAX_DEPTH: usize = 256;

/// A node in the document tree: either a child element or a run of character data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// An element with its resolved namespace URI and local name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    namespace: Option<String>,
    local_name: String,
    children: Vec<Node>,
}

impl Element {
    /// Resolved namespace URI (None when the element is in no namespace)
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Local name without any prefix
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Pre-order walk over this element and every element below it
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// All character data under this element, concatenated in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(t) => out.push_str(t),
                Node::Element(el) => stack.extend(el.children.iter().rev()),
            }
        }
        out
    }
}

/// Iterator returned by [`Element::descendants`]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        for child in el.children.iter().rev() {
            if let Node::Element(child) = child {
                self.stack.push(child);
            }
        }
        Some(el)
    }
}

/// A parsed, well-formed XML document
#[derive(Debug, Clone)]
pub struct XmlDocument {
    root: Element,
    default_namespace: Option<String>,
}

impl XmlDocument {
    /// Parse raw bytes into a document tree.
    ///
    /// Fails on anything that is not a single well-formed, namespace-well-formed
    /// XML document. No partial tree is ever returned.
    pub fn parse(bytes: &[u8]) -> Result<Self, AnalyzeError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = NsReader::from_reader(bytes);
        reader.config_mut().check_end_names = true;

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut default_namespace = None;
        let mut entities = Entities::default();

        loop {
            let position = reader.buffer_position();
            // Copied before the read: the encoding is only refined by the XML declaration
            let decoder = reader.decoder();
            let (resolved, event) = reader.read_resolved_event()?;
            match event {
                Event::Start(ref e) => {
                    check_depth(stack.len(), position)?;
                    if stack.is_empty() && root.is_none() {
                        default_namespace = declared_default_namespace(e, decoder, &entities)?;
                    }
                    stack.push(open_element(resolved, e, decoder)?);
                }
                Event::Empty(ref e) => {
                    check_depth(stack.len(), position)?;
                    if stack.is_empty() && root.is_none() {
                        default_namespace = declared_default_namespace(e, decoder, &entities)?;
                    }
                    let el = open_element(resolved, e, decoder)?;
                    attach(&mut stack, &mut root, el, position)?;
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or_else(|| {
                        AnalyzeError::InvalidXml(format!(
                            "unexpected closing tag at byte {}",
                            position
                        ))
                    })?;
                    attach(&mut stack, &mut root, el, position)?;
                }
                Event::Text(ref e) => {
                    let text = e.unescape_with(|name| entities.resolve(name))?;
                    push_text(&mut stack, &text, position)?;
                }
                Event::CData(ref e) => {
                    let text = decode(decoder, e, "CDATA")?;
                    push_text(&mut stack, &text, position)?;
                }
                Event::DocType(ref e) => {
                    entities = Entities::from_doctype(e, decoder)?;
                }
                Event::Eof => break,
                // Declarations, comments and processing instructions carry no facts
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(AnalyzeError::InvalidXml(format!(
                "unexpected end of input: element <{}> is not closed",
                open.local_name
            )));
        }

        let root = root.ok_or_else(|| AnalyzeError::InvalidXml("no root element".to_string()))?;
        debug!(
            root = %root.local_name,
            default_namespace = default_namespace.as_deref().unwrap_or("<none>"),
            entities = entities.len(),
            "parsed document"
        );

        Ok(Self {
            root,
            default_namespace,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The root element's default (unprefixed) namespace binding, if any
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }
}

fn open_element(
    resolved: ResolveResult<'_>,
    start: &BytesStart<'_>,
    decoder: Decoder,
) -> Result<Element, AnalyzeError> {
    let namespace = match resolved {
        ResolveResult::Bound(ns) => Some(decode(decoder, ns.as_ref(), "namespace URI")?.into_owned()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => {
            return Err(AnalyzeError::InvalidXml(format!(
                "namespace prefix '{}' is not declared",
                String::from_utf8_lossy(&prefix)
            )));
        }
    };

    // Walking the attributes surfaces duplicate or malformed attributes
    for attr in start.attributes() {
        attr.map_err(|err| AnalyzeError::InvalidXml(err.to_string()))?;
    }

    let local_name = decode(decoder, start.local_name().as_ref(), "element name")?.into_owned();

    Ok(Element {
        namespace,
        local_name,
        children: Vec::new(),
    })
}

fn declared_default_namespace(
    start: &BytesStart<'_>,
    decoder: Decoder,
    entities: &Entities,
) -> Result<Option<String>, AnalyzeError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|err| AnalyzeError::InvalidXml(err.to_string()))?;
        if attr.key.as_ref() == b"xmlns" {
            let raw = decode(decoder, &attr.value, "namespace URI")?;
            let value = unescape_with(&raw, |name| entities.resolve(name))
                .map_err(|err| AnalyzeError::InvalidXml(err.to_string()))?;
            return Ok(if value.is_empty() {
                None
            } else {
                Some(value.into_owned())
            });
        }
    }
    Ok(None)
}

fn check_depth(open: usize, position: impl std::fmt::Display) -> Result<(), AnalyzeError> {
    if open >= MAX_DEPTH {
        return Err(AnalyzeError::InvalidXml(format!(
            "excessive depth: more than {} nested elements at byte {}",
            MAX_DEPTH, position
        )));
    }
    Ok(())
}

/// General entities declared in the internal DTD subset
#[derive(Debug, Default)]
struct Entities {
    values: HashMap<String, String>,
}

impl Entities {
    fn from_doctype(doctype: &BytesText<'_>, decoder: Decoder) -> Result<Self, AnalyzeError> {
        let text = decode(decoder, doctype, "DOCTYPE")?;
        let mut values = HashMap::new();
        for caps in entity_declaration()?.captures_iter(&text) {
            let raw = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            let value = unescape(raw).map_or_else(|_| raw.to_string(), Cow::into_owned);
            // The first declaration of an entity is binding
            values.entry(caps[1].to_string()).or_insert(value);
        }
        Ok(Self { values })
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.values.get(name).map(String::as_str))
    }

    fn len(&self) -> usize {
        self.values.len()
    }
}

/// `<!ENTITY name "value">` or `<!ENTITY name 'value'>`; parameter and external entities never match
fn entity_declaration() -> Result<&'static Regex, AnalyzeError> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"<!ENTITY\s+([^\s%"'<>]+)\s+(?:"([^"]*)"|'([^']*)')\s*>"#))
        .as_ref()
        .map_err(|err| AnalyzeError::InvalidXml(err.to_string()))
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
    position: impl std::fmt::Display,
) -> Result<(), AnalyzeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(AnalyzeError::InvalidXml(format!(
            "second root element <{}> at byte {}",
            el.local_name, position
        )));
    }
    *root = Some(el);
    Ok(())
}

fn push_text(
    stack: &mut [Element],
    text: &str,
    position: impl std::fmt::Display,
) -> Result<(), AnalyzeError> {
    match stack.last_mut() {
        Some(parent) => {
            if !text.is_empty() {
                parent.children.push(Node::Text(text.to_string()));
            }
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(AnalyzeError::InvalidXml(format!(
            "text outside the root element at byte {}",
            position
        ))),
    }
}

/// Decode raw bytes with the document's declared encoding
fn decode<'b>(decoder: Decoder, bytes: &'b [u8], what: &str) -> Result<Cow<'b, str>, AnalyzeError> {
    decoder
        .decode(bytes)
        .map_err(|err| AnalyzeError::InvalidXml(format!("cannot decode {}: {}", what, err)))
}
