//! Owned element tree for the extracted XFA packet.
//!
//! The upstream repair stage hands this module a single well-formed XML
//! string; `parse_tree` turns it into an immutable tree of [`Element`]
//! nodes that the interpreter traverses without ever mutating. Names are
//! stored as written in the source (namespace-qualified); kind lookups
//! downstream go through [`Element::local_name`], which strips the
//! prefix, because authoring tools vary both prefixes and casing.
//!
//! # Usage
//!
//! ```rust
//! use xfa_stream::tree::parse_tree;
//!
//! # fn example() -> Result<(), xfa_stream::error::XfaError> {
//! let root = parse_tree("<xdp:xdp><template><field name='a'/></template></xdp:xdp>")?;
//! let template = root.find_template();
//! assert_eq!(template.local_name(), "template");
//! # Ok(())
//! # }
//! ```

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::error::XfaError;

/// Limits for tree construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Maximum total node count (elements plus comments).
    pub max_nodes: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_depth: 64,
            max_nodes: 65_536,
        }
    }
}

/// One child slot in the tree.
///
/// Comments are kept so the renderer can skip them explicitly (a
/// non-element node renders to an empty fragment, never an error).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// A structural element.
    Element(Element),
    /// A comment; carries its text for debug rendering only.
    Comment(String),
}

impl Node {
    /// The contained element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Comment(_) => None,
        }
    }
}

/// One element of the form-description tree.
///
/// Immutable once produced by [`parse_tree`]; the interpreter only reads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name as written in the source, possibly namespace-qualified.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
    /// Direct text content (concatenated, whitespace-only runs dropped).
    pub text: String,
}

impl Element {
    /// Tag name with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Attribute value by exact name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute value with a literal fallback.
    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    /// Child elements in document order, comments skipped.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// All descendant elements (excluding self) whose local name matches
    /// `local` case-insensitively, in document order and at any depth.
    pub fn descendants_by_local_name(&self, local: &str) -> Vec<&Element> {
        let mut out = Vec::with_capacity(8);
        collect_descendants(self, local, &mut out);
        out
    }

    /// Locate the form template root by local name, falling back to the
    /// whole supplied tree when no `template` element exists.
    pub fn find_template(&self) -> &Element {
        find_by_local_name(self, "template").unwrap_or(self)
    }
}

fn collect_descendants<'a>(el: &'a Element, local: &str, out: &mut Vec<&'a Element>) {
    for child in el.child_elements() {
        if child.local_name().eq_ignore_ascii_case(local) {
            out.push(child);
        }
        collect_descendants(child, local, out);
    }
}

fn find_by_local_name<'a>(el: &'a Element, local: &str) -> Option<&'a Element> {
    if el.local_name().eq_ignore_ascii_case(local) {
        return Some(el);
    }
    for child in el.child_elements() {
        if let Some(found) = find_by_local_name(child, local) {
            return Some(found);
        }
    }
    None
}

/// Parse a repaired XFA packet into an element tree with default limits.
pub fn parse_tree(xml: &str) -> Result<Element, XfaError> {
    parse_tree_with_limits(xml, ParseLimits::default())
}

/// Parse a repaired XFA packet into an element tree.
///
/// Returns the root element. Text content is trimmed per segment;
/// whitespace-only runs between elements are dropped. Comments are kept
/// as [`Node::Comment`] children. Processing instructions, declarations,
/// and doctypes are ignored.
pub fn parse_tree_with_limits(xml: &str, limits: ParseLimits) -> Result<Element, XfaError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(64);
    let mut stack: Vec<Element> = Vec::with_capacity(8);
    let mut root: Option<Element> = None;
    let mut node_count = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                if root.is_some() {
                    return Err(parse_err(&reader, "content after document root"));
                }
                if stack.len() >= limits.max_depth {
                    return Err(XfaError::Limit(format!(
                        "element depth exceeds max_depth ({} > {})",
                        stack.len() + 1,
                        limits.max_depth
                    )));
                }
                node_count += 1;
                check_node_budget(node_count, limits)?;
                let element = element_from_start(&reader, e.name().as_ref(), e.attributes())?;
                stack.push(element);
            }
            Ok(Event::Empty(e)) => {
                if root.is_some() {
                    return Err(parse_err(&reader, "content after document root"));
                }
                node_count += 1;
                check_node_budget(node_count, limits)?;
                let element = element_from_start(&reader, e.name().as_ref(), e.attributes())?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(element)),
                    None => root = Some(element),
                }
            }
            Ok(Event::End(_)) => match stack.pop() {
                Some(done) => match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Element(done)),
                    None => root = Some(done),
                },
                None => return Err(parse_err(&reader, "unmatched closing tag")),
            },
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .decode()
                        .map_err(|err| parse_err(&reader, &format!("text decode: {:?}", err)))?;
                    // Indentation between child elements is not content;
                    // runs with any non-whitespace are kept verbatim.
                    if !text.trim().is_empty() {
                        current.text.push_str(text.as_ref());
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| parse_err(&reader, &format!("cdata decode: {:?}", err)))?;
                    current.text.push_str(text.as_ref());
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(current) = stack.last_mut() {
                    let entity_name = e
                        .decode()
                        .map_err(|err| parse_err(&reader, &format!("entity decode: {:?}", err)))?;
                    let entity = format!("&{};", entity_name);
                    let resolved = quick_xml::escape::unescape(&entity).map_err(|err| {
                        parse_err(&reader, &format!("entity unescape: {:?}", err))
                    })?;
                    current.text.push_str(resolved.as_ref());
                }
            }
            Ok(Event::Comment(e)) => {
                if let Some(current) = stack.last_mut() {
                    node_count += 1;
                    check_node_budget(node_count, limits)?;
                    let text = reader
                        .decoder()
                        .decode(&e)
                        .map_err(|err| parse_err(&reader, &format!("comment decode: {:?}", err)))?;
                    current.children.push(Node::Comment(text.into_owned()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(parse_err(&reader, &format!("{:?}", err))),
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(XfaError::Parse("unexpected end of document".into()));
    }
    root.ok_or_else(|| XfaError::Parse("document has no root element".into()))
}

fn check_node_budget(node_count: usize, limits: ParseLimits) -> Result<(), XfaError> {
    if node_count > limits.max_nodes {
        return Err(XfaError::Limit(format!(
            "node count exceeds max_nodes ({} > {})",
            node_count, limits.max_nodes
        )));
    }
    Ok(())
}

fn parse_err(reader: &Reader<&[u8]>, msg: &str) -> XfaError {
    XfaError::Parse(format!(
        "{} at byte {}",
        msg,
        reader.buffer_position()
    ))
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    raw_name: &[u8],
    attributes: quick_xml::events::attributes::Attributes<'_>,
) -> Result<Element, XfaError> {
    let name = reader
        .decoder()
        .decode(raw_name)
        .map_err(|err| parse_err(reader, &format!("tag decode: {:?}", err)))?
        .into_owned();

    let mut attrs = Vec::with_capacity(4);
    for attr in attributes {
        let attr = attr.map_err(|err| parse_err(reader, &format!("attribute: {:?}", err)))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|err| parse_err(reader, &format!("attribute key decode: {:?}", err)))?
            .into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| parse_err(reader, &format!("attribute value decode: {:?}", err)))?
            .into_owned();
        attrs.push((key, value));
    }

    Ok(Element {
        name,
        attributes: attrs,
        children: Vec::with_capacity(4),
        text: String::new(),
    })
}
