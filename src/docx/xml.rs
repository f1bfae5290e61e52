//! Owned, mutable XML element tree.
//!
//! Parts are parsed with `roxmltree` (which is read-only) and copied into this
//! tree so they can be edited and written back. Names are kept as qualified
//! strings (`w:p`, `r:embed`) exactly as the part declares them, and namespace
//! declarations travel as ordinary `xmlns:*` attributes on the element that
//! declared them.

use std::fmt::Write;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(XmlNode::Text(text.to_string()));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |e| e.name == name)
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// Position in `children` of the `n`th element named `name`.
    pub fn position_of(&self, name: &str, n: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, XmlNode::Element(e) if e.name == name))
            .nth(n)
            .map(|(i, _)| i)
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(XmlNode::Element(child));
    }

    pub fn insert(&mut self, index: usize, child: Element) {
        self.children.insert(index, XmlNode::Element(child));
    }

    /// Inserts or replaces a property child, keeping the schema order given by
    /// `order`. Names missing from `order` go last.
    pub fn set_ordered_child(&mut self, child: Element, order: &[&str]) {
        if let Some(existing) = self.child_mut(&child.name) {
            *existing = child;
            return;
        }
        let rank = |name: &str| order.iter().position(|o| *o == name).unwrap_or(order.len());
        let new_rank = rank(&child.name);
        let at = self
            .children
            .iter()
            .position(|c| matches!(c, XmlNode::Element(e) if rank(&e.name) > new_rank))
            .unwrap_or(self.children.len());
        self.insert(at, child);
    }

    /// Returns the child `name`, prepending an empty one when absent.
    /// Property containers (`w:pPr`, `w:rPr`, `w:tcPr`, `w:tblPr`) must come
    /// first in their parent.
    pub fn first_child_or_insert(&mut self, name: &str) -> &mut Element {
        let existing = self
            .children
            .iter()
            .position(|c| matches!(c, XmlNode::Element(e) if e.name == name));
        let idx = match existing {
            Some(i) => i,
            None => {
                self.insert(0, Element::new(name));
                0
            }
        };
        match &mut self.children[idx] {
            XmlNode::Element(e) => e,
            XmlNode::Text(_) => unreachable!("index points at an element"),
        }
    }

    /// Depth-first visit of every descendant element, self excluded.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.elements().collect();
        stack.reverse();
        while let Some(e) = stack.pop() {
            out.push(e);
            let mut kids: Vec<&Element> = e.elements().collect();
            kids.reverse();
            stack.extend(kids);
        }
        out
    }

    pub fn has_descendant(&self, name: &str) -> bool {
        self.elements()
            .any(|e| e.name == name || e.has_descendant(name))
    }
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(p) if !p.is_empty() => format!("{p}:{local}"),
        _ => local.to_string(),
    }
}

fn convert(node: roxmltree::Node) -> Element {
    let name = match node.tag_name().namespace() {
        Some(uri) => qualified(node.lookup_prefix(uri), node.tag_name().name()),
        None => node.tag_name().name().to_string(),
    };

    let mut attrs = Vec::new();
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();
    for ns in node.namespaces() {
        if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        attrs.push((key, ns.uri().to_string()));
    }
    for a in node.attributes() {
        let key = match a.namespace() {
            Some(XML_NS) => format!("xml:{}", a.name()),
            Some(uri) => qualified(node.lookup_prefix(uri), a.name()),
            None => a.name().to_string(),
        };
        attrs.push((key, a.value().to_string()));
    }

    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(XmlNode::Element(convert(child)));
        } else if child.is_text()
            && let Some(t) = child.text()
        {
            children.push(XmlNode::Text(t.to_string()));
        }
    }

    Element {
        name,
        attrs,
        children,
    }
}

pub fn parse(xml: &str) -> Result<Element, roxmltree::Error> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(convert(doc.root_element()))
}

pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Attribute values also escape whitespace other than spaces, which a parser
/// would otherwise normalize to spaces.
pub fn escape_attr(value: &str) -> String {
    escape_text(value)
        .replace('"', "&quot;")
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.name);
    for (k, v) in &el.attrs {
        let _ = write!(out, " {}=\"{}\"", k, escape_attr(v));
    }
    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in &el.children {
        match child {
            XmlNode::Element(e) => write_element(out, e),
            XmlNode::Text(t) => out.push_str(&escape_text(t)),
        }
    }
    let _ = write!(out, "</{}>", el.name);
}

/// Serializes a whole part, declaration included.
pub fn to_string(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n");
    write_element(&mut out, root);
    out
}
