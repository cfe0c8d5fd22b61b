//! Document handle: parse, navigate, edit, save.

use std::fs;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{DocumentError, Result};
use crate::node::XmlNode;
use crate::path::{self, Segment};

/// Attribute marking semicolon-separated vector content.
const MAP_TYPE_ATTRIBUTE: &str = "mapType";
const MAP_TYPE_VECTOR: &str = "vector";

/// Attribute carrying element identity.
pub const UID_ATTRIBUTE: &str = "uID";

/// A typed element value for default-aware reads. The variant chosen by the
/// caller decides how existing text is parsed; there is no content sniffing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Value {
    /// Numeric payload, if this is a `Float`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Text payload, if this is `Text`.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn expected(&self) -> &'static str {
        match self {
            Value::Float(_) => "a number",
            Value::Bool(_) => "a boolean",
            Value::Text(_) => "text",
        }
    }

    fn render(&self) -> String {
        match self {
            Value::Float(value) => value.to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Text(text) => text.clone(),
        }
    }
}

/// An XML document with TIXI-style path navigation.
#[derive(Debug, Clone)]
pub struct Document {
    root: XmlNode,
}

impl Document {
    /// Build a document around an existing root element.
    pub fn new(root: XmlNode) -> Self {
        Self { root }
    }

    /// Parse a document from a file.
    pub fn open(path: &Path) -> Result<Self> {
        let xml = fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                DocumentError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                DocumentError::Io(err)
            }
        })?;
        xml.parse()
    }

    /// The root element name.
    pub fn root_name(&self) -> &str {
        &self.root.name
    }

    /// Whether an element exists at the given path.
    pub fn element_exists(&self, path: &str) -> bool {
        self.resolve(path).is_ok()
    }

    /// Text content of the element at `path`. Empty elements yield `""`.
    pub fn get_text(&self, path: &str) -> Result<&str> {
        Ok(self.resolve(path)?.text.as_deref().unwrap_or(""))
    }

    /// Replace the text content of an existing element.
    pub fn set_text(&mut self, path: &str, text: &str) -> Result<()> {
        let node = self.resolve_mut(path)?;
        if !node.children.is_empty() {
            return Err(DocumentError::TextOnBranch {
                path: path.to_string(),
            });
        }
        node.text = Some(text.to_string());
        Ok(())
    }

    /// Parse the element text as a single float.
    pub fn get_float(&self, path: &str) -> Result<f64> {
        let text = self.get_text(path)?.trim();
        text.parse().map_err(|_| DocumentError::MalformedNumber {
            path: path.to_string(),
            token: text.to_string(),
        })
    }

    /// Read a semicolon-separated float vector. The literal tokens `nan`
    /// and `NaN` parse to `f64::NAN`; a trailing separator is tolerated.
    pub fn get_float_vector(&self, path: &str) -> Result<Vec<f64>> {
        let node = self.resolve(path)?;
        let text = node.text.as_deref().unwrap_or("").trim();
        if text.is_empty() {
            return Err(DocumentError::EmptyVector {
                path: path.to_string(),
            });
        }
        let mut values = Vec::new();
        for token in text.split(';') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            let value = token.parse().map_err(|_| DocumentError::MalformedNumber {
                path: path.to_string(),
                token: token.to_string(),
            })?;
            values.push(value);
        }
        if values.is_empty() {
            return Err(DocumentError::EmptyVector {
                path: path.to_string(),
            });
        }
        Ok(values)
    }

    /// Write a float vector, creating the element and any missing ancestors.
    /// Values keep full precision (the shortest text that parses back to
    /// the same float, `NaN` for NaN) and the element is tagged with
    /// `mapType="vector"`.
    pub fn set_float_vector(&mut self, path: &str, values: &[f64]) -> Result<()> {
        self.create_branch(path)?;
        let node = self.resolve_mut(path)?;
        if !node.children.is_empty() {
            return Err(DocumentError::TextOnBranch {
                path: path.to_string(),
            });
        }
        let rendered: Vec<String> = values.iter().map(f64::to_string).collect();
        node.text = Some(rendered.join(";"));
        node.set_attribute(MAP_TYPE_ATTRIBUTE, MAP_TYPE_VECTOR);
        Ok(())
    }

    /// Create every missing element along `path`. Existing elements are left
    /// alone. An indexed segment may extend the sibling run by one
    /// (`[n+1]` when `n` exist) but never create a gap.
    pub fn create_branch(&mut self, path: &str) -> Result<()> {
        let segments = path::parse(path)?;
        let Some((first, rest)) = segments.split_first() else {
            return Err(DocumentError::invalid_path(path, "path names no element"));
        };
        if first.name != self.root.name || first.index != 1 {
            return Err(DocumentError::invalid_path(
                path,
                format!("document root is '{}'", self.root.name),
            ));
        }
        let mut node = &mut self.root;
        for segment in rest {
            let present = node.count_children_named(segment.name);
            if segment.index == present + 1 {
                node.children.push(XmlNode::new(segment.name));
            } else if segment.index > present {
                return Err(DocumentError::invalid_path(
                    path,
                    format!(
                        "cannot create {}[{}] with {} present",
                        segment.name, segment.index, present
                    ),
                ));
            }
            node = match node.child_named_mut(segment.name, segment.index) {
                Some(child) => child,
                None => return Err(DocumentError::element_not_found(path)),
            };
        }
        Ok(())
    }

    /// Append a named child element to an existing parent.
    pub fn create_element(&mut self, parent: &str, name: &str) -> Result<()> {
        let node = self.resolve_mut(parent)?;
        node.children.push(XmlNode::new(name));
        Ok(())
    }

    /// Remove the element at `path` (and its subtree).
    pub fn remove_element(&mut self, path: &str) -> Result<()> {
        let (parent_segments, last) = path::split_last(path)?;
        if parent_segments.is_empty() {
            return Err(DocumentError::invalid_path(
                path,
                "cannot remove the root element",
            ));
        }
        let parent = self.resolve_segments_mut(path, &parent_segments)?;
        let position = parent
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.name == last.name)
            .map(|(at, _)| at)
            .nth(last.index - 1)
            .ok_or_else(|| DocumentError::element_not_found(path))?;
        parent.children.remove(position);
        Ok(())
    }

    /// Number of child elements of `path` with the given name.
    pub fn count_named_children(&self, path: &str, name: &str) -> Result<usize> {
        Ok(self.resolve(path)?.count_children_named(name))
    }

    /// Attribute value on the element at `path`.
    pub fn attribute(&self, path: &str, name: &str) -> Result<&str> {
        self.resolve(path)?
            .attribute(name)
            .ok_or_else(|| DocumentError::AttributeNotFound {
                path: path.to_string(),
                name: name.to_string(),
            })
    }

    /// Whether the element exists and carries the attribute.
    pub fn has_attribute(&self, path: &str, name: &str) -> bool {
        self.resolve(path)
            .is_ok_and(|node| node.attribute(name).is_some())
    }

    /// Insert or replace an attribute on an existing element.
    pub fn set_attribute(&mut self, path: &str, name: &str, value: &str) -> Result<()> {
        self.resolve_mut(path)?.set_attribute(name, value);
        Ok(())
    }

    /// Path of the first element (document order) whose `uID` attribute
    /// matches. Index selectors appear only where siblings share a name.
    pub fn uid_xpath(&self, uid: &str) -> Result<String> {
        let prefix = format!("/{}", self.root.name);
        locate_uid(&self.root, &prefix, uid).ok_or_else(|| DocumentError::UidNotFound {
            uid: uid.to_string(),
        })
    }

    /// Read a typed value, writing and returning `default` when the element
    /// is missing or empty. Existing text that does not parse as the
    /// default's variant is an error, never a silent fallback.
    pub fn value_or_default(&mut self, path: &str, default: Value) -> Result<Value> {
        if self.element_exists(path) {
            let text = self.get_text(path)?.trim().to_string();
            if !text.is_empty() {
                return parse_value(path, &text, &default);
            }
        } else {
            self.create_branch(path)?;
        }
        self.set_text(path, &default.render())?;
        Ok(default)
    }

    /// `value_or_default` narrowed to floats.
    pub fn float_or_default(&mut self, path: &str, default: f64) -> Result<f64> {
        match self.value_or_default(path, Value::Float(default))? {
            Value::Float(value) => Ok(value),
            _ => Ok(default),
        }
    }

    /// Serialize with declaration and two-space indentation.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut xml = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write_events(&mut xml)?;
        String::from_utf8(xml.into_inner()).map_err(|err| DocumentError::malformed(err.to_string()))
    }

    /// Write the document to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut xml = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
        self.write_events(&mut xml)?;
        xml.into_inner().flush()?;
        Ok(())
    }

    fn write_events<W: Write>(&self, xml: &mut Writer<W>) -> Result<()> {
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        write_node(xml, &self.root)
    }

    fn resolve(&self, path: &str) -> Result<&XmlNode> {
        let segments = path::parse(path)?;
        let Some((first, rest)) = segments.split_first() else {
            return Err(DocumentError::invalid_path(path, "path names no element"));
        };
        if first.name != self.root.name || first.index != 1 {
            return Err(DocumentError::element_not_found(path));
        }
        let mut node = &self.root;
        for segment in rest {
            node = node
                .child_named(segment.name, segment.index)
                .ok_or_else(|| DocumentError::element_not_found(path))?;
        }
        Ok(node)
    }

    fn resolve_mut(&mut self, path: &str) -> Result<&mut XmlNode> {
        let segments = path::parse(path)?;
        self.resolve_segments_mut(path, &segments)
    }

    fn resolve_segments_mut(&mut self, path: &str, segments: &[Segment<'_>]) -> Result<&mut XmlNode> {
        let Some((first, rest)) = segments.split_first() else {
            return Err(DocumentError::invalid_path(path, "path names no element"));
        };
        if first.name != self.root.name || first.index != 1 {
            return Err(DocumentError::element_not_found(path));
        }
        let mut node = &mut self.root;
        for segment in rest {
            node = node
                .child_named_mut(segment.name, segment.index)
                .ok_or_else(|| DocumentError::element_not_found(path))?;
        }
        Ok(node)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self> {
        let mut reader = Reader::from_str(s);
        let config = reader.config_mut();
        config.trim_text(true);
        config.expand_empty_elements = true;

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;
        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                    let mut node = XmlNode::new(name);
                    for attribute in start.attributes() {
                        let attribute =
                            attribute.map_err(|err| DocumentError::malformed(err.to_string()))?;
                        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
                        let value = attribute
                            .unescape_value()
                            .map_err(|err| DocumentError::malformed(err.to_string()))?
                            .into_owned();
                        node.attributes.push((key, value));
                    }
                    stack.push(node);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|err| DocumentError::malformed(err.to_string()))?;
                    if let Some(node) = stack.last_mut() {
                        match node.text.as_mut() {
                            Some(existing) => existing.push_str(&text),
                            None => node.text = Some(text.into_owned()),
                        }
                    }
                }
                Event::End(_) => {
                    let Some(node) = stack.pop() else {
                        return Err(DocumentError::malformed("unbalanced end tag"));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => {
                            if root.is_some() {
                                return Err(DocumentError::malformed("multiple root elements"));
                            }
                            root = Some(node);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        let Some(root) = root else {
            return Err(DocumentError::malformed("document has no root element"));
        };
        if !stack.is_empty() {
            return Err(DocumentError::malformed("unclosed element"));
        }
        Ok(Document { root })
    }
}

fn parse_value(path: &str, text: &str, default: &Value) -> Result<Value> {
    match default {
        Value::Float(_) => text
            .parse()
            .map(Value::Float)
            .map_err(|_| DocumentError::ValueKind {
                path: path.to_string(),
                expected: default.expected(),
                text: text.to_string(),
            }),
        Value::Bool(_) => match text {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            _ => Err(DocumentError::ValueKind {
                path: path.to_string(),
                expected: default.expected(),
                text: text.to_string(),
            }),
        },
        Value::Text(_) => Ok(Value::Text(text.to_string())),
    }
}

fn locate_uid(node: &XmlNode, prefix: &str, uid: &str) -> Option<String> {
    if node.attribute(UID_ATTRIBUTE) == Some(uid) {
        return Some(prefix.to_string());
    }
    let mut seen: Vec<(&str, usize)> = Vec::new();
    for child in &node.children {
        let position = match seen.iter_mut().find(|(name, _)| *name == child.name) {
            Some(entry) => {
                entry.1 += 1;
                entry.1
            }
            None => {
                seen.push((child.name.as_str(), 1));
                1
            }
        };
        let step = if node.count_children_named(&child.name) > 1 {
            format!("{prefix}/{}[{position}]", child.name)
        } else {
            format!("{prefix}/{}", child.name)
        };
        if let Some(found) = locate_uid(child, &step, uid) {
            return Some(found);
        }
    }
    None
}

fn write_node<W: Write>(xml: &mut Writer<W>, node: &XmlNode) -> Result<()> {
    let mut start = BytesStart::new(node.name.as_str());
    for (key, value) in &node.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    let text = node.text.as_deref().unwrap_or("");
    if node.children.is_empty() && text.is_empty() {
        xml.write_event(Event::Empty(start))?;
        return Ok(());
    }
    xml.write_event(Event::Start(start))?;
    if node.children.is_empty() {
        xml.write_event(Event::Text(BytesText::new(text)))?;
    } else {
        for child in &node.children {
            write_node(xml, child)?;
        }
    }
    xml.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    Ok(())
}
