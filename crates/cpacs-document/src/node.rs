//! In-memory XML element tree.

/// A single XML element: name, attributes, and either text or child
/// elements. Mixed content is not modeled; CPACS documents keep text on
/// leaf elements only.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    pub text: Option<String>,
}

impl XmlNode {
    /// Create an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    /// Attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Insert or replace an attribute.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(entry) = self.attributes.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value;
        } else {
            self.attributes.push((name.to_string(), value));
        }
    }

    /// Number of child elements with the given name.
    pub fn count_children_named(&self, name: &str) -> usize {
        self.children.iter().filter(|child| child.name == name).count()
    }

    /// The `index`-th (1-based) child element with the given name.
    pub fn child_named(&self, name: &str, index: usize) -> Option<&XmlNode> {
        self.children
            .iter()
            .filter(|child| child.name == name)
            .nth(index.saturating_sub(1))
    }

    /// Mutable access to the `index`-th (1-based) child with the given name.
    pub fn child_named_mut(&mut self, name: &str, index: usize) -> Option<&mut XmlNode> {
        self.children
            .iter_mut()
            .filter(|child| child.name == name)
            .nth(index.saturating_sub(1))
    }
}
