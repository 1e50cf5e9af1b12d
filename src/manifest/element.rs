//! In-memory document tree

use super::registry::{ElementKind, ROOT_TAG};
use serde::ser::{Serialize, Serializer};

/// Insertion-ordered attribute mapping
///
/// Document order is kept for serialization; equality treats the
/// attributes as an unordered mapping.
#[derive(Debug, Clone, Default, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, overwriting in place or appending a new key
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Remove an attribute, returning its old value
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(pos).1)
    }

    /// Overwrite colliding keys and append new ones; never drops keys
    pub fn merge(&mut self, other: &Attributes) {
        for (k, v) in other.iter() {
            self.set(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A node of the manifest tree
///
/// Tags are kept as plain strings so elements outside the registry
/// survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attributes,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Attributes::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// An empty `<manifest>` root
    pub fn root() -> Self {
        Self::new(ROOT_TAG)
    }

    /// Registry kind of this element, if it has one
    pub fn kind(&self) -> Option<ElementKind> {
        ElementKind::from_tag(&self.tag)
    }

    pub fn is(&self, kind: ElementKind) -> bool {
        self.tag == kind.tag()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    /// Set text content; blank text is suppressed
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
    }

    /// Append a child as the last one
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Direct children of `kind`, in document order
    pub fn children_of(&self, kind: ElementKind) -> impl Iterator<Item = &Element> {
        self.children.iter().filter(move |c| c.is(kind))
    }

    /// First direct child of `kind`
    pub fn find(&self, kind: ElementKind) -> Option<&Element> {
        self.children_of(kind).next()
    }

    /// Position of the first direct child of `kind` with `key` == `value`
    pub(crate) fn position_keyed(&self, kind: ElementKind, key: &str, value: &str) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.is(kind) && c.get(key) == Some(value))
    }

    /// Position of the first direct child of `kind`
    pub(crate) fn position_of(&self, kind: ElementKind) -> Option<usize> {
        self.children.iter().position(|c| c.is(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_order_and_merge() {
        let mut attrs = Attributes::from([("name", "origin"), ("fetch", "https://a")]);
        attrs.merge(&Attributes::from([("fetch", "https://b"), ("review", "r")]));

        let keys: Vec<_> = attrs.keys().collect();
        assert_eq!(keys, vec!["name", "fetch", "review"]);
        assert_eq!(attrs.get("fetch"), Some("https://b"));

        assert_eq!(attrs.remove("review"), Some("r".to_string()));
        assert_eq!(attrs.remove("review"), None);
    }

    #[test]
    fn test_attributes_equality_ignores_order() {
        let a = Attributes::from([("name", "x"), ("value", "y")]);
        let b = Attributes::from([("value", "y"), ("name", "x")]);
        assert_eq!(a, b);
        assert_ne!(a, Attributes::from([("name", "x")]));
    }

    #[test]
    fn test_attributes_serialize_as_map() {
        let attrs = Attributes::from([("name", "origin"), ("fetch", "https://x")]);
        let json = serde_json::to_string(&attrs).unwrap();
        assert_eq!(json, r#"{"name":"origin","fetch":"https://x"}"#);
    }

    #[test]
    fn test_blank_text_suppressed() {
        let mut notice = Element::new("notice");
        notice.set_text("  \n ");
        assert_eq!(notice.text, None);
        notice.set_text("Hello");
        assert_eq!(notice.text.as_deref(), Some("Hello"));
    }

    #[test]
    fn test_children_lookup() {
        let mut root = Element::root();
        let mut remote = Element::new("remote");
        remote.attrs.set("name", "origin");
        root.push(Element::new("default"));
        root.push(remote);

        assert_eq!(root.kind(), None);
        assert_eq!(root.find(ElementKind::Default).map(|e| e.tag.as_str()), Some("default"));
        assert_eq!(root.position_keyed(ElementKind::Remote, "name", "origin"), Some(1));
        assert_eq!(root.position_keyed(ElementKind::Remote, "name", "other"), None);
        assert_eq!(root.children_of(ElementKind::Project).count(), 0);
    }
}
