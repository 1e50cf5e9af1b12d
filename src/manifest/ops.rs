//! Element operations: upsert and remove
//!
//! Both operations act on the direct children of a given element and use the
//! registry rules to decide how existing instances are matched. Validation
//! always happens before the tree is touched.

use super::element::{Attributes, Element};
use super::registry::{ElementKind, ElementRules, TEXT_KEY};
use crate::error::ValidationError;
use crate::Result;

impl Element {
    /// Create or update a child of `kind`
    ///
    /// Repeatable kinds are matched by their identity attribute, unique kinds
    /// by tag alone. A matched child has `attrs` merged into it; otherwise a
    /// new child carrying every required attribute is appended.
    pub fn upsert(&mut self, kind: ElementKind, attrs: &Attributes) -> Result<&mut Self> {
        let rules = kind.rules();

        let existing = match rules.key {
            Some(key) => attrs
                .get(key)
                .and_then(|id| self.position_keyed(kind, key, id)),
            None => self.position_of(kind),
        };

        if let Some(pos) = existing {
            if rules.text_only && !attrs.contains(TEXT_KEY) {
                return Err(ValidationError::missing(kind, vec![TEXT_KEY.to_string()]).into());
            }
            tracing::debug!(element = %kind, position = pos, "Updating existing element");
            apply(&mut self.children[pos], rules, attrs);
            return Ok(self);
        }

        let missing = missing_required(kind, rules, attrs);
        if !missing.is_empty() {
            return Err(ValidationError::missing(kind, missing).into());
        }

        tracing::debug!(element = %kind, attrs = attrs.len(), "Appending new element");
        let mut element = Element::new(kind.tag());
        apply(&mut element, rules, attrs);
        self.push(element);

        Ok(self)
    }

    /// Remove a child of `kind`, or only some of its attributes
    ///
    /// Repeatable kinds are located by `name` matched against the identity
    /// attribute; unique kinds ignore `name`. At most one child is affected.
    /// With an empty `attrs` the whole child is removed. Required attributes
    /// can never be removed. Finding nothing is not an error.
    pub fn remove(&mut self, kind: ElementKind, name: &str, attrs: &[&str]) -> Result<&mut Self> {
        let rules = kind.rules();

        let found = match rules.key {
            Some(key) => self.position_keyed(kind, key, name),
            None => self.position_of(kind),
        };

        let Some(pos) = found else {
            tracing::debug!(element = %kind, name, "Nothing to remove");
            return Ok(self);
        };

        if attrs.is_empty() {
            tracing::debug!(element = %kind, name, "Removing element");
            self.children.remove(pos);
            return Ok(self);
        }

        let protected: Vec<String> = rules
            .required
            .iter()
            .filter(|req| attrs.contains(*req))
            .map(|req| req.to_string())
            .collect();
        if !protected.is_empty() {
            return Err(ValidationError::not_removable(kind, protected).into());
        }

        let target = &mut self.children[pos];
        for attr in attrs {
            if rules.text_only && *attr == TEXT_KEY {
                target.text = None;
            } else {
                target.attrs.remove(attr);
            }
        }
        tracing::debug!(element = %kind, name, removed = attrs.len(), "Removed attributes");

        Ok(self)
    }
}

fn apply(element: &mut Element, rules: ElementRules, attrs: &Attributes) {
    if rules.text_only {
        if let Some(text) = attrs.get(TEXT_KEY) {
            element.set_text(text);
        }
    } else {
        element.attrs.merge(attrs);
    }
}

fn missing_required(kind: ElementKind, rules: ElementRules, attrs: &Attributes) -> Vec<String> {
    let mut missing: Vec<String> = rules
        .required
        .iter()
        .filter(|req| !attrs.contains(req))
        .map(|req| req.to_string())
        .collect();

    if rules.text_only && !attrs.contains(TEXT_KEY) {
        missing.push(TEXT_KEY.to_string());
    }

    if !missing.is_empty() {
        tracing::debug!(element = %kind, ?missing, "Missing required attributes");
    }
    missing
}
