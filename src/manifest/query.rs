//! Query engine
//!
//! Read-only listing of the direct children of an element, filtered by
//! attribute values. A filter value is either matched exactly, or, when it
//! starts with `~`, searched as a regular expression. `~!` negates the search.
//!
//! ```text
//! color = "green"     exact match
//! color = "~^re"      value matches /^re/
//! color = "~!^re"     value does not match /^re/
//! ```

use super::element::{Attributes, Element};
use super::registry::ElementKind;
use crate::{ArmmError, Result};
use regex::Regex;
use serde::Serialize;

/// How a single attribute value is tested
#[derive(Debug, Clone)]
pub enum Matcher {
    Exact(String),
    Pattern { regex: Regex, negated: bool },
}

impl Matcher {
    /// Parse the filter mini-language
    pub fn parse(value: &str) -> Result<Self> {
        let Some(pattern) = value.strip_prefix('~') else {
            return Ok(Matcher::Exact(value.to_string()));
        };

        let (pattern, negated) = match pattern.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (pattern, false),
        };

        let regex = Regex::new(pattern)
            .map_err(|e| ArmmError::InvalidFilter(format!("{}: {}", value, e)))?;

        Ok(Matcher::Pattern { regex, negated })
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(expected) => expected == value,
            Matcher::Pattern { regex, negated } => regex.is_match(value) != *negated,
        }
    }
}

/// A compiled `key = value` attribute filter
#[derive(Debug, Clone)]
pub struct AttrFilter {
    pub key: String,
    pub matcher: Matcher,
}

impl AttrFilter {
    pub fn parse(key: impl Into<String>, value: &str) -> Result<Self> {
        Ok(Self {
            key: key.into(),
            matcher: Matcher::parse(value)?,
        })
    }

    /// The element must carry the attribute and its value must match
    pub fn matches(&self, element: &Element) -> bool {
        element
            .get(&self.key)
            .is_some_and(|value| self.matcher.matches(value))
    }
}

/// A listing request: element kind, filters and optional projection
#[derive(Debug, Clone)]
pub struct Query {
    kind: ElementKind,
    filters: Vec<AttrFilter>,
    projection: Option<String>,
}

impl Query {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            filters: Vec::new(),
            projection: None,
        }
    }

    /// Build a query from parallel key and value sequences
    pub fn from_pairs<K: AsRef<str>, V: AsRef<str>>(
        kind: ElementKind,
        keys: &[K],
        values: &[V],
        projection: Option<&str>,
    ) -> Result<Self> {
        if keys.len() != values.len() {
            return Err(ArmmError::InvalidArgument(format!(
                "got {} filter keys but {} values",
                keys.len(),
                values.len()
            )));
        }

        let mut query = Self::new(kind);
        for (key, value) in keys.iter().zip(values) {
            query = query.filter(key.as_ref(), value.as_ref())?;
        }
        if let Some(attr) = projection {
            query = query.project(attr);
        }
        Ok(query)
    }

    /// Add a filter; all filters must match
    pub fn filter(mut self, key: impl Into<String>, value: &str) -> Result<Self> {
        self.filters.push(AttrFilter::parse(key, value)?);
        Ok(self)
    }

    /// Emit only this attribute's value per match
    pub fn project(mut self, attr: impl Into<String>) -> Self {
        self.projection = Some(attr.into());
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn matches(&self, element: &Element) -> bool {
        element.is(self.kind) && self.filters.iter().all(|f| f.matches(element))
    }

    fn output(&self, element: &Element) -> Option<QueryOutput> {
        match self.projection {
            Some(ref attr) => element
                .get(attr)
                .map(|value| QueryOutput::Value(value.to_string())),
            None => Some(QueryOutput::Record(QueryRecord::from(element))),
        }
    }
}

/// Snapshot of a matched element, detached from the tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRecord {
    pub element: String,
    pub attrs: Attributes,
    pub text: Option<String>,
}

impl From<&Element> for QueryRecord {
    fn from(element: &Element) -> Self {
        Self {
            element: element.tag.clone(),
            attrs: element.attrs.clone(),
            text: element.text.clone(),
        }
    }
}

/// One result of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryOutput {
    Record(QueryRecord),
    Value(String),
}

impl QueryOutput {
    pub fn as_record(&self) -> Option<&QueryRecord> {
        match self {
            QueryOutput::Record(record) => Some(record),
            QueryOutput::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            QueryOutput::Value(value) => Some(value),
            QueryOutput::Record(_) => None,
        }
    }
}

impl Element {
    /// List direct children matching `query`, in document order
    pub fn list(&self, query: &Query) -> Vec<QueryOutput> {
        let results: Vec<QueryOutput> = self
            .children
            .iter()
            .filter(|child| query.matches(child))
            .filter_map(|child| query.output(child))
            .collect();

        tracing::debug!(
            element = %query.kind,
            filters = query.filters.len(),
            results = results.len(),
            "Action: list"
        );
        results
    }
}
