//! Element registry
//!
//! Fixed rules for every element kind the manifest editor understands:
//! which attributes are required, whether a parent may hold several
//! instances, which attribute identifies an instance, and whether the
//! payload is text rather than attributes.

use crate::ArmmError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of the root element of every manifest
pub const ROOT_TAG: &str = "manifest";

/// Attribute key carrying the payload of text-only elements
pub const TEXT_KEY: &str = "text";

/// Manifest element kinds known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    Default,
    ExtendProject,
    Include,
    ManifestServer,
    Notice,
    Project,
    Remote,
    RemoveProject,
    RepoHooks,
    Annotation,
    Copyfile,
    Linkfile,
}

/// Structural rules for one element kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementRules {
    /// Attributes that must be present on create and can never be removed
    pub required: &'static [&'static str],

    /// Identity attribute when several siblings of this kind may exist
    pub key: Option<&'static str>,

    /// Payload is a single text string instead of attributes
    pub text_only: bool,
}

impl ElementRules {
    /// Whether a parent may hold several elements of this kind
    pub fn repeatable(&self) -> bool {
        self.key.is_some()
    }

    /// Whether `name` is a required attribute
    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(&name)
    }
}

const fn unique(required: &'static [&'static str]) -> ElementRules {
    ElementRules {
        required,
        key: None,
        text_only: false,
    }
}

const fn repeatable(required: &'static [&'static str], key: &'static str) -> ElementRules {
    ElementRules {
        required,
        key: Some(key),
        text_only: false,
    }
}

impl ElementKind {
    /// Every registered kind, in registry order
    pub const ALL: [ElementKind; 12] = [
        ElementKind::Default,
        ElementKind::ExtendProject,
        ElementKind::Include,
        ElementKind::ManifestServer,
        ElementKind::Notice,
        ElementKind::Project,
        ElementKind::Remote,
        ElementKind::RemoveProject,
        ElementKind::RepoHooks,
        ElementKind::Annotation,
        ElementKind::Copyfile,
        ElementKind::Linkfile,
    ];

    /// Tag name used in the XML form
    pub fn tag(self) -> &'static str {
        match self {
            ElementKind::Default => "default",
            ElementKind::ExtendProject => "extend-project",
            ElementKind::Include => "include",
            ElementKind::ManifestServer => "manifest-server",
            ElementKind::Notice => "notice",
            ElementKind::Project => "project",
            ElementKind::Remote => "remote",
            ElementKind::RemoveProject => "remove-project",
            ElementKind::RepoHooks => "repo-hooks",
            ElementKind::Annotation => "annotation",
            ElementKind::Copyfile => "copyfile",
            ElementKind::Linkfile => "linkfile",
        }
    }

    /// Structural rules for this kind
    pub fn rules(self) -> ElementRules {
        match self {
            ElementKind::Default => unique(&[]),
            ElementKind::ExtendProject => repeatable(&["name"], "name"),
            ElementKind::Include => repeatable(&["name"], "name"),
            ElementKind::ManifestServer => unique(&["url"]),
            ElementKind::Notice => ElementRules {
                required: &[],
                key: None,
                text_only: true,
            },
            ElementKind::Project => repeatable(&["name"], "name"),
            ElementKind::Remote => repeatable(&["name", "fetch"], "name"),
            ElementKind::RemoveProject => repeatable(&["name"], "name"),
            ElementKind::RepoHooks => unique(&["in-project", "enabled-list"]),
            ElementKind::Annotation => repeatable(&["name", "value"], "name"),
            ElementKind::Copyfile => repeatable(&["src", "dest"], "dest"),
            ElementKind::Linkfile => repeatable(&["src", "dest"], "dest"),
        }
    }

    /// Look up a kind by tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

impl FromStr for ElementKind {
    type Err = ArmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| ArmmError::UnknownElement(s.to_string()))
    }
}
