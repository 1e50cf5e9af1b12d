//! Manifest document model for git-repo compatible manifests
//!
//! A manifest is a tree of typed elements rooted at `<manifest>`. The
//! [`ElementKind`] registry fixes, per element kind, the required
//! attributes, whether siblings may repeat (and which attribute identifies
//! them), and whether the payload is text. Elements are created and updated
//! with `set`/`upsert`, removed with `remove`, and queried with `list`.
//! The `p*` variants first locate a (possibly nested) `<project>` by name.
//!
//! # Example Manifest
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <manifest>
//!   <remote name="origin" fetch="https://github.com/org"/>
//!   <default revision="main" remote="origin"/>
//!   <project name="backend/auth-service" path="services/auth">
//!     <annotation name="owner" value="security"/>
//!     <copyfile src="Makefile" dest="Makefile"/>
//!   </project>
//! </manifest>
//! ```

mod element;
mod ops;
mod project;
mod query;
mod registry;
mod store;
mod xml;

pub use element::{Attributes, Element};
pub use query::{AttrFilter, Matcher, Query, QueryOutput, QueryRecord};
pub use registry::{ElementKind, ElementRules, ROOT_TAG, TEXT_KEY};
pub use store::{Manifest, ManifestStore, DEFAULT_FILENAME};
pub use xml::DEFAULT_INDENT;
