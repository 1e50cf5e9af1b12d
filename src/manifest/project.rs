//! Project scoped operations
//!
//! `pset`, `premove` and `plist` first locate a `<project>` by name with a
//! depth-first walk over project elements (nested projects included) and
//! then apply the plain element operation to that project.

use super::element::{Attributes, Element};
use super::query::{Query, QueryOutput};
use super::registry::ElementKind;
use super::store::Manifest;
use crate::Result;

fn is_project_named(element: &Element, name: &str) -> bool {
    match ElementKind::Project.rules().key {
        Some(key) => element.is(ElementKind::Project) && element.get(key) == Some(name),
        None => false,
    }
}

impl Element {
    /// First project named `name` below this element, in document order
    pub fn find_project(&self, name: &str) -> Option<&Element> {
        for child in self.children_of(ElementKind::Project) {
            if is_project_named(child, name) {
                return Some(child);
            }
            if let Some(found) = child.find_project(name) {
                return Some(found);
            }
        }
        None
    }

    /// Mutable variant of [`Element::find_project`]
    pub fn find_project_mut(&mut self, name: &str) -> Option<&mut Element> {
        for child in self
            .children
            .iter_mut()
            .filter(|c| c.is(ElementKind::Project))
        {
            if is_project_named(child, name) {
                return Some(child);
            }
            if let Some(found) = child.find_project_mut(name) {
                return Some(found);
            }
        }
        None
    }
}

impl Manifest {
    /// Upsert an element inside the named project
    ///
    /// A missing project is a no-op.
    pub fn pset(&mut self, project: &str, kind: ElementKind, attrs: &Attributes) -> Result<&mut Self> {
        tracing::debug!(project, element = %kind, "Action: pset");

        match self.root_mut().find_project_mut(project) {
            Some(target) => {
                target.upsert(kind, attrs)?;
            }
            None => tracing::debug!(project, "Project not found"),
        }
        Ok(self)
    }

    /// Remove an element (or some of its attributes) inside the named project
    ///
    /// A missing project is a no-op.
    pub fn premove(
        &mut self,
        project: &str,
        kind: ElementKind,
        name: &str,
        attrs: &[&str],
    ) -> Result<&mut Self> {
        tracing::debug!(project, element = %kind, name, "Action: premove");

        match self.root_mut().find_project_mut(project) {
            Some(target) => {
                target.remove(kind, name, attrs)?;
            }
            None => tracing::debug!(project, "Project not found"),
        }
        Ok(self)
    }

    /// List elements inside the named project
    ///
    /// Returns an empty list when no such project exists.
    pub fn plist(&self, project: &str, query: &Query) -> Vec<QueryOutput> {
        tracing::debug!(project, element = %query.kind(), "Action: plist");
        plist_in(self.root(), project, query)
    }
}

// A matching project ends the search at its level; a descent into a
// non-matching project only ends it when it produced results.
fn plist_in(root: &Element, project: &str, query: &Query) -> Vec<QueryOutput> {
    let mut results = Vec::new();

    for child in root.children_of(ElementKind::Project) {
        if is_project_named(child, project) {
            return child.list(query);
        }
        results = plist_in(child, project, query);
        if !results.is_empty() {
            break;
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> Attributes {
        Attributes::from([("name", name)])
    }

    fn annotation(name: &str, value: &str) -> Attributes {
        Attributes::from([("name", name), ("value", value)])
    }

    fn nested() -> Manifest {
        // <project name="A"><project name="B"/></project><project name="C"/>
        let mut manifest = Manifest::new();
        manifest
            .set(ElementKind::Project, &project("A"))
            .unwrap()
            .set(ElementKind::Project, &project("C"))
            .unwrap()
            .pset("A", ElementKind::Project, &project("B"))
            .unwrap();
        manifest
    }

    #[test]
    fn test_pset_and_plist() {
        let mut manifest = Manifest::new();
        manifest.set(ElementKind::Project, &project("A")).unwrap();
        manifest
            .pset("A", ElementKind::Annotation, &annotation("k", "v"))
            .unwrap();

        let results = manifest.plist("A", &Query::new(ElementKind::Annotation));
        assert_eq!(results.len(), 1);
        assert_eq!(
            results[0].as_record().unwrap().attrs,
            annotation("k", "v")
        );

        assert!(manifest
            .plist("B", &Query::new(ElementKind::Annotation))
            .is_empty());
    }

    #[test]
    fn test_pset_nested_project() {
        let mut manifest = nested();
        manifest
            .pset("B", ElementKind::Annotation, &annotation("deep", "1"))
            .unwrap();

        let a = manifest.root().find_project("A").unwrap();
        let b = a.find_project("B").unwrap();
        assert_eq!(b.children.len(), 1);
        assert!(a.find(ElementKind::Annotation).is_none());

        let values = manifest.plist(
            "B",
            &Query::new(ElementKind::Annotation).project("value"),
        );
        assert_eq!(values, vec![QueryOutput::Value("1".to_string())]);
    }

    #[test]
    fn test_pset_missing_project_is_noop() {
        let mut manifest = nested();
        let before = manifest.clone();
        manifest
            .pset("Z", ElementKind::Annotation, &annotation("k", "v"))
            .unwrap();
        manifest.premove("Z", ElementKind::Annotation, "k", &[]).unwrap();
        assert_eq!(manifest, before);
    }

    #[test]
    fn test_first_match_wins() {
        // Same name at two depths: the shallower, earlier one is used
        let mut manifest = nested();
        manifest.pset("A", ElementKind::Project, &project("C")).unwrap();
        manifest
            .pset("C", ElementKind::Annotation, &annotation("k", "v"))
            .unwrap();

        let a = manifest.root().find_project("A").unwrap();
        let inner_c = a.find_project("C").unwrap();
        assert_eq!(inner_c.children.len(), 1);

        let outer_c = manifest
            .root()
            .children_of(ElementKind::Project)
            .find(|p| p.get("name") == Some("C"))
            .unwrap();
        assert!(outer_c.children.is_empty());
    }

    #[test]
    fn test_premove() {
        let mut manifest = nested();
        manifest
            .pset("B", ElementKind::Annotation, &annotation("k", "v"))
            .unwrap();

        let err = manifest
            .premove("B", ElementKind::Annotation, "k", &["value"])
            .unwrap_err();
        assert!(matches!(err, crate::ArmmError::Validation(_)));

        manifest.premove("B", ElementKind::Annotation, "k", &[]).unwrap();
        assert!(manifest
            .plist("B", &Query::new(ElementKind::Annotation))
            .is_empty());
    }

    #[test]
    fn test_plist_continues_past_empty_subtrees() {
        let mut manifest = nested();
        manifest
            .pset("C", ElementKind::Annotation, &annotation("k", "v"))
            .unwrap();

        let results = manifest.plist("C", &Query::new(ElementKind::Annotation));
        assert_eq!(results.len(), 1);
    }

    fn names(results: &[QueryOutput]) -> Vec<&str> {
        results.iter().filter_map(QueryOutput::as_value).collect()
    }

    #[test]
    fn test_plist_nested_match_shadows_later_sibling() {
        let manifest = Manifest::parse(
            r#"<manifest>
                <project name="A">
                    <project name="B"><annotation name="k" value="1"/></project>
                </project>
                <project name="B"><annotation name="z" value="2"/></project>
            </manifest>"#,
        )
        .unwrap();

        let results = manifest.plist("B", &Query::new(ElementKind::Annotation).project("name"));
        assert_eq!(names(&results), vec!["k"]);
    }

    #[test]
    fn test_plist_empty_match_ends_search() {
        let manifest = Manifest::parse(
            r#"<manifest>
                <project name="B"/>
                <project name="B"><annotation name="z" value="2"/></project>
            </manifest>"#,
        )
        .unwrap();

        assert!(manifest
            .plist("B", &Query::new(ElementKind::Annotation))
            .is_empty());
    }
}
