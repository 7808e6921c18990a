use super::types::{Element, ElementId, ElementKind, Relationship};

/// Read-only model snapshot: an arena of elements plus the relationships
/// between them.
#[derive(Debug, Clone)]
pub struct Model {
    elements: Vec<Element>,
    relationships: Vec<Relationship>,
    root: ElementId,
}

impl Model {
    pub(crate) fn new(
        elements: Vec<Element>,
        relationships: Vec<Relationship>,
        root: ElementId,
    ) -> Self {
        Self {
            elements,
            relationships,
            root,
        }
    }

    /// The top-level package of the snapshot.
    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Owned children of a package, in declaration order. Empty for anything else.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        match &self.element(id).kind {
            ElementKind::Package(p) => &p.owned_elements,
            _ => &[],
        }
    }

    /// Relationships touching `id` that pass `filter`, in snapshot order.
    pub fn relationships_of<F>(&self, id: ElementId, filter: F) -> Vec<&Relationship>
    where
        F: Fn(&Relationship) -> bool,
    {
        self.relationships
            .iter()
            .filter(|r| r.touches(id) && filter(r))
            .collect()
    }

    /// Ancestors of `id` strictly below `root`, outermost first.
    ///
    /// Returns an empty chain when `id` is `root`, a direct child of `root`,
    /// or not contained in `root` at all.
    pub fn ancestors(&self, id: ElementId, root: ElementId) -> Vec<ElementId> {
        let mut chain = Vec::new();
        let mut current = self.element(id).parent;
        while let Some(parent) = current {
            if parent == root {
                chain.reverse();
                return chain;
            }
            chain.push(parent);
            current = self.element(parent).parent;
        }
        Vec::new()
    }

    /// Dotted name from the snapshot root down to `id`, e.g. `Shop.Billing.Invoice`.
    pub fn qualified_name(&self, id: ElementId) -> String {
        let mut names = vec![self.element(id).name.as_str()];
        let mut current = self.element(id).parent;
        while let Some(parent) = current {
            names.push(self.element(parent).name.as_str());
            current = self.element(parent).parent;
        }
        names.reverse();
        names.join(".")
    }

    /// Look up an element by its dotted qualified name.
    pub fn find_by_qualified_name(&self, qualified: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|e| self.qualified_name(e.id) == qualified)
            .map(|e| e.id)
    }
}
