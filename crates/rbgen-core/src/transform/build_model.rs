use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::error::TransformError;
use crate::model::*;
use crate::parse::document::{
    AssociationEndNode, AttributeNode, ElementNode, ModelDocument, OperationNode,
    RelationshipNode,
};

/// Resolve a parsed snapshot into the arena-backed [`Model`].
pub fn build_model(doc: &ModelDocument) -> Result<Model, TransformError> {
    let mut builder = Builder::default();

    // Phase 1: Containment tree, depth first in declaration order
    let root_key = doc.id.clone().unwrap_or_else(|| doc.name.clone());
    let root = builder.register(
        doc.id.as_deref(),
        root_key,
        &doc.name,
        None,
        Element {
            id: ElementId(0),
            key: String::new(),
            name: doc.name.clone(),
            documentation: doc.documentation.clone(),
            stereotype: None,
            parent: None,
            kind: ElementKind::Package(Package::default()),
        },
    )?;
    for child in &doc.owned_elements {
        builder.add_node(root, &doc.name, child)?;
    }

    // Phase 2: Relationships, resolved against element keys
    let relationships = doc
        .relationships
        .iter()
        .map(|r| builder.resolve_relationship(r))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "built model `{}` with {} elements and {} relationships",
        doc.name,
        builder.elements.len(),
        relationships.len()
    );

    Ok(Model::new(builder.elements, relationships, root))
}

#[derive(Default)]
struct Builder {
    elements: Vec<Element>,
    /// Lookup keys (explicit id or name, plus the qualified name) to elements.
    keys: IndexMap<String, Vec<ElementId>>,
    explicit_ids: HashSet<String>,
}

impl Builder {
    fn register(
        &mut self,
        explicit_id: Option<&str>,
        key: String,
        qualified: &str,
        parent: Option<ElementId>,
        mut element: Element,
    ) -> Result<ElementId, TransformError> {
        if let Some(explicit) = explicit_id {
            if !self.explicit_ids.insert(explicit.to_string()) {
                return Err(TransformError::DuplicateId(explicit.to_string()));
            }
        }

        let id = ElementId(self.elements.len());
        element.id = id;
        element.key = key.clone();
        element.parent = parent;
        self.elements.push(element);

        self.keys.entry(key.clone()).or_default().push(id);
        if qualified != key {
            self.keys.entry(qualified.to_string()).or_default().push(id);
        }

        if let Some(parent) = parent {
            if let ElementKind::Package(p) = &mut self.elements[parent.0].kind {
                p.owned_elements.push(id);
            }
        }

        Ok(id)
    }

    fn add_node(
        &mut self,
        parent: ElementId,
        parent_qualified: &str,
        node: &ElementNode,
    ) -> Result<ElementId, TransformError> {
        let kind = match node.kind.as_str() {
            "package" | "model" | "UMLPackage" | "UMLModel" => {
                ElementKind::Package(Package::default())
            }
            "class" | "UMLClass" => ElementKind::Class(classifier(node)),
            "interface" | "UMLInterface" => ElementKind::Interface(classifier(node)),
            other => ElementKind::Other(other.to_string()),
        };
        let is_package = matches!(kind, ElementKind::Package(_));

        let qualified = format!("{parent_qualified}.{}", node.name);
        let key = node.id.clone().unwrap_or_else(|| node.name.clone());
        let id = self.register(
            node.id.as_deref(),
            key,
            &qualified,
            Some(parent),
            Element {
                id: ElementId(0),
                key: String::new(),
                name: node.name.clone(),
                documentation: node.documentation.clone(),
                stereotype: node.stereotype.clone(),
                parent: None,
                kind,
            },
        )?;

        if is_package {
            for child in &node.owned_elements {
                self.add_node(id, &qualified, child)?;
            }
        } else if !node.owned_elements.is_empty() {
            warn!(
                "ignoring {} element(s) nested in {} `{}`",
                node.owned_elements.len(),
                node.kind,
                qualified
            );
        }

        Ok(id)
    }

    fn lookup(&self, relationship: &'static str, key: &str) -> Result<ElementId, TransformError> {
        match self.keys.get(key).map(Vec::as_slice) {
            Some([id]) => Ok(*id),
            Some(_) => Err(TransformError::AmbiguousReference {
                relationship,
                key: key.to_string(),
            }),
            None => Err(TransformError::UnknownReference {
                relationship,
                key: key.to_string(),
            }),
        }
    }

    fn resolve_end(
        &self,
        end: &AssociationEndNode,
    ) -> Result<AssociationEnd, TransformError> {
        Ok(AssociationEnd {
            reference: self.lookup("association", &end.reference)?,
            navigable: end.navigable,
        })
    }

    fn resolve_relationship(
        &self,
        node: &RelationshipNode,
    ) -> Result<Relationship, TransformError> {
        Ok(match node {
            RelationshipNode::Generalization { source, target } => Relationship::Generalization {
                source: self.lookup("generalization", source)?,
                target: self.lookup("generalization", target)?,
            },
            RelationshipNode::InterfaceRealization { source, target } => {
                Relationship::InterfaceRealization {
                    source: self.lookup("interfaceRealization", source)?,
                    target: self.lookup("interfaceRealization", target)?,
                }
            }
            RelationshipNode::Association { name, end1, end2 } => {
                Relationship::Association(Association {
                    name: name.clone(),
                    end1: self.resolve_end(end1)?,
                    end2: self.resolve_end(end2)?,
                })
            }
        })
    }
}

fn classifier(node: &ElementNode) -> Classifier {
    Classifier {
        attributes: node.attributes.iter().map(attribute).collect(),
        operations: node.operations.iter().map(operation).collect(),
    }
}

fn attribute(node: &AttributeNode) -> Attribute {
    Attribute {
        name: node.name.clone(),
        visibility: node.visibility.clone(),
        is_static: node.is_static,
        is_read_only: node.is_read_only,
        default_value: node.default_value.clone(),
        documentation: node.documentation.clone(),
    }
}

fn operation(node: &OperationNode) -> Operation {
    Operation {
        name: node.name.clone(),
        visibility: node.visibility.clone(),
        documentation: node.documentation.clone(),
        parameters: node
            .parameters
            .iter()
            .map(|p| Parameter {
                name: p.name.clone(),
                direction: ParameterDirection::from_marker(&p.direction),
            })
            .collect(),
    }
}
