use serde::{Deserialize, Serialize};

/// Top-level model snapshot exported by the modeling host. The document itself
/// is the root package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned_elements: Vec<ElementNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipNode>,
}

/// A package, class, interface, or any other owned element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    /// `package`, `class`, `interface` (or the `UML*` host type names).
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stereotype: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owned_elements: Vec<ElementNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeNode>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<OperationNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    pub name: String,

    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[serde(default)]
    pub is_static: bool,

    #[serde(default)]
    pub is_read_only: bool,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_value: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationNode {
    pub name: String,

    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub documentation: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterNode {
    pub name: String,

    /// `in`, `inout`, `out`, or `return`.
    #[serde(default = "default_direction")]
    pub direction: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RelationshipNode {
    Generalization {
        source: String,
        target: String,
    },
    InterfaceRealization {
        source: String,
        target: String,
    },
    Association {
        #[serde(default, skip_serializing_if = "String::is_empty")]
        name: String,
        end1: AssociationEndNode,
        end2: AssociationEndNode,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationEndNode {
    pub reference: String,

    /// Ends are navigable unless the host says otherwise.
    #[serde(default = "default_navigable")]
    pub navigable: bool,
}

fn default_visibility() -> String {
    "public".to_string()
}

fn default_direction() -> String {
    "in".to_string()
}

fn default_navigable() -> bool {
    true
}
