use std::fmt;

/// Index of an element inside a [`super::Model`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named node of the containment tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub id: ElementId,
    /// Key used by relationships in the snapshot (explicit id, or the name).
    pub key: String,
    pub name: String,
    pub documentation: String,
    pub stereotype: Option<String>,
    /// Back reference to the owning package; the arena owns every element.
    pub parent: Option<ElementId>,
    pub kind: ElementKind,
}

impl Element {
    pub fn is_annotation(&self) -> bool {
        matches!(self.kind, ElementKind::Class(_))
            && self.stereotype.as_deref() == Some(ANNOTATION_STEREOTYPE)
    }

    pub fn classifier(&self) -> Option<&Classifier> {
        match &self.kind {
            ElementKind::Class(c) | ElementKind::Interface(c) => Some(c),
            _ => None,
        }
    }
}

/// Stereotype marking a class as an annotation type.
pub const ANNOTATION_STEREOTYPE: &str = "annotationType";

/// Closed set of element shapes the generator distinguishes.
#[derive(Debug, Clone)]
pub enum ElementKind {
    Package(Package),
    Class(Classifier),
    Interface(Classifier),
    /// Any other shape found in the snapshot; generation skips it.
    Other(String),
}

impl ElementKind {
    pub fn label(&self) -> &str {
        match self {
            ElementKind::Package(_) => "package",
            ElementKind::Class(_) => "class",
            ElementKind::Interface(_) => "interface",
            ElementKind::Other(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Package {
    pub owned_elements: Vec<ElementId>,
}

/// Members shared by classes and interfaces.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    /// Raw visibility marker from the model.
    pub visibility: String,
    pub is_static: bool,
    pub is_read_only: bool,
    /// Initial value, emitted verbatim.
    pub default_value: String,
    pub documentation: String,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub visibility: String,
    pub documentation: String,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    /// Parameters that appear in a method signature.
    pub fn non_return_parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(|p| p.direction != ParameterDirection::Return)
    }
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub direction: ParameterDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterDirection {
    In,
    InOut,
    Out,
    Return,
}

impl ParameterDirection {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "return" => ParameterDirection::Return,
            "out" => ParameterDirection::Out,
            "inout" => ParameterDirection::InOut,
            _ => ParameterDirection::In,
        }
    }
}

/// A relationship between two elements.
#[derive(Debug, Clone)]
pub enum Relationship {
    /// `source` inherits from `target`.
    Generalization { source: ElementId, target: ElementId },
    /// `source` implements `target`.
    InterfaceRealization { source: ElementId, target: ElementId },
    Association(Association),
}

impl Relationship {
    pub fn kind(&self) -> &'static str {
        match self {
            Relationship::Generalization { .. } => "generalization",
            Relationship::InterfaceRealization { .. } => "interfaceRealization",
            Relationship::Association(_) => "association",
        }
    }

    /// Whether `id` sits at either end.
    pub fn touches(&self, id: ElementId) -> bool {
        match self {
            Relationship::Generalization { source, target }
            | Relationship::InterfaceRealization { source, target } => {
                *source == id || *target == id
            }
            Relationship::Association(a) => a.end1.reference == id || a.end2.reference == id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Association {
    /// Empty when the association is unnamed.
    pub name: String,
    pub end1: AssociationEnd,
    pub end2: AssociationEnd,
}

#[derive(Debug, Clone, Copy)]
pub struct AssociationEnd {
    pub reference: ElementId,
    pub navigable: bool,
}
