use rbgen_core::model::Element;

/// Annotation types have no Ruby counterpart; their file holds a marker only.
pub fn emit_annotation(element: &Element) -> String {
    format!("# Annotation type: {}", element.name)
}
