pub mod annotation;
pub mod class;
pub mod documentation;
pub mod interface;
pub mod members;
pub mod requires;

use rbgen_core::GeneratedFile;
use rbgen_core::config::GenerationOptions;
use rbgen_core::model::{ElementId, ElementKind, Model};

use crate::code_writer::CodeWriter;

/// Extension of every emitted file.
pub const FILE_EXTENSION: &str = "rb";

/// Everything a renderer may consult besides the element itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub model: &'a Model,
    /// Element generation started from; package paths are relative to it.
    pub root: ElementId,
    pub options: &'a GenerationOptions,
}

/// Render one class, annotation, or interface into a file named after its
/// file stem. Returns `None` for packages and unsupported shapes.
pub fn render_element(
    model: &Model,
    root: ElementId,
    id: ElementId,
    options: &GenerationOptions,
) -> Option<GeneratedFile> {
    let ctx = RenderContext {
        model,
        root,
        options,
    };
    let element = model.element(id);
    let content = match &element.kind {
        ElementKind::Class(_) if element.is_annotation() => annotation::emit_annotation(element),
        ElementKind::Class(class) => class::emit_class(&ctx, id, class),
        ElementKind::Interface(interface) => interface::emit_interface(&ctx, element, interface),
        ElementKind::Package(_) | ElementKind::Other(_) => return None,
    };

    Some(GeneratedFile {
        path: format!("{}.{}", CodeWriter::file_name(&element.name), FILE_EXTENSION),
        content,
    })
}
