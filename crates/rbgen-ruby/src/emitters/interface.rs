use rbgen_core::classify::partition_by_visibility;
use rbgen_core::model::{Classifier, Element, Visibility};

use super::RenderContext;
use super::documentation::write_documentation;
use super::members;
use crate::code_writer::{CodeWriter, Separated};

/// An interface becomes a mixin module of method stubs. Attributes are not
/// rendered.
pub fn emit_interface(ctx: &RenderContext<'_>, element: &Element, interface: &Classifier) -> String {
    let options = ctx.options;
    let mut out = CodeWriter::new(options.indent_unit());

    write_documentation(&mut out, &element.documentation, options);
    out.write_line(format!("module {}", element.name));
    out.indent();

    let operations = partition_by_visibility(&interface.operations);
    let mut body = Separated::default();
    if !operations.public.is_empty() {
        body.next(&mut out);
        members::write_method_stubs(&mut out, &operations.public, options);
    }
    for visibility in [Visibility::Protected, Visibility::Private] {
        let bucket = operations.bucket(visibility);
        if !bucket.is_empty() {
            body.next(&mut out);
            members::write_restricted_section(&mut out, visibility, &[], bucket, options);
        }
    }

    out.outdent();
    out.write_line("end");
    out.data()
}
