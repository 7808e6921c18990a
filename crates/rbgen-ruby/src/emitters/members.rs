use rbgen_core::classify::{visibility_of, AssociatedMember};
use rbgen_core::config::GenerationOptions;
use rbgen_core::model::{Attribute, Operation, Visibility};

use super::documentation::write_documentation;
use crate::code_writer::{CodeWriter, Separated};

/// Body line of every generated method stub. A comment, so calling an
/// unimplemented stub returns `nil`.
pub const NOT_IMPLEMENTED: &str = "# TODO: Implement this method here.";

/// Body of the generated `to_s`.
pub const TO_S_PLACEHOLDER: &str =
    "\"Your string representation of the object will be written here.\"";

/// Accessors for one visibility bucket of instance attributes.
///
/// With `use_attribute_accessor` the bucket collapses into one `attr_reader`
/// line for read-only attributes and one `attr_accessor` line for the rest.
/// Otherwise every attribute gets a getter, and mutable ones a setter.
pub fn write_attribute_accessors(
    out: &mut CodeWriter,
    attributes: &[&Attribute],
    options: &GenerationOptions,
) {
    if options.use_attribute_accessor {
        write_accessor_declarations(out, attributes, options);
    } else {
        write_accessor_methods(out, attributes, options);
    }
}

fn write_accessor_declarations(
    out: &mut CodeWriter,
    attributes: &[&Attribute],
    options: &GenerationOptions,
) {
    for attribute in attributes {
        write_documentation(out, &attribute.documentation, options);
    }

    let (readers, accessors): (Vec<&Attribute>, Vec<&Attribute>) =
        attributes.iter().copied().partition(|a| a.is_read_only);
    if !readers.is_empty() {
        out.write_line(format!("attr_reader {}", symbols(readers.iter().map(|a| a.name.as_str()))));
    }
    if !accessors.is_empty() {
        out.write_line(format!(
            "attr_accessor {}",
            symbols(accessors.iter().map(|a| a.name.as_str()))
        ));
    }
}

fn write_accessor_methods(
    out: &mut CodeWriter,
    attributes: &[&Attribute],
    options: &GenerationOptions,
) {
    let mut blocks = Separated::default();
    for attribute in attributes {
        blocks.next(out);
        write_documentation(out, &attribute.documentation, options);
        write_method(out, &format!("def {}", attribute.name), &format!("@{}", attribute.name));

        if !attribute.is_read_only {
            blocks.next(out);
            write_method(
                out,
                &format!("def {}=(value)", attribute.name),
                &format!("@{} = value", attribute.name),
            );
        }
    }
}

/// `attr_accessor` for every associated class held by reference.
pub fn write_association_accessors(out: &mut CodeWriter, associated: &[AssociatedMember]) {
    out.write_line(format!(
        "attr_accessor {}",
        symbols(associated.iter().map(|m| m.stem.as_str()))
    ));
}

/// Constants for read-only statics, then class variables for the rest.
pub fn write_shared_state(out: &mut CodeWriter, statics: &[&Attribute]) {
    for attribute in statics.iter().filter(|a| a.is_read_only) {
        out.write_line(format!("{} = {}", attribute.name, initial_value(attribute)));
        if visibility_of(*attribute) == Some(Visibility::Private) {
            out.write_line(format!("private_constant :{}", attribute.name));
        }
    }
    for attribute in statics.iter().filter(|a| !a.is_read_only) {
        out.write_line(format!("@@{} = {}", attribute.name, initial_value(attribute)));
    }
}

fn initial_value(attribute: &Attribute) -> &str {
    let value = attribute.default_value.trim();
    if value.is_empty() { "nil" } else { value }
}

/// A reference held through a navigable association.
#[derive(Debug, Clone)]
pub struct HeldReference {
    pub member: String,
    /// Ruby constant to instantiate, e.g. `Billing::Invoice`.
    pub constant: String,
}

/// `initialize` taking every instance attribute, plus a fresh instance for
/// each held reference.
pub fn write_initialize(out: &mut CodeWriter, attributes: &[&Attribute], held: &[HeldReference]) {
    let params: Vec<&str> = attributes.iter().map(|a| a.name.as_str()).collect();
    out.write_line(signature("initialize", &params));
    out.indent();
    for name in &params {
        out.write_line(format!("@{name} = {name}"));
    }
    for reference in held {
        out.write_line(format!("@{} = {}.new", reference.member, reference.constant));
    }
    out.outdent();
    out.write_line("end");
}

/// One stub per operation, separated by blank lines.
pub fn write_method_stubs(
    out: &mut CodeWriter,
    operations: &[&Operation],
    options: &GenerationOptions,
) {
    let mut blocks = Separated::default();
    for operation in operations {
        blocks.next(out);
        write_documentation(out, &operation.documentation, options);
        let params: Vec<&str> = operation
            .non_return_parameters()
            .map(|p| p.name.as_str())
            .collect();
        write_method(out, &signature(&operation.name, &params), NOT_IMPLEMENTED);
    }
}

pub fn write_to_s(out: &mut CodeWriter) {
    write_method(out, "def to_s", TO_S_PLACEHOLDER);
}

/// A `protected` or `private` section: the marker line, then its accessors and
/// stubs one level deeper.
pub fn write_restricted_section(
    out: &mut CodeWriter,
    visibility: Visibility,
    attributes: &[&Attribute],
    operations: &[&Operation],
    options: &GenerationOptions,
) {
    out.write_line(visibility.as_str());
    out.indent();
    let mut blocks = Separated::default();
    if !attributes.is_empty() {
        blocks.next(out);
        write_attribute_accessors(out, attributes, options);
    }
    if !operations.is_empty() {
        blocks.next(out);
        write_method_stubs(out, operations, options);
    }
    out.outdent();
}

fn write_method(out: &mut CodeWriter, header: &str, body: &str) {
    out.write_line(header);
    out.indent();
    out.write_line(body);
    out.outdent();
    out.write_line("end");
}

fn signature(name: &str, params: &[&str]) -> String {
    if params.is_empty() {
        format!("def {name}")
    } else {
        format!("def {name}({})", params.join(", "))
    }
}

fn symbols<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.map(|n| format!(":{n}")).collect::<Vec<_>>().join(", ")
}
