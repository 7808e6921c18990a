use log::warn;
use rbgen_core::classify::{self, AssociatedMember, Partition};
use rbgen_core::config::GenerationOptions;
use rbgen_core::model::{Attribute, Classifier, ElementId, Operation, Visibility};

use super::RenderContext;
use super::documentation::write_documentation;
use super::members::{self, HeldReference};
use super::requires::require_line;
use crate::code_writer::{CodeWriter, Separated};

/// Structural facts about one class, gathered once before rendering.
#[derive(Debug)]
pub struct ClassFacts<'a> {
    pub id: ElementId,
    /// First generalization target; further ones are not representable.
    pub superclass: Option<ElementId>,
    /// First realized interface; further ones are not representable.
    pub interface: Option<ElementId>,
    pub associated: Vec<AssociatedMember>,
    /// Non-static attributes in declaration order, whatever their visibility.
    pub instance_attributes: Vec<&'a Attribute>,
    pub attributes: Partition<'a, Attribute>,
    pub operations: Partition<'a, Operation>,
    pub statics: Vec<&'a Attribute>,
    pub package_path: Option<String>,
}

impl<'a> ClassFacts<'a> {
    pub fn collect(ctx: &RenderContext<'_>, id: ElementId, class: &'a Classifier) -> Self {
        let model = ctx.model;
        let name = &model.element(id).name;

        let superclasses = classify::superclasses_of(model, id);
        if superclasses.len() > 1 {
            warn!(
                "class `{name}` has {} superclasses; only the first is generated",
                superclasses.len()
            );
        }
        let interfaces = classify::realized_interfaces_of(model, id);
        if interfaces.len() > 1 {
            warn!(
                "class `{name}` realizes {} interfaces; only the first is generated",
                interfaces.len()
            );
        }

        let instance_attributes: Vec<&Attribute> =
            class.attributes.iter().filter(|a| !a.is_static).collect();

        Self {
            id,
            superclass: superclasses.first().copied(),
            interface: interfaces.first().copied(),
            associated: classify::associated_members_of(model, id),
            attributes: classify::partition_by_visibility(instance_attributes.iter().copied()),
            instance_attributes,
            operations: classify::partition_by_visibility(&class.operations),
            statics: class.attributes.iter().filter(|a| a.is_static).collect(),
            package_path: classify::package_path_of(model, id, ctx.root),
        }
    }

    fn has_restricted(&self, visibility: Visibility) -> bool {
        !self.attributes.bucket(visibility).is_empty()
            || !self.operations.bucket(visibility).is_empty()
    }
}

/// Blocks of a class body, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySection {
    Include,
    AssociationAccessors,
    PublicAttributes,
    SharedState,
    Initialize,
    PublicOperations,
    Protected,
    Private,
    ToString,
}

/// What switches a section on: a structural fact or a generation option.
#[derive(Clone, Copy)]
enum Gate {
    Fact(fn(&ClassFacts<'_>) -> bool),
    Flag(fn(&GenerationOptions) -> bool),
}

const BODY_LAYOUT: [(BodySection, Gate); 9] = [
    (BodySection::Include, Gate::Fact(realizes_interface)),
    (BodySection::AssociationAccessors, Gate::Fact(holds_associations)),
    (BodySection::PublicAttributes, Gate::Fact(has_public_attributes)),
    (BodySection::SharedState, Gate::Fact(has_statics)),
    (BodySection::Initialize, Gate::Flag(initialize_method)),
    (BodySection::PublicOperations, Gate::Fact(has_public_operations)),
    (BodySection::Protected, Gate::Fact(has_protected)),
    (BodySection::Private, Gate::Fact(has_private)),
    (BodySection::ToString, Gate::Flag(to_string_method)),
];

fn realizes_interface(facts: &ClassFacts<'_>) -> bool {
    facts.interface.is_some()
}

fn holds_associations(facts: &ClassFacts<'_>) -> bool {
    !facts.associated.is_empty()
}

fn has_public_attributes(facts: &ClassFacts<'_>) -> bool {
    !facts.attributes.public.is_empty()
}

fn has_statics(facts: &ClassFacts<'_>) -> bool {
    !facts.statics.is_empty()
}

fn has_public_operations(facts: &ClassFacts<'_>) -> bool {
    !facts.operations.public.is_empty()
}

fn has_protected(facts: &ClassFacts<'_>) -> bool {
    facts.has_restricted(Visibility::Protected)
}

fn has_private(facts: &ClassFacts<'_>) -> bool {
    facts.has_restricted(Visibility::Private)
}

fn initialize_method(options: &GenerationOptions) -> bool {
    options.initialize_method
}

fn to_string_method(options: &GenerationOptions) -> bool {
    options.to_string_method
}

/// Sections a class body will contain, in order.
pub fn plan(facts: &ClassFacts<'_>, options: &GenerationOptions) -> Vec<BodySection> {
    BODY_LAYOUT
        .iter()
        .filter(|(_, gate)| match gate {
            Gate::Fact(applies) => applies(facts),
            Gate::Flag(enabled) => enabled(options),
        })
        .map(|(section, _)| *section)
        .collect()
}

/// Ruby constant for a class, qualified by its package path.
fn constant_name(ctx: &RenderContext<'_>, id: ElementId) -> String {
    let name = &ctx.model.element(id).name;
    match classify::package_path_of(ctx.model, id, ctx.root) {
        Some(path) => format!("{}::{name}", module_name(&path)),
        None => name.clone(),
    }
}

/// `Billing.Tax` → `Billing::Tax`.
fn module_name(package_path: &str) -> String {
    package_path.replace('.', "::")
}

/// Emit the full file for a (non-annotation) class.
pub fn emit_class(ctx: &RenderContext<'_>, id: ElementId, class: &Classifier) -> String {
    let options = ctx.options;
    let element = ctx.model.element(id);
    let facts = ClassFacts::collect(ctx, id, class);
    let mut out = CodeWriter::new(options.indent_unit());
    let mut file = Separated::default();

    // File dependencies
    if !facts.associated.is_empty() {
        file.next(&mut out);
        for member in &facts.associated {
            out.write_line(require_line(ctx, id, member.element));
        }
    }
    if let Some(superclass) = facts.superclass {
        file.next(&mut out);
        out.write_line(require_line(ctx, id, superclass));
    }
    if let Some(interface) = facts.interface {
        file.next(&mut out);
        out.write_line(require_line(ctx, id, interface));
    }

    file.next(&mut out);
    let modules: Vec<&str> = facts
        .package_path
        .as_deref()
        .map(|path| path.split('.').collect())
        .unwrap_or_default();
    for (depth, module) in modules.iter().enumerate() {
        // the enclosing package's documentation sits on the innermost module
        if depth + 1 == modules.len() {
            if let Some(parent) = element.parent {
                write_documentation(&mut out, &ctx.model.element(parent).documentation, options);
            }
        }
        out.write_line(format!("module {module}"));
        out.indent();
    }

    write_documentation(&mut out, &element.documentation, options);
    match facts.superclass {
        Some(superclass) => out.write_line(format!(
            "class {} < {}",
            element.name,
            constant_name(ctx, superclass)
        )),
        None => out.write_line(format!("class {}", element.name)),
    }

    out.indent();
    write_body(ctx, &facts, &mut out);
    out.outdent();
    out.write_line("end");

    for _ in &modules {
        out.outdent();
        out.write_line("end");
    }

    out.data()
}

fn write_body(ctx: &RenderContext<'_>, facts: &ClassFacts<'_>, out: &mut CodeWriter) {
    let options = ctx.options;
    let mut body = Separated::default();
    let mut restricted_open = false;

    for section in plan(facts, options) {
        body.next(out);
        match section {
            BodySection::Include => {
                if let Some(interface) = facts.interface {
                    out.write_line(format!("include {}", ctx.model.element(interface).name));
                }
            }
            BodySection::AssociationAccessors => {
                members::write_association_accessors(out, &facts.associated);
            }
            BodySection::PublicAttributes => {
                members::write_attribute_accessors(out, &facts.attributes.public, options);
            }
            BodySection::SharedState => members::write_shared_state(out, &facts.statics),
            BodySection::Initialize => {
                let held: Vec<HeldReference> = facts
                    .associated
                    .iter()
                    .map(|m| HeldReference {
                        member: m.stem.clone(),
                        constant: constant_name(ctx, m.element),
                    })
                    .collect();
                members::write_initialize(out, &facts.instance_attributes, &held);
            }
            BodySection::PublicOperations => {
                members::write_method_stubs(out, &facts.operations.public, options);
            }
            BodySection::Protected | BodySection::Private => {
                let visibility = if section == BodySection::Protected {
                    Visibility::Protected
                } else {
                    Visibility::Private
                };
                members::write_restricted_section(
                    out,
                    visibility,
                    facts.attributes.bucket(visibility),
                    facts.operations.bucket(visibility),
                    options,
                );
                restricted_open = true;
            }
            BodySection::ToString => {
                // `to_s` must stay callable after a protected/private section
                if restricted_open {
                    out.write_line(Visibility::Public.as_str());
                    out.indent();
                    members::write_to_s(out);
                    out.outdent();
                } else {
                    members::write_to_s(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbgen_core::model::{ElementKind, Model};
    use rbgen_core::{parse, transform};

    const MODEL: &str = r#"
name: Shop
ownedElements:
  - kind: class
    name: Cart
    attributes:
      - { name: total, visibility: public }
      - { name: owner, visibility: private }
      - { name: LIMIT, visibility: public, isStatic: true, isReadOnly: true, defaultValue: "5" }
    operations:
      - { name: checkout, visibility: protected }
  - { kind: class, name: Empty }
  - { kind: class, name: Item }
  - { kind: interface, name: Priced }
relationships:
  - { kind: interfaceRealization, source: Cart, target: Priced }
  - kind: association
    end1: { reference: Cart, navigable: false }
    end2: { reference: Item, navigable: true }
"#;

    fn model() -> Model {
        transform::build_model(&parse::from_yaml(MODEL).unwrap()).unwrap()
    }

    fn planned(model: &Model, name: &str, options: &GenerationOptions) -> Vec<BodySection> {
        let ctx = RenderContext {
            model,
            root: model.root(),
            options,
        };
        let id = model.find_by_qualified_name(name).unwrap();
        let ElementKind::Class(class) = &model.element(id).kind else {
            panic!("expected class");
        };
        let facts = ClassFacts::collect(&ctx, id, class);
        plan(&facts, options)
    }

    #[test]
    fn test_plan_full_class() {
        let model = model();
        let sections = planned(&model, "Shop.Cart", &GenerationOptions::default());
        assert_eq!(
            sections,
            vec![
                BodySection::Include,
                BodySection::AssociationAccessors,
                BodySection::PublicAttributes,
                BodySection::SharedState,
                BodySection::Initialize,
                BodySection::Protected,
                BodySection::Private,
                BodySection::ToString,
            ]
        );
    }

    #[test]
    fn test_plan_empty_class_follows_flags() {
        let model = model();
        let all_off = GenerationOptions {
            initialize_method: false,
            to_string_method: false,
            ..GenerationOptions::default()
        };
        assert!(planned(&model, "Shop.Empty", &all_off).is_empty());

        let only_to_s = GenerationOptions {
            initialize_method: false,
            ..GenerationOptions::default()
        };
        assert_eq!(
            planned(&model, "Shop.Empty", &only_to_s),
            vec![BodySection::ToString]
        );
    }

    #[test]
    fn test_static_attributes_do_not_open_sections() {
        let model = transform::build_model(
            &parse::from_yaml(
                r#"
name: Shop
ownedElements:
  - kind: class
    name: Config
    attributes:
      - { name: SECRET, visibility: private, isStatic: true, isReadOnly: true }
      - { name: hits, visibility: protected, isStatic: true }
"#,
            )
            .unwrap(),
        )
        .unwrap();
        let options = GenerationOptions {
            initialize_method: false,
            to_string_method: false,
            ..GenerationOptions::default()
        };
        assert_eq!(
            planned(&model, "Shop.Config", &options),
            vec![BodySection::SharedState]
        );
    }
}
