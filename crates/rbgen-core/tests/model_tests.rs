use rbgen_core::classify;
use rbgen_core::model::{ElementKind, Model, Visibility};
use rbgen_core::{parse, transform};

const SHOP: &str = include_str!("fixtures/shop.yaml");
const SCHOOL: &str = include_str!("fixtures/school.yaml");

fn load(yaml: &str) -> Model {
    let doc = parse::from_yaml(yaml).unwrap();
    transform::build_model(&doc).unwrap()
}

#[test]
fn shop_model_structure() {
    let model = load(SHOP);
    let root = model.root();
    let children: Vec<_> = model
        .children(root)
        .iter()
        .map(|c| model.element(*c).name.as_str())
        .collect();
    assert_eq!(children, vec!["Cart", "Item"]);

    let cart = model.find_by_qualified_name("Shop.Cart").unwrap();
    let members = classify::associated_members_of(&model, cart);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].stem, "item");

    let item = model.find_by_qualified_name("Shop.Item").unwrap();
    assert!(classify::associated_members_of(&model, item).is_empty());
}

#[test]
fn school_model_kinds() {
    let model = load(SCHOOL);
    let kinds: Vec<_> = model
        .children(model.root())
        .iter()
        .map(|c| model.element(*c).kind.label().to_string())
        .collect();
    assert_eq!(kinds, vec!["interface", "class", "class", "actor", "package"]);

    let transcript = model.find_by_qualified_name("School.Transcript").unwrap();
    assert!(model.element(transcript).is_annotation());

    let registrar = model.find_by_qualified_name("School.Registrar").unwrap();
    assert!(matches!(model.element(registrar).kind, ElementKind::Other(_)));
}

#[test]
fn school_student_facts() {
    let model = load(SCHOOL);
    let root = model.root();
    let student = model
        .find_by_qualified_name("School.Academics.Student")
        .unwrap();

    let superclasses = classify::superclasses_of(&model, student);
    assert_eq!(model.element(superclasses[0]).name, "Person");

    let interfaces = classify::realized_interfaces_of(&model, student);
    assert_eq!(model.element(interfaces[0]).name, "Gradable");

    assert_eq!(
        classify::package_path_of(&model, student, root).as_deref(),
        Some("Academics")
    );

    let class = model.element(student).classifier().unwrap();
    let instance = classify::partition_by_visibility(class.attributes.iter().filter(|a| !a.is_static));
    assert_eq!(instance.bucket(Visibility::Public).len(), 2);
    assert_eq!(instance.bucket(Visibility::Protected).len(), 1);
    assert_eq!(instance.bucket(Visibility::Private).len(), 1);

    let enroll = &class.operations[0];
    let params: Vec<_> = enroll.non_return_parameters().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["course"]);
}

#[test]
fn relationships_of_filters_by_endpoint() {
    let model = load(SCHOOL);
    let person = model.find_by_qualified_name("School.Person").unwrap();
    let touching = model.relationships_of(person, |_| true);
    assert_eq!(touching.len(), 1);
    assert_eq!(touching[0].kind(), "generalization");
    // Person is the target, not the source
    assert!(classify::superclasses_of(&model, person).is_empty());
}

#[test]
fn ancestors_stop_at_root() {
    let model = load(SCHOOL);
    let root = model.root();
    let student = model
        .find_by_qualified_name("School.Academics.Student")
        .unwrap();
    let academics = model.find_by_qualified_name("School.Academics").unwrap();
    assert_eq!(model.ancestors(student, root), vec![academics]);
    assert!(model.ancestors(student, academics).is_empty());
    assert!(model.ancestors(root, root).is_empty());
}
