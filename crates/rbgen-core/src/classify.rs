//! Structural facts derived from the model: visibility buckets, inheritance,
//! realized interfaces, navigable associations and package paths.
//!
//! Every function here is a pure query over a [`Model`].

use crate::model::*;
use crate::transform::name_normalizer::file_stem;

/// Anything that carries a visibility marker.
pub trait Member {
    fn visibility_marker(&self) -> &str;
}

impl Member for Attribute {
    fn visibility_marker(&self) -> &str {
        &self.visibility
    }
}

impl Member for Operation {
    fn visibility_marker(&self) -> &str {
        &self.visibility
    }
}

/// Map a member's marker to a bucket. Unrecognized markers yield `None` and the
/// member is left out of every visibility-partitioned section.
pub fn visibility_of<M: Member + ?Sized>(member: &M) -> Option<Visibility> {
    match member.visibility_marker() {
        "public" => Some(Visibility::Public),
        "protected" => Some(Visibility::Protected),
        "private" => Some(Visibility::Private),
        _ => None,
    }
}

/// Targets of every generalization whose source is `id`.
pub fn superclasses_of(model: &Model, id: ElementId) -> Vec<ElementId> {
    model
        .relationships_of(id, |r| {
            matches!(r, Relationship::Generalization { source, .. } if *source == id)
        })
        .into_iter()
        .filter_map(|r| match r {
            Relationship::Generalization { target, .. } => Some(*target),
            _ => None,
        })
        .collect()
}

/// Targets of every interface realization whose source is `id`.
pub fn realized_interfaces_of(model: &Model, id: ElementId) -> Vec<ElementId> {
    model
        .relationships_of(id, |r| {
            matches!(r, Relationship::InterfaceRealization { source, .. } if *source == id)
        })
        .into_iter()
        .filter_map(|r| match r {
            Relationship::InterfaceRealization { target, .. } => Some(*target),
            _ => None,
        })
        .collect()
}

/// Associations with `id` at either end.
pub fn associations_of(model: &Model, id: ElementId) -> Vec<&Association> {
    model
        .relationships_of(id, |r| matches!(r, Relationship::Association(_)))
        .into_iter()
        .filter_map(|r| match r {
            Relationship::Association(a) => Some(a),
            _ => None,
        })
        .collect()
}

/// An associated class that `id` holds a reference to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociatedMember {
    pub element: ElementId,
    /// File stem of the associated element's name; also the member name.
    pub stem: String,
}

/// Elements reachable from `id` through a navigable association end.
///
/// When `id` is `end1`, `end2` counts if it is navigable, and symmetrically.
pub fn associated_members_of(model: &Model, id: ElementId) -> Vec<AssociatedMember> {
    let mut members = Vec::new();
    for association in associations_of(model, id) {
        let (end1, end2) = (&association.end1, &association.end2);
        if end1.reference == id && end2.navigable {
            members.push(associated(model, end2.reference));
        }
        if end2.reference == id && end1.navigable {
            members.push(associated(model, end1.reference));
        }
    }
    members
}

fn associated(model: &Model, element: ElementId) -> AssociatedMember {
    AssociatedMember {
        element,
        stem: file_stem(&model.element(element).name),
    }
}

/// Names of the packages between `root` and `id`, outermost first.
pub fn package_segments_of(model: &Model, id: ElementId, root: ElementId) -> Vec<String> {
    model
        .ancestors(id, root)
        .into_iter()
        .map(|a| model.element(a).name.clone())
        .collect()
}

/// Dotted package path of `id` relative to the generation root, or `None`
/// when its parent is the root (or it has no parent inside the root).
pub fn package_path_of(model: &Model, id: ElementId, root: ElementId) -> Option<String> {
    let segments = package_segments_of(model, id, root);
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("."))
    }
}

/// Members split into visibility buckets, each keeping declaration order.
#[derive(Debug)]
pub struct Partition<'a, T> {
    pub public: Vec<&'a T>,
    pub protected: Vec<&'a T>,
    pub private: Vec<&'a T>,
}

impl<'a, T> Partition<'a, T> {
    pub fn bucket(&self, visibility: Visibility) -> &[&'a T] {
        match visibility {
            Visibility::Public => &self.public,
            Visibility::Protected => &self.protected,
            Visibility::Private => &self.private,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.public.is_empty() && self.protected.is_empty() && self.private.is_empty()
    }
}

/// Stable partition by visibility. Members with unrecognized markers are dropped.
pub fn partition_by_visibility<'a, T, I>(members: I) -> Partition<'a, T>
where
    T: Member + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut partition = Partition {
        public: Vec::new(),
        protected: Vec::new(),
        private: Vec::new(),
    };
    for member in members {
        match visibility_of(member) {
            Some(Visibility::Public) => partition.public.push(member),
            Some(Visibility::Protected) => partition.protected.push(member),
            Some(Visibility::Private) => partition.private.push(member),
            None => {}
        }
    }
    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::transform::build_model;

    const SHOP: &str = r#"
name: Shop
ownedElements:
  - kind: class
    name: Cart
    attributes:
      - { name: items, visibility: public }
      - { name: owner, visibility: private }
      - { name: token, visibility: package }
      - { name: limit, visibility: protected }
      - { name: MAX, visibility: public, isStatic: true, isReadOnly: true, defaultValue: "10" }
  - { kind: class, name: LineItem }
  - { kind: class, name: Basket }
  - { kind: class, name: Customer }
  - { kind: interface, name: Priced }
  - { kind: interface, name: Named }
  - kind: package
    name: Billing
    ownedElements:
      - kind: package
        name: Tax
        ownedElements:
          - { kind: class, name: Rate }
relationships:
  - { kind: generalization, source: Cart, target: Basket }
  - { kind: generalization, source: Customer, target: Cart }
  - { kind: interfaceRealization, source: Cart, target: Priced }
  - { kind: interfaceRealization, source: Cart, target: Named }
  - kind: association
    end1: { reference: Cart, navigable: false }
    end2: { reference: LineItem, navigable: true }
  - kind: association
    end1: { reference: Customer, navigable: true }
    end2: { reference: Cart, navigable: false }
  - kind: association
    end1: { reference: Rate, navigable: true }
    end2: { reference: Cart, navigable: true }
"#;

    fn shop() -> Model {
        build_model(&parse::from_yaml(SHOP).unwrap()).unwrap()
    }

    fn id(model: &Model, qualified: &str) -> ElementId {
        model.find_by_qualified_name(qualified).unwrap()
    }

    fn names(model: &Model, ids: &[ElementId]) -> Vec<String> {
        ids.iter().map(|i| model.element(*i).name.clone()).collect()
    }

    #[test]
    fn test_visibility_markers() {
        let model = shop();
        let cart = model.element(id(&model, "Shop.Cart")).classifier().unwrap();
        let visibilities: Vec<_> = cart.attributes.iter().map(visibility_of).collect();
        assert_eq!(
            visibilities,
            vec![
                Some(Visibility::Public),
                Some(Visibility::Private),
                None,
                Some(Visibility::Protected),
                Some(Visibility::Public),
            ]
        );
    }

    #[test]
    fn test_superclasses_only_outgoing() {
        let model = shop();
        let cart = id(&model, "Shop.Cart");
        assert_eq!(names(&model, &superclasses_of(&model, cart)), vec!["Basket"]);
        let basket = id(&model, "Shop.Basket");
        assert!(superclasses_of(&model, basket).is_empty());
    }

    #[test]
    fn test_realized_interfaces_keep_order() {
        let model = shop();
        let cart = id(&model, "Shop.Cart");
        assert_eq!(
            names(&model, &realized_interfaces_of(&model, cart)),
            vec!["Priced", "Named"]
        );
    }

    #[test]
    fn test_associated_members_follow_navigability() {
        let model = shop();
        let cart = id(&model, "Shop.Cart");
        assert_eq!(associations_of(&model, cart).len(), 3);

        let stems: Vec<_> = associated_members_of(&model, cart)
            .into_iter()
            .map(|m| m.stem)
            .collect();
        assert_eq!(stems, vec!["line_item", "customer", "rate"]);

        // LineItem's end of the first association is not navigable back to Cart
        let line_item = id(&model, "Shop.LineItem");
        assert!(associated_members_of(&model, line_item).is_empty());
    }

    #[test]
    fn test_package_path() {
        let model = shop();
        let root = model.root();
        assert_eq!(package_path_of(&model, id(&model, "Shop.Cart"), root), None);
        assert_eq!(
            package_path_of(&model, id(&model, "Shop.Billing.Tax.Rate"), root).as_deref(),
            Some("Billing.Tax")
        );

        let billing = id(&model, "Shop.Billing");
        assert_eq!(
            package_path_of(&model, id(&model, "Shop.Billing.Tax.Rate"), billing).as_deref(),
            Some("Tax")
        );
        // Outside the generation root
        assert_eq!(package_path_of(&model, id(&model, "Shop.Cart"), billing), None);
    }

    #[test]
    fn test_partition_is_stable_and_drops_unknown() {
        let model = shop();
        let cart = model.element(id(&model, "Shop.Cart")).classifier().unwrap();
        let partition = partition_by_visibility(cart.attributes.iter().filter(|a| !a.is_static));

        let public: Vec<_> = partition.public.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(public, vec!["items"]);
        assert_eq!(partition.bucket(Visibility::Protected)[0].name, "limit");
        assert_eq!(partition.bucket(Visibility::Private)[0].name, "owner");
        assert_eq!(
            partition.public.len() + partition.protected.len() + partition.private.len(),
            3
        );
    }
}
