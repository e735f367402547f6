//! Construction-time rewrites owned by allbut: consecutive removals
//! fuse, restrictions on surviving attributes push below, and paging
//! pushes below when a candidate key survives the removal.

use relvar_algebra::{Allbut, Memory, OrderBy, Page, PageOptions, Relation, Restrict};
use relvar_core::tuple;
use relvar_core::{AttrList, Predicate, RelType, Value};

fn typed_suppliers() -> Relation {
    let typ = RelType::ANY
        .with_attrlist(["sid", "name", "status", "city"])
        .with_keys([["sid"]]);
    Relation::new(
        Memory::new(vec![
            tuple! { "sid" => "S1", "name" => "Smith", "status" => 20, "city" => "London" },
            tuple! { "sid" => "S2", "name" => "Jones", "status" => 10, "city" => "Paris" },
            tuple! { "sid" => "S3", "name" => "Blake", "status" => 30, "city" => "Paris" },
            tuple! { "sid" => "S4", "name" => "Clark", "status" => 20, "city" => "London" },
        ])
        .with_type(typ),
    )
}

fn untyped_suppliers() -> Relation {
    Relation::memory(vec![
        tuple! { "sid" => "S1", "name" => "Smith", "status" => 20, "city" => "London" },
        tuple! { "sid" => "S2", "name" => "Jones", "status" => 10, "city" => "Paris" },
    ])
}

#[test]
fn test_consecutive_allbuts_fuse_and_keep_first_seen_order() {
    let base = untyped_suppliers();
    let r = base.allbut(["status"]).allbut(["city", "status"]);
    let node = r.downcast_ref::<Allbut>().expect("removals should fuse");
    assert!(node.operand().ptr_eq(&base));
    assert_eq!(
        node.butlist().iter().collect::<Vec<_>>(),
        vec!["status", "city"]
    );
}

#[test]
fn test_disjoint_removals_fuse_into_one() {
    let base = untyped_suppliers();
    let r = base.allbut(["status"]).allbut(["city"]);
    let node = r.downcast_ref::<Allbut>().expect("removals should fuse");
    assert!(node.operand().ptr_eq(&base));
    assert_eq!(
        node.butlist().iter().collect::<Vec<_>>(),
        vec!["status", "city"]
    );
    assert_eq!(
        r.to_vec().unwrap(),
        base.allbut(["status", "city"]).to_vec().unwrap()
    );
}

#[test]
fn test_fused_allbut_keeps_its_semantics() {
    let r = untyped_suppliers().allbut(["status"]).allbut(["city", "status"]);
    let tuples = r.to_vec().unwrap();
    assert_eq!(tuples.len(), 2);
    for t in &tuples {
        assert!(t.contains("sid"));
        assert!(t.contains("name"));
        assert!(!t.contains("status"));
        assert!(!t.contains("city"));
    }
}

#[test]
fn test_restriction_on_surviving_attributes_pushes_below() {
    let r = untyped_suppliers()
        .allbut(["status"])
        .restrict(Predicate::eq("city", "Paris"));
    let node = r.downcast_ref::<Allbut>().expect("allbut should stay on top");
    let below = node
        .operand()
        .downcast_ref::<Restrict>()
        .expect("restriction should sit below the removal");
    assert_eq!(below.predicate(), &Predicate::eq("city", "Paris"));
}

#[test]
fn test_restriction_on_a_removed_attribute_stays_on_top() {
    let r = untyped_suppliers()
        .allbut(["status"])
        .restrict(Predicate::gt("status", 10));
    let node = r.downcast_ref::<Restrict>().expect("no pushdown through the removal");
    assert!(node.operand().downcast_ref::<Allbut>().is_some());
}

#[test]
fn test_paging_pushes_below_when_a_key_survives() {
    let base = typed_suppliers();
    let r = base.allbut(["status"]).page(
        OrderBy::asc("name"),
        1,
        PageOptions::new(2).unwrap(),
    );
    let node = r.downcast_ref::<Allbut>().expect("allbut should stay on top");
    let below = node
        .operand()
        .downcast_ref::<Page>()
        .expect("paging should sit below the removal");
    assert!(below.operand().ptr_eq(&base));
    assert_eq!(below.page_index(), 1);
    assert_eq!(below.options().page_size(), 2);
    assert_eq!(
        below.ordering().attrs().iter().collect::<Vec<_>>(),
        vec!["name"]
    );
}

#[test]
fn test_pushed_paging_keeps_its_semantics() {
    let r = typed_suppliers().allbut(["status"]).page(
        OrderBy::asc("name"),
        1,
        PageOptions::new(2).unwrap(),
    );
    let tuples = r.to_vec().unwrap();
    let sids: Vec<_> = tuples.iter().map(|t| t.get("sid").cloned()).collect();
    assert_eq!(
        sids,
        vec![
            Some(Value::Str("S3".into())),
            Some(Value::Str("S4".into()))
        ]
    );
    assert!(tuples.iter().all(|t| !t.contains("status")));
}

#[test]
fn test_paging_stays_on_top_without_key_knowledge() {
    let r = untyped_suppliers().allbut(["status"]).page(
        OrderBy::asc("name"),
        1,
        PageOptions::new(2).unwrap(),
    );
    let node = r.downcast_ref::<Page>().expect("no pushdown without keys");
    assert!(node.operand().downcast_ref::<Allbut>().is_some());
}

#[test]
fn test_paging_stays_on_top_when_the_removal_consumes_every_key() {
    let r = typed_suppliers().allbut(["sid"]).page(
        OrderBy::asc("name"),
        1,
        PageOptions::new(2).unwrap(),
    );
    let node = r.downcast_ref::<Page>().expect("a consumed key blocks pushdown");
    assert!(node.operand().downcast_ref::<Allbut>().is_some());
}

#[test]
fn test_paging_stays_on_top_when_ordering_touches_the_butlist() {
    let r = typed_suppliers().allbut(["status"]).page(
        OrderBy::asc("status"),
        1,
        PageOptions::new(2).unwrap(),
    );
    let node = r.downcast_ref::<Page>().expect("ordering on a removed attribute blocks pushdown");
    assert!(node.operand().downcast_ref::<Allbut>().is_some());
}

#[test]
fn test_allbut_type_drops_covered_keys() {
    let r = typed_suppliers().allbut(["sid"]);
    let keys = r.typ().keys().expect("keys stay known");
    assert!(keys.is_empty());
    let attrs = r.typ().attrlist().expect("attrlist stays known");
    assert!(attrs.same_set(&AttrList::from(["name", "status", "city"])));
}
