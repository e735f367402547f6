//! The empty relation absorbs most operators at construction time and
//! acts as the union identity.

use relvar_algebra::{
    renaming, AutowrapOptions, Empty, Extensions, Matching, OrderBy, Page, PageOptions, Relation,
    UnionOptions,
};
use relvar_core::tuple;
use relvar_core::{AttrList, Predicate, RelType, Value};

fn empty_suppliers() -> Relation {
    Relation::empty(RelType::ANY.with_attrlist(["sid", "name", "city"]))
}

#[test]
fn test_empty_has_no_tuples() {
    let r = empty_suppliers();
    assert_eq!(r.count().unwrap(), 0);
    assert!(r.to_vec().unwrap().is_empty());
}

#[test]
fn test_restricting_the_empty_relation_returns_it_unchanged() {
    let r = empty_suppliers();
    let restricted = r.restrict(Predicate::eq("city", "Paris"));
    assert!(restricted.ptr_eq(&r));
}

#[test]
fn test_projecting_the_empty_relation_stays_empty() {
    let r = empty_suppliers().project(["sid"]);
    assert!(r.downcast_ref::<Empty>().is_some());
    let attrs = r.typ().attrlist().expect("projection narrows the type");
    assert!(attrs.same_set(&AttrList::from(["sid"])));
}

#[test]
fn test_allbut_on_the_empty_relation_stays_empty() {
    let r = empty_suppliers().allbut(["city"]);
    assert!(r.downcast_ref::<Empty>().is_some());
    let attrs = r.typ().attrlist().expect("attrlist stays known");
    assert!(attrs.same_set(&AttrList::from(["sid", "name"])));
}

#[test]
fn test_autowrap_on_the_empty_relation_stays_empty() {
    let r = Relation::empty(RelType::ANY.with_attrlist(["sid", "city_name"]))
        .autowrap(AutowrapOptions::new());
    assert!(r.downcast_ref::<Empty>().is_some());
    let attrs = r.typ().attrlist().expect("attrlist stays known");
    assert!(attrs.same_set(&AttrList::from(["sid", "city"])));
}

#[test]
fn test_rename_on_the_empty_relation_stays_empty() {
    let r = empty_suppliers().rename(renaming([("city", "location")]));
    assert!(r.downcast_ref::<Empty>().is_some());
    assert!(r.typ().attrlist().unwrap().contains("location"));
}

#[test]
fn test_extend_on_the_empty_relation_stays_empty() {
    let r = empty_suppliers().extend(
        Extensions::new().with("loud", |_| Ok(Value::Str("HI".into()))),
    );
    assert!(r.downcast_ref::<Empty>().is_some());
    assert!(r.typ().attrlist().unwrap().contains("loud"));
}

#[test]
fn test_union_with_empty_left_returns_the_other_operand() {
    let other = Relation::memory(vec![tuple! { "sid" => "S1" }]);
    let r = empty_suppliers().union(&other, UnionOptions::default());
    assert!(r.ptr_eq(&other));
}

#[test]
fn test_paging_the_empty_relation_is_not_absorbed() {
    let r = empty_suppliers().page(OrderBy::asc("sid"), 1, PageOptions::default());
    assert!(r.downcast_ref::<Page>().is_some());
    assert_eq!(r.count().unwrap(), 0);
}

#[test]
fn test_matching_on_the_empty_relation_is_not_absorbed() {
    let other = Relation::memory(vec![tuple! { "sid" => "S1" }]);
    let r = empty_suppliers().matching(&other);
    assert!(r.downcast_ref::<Matching>().is_some());
    assert_eq!(r.count().unwrap(), 0);
}
