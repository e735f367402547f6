//! Construction-time rewrites owned by the restriction operator:
//! consecutive restrictions fuse into one node with a conjoined
//! predicate.

use relvar_algebra::{renaming, Memory, Relation, Rename, Restrict};
use relvar_core::tuple;
use relvar_core::{Predicate, Value};

fn suppliers() -> Relation {
    Relation::memory(vec![
        tuple! { "sid" => "S1", "status" => 20, "city" => "London" },
        tuple! { "sid" => "S2", "status" => 10, "city" => "Paris" },
        tuple! { "sid" => "S3", "status" => 30, "city" => "Paris" },
    ])
}

#[test]
fn test_consecutive_restrictions_fuse_into_one_node() {
    let r = suppliers()
        .restrict(Predicate::eq("city", "Paris"))
        .restrict(Predicate::gt("status", 10));
    let node = r.downcast_ref::<Restrict>().expect("should stay a single restriction");
    assert!(node.operand().downcast_ref::<Memory>().is_some());
    let expected = Predicate::eq("city", "Paris").and(Predicate::gt("status", 10));
    assert_eq!(node.predicate(), &expected);
}

#[test]
fn test_fusion_flattens_further_conjuncts() {
    let r = suppliers()
        .restrict(Predicate::eq("city", "Paris"))
        .restrict(Predicate::gt("status", 10))
        .restrict(Predicate::lt("status", 40));
    let node = r.downcast_ref::<Restrict>().unwrap();
    let expected = Predicate::eq("city", "Paris")
        .and(Predicate::gt("status", 10))
        .and(Predicate::lt("status", 40));
    assert_eq!(node.predicate(), &expected);
}

#[test]
fn test_fused_restrictions_keep_their_semantics() {
    let fused = suppliers()
        .restrict(Predicate::eq("city", "Paris"))
        .restrict(Predicate::gt("status", 10));
    let tuples = fused.to_vec().unwrap();
    assert_eq!(tuples.len(), 1);
    assert_eq!(tuples[0].get("sid"), Some(&Value::Str("S3".into())));
}

#[test]
fn test_tautology_restriction_on_a_restriction_is_identity() {
    let once = suppliers().restrict(Predicate::eq("city", "Paris"));
    let again = once.restrict(Predicate::True);
    assert!(again.ptr_eq(&once));
}

#[test]
fn test_restriction_does_not_cross_a_rename() {
    let r = suppliers()
        .rename(renaming([("city", "location")]))
        .restrict(Predicate::eq("location", "Paris"));
    let node = r.downcast_ref::<Restrict>().expect("restriction should stay on top");
    assert!(node.operand().downcast_ref::<Rename>().is_some());
    assert_eq!(r.count().unwrap(), 2);
}
