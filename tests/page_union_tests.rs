//! Paging and union semantics: one-based slices over a total order,
//! set-by-default union with an opt-in bag mode.

use relvar_algebra::{Direction, Memory, OrderBy, PageOptions, Relation, UnionOptions};
use relvar_core::tuple;
use relvar_core::{AttrList, RelType, Tuple, Value};
use serde_json::json;

fn people() -> Relation {
    Relation::memory(vec![
        tuple! { "id" => 3, "name" => "Carla" },
        tuple! { "id" => 1, "name" => "Alice" },
        tuple! { "id" => 5, "name" => "Elena" },
        tuple! { "id" => 2, "name" => "Boris" },
        tuple! { "id" => 4, "name" => "Denis" },
    ])
}

fn ids(tuples: &[Tuple]) -> Vec<Option<Value>> {
    tuples.iter().map(|t| t.get("id").cloned()).collect()
}

#[test]
fn test_pages_are_one_based_slices_of_the_sorted_stream() {
    let options = PageOptions::new(2).unwrap();
    let first = people().page(OrderBy::asc("id"), 1, options);
    let second = people().page(OrderBy::asc("id"), 2, options);
    let third = people().page(OrderBy::asc("id"), 3, options);
    assert_eq!(
        ids(&first.to_vec().unwrap()),
        vec![Some(Value::Int(1)), Some(Value::Int(2))]
    );
    assert_eq!(
        ids(&second.to_vec().unwrap()),
        vec![Some(Value::Int(3)), Some(Value::Int(4))]
    );
    assert_eq!(ids(&third.to_vec().unwrap()), vec![Some(Value::Int(5))]);
}

#[test]
fn test_page_zero_is_empty() {
    let r = people().page(OrderBy::asc("id"), 0, PageOptions::new(2).unwrap());
    assert_eq!(r.count().unwrap(), 0);
}

#[test]
fn test_pages_past_the_end_are_empty() {
    let r = people().page(OrderBy::asc("id"), 9, PageOptions::new(2).unwrap());
    assert_eq!(r.count().unwrap(), 0);
}

#[test]
fn test_default_page_size_is_one_hundred() {
    assert_eq!(PageOptions::default().page_size(), 100);
    let r = people().page(OrderBy::asc("id"), 1, PageOptions::default());
    assert_eq!(r.count().unwrap(), 5);
}

#[test]
fn test_page_size_zero_is_rejected() {
    assert!(PageOptions::new(0).is_err());
}

#[test]
fn test_descending_ordering() {
    let r = people().page(OrderBy::desc("id"), 1, PageOptions::new(2).unwrap());
    assert_eq!(
        ids(&r.to_vec().unwrap()),
        vec![Some(Value::Int(5)), Some(Value::Int(4))]
    );
}

#[test]
fn test_secondary_ordering_breaks_ties() {
    let r = Relation::memory(vec![
        tuple! { "group" => "a", "id" => 2 },
        tuple! { "group" => "b", "id" => 1 },
        tuple! { "group" => "a", "id" => 1 },
    ]);
    let ordering = OrderBy::asc("group").then_desc("id");
    let paged = r.page(ordering, 1, PageOptions::default());
    let tuples = paged.to_vec().unwrap();
    assert_eq!(
        ids(&tuples),
        vec![Some(Value::Int(2)), Some(Value::Int(1)), Some(Value::Int(1))]
    );
    assert_eq!(tuples[2].get("group"), Some(&Value::Str("b".into())));
}

#[test]
fn test_missing_ordering_attributes_sort_first() {
    let r = Relation::memory(vec![
        tuple! { "id" => 1, "rank" => 7 },
        tuple! { "id" => 2 },
    ]);
    let paged = r.page(OrderBy::asc("rank"), 1, PageOptions::default());
    assert_eq!(
        ids(&paged.to_vec().unwrap()),
        vec![Some(Value::Int(2)), Some(Value::Int(1))]
    );
}

#[test]
fn test_equal_keys_keep_their_input_order() {
    let r = Relation::memory(vec![
        tuple! { "id" => 1, "rank" => 1 },
        tuple! { "id" => 2, "rank" => 1 },
        tuple! { "id" => 3, "rank" => 1 },
    ]);
    let paged = r.page(OrderBy::asc("rank"), 1, PageOptions::default());
    assert_eq!(
        ids(&paged.to_vec().unwrap()),
        vec![Some(Value::Int(1)), Some(Value::Int(2)), Some(Value::Int(3))]
    );
}

#[test]
fn test_ordering_mixes_directions_per_attribute() {
    let ordering = OrderBy::new([("a", Direction::Asc), ("b", Direction::Desc)]);
    assert_eq!(
        ordering.iter().collect::<Vec<_>>(),
        vec![("a", Direction::Asc), ("b", Direction::Desc)]
    );
}

#[test]
fn test_page_options_deserialize_and_validate() {
    let options: PageOptions = serde_json::from_value(json!({ "page_size": 5 })).unwrap();
    assert_eq!(options.page_size(), 5);
    let defaulted: PageOptions = serde_json::from_value(json!({})).unwrap();
    assert_eq!(defaulted.page_size(), 100);
    assert!(serde_json::from_value::<PageOptions>(json!({ "page_size": 0 })).is_err());
}

#[test]
fn test_union_removes_duplicates_in_first_seen_order() {
    let left = Relation::memory(vec![
        tuple! { "id" => 1 },
        tuple! { "id" => 2 },
    ]);
    let right = Relation::memory(vec![
        tuple! { "id" => 2 },
        tuple! { "id" => 3 },
    ]);
    let r = left.union(&right, UnionOptions::default());
    assert_eq!(
        ids(&r.to_vec().unwrap()),
        vec![Some(Value::Int(1)), Some(Value::Int(2)), Some(Value::Int(3))]
    );
}

#[test]
fn test_union_all_keeps_duplicates() {
    let left = Relation::memory(vec![tuple! { "id" => 1 }, tuple! { "id" => 2 }]);
    let right = Relation::memory(vec![tuple! { "id" => 2 }]);
    let r = left.union(&right, UnionOptions::new(true));
    assert_eq!(
        ids(&r.to_vec().unwrap()),
        vec![Some(Value::Int(1)), Some(Value::Int(2)), Some(Value::Int(2))]
    );
}

#[test]
fn test_union_keeps_the_attrlist_when_both_sides_agree() {
    let typ = RelType::ANY.with_attrlist(["id"]);
    let left = Relation::new(Memory::new(vec![tuple! { "id" => 1 }]).with_type(typ.clone()));
    let right = Relation::new(Memory::new(vec![tuple! { "id" => 2 }]).with_type(typ));
    let r = left.union(&right, UnionOptions::default());
    let attrs = r.typ().attrlist().expect("agreeing sides keep the attrlist");
    assert!(attrs.same_set(&AttrList::from(["id"])));
}

#[test]
fn test_union_forgets_the_attrlist_when_sides_disagree() {
    let left = Relation::new(
        Memory::new(vec![]).with_type(RelType::ANY.with_attrlist(["id"])),
    );
    let right = Relation::new(
        Memory::new(vec![]).with_type(RelType::ANY.with_attrlist(["id", "name"])),
    );
    let r = left.union(&right, UnionOptions::default());
    assert!(r.typ().attrlist().is_none());
}

#[test]
fn test_values_order_across_types_is_total() {
    let r = Relation::memory(vec![
        tuple! { "v" => "text" },
        tuple! { "v" => 1 },
        tuple! { "v" => true },
        tuple! { "v" => 1.5 },
    ]);
    let paged = r.page(OrderBy::asc("v"), 1, PageOptions::default());
    let kinds: Vec<_> = paged
        .to_vec()
        .unwrap()
        .into_iter()
        .map(|t| t.get("v").cloned().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec![
            Value::Bool(true),
            Value::Int(1),
            Value::Float(1.5),
            Value::Str("text".into())
        ]
    );
}
