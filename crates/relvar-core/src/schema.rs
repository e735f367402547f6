//! Attribute-level type knowledge. Pure data; no operators here.
//!
//! A `RelType` records what is statically known about a relation's shape:
//! its attribute list and its candidate keys. Both pieces are optional;
//! optimization rules consult the `knows_*` guards and must decline when
//! knowledge is absent rather than guess.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An insertion-ordered set of attribute names.
///
/// Order matters for display and for projection results; equality is
/// order-sensitive, set-flavored comparisons go through [`AttrList::same_set`]
/// and friends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AttrList(Vec<String>);

impl AttrList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, attr: &str) -> bool {
        self.0.iter().any(|a| a == attr)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends an attribute unless already present.
    pub fn push_unique(&mut self, attr: impl Into<String>) {
        let attr = attr.into();
        if !self.contains(&attr) {
            self.0.push(attr);
        }
    }

    /// Set union, ordered by first occurrence (self first, then other).
    pub fn union_with(&self, other: &AttrList) -> AttrList {
        let mut out = self.clone();
        for a in other.iter() {
            out.push_unique(a.to_string());
        }
        out
    }

    /// Attributes of self not present in other, in self's order.
    pub fn minus(&self, other: &AttrList) -> AttrList {
        self.iter().filter(|a| !other.contains(a)).collect()
    }

    /// Attributes of self also present in other, in self's order.
    pub fn intersect(&self, other: &AttrList) -> AttrList {
        self.iter().filter(|a| other.contains(a)).collect()
    }

    pub fn is_disjoint(&self, other: &AttrList) -> bool {
        self.iter().all(|a| !other.contains(a))
    }

    pub fn is_subset_of(&self, other: &AttrList) -> bool {
        self.iter().all(|a| other.contains(a))
    }

    /// Set equality, ignoring order.
    pub fn same_set(&self, other: &AttrList) -> bool {
        self.len() == other.len() && self.is_subset_of(other)
    }

    /// Applies an old-name → new-name mapping; unmapped names pass through.
    pub fn renamed(&self, mapping: &BTreeMap<String, String>) -> AttrList {
        self.iter()
            .map(|a| mapping.get(a).cloned().unwrap_or_else(|| a.to_string()))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AttrList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut out = AttrList::new();
        for a in iter {
            out.push_unique(a.into());
        }
        out
    }
}

impl From<Vec<String>> for AttrList {
    fn from(v: Vec<String>) -> Self {
        v.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for AttrList {
    fn from(v: [&str; N]) -> Self {
        v.into_iter().collect()
    }
}

impl From<&[&str]> for AttrList {
    fn from(v: &[&str]) -> Self {
        v.iter().copied().collect()
    }
}

/// Candidate keys: each key is a set of attribute names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Keys(Vec<AttrList>);

impl Keys {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrList> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if at least one candidate key avoids every attribute in
    /// `butlist`, i.e. survives an allbut intact.
    pub fn any_disjoint_from(&self, butlist: &AttrList) -> bool {
        self.0.iter().any(|k| k.is_disjoint(butlist))
    }

    fn retain_keys<F: Fn(&AttrList) -> bool>(&self, pred: F) -> Keys {
        Keys(self.0.iter().filter(|k| pred(k)).cloned().collect())
    }
}

impl<A: Into<AttrList>> FromIterator<A> for Keys {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        Keys(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize, const M: usize> From<[[&str; M]; N]> for Keys {
    fn from(v: [[&str; M]; N]) -> Self {
        v.into_iter().map(AttrList::from).collect()
    }
}

/// Statically known shape of a relation.
///
/// Immutable value object: `with_attrlist`/`with_keys` and every operation
/// transform return a new `RelType`. [`RelType::ANY`] knows nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RelType {
    attrlist: Option<AttrList>,
    keys: Option<Keys>,
}

impl RelType {
    /// The universal type: nothing known.
    pub const ANY: RelType = RelType {
        attrlist: None,
        keys: None,
    };

    pub fn with_attrlist(self, attrs: impl Into<AttrList>) -> Self {
        let attrlist = attrs.into();
        let typ = RelType {
            attrlist: Some(attrlist),
            keys: self.keys,
        };
        typ.debug_check();
        typ
    }

    pub fn with_keys(self, keys: impl Into<Keys>) -> Self {
        let typ = RelType {
            attrlist: self.attrlist,
            keys: Some(keys.into()),
        };
        typ.debug_check();
        typ
    }

    // Invariant: keys only mention attributes of a known attrlist.
    fn debug_check(&self) {
        if let (Some(attrs), Some(keys)) = (&self.attrlist, &self.keys) {
            debug_assert!(
                keys.iter().all(|k| k.is_subset_of(attrs)),
                "candidate key mentions an attribute outside the attrlist"
            );
        }
    }

    pub fn knows_attrlist(&self) -> bool {
        self.attrlist.is_some()
    }

    pub fn knows_keys(&self) -> bool {
        self.keys.is_some()
    }

    pub fn attrlist(&self) -> Option<&AttrList> {
        self.attrlist.as_ref()
    }

    pub fn keys(&self) -> Option<&Keys> {
        self.keys.as_ref()
    }

    /// Result type of projecting on `attrs` (requested order; unknown
    /// attrlist stays unknown but narrows to the request).
    pub fn project(&self, attrs: &AttrList) -> RelType {
        let attrlist = match &self.attrlist {
            Some(known) => attrs.intersect(known),
            None => attrs.clone(),
        };
        let keys = self
            .keys
            .as_ref()
            .map(|ks| ks.retain_keys(|k| k.is_subset_of(&attrlist)));
        RelType {
            attrlist: Some(attrlist),
            keys,
        }
    }

    /// Result type of removing `butlist`. Keys survive only when disjoint
    /// from the removed attributes.
    pub fn allbut(&self, butlist: &AttrList) -> RelType {
        let attrlist = self.attrlist.as_ref().map(|known| known.minus(butlist));
        let keys = self
            .keys
            .as_ref()
            .map(|ks| ks.retain_keys(|k| k.is_disjoint(butlist)));
        RelType { attrlist, keys }
    }

    /// Result type of autowrapping with the given split token: split
    /// attributes collapse into their root, once, at first occurrence.
    pub fn autowrap(&self, split: &str) -> RelType {
        let attrlist = self.attrlist.as_ref().map(|known| {
            known
                .iter()
                .map(|a| match a.split_once(split) {
                    Some((root, _)) => root.to_string(),
                    None => a.to_string(),
                })
                .collect::<AttrList>()
        });
        // A key survives wrapping only if none of its attributes is folded
        // into a nested structure.
        let keys = self
            .keys
            .as_ref()
            .map(|ks| ks.retain_keys(|k| k.iter().all(|a| !a.contains(split))));
        RelType { attrlist, keys }
    }

    pub fn renamed(&self, mapping: &BTreeMap<String, String>) -> RelType {
        RelType {
            attrlist: self.attrlist.as_ref().map(|a| a.renamed(mapping)),
            keys: self
                .keys
                .as_ref()
                .map(|ks| ks.iter().map(|k| k.renamed(mapping)).collect()),
        }
    }

    /// Result type of extending with computed attributes. Existing keys
    /// keep identifying tuples.
    pub fn extended(&self, new_attrs: &AttrList) -> RelType {
        RelType {
            attrlist: self.attrlist.as_ref().map(|a| a.union_with(new_attrs)),
            keys: self.keys.clone(),
        }
    }

    /// Result type of a union. Attribute knowledge survives only when both
    /// sides agree on the attribute set; keys never survive (duplicate
    /// handling on the other side is not ours to assume).
    pub fn union(&self, other: &RelType) -> RelType {
        let attrlist = match (&self.attrlist, &other.attrlist) {
            (Some(l), Some(r)) if l.same_set(r) => Some(l.clone()),
            _ => None,
        };
        RelType {
            attrlist,
            keys: None,
        }
    }
}

/// Roots of the attributes that a split token would wrap: the first
/// segment of every attribute containing the token, deduplicated in
/// first-occurrence order. Unsplit attributes contribute nothing.
pub fn wrapped_roots(attrlist: &AttrList, split: &str) -> AttrList {
    attrlist
        .iter()
        .filter_map(|a| a.split_once(split).map(|(root, _)| root))
        .collect()
}
