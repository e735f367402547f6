//! Operator option structs.
//!
//! All options are plain serde-able values, validated when built: an
//! invalid configuration is a `Config` error before any tuple flows.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use relvar_core::error::{Error, Result};
use relvar_core::tuple::Tuple;

const DEFAULT_PAGE_SIZE: usize = 100;

/// Paging configuration. `page_size` must be at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPageOptions")]
pub struct PageOptions {
    page_size: usize,
}

impl PageOptions {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::Config("page_size must be >= 1".to_string()));
        }
        Ok(PageOptions { page_size })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        PageOptions {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPageOptions {
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl TryFrom<RawPageOptions> for PageOptions {
    type Error = Error;

    fn try_from(raw: RawPageOptions) -> Result<Self> {
        PageOptions::new(raw.page_size)
    }
}

/// Union configuration: `all = true` keeps the bag, the default removes
/// duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnionOptions {
    #[serde(default)]
    all: bool,
}

impl UnionOptions {
    pub fn new(all: bool) -> Self {
        UnionOptions { all }
    }

    pub fn all(&self) -> bool {
        self.all
    }
}

/// Per-attribute noise remover, see [`Postprocessor::PerAttribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Remover {
    None,
    Nil,
    Delete,
}

/// A custom postprocessor body: receives the wrapped tuple and one
/// all-nil top-level attribute at a time.
pub type CustomPostprocessor = Arc<dyn Fn(&mut Tuple, &str) + Send + Sync>;

/// What to do with left-join noise: a top-level wrapped attribute whose
/// nested tuple carries only nulls.
///
/// `PerAttribute` is kept normalized (no-op entries dropped, empty map
/// collapsed to `None`) so functionally identical configurations compare
/// equal. `Custom` compares by function identity.
#[derive(Clone, Default)]
pub enum Postprocessor {
    #[default]
    None,
    Nil,
    Delete,
    PerAttribute(BTreeMap<String, Remover>),
    Custom(CustomPostprocessor),
}

impl Postprocessor {
    /// Per-attribute removers, normalized.
    pub fn per_attribute<K: Into<String>, I: IntoIterator<Item = (K, Remover)>>(map: I) -> Self {
        Postprocessor::PerAttribute(
            map.into_iter()
                .map(|(k, r)| (k.into(), r))
                .collect::<BTreeMap<_, _>>(),
        )
        .normalized()
    }

    pub fn custom(f: impl Fn(&mut Tuple, &str) + Send + Sync + 'static) -> Self {
        Postprocessor::Custom(Arc::new(f))
    }

    pub(crate) fn normalized(self) -> Self {
        match self {
            Postprocessor::PerAttribute(map) => {
                let map: BTreeMap<String, Remover> = map
                    .into_iter()
                    .filter(|(_, r)| *r != Remover::None)
                    .collect();
                if map.is_empty() {
                    Postprocessor::None
                } else {
                    Postprocessor::PerAttribute(map)
                }
            }
            other => other,
        }
    }

    fn custom_token(f: &CustomPostprocessor) -> String {
        format!("custom:{:p}", Arc::as_ptr(f).cast::<()>())
    }
}

impl fmt::Debug for Postprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Postprocessor::None => write!(f, "None"),
            Postprocessor::Nil => write!(f, "Nil"),
            Postprocessor::Delete => write!(f, "Delete"),
            Postprocessor::PerAttribute(map) => write!(f, "PerAttribute({map:?})"),
            Postprocessor::Custom(g) => write!(f, "Custom({})", Self::custom_token(g)),
        }
    }
}

impl PartialEq for Postprocessor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Postprocessor::None, Postprocessor::None)
            | (Postprocessor::Nil, Postprocessor::Nil)
            | (Postprocessor::Delete, Postprocessor::Delete) => true,
            (Postprocessor::PerAttribute(a), Postprocessor::PerAttribute(b)) => a == b,
            (Postprocessor::Custom(a), Postprocessor::Custom(b)) => {
                std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
            }
            _ => false,
        }
    }
}

impl Serialize for Postprocessor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Postprocessor::None => serializer.serialize_str("none"),
            Postprocessor::Nil => serializer.serialize_str("nil"),
            Postprocessor::Delete => serializer.serialize_str("delete"),
            Postprocessor::PerAttribute(map) => map.serialize(serializer),
            Postprocessor::Custom(f) => serializer.serialize_str(&Self::custom_token(f)),
        }
    }
}

impl<'de> Deserialize<'de> for Postprocessor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PostprocessorVisitor;

        impl<'de> Visitor<'de> for PostprocessorVisitor {
            type Value = Postprocessor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"none\", \"nil\", \"delete\", or an attribute → remover map")
            }

            fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Postprocessor, E> {
                match s {
                    "none" => Ok(Postprocessor::None),
                    "nil" => Ok(Postprocessor::Nil),
                    "delete" => Ok(Postprocessor::Delete),
                    other => Err(E::custom(format!("invalid postprocessor `{other}`"))),
                }
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Postprocessor, A::Error> {
                let mut map = BTreeMap::new();
                while let Some((k, v)) = access.next_entry::<String, Remover>()? {
                    map.insert(k, v);
                }
                Ok(Postprocessor::PerAttribute(map).normalized())
            }
        }

        deserializer.deserialize_any(PostprocessorVisitor)
    }
}

/// Autowrap configuration: the split token (non-empty, default `_`) and
/// the left-join-noise postprocessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAutowrapOptions")]
pub struct AutowrapOptions {
    postprocessor: Postprocessor,
    split: String,
}

impl AutowrapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_split(mut self, split: impl Into<String>) -> Result<Self> {
        let split = split.into();
        if split.is_empty() {
            return Err(Error::Config("split token must not be empty".to_string()));
        }
        self.split = split;
        Ok(self)
    }

    pub fn with_postprocessor(mut self, postprocessor: Postprocessor) -> Self {
        self.postprocessor = postprocessor.normalized();
        self
    }

    pub fn split(&self) -> &str {
        &self.split
    }

    pub fn postprocessor(&self) -> &Postprocessor {
        &self.postprocessor
    }

    /// Configuration equality over normalized forms.
    pub fn same_options(&self, other: &AutowrapOptions) -> bool {
        self == other
    }
}

impl Default for AutowrapOptions {
    fn default() -> Self {
        AutowrapOptions {
            postprocessor: Postprocessor::None,
            split: "_".to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAutowrapOptions {
    #[serde(default)]
    postprocessor: Postprocessor,
    #[serde(default = "default_split")]
    split: String,
}

fn default_split() -> String {
    "_".to_string()
}

impl TryFrom<RawAutowrapOptions> for AutowrapOptions {
    type Error = Error;

    fn try_from(raw: RawAutowrapOptions) -> Result<Self> {
        if raw.split.is_empty() {
            return Err(Error::Config("split token must not be empty".to_string()));
        }
        Ok(AutowrapOptions {
            postprocessor: raw.postprocessor.normalized(),
            split: raw.split,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_zero_is_a_config_error() {
        assert!(PageOptions::new(0).is_err());
        let res: std::result::Result<PageOptions, _> =
            serde_json::from_value(serde_json::json!({ "page_size": 0 }));
        assert!(res.is_err());
    }

    #[test]
    fn page_size_defaults_to_100() {
        let opts: PageOptions = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(opts.page_size(), 100);
    }

    #[test]
    fn per_attribute_normalizes_to_none_when_trivial() {
        let pp = Postprocessor::per_attribute([("x", Remover::None)]);
        assert_eq!(pp, Postprocessor::None);
    }

    #[test]
    fn identical_per_attribute_maps_compare_equal() {
        let a = Postprocessor::per_attribute([("x", Remover::Nil)]);
        let b = Postprocessor::per_attribute([("x", Remover::Nil)]);
        assert_eq!(a, b);
    }

    #[test]
    fn custom_compares_by_identity() {
        let f = Postprocessor::custom(|_, _| {});
        let g = Postprocessor::custom(|_, _| {});
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn invalid_postprocessor_is_rejected() {
        let res: std::result::Result<AutowrapOptions, _> =
            serde_json::from_value(serde_json::json!({ "postprocessor": "shout" }));
        assert!(res.is_err());
    }

    #[test]
    fn empty_split_is_a_config_error() {
        assert!(AutowrapOptions::new().with_split("").is_err());
        let res: std::result::Result<AutowrapOptions, _> =
            serde_json::from_value(serde_json::json!({ "split": "" }));
        assert!(res.is_err());
    }
}
