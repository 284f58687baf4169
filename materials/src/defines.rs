//! Preprocessor defines contributed by materials.
//!
//! A [`DefineList`] is an ordered name to value map. Names sort
//! lexicographically so equal sets compare, hash and fingerprint equal no
//! matter the insertion order. An empty value is a bare `#define NAME`.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::error::MaterialError;

/// Typed value for a shader define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderDef {
    /// `Bool(true)` defines a bare name, `Bool(false)` omits it.
    Bool(bool),
    Int(i32),
    UInt(u32),
}

impl From<bool> for ShaderDef {
    fn from(v: bool) -> Self {
        ShaderDef::Bool(v)
    }
}

impl From<i32> for ShaderDef {
    fn from(v: i32) -> Self {
        ShaderDef::Int(v)
    }
}

impl From<u32> for ShaderDef {
    fn from(v: u32) -> Self {
        ShaderDef::UInt(v)
    }
}

/// Ordered set of `NAME=VALUE` preprocessor defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DefineList {
    defines: BTreeMap<String, String>,
}

impl DefineList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any previous value.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.defines.insert(name.into(), value.into());
        self
    }

    /// Set `name` from a typed define. `Bool(false)` removes the name.
    pub fn add_def(&mut self, name: impl Into<String>, def: impl Into<ShaderDef>) -> &mut Self {
        let name = name.into();
        match def.into() {
            ShaderDef::Bool(true) => {
                self.defines.insert(name, String::new());
            }
            ShaderDef::Bool(false) => {
                self.defines.remove(&name);
            }
            ShaderDef::Int(v) => {
                self.defines.insert(name, v.to_string());
            }
            ShaderDef::UInt(v) => {
                self.defines.insert(name, v.to_string());
            }
        }
        self
    }

    /// Builder form of [`DefineList::add`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(name, value);
        self
    }

    /// Builder form of [`DefineList::add_def`].
    #[must_use]
    pub fn with_def(mut self, name: impl Into<String>, def: impl Into<ShaderDef>) -> Self {
        self.add_def(name, def);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.defines.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.defines.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Defines in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Union `other` into `self`.
    ///
    /// A name present in both with equal values is kept once. A name present in
    /// both with different values is an error and leaves `self` unchanged.
    pub fn merge(&mut self, other: &DefineList) -> Result<(), MaterialError> {
        for (name, value) in &other.defines {
            if let Some(existing) = self.defines.get(name) {
                if existing != value {
                    return Err(MaterialError::ConflictingDefine {
                        name: name.clone(),
                        existing: existing.clone(),
                        incoming: value.clone(),
                    });
                }
            }
        }
        for (name, value) in &other.defines {
            self.defines
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
        Ok(())
    }

    /// Compiler arguments in name order: `NAME=VALUE`, or `NAME` for bare defines.
    pub fn to_args(&self) -> Vec<String> {
        self.defines
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!("{name}={value}")
                }
            })
            .collect()
    }

    /// Stable 64-bit fingerprint of the set, equal across processes.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        self.write_fingerprint(&mut hasher);
        hasher.digest()
    }

    pub(crate) fn write_fingerprint(&self, hasher: &mut Xxh3) {
        for (name, value) in &self.defines {
            hasher.update(name.as_bytes());
            hasher.update(&[0]);
            hasher.update(value.as_bytes());
            hasher.update(&[0]);
        }
    }
}

impl fmt::Display for DefineList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_args().join(" "))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for DefineList {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut list = Self::new();
        for (name, value) in iter {
            list.add(name, value);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_defines() {
        let defines = DefineList::new()
            .with_def("DOUBLE_SIDED", true)
            .with_def("HAS_NORMAL_MAP", false)
            .with_def("ALPHA_MODE", 2u32)
            .with_def("BIAS", -1i32);

        assert!(defines.contains("DOUBLE_SIDED"));
        assert!(!defines.contains("HAS_NORMAL_MAP"));
        assert_eq!(defines.get("ALPHA_MODE"), Some("2"));
        assert_eq!(defines.get("BIAS"), Some("-1"));
        assert_eq!(
            defines.to_args(),
            vec!["ALPHA_MODE=2", "BIAS=-1", "DOUBLE_SIDED"]
        );
        assert_eq!(defines.to_string(), "ALPHA_MODE=2 BIAS=-1 DOUBLE_SIDED");
    }

    #[test]
    fn test_bool_false_removes() {
        let mut defines = DefineList::new().with_def("EMISSIVE", true);
        defines.add_def("EMISSIVE", false);
        assert!(defines.is_empty());
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: DefineList = [("B", "1"), ("A", "")].into_iter().collect();
        let b: DefineList = [("A", ""), ("B", "1")].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_separates_name_and_value() {
        let a = DefineList::new().with("AB", "C");
        let b = DefineList::new().with("A", "BC");
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_merge_union() {
        let mut a = DefineList::new().with("A", "1").with("SHARED", "x");
        let b = DefineList::new().with("B", "2").with("SHARED", "x");
        a.merge(&b).unwrap();
        assert_eq!(a.to_args(), vec!["A=1", "B=2", "SHARED=x"]);
    }

    #[test]
    fn test_merge_conflict_leaves_target_unchanged() {
        let mut a = DefineList::new().with("ALPHA_MODE", "0");
        let before = a.clone();
        let b = DefineList::new().with("OTHER", "1").with("ALPHA_MODE", "1");

        let err = a.merge(&b).unwrap_err();
        assert_eq!(
            err,
            MaterialError::ConflictingDefine {
                name: "ALPHA_MODE".into(),
                existing: "0".into(),
                incoming: "1".into(),
            }
        );
        assert_eq!(a, before);
    }

    #[test]
    fn test_serializes_as_map() {
        let defines = DefineList::new().with("A", "1");
        let text = ron::to_string(&defines).unwrap();
        assert_eq!(text, "{\"A\":\"1\"}");
    }
}
