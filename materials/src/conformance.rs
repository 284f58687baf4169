//! Type conformances for dynamic dispatch in shaders.
//!
//! A conformance declares that a concrete shader type implements a shader
//! interface and assigns it the integer id the shader switches on. Within one
//! interface every id belongs to exactly one type, and a type keeps one id
//! per interface.

use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;
use serde::{Serialize, Serializer};

use crate::error::MaterialError;

/// Name of the shader interface every material type conforms to.
pub const MATERIAL_INTERFACE: &str = "IMaterial";

/// A (concrete type, interface) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeConformance {
    pub type_name: String,
    pub interface_name: String,
}

impl TypeConformance {
    pub fn new(type_name: impl Into<String>, interface_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            interface_name: interface_name.into(),
        }
    }
}

impl fmt::Display for TypeConformance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.interface_name)
    }
}

/// Conformances with their ids, ordered by (type, interface).
///
/// Serializes as a sequence of `(type_name, interface_name, id)` triples.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeConformanceList {
    entries: BTreeMap<TypeConformance, u32>,
}

impl TypeConformanceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a conformance.
    ///
    /// Re-adding an existing entry with the same id is a no-op.
    ///
    /// # Errors
    ///
    /// - [`MaterialError::IdReassigned`] if the pair already has another id.
    /// - [`MaterialError::IdCollision`] if another type of the same interface
    ///   already uses `id`.
    pub fn add(&mut self, conformance: TypeConformance, id: u32) -> Result<(), MaterialError> {
        self.check(&conformance, id)?;
        self.entries.insert(conformance, id);
        Ok(())
    }

    /// Builder form of [`TypeConformanceList::add`].
    pub fn with(
        mut self,
        type_name: impl Into<String>,
        interface_name: impl Into<String>,
        id: u32,
    ) -> Result<Self, MaterialError> {
        self.add(TypeConformance::new(type_name, interface_name), id)?;
        Ok(self)
    }

    /// Union `other` into `self`. On error `self` is left unchanged.
    pub fn merge(&mut self, other: &TypeConformanceList) -> Result<(), MaterialError> {
        let mut merged = self.clone();
        for (conformance, &id) in &other.entries {
            merged.add(conformance.clone(), id)?;
        }
        *self = merged;
        Ok(())
    }

    /// The id assigned to `type_name` for `interface_name`.
    pub fn id_of(&self, type_name: &str, interface_name: &str) -> Option<u32> {
        self.entries
            .get(&TypeConformance::new(type_name, interface_name))
            .copied()
    }

    /// The type holding `id` within `interface_name`.
    pub fn type_for_id(&self, interface_name: &str, id: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|(c, &cid)| cid == id && c.interface_name == interface_name)
            .map(|(c, _)| c.type_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeConformance, u32)> {
        self.entries.iter().map(|(c, &id)| (c, id))
    }

    /// `(type_name, interface_name, id)` triples in order, as handed to the
    /// shader compiler.
    pub fn triples(&self) -> Vec<(&str, &str, u32)> {
        self.entries
            .iter()
            .map(|(c, &id)| (c.type_name.as_str(), c.interface_name.as_str(), id))
            .collect()
    }

    fn check(&self, conformance: &TypeConformance, id: u32) -> Result<(), MaterialError> {
        if let Some(&existing) = self.entries.get(conformance) {
            if existing != id {
                return Err(MaterialError::IdReassigned {
                    type_name: conformance.type_name.clone(),
                    interface: conformance.interface_name.clone(),
                    existing,
                    incoming: id,
                });
            }
            return Ok(());
        }
        if let Some(owner) = self.type_for_id(&conformance.interface_name, id) {
            return Err(MaterialError::IdCollision {
                interface: conformance.interface_name.clone(),
                id,
                existing: owner.to_string(),
                incoming: conformance.type_name.clone(),
            });
        }
        Ok(())
    }
}

impl Serialize for TypeConformanceList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.triples())
    }
}

/// Process-wide assignment of conformance ids.
///
/// Material sets register their merged conformances here so ids stay unique
/// across every set built against the same registry.
#[derive(Default)]
pub struct ConformanceRegistry {
    list: RwLock<TypeConformanceList>,
}

impl ConformanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the given reserved conformances.
    pub fn with_reserved(list: TypeConformanceList) -> Self {
        Self {
            list: RwLock::new(list),
        }
    }

    /// Register one conformance.
    pub fn register(
        &self,
        type_name: &str,
        interface_name: &str,
        id: u32,
    ) -> Result<(), MaterialError> {
        let result = self
            .list
            .write()
            .add(TypeConformance::new(type_name, interface_name), id);
        match &result {
            Ok(()) => log::trace!("Registered conformance {type_name}: {interface_name} = {id}"),
            Err(e) => log::error!("Conformance registration failed: {e}"),
        }
        result
    }

    /// Register every conformance of `list`, all or nothing.
    pub fn register_list(&self, list: &TypeConformanceList) -> Result<(), MaterialError> {
        let result = self.list.write().merge(list);
        if let Err(e) = &result {
            log::error!("Conformance registration failed: {e}");
        }
        result
    }

    pub fn id_of(&self, type_name: &str, interface_name: &str) -> Option<u32> {
        self.list.read().id_of(type_name, interface_name)
    }

    /// A copy of every registered conformance.
    pub fn snapshot(&self) -> TypeConformanceList {
        self.list.read().clone()
    }

    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }
}

impl fmt::Debug for ConformanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConformanceRegistry")
            .field("conformances", &self.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(ConformanceRegistry: Send, Sync);
