//! Shader variants: the module list and define set a program is compiled from.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::defines::DefineList;
use crate::modules::ShaderModuleList;

/// One compilable shader configuration.
///
/// Two variants with equal modules and defines have equal keys, in any
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ShaderVariant {
    modules: ShaderModuleList,
    defines: DefineList,
    key: u64,
}

impl ShaderVariant {
    pub fn new(modules: ShaderModuleList, defines: DefineList) -> Self {
        let mut hasher = Xxh3::new();
        modules.write_fingerprint(&mut hasher);
        hasher.update(&[0xff]);
        defines.write_fingerprint(&mut hasher);
        Self {
            modules,
            defines,
            key: hasher.digest(),
        }
    }

    pub fn modules(&self) -> &ShaderModuleList {
        &self.modules
    }

    pub fn defines(&self) -> &DefineList {
        &self.defines
    }

    /// Stable 64-bit cache key.
    pub fn key(&self) -> u64 {
        self.key
    }
}

impl fmt::Display for ShaderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x} [", self.key)?;
        for (i, module) in self.modules.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{module}")?;
        }
        write!(f, "] {}", self.defines)
    }
}

/// Deduplicates shader variants so every distinct variant is compiled once.
#[derive(Default)]
pub struct ShaderVariantCache {
    variants: RwLock<HashMap<u64, Arc<ShaderVariant>>>,
}

impl ShaderVariantCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared instance of `variant`, inserting it if new.
    pub fn intern(&self, variant: ShaderVariant) -> Arc<ShaderVariant> {
        let key = variant.key();
        if let Some(existing) = self.variants.read().get(&key) {
            if **existing == variant {
                return Arc::clone(existing);
            }
        }

        let mut variants = self.variants.write();
        let entry = variants
            .entry(key)
            .or_insert_with(|| {
                log::debug!("New shader variant {variant}");
                Arc::new(variant.clone())
            });
        if **entry == variant {
            Arc::clone(entry)
        } else {
            log::warn!("Shader variant key collision on {key:016x}, variant left uncached");
            Arc::new(variant)
        }
    }

    pub fn get(&self, key: u64) -> Option<Arc<ShaderVariant>> {
        self.variants.read().get(&key).cloned()
    }

    pub fn len(&self) -> usize {
        self.variants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.read().is_empty()
    }

    pub fn clear(&self) {
        self.variants.write().clear();
    }
}

impl fmt::Debug for ShaderVariantCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderVariantCache")
            .field("variants", &self.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(ShaderVariantCache: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::ShaderModule;

    fn variant(module: &str, defines: &[(&str, &str)]) -> ShaderVariant {
        ShaderVariant::new(
            ShaderModuleList::from_modules([ShaderModule::file(module)]).unwrap(),
            defines.iter().copied().collect(),
        )
    }

    #[test]
    fn test_key_is_content_addressed() {
        let a = variant("A.slang", &[("X", "1"), ("Y", "")]);
        let b = variant("A.slang", &[("Y", ""), ("X", "1")]);
        assert_eq!(a.key(), b.key());

        let c = variant("A.slang", &[("X", "2"), ("Y", "")]);
        assert_ne!(a.key(), c.key());
        let d = variant("B.slang", &[("X", "1"), ("Y", "")]);
        assert_ne!(a.key(), d.key());
    }

    #[test]
    fn test_cache_interns() {
        let cache = ShaderVariantCache::new();
        let a = cache.intern(variant("A.slang", &[("X", "1")]));
        let b = cache.intern(variant("A.slang", &[("X", "1")]));
        let c = cache.intern(variant("A.slang", &[]));

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(a.key()).is_some());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_display() {
        let v = variant("A.slang", &[("X", "1")]);
        assert!(v.to_string().ends_with("[A.slang] X=1"));
    }
}
