//! Lazily-built, process-wide layout registry.
//!
//! Each material type's [`ParamLayout`] is constructed on first request and
//! shared afterwards. The registry maps a type to an initialization cell; the
//! map lock is only held to find or insert the cell, and construction runs
//! inside the cell's own `OnceLock`. Concurrent first requests for the same
//! type therefore build exactly once, while requests for other types are not
//! blocked by it.
//!
//! A failed construction is cached like a successful one: every caller sees
//! the same [`LayoutError`], and the schema is never rebuilt or repaired.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::error::LayoutError;
use crate::layout::ParamLayout;
use crate::profile_scope_dynamic;
use crate::schema::MaterialParams;

type LayoutCell = Arc<OnceLock<Result<Arc<ParamLayout>, LayoutError>>>;

/// Registry of per-type parameter layouts.
///
/// Usually accessed through [`LayoutRegistry::global`]; separate instances are
/// useful for tests that need to observe first construction.
#[derive(Default)]
pub struct LayoutRegistry {
    entries: RwLock<HashMap<TypeId, LayoutCell>>,
}

static GLOBAL_REGISTRY: OnceLock<LayoutRegistry> = OnceLock::new();

impl LayoutRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry.
    pub fn global() -> &'static LayoutRegistry {
        GLOBAL_REGISTRY.get_or_init(LayoutRegistry::new)
    }

    /// Get the layout of `T`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns the [`LayoutError`] reported by `T::describe_params` if the
    /// type declares a conflicting schema. The error is returned on every
    /// call, not only the first.
    pub fn layout_for<T: MaterialParams>(&self) -> Result<Arc<ParamLayout>, LayoutError> {
        let cell = self.cell(TypeId::of::<T>());
        cell.get_or_init(|| {
            profile_scope_dynamic!(T::TYPE_NAME);
            match T::describe_params() {
                Ok(layout) => {
                    log::debug!(
                        "Registered param layout for {} ({} bytes)",
                        T::TYPE_NAME,
                        layout.total_size()
                    );
                    Ok(Arc::new(layout))
                }
                Err(err) => {
                    log::error!("Schema conflict in material type {}: {err}", T::TYPE_NAME);
                    Err(err)
                }
            }
        })
        .clone()
    }

    /// Whether a layout for `T` has been constructed (successfully or not).
    pub fn contains<T: MaterialParams>(&self) -> bool {
        self.entries
            .read()
            .get(&TypeId::of::<T>())
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of types whose construction has completed.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Whether no layout has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, id: TypeId) -> LayoutCell {
        if let Some(cell) = self.entries.read().get(&id) {
            return Arc::clone(cell);
        }
        Arc::clone(self.entries.write().entry(id).or_default())
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutRegistry")
            .field("layout_count", &self.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(LayoutRegistry: Send, Sync);
