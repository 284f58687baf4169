//! # RedLilium Materials
//!
//! The material protocol and the shader-side data materials contribute.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`Material`] - Object-safe protocol every material type implements
//! - [`DefineList`] / [`ShaderModuleList`] - Variant selection from structural configuration
//! - [`TypeConformanceList`] / [`ConformanceRegistry`] - Dispatch ids for shader interfaces
//! - [`ShaderVariant`] / [`ShaderVariantCache`] - Content-keyed, deduplicated variants
//! - [`MaterialSet`] - Batch build of conformances, variants and parameter blocks
//! - [`library`] - Built-in standard, diffuse, interface and mix materials
//!
//! Parameter layouts and packing live in [`redlilium_params`], re-exported
//! here as [`params`].
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_materials::{ConformanceRegistry, MaterialSet, ShaderVariantCache};
//! use redlilium_materials::library::{InterfaceMaterial, StandardMaterial};
//!
//! let set = MaterialSet::new()
//!     .with(StandardMaterial::new("floor").with_double_sided(true))
//!     .with(InterfaceMaterial::new("hologram"));
//!
//! let registry = ConformanceRegistry::with_reserved(MaterialType::builtin_conformances());
//! let build = set.build(&registry, &ShaderVariantCache::new())?;
//! ```

pub mod conformance;
pub mod defines;
mod error;
pub mod library;
pub mod material;
pub mod modules;
pub mod set;
pub mod variant;

pub use redlilium_params as params;

pub use conformance::{
    ConformanceRegistry, MATERIAL_INTERFACE, TypeConformance, TypeConformanceList,
};
pub use defines::{DefineList, ShaderDef};
pub use error::MaterialError;
pub use material::{Material, MaterialType};
pub use modules::{ShaderModule, ShaderModuleList};
pub use set::{MaterialEntry, MaterialId, MaterialSet, MaterialSetBuild};
pub use variant::{ShaderVariant, ShaderVariantCache};

/// Materials library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    static_assertions::assert_impl_all!(MaterialSet: Send, Sync);
    static_assertions::assert_impl_all!(ShaderVariant: Send, Sync);
}
