//! Built-in material types.
//!
//! - [`StandardMaterial`] - Metallic-roughness PBR with capability flags
//! - [`DiffuseMaterial`] - Lambertian reflector
//! - [`InterfaceMaterial`] - Shading implemented by a shader-side `IMaterial` type
//! - [`MixMaterial`] - Blend of two child materials

pub mod diffuse;
pub mod interface;
pub mod mix;
pub mod standard;

pub use diffuse::DiffuseMaterial;
pub use interface::InterfaceMaterial;
pub use mix::{MixMaterial, MixMode, MixParams};
pub use standard::{AlphaMode, StandardFlags, StandardMaterial};
