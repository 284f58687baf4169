//! # RedLilium Params
//!
//! Material parameter layouts and byte-exact constant-buffer packing.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`ParamLayout`] - Immutable per-type schema of named, typed, offset-assigned fields
//! - [`LayoutRegistry`] - Builds each type's layout once, on first use, thread-safe
//! - [`MaterialParams`] - Static schema and by-name field access of a material type
//! - [`serialize`] / [`deserialize`] - Little-endian packing into [`SerializedMaterialParams`]
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_params::{material_params, serialize, deserialize};
//!
//! #[derive(Clone)]
//! struct Plastic { base_color: [f32; 4], roughness: f32 }
//! // impl Default ...
//! material_params!(Plastic as "Plastic" { base_color, roughness });
//!
//! let block = serialize(&plastic)?;          // 32 bytes
//! deserialize(&mut other_plastic, &block)?;
//! ```

mod error;
pub mod layout;
pub mod profiling;
pub mod registry;
pub mod schema;
pub mod serialize;
pub mod types;

pub use error::{LayoutError, ParamError};
pub use layout::{CONSTANT_BUFFER_ALIGNMENT, ParamDescriptor, ParamLayout, ParamLayoutBuilder};
pub use registry::LayoutRegistry;
pub use schema::MaterialParams;
pub use serialize::{
    SerializedMaterialParams, deserialize, deserialize_with, serialize, serialize_with,
};
pub use types::{ParamData, ParamType, ParamValue, SamplerHandle, TextureHandle};

/// Params library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
