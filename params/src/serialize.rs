//! Packing material fields into constant-buffer blocks and back.
//!
//! [`serialize`] writes every field of a material's layout little-endian at
//! its offset into a zero-filled block of `layout.total_size()` bytes.
//! [`deserialize`] performs the inverse, and replaces the instance only once
//! every field has been decoded and applied, so a failed call leaves the
//! instance untouched.
//!
//! Round trip: for any instance `a`, deserializing `serialize(a)` into `b`
//! makes `serialize(b)` byte-identical to `serialize(a)`.

use std::sync::Arc;

use crate::error::ParamError;
use crate::layout::ParamLayout;
use crate::profile_function;
use crate::schema::MaterialParams;
use crate::types::ParamValue;

/// An immutable snapshot of one material instance's packed parameters.
///
/// Holds exactly `layout.total_size()` bytes. Cloning is cheap.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedMaterialParams {
    bytes: Arc<[u8]>,
}

impl SerializedMaterialParams {
    /// Wrap raw bytes, e.g. a block read back from storage.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the block is empty (a layout with no fields).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for SerializedMaterialParams {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

static_assertions::assert_impl_all!(SerializedMaterialParams: Send, Sync);

/// Pack `instance` using its registered layout.
///
/// # Errors
///
/// Fails if the type's layout has a schema conflict, or if the instance does
/// not expose a declared field with the declared type.
pub fn serialize<T: MaterialParams>(instance: &T) -> Result<SerializedMaterialParams, ParamError> {
    let layout = T::param_layout()?;
    serialize_with(instance, &layout)
}

/// Pack `instance` against an explicit layout.
pub fn serialize_with<T: MaterialParams>(
    instance: &T,
    layout: &ParamLayout,
) -> Result<SerializedMaterialParams, ParamError> {
    profile_function!();

    let mut bytes = vec![0u8; layout.total_size() as usize];
    for d in layout.iter() {
        let value = instance
            .param(&d.name)
            .ok_or_else(|| ParamError::MissingField {
                material: T::TYPE_NAME,
                field: d.name.clone(),
            })?;
        if value.param_type() != d.ty {
            return Err(ParamError::TypeMismatch {
                field: d.name.clone(),
                expected: d.ty,
                found: value.param_type(),
            });
        }
        let start = d.offset as usize;
        value.write_le(&mut bytes[start..start + d.size as usize]);
    }

    Ok(SerializedMaterialParams::from_bytes(bytes))
}

/// Unpack `params` into `instance` using its registered layout.
///
/// # Errors
///
/// Returns [`ParamError::SizeMismatch`] if the block size differs from the
/// layout size. On any error the instance is left unmodified.
pub fn deserialize<T: MaterialParams>(
    instance: &mut T,
    params: &SerializedMaterialParams,
) -> Result<(), ParamError> {
    let layout = T::param_layout()?;
    deserialize_with(instance, &layout, params)
}

/// Unpack `params` into `instance` against an explicit layout.
pub fn deserialize_with<T: MaterialParams>(
    instance: &mut T,
    layout: &ParamLayout,
    params: &SerializedMaterialParams,
) -> Result<(), ParamError> {
    profile_function!();

    let bytes = params.as_bytes();
    if bytes.len() != layout.total_size() as usize {
        return Err(ParamError::SizeMismatch {
            expected: layout.total_size() as usize,
            actual: bytes.len(),
        });
    }

    let mut staged = instance.clone();
    for d in layout.iter() {
        let start = d.offset as usize;
        let value = ParamValue::read_le(d.ty, &bytes[start..start + d.size as usize]);
        staged.set_param(&d.name, value)?;
    }

    *instance = staged;
    Ok(())
}
