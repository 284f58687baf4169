//! The material protocol.
//!
//! Every concrete material, built-in or user-defined, implements
//! [`Material`]. The renderer only ever talks to materials through this
//! trait: it asks for the packed parameter block, the shader modules and
//! defines that select the variant, and the type conformances that wire the
//! concrete type into the shader's dynamic dispatch.
//!
//! Structural configuration (flags, alpha mode, child materials) decides the
//! variant. Numeric parameters only ever flow through
//! [`Material::serialize_params`], so changing a color or a texture handle
//! never triggers a shader recompile.

use std::fmt;
use std::sync::Arc;

use redlilium_params::{MaterialParams, ParamLayout, SerializedMaterialParams};
use serde::Serialize;

use crate::conformance::{MATERIAL_INTERFACE, TypeConformance, TypeConformanceList};
use crate::defines::DefineList;
use crate::error::MaterialError;
use crate::modules::ShaderModuleList;
use crate::variant::ShaderVariant;

/// Material kinds and their shader dispatch ids.
///
/// User-defined materials use [`MaterialType::User`] with an id of at least
/// [`MaterialType::FIRST_USER_ID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum MaterialType {
    #[default]
    Unknown,
    Standard,
    Diffuse,
    Interface,
    Mix,
    User(u32),
}

impl MaterialType {
    /// Ids below this are reserved for built-in types.
    pub const FIRST_USER_ID: u32 = 64;

    pub const BUILTIN: [MaterialType; 4] = [
        MaterialType::Standard,
        MaterialType::Diffuse,
        MaterialType::Interface,
        MaterialType::Mix,
    ];

    /// A user type id, or `None` if `id` falls in the reserved range.
    pub fn user(id: u32) -> Option<Self> {
        (id >= Self::FIRST_USER_ID).then_some(Self::User(id))
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Unknown => 0,
            Self::Standard => 1,
            Self::Diffuse => 2,
            Self::Interface => 3,
            Self::Mix => 4,
            Self::User(id) => id,
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Unknown),
            1 => Some(Self::Standard),
            2 => Some(Self::Diffuse),
            3 => Some(Self::Interface),
            4 => Some(Self::Mix),
            _ => Self::user(id),
        }
    }

    pub fn is_builtin(self) -> bool {
        !matches!(self, Self::Unknown | Self::User(_))
    }

    /// Shader type name of a built-in type. User types report theirs through
    /// [`Material::type_name`].
    pub fn type_name(self) -> &'static str {
        match self {
            Self::Unknown => "UnknownMaterial",
            Self::Standard => "StandardMaterial",
            Self::Diffuse => "DiffuseMaterial",
            Self::Interface => "InterfaceMaterial",
            Self::Mix => "MixMaterial",
            Self::User(_) => "UserMaterial",
        }
    }

    /// Conformances of every built-in type, for reserving their ids.
    pub fn builtin_conformances() -> TypeConformanceList {
        let mut list = TypeConformanceList::new();
        for ty in Self::BUILTIN {
            let added = list.add(TypeConformance::new(ty.type_name(), MATERIAL_INTERFACE), ty.id());
            debug_assert!(added.is_ok(), "built-in material ids must be distinct: {added:?}");
        }
        list
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "UserMaterial#{id}"),
            _ => f.write_str(self.type_name()),
        }
    }
}

/// The material protocol.
///
/// Implementations must be pure: for the same configuration and values, every
/// method returns equal results on every call and in every process.
pub trait Material: Send + Sync + fmt::Debug {
    /// Instance name, for diagnostics.
    fn name(&self) -> &str;

    /// Concrete shader type name, the key of the parameter layout.
    fn type_name(&self) -> &'static str;

    fn material_type(&self) -> MaterialType;

    /// The shared layout of this material's parameter block.
    fn param_layout(&self) -> Result<Arc<ParamLayout>, MaterialError>;

    /// Pack the current numeric parameters.
    fn serialize_params(&self) -> Result<SerializedMaterialParams, MaterialError>;

    /// Replace the numeric parameters from a packed block.
    ///
    /// On error the material is left unmodified.
    fn deserialize_params(
        &mut self,
        params: &SerializedMaterialParams,
    ) -> Result<(), MaterialError>;

    /// Shader modules, in compile order.
    fn shader_modules(&self) -> Result<ShaderModuleList, MaterialError>;

    /// Preprocessor defines derived from structural configuration.
    fn defines(&self) -> Result<DefineList, MaterialError>;

    /// Type conformances this material needs for dynamic dispatch.
    fn type_conformances(&self) -> Result<TypeConformanceList, MaterialError>;

    /// Nested materials whose parameter blocks are packed alongside this one.
    fn children(&self) -> Vec<&dyn Material> {
        Vec::new()
    }

    /// The shader variant selected by this material's configuration.
    fn shader_variant(&self) -> Result<ShaderVariant, MaterialError> {
        Ok(ShaderVariant::new(self.shader_modules()?, self.defines()?))
    }
}

/// Layout of a [`MaterialParams`] type, for [`Material::param_layout`].
pub fn params_layout<T: MaterialParams>() -> Result<Arc<ParamLayout>, MaterialError> {
    Ok(T::param_layout()?)
}

/// Pack a [`MaterialParams`] instance, for [`Material::serialize_params`].
pub fn serialize_params<T: MaterialParams>(
    instance: &T,
) -> Result<SerializedMaterialParams, MaterialError> {
    Ok(redlilium_params::serialize(instance)?)
}

/// Unpack into a [`MaterialParams`] instance, for [`Material::deserialize_params`].
pub fn deserialize_params<T: MaterialParams>(
    instance: &mut T,
    params: &SerializedMaterialParams,
) -> Result<(), MaterialError> {
    redlilium_params::deserialize(instance, params)?;
    Ok(())
}

/// The single conformance of a leaf material type to the material interface.
pub fn material_conformance(
    type_name: &str,
    ty: MaterialType,
) -> Result<TypeConformanceList, MaterialError> {
    TypeConformanceList::new().with(type_name, MATERIAL_INTERFACE, ty.id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip() {
        for ty in MaterialType::BUILTIN {
            assert_eq!(MaterialType::from_id(ty.id()), Some(ty));
            assert!(ty.id() < MaterialType::FIRST_USER_ID);
        }
        assert_eq!(MaterialType::from_id(0), Some(MaterialType::Unknown));
        assert_eq!(MaterialType::from_id(5), None);
        assert_eq!(MaterialType::from_id(63), None);
        assert_eq!(MaterialType::from_id(99), Some(MaterialType::User(99)));
        assert_eq!(MaterialType::Interface.id(), 3);
    }

    #[test]
    fn test_user_types() {
        assert_eq!(MaterialType::user(3), None);
        let terrain = MaterialType::user(MaterialType::FIRST_USER_ID).unwrap();
        assert_eq!(terrain.id(), 64);
        assert!(!terrain.is_builtin());
        assert!(MaterialType::Mix.is_builtin());
        assert_eq!(terrain.to_string(), "UserMaterial#64");

        let list = material_conformance("TerrainMaterial", terrain).unwrap();
        assert_eq!(list.id_of("TerrainMaterial", MATERIAL_INTERFACE), Some(64));
        MaterialType::builtin_conformances().merge(&list).unwrap();
    }

    #[test]
    fn test_builtin_conformances() {
        let list = MaterialType::builtin_conformances();
        assert_eq!(list.len(), 4);
        assert_eq!(list.id_of("InterfaceMaterial", MATERIAL_INTERFACE), Some(3));
        assert_eq!(list.type_for_id(MATERIAL_INTERFACE, 1), Some("StandardMaterial"));
    }

    #[test]
    fn test_material_is_object_safe() {
        fn assert_object_safe(_: Option<&dyn Material>) {}
        assert_object_safe(None);
    }
}
