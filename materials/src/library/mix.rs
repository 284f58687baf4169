//! Composite material blending two child materials.

use std::sync::Arc;

use redlilium_params::{
    MaterialParams, ParamData, ParamLayout, ParamType, ParamValue, SerializedMaterialParams,
    material_params,
};

use crate::conformance::TypeConformanceList;
use crate::defines::DefineList;
use crate::error::MaterialError;
use crate::material::{self, Material, MaterialType};
use crate::modules::{ShaderModule, ShaderModuleList};

pub const MIX_MATERIAL_MODULE: &str = "Rendering/Materials/MixMaterial.slang";

/// How the two layers are combined at shading time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum MixMode {
    /// Evaluate both layers and lerp by the mix factor.
    #[default]
    Blend = 0,
    /// Pick one layer per sample with probability given by the mix factor.
    Stochastic = 1,
}

impl ParamData for MixMode {
    const PARAM_TYPE: ParamType = ParamType::Enum;

    fn to_param(&self) -> ParamValue {
        ParamValue::Enum(*self as u32)
    }

    fn from_param(value: &ParamValue) -> Option<Self> {
        match value {
            ParamValue::Enum(0) => Some(Self::Blend),
            ParamValue::Enum(1) => Some(Self::Stochastic),
            _ => None,
        }
    }
}

/// Packed parameters of a [`MixMaterial`].
#[derive(Debug, Clone, PartialEq)]
pub struct MixParams {
    /// Weight of the second layer, in [0, 1].
    pub mix_factor: f32,
    pub mix_mode: MixMode,
}

impl Default for MixParams {
    fn default() -> Self {
        Self {
            mix_factor: 0.5,
            mix_mode: MixMode::Blend,
        }
    }
}

material_params!(MixParams as "MixMaterial" { mix_factor, mix_mode });

/// Blend of two owned child materials.
///
/// Shader modules, defines and conformances are the union of both layers'
/// plus the mix module. Each layer keeps its own parameter block.
#[derive(Debug)]
pub struct MixMaterial {
    name: String,
    layers: [Box<dyn Material>; 2],
    pub params: MixParams,
}

impl MixMaterial {
    pub fn new(
        name: impl Into<String>,
        first: Box<dyn Material>,
        second: Box<dyn Material>,
    ) -> Self {
        Self {
            name: name.into(),
            layers: [first, second],
            params: MixParams::default(),
        }
    }

    #[must_use]
    pub fn with_mix_factor(mut self, mix_factor: f32) -> Self {
        self.params.mix_factor = mix_factor;
        self
    }

    #[must_use]
    pub fn with_mix_mode(mut self, mix_mode: MixMode) -> Self {
        self.params.mix_mode = mix_mode;
        self
    }

    pub fn layers(&self) -> &[Box<dyn Material>; 2] {
        &self.layers
    }

    /// Mutable access to one layer, for updating its parameters.
    pub fn layer_mut(&mut self, index: usize) -> Option<&mut (dyn Material + 'static)> {
        self.layers.get_mut(index).map(|layer| layer.as_mut())
    }
}

impl Material for MixMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        MixParams::TYPE_NAME
    }

    fn material_type(&self) -> MaterialType {
        MaterialType::Mix
    }

    fn param_layout(&self) -> Result<Arc<ParamLayout>, MaterialError> {
        material::params_layout::<MixParams>()
    }

    fn serialize_params(&self) -> Result<SerializedMaterialParams, MaterialError> {
        material::serialize_params(&self.params)
    }

    fn deserialize_params(
        &mut self,
        params: &SerializedMaterialParams,
    ) -> Result<(), MaterialError> {
        material::deserialize_params(&mut self.params, params)
    }

    fn shader_modules(&self) -> Result<ShaderModuleList, MaterialError> {
        let mut modules = ShaderModuleList::new();
        for layer in &self.layers {
            modules.merge(&layer.shader_modules()?)?;
        }
        modules.merge(&ShaderModuleList::from_modules([ShaderModule::file(
            MIX_MATERIAL_MODULE,
        )])?)?;
        Ok(modules)
    }

    fn defines(&self) -> Result<DefineList, MaterialError> {
        let mut defines = DefineList::new();
        for layer in &self.layers {
            defines.merge(&layer.defines()?)?;
        }
        Ok(defines)
    }

    fn type_conformances(&self) -> Result<TypeConformanceList, MaterialError> {
        let mut conformances =
            material::material_conformance(self.type_name(), MaterialType::Mix)?;
        for layer in &self.layers {
            conformances.merge(&layer.type_conformances()?)?;
        }
        Ok(conformances)
    }

    fn children(&self) -> Vec<&dyn Material> {
        self.layers.iter().map(|layer| layer.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use redlilium_params::TextureHandle;

    use super::*;
    use crate::conformance::MATERIAL_INTERFACE;
    use crate::library::{DiffuseMaterial, InterfaceMaterial, StandardMaterial};
    use crate::library::diffuse::DIFFUSE_MATERIAL_MODULE;
    use crate::library::interface::INTERFACE_MATERIAL_MODULE;

    fn mix() -> MixMaterial {
        MixMaterial::new(
            "rust",
            Box::new(DiffuseMaterial::new("paint", [0.7, 0.1, 0.1]).with_double_sided(true)),
            Box::new(InterfaceMaterial::new("metal")),
        )
        .with_mix_factor(0.25)
    }

    #[test]
    fn test_conformances_union() {
        let conformances = mix().type_conformances().unwrap();
        assert_eq!(
            conformances.triples(),
            vec![
                ("DiffuseMaterial", MATERIAL_INTERFACE, 2),
                ("InterfaceMaterial", MATERIAL_INTERFACE, 3),
                ("MixMaterial", MATERIAL_INTERFACE, 4),
            ]
        );
    }

    #[test]
    fn test_modules_children_first() {
        let ids: Vec<String> = mix()
            .shader_modules()
            .unwrap()
            .iter()
            .map(|m| m.id().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                DIFFUSE_MATERIAL_MODULE,
                INTERFACE_MATERIAL_MODULE,
                MIX_MATERIAL_MODULE,
            ]
        );
    }

    #[test]
    fn test_nested_mix_shares_modules() {
        let inner = mix();
        let outer = MixMaterial::new("outer", Box::new(inner), Box::new(StandardMaterial::new("s")));
        let modules = outer.shader_modules().unwrap();
        assert_eq!(
            modules
                .iter()
                .filter(|m| m.id() == MIX_MATERIAL_MODULE)
                .count(),
            1
        );
        assert_eq!(outer.children().len(), 2);
    }

    #[test]
    fn test_conflicting_layer_defines_rejected() {
        let material = MixMaterial::new(
            "conflict",
            Box::new(StandardMaterial::new("opaque")),
            Box::new(
                StandardMaterial::new("masked")
                    .with_alpha_mode(crate::library::AlphaMode::Mask),
            ),
        );
        let err = material.defines().unwrap_err();
        assert!(matches!(err, MaterialError::ConflictingDefine { ref name, .. } if name == "ALPHA_MODE"));
    }

    #[test]
    fn test_own_block_excludes_layers() {
        let material = mix().with_mix_mode(MixMode::Stochastic);
        let params = material.serialize_params().unwrap();
        assert_eq!(params.len(), 16);
        assert_eq!(&params.as_bytes()[0..4], &0.25f32.to_le_bytes());
        assert_eq!(&params.as_bytes()[4..8], &1u32.to_le_bytes());

        let mut other = mix();
        other.deserialize_params(&params).unwrap();
        assert_eq!(other.params.mix_mode, MixMode::Stochastic);
    }

    #[test]
    fn test_layer_mut_changes_block_not_variant() {
        let mut material = mix();
        let before = material.shader_variant().unwrap().key();
        let layer = material.layer_mut(0).unwrap();
        let block = DiffuseMaterial::new("x", [0.0; 3])
            .with_albedo_texture(TextureHandle(3))
            .serialize_params()
            .unwrap();
        layer.deserialize_params(&block).unwrap();

        assert_eq!(material.shader_variant().unwrap().key(), before);
        assert_eq!(material.layers()[0].serialize_params().unwrap(), block);
        assert!(material.layer_mut(2).is_none());
    }
}
