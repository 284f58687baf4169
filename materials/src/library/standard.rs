//! Metallic-roughness PBR material.

use std::sync::Arc;

use redlilium_params::{
    MaterialParams, ParamLayout, SamplerHandle, SerializedMaterialParams, TextureHandle,
    material_params,
};

use crate::conformance::TypeConformanceList;
use crate::defines::DefineList;
use crate::error::MaterialError;
use crate::material::{self, Material, MaterialType};
use crate::modules::{ShaderModule, ShaderModuleList};

pub const STANDARD_MATERIAL_MODULE: &str = "Rendering/Materials/StandardMaterial.slang";
pub const ALPHA_TEST_MODULE: &str = "Rendering/Materials/AlphaTest.slang";

bitflags::bitflags! {
    /// Structural features of a [`StandardMaterial`], each selecting a define.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StandardFlags: u32 {
        /// Shade back faces with a flipped normal.
        const DOUBLE_SIDED = 1 << 0;
        /// Sample the base color texture.
        const BASE_COLOR_TEXTURE = 1 << 1;
        /// Sample the tangent-space normal map.
        const NORMAL_MAP = 1 << 2;
        /// Add the emissive term.
        const EMISSIVE = 1 << 3;
    }
}

/// Alpha rendering mode.
///
/// The mask cutoff is the numeric `alpha_cutoff` parameter, so tuning it does
/// not change the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum AlphaMode {
    /// Fully opaque (alpha ignored).
    #[default]
    Opaque = 0,
    /// Fragments with alpha below the cutoff are discarded.
    Mask = 1,
    /// Full alpha blending.
    Blend = 2,
}

/// Metallic-roughness material with optional base color and normal textures.
#[derive(Debug, Clone)]
pub struct StandardMaterial {
    name: String,
    flags: StandardFlags,
    alpha_mode: AlphaMode,

    pub base_color: [f32; 4],
    pub emissive: [f32; 3],
    pub roughness: f32,
    pub metallic: f32,
    pub ior: f32,
    pub alpha_cutoff: f32,
    pub normal_scale: f32,
    pub base_color_texture: TextureHandle,
    pub normal_texture: TextureHandle,
    pub sampler: SamplerHandle,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            flags: StandardFlags::empty(),
            alpha_mode: AlphaMode::Opaque,
            base_color: [1.0, 1.0, 1.0, 1.0],
            emissive: [0.0; 3],
            roughness: 0.5,
            metallic: 0.0,
            ior: 1.5,
            alpha_cutoff: 0.5,
            normal_scale: 1.0,
            base_color_texture: TextureHandle::INVALID,
            normal_texture: TextureHandle::INVALID,
            sampler: SamplerHandle::INVALID,
        }
    }
}

material_params!(StandardMaterial as "StandardMaterial" {
    base_color,
    emissive,
    roughness,
    metallic,
    ior,
    alpha_cutoff,
    normal_scale,
    base_color_texture,
    normal_texture,
    sampler,
});

impl StandardMaterial {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_base_color(mut self, base_color: [f32; 4]) -> Self {
        self.base_color = base_color;
        self
    }

    #[must_use]
    pub fn with_metallic_roughness(mut self, metallic: f32, roughness: f32) -> Self {
        self.metallic = metallic;
        self.roughness = roughness;
        self
    }

    /// Set the emissive color and enable the emissive term.
    #[must_use]
    pub fn with_emissive(mut self, emissive: [f32; 3]) -> Self {
        self.emissive = emissive;
        self.flags.insert(StandardFlags::EMISSIVE);
        self
    }

    /// Bind a base color texture and enable sampling it.
    #[must_use]
    pub fn with_base_color_texture(mut self, texture: TextureHandle, sampler: SamplerHandle) -> Self {
        self.base_color_texture = texture;
        self.sampler = sampler;
        self.flags
            .set(StandardFlags::BASE_COLOR_TEXTURE, texture.is_valid());
        self
    }

    /// Bind a normal map and enable normal mapping.
    #[must_use]
    pub fn with_normal_map(mut self, texture: TextureHandle, scale: f32) -> Self {
        self.normal_texture = texture;
        self.normal_scale = scale;
        self.flags.set(StandardFlags::NORMAL_MAP, texture.is_valid());
        self
    }

    #[must_use]
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.flags.set(StandardFlags::DOUBLE_SIDED, double_sided);
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: StandardFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn flags(&self) -> StandardFlags {
        self.flags
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }
}

impl Material for StandardMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn material_type(&self) -> MaterialType {
        MaterialType::Standard
    }

    fn param_layout(&self) -> Result<Arc<ParamLayout>, MaterialError> {
        material::params_layout::<Self>()
    }

    fn serialize_params(&self) -> Result<SerializedMaterialParams, MaterialError> {
        material::serialize_params(self)
    }

    fn deserialize_params(
        &mut self,
        params: &SerializedMaterialParams,
    ) -> Result<(), MaterialError> {
        material::deserialize_params(self, params)
    }

    fn shader_modules(&self) -> Result<ShaderModuleList, MaterialError> {
        let mut modules = ShaderModuleList::new();
        modules.push(ShaderModule::file(STANDARD_MATERIAL_MODULE))?;
        if self.alpha_mode == AlphaMode::Mask {
            modules.push(ShaderModule::file(ALPHA_TEST_MODULE))?;
        }
        Ok(modules)
    }

    fn defines(&self) -> Result<DefineList, MaterialError> {
        Ok(DefineList::new()
            .with_def("ALPHA_MODE", self.alpha_mode as u32)
            .with_def("DOUBLE_SIDED", self.flags.contains(StandardFlags::DOUBLE_SIDED))
            .with_def(
                "HAS_BASE_COLOR_TEXTURE",
                self.flags.contains(StandardFlags::BASE_COLOR_TEXTURE),
            )
            .with_def("HAS_NORMAL_MAP", self.flags.contains(StandardFlags::NORMAL_MAP))
            .with_def("HAS_EMISSIVE", self.flags.contains(StandardFlags::EMISSIVE)))
    }

    fn type_conformances(&self) -> Result<TypeConformanceList, MaterialError> {
        material::material_conformance(self.type_name(), MaterialType::Standard)
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    /// Shader-side mirror of the packed block.
    #[repr(C)]
    #[derive(Clone, Copy, Pod, Zeroable)]
    struct StandardMaterialData {
        base_color: [f32; 4],
        emissive: [f32; 3],
        roughness: f32,
        metallic: f32,
        ior: f32,
        alpha_cutoff: f32,
        normal_scale: f32,
        base_color_texture: u32,
        normal_texture: u32,
        sampler: u32,
        _pad: u32,
    }

    #[test]
    fn test_layout_offsets() {
        let layout = <StandardMaterial as MaterialParams>::param_layout().unwrap();
        let offsets: Vec<(&str, u32)> = layout
            .iter()
            .map(|d| (d.name.as_str(), d.offset))
            .collect();
        assert_eq!(
            offsets,
            vec![
                ("base_color", 0),
                ("emissive", 16),
                ("roughness", 28),
                ("metallic", 32),
                ("ior", 36),
                ("alpha_cutoff", 40),
                ("normal_scale", 44),
                ("base_color_texture", 48),
                ("normal_texture", 52),
                ("sampler", 56),
            ]
        );
        assert_eq!(layout.total_size() as usize, std::mem::size_of::<StandardMaterialData>());
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn test_bytes_match_repr_c_mirror() {
        let material = StandardMaterial::new("brick")
            .with_base_color([0.8, 0.3, 0.2, 1.0])
            .with_metallic_roughness(0.1, 0.9)
            .with_emissive([0.5, 0.25, 0.0])
            .with_base_color_texture(TextureHandle(7), SamplerHandle(2));
        let data = StandardMaterialData {
            base_color: [0.8, 0.3, 0.2, 1.0],
            emissive: [0.5, 0.25, 0.0],
            roughness: 0.9,
            metallic: 0.1,
            ior: 1.5,
            alpha_cutoff: 0.5,
            normal_scale: 1.0,
            base_color_texture: 7,
            normal_texture: u32::MAX,
            sampler: 2,
            _pad: 0,
        };

        let params = material.serialize_params().unwrap();
        assert_eq!(params.as_bytes(), bytemuck::bytes_of(&data));
    }

    #[test]
    fn test_flags_drive_defines() {
        let plain = StandardMaterial::new("plain");
        let defines = plain.defines().unwrap();
        assert_eq!(defines.to_args(), vec!["ALPHA_MODE=0"]);

        let textured = StandardMaterial::new("textured")
            .with_base_color_texture(TextureHandle(1), SamplerHandle(0))
            .with_normal_map(TextureHandle(2), 0.5)
            .with_double_sided(true)
            .with_alpha_mode(AlphaMode::Mask);
        let defines = textured.defines().unwrap();
        assert_eq!(
            defines.to_args(),
            vec![
                "ALPHA_MODE=1",
                "DOUBLE_SIDED",
                "HAS_BASE_COLOR_TEXTURE",
                "HAS_NORMAL_MAP",
            ]
        );
        let module_list = textured.shader_modules().unwrap();
        let modules: Vec<&str> = module_list
            .iter()
            .map(ShaderModule::id)
            .collect();
        assert_eq!(modules, vec![STANDARD_MATERIAL_MODULE, ALPHA_TEST_MODULE]);
    }

    #[test]
    fn test_invalid_texture_does_not_enable_sampling() {
        let material =
            StandardMaterial::new("m").with_base_color_texture(TextureHandle::INVALID, SamplerHandle(0));
        assert!(!material.flags().contains(StandardFlags::BASE_COLOR_TEXTURE));
    }

    #[test]
    fn test_numeric_changes_keep_variant() {
        let a = StandardMaterial::new("a").with_double_sided(true);
        let mut b = a.clone();
        b.roughness = 0.05;
        b.base_color = [0.0, 0.0, 1.0, 1.0];
        b.base_color_texture = TextureHandle(99);

        assert_eq!(
            a.shader_variant().unwrap().key(),
            b.shader_variant().unwrap().key()
        );
        assert_ne!(a.serialize_params().unwrap(), b.serialize_params().unwrap());
    }

    #[test]
    fn test_deserialize_keeps_configuration() {
        let source = StandardMaterial::new("src").with_metallic_roughness(1.0, 0.2);
        let mut target = StandardMaterial::new("dst")
            .with_double_sided(true)
            .with_alpha_mode(AlphaMode::Blend);
        target
            .deserialize_params(&source.serialize_params().unwrap())
            .unwrap();

        assert_eq!(target.metallic, 1.0);
        assert_eq!(target.roughness, 0.2);
        assert_eq!(target.name(), "dst");
        assert_eq!(target.alpha_mode(), AlphaMode::Blend);
        assert!(target.flags().contains(StandardFlags::DOUBLE_SIDED));
    }
}
