//! Lambertian material.

use std::sync::Arc;

use redlilium_params::{
    MaterialParams, ParamLayout, SerializedMaterialParams, TextureHandle, material_params,
};

use crate::conformance::TypeConformanceList;
use crate::defines::DefineList;
use crate::error::MaterialError;
use crate::material::{self, Material, MaterialType};
use crate::modules::{ShaderModule, ShaderModuleList};

pub const DIFFUSE_MATERIAL_MODULE: &str = "Rendering/Materials/DiffuseMaterial.slang";

/// Pure diffuse reflector.
#[derive(Debug, Clone)]
pub struct DiffuseMaterial {
    name: String,
    double_sided: bool,

    pub albedo: [f32; 3],
    pub albedo_texture: TextureHandle,
}

impl Default for DiffuseMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            double_sided: false,
            albedo: [0.8, 0.8, 0.8],
            albedo_texture: TextureHandle::INVALID,
        }
    }
}

material_params!(DiffuseMaterial as "DiffuseMaterial" { albedo, albedo_texture });

impl DiffuseMaterial {
    pub fn new(name: impl Into<String>, albedo: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            albedo,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_albedo_texture(mut self, texture: TextureHandle) -> Self {
        self.albedo_texture = texture;
        self
    }

    #[must_use]
    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn is_double_sided(&self) -> bool {
        self.double_sided
    }
}

impl Material for DiffuseMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn material_type(&self) -> MaterialType {
        MaterialType::Diffuse
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
        ShaderModuleList::from_modules([ShaderModule::file(DIFFUSE_MATERIAL_MODULE)])
    }

    fn defines(&self) -> Result<DefineList, MaterialError> {
        Ok(DefineList::new().with_def("DOUBLE_SIDED", self.double_sided))
    }

    fn type_conformances(&self) -> Result<TypeConformanceList, MaterialError> {
        material::material_conformance(self.type_name(), MaterialType::Diffuse)
    }
}
