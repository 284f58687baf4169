//! Material whose shading is implemented entirely by a shader-side type.
//!
//! The host only packs a base color and roughness; everything else lives in
//! the `InterfaceMaterial` shader module, reached through its `IMaterial`
//! conformance.

use std::sync::Arc;

use redlilium_params::{MaterialParams, ParamLayout, SerializedMaterialParams, material_params};

use crate::conformance::TypeConformanceList;
use crate::defines::DefineList;
use crate::error::MaterialError;
use crate::material::{self, Material, MaterialType};
use crate::modules::{ShaderModule, ShaderModuleList};

pub const INTERFACE_MATERIAL_MODULE: &str = "Rendering/Materials/InterfaceMaterial.slang";

#[derive(Debug, Clone)]
pub struct InterfaceMaterial {
    name: String,

    pub base_color: [f32; 4],
    pub roughness: f32,
}

impl Default for InterfaceMaterial {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 0.5,
        }
    }
}

material_params!(InterfaceMaterial as "InterfaceMaterial" { base_color, roughness });

impl InterfaceMaterial {
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
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }
}

impl Material for InterfaceMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn material_type(&self) -> MaterialType {
        MaterialType::Interface
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
        ShaderModuleList::from_modules([ShaderModule::file(INTERFACE_MATERIAL_MODULE)])
    }

    fn defines(&self) -> Result<DefineList, MaterialError> {
        Ok(DefineList::new())
    }

    fn type_conformances(&self) -> Result<TypeConformanceList, MaterialError> {
        material::material_conformance(self.type_name(), MaterialType::Interface)
    }
}
