//! Collections of materials prepared together for one program.
//!
//! [`MaterialSet::build`] gathers everything a renderer needs from a batch of
//! materials: the merged conformance list handed to the shader compiler, one
//! interned variant per material, and every packed parameter block.

use std::sync::Arc;

use redlilium_params::{SerializedMaterialParams, profile_scope};

use crate::conformance::{ConformanceRegistry, TypeConformanceList};
use crate::error::MaterialError;
use crate::material::{Material, MaterialType};
use crate::variant::{ShaderVariant, ShaderVariantCache};

/// Index of a material within its [`MaterialSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// An ordered collection of owned materials.
#[derive(Debug, Default)]
pub struct MaterialSet {
    materials: Vec<Box<dyn Material>>,
}

impl MaterialSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, material: Box<dyn Material>) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        log::trace!("Added material '{}' as {:?}", material.name(), id);
        self.materials.push(material);
        id
    }

    #[must_use]
    pub fn with(mut self, material: impl Material + 'static) -> Self {
        self.add(Box::new(material));
        self
    }

    pub fn get(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id.0 as usize).map(|m| m.as_ref())
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut (dyn Material + 'static)> {
        self.materials.get_mut(id.0 as usize).map(|m| m.as_mut())
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Material + 'static)> {
        self.materials.iter().map(|m| m.as_ref())
    }

    /// Collect the shader data of every material.
    ///
    /// Conformances are merged across the set and registered with `registry`,
    /// so ids stay unique across every set built against it. Variants are
    /// interned in `cache`.
    ///
    /// # Errors
    ///
    /// Fails on the first material whose data cannot be produced, or on any
    /// conformance id collision. Nothing is registered on failure.
    pub fn build(
        &self,
        registry: &ConformanceRegistry,
        cache: &ShaderVariantCache,
    ) -> Result<MaterialSetBuild, MaterialError> {
        profile_scope!("material_set_build");

        let mut conformances = TypeConformanceList::new();
        for material in &self.materials {
            conformances.merge(&material.type_conformances()?)?;
        }

        let mut entries = Vec::with_capacity(self.materials.len());
        for material in &self.materials {
            let variant = cache.intern(material.shader_variant()?);
            let mut blocks = Vec::new();
            collect_blocks(material.as_ref(), &mut blocks)?;
            entries.push(MaterialEntry {
                name: material.name().to_string(),
                material_type: material.material_type(),
                variant,
                blocks,
            });
        }

        registry.register_list(&conformances)?;

        log::debug!(
            "Built material set: {} materials, {} conformances",
            entries.len(),
            conformances.len()
        );

        Ok(MaterialSetBuild {
            conformances,
            entries,
        })
    }
}

/// Own block first, then every descendant's, depth first.
fn collect_blocks(
    material: &dyn Material,
    blocks: &mut Vec<SerializedMaterialParams>,
) -> Result<(), MaterialError> {
    blocks.push(material.serialize_params()?);
    for child in material.children() {
        collect_blocks(child, blocks)?;
    }
    Ok(())
}

/// Shader data of one material in a built set.
#[derive(Debug, Clone)]
pub struct MaterialEntry {
    pub name: String,
    pub material_type: MaterialType,
    pub variant: Arc<ShaderVariant>,
    /// The material's own block followed by its children's, depth first.
    pub blocks: Vec<SerializedMaterialParams>,
}

impl MaterialEntry {
    /// The material's own parameter block.
    pub fn params(&self) -> Option<&SerializedMaterialParams> {
        self.blocks.first()
    }
}

/// Output of [`MaterialSet::build`].
#[derive(Debug, Clone)]
pub struct MaterialSetBuild {
    pub conformances: TypeConformanceList,
    pub entries: Vec<MaterialEntry>,
}

impl MaterialSetBuild {
    pub fn entry(&self, id: MaterialId) -> Option<&MaterialEntry> {
        self.entries.get(id.0 as usize)
    }

    /// Distinct variants in first-use order.
    pub fn variants(&self) -> Vec<Arc<ShaderVariant>> {
        let mut variants: Vec<Arc<ShaderVariant>> = Vec::new();
        for entry in &self.entries {
            if !variants.iter().any(|v| Arc::ptr_eq(v, &entry.variant)) {
                variants.push(Arc::clone(&entry.variant));
            }
        }
        variants
    }

    /// Total packed size of every block.
    pub fn params_size(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| e.blocks.iter())
            .map(SerializedMaterialParams::len)
            .sum()
    }
}
