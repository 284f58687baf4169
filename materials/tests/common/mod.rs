//! Shared helpers for material integration tests.

#![allow(dead_code)]

use redlilium_materials::Material;
use redlilium_materials::library::{
    AlphaMode, DiffuseMaterial, InterfaceMaterial, MixMaterial, MixMode, StandardMaterial,
};
use redlilium_materials::params::{SamplerHandle, TextureHandle};

/// Built-in material kinds exercised by parameterized tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Standard,
    Diffuse,
    Interface,
    Mix,
}

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A material of `kind` with non-default values in every packed field.
pub fn populated(kind: Kind) -> Box<dyn Material> {
    match kind {
        Kind::Standard => Box::new(
            StandardMaterial::new("populated")
                .with_base_color([0.9, 0.4, 0.1, 0.75])
                .with_metallic_roughness(0.3, 0.65)
                .with_emissive([2.0, 1.0, 0.5])
                .with_base_color_texture(TextureHandle(11), SamplerHandle(2))
                .with_normal_map(TextureHandle(12), 0.8)
                .with_alpha_mode(AlphaMode::Mask),
        ),
        Kind::Diffuse => Box::new(
            DiffuseMaterial::new("populated", [0.2, 0.4, 0.6])
                .with_albedo_texture(TextureHandle(21))
                .with_double_sided(true),
        ),
        Kind::Interface => Box::new(
            InterfaceMaterial::new("populated")
                .with_base_color([0.0, 1.0, 0.5, 1.0])
                .with_roughness(0.125),
        ),
        Kind::Mix => Box::new(
            MixMaterial::new(
                "populated",
                Box::new(DiffuseMaterial::new("layer0", [0.1, 0.1, 0.1])),
                Box::new(InterfaceMaterial::new("layer1")),
            )
            .with_mix_factor(0.875)
            .with_mix_mode(MixMode::Stochastic),
        ),
    }
}

/// A material of `kind` with the same structure as [`populated`] and default values.
pub fn blank(kind: Kind) -> Box<dyn Material> {
    match kind {
        Kind::Standard => Box::new(
            StandardMaterial::new("blank")
                .with_emissive([0.0; 3])
                .with_base_color_texture(TextureHandle(0), SamplerHandle(0))
                .with_normal_map(TextureHandle(0), 1.0)
                .with_alpha_mode(AlphaMode::Mask),
        ),
        Kind::Diffuse => Box::new(DiffuseMaterial::new("blank", [1.0; 3]).with_double_sided(true)),
        Kind::Interface => Box::new(InterfaceMaterial::new("blank")),
        Kind::Mix => Box::new(MixMaterial::new(
            "blank",
            Box::new(DiffuseMaterial::new("layer0", [1.0; 3])),
            Box::new(InterfaceMaterial::new("layer1")),
        )),
    }
}
