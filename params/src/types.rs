//! Parameter value types and their little-endian byte encoding.
//!
//! Every [`ParamType`] has a fixed size and alignment matching the GPU
//! constant-buffer rules used by the material shaders:
//!
//! | Type | Size | Alignment |
//! |------|------|-----------|
//! | `Float`, `Int`, `Bool`, `Enum` | 4 | 4 |
//! | `Texture`, `Sampler` | 4 | 4 |
//! | `Float2` | 8 | 8 |
//! | `Float3` | 12 | 16 |
//! | `Float4` | 16 | 16 |
//!
//! Booleans occupy a full 32-bit word, as in HLSL/Slang constant buffers.

use serde::{Deserialize, Serialize};

/// Semantic type of a material parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamType {
    /// Single 32-bit float.
    Float,
    /// Single 32-bit signed integer.
    Int,
    /// Boolean stored as a 32-bit word (0 or 1).
    Bool,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats (aligned like a float4).
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// Texture handle.
    Texture,
    /// Sampler handle.
    Sampler,
    /// Enumeration or integer tag.
    Enum,
}

impl ParamType {
    /// Get the size in bytes of this type.
    pub fn size(&self) -> u32 {
        match self {
            Self::Float | Self::Int | Self::Bool | Self::Enum => 4,
            Self::Texture | Self::Sampler => 4,
            Self::Float2 => 8,
            Self::Float3 => 12,
            Self::Float4 => 16,
        }
    }

    /// Get the required alignment in bytes of this type.
    pub fn alignment(&self) -> u32 {
        match self {
            Self::Float2 => 8,
            Self::Float3 | Self::Float4 => 16,
            _ => 4,
        }
    }
}

/// Handle to a texture resolved by the resource layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct TextureHandle(pub u32);

impl TextureHandle {
    /// No texture bound.
    pub const INVALID: Self = Self(u32::MAX);

    /// Whether this handle refers to a texture.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for TextureHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Handle to a sampler resolved by the resource layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct SamplerHandle(pub u32);

impl SamplerHandle {
    /// No sampler bound.
    pub const INVALID: Self = Self(u32::MAX);

    /// Whether this handle refers to a sampler.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl Default for SamplerHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

/// A typed material parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Float2([f32; 2]),
    Float3([f32; 3]),
    Float4([f32; 4]),
    Texture(TextureHandle),
    Sampler(SamplerHandle),
    Enum(u32),
}

impl ParamValue {
    /// The semantic type of this value.
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::Float(_) => ParamType::Float,
            Self::Int(_) => ParamType::Int,
            Self::Bool(_) => ParamType::Bool,
            Self::Float2(_) => ParamType::Float2,
            Self::Float3(_) => ParamType::Float3,
            Self::Float4(_) => ParamType::Float4,
            Self::Texture(_) => ParamType::Texture,
            Self::Sampler(_) => ParamType::Sampler,
            Self::Enum(_) => ParamType::Enum,
        }
    }

    /// Write the little-endian encoding of this value into `dst`.
    ///
    /// `dst` must be exactly `self.param_type().size()` bytes long.
    pub fn write_le(&self, dst: &mut [u8]) {
        debug_assert_eq!(dst.len(), self.param_type().size() as usize);
        match self {
            Self::Float(v) => write_words(dst, &[v.to_bits()]),
            Self::Int(v) => dst.copy_from_slice(&v.to_le_bytes()),
            Self::Bool(v) => write_words(dst, &[u32::from(*v)]),
            Self::Float2(v) => write_words(dst, &(*v).map(f32::to_bits)),
            Self::Float3(v) => write_words(dst, &(*v).map(f32::to_bits)),
            Self::Float4(v) => write_words(dst, &(*v).map(f32::to_bits)),
            Self::Texture(h) => write_words(dst, &[h.0]),
            Self::Sampler(h) => write_words(dst, &[h.0]),
            Self::Enum(v) => write_words(dst, &[*v]),
        }
    }

    /// Decode a value of type `ty` from its little-endian encoding.
    ///
    /// `src` must be exactly `ty.size()` bytes long. Any nonzero boolean word
    /// decodes as `true`.
    pub fn read_le(ty: ParamType, src: &[u8]) -> Self {
        debug_assert_eq!(src.len(), ty.size() as usize);
        match ty {
            ParamType::Float => Self::Float(f32::from_bits(read_word(src, 0))),
            ParamType::Int => Self::Int(i32::from_le_bytes(word_bytes(src, 0))),
            ParamType::Bool => Self::Bool(read_word(src, 0) != 0),
            ParamType::Float2 => Self::Float2(read_floats(src)),
            ParamType::Float3 => Self::Float3(read_floats(src)),
            ParamType::Float4 => Self::Float4(read_floats(src)),
            ParamType::Texture => Self::Texture(TextureHandle(read_word(src, 0))),
            ParamType::Sampler => Self::Sampler(SamplerHandle(read_word(src, 0))),
            ParamType::Enum => Self::Enum(read_word(src, 0)),
        }
    }
}

fn write_words(dst: &mut [u8], words: &[u32]) {
    for (chunk, word) in dst.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
}

fn word_bytes(src: &[u8], index: usize) -> [u8; 4] {
    let i = index * 4;
    [src[i], src[i + 1], src[i + 2], src[i + 3]]
}

fn read_word(src: &[u8], index: usize) -> u32 {
    u32::from_le_bytes(word_bytes(src, index))
}

fn read_floats<const N: usize>(src: &[u8]) -> [f32; N] {
    std::array::from_fn(|i| f32::from_bits(read_word(src, i)))
}

/// Conversion between a Rust field type and a [`ParamValue`].
///
/// Implemented for the scalar, vector and handle types that can appear in a
/// material struct. Material-specific enums implement it with
/// [`ParamType::Enum`].
pub trait ParamData: Sized {
    /// The semantic type this Rust type maps to.
    const PARAM_TYPE: ParamType;

    /// Convert to a parameter value.
    fn to_param(&self) -> ParamValue;

    /// Convert from a parameter value, returning `None` on a type mismatch
    /// or an out-of-range enum tag.
    fn from_param(value: &ParamValue) -> Option<Self>;
}

macro_rules! impl_param_data {
    ($ty:ty, $variant:ident) => {
        impl ParamData for $ty {
            const PARAM_TYPE: ParamType = ParamType::$variant;

            fn to_param(&self) -> ParamValue {
                ParamValue::$variant(*self)
            }

            fn from_param(value: &ParamValue) -> Option<Self> {
                match value {
                    ParamValue::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_param_data!(f32, Float);
impl_param_data!(i32, Int);
impl_param_data!(bool, Bool);
impl_param_data!([f32; 2], Float2);
impl_param_data!([f32; 3], Float3);
impl_param_data!([f32; 4], Float4);
impl_param_data!(TextureHandle, Texture);
impl_param_data!(SamplerHandle, Sampler);
impl_param_data!(u32, Enum);

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: ParamValue) -> Vec<u8> {
        let mut bytes = vec![0u8; value.param_type().size() as usize];
        value.write_le(&mut bytes);
        bytes
    }

    #[test]
    fn test_sizes_and_alignment() {
        assert_eq!(ParamType::Float3.size(), 12);
        assert_eq!(ParamType::Float3.alignment(), 16);
        assert_eq!(ParamType::Float2.alignment(), 8);
        assert_eq!(ParamType::Bool.size(), 4);
        assert_eq!(ParamType::Texture.alignment(), 4);
    }

    #[test]
    fn test_float_is_little_endian() {
        assert_eq!(encode(ParamValue::Float(0.5)), vec![0x00, 0x00, 0x00, 0x3f]);
        assert_eq!(encode(ParamValue::Int(-2)), vec![0xfe, 0xff, 0xff, 0xff]);
        assert_eq!(encode(ParamValue::Enum(0x0102_0304)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_vector_encoding_matches_pod_layout() {
        let value = [1.0f32, -2.0, 3.5, 0.25];
        let bytes = encode(ParamValue::Float4(value));
        if cfg!(target_endian = "little") {
            assert_eq!(bytes.as_slice(), bytemuck::bytes_of(&value));
        }
        assert_eq!(ParamValue::read_le(ParamType::Float4, &bytes), ParamValue::Float4(value));
    }

    #[test]
    fn test_bool_decodes_nonzero_as_true() {
        assert_eq!(encode(ParamValue::Bool(true)), vec![1, 0, 0, 0]);
        assert_eq!(
            ParamValue::read_le(ParamType::Bool, &[0, 2, 0, 0]),
            ParamValue::Bool(true)
        );
        assert_eq!(
            ParamValue::read_le(ParamType::Bool, &[0, 0, 0, 0]),
            ParamValue::Bool(false)
        );
    }

    #[test]
    fn test_nan_payload_preserved() {
        let nan = f32::from_bits(0x7fc0_1234);
        let bytes = encode(ParamValue::Float(nan));
        match ParamValue::read_le(ParamType::Float, &bytes) {
            ParamValue::Float(v) => assert_eq!(v.to_bits(), 0x7fc0_1234),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_param_data_conversion() {
        assert_eq!(<[f32; 3]>::PARAM_TYPE, ParamType::Float3);
        assert_eq!(0.75f32.to_param(), ParamValue::Float(0.75));
        assert_eq!(f32::from_param(&ParamValue::Float(0.75)), Some(0.75));
        assert_eq!(f32::from_param(&ParamValue::Int(1)), None);
        assert_eq!(
            TextureHandle::from_param(&ParamValue::Texture(TextureHandle(7))),
            Some(TextureHandle(7))
        );
    }

    #[test]
    fn test_handles_default_invalid() {
        assert!(!TextureHandle::default().is_valid());
        assert!(!SamplerHandle::default().is_valid());
        assert!(TextureHandle(0).is_valid());
    }
}
