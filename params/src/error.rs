//! Error types for parameter layouts and (de)serialization.

use thiserror::Error;

use crate::types::{ParamType, ParamValue};

/// A schema conflict detected while constructing a [`ParamLayout`](crate::ParamLayout).
///
/// These are programming errors in a material's field declarations. They are
/// reported once at construction time and never repaired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("fields '{first}' [{first_start}, {first_end}) and '{second}' [{second_start}, {second_end}) overlap")]
    Overlap {
        first: String,
        first_start: u32,
        first_end: u32,
        second: String,
        second_start: u32,
        second_end: u32,
    },
    #[error("field '{name}' is declared more than once")]
    DuplicateName { name: String },
    #[error("field '{name}' at offset {offset} is not aligned to {alignment} bytes")]
    Misaligned {
        name: String,
        offset: u32,
        alignment: u32,
    },
    #[error("field '{name}' at offset {offset} does not fit in a 32-bit block")]
    OutOfRange { name: String, offset: u32 },
    #[error("minimum alignment {0} is not a power of two of at least 16")]
    InvalidAlignment(u32),
}

/// Errors produced while packing or unpacking material parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("serialized parameter buffer is {actual} bytes, layout expects {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("material '{material}' has no field '{field}' declared by its layout")]
    MissingField {
        material: &'static str,
        field: String,
    },
    #[error("type mismatch for field '{field}': expected {expected:?}, found {found:?}")]
    TypeMismatch {
        field: String,
        expected: ParamType,
        found: ParamType,
    },
    #[error("value {value:?} is not valid for field '{field}'")]
    InvalidValue { field: String, value: ParamValue },
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
