//! Parameter layout schemas.
//!
//! A [`ParamLayout`] describes where each named, typed field of a material
//! lives inside its packed constant-buffer block. Layouts are immutable once
//! built and are shared via `Arc` by every instance of a material type.
//!
//! # Example
//!
//! ```ignore
//! // base_color: float4 @ 0, roughness: float @ 16, total size 32
//! let layout = ParamLayout::builder()
//!     .with_label("InterfaceMaterial")
//!     .field("base_color", [1.0f32, 1.0, 1.0, 1.0])
//!     .field("roughness", 0.5f32)
//!     .build()?;
//!
//! assert_eq!(layout.total_size(), 32);
//! ```

use std::collections::HashSet;

use serde::Serialize;
use xxhash_rust::xxh3::Xxh3;

use crate::error::LayoutError;
use crate::types::{ParamData, ParamType, ParamValue};

/// Minimum alignment of a constant-buffer block, in bytes.
pub const CONSTANT_BUFFER_ALIGNMENT: u32 = 16;

/// Round `value` up to a multiple of `alignment` (a power of two).
///
/// Returns `None` if the result does not fit in a `u32`.
pub fn align_up(value: u32, alignment: u32) -> Option<u32> {
    debug_assert!(alignment.is_power_of_two());
    Some(value.checked_add(alignment - 1)? & !(alignment - 1))
}

/// Describes one field of a [`ParamLayout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamDescriptor {
    /// Field name, unique within its layout.
    pub name: String,
    /// Semantic type of the field.
    pub ty: ParamType,
    /// Byte offset within the packed block.
    pub offset: u32,
    /// Size in bytes (derived from `ty`).
    pub size: u32,
    /// Required alignment in bytes (derived from `ty`).
    pub alignment: u32,
    /// Declared default value.
    pub default: ParamValue,
}

impl ParamDescriptor {
    /// End of this field's byte range (exclusive).
    ///
    /// Saturates at `u32::MAX`; layouts never contain a field past it.
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.size)
    }

    /// Whether the byte ranges of two descriptors intersect.
    pub fn overlaps(&self, other: &ParamDescriptor) -> bool {
        self.offset < other.end() && other.offset < self.end()
    }
}

/// Immutable schema of a material type's packed parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamLayout {
    label: Option<String>,
    descriptors: Vec<ParamDescriptor>,
    total_size: u32,
    alignment: u32,
}

impl ParamLayout {
    /// Start building a new layout.
    pub fn builder() -> ParamLayoutBuilder {
        ParamLayoutBuilder::new()
    }

    /// Debug label, usually the material type name.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Field descriptors in declaration order.
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.descriptors
    }

    /// Iterate over field descriptors in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParamDescriptor> {
        self.descriptors.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the layout declares no fields.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Find a field by name.
    pub fn find(&self, name: &str) -> Option<&ParamDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Total size in bytes of a packed block, a multiple of [`Self::alignment`].
    pub fn total_size(&self) -> u32 {
        self.total_size
    }

    /// Block alignment: the largest field alignment, at least the
    /// constant-buffer minimum.
    pub fn alignment(&self) -> u32 {
        self.alignment
    }

    /// Number of bytes not covered by any field.
    pub fn padding_bytes(&self) -> u32 {
        self.total_size - self.descriptors.iter().map(|d| d.size).sum::<u32>()
    }

    /// Stable 64-bit hash of field names, types and offsets.
    ///
    /// Two layouts with the same fingerprint pack identical byte blocks, so
    /// callers storing serialized blocks can tag them with it.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        for d in &self.descriptors {
            hasher.update(d.name.as_bytes());
            hasher.update(&[0, d.ty as u8]);
            hasher.update(&d.offset.to_le_bytes());
        }
        hasher.update(&self.total_size.to_le_bytes());
        hasher.update(&self.alignment.to_le_bytes());
        hasher.digest()
    }
}

/// Builder for [`ParamLayout`].
///
/// Fields added with [`field`](Self::field) are packed in declaration order,
/// each at the next offset satisfying its alignment. Fields added with
/// [`field_at`](Self::field_at) keep their explicit offset; the packing
/// cursor continues after the furthest field so far.
#[derive(Debug, Clone)]
pub struct ParamLayoutBuilder {
    label: Option<String>,
    fields: Vec<(String, u32, ParamValue)>,
    cursor: u32,
    min_alignment: u32,
    out_of_range: Option<LayoutError>,
}

impl Default for ParamLayoutBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamLayoutBuilder {
    /// Create an empty builder with the constant-buffer minimum alignment.
    pub fn new() -> Self {
        Self {
            label: None,
            fields: Vec::new(),
            cursor: 0,
            min_alignment: CONSTANT_BUFFER_ALIGNMENT,
            out_of_range: None,
        }
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Raise the minimum block alignment.
    ///
    /// Must be a power of two no smaller than [`CONSTANT_BUFFER_ALIGNMENT`].
    #[must_use]
    pub fn with_min_alignment(mut self, alignment: u32) -> Self {
        self.min_alignment = alignment;
        self
    }

    /// Append a field at the next aligned offset.
    #[must_use]
    pub fn field<T: ParamData>(self, name: impl Into<String>, default: T) -> Self {
        self.field_value(name, default.to_param())
    }

    /// Append a field with a dynamically typed default at the next aligned offset.
    #[must_use]
    pub fn field_value(mut self, name: impl Into<String>, default: ParamValue) -> Self {
        let name = name.into();
        match align_up(self.cursor, default.param_type().alignment()) {
            Some(offset) => self.push(name, offset, default),
            None => {
                let offset = self.cursor;
                self.reject_out_of_range(name, offset);
            }
        }
        self
    }

    /// Add a field at an explicit byte offset.
    #[must_use]
    pub fn field_at<T: ParamData>(mut self, name: impl Into<String>, offset: u32, default: T) -> Self {
        self.push(name.into(), offset, default.to_param());
        self
    }

    fn push(&mut self, name: String, offset: u32, default: ParamValue) {
        match offset.checked_add(default.param_type().size()) {
            Some(end) => {
                self.cursor = self.cursor.max(end);
                self.fields.push((name, offset, default));
            }
            None => self.reject_out_of_range(name, offset),
        }
    }

    fn reject_out_of_range(&mut self, name: String, offset: u32) {
        if self.out_of_range.is_none() {
            self.out_of_range = Some(LayoutError::OutOfRange { name, offset });
        }
    }

    /// Validate the declared fields and build the layout.
    ///
    /// # Errors
    ///
    /// Returns a [`LayoutError`] if two fields overlap, a name repeats, a
    /// field is misaligned or ends past `u32::MAX`, or the minimum alignment
    /// is not a power of two of at least [`CONSTANT_BUFFER_ALIGNMENT`].
    pub fn build(self) -> Result<ParamLayout, LayoutError> {
        if !self.min_alignment.is_power_of_two() || self.min_alignment < CONSTANT_BUFFER_ALIGNMENT
        {
            return Err(LayoutError::InvalidAlignment(self.min_alignment));
        }
        if let Some(err) = self.out_of_range {
            return Err(err);
        }

        let descriptors: Vec<ParamDescriptor> = self
            .fields
            .into_iter()
            .map(|(name, offset, default)| {
                let ty = default.param_type();
                ParamDescriptor {
                    name,
                    ty,
                    offset,
                    size: ty.size(),
                    alignment: ty.alignment(),
                    default,
                }
            })
            .collect();

        let mut names = HashSet::with_capacity(descriptors.len());
        for d in &descriptors {
            if !names.insert(d.name.as_str()) {
                return Err(LayoutError::DuplicateName {
                    name: d.name.clone(),
                });
            }
            if d.offset % d.alignment != 0 {
                return Err(LayoutError::Misaligned {
                    name: d.name.clone(),
                    offset: d.offset,
                    alignment: d.alignment,
                });
            }
        }

        check_overlaps(&descriptors)?;

        let alignment = descriptors
            .iter()
            .map(|d| d.alignment)
            .fold(self.min_alignment, u32::max);
        let last = descriptors.iter().max_by_key(|d| d.end());
        let end = last.map_or(0, ParamDescriptor::end);
        let total_size = align_up(end, alignment).ok_or_else(|| LayoutError::OutOfRange {
            name: last.map(|d| d.name.clone()).unwrap_or_default(),
            offset: last.map_or(0, |d| d.offset),
        })?;

        let layout = ParamLayout {
            label: self.label,
            descriptors,
            total_size,
            alignment,
        };

        log::debug!(
            "Built param layout {:?}: {} fields, {} bytes ({} padding)",
            layout.label(),
            layout.len(),
            layout.total_size(),
            layout.padding_bytes()
        );

        Ok(layout)
    }
}

/// Reject any two descriptors whose byte ranges intersect.
///
/// Sorting by offset means each field only needs checking against the
/// furthest-reaching field before it.
fn check_overlaps(descriptors: &[ParamDescriptor]) -> Result<(), LayoutError> {
    let mut order: Vec<&ParamDescriptor> = descriptors.iter().collect();
    order.sort_by_key(|d| d.offset);

    let mut furthest: Option<&ParamDescriptor> = None;
    for d in order {
        if let Some(prev) = furthest {
            if prev.overlaps(d) {
                return Err(LayoutError::Overlap {
                    first: prev.name.clone(),
                    first_start: prev.offset,
                    first_end: prev.end(),
                    second: d.name.clone(),
                    second_start: d.offset,
                    second_end: d.end(),
                });
            }
        }
        match furthest {
            Some(prev) if prev.end() >= d.end() => {}
            _ => furthest = Some(d),
        }
    }
    Ok(())
}
