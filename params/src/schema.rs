//! Static parameter schema of a material type.
//!
//! [`MaterialParams`] is implemented once per concrete material struct. It
//! declares the type's [`ParamLayout`] and gives by-name access to the typed
//! fields, which is all the serializer needs.
//!
//! Most materials derive it with [`material_params!`](crate::material_params),
//! listing the struct fields that are packed. Field names become layout names,
//! field types pick the [`ParamType`](crate::ParamType), and the struct's
//! `Default` instance provides the declared defaults.
//!
//! ```ignore
//! #[derive(Clone, Default)]
//! struct Glass {
//!     name: String,        // not packed
//!     tint: [f32; 3],
//!     ior: f32,
//! }
//!
//! redlilium_params::material_params!(Glass as "Glass" { tint, ior });
//! ```

use std::sync::Arc;

use crate::error::{LayoutError, ParamError};
use crate::layout::ParamLayout;
use crate::registry::LayoutRegistry;
use crate::types::{ParamData, ParamValue};

/// Typed parameter fields of a concrete material type.
pub trait MaterialParams: Clone + Send + Sync + 'static {
    /// Stable concrete type name.
    const TYPE_NAME: &'static str;

    /// Build this type's layout from its static field declarations.
    ///
    /// Called at most once per registry; use [`MaterialParams::param_layout`]
    /// to get the shared instance. Must not itself query the registry for
    /// `Self`.
    fn describe_params() -> Result<ParamLayout, LayoutError>;

    /// Read a field by layout name.
    fn param(&self, name: &str) -> Option<ParamValue>;

    /// Write a field by layout name.
    fn set_param(&mut self, name: &str, value: ParamValue) -> Result<(), ParamError>;

    /// The shared layout of this type from the global registry.
    fn param_layout() -> Result<Arc<ParamLayout>, LayoutError> {
        LayoutRegistry::global().layout_for::<Self>()
    }
}

/// Convert `value` into the type of `current`, for use by
/// [`material_params!`](crate::material_params).
#[doc(hidden)]
pub fn decode_field<T: ParamData>(
    _current: &T,
    field: &str,
    value: &ParamValue,
) -> Result<T, ParamError> {
    if value.param_type() != T::PARAM_TYPE {
        return Err(ParamError::TypeMismatch {
            field: field.to_string(),
            expected: T::PARAM_TYPE,
            found: value.param_type(),
        });
    }
    T::from_param(value).ok_or_else(|| ParamError::InvalidValue {
        field: field.to_string(),
        value: *value,
    })
}

/// Implement [`MaterialParams`] for a struct from a list of its fields.
///
/// The struct must implement `Clone`, `Default`, `Send` and `Sync`, and each
/// listed field must implement [`ParamData`]. Fields are packed in the listed
/// order.
#[macro_export]
macro_rules! material_params {
    ($ty:ty as $type_name:literal { $($field:ident),+ $(,)? }) => {
        impl $crate::MaterialParams for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn describe_params() -> ::core::result::Result<$crate::ParamLayout, $crate::LayoutError> {
                let defaults = <$ty as ::core::default::Default>::default();
                $crate::ParamLayout::builder()
                    .with_label($type_name)
                    $(
                        .field_value(
                            stringify!($field),
                            $crate::ParamData::to_param(&defaults.$field),
                        )
                    )+
                    .build()
            }

            fn param(&self, name: &str) -> ::core::option::Option<$crate::ParamValue> {
                match name {
                    $(
                        stringify!($field) => ::core::option::Option::Some(
                            $crate::ParamData::to_param(&self.$field),
                        ),
                    )+
                    _ => ::core::option::Option::None,
                }
            }

            fn set_param(
                &mut self,
                name: &str,
                value: $crate::ParamValue,
            ) -> ::core::result::Result<(), $crate::ParamError> {
                match name {
                    $(
                        stringify!($field) => {
                            self.$field = $crate::schema::decode_field(&self.$field, name, &value)?;
                            ::core::result::Result::Ok(())
                        }
                    )+
                    _ => ::core::result::Result::Err($crate::ParamError::MissingField {
                        material: $type_name,
                        field: name.to_string(),
                    }),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::types::{ParamType, TextureHandle};
    use crate::{MaterialParams, ParamError, ParamValue};

    #[derive(Debug, Clone, PartialEq)]
    struct Glass {
        name: String,
        tint: [f32; 3],
        ior: f32,
        thin_walled: bool,
        normal_map: TextureHandle,
    }

    impl Default for Glass {
        fn default() -> Self {
            Self {
                name: String::new(),
                tint: [1.0; 3],
                ior: 1.5,
                thin_walled: false,
                normal_map: TextureHandle::INVALID,
            }
        }
    }

    crate::material_params!(Glass as "Glass" { tint, ior, thin_walled, normal_map });

    #[test]
    fn test_macro_layout_uses_field_order_and_defaults() {
        let layout = Glass::describe_params().unwrap();
        assert_eq!(layout.label(), Some("Glass"));
        let names: Vec<&str> = layout.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["tint", "ior", "thin_walled", "normal_map"]);

        let tint = layout.find("tint").unwrap();
        assert_eq!(tint.ty, ParamType::Float3);
        assert_eq!(tint.default, ParamValue::Float3([1.0; 3]));
        assert_eq!(layout.find("ior").unwrap().offset, 12);
        assert_eq!(layout.total_size(), 32);
    }

    #[test]
    fn test_unpacked_fields_are_invisible() {
        let glass = Glass::default();
        assert!(glass.param("name").is_none());
        assert_eq!(glass.param("ior"), Some(ParamValue::Float(1.5)));
    }

    #[test]
    fn test_set_param() {
        let mut glass = Glass::default();
        glass.set_param("ior", ParamValue::Float(1.33)).unwrap();
        assert_eq!(glass.ior, 1.33);

        let err = glass.set_param("ior", ParamValue::Int(1)).unwrap_err();
        assert_eq!(
            err,
            ParamError::TypeMismatch {
                field: "ior".into(),
                expected: ParamType::Float,
                found: ParamType::Int,
            }
        );

        let err = glass.set_param("name", ParamValue::Float(0.0)).unwrap_err();
        assert!(matches!(err, ParamError::MissingField { material: "Glass", .. }));
    }
}
