//! Profiling support via Tracy.
//!
//! Instrumentation for parameter packing and schema construction is optional
//! and enabled via the `profiling` Cargo feature:
//!
//! ```toml
//! [dependencies]
//! redlilium-params = { version = "0.1", features = ["profiling"] }
//! ```
//!
//! When profiling is disabled (the default), all macros compile to no-ops with
//! zero runtime overhead.
//!
//! ```ignore
//! use redlilium_params::profiling::{profile_function, profile_scope};
//!
//! fn pack_scene() {
//!     profile_function!();
//!
//!     {
//!         profile_scope!("pack_standard_materials");
//!         // ...
//!     }
//! }
//! ```

// Re-export tracy-client types when profiling is enabled
#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client, Span, span};

/// Create a profiling span for the current scope.
///
/// The span automatically ends when the scope exits.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span for the entire function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a profiling span for function (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

/// Create a profiling span with a runtime-determined name.
///
/// Used where the span is named after a material type. Prefer
/// [`profile_scope!`] for static names, since this one heap-allocates.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope_dynamic {
    ($name:expr) => {
        let _profile_span = $crate::profiling::Client::running()
            .map(|c| c.span_alloc(Some($name), "", file!(), line!(), 0));
    };
}

/// Create a profiling span with a dynamic name (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope_dynamic {
    ($name:expr) => {
        let _ = $name;
    };
}

// Re-export macros at module level
pub use profile_function;
pub use profile_scope;
pub use profile_scope_dynamic;
