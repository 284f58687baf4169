//! Material error types.

use redlilium_params::{LayoutError, ParamError};
use thiserror::Error;

/// Errors that can occur while composing material shader data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    /// Two distinct concrete types claim the same id for one interface.
    #[error("conformance id {id} of interface '{interface}' claimed by both '{existing}' and '{incoming}'")]
    IdCollision {
        interface: String,
        id: u32,
        existing: String,
        incoming: String,
    },
    /// One (type, interface) pair was given two different ids.
    #[error("'{type_name}' conforms to '{interface}' with id {existing}, cannot reassign id {incoming}")]
    IdReassigned {
        type_name: String,
        interface: String,
        existing: u32,
        incoming: u32,
    },
    /// A shader module reference appears twice in one list.
    #[error("shader module '{0}' is already in the module list")]
    DuplicateModule(String),
    /// Two define sets being merged disagree on a value.
    #[error("define '{name}' is set to both '{existing}' and '{incoming}'")]
    ConflictingDefine {
        name: String,
        existing: String,
        incoming: String,
    },
    #[error(transparent)]
    Params(#[from] ParamError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}
