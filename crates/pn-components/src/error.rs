//! Error types for component operations.

use pn_core::error::PnError;
use pn_fluids::LibraryError;
use thiserror::Error;

/// Errors that can occur during component calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Duplicate branch name: {name}")]
    DuplicateBranch { name: String },

    #[error("Unknown segment: {id}")]
    UnknownSegment { id: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

impl From<ComponentError> for PnError {
    fn from(e: ComponentError) -> Self {
        match e {
            ComponentError::NonPhysical { what } => PnError::InvalidArg { what },
            ComponentError::InvalidArg { what } => PnError::InvalidArg { what },
            ComponentError::Library(err) => err.into(),
            ComponentError::DuplicateBranch { .. } => PnError::InvalidArg {
                what: "duplicate branch name",
            },
            ComponentError::UnknownSegment { .. } => PnError::InvalidArg {
                what: "unknown segment",
            },
        }
    }
}
