//! Library lookup errors.

use pn_core::PnError;
use thiserror::Error;

/// Result type for library operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Errors raised while building or querying the fluid/material library.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    /// Name not present in either tier.
    #[error("Unknown material: {name}")]
    UnknownMaterial { name: String },

    #[error("Unknown fluid: {name}")]
    UnknownFluid { name: String },

    /// A user entry with this name already exists.
    #[error("Duplicate user entry: {name}")]
    Duplicate { name: String },

    /// Non-physical values (negative density, roughness, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<LibraryError> for PnError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::UnknownMaterial { .. } | LibraryError::UnknownFluid { .. } => {
                PnError::InvalidArg {
                    what: "unknown library entry",
                }
            }
            LibraryError::Duplicate { .. } => PnError::InvalidArg {
                what: "duplicate library entry",
            },
            LibraryError::NonPhysical { what } => PnError::Invariant { what },
            LibraryError::InvalidArg { what } => PnError::InvalidArg { what },
        }
    }
}
