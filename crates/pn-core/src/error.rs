use thiserror::Error;

pub type PnResult<T> = Result<T, PnError>;

/// Crate-agnostic error every layer can collapse into.
#[derive(Error, Debug)]
pub enum PnError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
