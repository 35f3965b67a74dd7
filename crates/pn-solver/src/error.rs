//! Error types for solver operations.

use pn_components::ComponentError;
use pn_core::error::PnError;
use thiserror::Error;

/// Errors that can occur while solving the network.
///
/// `IncompatiblePump`, `InfeasibleParallelSplit` and `NoOperatingPoint` are
/// expected outcomes for some inputs and are meant to be shown to the user;
/// the others indicate malformed input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error(
        "Incompatible pump: shutoff head {shutoff_head_m:.2} m is below the geometric head {geometric_head_m:.2} m"
    )]
    IncompatiblePump {
        shutoff_head_m: f64,
        geometric_head_m: f64,
    },

    #[error("No valid flow distribution across parallel branches at {total_flow_m3h:.3} m³/h")]
    InfeasibleParallelSplit { total_flow_m3h: f64 },

    #[error("No operating point found, check the pump curve and network parameters ({what})")]
    NoOperatingPoint { what: String },

    #[error("Invalid range: {what}")]
    InvalidRange { what: String },

    #[error("Component error: {0}")]
    Component(#[from] ComponentError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PnError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::IncompatiblePump { .. } => PnError::InvalidArg {
                what: "incompatible pump",
            },
            SolverError::InfeasibleParallelSplit { .. } => PnError::InvalidArg {
                what: "parallel split",
            },
            SolverError::NoOperatingPoint { .. } => PnError::InvalidArg {
                what: "operating point",
            },
            SolverError::InvalidRange { .. } => PnError::InvalidArg { what: "range" },
            SolverError::Component(err) => err.into(),
        }
    }
}
