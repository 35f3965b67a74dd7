//! Error types for the pn-app service layer.

use std::fmt;
use std::path::PathBuf;

use pn_solver::SolverError;

/// Which pump table a curve-fit failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveKind {
    Head,
    Efficiency,
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKind::Head => f.write_str("head"),
            CurveKind::Efficiency => f.write_str("efficiency"),
        }
    }
}

/// Application error type that wraps errors from the backend crates
/// and gives the CLI one error interface.
///
/// The evaluation outcomes (`InsufficientCurveData`, `IncompatiblePump`,
/// `EmptyTopology`, `NoOperatingPoint`, `InfeasibleParallelSplit`) are kept as
/// distinct variants so callers can tell bad data from a bad pump choice.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario compilation failed: {0}")]
    Compile(String),

    #[error(
        "Insufficient {curve} curve data: need at least {required} valid rows for a degree {degree} fit, found {found}"
    )]
    InsufficientCurveData {
        curve: CurveKind,
        degree: usize,
        required: usize,
        found: usize,
    },

    #[error(
        "Incompatible pump: shutoff head {shutoff_head_m:.2} m is below the geometric head {geometric_head_m:.2} m"
    )]
    IncompatiblePump {
        shutoff_head_m: f64,
        geometric_head_m: f64,
    },

    #[error("The network has no pipe segments")]
    EmptyTopology,

    #[error("No operating point found, check the pump curve and network parameters ({0})")]
    NoOperatingPoint(String),

    #[error("No valid flow distribution across parallel branches at {total_flow_m3h:.3} m³/h")]
    InfeasibleParallelSplit { total_flow_m3h: f64 },

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for pn-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<pn_project::ProjectError> for AppError {
    fn from(err: pn_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pn_project::ValidationError> for AppError {
    fn from(err: pn_project::ValidationError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<pn_fluids::LibraryError> for AppError {
    fn from(err: pn_fluids::LibraryError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<pn_components::ComponentError> for AppError {
    fn from(err: pn_components::ComponentError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<SolverError> for AppError {
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::IncompatiblePump {
                shutoff_head_m,
                geometric_head_m,
            } => AppError::IncompatiblePump {
                shutoff_head_m,
                geometric_head_m,
            },
            SolverError::NoOperatingPoint { what } => AppError::NoOperatingPoint(what),
            SolverError::InfeasibleParallelSplit { total_flow_m3h } => {
                AppError::InfeasibleParallelSplit { total_flow_m3h }
            }
            SolverError::Component(err) => err.into(),
            SolverError::InvalidRange { what } => AppError::InvalidInput(what),
        }
    }
}
