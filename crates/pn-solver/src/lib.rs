//! Hydraulic solvers for pump and pipe networks.
//!
//! This crate solves the nonlinear parts of the model: the flow split across
//! parallel branches, the pump/system operating point and the diameter
//! sensitivity sweep. It also fits pump curves from tabulated samples.
//!
//! All root finding goes through one derivative-free damped Newton solver
//! ([`newton_solve`]). Residuals return [`pn_core::PENALTY`] in unphysical
//! regions instead of failing, so the line search can back away from them.

pub mod curve_fit;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod operating_point;
pub mod parallel;
pub mod sensitivity;
pub mod system_curve;

pub use curve_fit::{Cell, DEFAULT_DEGREE, Polynomial, SampleRow, fit_curve, fit_points};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use operating_point::{
    OperatingPoint, OperatingPointConfig, efficiency_at, find_operating_point,
};
pub use parallel::{ParallelConfig, ParallelSolution, solve_parallel};
pub use sensitivity::{
    ScaleRange, SensitivityConfig, SensitivityPoint, diameter_sensitivity,
};
pub use system_curve::{CurvePoint, HeadCurve, NetworkLosses, SystemCurve, sample_curve};
