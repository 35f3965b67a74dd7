//! Intersection of the pump curve with the system curve.

use crate::curve_fit::Polynomial;
use crate::error::{SolverError, SolverResult};
use crate::newton::{NewtonConfig, newton_solve};
use crate::system_curve::HeadCurve;
use nalgebra::DVector;
use pn_core::PENALTY;

#[derive(Debug, Clone, Copy)]
pub struct OperatingPointConfig {
    /// Starting flow for the search [m³/h]
    pub initial_guess_m3h: f64,
    /// Converged flows at or below this are rejected [m³/h]
    pub min_flow_m3h: f64,
    pub newton: NewtonConfig,
}

impl Default for OperatingPointConfig {
    fn default() -> Self {
        Self {
            initial_guess_m3h: 50.0,
            min_flow_m3h: 1e-3,
            newton: NewtonConfig::default(),
        }
    }
}

/// Flow and head where pump and system agree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatingPoint {
    pub flow_m3h: f64,
    /// Pump head at `flow_m3h`
    pub head_m: f64,
}

/// Solve `H_pump(Q) = H_sys(Q)` for Q > 0.
///
/// The shutoff head is checked first: a pump that cannot lift the static head
/// at zero flow fails with `IncompatiblePump` without running the search.
pub fn find_operating_point<P, S>(
    pump: &P,
    system: &S,
    geometric_head_m: f64,
    config: &OperatingPointConfig,
) -> SolverResult<OperatingPoint>
where
    P: HeadCurve + ?Sized,
    S: HeadCurve + ?Sized,
{
    let shutoff_head_m = pump.head(0.0)?;
    if shutoff_head_m < geometric_head_m {
        return Err(SolverError::IncompatiblePump {
            shutoff_head_m,
            geometric_head_m,
        });
    }

    let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let q = x[0];
        let r = if q < 0.0 {
            PENALTY
        } else {
            pump.head(q)? - system.head(q)?
        };
        Ok(DVector::from_element(1, r))
    };

    let x0 = DVector::from_element(1, config.initial_guess_m3h);
    let result = newton_solve(x0, residual, &config.newton)?;
    let flow_m3h = result.x[0];

    if !result.converged {
        return Err(SolverError::NoOperatingPoint {
            what: format!(
                "search stopped after {} iterations with residual {:.3e}",
                result.iterations, result.residual_norm
            ),
        });
    }
    if flow_m3h <= config.min_flow_m3h {
        return Err(SolverError::NoOperatingPoint {
            what: format!("converged to non-positive flow {flow_m3h:.4} m³/h"),
        });
    }

    let head_m = pump.head(flow_m3h)?;
    tracing::info!(flow_m3h, head_m, iterations = result.iterations, "operating point found");
    Ok(OperatingPoint { flow_m3h, head_m })
}

/// Pump efficiency [%] at `flow_m3h`, clamped to [0, 100].
pub fn efficiency_at(efficiency: &Polynomial, flow_m3h: f64) -> f64 {
    efficiency.eval(flow_m3h).clamp(0.0, 100.0)
}
