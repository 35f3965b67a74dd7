//! System curve: head the network demands at a given flow.
//!
//! ```text
//! H_sys(Q) = H_geo + h_before(Q) + h_parallel(Q) + h_after(Q)
//! ```

use crate::curve_fit::Polynomial;
use crate::error::{SolverError, SolverResult};
use crate::parallel::{ParallelConfig, ParallelSolution, solve_parallel};
use pn_components::{HeadLoss, LossContext, NetworkTopology};
use pn_core::{PENALTY, physical};

/// A head-vs-flow relation (flow in m³/h, head in m).
pub trait HeadCurve {
    fn head(&self, flow_m3h: f64) -> SolverResult<f64>;
}

impl HeadCurve for Polynomial {
    fn head(&self, flow_m3h: f64) -> SolverResult<f64> {
        Ok(self.eval(flow_m3h))
    }
}

impl<F> HeadCurve for F
where
    F: Fn(f64) -> f64,
{
    fn head(&self, flow_m3h: f64) -> SolverResult<f64> {
        Ok(self(flow_m3h))
    }
}

/// Losses of each section at one flow.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkLosses {
    pub before_m: f64,
    pub parallel: ParallelSolution,
    pub after_m: f64,
}

impl NetworkLosses {
    pub fn total(&self) -> f64 {
        self.before_m + self.parallel.head_loss_m + self.after_m
    }
}

#[derive(Debug, Clone)]
pub struct SystemCurve<'a> {
    pub topology: &'a NetworkTopology,
    pub ctx: LossContext<'a>,
    pub geometric_head_m: f64,
    pub parallel: ParallelConfig,
}

impl<'a> SystemCurve<'a> {
    pub fn new(topology: &'a NetworkTopology, ctx: LossContext<'a>, geometric_head_m: f64) -> Self {
        Self {
            topology,
            ctx,
            geometric_head_m,
            parallel: ParallelConfig::default(),
        }
    }

    pub fn with_parallel_config(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Section losses at `flow_m3h`. Fails with `InfeasibleParallelSplit`
    /// when the branch flows cannot be balanced.
    pub fn losses(&self, flow_m3h: f64) -> SolverResult<NetworkLosses> {
        let before_m = self.topology.before.as_slice().head_loss(self.ctx, flow_m3h)?;
        let parallel = solve_parallel(
            self.topology.active_branches(),
            flow_m3h,
            self.ctx,
            &self.parallel,
        )?;
        let after_m = self.topology.after.as_slice().head_loss(self.ctx, flow_m3h)?;
        Ok(NetworkLosses {
            before_m,
            parallel,
            after_m,
        })
    }

    /// Required head, or an error if the parallel split is infeasible.
    pub fn try_head(&self, flow_m3h: f64) -> SolverResult<f64> {
        if flow_m3h < 0.0 {
            return Ok(self.geometric_head_m);
        }
        Ok(self.geometric_head_m + self.losses(flow_m3h)?.total())
    }
}

impl HeadCurve for SystemCurve<'_> {
    /// Like `try_head`, but an infeasible split becomes the penalty head so a
    /// root finder can keep probing.
    fn head(&self, flow_m3h: f64) -> SolverResult<f64> {
        match self.try_head(flow_m3h) {
            Err(SolverError::InfeasibleParallelSplit { .. }) => Ok(PENALTY),
            other => other,
        }
    }
}

/// One charting sample. `head_m` is `None` where the curve is at a penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub flow_m3h: f64,
    pub head_m: Option<f64>,
}

/// `points` evenly spaced samples of `curve` over `[0, q_max]`, ends included.
pub fn sample_curve<C: HeadCurve + ?Sized>(
    curve: &C,
    q_max: f64,
    points: usize,
) -> SolverResult<Vec<CurvePoint>> {
    if points < 2 {
        return Err(SolverError::InvalidRange {
            what: format!("need at least 2 sample points, got {points}"),
        });
    }
    if !(q_max.is_finite() && q_max > 0.0) {
        return Err(SolverError::InvalidRange {
            what: format!("maximum flow must be positive, got {q_max}"),
        });
    }

    let step = q_max / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let flow_m3h = i as f64 * step;
            let head = curve.head(flow_m3h)?;
            Ok(CurvePoint {
                flow_m3h,
                head_m: physical(head),
            })
        })
        .collect()
}
