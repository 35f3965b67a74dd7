//! Annual cost as a function of a uniform diameter scale.
//!
//! Every pipe diameter in the network is multiplied by the same factor and
//! the head is re-evaluated at a fixed reference flow. The operating point is
//! not re-solved.

use crate::error::{SolverError, SolverResult};
use crate::parallel::ParallelConfig;
use crate::system_curve::SystemCurve;
use pn_components::{CostParameters, LossContext, NetworkTopology, energy_metrics};
use rayon::prelude::*;

#[derive(Debug, Clone, Copy)]
pub struct SensitivityConfig {
    /// Distance between consecutive scale factors [percentage points]
    pub step_pct: f64,
    pub parallel: ParallelConfig,
}

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            step_pct: 5.0,
            parallel: ParallelConfig::default(),
        }
    }
}

/// Inclusive range of diameter scale factors [%].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleRange {
    pub from_pct: f64,
    pub to_pct: f64,
}

impl Default for ScaleRange {
    fn default() -> Self {
        Self {
            from_pct: 80.0,
            to_pct: 120.0,
        }
    }
}

impl ScaleRange {
    pub fn new(from_pct: f64, to_pct: f64) -> Self {
        Self { from_pct, to_pct }
    }

    /// Scale factors from `from_pct` upward in `step_pct` increments. The last
    /// factor never exceeds `to_pct`: an end off the step grid is not rounded
    /// up to the next step, so 80..92 gives 80, 85, 90.
    pub fn steps(&self, step_pct: f64) -> SolverResult<Vec<f64>> {
        let Self { from_pct, to_pct } = *self;
        if !(from_pct.is_finite() && to_pct.is_finite()) {
            return Err(SolverError::InvalidRange {
                what: "scale factors must be finite".into(),
            });
        }
        if from_pct <= 0.0 {
            return Err(SolverError::InvalidRange {
                what: format!("start scale must be positive, got {from_pct}%"),
            });
        }
        if from_pct > to_pct {
            return Err(SolverError::InvalidRange {
                what: format!("start scale {from_pct}% is above end scale {to_pct}%"),
            });
        }
        if !(step_pct.is_finite() && step_pct > 0.0) {
            return Err(SolverError::InvalidRange {
                what: format!("step must be positive, got {step_pct}"),
            });
        }

        let count = ((to_pct - from_pct) / step_pct + 1e-9).floor() as usize;
        Ok((0..=count).map(|i| from_pct + i as f64 * step_pct).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitivityPoint {
    pub scale_pct: f64,
    /// `None` where the parallel split could not be solved
    pub annual_cost: Option<f64>,
}

/// Annual cost at `flow_m3h` for each diameter scale in `range`.
///
/// Points are independent and evaluated in parallel; the output is in
/// ascending scale order. An infeasible split at one point is recorded as
/// `None`, any other error aborts the sweep.
pub fn diameter_sensitivity(
    topology: &NetworkTopology,
    ctx: LossContext<'_>,
    geometric_head_m: f64,
    flow_m3h: f64,
    cost: &CostParameters,
    range: ScaleRange,
    config: &SensitivityConfig,
) -> SolverResult<Vec<SensitivityPoint>> {
    let scales = range.steps(config.step_pct)?;

    let points = scales
        .par_iter()
        .map(|&scale_pct| {
            let scaled = topology.scaled(scale_pct / 100.0);
            let curve = SystemCurve::new(&scaled, ctx, geometric_head_m)
                .with_parallel_config(config.parallel);
            let annual_cost = match curve.try_head(flow_m3h) {
                Ok(head_m) => Some(energy_metrics(flow_m3h, head_m, cost, &ctx.fluid).annual_cost),
                Err(SolverError::InfeasibleParallelSplit { .. }) => {
                    tracing::warn!(scale_pct, "parallel split infeasible, point skipped");
                    None
                }
                Err(e) => return Err(e),
            };
            Ok(SensitivityPoint {
                scale_pct,
                annual_cost,
            })
        })
        .collect::<SolverResult<Vec<_>>>()?;

    tracing::debug!(points = points.len(), flow_m3h, "diameter sensitivity evaluated");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pn_components::{Branch, PipeSegment};
    use pn_core::units::{m, mm};
    use pn_fluids::{FluidProperties, Library};

    fn water() -> FluidProperties {
        FluidProperties::new(998.2, 1.004e-6)
    }

    fn cost() -> CostParameters {
        CostParameters {
            pump_efficiency_pct: 70.0,
            motor_efficiency_pct: 90.0,
            hours_per_day: 24.0,
            tariff_per_kwh: 0.15,
        }
    }

    fn topology() -> NetworkTopology {
        NetworkTopology::new()
            .with_before_segment(PipeSegment::new(m(50.0), mm(100.0), "Carbon Steel (new)"))
            .with_branch(Branch::new(
                "A",
                vec![PipeSegment::new(m(20.0), mm(65.0), "Carbon Steel (new)")],
            ))
            .unwrap()
            .with_branch(Branch::new(
                "B",
                vec![PipeSegment::new(m(30.0), mm(80.0), "Carbon Steel (new)")],
            ))
            .unwrap()
    }

    #[test]
    fn default_range_has_nine_points() {
        let steps = ScaleRange::default().steps(5.0).unwrap();
        assert_eq!(steps.len(), 9);
        assert_eq!(steps[0], 80.0);
        assert_eq!(steps[8], 120.0);
    }

    #[test]
    fn range_never_overshoots_end() {
        let steps = ScaleRange::new(80.0, 92.0).steps(5.0).unwrap();
        assert_eq!(steps, vec![80.0, 85.0, 90.0]);
        let single = ScaleRange::new(100.0, 100.0).steps(5.0).unwrap();
        assert_eq!(single, vec![100.0]);
    }

    #[test]
    fn invalid_ranges_are_rejected() {
        assert!(ScaleRange::new(120.0, 80.0).steps(5.0).is_err());
        assert!(ScaleRange::new(0.0, 80.0).steps(5.0).is_err());
        assert!(ScaleRange::new(80.0, 120.0).steps(0.0).is_err());
    }

    #[test]
    fn cost_falls_as_pipes_widen() {
        let library = Library::builtin();
        let ctx = LossContext::new(water(), &library);
        let points = diameter_sensitivity(
            &topology(),
            ctx,
            10.0,
            40.0,
            &cost(),
            ScaleRange::default(),
            &SensitivityConfig::default(),
        )
        .unwrap();

        assert_eq!(points.len(), 9);
        let costs: Vec<f64> = points.iter().map(|p| p.annual_cost.unwrap()).collect();
        for pair in costs.windows(2) {
            assert!(pair[1] < pair[0], "{pair:?}");
        }
        for pair in points.windows(2) {
            assert!(pair[1].scale_pct > pair[0].scale_pct);
        }
    }

    #[test]
    fn nominal_point_matches_direct_evaluation() {
        let library = Library::builtin();
        let ctx = LossContext::new(water(), &library);
        let topo = topology();
        let points = diameter_sensitivity(
            &topo,
            ctx,
            10.0,
            40.0,
            &cost(),
            ScaleRange::new(100.0, 100.0),
            &SensitivityConfig::default(),
        )
        .unwrap();

        let head = SystemCurve::new(&topo, ctx, 10.0).try_head(40.0).unwrap();
        let direct = energy_metrics(40.0, head, &cost(), &ctx.fluid).annual_cost;
        assert!((points[0].annual_cost.unwrap() - direct).abs() < 1e-6);
    }

    #[test]
    fn infeasible_split_is_recorded_as_none() {
        let library = Library::builtin();
        let ctx = LossContext::new(water(), &library);
        // A zero bore branch can never balance against an open one
        let blocked = NetworkTopology::new()
            .with_before_segment(PipeSegment::new(m(50.0), mm(100.0), "Carbon Steel (new)"))
            .with_branch(Branch::new(
                "open",
                vec![PipeSegment::new(m(20.0), mm(65.0), "Carbon Steel (new)")],
            ))
            .unwrap()
            .with_branch(Branch::new(
                "blocked",
                vec![PipeSegment::new(m(30.0), mm(0.0), "Carbon Steel (new)")],
            ))
            .unwrap();
        let points = diameter_sensitivity(
            &blocked,
            ctx,
            10.0,
            40.0,
            &cost(),
            ScaleRange::new(90.0, 100.0),
            &SensitivityConfig::default(),
        )
        .unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.annual_cost.is_none()));
    }
}
