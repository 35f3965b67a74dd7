//! Flow distribution across parallel branches.
//!
//! For n branches carrying a total flow Q, the unknowns are the first n-1
//! branch flows and the last branch takes the remainder:
//!
//! ```text
//! q_n = Q - Σ q_i           (i < n)
//! r_i = h_i(q_i) - h_n(q_n) (i < n)
//! ```
//!
//! A remainder below the negative-flow guard makes every residual a penalty.
//!
//! Newton starts from the even split. When it does not converge the split is
//! bracketed instead: every branch loss is non-decreasing in its flow, so the
//! common head is found by bisection on `Σ q_i(h) = Q`. The friction factor
//! jumps at the laminar/turbulent transition, so for some totals no flow
//! gives a branch exactly the common head; the bracketed split then parks
//! that branch at its transition flow.

use crate::error::{SolverError, SolverResult};
use crate::newton::{NewtonConfig, newton_solve};
use nalgebra::DVector;
use pn_components::{Branch, HeadLoss, LossContext};
use pn_core::{PENALTY, is_penalty};

/// Halvings of the common-head bracket.
const HEAD_BISECTIONS: usize = 100;
/// Halvings of a branch flow bracket at a fixed head.
const FLOW_BISECTIONS: usize = 64;

#[derive(Debug, Clone, Copy)]
pub struct ParallelConfig {
    pub newton: NewtonConfig,
    /// Smallest remainder flow [m³/h] accepted for the last branch
    pub negative_flow_guard: f64,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            newton: NewtonConfig::default(),
            negative_flow_guard: -0.01,
        }
    }
}

/// Converged split of the total flow.
#[derive(Debug, Clone, PartialEq)]
pub struct ParallelSolution {
    /// Head loss common to all branches [m]
    pub head_loss_m: f64,
    /// `(branch name, flow [m³/h])` in branch order
    pub flows: Vec<(String, f64)>,
}

impl ParallelSolution {
    /// Zero-branch split: no loss, no flows.
    pub fn empty() -> Self {
        Self {
            head_loss_m: 0.0,
            flows: Vec::new(),
        }
    }

    pub fn flow_of(&self, name: &str) -> Option<f64> {
        self.flows.iter().find(|(n, _)| n == name).map(|(_, q)| *q)
    }

    pub fn total_flow(&self) -> f64 {
        self.flows.iter().map(|(_, q)| q).sum()
    }
}

/// Split `total_flow_m3h` across `branches` so every branch loses the same head.
///
/// Fewer than two branches is not a split: the result is empty with zero loss.
/// Returns `InfeasibleParallelSplit` if neither Newton nor the bracketed
/// split finds a distribution.
pub fn solve_parallel(
    branches: &[Branch],
    total_flow_m3h: f64,
    ctx: LossContext<'_>,
    config: &ParallelConfig,
) -> SolverResult<ParallelSolution> {
    let n = branches.len();
    if n < 2 {
        return Ok(ParallelSolution::empty());
    }

    let last = &branches[n - 1];
    let guard = config.negative_flow_guard;

    let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
        let remainder = total_flow_m3h - x.sum();
        if remainder < guard {
            return Ok(DVector::from_element(n - 1, PENALTY));
        }
        let h_last = last.segments.as_slice().head_loss(ctx, remainder)?;
        let mut r = DVector::zeros(n - 1);
        for (i, branch) in branches[..n - 1].iter().enumerate() {
            r[i] = branch.segments.as_slice().head_loss(ctx, x[i])? - h_last;
        }
        Ok(r)
    };

    let x0 = DVector::from_element(n - 1, total_flow_m3h / n as f64);
    let result = newton_solve(x0, &residual, &config.newton)?;

    if result.converged {
        let flows = named_flows(branches, &result.x, total_flow_m3h);
        let head_loss_m = branches[0].segments.as_slice().head_loss(ctx, flows[0].1)?;
        tracing::debug!(
            total_flow_m3h,
            head_loss_m,
            iterations = result.iterations,
            "parallel split solved"
        );
        return Ok(ParallelSolution { head_loss_m, flows });
    }

    tracing::debug!(
        total_flow_m3h,
        residual_norm = result.residual_norm,
        "newton split failed, bracketing common head"
    );
    match bracketed_split(branches, total_flow_m3h, ctx, guard)? {
        Some(solution) => Ok(solution),
        None => {
            tracing::warn!(
                total_flow_m3h,
                branches = n,
                residual_norm = result.residual_norm,
                "parallel split did not converge"
            );
            Err(SolverError::InfeasibleParallelSplit { total_flow_m3h })
        }
    }
}

fn named_flows(
    branches: &[Branch],
    x: &DVector<f64>,
    total_flow_m3h: f64,
) -> Vec<(String, f64)> {
    let n = branches.len();
    let mut flows: Vec<(String, f64)> = branches[..n - 1]
        .iter()
        .zip(x.iter())
        .map(|(b, q)| (b.name.clone(), *q))
        .collect();
    flows.push((branches[n - 1].name.clone(), total_flow_m3h - x.sum()));
    flows
}

/// Split found by bisection on the common head.
///
/// `None` when the branch flows cannot be made to add up to the total, when
/// a branch only ever loses a penalty head, or when the remainder falls
/// below `guard`.
fn bracketed_split(
    branches: &[Branch],
    total_flow_m3h: f64,
    ctx: LossContext<'_>,
    guard: f64,
) -> SolverResult<Option<ParallelSolution>> {
    if !(total_flow_m3h.is_finite() && total_flow_m3h > 0.0) {
        return Ok(None);
    }

    // Every branch alone can carry the total at the largest of these heads
    let mut h_lo = 0.0_f64;
    let mut h_hi = 0.0_f64;
    for branch in branches {
        h_hi = h_hi.max(branch.segments.as_slice().head_loss(ctx, total_flow_m3h)?);
    }

    for _ in 0..HEAD_BISECTIONS {
        let h_mid = 0.5 * (h_lo + h_hi);
        if carried_flow(branches, h_mid, total_flow_m3h, ctx)? < total_flow_m3h {
            h_lo = h_mid;
        } else {
            h_hi = h_mid;
        }
    }

    let excess = carried_flow(branches, h_hi, total_flow_m3h, ctx)? - total_flow_m3h;
    if is_penalty(h_hi) || excess > 1e-9 * total_flow_m3h.max(1.0) {
        return Ok(None);
    }

    let n = branches.len();
    let mut x = DVector::zeros(n - 1);
    for (i, branch) in branches[..n - 1].iter().enumerate() {
        x[i] = flow_at_head(branch, h_hi, total_flow_m3h, ctx)?;
    }
    if total_flow_m3h - x.sum() < guard {
        return Ok(None);
    }

    // A branch that loses a penalty head even at its bracketed flow is blocked
    let flows = named_flows(branches, &x, total_flow_m3h);
    for (branch, (_, q)) in branches.iter().zip(&flows) {
        if is_penalty(branch.segments.as_slice().head_loss(ctx, *q)?) {
            return Ok(None);
        }
    }

    tracing::debug!(total_flow_m3h, head_loss_m = h_hi, "parallel split bracketed");
    Ok(Some(ParallelSolution {
        head_loss_m: h_hi,
        flows,
    }))
}

fn carried_flow(
    branches: &[Branch],
    head_m: f64,
    q_max: f64,
    ctx: LossContext<'_>,
) -> SolverResult<f64> {
    branches
        .iter()
        .try_fold(0.0, |acc, b| Ok(acc + flow_at_head(b, head_m, q_max, ctx)?))
}

/// Largest flow in `[0, q_max]` at which `branch` loses no more than `head_m`.
fn flow_at_head(
    branch: &Branch,
    head_m: f64,
    q_max: f64,
    ctx: LossContext<'_>,
) -> SolverResult<f64> {
    let loss = |q: f64| branch.segments.as_slice().head_loss(ctx, q);
    if loss(q_max)? <= head_m {
        return Ok(q_max);
    }
    let (mut lo, mut hi) = (0.0, q_max);
    for _ in 0..FLOW_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if loss(mid)? <= head_m {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pn_components::PipeSegment;
    use pn_core::units::{m, mm};
    use pn_fluids::{FluidProperties, Library};
    use proptest::prelude::*;

    fn water() -> FluidProperties {
        FluidProperties::new(998.2, 1.004e-6)
    }

    fn branches(geometry: &[(f64, f64)]) -> Vec<Branch> {
        geometry
            .iter()
            .enumerate()
            .map(|(i, &(length, diameter_mm))| {
                Branch::new(
                    format!("Branch {}", i + 1),
                    vec![PipeSegment::new(
                        m(length),
                        mm(diameter_mm),
                        "Carbon Steel (new)",
                    )],
                )
            })
            .collect()
    }

    fn loss(branch: &Branch, ctx: LossContext<'_>, q: f64) -> f64 {
        branch.segments.as_slice().head_loss(ctx, q).unwrap()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        // Any accepted split conserves flow and every branch sits at the
        // common head, or straddles it where its friction factor jumps.
        #[test]
        fn accepted_split_balances_every_branch(
            geometry in prop::collection::vec((1.0..500.0_f64, 15.0..200.0_f64), 2..=4),
            total in 0.1..300.0_f64,
        ) {
            let library = Library::builtin();
            let ctx = LossContext::new(water(), &library);
            let branches = branches(&geometry);

            if let Ok(sol) = solve_parallel(&branches, total, ctx, &ParallelConfig::default()) {
                prop_assert_eq!(sol.flows.len(), branches.len());
                prop_assert!((sol.total_flow() - total).abs() < 1e-9 * total.max(1.0));

                let remainder = sol.flows[branches.len() - 1].1;
                prop_assert!(remainder >= -0.01);

                let h = sol.head_loss_m;
                let dq = 1e-6 * total;
                for (branch, (_, q)) in branches.iter().zip(&sol.flows) {
                    prop_assert!(loss(branch, ctx, q - dq) <= h + 1e-6);
                    prop_assert!(loss(branch, ctx, q + dq) >= h - 1e-6);
                }
            }
        }

        // Fully turbulent branches always have an exact positive split.
        #[test]
        fn turbulent_split_always_converges(
            geometry in prop::collection::vec((20.0..100.0_f64, 60.0..120.0_f64), 2..=4),
            total in 100.0..400.0_f64,
        ) {
            let library = Library::builtin();
            let ctx = LossContext::new(water(), &library);
            let branches = branches(&geometry);

            let sol = solve_parallel(&branches, total, ctx, &ParallelConfig::default()).unwrap();
            prop_assert!((sol.total_flow() - total).abs() < 1e-9 * total);
            for (branch, (_, q)) in branches.iter().zip(&sol.flows) {
                prop_assert!(*q > 0.0);
                prop_assert!((loss(branch, ctx, *q) - sol.head_loss_m).abs() < 1e-6);
            }
        }
    }
}
