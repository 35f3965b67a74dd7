//! Derivative-free damped Newton solver.
//!
//! The Jacobian comes from finite differences. When it is singular (flat
//! penalty plateaus, for instance) the step falls back to the Cauchy point of
//! the Gauss-Newton model, i.e. steepest descent on ½‖r‖². Every step is
//! backtracked until the residual norm decreases.

use crate::error::SolverResult;
use crate::jacobian::finite_difference_jacobian;
use nalgebra::{DMatrix, DVector};

/// Newton solver configuration.
#[derive(Debug, Clone, Copy)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the residual norm
    pub tol: f64,
    /// Relative finite-difference step
    pub fd_epsilon: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tol: 1e-8,
            fd_epsilon: 1e-7,
            line_search_beta: 0.5,
            max_line_search_iters: 40,
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Last iterate (the solution if `converged`)
    pub x: DVector<f64>,
    /// Final residual norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
}

/// Solve `residual_fn(x) = 0` starting from `x0`.
///
/// Running out of iterations, a stalled line search or a zero gradient all
/// end the search with `converged = false`; the iteration count is bounded
/// by the config. Errors from `residual_fn` are propagated unchanged.
pub fn newton_solve<F>(
    x0: DVector<f64>,
    residual_fn: F,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    let mut r_norm = norm_or_inf(&r);

    for iter in 0..config.max_iterations {
        if r_norm < config.tol {
            return Ok(NewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
                converged: true,
            });
        }

        let jac = finite_difference_jacobian(&x, &residual_fn, config.fd_epsilon)?;

        let Some(dx) = newton_step(&jac, &r).or_else(|| cauchy_step(&jac, &r)) else {
            tracing::debug!(iter, r_norm, "no descent direction");
            return Ok(stalled(x, r_norm, iter));
        };

        // Backtrack until the residual norm decreases
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            let r_new = residual_fn(&x_new)?;
            let r_new_norm = norm_or_inf(&r_new);
            if r_new_norm < r_norm {
                accepted = Some((x_new, r_new, r_new_norm));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new, r_new_norm)) = accepted else {
            tracing::debug!(iter, r_norm, "line search stagnated");
            return Ok(stalled(x, r_norm, iter));
        };

        x = x_new;
        r = r_new;
        r_norm = r_new_norm;
    }

    let converged = r_norm < config.tol;
    if !converged {
        tracing::debug!(
            max_iterations = config.max_iterations,
            r_norm,
            "iteration budget exhausted"
        );
    }
    Ok(NewtonResult {
        x,
        residual_norm: r_norm,
        iterations: config.max_iterations,
        converged,
    })
}

/// Solve J·dx = -r. `None` if J is singular or the step is not finite.
fn newton_step(jac: &DMatrix<f64>, r: &DVector<f64>) -> Option<DVector<f64>> {
    let dx = jac.clone().lu().solve(&(-r))?;
    dx.iter().all(|v| v.is_finite()).then_some(dx)
}

/// Minimiser of ½‖r + J·dx‖² along the steepest descent direction.
fn cauchy_step(jac: &DMatrix<f64>, r: &DVector<f64>) -> Option<DVector<f64>> {
    let g = jac.transpose() * r;
    let jg = jac * &g;
    let denom = jg.norm_squared();
    let g_sq = g.norm_squared();
    if denom <= 0.0 || g_sq <= 0.0 || !denom.is_finite() || !g_sq.is_finite() {
        return None;
    }
    Some(-(g_sq / denom) * g)
}

fn norm_or_inf(r: &DVector<f64>) -> f64 {
    let n = r.norm();
    if n.is_finite() { n } else { f64::INFINITY }
}

fn stalled(x: DVector<f64>, residual_norm: f64, iterations: usize) -> NewtonResult {
    NewtonResult {
        x,
        residual_norm,
        iterations,
        converged: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };

        let x0 = DVector::from_element(1, 3.0);
        let result = newton_solve(x0, residual, &NewtonConfig::default()).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 2.0).abs() < 1e-8);
    }

    #[test]
    fn two_dimensional_system() {
        // x + y = 3, x·y = 2  →  (1, 2) from a nearby start
        let residual = |v: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_vec(vec![v[0] + v[1] - 3.0, v[0] * v[1] - 2.0]))
        };

        let x0 = DVector::from_vec(vec![0.8, 2.3]);
        let result = newton_solve(x0, residual, &NewtonConfig::default()).unwrap();

        assert!(result.converged);
        assert!((result.x[0] - 1.0).abs() < 1e-7);
        assert!((result.x[1] - 2.0).abs() < 1e-7);
    }

    #[test]
    fn no_root_reports_failure_in_bounded_time() {
        // x^2 + 1 has no real root
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };

        let x0 = DVector::from_element(1, 3.0);
        let result = newton_solve(x0, residual, &NewtonConfig::default()).unwrap();

        assert!(!result.converged);
        assert!(result.iterations <= NewtonConfig::default().max_iterations);
    }

    #[test]
    fn flat_plateau_stalls() {
        let residual =
            |_: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(DVector::from_element(1, 1e12)) };

        let x0 = DVector::from_element(1, 1.0);
        let result = newton_solve(x0, residual, &NewtonConfig::default()).unwrap();
        assert!(!result.converged);
    }

    #[test]
    fn line_search_backs_off_penalty_region() {
        // Root at x = 1; x < 0 is forbidden and returns a penalty
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            let v = if x[0] < 0.0 { 1e12 } else { x[0].powi(3) - 1.0 };
            Ok(DVector::from_element(1, v))
        };

        let x0 = DVector::from_element(1, 0.1);
        let result = newton_solve(x0, residual, &NewtonConfig::default()).unwrap();
        assert!(result.converged);
        assert!((result.x[0] - 1.0).abs() < 1e-8);
    }
}
